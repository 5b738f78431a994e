// model = "claude-opus-4-5"
// created = "2026-10-17"
// modified = "2026-10-17"
// driver = "Isaac Clayton"

//! AFL fuzz harness for BlockList
//!
//! Every input byte string is decoded into a stream of list operations that
//! are applied both to a small-block `BlockList` with checking turned on and
//! to a plain `Vec`. Any divergence, any verifier failure and any error on a
//! valid call is a crash.

use afl::fuzz;
use bigseq::BlockConfig;
use bigseq::BlockList;

const CAPACITY: usize = 6;

#[derive(Debug, Clone, Copy)]
enum FuzzOp {
    Insert { pos_frac: u8, value: u8 },
    Remove { pos_frac: u8 },
    Set { pos_frac: u8, value: u8 },
    InsertAll { pos_frac: u8, len: u8 },
    RemoveRange { pos_frac: u8, len: u8 },
    /// Replace the list with a copy of one of its ranges.
    CopyRange { pos_frac: u8, len: u8 },
    SortRange { pos_frac: u8, len: u8 },
}

impl FuzzOp {
    fn from_bytes(bytes: &[u8]) -> Option<(FuzzOp, &[u8])> {
        let (&tag, rest) = bytes.split_first()?;
        if rest.len() < 2 {
            return None;
        }
        let (a, b) = (rest[0], rest[1]);
        let op = match tag % 7 {
            0 => FuzzOp::Insert { pos_frac: a, value: b },
            1 => FuzzOp::Remove { pos_frac: a },
            2 => FuzzOp::Set { pos_frac: a, value: b },
            3 => FuzzOp::InsertAll { pos_frac: a, len: b % 40 },
            4 => FuzzOp::RemoveRange { pos_frac: a, len: b % 40 },
            5 => FuzzOp::CopyRange { pos_frac: a, len: b },
            _ => FuzzOp::SortRange { pos_frac: a, len: b },
        };
        return Some((op, &rest[2..]));
    }
}

/// Scale a byte to a position in `0..=len`.
fn position(frac: u8, len: usize) -> usize {
    return (frac as usize * (len + 1)) / 256;
}

fn main() {
    fuzz!(|data: &[u8]| {
        let config = BlockConfig::with_capacity(CAPACITY).check_invariants(true);
        let mut list: BlockList<u8> = BlockList::with_config(config).unwrap();
        let mut model: Vec<u8> = Vec::new();
        let mut remaining = data;

        while let Some((op, rest)) = FuzzOp::from_bytes(remaining) {
            remaining = rest;
            let len = model.len();

            match op {
                FuzzOp::Insert { pos_frac, value } => {
                    let pos = position(pos_frac, len);
                    list.insert(pos, value).unwrap();
                    model.insert(pos, value);
                }
                FuzzOp::Remove { pos_frac } => {
                    if len > 0 {
                        let pos = position(pos_frac, len - 1);
                        assert_eq!(list.remove(pos).unwrap(), model.remove(pos));
                    }
                }
                FuzzOp::Set { pos_frac, value } => {
                    if len > 0 {
                        let pos = position(pos_frac, len - 1);
                        list.set(pos, value).unwrap();
                        model[pos] = value;
                    }
                }
                FuzzOp::InsertAll { pos_frac, len: count } => {
                    let pos = position(pos_frac, len);
                    let items: Vec<u8> = (0..count).collect();
                    list.insert_all(pos, items.clone()).unwrap();
                    model.splice(pos..pos, items);
                }
                FuzzOp::RemoveRange { pos_frac, len: count } => {
                    let from = position(pos_frac, len);
                    let to = (from + count as usize).min(len);
                    let removed = list.remove_range(from, to).unwrap();
                    let expected: Vec<u8> = model.drain(from..to).collect();
                    assert_eq!(removed, expected);
                }
                FuzzOp::CopyRange { pos_frac, len: count } => {
                    let from = position(pos_frac, len);
                    let to = (from + count as usize).min(len);
                    let copy = list.copy_range(from, to).unwrap();
                    assert_eq!(copy.to_vec(), &model[from..to]);
                    list = copy;
                    model = model[from..to].to_vec();
                }
                FuzzOp::SortRange { pos_frac, len: count } => {
                    let from = position(pos_frac, len);
                    let to = (from + count as usize).min(len);
                    list.sort_range(from, to).unwrap();
                    model[from..to].sort();
                }
            }

            assert_eq!(list.len(), model.len());
        }

        assert_eq!(list.to_vec(), model);
    });
}
