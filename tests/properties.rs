// model = "claude-opus-4-5"
// created = "2026-10-17"
// modified = "2026-10-17"
// driver = "Isaac Clayton"

//! Behavioural properties of block lists: positional integrity, value
//! semantics for floats, search tie-breaks, invariants under load, range
//! copy independence and bulk insert equivalence.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use bigseq::seq::verify;
use bigseq::{BlockConfig, BlockList, SearchBias, SearchResult};

fn height_bound(len: usize) -> usize {
    return 2 * len.max(2).ilog2() as usize + 2;
}

// =============================================================================
// Positional integrity
// =============================================================================

#[test]
fn presized_list_returns_appended_values() {
    for (capacity, n) in [(16, 5), (1000, 999), (2000, 1500), (10, 5000)] {
        let mut list = BlockList::with_capacity(capacity);
        for i in 0..n {
            list.push(i).unwrap();
        }
        assert_eq!(list.len(), n);
        for i in 0..n {
            assert_eq!(list.get(i), Ok(&i), "capacity {} n {}", capacity, n);
        }
    }
}

// =============================================================================
// Float value semantics
// =============================================================================

#[test]
fn nan_lists_compare_equal() {
    let a: BlockList<f64> = vec![1.0, f64::NAN, 3.0].into_iter().collect();
    let mut b: BlockList<f64> = vec![1.0, f64::NAN, 3.0].into_iter().collect();
    assert_eq!(a, b);

    b.set(1, 0.0).unwrap();
    assert_ne!(a, b);

    let mut c = a.clone();
    c.set(0, 0.0).unwrap();
    assert_ne!(a, c);
}

#[test]
fn sort_puts_nan_last() {
    let mut list: BlockList<f64> = vec![1.0, f64::NAN, 3.0].into_iter().collect();
    list.sort().unwrap();
    assert_eq!(list.get(0), Ok(&1.0));
    assert_eq!(list.get(1), Ok(&3.0));
    assert!(list.get(2).unwrap().is_nan());

    let mut floats: BlockList<f32> = vec![f32::NAN, -1.0, f32::NAN, 2.0].into_iter().collect();
    floats.sort().unwrap();
    assert_eq!(floats.get(0), Ok(&-1.0));
    assert_eq!(floats.get(1), Ok(&2.0));
    assert!(floats.get(2).unwrap().is_nan());
    assert!(floats.get(3).unwrap().is_nan());
}

#[test]
fn index_of_finds_nan() {
    let list: BlockList<f64> = vec![1.0, f64::NAN, 3.0, f64::NAN].into_iter().collect();
    assert_eq!(list.index_of(&f64::NAN), Some(1));
    assert_eq!(list.last_index_of(&f64::NAN), Some(3));
}

// =============================================================================
// Binary search
// =============================================================================

#[test]
fn binary_search_tie_breaks() {
    let list: BlockList<i32> = vec![1, 3, 5, 5, 5, 5, 5, 7, 9].into_iter().collect();

    assert_eq!(list.binary_search(&3), Ok(SearchResult::Found(1)));
    assert_eq!(list.binary_search(&5), Ok(SearchResult::Found(2)));
    assert_eq!(list.binary_search(&0), Ok(SearchResult::NotFound { insert_at: 0 }));

    let rightmost = list.binary_search_by(SearchBias::Rightmost, |x| x.cmp(&5)).unwrap();
    assert_eq!(rightmost, SearchResult::Found(6));
    let first_hit = list.binary_search_by(SearchBias::FirstHit, |x| x.cmp(&5)).unwrap();
    let index = first_hit.found().unwrap();
    assert!((2..=6).contains(&index));

    // Repeating a search gives the same answer.
    assert_eq!(list.binary_search(&5), list.binary_search(&5));
}

#[test]
fn binary_search_spans_blocks() {
    let config = BlockConfig::with_capacity(8);
    let mut list = BlockList::with_config(config).unwrap();
    for i in 0..1000 {
        list.push(i / 10).unwrap();
    }
    assert_eq!(list.binary_search(&50), Ok(SearchResult::Found(500)));
    assert_eq!(list.binary_search(&100), Ok(SearchResult::NotFound { insert_at: 1000 }));
}

// =============================================================================
// Randomized load
// =============================================================================

#[test]
fn invariants_hold_under_random_load() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut list: BlockList<u32> = (0..200_000).collect();

    for step in 0..100_000u32 {
        let len = list.len();
        if len == 0 || rng.gen_bool(0.55) {
            let index = rng.gen_range(0..=len);
            list.insert(index, step).unwrap();
        } else {
            let index = rng.gen_range(0..len);
            list.remove(index).unwrap();
        }
        if step % 10_000 == 0 {
            verify(&list).unwrap();
        }
    }

    verify(&list).unwrap();
    assert!(list.height() <= height_bound(list.len()));
}

#[test]
fn invariants_hold_with_small_blocks() {
    let mut rng = StdRng::seed_from_u64(42);
    let config = BlockConfig::with_capacity(5).check_invariants(true);
    let mut list = BlockList::with_config(config).unwrap();
    let mut model = Vec::new();

    for step in 0..5_000u32 {
        let len = model.len();
        let choice = rng.gen_range(0..10);
        if len == 0 || choice < 5 {
            let index = rng.gen_range(0..=len);
            list.insert(index, step).unwrap();
            model.insert(index, step);
        } else if choice < 9 {
            let index = rng.gen_range(0..len);
            assert_eq!(list.remove(index).unwrap(), model.remove(index));
        } else {
            let from = rng.gen_range(0..=len);
            let to = rng.gen_range(from..=len.min(from + 30));
            let removed = list.remove_range(from, to).unwrap();
            assert_eq!(removed, model.drain(from..to).collect::<Vec<_>>());
        }
        assert!(list.height() <= height_bound(list.len()));
    }
    assert_eq!(list.to_vec(), model);
}

// =============================================================================
// Range copy independence
// =============================================================================

#[test]
fn range_copy_is_independent_both_ways() {
    let config = BlockConfig::with_capacity(16).check_invariants(true);
    let mut original = BlockList::with_config(config).unwrap();
    original.insert_all(0, 0..10_000u32).unwrap();

    let mut copy = original.copy_range(1_234, 8_765).unwrap();
    assert_eq!(copy.len(), 8_765 - 1_234);

    // Original write does not reach the copy.
    original.set(5_000, 0).unwrap();
    assert_eq!(copy.get(5_000 - 1_234), Ok(&5_000));

    // Copy write does not reach the original.
    copy.set(100, 0).unwrap();
    assert_eq!(original.get(1_334), Ok(&1_334));

    // Structural edits stay local too.
    copy.remove_range(0, 1_000).unwrap();
    original.insert(2_000, 7).unwrap();
    assert_eq!(copy.get(0), Ok(&2_234));
    assert_eq!(original.len(), 10_001);
    verify(&original).unwrap();
    verify(&copy).unwrap();
}

// =============================================================================
// Bulk insert equivalence
// =============================================================================

#[test]
fn bulk_insert_matches_sequential_inserts() {
    let mut rng = StdRng::seed_from_u64(7);
    for capacity in [4, 9, 64] {
        let config = BlockConfig::with_capacity(capacity).check_invariants(true);
        let mut bulk = BlockList::with_config(config).unwrap();
        let mut single = BlockList::with_config(config).unwrap();

        for round in 0..40u32 {
            let index = rng.gen_range(0..=bulk.len());
            let count = rng.gen_range(0..3 * capacity as u32);
            let run: Vec<u32> = (0..count).map(|i| round * 1_000 + i).collect();

            bulk.insert_all(index, run.clone()).unwrap();
            for (offset, value) in run.into_iter().enumerate() {
                single.insert(index + offset, value).unwrap();
            }
            assert_eq!(bulk.to_vec(), single.to_vec());
        }
    }
}
