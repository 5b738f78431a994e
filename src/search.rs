// model = "claude-opus-4-5"
// created = "2026-10-17"
// modified = "2026-10-17"
// driver = "Isaac Clayton"

//! Binary search with an explicit tie-break.
//!
//! When several elements compare equal to the key, which one is reported
//! depends on the [`SearchBias`]. The default is [`SearchBias::Leftmost`],
//! so repeated searches for the same key in the same list always agree and
//! the reported index is also the insertion point that keeps equal keys in
//! arrival order.

use std::cmp::Ordering;

use crate::error::Result;

/// Which of several equal matches a search reports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SearchBias {
    /// The lowest matching index.
    #[default]
    Leftmost,
    /// The highest matching index.
    Rightmost,
    /// Whichever match the halving search lands on first. Fewest comparisons.
    FirstHit,
}

/// Outcome of a search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SearchResult {
    Found(usize),
    /// The key is absent; inserting it at `insert_at` keeps the order.
    NotFound { insert_at: usize },
}

impl SearchResult {
    pub fn found(self) -> Option<usize> {
        return match self {
            SearchResult::Found(index) => Some(index),
            SearchResult::NotFound { .. } => None,
        };
    }

    /// The matching index, or where the key would go.
    pub fn index(self) -> usize {
        return match self {
            SearchResult::Found(index) => index,
            SearchResult::NotFound { insert_at } => insert_at,
        };
    }

    pub fn is_found(self) -> bool {
        return matches!(self, SearchResult::Found(_));
    }

    /// Shift the reported position by `by`, for searches over a sub-range.
    pub fn offset(self, by: usize) -> SearchResult {
        return match self {
            SearchResult::Found(index) => SearchResult::Found(index + by),
            SearchResult::NotFound { insert_at } => SearchResult::NotFound {
                insert_at: insert_at + by,
            },
        };
    }
}

/// Search `0..len` with `order_at`, which returns how the element at an index
/// orders relative to the key.
///
/// `order_at` is fallible so that it can read through a fallible accessor;
/// the first error is returned as is.
pub fn binary_search_by<F>(len: usize, bias: SearchBias, mut order_at: F) -> Result<SearchResult>
where
    F: FnMut(usize) -> Result<Ordering>,
{
    let mut lo = 0;
    let mut hi = len;
    let mut found = None;

    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        match order_at(mid)? {
            Ordering::Less => lo = mid + 1,
            Ordering::Greater => hi = mid,
            Ordering::Equal => {
                found = Some(mid);
                match bias {
                    SearchBias::FirstHit => break,
                    SearchBias::Leftmost => hi = mid,
                    SearchBias::Rightmost => lo = mid + 1,
                }
            }
        }
    }

    return Ok(match found {
        Some(index) => SearchResult::Found(index),
        None => SearchResult::NotFound { insert_at: lo },
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    const SORTED: [i32; 9] = [1, 3, 5, 5, 5, 5, 5, 7, 9];

    fn search(key: i32, bias: SearchBias) -> SearchResult {
        return binary_search_by(SORTED.len(), bias, |i| Ok(SORTED[i].cmp(&key))).unwrap();
    }

    #[test]
    fn unique_key() {
        for bias in [SearchBias::Leftmost, SearchBias::Rightmost, SearchBias::FirstHit] {
            assert_eq!(search(3, bias), SearchResult::Found(1));
        }
    }

    #[test]
    fn duplicate_key_bias() {
        assert_eq!(search(5, SearchBias::Leftmost), SearchResult::Found(2));
        assert_eq!(search(5, SearchBias::Rightmost), SearchResult::Found(6));
        assert_eq!(search(5, SearchBias::FirstHit), SearchResult::Found(4));
    }

    #[test]
    fn absent_keys() {
        let bias = SearchBias::default();
        assert_eq!(search(0, bias), SearchResult::NotFound { insert_at: 0 });
        assert_eq!(search(4, bias), SearchResult::NotFound { insert_at: 2 });
        assert_eq!(search(10, bias), SearchResult::NotFound { insert_at: 9 });
        assert!(!search(0, bias).is_found());
        assert_eq!(search(0, bias).found(), None);
    }

    #[test]
    fn offset_shifts_both_outcomes() {
        assert_eq!(SearchResult::Found(2).offset(10), SearchResult::Found(12));
        assert_eq!(
            SearchResult::NotFound { insert_at: 0 }.offset(3),
            SearchResult::NotFound { insert_at: 3 }
        );
    }

    #[test]
    fn empty_range() {
        let result = binary_search_by(0, SearchBias::Leftmost, |_| Ok(Ordering::Equal)).unwrap();
        assert_eq!(result, SearchResult::NotFound { insert_at: 0 });
    }

    #[test]
    fn comparison_errors_propagate() {
        let result = binary_search_by(4, SearchBias::Leftmost, |i| {
            return Err(crate::error::SeqError::out_of_range(i, 0));
        });
        assert!(result.is_err());
    }
}
