// model = "claude-opus-4-5"
// created = "2026-10-17"
// modified = "2026-10-17"
// driver = "Isaac Clayton"

//! Value semantics for element types.
//!
//! Equality and ordering used by `BlockList`'s `PartialEq`, `sort`,
//! `binary_search` and `index_of`. For most types these are just `Eq` and
//! `Ord`. Floats are the exception: the primitive `==` says NaN is unequal
//! to itself and `<` leaves it unordered, so lists of floats would never
//! compare equal to themselves and would sort unpredictably.
//!
//! Floats therefore use a total order of their own:
//! - NaN equals NaN
//! - NaN sorts after every other value, including infinity
//! - `-0.0` sorts before `0.0`, and the two are not equal

use std::cmp::Ordering;

/// Equality and total ordering by value.
pub trait ValueOrd {
    fn value_eq(&self, other: &Self) -> bool;

    fn value_cmp(&self, other: &Self) -> Ordering;
}

macro_rules! value_ord_via_ord {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ValueOrd for $ty {
                #[inline]
                fn value_eq(&self, other: &Self) -> bool {
                    return self == other;
                }

                #[inline]
                fn value_cmp(&self, other: &Self) -> Ordering {
                    return self.cmp(other);
                }
            }
        )*
    };
}

value_ord_via_ord!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, bool, char, String, &str,
);

macro_rules! value_ord_float {
    ($($ty:ty),*) => {
        $(
            impl ValueOrd for $ty {
                #[inline]
                fn value_eq(&self, other: &Self) -> bool {
                    return self.value_cmp(other) == Ordering::Equal;
                }

                fn value_cmp(&self, other: &Self) -> Ordering {
                    return match (self.is_nan(), other.is_nan()) {
                        (true, true) => Ordering::Equal,
                        (true, false) => Ordering::Greater,
                        (false, true) => Ordering::Less,
                        (false, false) => self.total_cmp(other),
                    };
                }
            }
        )*
    };
}

value_ord_float!(f32, f64);

impl<T: ValueOrd> ValueOrd for Option<T> {
    fn value_eq(&self, other: &Self) -> bool {
        return match (self, other) {
            (Some(a), Some(b)) => a.value_eq(b),
            (None, None) => true,
            _ => false,
        };
    }

    /// `None` sorts first.
    fn value_cmp(&self, other: &Self) -> Ordering {
        return match (self, other) {
            (Some(a), Some(b)) => a.value_cmp(b),
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
        };
    }
}
