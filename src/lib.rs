// model = "claude-opus-4-5"
// created = "2026-10-17"
// modified = "2026-10-17"
// driver = "Isaac Clayton"

//! Bigseq - Block-organized sequences for very large lists.
//!
//! A [`BlockList`](seq::BlockList) behaves like a growable indexable
//! sequence, but stores its elements in bounded gap blocks arranged as the
//! leaves of a balanced tree. Inserting or removing in the middle costs
//! O(log n) plus a short shift inside one block, and runs of reads or edits
//! near the same position hit a cached block without descending the tree.
//!
//! # Quick Start
//!
//! ```
//! use bigseq::seq::BlockList;
//!
//! let mut list = BlockList::new();
//! for i in 0..10_000u32 {
//!     list.push(i).unwrap();
//! }
//! list.insert(5_000, 42).unwrap();
//! assert_eq!(list.get(5_000), Ok(&42));
//!
//! // Range copies share storage until either side writes.
//! let copy = list.copy_range(100, 200).unwrap();
//! assert_eq!(copy.get(0), Ok(&100));
//! ```

pub mod config;
pub mod error;
pub mod search;
pub mod seq;
pub mod value;

pub use config::BlockConfig;
pub use error::Result;
pub use error::SeqError;
pub use search::SearchBias;
pub use search::SearchResult;
pub use seq::BlockList;
pub use seq::GapBlock;
pub use seq::Sequence;
pub use value::ValueOrd;
