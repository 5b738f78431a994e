// model = "claude-opus-4-5"
// created = "2026-10-17"
// modified = "2026-10-17"
// driver = "Isaac Clayton"

//! Block sizing policy and consistency-check switches.
//!
//! Checking can be turned on per list through [`BlockConfig::check_invariants`]
//! or for the whole process through [`set_global_checks`]. The process-wide
//! switch starts out from the `BIGSEQ_CHECK` environment variable.

use std::sync::OnceLock;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use crate::error::Result;
use crate::error::SeqError;

/// Default maximum number of elements held by one block.
pub const DEFAULT_BLOCK_CAPACITY: usize = 1000;

/// Smallest accepted `capacity_max`.
pub const MIN_BLOCK_CAPACITY: usize = 4;

/// Environment variable that enables checking for every list in the process.
pub const CHECK_ENV_VAR: &str = "BIGSEQ_CHECK";

/// Share of `capacity_max`, in percent, that the first and last blocks fill
/// to before a new block is started at that end.
pub const EDGE_FILL_PERCENT: usize = 95;

static GLOBAL_CHECKS: OnceLock<AtomicBool> = OnceLock::new();

fn global_flag() -> &'static AtomicBool {
    return GLOBAL_CHECKS.get_or_init(|| {
        let enabled = match std::env::var(CHECK_ENV_VAR) {
            Ok(value) => parse_switch(&value),
            Err(_) => false,
        };
        AtomicBool::new(enabled)
    });
}

fn parse_switch(value: &str) -> bool {
    return matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on");
}

/// Enable or disable the verifier after every mutation, process wide.
pub fn set_global_checks(enabled: bool) {
    global_flag().store(enabled, Ordering::Relaxed);
}

/// Whether process-wide checking is on.
pub fn global_checks() -> bool {
    return global_flag().load(Ordering::Relaxed);
}

/// Bounds on block occupancy, fixed for the lifetime of a list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockConfig {
    /// Maximum elements per block. A full block is split before it grows.
    pub capacity_max: usize,
    /// Minimum elements per block. The first and last blocks of a list only
    /// need to be non-empty, and the sole block of a list may be empty.
    pub capacity_min: usize,
    /// Run the structural verifier after every mutating call.
    pub check_invariants: bool,
}

impl Default for BlockConfig {
    fn default() -> Self {
        return BlockConfig::with_capacity(DEFAULT_BLOCK_CAPACITY);
    }
}

impl BlockConfig {
    /// Bounds for the given maximum, with the minimum at a third of it.
    pub fn with_capacity(capacity_max: usize) -> BlockConfig {
        return BlockConfig {
            capacity_max,
            capacity_min: (capacity_max / 3).max(1),
            check_invariants: false,
        };
    }

    pub fn capacity_min(mut self, capacity_min: usize) -> BlockConfig {
        self.capacity_min = capacity_min;
        return self;
    }

    pub fn check_invariants(mut self, enabled: bool) -> BlockConfig {
        self.check_invariants = enabled;
        return self;
    }

    /// Reject bounds the split and merge policies cannot honour.
    ///
    /// Splitting a full block must leave two halves at or above the minimum,
    /// and merging two underfull neighbours must fit in one block, which
    /// both hold when `1 <= capacity_min <= capacity_max / 2`.
    pub fn validate(&self) -> Result<()> {
        if self.capacity_max < MIN_BLOCK_CAPACITY {
            return Err(SeqError::InvalidConfig(format!(
                "capacity_max {} is below {}",
                self.capacity_max, MIN_BLOCK_CAPACITY
            )));
        }
        if self.capacity_min == 0 || self.capacity_min > self.capacity_max / 2 {
            return Err(SeqError::InvalidConfig(format!(
                "capacity_min {} must be within 1..={}",
                self.capacity_min,
                self.capacity_max / 2
            )));
        }
        return Ok(());
    }

    /// Element count at which the first or last block counts as full for
    /// inserts at that end of the list.
    ///
    /// Appending or prepending past this starts a new block instead of
    /// splitting, so sequential growth leaves blocks nearly full with a
    /// little room for later edits.
    pub fn edge_fill(&self) -> usize {
        return (self.capacity_max * EDGE_FILL_PERCENT / 100).max(1);
    }

    /// Whether the verifier should run, from either switch.
    #[inline]
    pub fn checks_enabled(&self) -> bool {
        return self.check_invariants || global_checks();
    }
}
