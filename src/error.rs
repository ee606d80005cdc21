//! Error types surfaced by the table and set operations.
//!
//! Every failure in this crate is synchronous and local to the call that
//! produced it. Nothing is retried or recovered internally: the table never
//! grows to absorb a capacity overrun, and a misused cursor reports its state
//! error and leaves the set untouched.

use thiserror::Error;

/// The `bits` capacity parameter passed at construction was out of range.
///
/// A table holds `2^bits` slots and only accepts `bits` in
/// [`MIN_BITS`](crate::table::MIN_BITS)`..=`[`MAX_BITS`](crate::table::MAX_BITS).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("capacity bits must be in 2..=31, got {bits}")]
pub struct InvalidBits {
    /// The rejected `bits` value.
    pub bits: u32,
}

/// An insert found every slot occupied by a live element.
///
/// The table never resizes, so this signals a capacity-planning defect in the
/// caller: the chosen `bits` was too small for the working set. The insert
/// that failed did not modify the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("table is full ({capacity} slots, all occupied)")]
pub struct CapacityExceeded {
    /// Total slot count of the full table.
    pub capacity: usize,
}

/// A cursor operation was called in a state that cannot honor it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CursorError {
    /// `next` was called after the cursor yielded every element it was
    /// created over.
    #[error("cursor is exhausted")]
    Exhausted,

    /// `remove` was called with no element pending removal: either `next` has
    /// not been called yet, or the last yielded element was already removed.
    #[error("no element pending removal; call next first")]
    NothingToRemove,
}
