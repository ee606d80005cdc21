#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

pub mod error;

/// A fixed-capacity hash set over the open-addressing table.
///
/// This module provides a `ProbeSet` that wraps the `ProbeTable` and pairs
/// it with a configurable hasher builder.
pub mod set;

pub mod table;

pub use error::CapacityExceeded;
pub use error::CursorError;
pub use error::InvalidBits;
pub use set::DefaultHashBuilder;
pub use set::ProbeSet;
pub use table::ProbeTable;
