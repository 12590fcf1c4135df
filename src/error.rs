//! Error types for table construction and growth.
//!
//! Absent keys are not errors: lookups return `Option` and removals of a
//! missing key are no-ops.

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableError {
    /// A table needs at least one bucket.
    #[error("invalid capacity {requested}: a table needs at least one bucket")]
    InvalidCapacity { requested: i64 },
    /// Doubling the bucket count would overflow `usize`.
    #[error("cannot grow table beyond {capacity} buckets")]
    CapacityOverflow { capacity: usize },
}
