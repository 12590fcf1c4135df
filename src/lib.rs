//! chained-table: a single-threaded string hash table with djb2 bucket
//! selection, separate chaining, and explicit capacity-doubling resize.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: keep the algorithmic decisions (hashing, collision handling,
//!   duplicate-key updates, growth) in small layers that can be checked
//!   independently.
//! - Layers:
//!   - `djb2`: the string hash and its reduction to a bucket index.
//!   - `chain`: entries stored in a `SlotMap` arena, singly linked by
//!     generational keys; insert-or-update, find and remove on one chain.
//!   - `HashTable`: bucket array, count bookkeeping, resize, and the
//!     public API.
//!
//! Constraints
//! - Keys and values are owned `String` copies of what the caller passed.
//! - Keys compare by exact byte equality.
//! - Inserting an existing key replaces its value; the count is unchanged.
//! - Colliding keys are appended at the tail of their chain, so a chain
//!   lists its keys in insertion order.
//! - No automatic growth and no shrink on removal. `resize` doubles the
//!   bucket count and is invoked by the caller.
//!
//! Ownership
//! - The arena owns every entry. A bucket holds its chain's head key and
//!   each entry holds its successor's key; links never own.
//! - `resize` consumes the table and moves the arena into the new one, so
//!   entries are relinked rather than copied and the old table cannot be
//!   used afterwards.
//!
//! Collision policy
//! - `CollisionPolicy::Chain` (default) keeps every distinct key.
//! - `CollisionPolicy::SingleSlot` caps chains at one entry; a colliding
//!   insert overwrites the occupant and logs a warning. Lookups still
//!   compare keys, so a displaced key reads as absent.
//!
//! Notes and non-goals
//! - Single-threaded; no interior mutability and no locking.
//! - Absent keys are not errors. The only construction error is a bucket
//!   count below one.
//! - The overwrite warning on duplicate-key insert is a `log` record and
//!   can be disabled through the builder.

mod chain;
pub mod config;
pub mod djb2;
mod error;
mod table;
mod table_proptest;

// Public surface
pub use config::{Capacity, CollisionPolicy, HashTableBuilder};
pub use error::TableError;
pub use table::{HashTable, Iter};
