//! Construction-time configuration: validated capacity, collision policy
//! and the [`HashTableBuilder`].

use crate::error::TableError;
use crate::table::HashTable;
use core::fmt;

/// A bucket count known to be at least one.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Capacity(usize);

impl Capacity {
    pub fn new(buckets: usize) -> Result<Self, TableError> {
        if buckets < 1 {
            return Err(TableError::InvalidCapacity { requested: 0 });
        }
        Ok(Capacity(buckets))
    }

    #[inline]
    pub fn get(self) -> usize {
        self.0
    }

    /// The capacity a resize grows to.
    pub fn doubled(self) -> Result<Self, TableError> {
        self.0
            .checked_mul(2)
            .map(Capacity)
            .ok_or(TableError::CapacityOverflow { capacity: self.0 })
    }
}

impl TryFrom<usize> for Capacity {
    type Error = TableError;

    fn try_from(buckets: usize) -> Result<Self, Self::Error> {
        Capacity::new(buckets)
    }
}

impl TryFrom<i64> for Capacity {
    type Error = TableError;

    fn try_from(requested: i64) -> Result<Self, Self::Error> {
        if requested < 1 {
            return Err(TableError::InvalidCapacity { requested });
        }
        usize::try_from(requested)
            .map(Capacity)
            .map_err(|_| TableError::InvalidCapacity { requested })
    }
}

impl TryFrom<i32> for Capacity {
    type Error = TableError;

    fn try_from(requested: i32) -> Result<Self, Self::Error> {
        Capacity::try_from(i64::from(requested))
    }
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// How a bucket treats an insert whose key differs from the keys already
/// stored there.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum CollisionPolicy {
    /// Append to the bucket's chain. Every distinct key is kept.
    #[default]
    Chain,
    /// Each bucket holds at most one entry. A colliding insert replaces
    /// the occupant's key and value; the displaced key is lost.
    SingleSlot,
}

/// A builder for a [`HashTable`].
///
/// ```rust
/// use chained_table::{CollisionPolicy, HashTable};
///
/// let table = HashTable::builder()
///     .capacity(16)
///     .collision_policy(CollisionPolicy::Chain)
///     .warn_on_overwrite(false)
///     .build()
///     .unwrap();
/// assert_eq!(table.capacity(), 16);
/// ```
#[derive(Clone)]
pub struct HashTableBuilder {
    capacity: usize,
    policy: CollisionPolicy,
    warn_on_overwrite: bool,
}

impl HashTableBuilder {
    pub(crate) const DEFAULT_CAPACITY: usize = 16;

    pub(crate) fn new() -> Self {
        HashTableBuilder {
            capacity: Self::DEFAULT_CAPACITY,
            policy: CollisionPolicy::default(),
            warn_on_overwrite: true,
        }
    }

    /// Set the number of buckets. Zero is rejected by [`build`](Self::build).
    pub fn capacity(self, capacity: usize) -> Self {
        HashTableBuilder { capacity, ..self }
    }

    /// Set the collision policy. See [`CollisionPolicy`] for details.
    pub fn collision_policy(self, policy: CollisionPolicy) -> Self {
        HashTableBuilder { policy, ..self }
    }

    /// Log a warning whenever an insert replaces an existing value.
    /// Enabled by default.
    pub fn warn_on_overwrite(self, warn_on_overwrite: bool) -> Self {
        HashTableBuilder {
            warn_on_overwrite,
            ..self
        }
    }

    /// Construct a [`HashTable`] from the configured options.
    pub fn build(self) -> Result<HashTable, TableError> {
        let capacity = Capacity::new(self.capacity)?;
        Ok(HashTable::from_parts(
            capacity,
            TableOptions {
                policy: self.policy,
                warn_on_overwrite: self.warn_on_overwrite,
            },
        ))
    }
}

impl Default for HashTableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HashTableBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashTableBuilder")
            .field("capacity", &self.capacity)
            .field("policy", &self.policy)
            .field("warn_on_overwrite", &self.warn_on_overwrite)
            .finish()
    }
}

/// Options that survive a resize.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct TableOptions {
    pub(crate) policy: CollisionPolicy,
    pub(crate) warn_on_overwrite: bool,
}

impl Default for TableOptions {
    fn default() -> Self {
        TableOptions {
            policy: CollisionPolicy::Chain,
            warn_on_overwrite: true,
        }
    }
}
