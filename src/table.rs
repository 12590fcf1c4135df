//! HashTable: bucket dispatch, count bookkeeping and resize.

use crate::chain::{self, Arena, EntryKey, Upsert};
use crate::config::{Capacity, CollisionPolicy, HashTableBuilder, TableOptions};
use crate::djb2::bucket_index;
use crate::error::TableError;
use core::fmt;
use log::{debug, trace, warn};

/// A string-to-string hash table with djb2 bucket selection and
/// per-bucket chaining.
///
/// The table never grows on its own; call [`resize`](Self::resize) to
/// double the bucket count.
pub struct HashTable {
    buckets: Vec<Option<EntryKey>>,
    entries: Arena,
    count: usize,
    capacity: Capacity,
    options: TableOptions,
}

impl HashTable {
    /// Create a chaining table with `capacity` empty buckets.
    ///
    /// Fails with [`TableError::InvalidCapacity`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, TableError> {
        Ok(Self::with_capacity(Capacity::new(capacity)?))
    }

    pub fn with_capacity(capacity: Capacity) -> Self {
        Self::from_parts(capacity, TableOptions::default())
    }

    /// Start configuring a table. See [`HashTableBuilder`].
    pub fn builder() -> HashTableBuilder {
        HashTableBuilder::new()
    }

    pub(crate) fn from_parts(capacity: Capacity, options: TableOptions) -> Self {
        debug!(
            "creating hash table: capacity={} policy={:?}",
            capacity, options.policy
        );
        HashTable {
            buckets: vec![None; capacity.get()],
            entries: Arena::with_key(),
            count: 0,
            capacity,
            options,
        }
    }

    #[inline]
    fn bucket_for(&self, key: &str) -> usize {
        let index = bucket_index(key, self.capacity.get());
        trace!("key {:?} -> bucket {}", key, index);
        index
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    pub fn collision_policy(&self) -> CollisionPolicy {
        self.options.policy
    }

    /// Entries per bucket.
    pub fn load_factor(&self) -> f64 {
        self.count as f64 / self.capacity.get() as f64
    }

    /// Number of entries chained in bucket `index`, or `None` if `index`
    /// is out of range.
    pub fn bucket_len(&self, index: usize) -> Option<usize> {
        let head = *self.buckets.get(index)?;
        Some(chain::iter(&self.entries, head).count())
    }

    /// Store `value` under `key`.
    ///
    /// Returns the previous value if `key` was already present; the count
    /// only grows when a new entry is created. Under
    /// [`CollisionPolicy::SingleSlot`] a different key occupying the bucket
    /// is overwritten and `None` is returned.
    pub fn insert(&mut self, key: &str, value: &str) -> Option<String> {
        let index = self.bucket_for(key);
        let head = &mut self.buckets[index];
        let outcome = match self.options.policy {
            CollisionPolicy::Chain => {
                chain::insert_or_update(&mut self.entries, head, key, value)
            }
            CollisionPolicy::SingleSlot => {
                chain::insert_single(&mut self.entries, head, key, value)
            }
        };
        if outcome.added() {
            self.count += 1;
        }
        match outcome {
            Upsert::Inserted => None,
            Upsert::Updated { previous } => {
                if self.options.warn_on_overwrite {
                    warn!("key {:?} is already in use, value will be overwritten", key);
                }
                Some(previous)
            }
            Upsert::Displaced {
                key: displaced, ..
            } => {
                warn!(
                    "key {:?} indexed into bucket {} occupied by {:?}; occupant overwritten",
                    key, index, displaced
                );
                None
            }
        }
    }

    /// Value stored under `key`, if any.
    pub fn retrieve(&self, key: &str) -> Option<&str> {
        let index = self.bucket_for(key);
        match chain::find(&self.entries, self.buckets[index], key) {
            Some(k) => Some(self.entries[k].value.as_str()),
            None => {
                trace!("key {:?} was not found in bucket {}", key, index);
                None
            }
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        let index = self.bucket_for(key);
        chain::find(&self.entries, self.buckets[index], key).is_some()
    }

    /// Remove `key`, returning its value. Removing an absent key does
    /// nothing and returns `None`.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let index = self.bucket_for(key);
        match chain::remove(&mut self.entries, &mut self.buckets[index], key) {
            Some(entry) => {
                self.count -= 1;
                Some(entry.value)
            }
            None => {
                debug!("key {:?} was not found in the hash table", key);
                None
            }
        }
    }

    /// Release every entry, keeping the bucket array.
    pub fn clear(&mut self) {
        let released = self.release_all();
        debug!("cleared {} entries", released);
    }

    /// Tear the table down, releasing every entry chain by chain. Returns
    /// how many entries were released.
    pub fn destroy(mut self) -> usize {
        let released = self.release_all();
        debug!(
            "destroyed hash table: capacity={} released={}",
            self.capacity, released
        );
        released
    }

    fn release_all(&mut self) -> usize {
        let mut released = 0;
        for head in self.buckets.iter_mut() {
            released += chain::release_chain(&mut self.entries, head);
        }
        debug_assert!(self.entries.is_empty());
        self.count = 0;
        released
    }

    /// Grow to twice the bucket count, re-bucketing every entry under the
    /// new capacity.
    ///
    /// Entries move into the new table without being copied. The old table
    /// is consumed; on error it is dropped along with its entries, which
    /// can only happen when doubling would overflow `usize`. Chain order is
    /// preserved among entries that stay together.
    pub fn resize(self) -> Result<Self, TableError> {
        let new_capacity = self.capacity.doubled()?;
        let HashTable {
            buckets: old_buckets,
            mut entries,
            count: old_count,
            capacity: old_capacity,
            options,
        } = self;

        let mut buckets: Vec<Option<EntryKey>> = vec![None; new_capacity.get()];
        let mut tails: Vec<Option<EntryKey>> = vec![None; new_capacity.get()];
        let mut count = 0;

        // Entries of old bucket i can only land in i or i + old capacity,
        // so single-slot chains stay at length one without any merging.
        for head in old_buckets {
            let mut cursor = head;
            while let Some(k) = cursor {
                cursor = entries[k].next.take();
                let index = bucket_index(&entries[k].key, new_capacity.get());
                chain::append(&mut entries, &mut buckets[index], &mut tails[index], k);
                count += 1;
            }
        }
        debug_assert_eq!(count, old_count);

        debug!(
            "resized hash table: capacity {} -> {}, count {} -> {}",
            old_capacity, new_capacity, old_count, count
        );
        Ok(HashTable {
            buckets,
            entries,
            count,
            capacity: new_capacity,
            options,
        })
    }

    /// Iterate over `(key, value)` pairs in bucket order, then chain order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            table: self,
            bucket: 0,
            cursor: None,
        }
    }

    /// Panics if the structure is inconsistent: an entry reachable twice
    /// or from the wrong bucket, an unreachable entry, a single-slot chain
    /// longer than one, or a count that disagrees with the arena.
    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        use std::collections::HashSet;

        assert_eq!(self.buckets.len(), self.capacity.get());
        let mut seen: HashSet<EntryKey> = HashSet::new();
        for (index, &head) in self.buckets.iter().enumerate() {
            let mut len = 0;
            for (k, e) in chain::iter(&self.entries, head) {
                assert!(seen.insert(k), "entry {:?} reachable twice", e.key);
                assert_eq!(
                    bucket_index(&e.key, self.capacity.get()),
                    index,
                    "entry {:?} in wrong bucket",
                    e.key
                );
                len += 1;
            }
            if self.options.policy == CollisionPolicy::SingleSlot {
                assert!(len <= 1, "single-slot bucket {} holds {}", index, len);
            }
        }
        assert_eq!(seen.len(), self.entries.len(), "unreachable entries");
        assert_eq!(self.count, self.entries.len(), "count out of sync");
    }
}

/// Iterator over `(key, value)` pairs of a [`HashTable`].
pub struct Iter<'a> {
    table: &'a HashTable,
    bucket: usize,
    cursor: Option<EntryKey>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let table = self.table;
        loop {
            if let Some(k) = self.cursor {
                let entry = &table.entries[k];
                self.cursor = entry.next;
                return Some((entry.key.as_str(), entry.value.as_str()));
            }
            let head = table.buckets.get(self.bucket)?;
            self.cursor = *head;
            self.bucket += 1;
        }
    }
}

impl<'a> IntoIterator for &'a HashTable {
    type Item = (&'a str, &'a str);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Debug for HashTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashTable")
            .field("capacity", &self.capacity.get())
            .field("count", &self.count)
            .field("policy", &self.options.policy)
            .field("entries", &DebugEntries(self))
            .finish()
    }
}

struct DebugEntries<'a>(&'a HashTable);

impl fmt::Debug for DebugEntries<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.iter()).finish()
    }
}
