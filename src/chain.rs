//! Entries and per-bucket chain operations.
//!
//! Entries live in a single `SlotMap` arena owned by the table. A bucket
//! stores the key of its chain's head; each entry stores a non-owning link
//! to its successor. Chains are strictly linear: every entry is reachable
//! from exactly one head, at exactly one position.
//!
//! None of the functions here know about hashing or counts. They take the
//! arena and a mutable head, relink as needed, and report what happened so
//! the table can keep its bookkeeping.

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Generational key of an entry in the arena.
    pub(crate) struct EntryKey;
}

pub(crate) type Arena = SlotMap<EntryKey, Entry>;

#[derive(Debug)]
pub(crate) struct Entry {
    pub(crate) key: String,
    pub(crate) value: String,
    pub(crate) next: Option<EntryKey>,
}

impl Entry {
    /// Build an unlinked entry owning its own copies of `key` and `value`.
    pub(crate) fn new(key: &str, value: &str) -> Self {
        Entry {
            key: key.to_owned(),
            value: value.to_owned(),
            next: None,
        }
    }
}

/// Release `entry` from the arena. Does not touch the chain around it;
/// callers unlink first.
pub(crate) fn destroy(arena: &mut Arena, entry: EntryKey) -> Option<Entry> {
    arena.remove(entry)
}

/// Result of writing a key/value pair into a chain.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Upsert {
    /// A new entry was created.
    Inserted,
    /// An entry with the same key existed; its value was replaced.
    Updated { previous: String },
    /// A different key occupied the slot and was overwritten in place.
    Displaced { key: String, value: String },
}

impl Upsert {
    #[inline]
    pub(crate) fn added(&self) -> bool {
        matches!(self, Upsert::Inserted)
    }
}

/// Update the entry for `key` if the chain has one, otherwise append a
/// new entry at the tail. Colliding keys keep their insertion order.
pub(crate) fn insert_or_update(
    arena: &mut Arena,
    head: &mut Option<EntryKey>,
    key: &str,
    value: &str,
) -> Upsert {
    let mut tail = None;
    let mut cursor = *head;
    while let Some(k) = cursor {
        let entry = &mut arena[k];
        if entry.key == key {
            let previous = core::mem::replace(&mut entry.value, value.to_owned());
            return Upsert::Updated { previous };
        }
        tail = Some(k);
        cursor = entry.next;
    }

    let new = arena.insert(Entry::new(key, value));
    match tail {
        Some(t) => arena[t].next = Some(new),
        None => *head = Some(new),
    }
    Upsert::Inserted
}

/// Single-slot write: the chain never grows past one entry. A different
/// key already in the slot is overwritten along with its value.
pub(crate) fn insert_single(
    arena: &mut Arena,
    head: &mut Option<EntryKey>,
    key: &str,
    value: &str,
) -> Upsert {
    let Some(k) = *head else {
        *head = Some(arena.insert(Entry::new(key, value)));
        return Upsert::Inserted;
    };
    let entry = &mut arena[k];
    debug_assert!(entry.next.is_none(), "single-slot chain longer than one");
    let previous = core::mem::replace(&mut entry.value, value.to_owned());
    if entry.key == key {
        Upsert::Updated { previous }
    } else {
        let displaced = core::mem::replace(&mut entry.key, key.to_owned());
        Upsert::Displaced {
            key: displaced,
            value: previous,
        }
    }
}

/// First entry in the chain whose key equals `key`.
pub(crate) fn find(arena: &Arena, head: Option<EntryKey>, key: &str) -> Option<EntryKey> {
    iter(arena, head).find(|(_, e)| e.key == key).map(|(k, _)| k)
}

/// Unlink and destroy the entry for `key`. Returns `None`, leaving the
/// chain untouched, when no entry matches.
pub(crate) fn remove(arena: &mut Arena, head: &mut Option<EntryKey>, key: &str) -> Option<Entry> {
    let mut prev: Option<EntryKey> = None;
    let mut cursor = *head;
    while let Some(k) = cursor {
        let next = arena[k].next;
        if arena[k].key == key {
            match prev {
                None => *head = next,
                Some(p) => arena[p].next = next,
            }
            return destroy(arena, k);
        }
        prev = Some(k);
        cursor = next;
    }
    None
}

/// Link an already-allocated, detached entry after `tail`. Used while
/// re-bucketing, where entries move between chains without being copied.
pub(crate) fn append(
    arena: &mut Arena,
    head: &mut Option<EntryKey>,
    tail: &mut Option<EntryKey>,
    entry: EntryKey,
) {
    arena[entry].next = None;
    match *tail {
        Some(t) => arena[t].next = Some(entry),
        None => *head = Some(entry),
    }
    *tail = Some(entry);
}

/// Destroy every entry of the chain and empty the head. Returns how many
/// entries were released.
pub(crate) fn release_chain(arena: &mut Arena, head: &mut Option<EntryKey>) -> usize {
    let mut released = 0;
    let mut cursor = head.take();
    while let Some(k) = cursor {
        cursor = destroy(arena, k).and_then(|e| e.next);
        released += 1;
    }
    released
}

/// Walks one chain from its head.
pub(crate) struct ChainIter<'a> {
    arena: &'a Arena,
    cursor: Option<EntryKey>,
}

impl<'a> Iterator for ChainIter<'a> {
    type Item = (EntryKey, &'a Entry);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let k = self.cursor?;
        let entry = self.arena.get(k)?;
        self.cursor = entry.next;
        Some((k, entry))
    }
}

pub(crate) fn iter(arena: &Arena, head: Option<EntryKey>) -> ChainIter<'_> {
    ChainIter {
        arena,
        cursor: head,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(arena: &Arena, head: Option<EntryKey>) -> Vec<&str> {
        iter(arena, head).map(|(_, e)| e.key.as_str()).collect()
    }

    /// Invariant: entries own copies; mutating the caller's buffers later
    /// does not affect the stored pair.
    #[test]
    fn entry_owns_copies() {
        let mut k = String::from("key");
        let mut v = String::from("value");
        let e = Entry::new(&k, &v);
        k.push('!');
        v.clear();
        assert_eq!(e.key, "key");
        assert_eq!(e.value, "value");
        assert!(e.next.is_none());
    }

    /// Invariant: new keys append at the tail, preserving insertion order.
    #[test]
    fn insert_appends_in_order() {
        let mut arena = Arena::with_key();
        let mut head = None;
        for k in ["a", "b", "c"] {
            assert_eq!(insert_or_update(&mut arena, &mut head, k, "v"), Upsert::Inserted);
        }
        assert_eq!(keys(&arena, head), ["a", "b", "c"]);
        assert_eq!(arena.len(), 3);
    }

    /// Invariant: an existing key is updated in place, not appended.
    #[test]
    fn insert_existing_key_updates() {
        let mut arena = Arena::with_key();
        let mut head = None;
        insert_or_update(&mut arena, &mut head, "a", "1");
        insert_or_update(&mut arena, &mut head, "b", "2");
        let r = insert_or_update(&mut arena, &mut head, "b", "3");
        assert_eq!(
            r,
            Upsert::Updated {
                previous: "2".to_string()
            }
        );
        assert!(!r.added());
        assert_eq!(keys(&arena, head), ["a", "b"]);
        let b = find(&arena, head, "b").unwrap();
        assert_eq!(arena[b].value, "3");
    }

    #[test]
    fn find_on_empty_and_missing() {
        let mut arena = Arena::with_key();
        assert!(find(&arena, None, "a").is_none());
        let mut head = None;
        insert_or_update(&mut arena, &mut head, "a", "1");
        assert!(find(&arena, head, "ab").is_none());
        assert!(find(&arena, head, "a").is_some());
    }

    /// Invariant: removing the head promotes its successor; removing from
    /// the middle or tail splices the predecessor past it.
    #[test]
    fn remove_head_middle_tail() {
        let mut arena = Arena::with_key();
        let mut head = None;
        for k in ["a", "b", "c", "d"] {
            insert_or_update(&mut arena, &mut head, k, k);
        }

        let removed = remove(&mut arena, &mut head, "a").unwrap();
        assert_eq!((removed.key.as_str(), removed.value.as_str()), ("a", "a"));
        assert_eq!(keys(&arena, head), ["b", "c", "d"]);

        remove(&mut arena, &mut head, "c").unwrap();
        assert_eq!(keys(&arena, head), ["b", "d"]);

        remove(&mut arena, &mut head, "d").unwrap();
        assert_eq!(keys(&arena, head), ["b"]);

        remove(&mut arena, &mut head, "b").unwrap();
        assert!(head.is_none());
        assert!(arena.is_empty());
    }

    /// Invariant: removing an absent key is a no-op.
    #[test]
    fn remove_missing_is_noop() {
        let mut arena = Arena::with_key();
        let mut head = None;
        assert!(remove(&mut arena, &mut head, "a").is_none());
        insert_or_update(&mut arena, &mut head, "a", "1");
        insert_or_update(&mut arena, &mut head, "b", "2");
        assert!(remove(&mut arena, &mut head, "z").is_none());
        assert_eq!(keys(&arena, head), ["a", "b"]);
        assert_eq!(arena.len(), 2);
    }

    /// Invariant: the single-slot writer never grows the chain and reports
    /// the key it displaced.
    #[test]
    fn single_slot_displaces() {
        let mut arena = Arena::with_key();
        let mut head = None;
        assert_eq!(insert_single(&mut arena, &mut head, "a", "1"), Upsert::Inserted);
        assert_eq!(
            insert_single(&mut arena, &mut head, "a", "2"),
            Upsert::Updated {
                previous: "1".to_string()
            }
        );
        assert_eq!(
            insert_single(&mut arena, &mut head, "b", "3"),
            Upsert::Displaced {
                key: "a".to_string(),
                value: "2".to_string()
            }
        );
        assert_eq!(keys(&arena, head), ["b"]);
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn append_and_release() {
        let mut arena = Arena::with_key();
        let a = arena.insert(Entry::new("a", "1"));
        let b = arena.insert(Entry::new("b", "2"));
        let (mut head, mut tail) = (None, None);
        append(&mut arena, &mut head, &mut tail, a);
        append(&mut arena, &mut head, &mut tail, b);
        assert_eq!(keys(&arena, head), ["a", "b"]);
        assert_eq!(tail, Some(b));

        assert_eq!(release_chain(&mut arena, &mut head), 2);
        assert!(head.is_none());
        assert!(arena.is_empty());
        assert_eq!(release_chain(&mut arena, &mut head), 0);
    }
}
