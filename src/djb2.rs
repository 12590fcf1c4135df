//! djb2 string hashing.
//!
//! The accumulator starts at 5381 and absorbs each byte as
//! `acc * 33 + byte`, wrapping on a 64-bit unsigned integer. Bucket
//! indices are the accumulator reduced modulo the table capacity. The
//! exact arithmetic is part of the table's contract: two tables only agree
//! on bucket placement if they hash identically.

const SEED: u64 = 5381;

/// Raw djb2 accumulator for `key`.
#[inline]
pub fn djb2(key: &str) -> u64 {
    key.as_bytes().iter().fold(SEED, |acc, &c| {
        (acc << 5).wrapping_add(acc).wrapping_add(u64::from(c))
    })
}

/// Bucket index for `key` in a table with `max` buckets, in `[0, max)`.
///
/// `max` must be non-zero; `HashTable` guarantees this through `Capacity`.
#[inline]
pub fn bucket_index(key: &str, max: usize) -> usize {
    debug_assert!(max > 0, "bucket_index called with zero buckets");
    // usize -> u64 is lossless on every supported target, and the result
    // is < max so the narrowing back is too.
    (djb2(key) % max as u64) as usize
}
