//! Chained hash set with a pluggable hash/equality pair.
//!
//! The bucket array is sized once at construction and never grows. Elements
//! are compared with the configured equality function only; a matching hash
//! is never taken as proof of membership on its own.

use std::hash::{DefaultHasher, Hash, Hasher};
use std::ops::ControlFlow;

/// Bucket count used when the caller does not pick one.
pub const DEFAULT_BUCKETS: usize = 200;

struct Slot<T> {
    hash: u64,
    value: T,
}

pub struct HashSet<T> {
    buckets: Vec<Vec<Slot<T>>>,
    len: usize,
    hash: fn(&T) -> u64,
    eq: fn(&T, &T) -> bool,
}

fn std_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

impl<T: Hash + Eq> Default for HashSet<T> {
    fn default() -> Self {
        Self::new(std_hash::<T>)
    }
}

impl<T: PartialEq> HashSet<T> {
    /// Builds a set hashing with `hash` and comparing with `T`'s own `==`.
    pub fn new(hash: fn(&T) -> u64) -> Self {
        Self::with_equality(hash, <T as PartialEq>::eq)
    }
}

impl<T> HashSet<T> {
    pub fn with_equality(hash: fn(&T) -> u64, eq: fn(&T, &T) -> bool) -> Self {
        Self::with_buckets(DEFAULT_BUCKETS, hash, eq)
    }

    /// A `buckets` of zero falls back to [`DEFAULT_BUCKETS`].
    pub fn with_buckets(buckets: usize, hash: fn(&T) -> u64, eq: fn(&T, &T) -> bool) -> Self {
        let buckets = if buckets == 0 { DEFAULT_BUCKETS } else { buckets };
        Self {
            buckets: (0..buckets).map(|_| Vec::new()).collect(),
            len: 0,
            hash,
            eq,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn bucket_index(&self, hash: u64) -> usize {
        (hash % self.buckets.len() as u64) as usize
    }

    fn position(&self, value: &T) -> (usize, u64, Option<usize>) {
        let hash = (self.hash)(value);
        let bucket = self.bucket_index(hash);
        let slot = self.buckets[bucket]
            .iter()
            .position(|slot| slot.hash == hash && (self.eq)(&slot.value, value));
        (bucket, hash, slot)
    }

    /// Inserts `value` unless an equal element is already present.
    ///
    /// Returns `true` when the value was inserted. A rejected value is dropped.
    pub fn add(&mut self, value: T) -> bool {
        let (bucket, hash, existing) = self.position(&value);
        if existing.is_some() {
            return false;
        }
        self.buckets[bucket].push(Slot { hash, value });
        self.len += 1;
        true
    }

    /// Removes and drops the stored element equal to `value`, if any.
    pub fn remove(&mut self, value: &T) -> bool {
        let (bucket, _, existing) = self.position(value);
        match existing {
            Some(slot) => {
                self.buckets[bucket].swap_remove(slot);
                self.len -= 1;
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, value: &T) -> bool {
        self.position(value).2.is_some()
    }

    /// Visits every element in bucket order until `visit` breaks.
    pub fn for_each_until<B, F>(&self, mut visit: F) -> ControlFlow<B>
    where
        F: FnMut(&T) -> ControlFlow<B>,
    {
        for slot in self.buckets.iter().flatten() {
            if let ControlFlow::Break(signal) = visit(&slot.value) {
                return ControlFlow::Break(signal);
            }
        }
        ControlFlow::Continue(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.buckets.iter().flatten().map(|slot| &slot.value)
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for HashSet<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
