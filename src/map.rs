//! Open-addressing hash table with linear probing and prime capacities.
//!
//! Keys are hashed with XXH3-64 over their bytes, so the slot layout of a
//! table depends only on its insertion history. Capacity is always prime and
//! grows to `next_prime(2 * capacity)` once an insertion would push the load
//! factor past 0.7.
//!
//! There is no removal. `get` stops probing at the first empty slot, which is
//! only sound while slots never go from occupied back to empty; adding removal
//! needs tombstones or backward-shift deletion alongside it.

use std::{iter::Flatten, mem, vec};

use log::debug;
use xxhash_rust::xxh3::xxh3_64;

use crate::{error::MapError, prime::next_prime};

/// Capacity of a table built with [`Map::new`].
pub const DEFAULT_CAPACITY: usize = 103;

const LOAD_NUMERATOR: usize = 7;
const LOAD_DENOMINATOR: usize = 10;

#[derive(Debug, Clone)]
pub struct Entry<K, V> {
    hash: u64,
    pub key: K,
    pub value: V,
}

#[derive(Debug, Clone)]
pub struct Map<K, V> {
    table: Vec<Option<Entry<K, V>>>,
    count: usize,
}

#[inline]
fn hash_key<K: AsRef<[u8]>>(key: &K) -> u64 {
    xxh3_64(key.as_ref())
}

fn empty_table<K, V>(capacity: usize) -> Vec<Option<Entry<K, V>>> {
    let mut table = Vec::with_capacity(capacity);
    table.resize_with(capacity, || None);
    table
}

impl<K: AsRef<[u8]> + Eq, V> Default for Map<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: AsRef<[u8]> + Eq, V> Map<K, V> {
    pub fn new() -> Self {
        Self {
            table: empty_table(DEFAULT_CAPACITY),
            count: 0,
        }
    }

    /// Table with room for at least `capacity` slots, rounded up to a prime.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            table: empty_table(next_prime(capacity)),
            count: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.table.len()
    }

    pub fn load_factor(&self) -> f64 {
        self.count as f64 / self.table.len() as f64
    }

    /// Occupied entries in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.table
            .iter()
            .flatten()
            .map(|entry| (&entry.key, &entry.value))
    }

    /// Index of the slot holding `key`, or of the empty slot that ends its
    /// probe sequence. `None` once every slot has been visited.
    fn find_slot(&self, hash: u64, key: &K) -> Option<usize> {
        let capacity = self.table.len();
        let mut slot = (hash % capacity as u64) as usize;
        for _ in 0..capacity {
            match &self.table[slot] {
                Some(entry) if entry.hash == hash && entry.key == *key => return Some(slot),
                Some(_) => slot = (slot + 1) % capacity,
                None => return Some(slot),
            }
        }
        None
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        let slot = self.find_slot(hash_key(key), key)?;
        self.table[slot].as_ref().map(|entry| &entry.value)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let slot = self.find_slot(hash_key(key), key)?;
        self.table[slot].as_mut().map(|entry| &mut entry.value)
    }

    /// Inserts `key` or overwrites its value.
    ///
    /// The growth check runs first, before the key is looked up, so
    /// overwriting an existing key may still grow the table.
    pub fn put(&mut self, key: K, value: V) -> Result<(), MapError> {
        if self.needs_growth() {
            self.resize()?;
        }
        self.insert_hashed(hash_key(&key), key, value)
    }

    /// True when one more occupied slot would exceed the 0.7 load factor.
    #[inline]
    fn needs_growth(&self) -> bool {
        (self.count + 1) * LOAD_DENOMINATOR > self.table.len() * LOAD_NUMERATOR
    }

    fn insert_hashed(&mut self, hash: u64, key: K, value: V) -> Result<(), MapError> {
        let capacity = self.table.len();
        let slot = self
            .find_slot(hash, &key)
            .ok_or(MapError::Full { capacity })?;
        match &mut self.table[slot] {
            Some(entry) => entry.value = value,
            None => {
                self.table[slot] = Some(Entry { hash, key, value });
                self.count += 1;
            }
        }
        Ok(())
    }

    /// Moves every entry into a table of `next_prime(2 * capacity)` slots.
    /// Entries keep their cached hash and are re-probed against the new size.
    fn resize(&mut self) -> Result<(), MapError> {
        let capacity = next_prime(2 * self.table.len());
        debug!(
            "growing table from {} to {} slots ({} entries)",
            self.table.len(),
            capacity,
            self.count
        );
        let old = mem::replace(&mut self.table, empty_table(capacity));
        self.count = 0;
        for entry in old.into_iter().flatten() {
            self.insert_hashed(entry.hash, entry.key, entry.value)?;
        }
        Ok(())
    }
}

impl<K, V> IntoIterator for Map<K, V> {
    type Item = (K, V);
    type IntoIter =
        std::iter::Map<Flatten<vec::IntoIter<Option<Entry<K, V>>>>, fn(Entry<K, V>) -> (K, V)>;

    /// Consumes the table, yielding entries in slot order.
    fn into_iter(self) -> Self::IntoIter {
        let into_pair: fn(Entry<K, V>) -> (K, V) = |entry| (entry.key, entry.value);
        self.table.into_iter().flatten().map(into_pair)
    }
}
