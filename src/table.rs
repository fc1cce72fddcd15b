use crate::objects::Value;
use core::hash::{BuildHasher, Hash, Hasher};
use hashbrown::HashMap;
use std::rc::Rc;

/// A hash table keyed by interned strings, used for the globals table
/// and the string intern pool.
pub struct Table {
    entries: HashMap<Rc<str>, Value>,
}

impl Table {
    /// Creates an empty table.
    pub fn new() -> Self {
        Table {
            entries: HashMap::new(),
        }
    }

    /// Inserts or overwrites an entry.
    ///
    /// # Returns
    /// `bool` – True when the key was not present before this call.
    pub fn set(&mut self, key: Rc<str>, value: Value) -> bool {
        self.entries.insert(key, value).is_none()
    }

    /// Looks up the value stored under a key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Removes an entry.
    ///
    /// # Returns
    /// `bool` – True when an entry was actually removed.
    pub fn delete(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Copies every entry of another table into this one.
    pub fn add_all(&mut self, other: &Table) {
        for (key, value) in other.entries.iter() {
            self.entries.insert(key.clone(), value.clone());
        }
    }

    /// Hashes raw string contents with this table's hasher, for use with
    /// `find_with_hash`.
    pub fn hash_of(&self, contents: &str) -> u64 {
        let mut state = self.entries.hasher().build_hasher();
        contents.hash(&mut state);
        state.finish()
    }

    /// Looks up a key by raw contents and a precomputed hash, without
    /// building a key object first. Returns the stored key handle.
    pub fn find_with_hash(&self, contents: &str, hash: u64) -> Option<Rc<str>> {
        self.entries
            .raw_entry()
            .from_hash(hash, |key| &**key == contents)
            .map(|(key, _)| key.clone())
    }

    /// The number of entries in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
