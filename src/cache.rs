//! Memoization of parsed and normalized path data.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::Hash;
use std::rc::Rc;

use crate::normalize::normalize;
use crate::path_data::PathData;

/// Caches the results of parsing and normalizing path strings, by a caller-chosen key.
///
/// Keys are usually element ids.  The cache does not look at the path string once a
/// key has a value: call [`PathCache::invalidate`] when the string for a key changes.
pub struct PathCache<K> {
    parsed: HashMap<K, Rc<PathData>>,
    normalized: HashMap<K, Rc<PathData>>,
}

impl<K: Hash + Eq + Clone> PathCache<K> {
    pub fn new() -> PathCache<K> {
        PathCache {
            parsed: Default::default(),
            normalized: Default::default(),
        }
    }

    /// Returns the parsed path data for `key`, parsing `path_str` the first time.
    pub fn get_or_parse(&mut self, key: K, path_str: &str) -> Rc<PathData> {
        match self.parsed.entry(key) {
            Entry::Occupied(e) => e.get().clone(),
            Entry::Vacant(e) => e.insert(Rc::new(PathData::parse(path_str))).clone(),
        }
    }

    /// Returns the normalized path data for `key`, computing it the first time.
    ///
    /// The parsed data for `key` is cached along the way.
    pub fn get_or_normalize(&mut self, key: K, path_str: &str) -> Rc<PathData> {
        if let Some(data) = self.normalized.get(&key) {
            return data.clone();
        }

        let parsed = self.get_or_parse(key.clone(), path_str);
        let data = Rc::new(normalize(&parsed));
        self.normalized.insert(key, data.clone());
        data
    }

    /// Forgets everything cached for `key`.
    pub fn invalidate(&mut self, key: &K) {
        self.parsed.remove(key);
        self.normalized.remove(key);
    }

    pub fn clear(&mut self) {
        self.parsed.clear();
        self.normalized.clear();
    }

    /// Number of keys with cached data.
    pub fn len(&self) -> usize {
        self.parsed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parsed.is_empty()
    }
}

impl<K: Hash + Eq + Clone> Default for PathCache<K> {
    fn default() -> PathCache<K> {
        PathCache::new()
    }
}
