//! Lazily-loaded sequence record headers.
//!
//! Record headers (sizes, N-blocks, mask blocks) are parsed the first time a contig is
//! queried and kept for the lifetime of the reader. The lock is never held across an
//! `.await`; two concurrent first queries for the same contig may both parse the header,
//! and the second insert simply replaces an identical value.

use indexmap::IndexMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::header::SequenceHeader;

/// A cache of parsed [`SequenceHeader`]s, keyed by contig name.
#[derive(Debug, Default)]
pub struct HeaderCache {
    entries: Mutex<IndexMap<String, Arc<SequenceHeader>>>,
}

impl HeaderCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, IndexMap<String, Arc<SequenceHeader>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return a `bool` indicating whether the specified `key` is cached.
    pub fn is_loaded(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<Arc<SequenceHeader>> {
        self.lock().get(key).cloned()
    }

    pub fn insert(&self, key: &str, header: Arc<SequenceHeader>) {
        self.lock().insert(key.to_string(), header);
    }

    /// Clear out the cache.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::HeaderCache;
    use crate::twobit::header::SequenceHeader;

    fn header(dna_size: u32) -> Arc<SequenceHeader> {
        Arc::new(SequenceHeader {
            dna_size,
            n_blocks: Vec::new(),
            mask_blocks: Vec::new(),
            dna_offset: 0,
        })
    }

    #[test]
    fn test_cache_load_and_clear() {
        let cache = HeaderCache::new();
        assert!(cache.is_empty());
        assert!(!cache.is_loaded("chr1"));

        cache.insert("chr1", header(10));
        cache.insert("chr2", header(20));
        assert!(cache.is_loaded("chr1"));
        assert_eq!(cache.get("chr2").unwrap().dna_size, 20);
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.get("chr1").is_none());
    }
}
