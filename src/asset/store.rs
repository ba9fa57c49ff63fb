//! Raw store: fingerprint -> fragment.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use super::Fragment;

/// Concurrency-safe map from fingerprint to fragment.
///
/// Entries are shared as `Arc<Fragment>` so a lookup never keeps the lock
/// while the caller reads a file or fetches a URL.
#[derive(Debug, Default)]
pub struct RawStore {
    fragments: RwLock<FxHashMap<u32, Arc<Fragment>>>,
}

impl RawStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the fragment for `fingerprint`.
    pub fn store(&self, fingerprint: u32, fragment: Fragment) {
        self.fragments.write().insert(fingerprint, Arc::new(fragment));
    }

    /// Fingerprint `fragment`, store it and return the fingerprint.
    pub fn insert(&self, fragment: Fragment) -> u32 {
        let fingerprint = fragment.fingerprint();
        self.store(fingerprint, fragment);
        fingerprint
    }

    pub fn lookup(&self, fingerprint: u32) -> Option<Arc<Fragment>> {
        self.fragments.read().get(&fingerprint).cloned()
    }

    /// Evict one entry; bundles referencing it fail to build afterwards.
    pub fn remove(&self, fingerprint: u32) -> Option<Arc<Fragment>> {
        self.fragments.write().remove(&fingerprint)
    }

    pub fn len(&self) -> usize {
        self.fragments.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_deduplicates() {
        let store = RawStore::new();
        let a = store.insert(Fragment::inline(".a{}"));
        let b = store.insert(Fragment::inline(".a{}"));
        assert_eq!(a, b);
        assert_eq!(store.len(), 1);
        assert_eq!(store.lookup(a).unwrap().payload(), b".a{}");
    }

    #[test]
    fn test_lookup_missing() {
        let store = RawStore::new();
        assert!(store.is_empty());
        assert!(store.lookup(42).is_none());
    }

    #[test]
    fn test_remove() {
        let store = RawStore::new();
        let fp = store.insert(Fragment::file("/tmp/x.css"));
        assert!(store.remove(fp).is_some());
        assert!(store.lookup(fp).is_none());
    }

    #[test]
    fn test_concurrent_writers() {
        let store = RawStore::new();
        std::thread::scope(|s| {
            for i in 0..8 {
                let store = &store;
                s.spawn(move || {
                    for j in 0..100 {
                        store.insert(Fragment::inline(format!(".c{}{{}}", i * 100 + j)));
                    }
                });
            }
        });
        assert_eq!(store.len(), 800);
    }
}
