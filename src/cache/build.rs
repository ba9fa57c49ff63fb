//! Single-flight build cache keyed by bundle identity.
//!
//! The first caller for a missing identity becomes the builder; every
//! concurrent caller for the same identity blocks on that build's slot.
//! Claiming is one `DashMap::entry` call, so the miss check and the
//! placeholder insertion happen under a single shard lock. Callers for
//! other identities only contend on the shard lock for that instant.

use std::path::PathBuf;
use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use super::slot::{BuildSlot, BuildState};
use crate::debug;

/// Outcome of [`BuildCache::claim_or_await`].
#[derive(Debug)]
pub enum Claim<'a> {
    /// The caller owns the build and must finish it through the guard.
    Build(BuildGuard<'a>),
    /// Another caller built it; the artifact is at this path.
    Ready(PathBuf),
}

/// Identity -> build slot.
#[derive(Debug, Default)]
pub struct BuildCache {
    entries: DashMap<String, Arc<BuildSlot>>,
}

impl BuildCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Non-blocking probe.
    pub fn lookup(&self, identity: &str) -> Option<BuildState> {
        self.entries.get(identity).map(|slot| slot.state())
    }

    /// Become the builder of `identity`, or wait for the current one.
    ///
    /// When the awaited build fails its entry is already gone, so the
    /// caller probes again and may become the next builder.
    pub fn claim_or_await(&self, identity: &str) -> Claim<'_> {
        loop {
            let slot = match self.entries.entry(identity.to_string()) {
                Entry::Vacant(entry) => {
                    let slot = Arc::new(BuildSlot::new());
                    entry.insert(Arc::clone(&slot));
                    return Claim::Build(BuildGuard {
                        cache: self,
                        identity: identity.to_string(),
                        slot,
                    });
                }
                Entry::Occupied(entry) => Arc::clone(entry.get()),
            };

            // Shard lock released: only this identity's waiters block here
            match slot.wait() {
                BuildState::Ready(path) => return Claim::Ready(path),
                state => debug!("cache"; "{identity}: awaited build ended {state:?}, retrying"),
            }
        }
    }

    /// Remove an entry. Returns whether one was present.
    pub fn delete(&self, identity: &str) -> bool {
        self.entries.remove(identity).is_some()
    }

    /// Snapshot of every entry, sorted by identity.
    pub fn entries(&self) -> Vec<(String, BuildState)> {
        let mut entries: Vec<_> = self
            .entries
            .iter()
            .map(|e| (e.key().clone(), e.value().state()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove `slot` only if it is still the entry for `identity`.
    fn remove_slot(&self, identity: &str, slot: &Arc<BuildSlot>) {
        self.entries
            .remove_if(identity, |_, current| Arc::ptr_eq(current, slot));
    }
}

/// Ownership of one in-flight build.
///
/// Dropping the guard without calling [`complete`](Self::complete) counts
/// as a failure, so a panicking builder never wedges its waiters.
#[derive(Debug)]
pub struct BuildGuard<'a> {
    cache: &'a BuildCache,
    identity: String,
    slot: Arc<BuildSlot>,
}

impl BuildGuard<'_> {
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Publish the artifact path and wake the waiters.
    pub fn complete(self, path: PathBuf) -> PathBuf {
        self.slot.complete(BuildState::Ready(path.clone()));
        path
    }

    /// Drop the entry so the identity is retryable, then wake the waiters.
    pub fn fail(self, reason: impl Into<String>) {
        self.abandon(reason.into());
    }

    fn abandon(&self, reason: String) {
        self.cache.remove_slot(&self.identity, &self.slot);
        self.slot.complete(BuildState::Failed(reason));
    }
}

impl Drop for BuildGuard<'_> {
    fn drop(&mut self) {
        if self.slot.is_pending() {
            self.abandon("build abandoned".to_string());
        }
    }
}
