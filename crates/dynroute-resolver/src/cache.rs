//! Memoization cache for predicate resolutions
//!
//! Identical predicate payloads show up repeatedly when several enhancers
//! (or several sites) restrict to the same content types. The cache keeps
//! one resolved page list per payload so each distinct storage query runs
//! at most once per configuration pass.
//!
//! The cache is an explicit object owned by the resolver, not hidden global
//! state: construct one per configuration pass, or keep it alive longer and
//! call [`ResolutionCache::invalidate`] when the underlying storage may have
//! changed.

use dashmap::DashMap;
use serde::Serialize;
use sha2::{Digest, Sha256};

use dynroute_core::{PageUid, Result};

/// Which predicate resolver a cached entry belongs to.
///
/// Mixed into the cache key so that identical payloads submitted to
/// different predicates (say `withCType: [news]` and `containsModule: [news]`)
/// never share an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredicateKind {
    ContentType,
    Plugin,
    Doktype,
    Module,
}

impl PredicateKind {
    fn tag(self) -> &'static str {
        match self {
            PredicateKind::ContentType => "withCType",
            PredicateKind::Plugin => "withPlugin",
            PredicateKind::Doktype => "withDoktypes",
            PredicateKind::Module => "containsModule",
        }
    }
}

/// Shared map from predicate-payload hash to resolved page identifiers.
///
/// Safe for concurrent read/insert; lookups clone the stored page list.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    entries: DashMap<String, Vec<PageUid>>,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache key for a normalized predicate payload.
    ///
    /// SHA-256 over the predicate tag plus the JSON serialization of the
    /// payload in configured order. Reordered but otherwise identical
    /// payloads hash differently and miss each other.
    ///
    /// # Errors
    /// - `Error::Serialization` if the payload cannot be serialized
    pub fn key<P: Serialize>(kind: PredicateKind, payload: &P) -> Result<String> {
        let mut hasher = Sha256::new();
        hasher.update(kind.tag().as_bytes());
        hasher.update(serde_json::to_vec(payload)?);
        Ok(hex::encode(hasher.finalize()))
    }

    pub fn get(&self, key: &str) -> Option<Vec<PageUid>> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    pub fn insert(&self, key: String, pages: Vec<PageUid>) {
        self.entries.insert(key, pages);
    }

    /// Drop all entries. Call between configuration passes when the
    /// underlying storage may have changed.
    pub fn invalidate(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
