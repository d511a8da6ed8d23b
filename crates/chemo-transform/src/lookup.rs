//! Collaborator contracts and the injected lookup cache.
//!
//! Network clients, alignment tools and persistence implement these traits
//! outside this crate. The caches replace module-level dictionaries: a cache is
//! loaded once per run, consulted first, and filled from the backing service on
//! a miss.

use std::cell::RefCell;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::LookupError;

/// Resolves accessions to protein sequences.
pub trait SequenceLookup {
    fn resolve(&self, accessions: &[String]) -> Result<BTreeMap<String, String>, LookupError>;
}

/// Resolves structural identifiers to canonical structure strings.
pub trait StructureLookup {
    fn to_canonical_structure(
        &self,
        identifiers: &[String],
    ) -> Result<BTreeMap<String, String>, LookupError>;
}

/// Enumerates the stereoisomers of a canonical structure.
///
/// Must be deterministic for a given input within one run.
pub trait StereoisomerEnumerator {
    fn enumerate(&self, structure: &str) -> Result<Vec<String>, LookupError>;
}

/// Best hit of an alignment search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentHit {
    pub best_match_id: String,
    pub percent_identity: f64,
    pub matched_sequence: String,
}

/// Aligns a sequence against a reference database.
pub trait SequenceAligner {
    fn align(&self, sequence: &str) -> Result<Option<AlignmentHit>, LookupError>;
}

/// Key/value store backing a lookup service for the duration of a run.
pub trait LookupCache {
    /// Entries known for `keys`; unknown keys are simply absent.
    fn get(&self, keys: &[String]) -> BTreeMap<String, String>;

    fn put(&mut self, entries: BTreeMap<String, String>);
}

/// In-memory [`LookupCache`].
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    entries: BTreeMap<String, String>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: BTreeMap<String, String>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &BTreeMap<String, String> {
        &self.entries
    }
}

impl LookupCache for MemoryCache {
    fn get(&self, keys: &[String]) -> BTreeMap<String, String> {
        keys.iter()
            .filter_map(|key| self.entries.get(key).map(|v| (key.clone(), v.clone())))
            .collect()
    }

    fn put(&mut self, entries: BTreeMap<String, String>) {
        self.entries.extend(entries);
    }
}

/// A fixed map answers both sequence and structure requests.
impl SequenceLookup for BTreeMap<String, String> {
    fn resolve(&self, accessions: &[String]) -> Result<BTreeMap<String, String>, LookupError> {
        Ok(pick(self, accessions))
    }
}

impl StructureLookup for BTreeMap<String, String> {
    fn to_canonical_structure(
        &self,
        identifiers: &[String],
    ) -> Result<BTreeMap<String, String>, LookupError> {
        Ok(pick(self, identifiers))
    }
}

fn pick(map: &BTreeMap<String, String>, keys: &[String]) -> BTreeMap<String, String> {
    keys.iter()
        .filter_map(|key| map.get(key).map(|v| (key.clone(), v.clone())))
        .collect()
}

/// Splits `keys` into cached hits and the keys still to fetch.
fn consult<C: LookupCache>(
    cache: &RefCell<C>,
    keys: &[String],
) -> (BTreeMap<String, String>, Vec<String>) {
    let hits = cache.borrow().get(keys);
    let misses = keys
        .iter()
        .filter(|key| !hits.contains_key(*key))
        .cloned()
        .collect();
    (hits, misses)
}

/// [`SequenceLookup`] that consults a cache before the backing service.
pub struct CachedSequenceLookup<L, C> {
    inner: L,
    cache: RefCell<C>,
}

impl<L: SequenceLookup, C: LookupCache> CachedSequenceLookup<L, C> {
    pub fn new(inner: L, cache: C) -> Self {
        Self {
            inner,
            cache: RefCell::new(cache),
        }
    }

    /// Returns the cache, e.g. to flush it to disk after the run.
    pub fn into_cache(self) -> C {
        self.cache.into_inner()
    }
}

impl<L: SequenceLookup, C: LookupCache> SequenceLookup for CachedSequenceLookup<L, C> {
    fn resolve(&self, accessions: &[String]) -> Result<BTreeMap<String, String>, LookupError> {
        let (mut found, misses) = consult(&self.cache, accessions);
        if !misses.is_empty() {
            tracing::debug!(count = misses.len(), "fetching uncached sequences");
            let fetched = self.inner.resolve(&misses)?;
            self.cache.borrow_mut().put(fetched.clone());
            found.extend(fetched);
        }
        Ok(found)
    }
}

/// [`StructureLookup`] that consults a cache before the backing service.
pub struct CachedStructureLookup<L, C> {
    inner: L,
    cache: RefCell<C>,
}

impl<L: StructureLookup, C: LookupCache> CachedStructureLookup<L, C> {
    pub fn new(inner: L, cache: C) -> Self {
        Self {
            inner,
            cache: RefCell::new(cache),
        }
    }

    pub fn into_cache(self) -> C {
        self.cache.into_inner()
    }
}

impl<L: StructureLookup, C: LookupCache> StructureLookup for CachedStructureLookup<L, C> {
    fn to_canonical_structure(
        &self,
        identifiers: &[String],
    ) -> Result<BTreeMap<String, String>, LookupError> {
        let (mut found, misses) = consult(&self.cache, identifiers);
        if !misses.is_empty() {
            tracing::debug!(count = misses.len(), "fetching uncached structures");
            let fetched = self.inner.to_canonical_structure(&misses)?;
            self.cache.borrow_mut().put(fetched.clone());
            found.extend(fetched);
        }
        Ok(found)
    }
}
