//! Lookup data consulted by structure and name rules.

use std::collections::BTreeMap;

/// Reference data available to rules. Every map may be empty; rules treat an
/// absent entry as unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceData {
    /// Known InChI keys mapped to their compound id.
    pub known_identifiers: BTreeMap<String, String>,
    /// InChI key to canonical structure string.
    pub structures: BTreeMap<String, String>,
    /// Canonical structure (or raw structure string) to stereoisomer count.
    pub isomer_counts: BTreeMap<String, usize>,
    /// InChI key to known names.
    pub synonyms: BTreeMap<String, Vec<String>>,
}

impl ReferenceData {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_known_identifiers(mut self, known: BTreeMap<String, String>) -> Self {
        self.known_identifiers = known;
        self
    }

    #[must_use]
    pub fn with_structures(mut self, structures: BTreeMap<String, String>) -> Self {
        self.structures = structures;
        self
    }

    #[must_use]
    pub fn with_isomer_counts(mut self, counts: BTreeMap<String, usize>) -> Self {
        self.isomer_counts = counts;
        self
    }

    #[must_use]
    pub fn with_synonyms(mut self, synonyms: BTreeMap<String, Vec<String>>) -> Self {
        self.synonyms = synonyms;
        self
    }

    pub fn is_known(&self, key: &str) -> bool {
        self.known_identifiers.contains_key(key)
    }

    pub fn structure(&self, key: &str) -> Option<&str> {
        self.structures.get(key).map(String::as_str)
    }

    pub fn isomer_count(&self, structure: &str) -> Option<usize> {
        self.isomer_counts.get(structure).copied()
    }
}
