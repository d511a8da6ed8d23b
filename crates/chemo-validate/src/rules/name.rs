//! Stimulus name checks.

use chemo_model::columns::{INCHI_KEY, MIXTURE, NAME};
use chemo_model::{FailingRowSet, MixtureClass, Row, Table};
use regex::Regex;

use super::compile_pattern;
use crate::Result;
use crate::reference::ReferenceData;

fn is_mixture(row: &Row) -> bool {
    row.text(MIXTURE)
        .and_then(|label| label.parse::<MixtureClass>().ok())
        == Some(MixtureClass::Mixture)
}

/// Non-mixture rows whose name matches `regex`, restricted to rows whose
/// InChI key contains `identifier_token` when one is given.
pub(super) fn pattern_matches(
    table: &Table,
    regex: &Regex,
    identifier_token: Option<&str>,
) -> FailingRowSet {
    table
        .rows()
        .iter()
        .filter(|row| !is_mixture(row))
        .filter(|row| row.text(NAME).is_some_and(|name| regex.is_match(name)))
        .filter(|row| match identifier_token {
            Some(token) => row.text(INCHI_KEY).is_some_and(|key| key.contains(token)),
            None => true,
        })
        .map(|row| row.id())
        .collect()
}

/// Stereo descriptors removed from names before comparison.
const STEREO_DESCRIPTORS: &[&str] = &[r"[0-9]?r/[0-9]?s", r"[0-9]?e,[0-9]?z", r"[0-9][ez]"];

const LITERAL_REMOVALS: &[&str] = &[",sumofisomers", "(+/-)-", "-", "+"];

const GREEK_LETTERS: &[(&str, &str)] = &[
    ("\u{3b1}", "alpha"),
    ("\u{3b4}", "delta"),
    ("\u{3b3}", "gamma"),
    ("\u{3b2}", "beta"),
];

/// Compiled stereo-descriptor patterns for name comparison.
#[derive(Debug, Clone)]
pub(crate) struct NameCleaner {
    descriptors: Vec<Regex>,
}

impl NameCleaner {
    pub(crate) fn new(rule: &str) -> Result<Self> {
        let descriptors = STEREO_DESCRIPTORS
            .iter()
            .map(|pattern| compile_pattern(rule, pattern))
            .collect::<Result<_>>()?;
        Ok(Self { descriptors })
    }

    pub(crate) fn clean(&self, name: &str) -> String {
        let mut cleaned: String = name
            .chars()
            .filter(|ch| !ch.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        for descriptor in &self.descriptors {
            cleaned = descriptor.replace_all(&cleaned, "").into_owned();
        }
        for literal in LITERAL_REMOVALS {
            cleaned = cleaned.replace(literal, "");
        }
        for (letter, spelled) in GREEK_LETTERS {
            cleaned = cleaned.replace(letter, spelled);
        }
        cleaned.retain(|ch| !matches!(ch, 'd' | 'l' | '(' | ')'));
        cleaned
    }
}

/// Normalized molecule name used to compare names with known synonyms.
///
/// Whitespace, case, stereo descriptors, signs, hyphens, parentheses and the
/// letters `d`/`l` are dropped; Greek letters are spelled out.
///
/// ```
/// use chemo_validate::clean_name;
///
/// assert_eq!(clean_name("(R/S)-Linalool").unwrap(), "inaoo");
/// assert_eq!(clean_name("α-Pinene").unwrap(), "aphapinene");
/// ```
pub fn clean_name(name: &str) -> Result<String> {
    Ok(NameCleaner::new("name_synonyms")?.clean(name))
}

/// Non-mixture rows with a known key whose cleaned name is not among the
/// cleaned synonyms of that key.
pub(super) fn synonym_mismatch(
    table: &Table,
    reference: &ReferenceData,
    cleaner: &NameCleaner,
) -> FailingRowSet {
    table
        .rows()
        .iter()
        .filter(|row| !is_mixture(row))
        .filter(|row| {
            let Some(synonyms) = row.text(INCHI_KEY).and_then(|key| reference.synonyms.get(key))
            else {
                return false;
            };
            let Some(name) = row.text(NAME) else {
                return true;
            };
            let cleaned = cleaner.clean(name);
            !synonyms
                .iter()
                .any(|synonym| cleaner.clean(synonym) == cleaned)
        })
        .map(|row| row.id())
        .collect()
}
