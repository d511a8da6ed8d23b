//! Split of rows that are outside the curated scope.

use std::collections::BTreeMap;
use std::fmt;

use chemo_model::columns::{RESOLVED_SEQUENCE, RESPONSIVE};
use chemo_model::{Row, RowId, Table};
use serde::{Deserialize, Serialize};

/// Why a row was set aside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    /// Neither the accession lookup nor the raw sheet provided a sequence.
    UnresolvedSequence,
    /// Antagonist or inverse-agonist response codes.
    OutOfScopeResponse,
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnresolvedSequence => write!(f, "unresolved sequence"),
            Self::OutOfScopeResponse => write!(f, "out-of-scope response"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Exclusion {
    pub admitted: Table,
    pub excluded: Table,
    pub reasons: BTreeMap<RowId, ExclusionReason>,
}

impl Exclusion {
    pub fn count(&self, reason: ExclusionReason) -> usize {
        self.reasons.values().filter(|r| **r == reason).count()
    }
}

/// Response codes starting with one of these prefixes are out of scope.
const OUT_OF_SCOPE_RESPONSES: &[&str] = &["2", "-1"];

#[derive(Debug, Clone)]
pub struct ExclusionFilter {
    out_of_scope: Vec<String>,
}

impl Default for ExclusionFilter {
    fn default() -> Self {
        Self::with_response_prefixes(OUT_OF_SCOPE_RESPONSES.iter().map(|p| (*p).to_string()))
    }
}

impl ExclusionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response_prefixes(prefixes: impl IntoIterator<Item = String>) -> Self {
        Self {
            out_of_scope: prefixes.into_iter().collect(),
        }
    }

    pub fn reason(&self, row: &Row) -> Option<ExclusionReason> {
        if !row.is_present(RESOLVED_SEQUENCE) {
            return Some(ExclusionReason::UnresolvedSequence);
        }
        row.text(RESPONSIVE)
            .filter(|code| self.out_of_scope.iter().any(|p| code.starts_with(p.as_str())))
            .map(|_| ExclusionReason::OutOfScopeResponse)
    }

    pub fn split(&self, table: &Table) -> Exclusion {
        let reasons: BTreeMap<RowId, ExclusionReason> = table
            .rows()
            .iter()
            .filter_map(|row| self.reason(row).map(|reason| (row.id(), reason)))
            .collect();
        let (excluded, admitted) = table.partition(|row| reasons.contains_key(&row.id()));
        let exclusion = Exclusion {
            admitted,
            excluded,
            reasons,
        };
        tracing::info!(
            admitted = exclusion.admitted.len(),
            unresolved_sequence = exclusion.count(ExclusionReason::UnresolvedSequence),
            out_of_scope_response = exclusion.count(ExclusionReason::OutOfScopeResponse),
            "excluded out-of-scope rows"
        );
        exclusion
    }
}
