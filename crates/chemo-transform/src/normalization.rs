//! Declarative string normalization.
//!
//! A [`StringNormalizer`] applies an ordered list of `{column, rule}`
//! directives. Missing cells are never touched and absent columns are skipped,
//! so normalization cannot fail.

use chemo_common::collapse_whitespace;
use chemo_model::columns::{
    ASSAY, ASSAY_SYSTEM, CANONICAL_SMILES, CAS, CELL_LINE, CID, CO_TRANSFECTION, DELIVERY, DOI,
    GENE_ID, GPROTEIN, INCHI_KEY, MIXTURE, MUTATION, NAME, NBR_MEASUREMENTS, PARAMETER,
    REFERENCE, REFERENCE_POSITION, RESPONSIVE, SEQUENCE, SPECIES, TAG, TYPE, UNIPROT_ID, UNIT,
    UNIT_SCREEN, VALUE, VALUE_SCREEN,
};
use chemo_model::{CellValue, Table};
use serde::{Deserialize, Serialize};

/// One normalization rule, applied to the directive's column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum NormalizeRule {
    /// Trim and collapse runs of whitespace to one space.
    CollapseWhitespace,
    Lowercase,
    /// Literal `(from, to)` substitutions, applied left to right.
    Replace { pairs: Vec<(String, String)> },
    /// Rewrites a phrase to its normalized spelling.
    Phrase { from: String, to: String },
    /// Sets `target` to `value` on rows where the column equals `equals`.
    SetWhen {
        equals: String,
        target: String,
        value: String,
    },
}

impl NormalizeRule {
    pub fn label(&self) -> &'static str {
        match self {
            Self::CollapseWhitespace => "collapse_whitespace",
            Self::Lowercase => "lowercase",
            Self::Replace { .. } => "replace",
            Self::Phrase { .. } => "phrase",
            Self::SetWhen { .. } => "set_when",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeDirective {
    pub column: String,
    #[serde(flatten)]
    pub rule: NormalizeRule,
}

impl NormalizeDirective {
    pub fn new(column: impl Into<String>, rule: NormalizeRule) -> Self {
        Self {
            column: column.into(),
            rule,
        }
    }

    pub fn replace(column: &str, pairs: &[(&str, &str)]) -> Self {
        Self::new(
            column,
            NormalizeRule::Replace {
                pairs: pairs
                    .iter()
                    .map(|(from, to)| ((*from).to_string(), (*to).to_string()))
                    .collect(),
            },
        )
    }

    pub fn phrase(column: &str, from: &str, to: &str) -> Self {
        Self::new(
            column,
            NormalizeRule::Phrase {
                from: from.to_string(),
                to: to.to_string(),
            },
        )
    }

    fn apply(&self, table: &mut Table) {
        let column = self.column.as_str();
        match &self.rule {
            NormalizeRule::CollapseWhitespace => {
                table.update_column(column, |cell| cell.map_text(collapse_whitespace));
            }
            NormalizeRule::Lowercase => {
                table.update_column(column, |cell| cell.map_text(str::to_lowercase));
            }
            NormalizeRule::Replace { pairs } => {
                table.update_column(column, |cell| {
                    cell.map_text(|value| {
                        pairs
                            .iter()
                            .fold(value.to_string(), |acc, (from, to)| acc.replace(from, to))
                    })
                });
            }
            NormalizeRule::Phrase { from, to } => {
                table.update_column(column, |cell| cell.map_text(|value| value.replace(from, to)));
            }
            NormalizeRule::SetWhen {
                equals,
                target,
                value,
            } => {
                if !table.has_column(column) {
                    return;
                }
                table.set_column(target, |row| {
                    if row.text(column) == Some(equals.as_str()) {
                        CellValue::text(value.clone())
                    } else {
                        row.get(target).clone()
                    }
                });
            }
        }
    }
}

/// Applies normalization directives in order.
#[derive(Debug, Clone, Default)]
pub struct StringNormalizer {
    directives: Vec<NormalizeDirective>,
}

impl StringNormalizer {
    pub fn new(directives: Vec<NormalizeDirective>) -> Self {
        Self { directives }
    }

    /// Normalizer configured with [`default_directives`].
    pub fn with_defaults() -> Self {
        Self::new(default_directives())
    }

    pub fn directives(&self) -> &[NormalizeDirective] {
        &self.directives
    }

    /// Returns a normalized copy of `table`.
    pub fn normalize(&self, table: &Table) -> Table {
        let mut out = table.clone();
        for directive in &self.directives {
            directive.apply(&mut out);
        }
        tracing::debug!(
            directives = self.directives.len(),
            rows = out.len(),
            "normalized table"
        );
        out
    }
}

const WHITESPACE_COLUMNS: &[&str] = &[
    SPECIES,
    MUTATION,
    GENE_ID,
    UNIPROT_ID,
    SEQUENCE,
    NAME,
    CID,
    CAS,
    INCHI_KEY,
    CANONICAL_SMILES,
    PARAMETER,
    VALUE,
    UNIT,
    VALUE_SCREEN,
    UNIT_SCREEN,
    RESPONSIVE,
    NBR_MEASUREMENTS,
    TYPE,
    CELL_LINE,
    CO_TRANSFECTION,
    ASSAY_SYSTEM,
    TAG,
    REFERENCE,
    DOI,
    REFERENCE_POSITION,
    MIXTURE,
];

const LOWERCASE_COLUMNS: &[&str] = &[
    SPECIES,
    PARAMETER,
    VALUE,
    VALUE_SCREEN,
    CO_TRANSFECTION,
    ASSAY_SYSTEM,
    GPROTEIN,
    DELIVERY,
    ASSAY,
    TAG,
    MIXTURE,
];

/// Directive list used for raw assay sheets.
pub fn default_directives() -> Vec<NormalizeDirective> {
    let mut directives: Vec<NormalizeDirective> = WHITESPACE_COLUMNS
        .iter()
        .map(|column| NormalizeDirective::new(*column, NormalizeRule::CollapseWhitespace))
        .collect();
    directives.extend(
        LOWERCASE_COLUMNS
            .iter()
            .map(|column| NormalizeDirective::new(*column, NormalizeRule::Lowercase)),
    );
    directives.extend([
        NormalizeDirective::replace(MUTATION, &[(" ", "_"), ("-", "_")]),
        NormalizeDirective::replace(INCHI_KEY, &[("_", " ")]),
        NormalizeDirective::replace(SEQUENCE, &[("\n", ""), (" ", "")]),
        NormalizeDirective::replace(VALUE, &[("> ", ">"), ("< ", "<")]),
        NormalizeDirective::phrase(TYPE, "luciferase assay", "luciferase"),
        NormalizeDirective::phrase(VALUE, "n.d.", "n.d"),
        NormalizeDirective::new(
            VALUE,
            NormalizeRule::SetWhen {
                equals: "n.d".to_string(),
                target: UNIT.to_string(),
                value: "n.d".to_string(),
            },
        ),
    ]);
    directives
}
