//! Point-mutation application.
//!
//! Tokens are applied in field order in a single pass; every token is checked
//! against the residue currently at its position, so a later token sees the
//! substitutions of earlier ones.

use chemo_model::columns::{
    MUTATED_SEQUENCE, MUTATED_UNIPROT_ID, MUTATION, RESOLVED_SEQUENCE, UNIPROT_ID,
};
use chemo_model::{CellValue, MutationToken, Table};

use crate::{Result, TransformError};

/// Residues shown left of the mismatching position.
const CONTEXT_BEFORE: usize = 5;
/// Exclusive right bound offset of the context window.
const CONTEXT_AFTER: usize = 4;

/// Applies `tokens` to `sequence` in order.
pub fn apply_mutation(sequence: &str, tokens: &[MutationToken]) -> Result<String> {
    let mut residues: Vec<char> = sequence.chars().collect();
    for token in tokens {
        let out_of_range = || TransformError::MutationOutOfRange {
            token: token.to_string(),
            position: token.position,
            length: residues.len(),
        };
        let index = token.index().ok_or_else(out_of_range)?;
        let found = *residues.get(index).ok_or_else(out_of_range)?;
        if found != token.from {
            return Err(TransformError::MutationMismatch {
                token: token.to_string(),
                position: token.position,
                expected: token.from,
                found,
                context: context_window(&residues, index),
            });
        }
        residues[index] = token.to;
    }
    Ok(residues.into_iter().collect())
}

fn context_window(residues: &[char], index: usize) -> String {
    let start = index.saturating_sub(CONTEXT_BEFORE);
    let end = (index + CONTEXT_AFTER).min(residues.len());
    residues[start..end].iter().collect()
}

/// Mutated sequence for one row. A missing mutation or sequence passes the
/// sequence through unchanged.
pub fn mutate_field(sequence: &CellValue, mutation: &CellValue) -> Result<CellValue> {
    match (sequence.as_text(), mutation.as_text()) {
        (Some(seq), Some(field)) => {
            let tokens = MutationToken::parse_list(field)?;
            apply_mutation(seq, &tokens).map(CellValue::Text)
        }
        _ => Ok(sequence.clone()),
    }
}

/// Sorts the `_`-separated tokens of a mutation field lexicographically.
///
/// Only meant for comparing records; application order is the field order.
pub fn canonicalize_mutation_order(field: &str) -> String {
    let mut tokens: Vec<&str> = field.trim().split('_').collect();
    tokens.sort_unstable();
    tokens.join("_")
}

/// Accession qualified by its canonical mutation list, e.g. `P12345_A23G`.
pub fn mutated_subject_id(accession: &str, mutation: Option<&str>) -> String {
    match mutation {
        Some(field) => format!("{accession}_{}", canonicalize_mutation_order(field)),
        None => accession.to_string(),
    }
}

/// Adds `mutated_Sequence` from `_Sequence` and `Mutation`.
///
/// The first failing row aborts with its id attached.
pub fn with_mutated_sequences(table: &Table) -> Result<Table> {
    let out = table.try_with_column(MUTATED_SEQUENCE, |row| {
        mutate_field(row.get(RESOLVED_SEQUENCE), row.get(MUTATION))
            .map_err(|err| err.at_row(row.id()))
    })?;
    tracing::info!(rows = out.len(), "derived mutated sequences");
    Ok(out)
}

/// Adds `mutated_Uniprot ID`; rows without an accession stay missing.
pub fn with_mutated_subject_ids(table: &Table) -> Table {
    table.with_column(MUTATED_UNIPROT_ID, |row| {
        CellValue::from_option(
            row.text(UNIPROT_ID)
                .map(|accession| mutated_subject_id(accession, row.text(MUTATION))),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_window_clamps_at_both_ends() {
        let residues: Vec<char> = "ABCDEFGHIJ".chars().collect();
        assert_eq!(context_window(&residues, 0), "ABCD");
        assert_eq!(context_window(&residues, 6), "BCDEFGHIJ");
        assert_eq!(context_window(&residues, 9), "EFGHIJ");
    }
}
