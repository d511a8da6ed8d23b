//! Protein sequence checks.

use chemo_model::columns::{BLAST_IDENTITY, GENE_ID, MUTATION, RESOLVED_SEQUENCE, SEQUENCE};
use chemo_model::{FailingRowSet, MutationToken, Table};
use chemo_transform::apply_mutation;
use regex::Regex;

use super::failing;

/// Rows whose mutation does not parse or does not apply to `_Sequence`.
pub(super) fn mutation_correctness(table: &Table) -> FailingRowSet {
    failing(table, |row| {
        let Some(field) = row.text(MUTATION) else {
            return false;
        };
        let Some(sequence) = row.text(RESOLVED_SEQUENCE) else {
            return true;
        };
        match MutationToken::parse_list(field) {
            Ok(tokens) => apply_mutation(sequence, &tokens).is_err(),
            Err(_) => true,
        }
    })
}

/// Rows whose `_Sequence` length lies outside `min..=max`. Missing sequences fail.
pub(super) fn length_outside(table: &Table, min: usize, max: usize) -> FailingRowSet {
    failing(table, |row| {
        row.text(RESOLVED_SEQUENCE)
            .is_none_or(|sequence| !(min..=max).contains(&sequence.chars().count()))
    })
}

/// Rows whose gene id names a variant and that carry neither a raw sequence
/// nor a mutation.
pub(super) fn mutation_from_gene_id(table: &Table, variant: &Regex) -> FailingRowSet {
    failing(table, |row| {
        row.text(GENE_ID).is_some_and(|gene| variant.is_match(gene))
            && !row.is_present(SEQUENCE)
            && !row.is_present(MUTATION)
    })
}

/// Rows whose alignment identity is missing, not numeric or below `min_identity`.
pub(super) fn identity_below(table: &Table, min_identity: f64) -> FailingRowSet {
    failing(table, |row| {
        row.text(BLAST_IDENTITY)
            .and_then(chemo_common::parse_f64)
            .is_none_or(|identity| identity < min_identity)
    })
}
