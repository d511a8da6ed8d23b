//! Alignment hits attached per mutated sequence.

use std::collections::BTreeMap;

use chemo_model::columns::{BLAST_IDENTITY, BLAST_SEQUENCE, BLAST_UNIPROT_ID, MUTATED_SEQUENCE};
use chemo_model::{CellValue, Row, Table};

use crate::{AlignmentHit, Result, SequenceAligner, TransformError};

/// Adds `blast_uniprot_id`, `blast_identity` and `blast_seq`.
///
/// Each distinct mutated sequence is aligned once. Every row must end up with
/// a hit: a row lacking a mutated sequence, or whose sequence has no hit, is
/// [`TransformError::MissingAlignment`].
pub fn attach_alignments(table: &Table, aligner: &dyn SequenceAligner) -> Result<Table> {
    let mut hits: BTreeMap<String, AlignmentHit> = BTreeMap::new();
    for sequence in table.distinct_texts(MUTATED_SEQUENCE) {
        if let Some(hit) = aligner.align(&sequence)? {
            hits.insert(sequence, hit);
        }
    }
    for row in table.rows() {
        let aligned = row
            .text(MUTATED_SEQUENCE)
            .is_some_and(|sequence| hits.contains_key(sequence));
        if !aligned {
            return Err(TransformError::MissingAlignment { row: row.id() });
        }
    }
    tracing::info!(sequences = hits.len(), "attached alignment hits");

    let hit_for = |row: &Row| {
        row.text(MUTATED_SEQUENCE)
            .and_then(|sequence| hits.get(sequence))
    };
    let mut out = table.clone();
    out.set_column(BLAST_UNIPROT_ID, |row| {
        CellValue::from_option(hit_for(row).map(|hit| hit.best_match_id.clone()))
    });
    out.set_column(BLAST_IDENTITY, |row| {
        CellValue::from_option(hit_for(row).map(|hit| hit.percent_identity.to_string()))
    });
    out.set_column(BLAST_SEQUENCE, |row| {
        CellValue::from_option(hit_for(row).map(|hit| hit.matched_sequence.clone()))
    });
    Ok(out)
}
