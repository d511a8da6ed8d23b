//! Auxiliary lookup tables with fixed column contracts.

use std::path::Path;

use chemo_model::Table;
use chemo_model::columns::{
    BLAST_IDENTITY, BLAST_SEQUENCE, BLAST_UNIPROT_ID, CID, INCHI_KEY, MUTATED_SEQUENCE, SPECIES,
    UNIPROT_SEQUENCE,
};
use csv::ReaderBuilder;

use crate::reader::read_assay_table;
use crate::{IngestError, Result};

/// Expected header of an auxiliary table, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuxiliarySchema {
    pub name: &'static str,
    pub columns: &'static [&'static str],
}

impl AuxiliarySchema {
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| (*c).to_string()).collect()
    }

    pub fn matches(&self, header: &[String]) -> bool {
        header.len() == self.columns.len()
            && header.iter().zip(self.columns).all(|(found, expected)| found == expected)
    }
}

/// Accession to sequence cache.
pub const SEQUENCE_CACHE: AuxiliarySchema = AuxiliarySchema {
    name: "sequence cache",
    columns: &["Entry", UNIPROT_SEQUENCE, "Query"],
};

/// Known InChI keys and their compound ids.
pub const IDENTIFIER_MAP: AuxiliarySchema = AuxiliarySchema {
    name: "identifier map",
    columns: &[INCHI_KEY, CID],
};

/// Alignment results per mutated sequence and species.
pub const ALIGNMENT_CACHE: AuxiliarySchema = AuxiliarySchema {
    name: "alignment cache",
    columns: &[
        BLAST_UNIPROT_ID,
        BLAST_IDENTITY,
        "fasta_id",
        MUTATED_SEQUENCE,
        BLAST_SEQUENCE,
        SPECIES,
        "blast_fasta_id",
    ],
};

/// Reads only the header row of a delimited file.
pub fn read_header(path: &Path, separator: u8) -> Result<Vec<String>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(separator)
        .from_path(path)
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    let headers = reader.headers().map_err(|e| IngestError::CsvParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    if headers.is_empty() {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }
    Ok(headers
        .iter()
        .map(|h| h.trim_matches('\u{feff}').to_string())
        .collect())
}

/// Loads an auxiliary table after checking its header against `schema`.
pub fn load_auxiliary(path: &Path, schema: &AuxiliarySchema, separator: u8) -> Result<Table> {
    if !path.exists() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let header = read_header(path, separator)?;
    if !schema.matches(&header) {
        return Err(IngestError::SchemaMismatch {
            table: schema.name.to_string(),
            path: path.to_path_buf(),
            expected: schema.column_names(),
            found: header,
        });
    }
    read_assay_table(path, separator)
}
