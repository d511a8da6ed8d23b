//! Data model for chemoreceptor assay curation.
//!
//! Rows are keyed by a [`RowId`] assigned at ingestion, cells carry an explicit
//! [`CellValue::Missing`] variant and every table operation returns a new
//! [`Table`].

pub mod columns;
pub mod error;
pub mod ids;
pub mod mixture;
pub mod mutation;
pub mod outcome;
pub mod table;

pub use error::{ModelError, Result};
pub use ids::RowId;
pub use mixture::MixtureClass;
pub use mutation::{AMINO_ACIDS, MutationToken, is_amino_acid};
pub use outcome::{CheckOutcome, FailingRowSet, OutcomeReport, SampleRow};
pub use table::{CellValue, Row, Table};
