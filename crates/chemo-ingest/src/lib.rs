//! Ingestion of assay sheets and auxiliary lookup tables.
//!
//! Every column is read as text; empty fields become missing cells and row ids
//! are assigned sequentially in file order.

pub mod auxiliary;
pub mod cache;
pub mod error;
pub mod reader;

pub use auxiliary::{
    ALIGNMENT_CACHE, AuxiliarySchema, IDENTIFIER_MAP, SEQUENCE_CACHE, load_auxiliary,
    read_header,
};
pub use cache::CsvLookupCache;
pub use error::{IngestError, Result};
pub use reader::{
    DEFAULT_SEPARATOR, dataframe_to_table, read_assay_table, table_to_dataframe, write_table,
};
