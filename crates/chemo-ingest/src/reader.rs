//! Assay table reading and writing through Polars.

use std::fs::File;
use std::path::Path;

use chemo_common::any_to_text;
use chemo_model::{CellValue, Row, RowId, Table};
use polars::prelude::{
    AnyValue, Column, CsvReadOptions, CsvWriter, DataFrame, SerReader, SerWriter,
};

use crate::{IngestError, Result};

/// Field separator of curated assay sheets.
pub const DEFAULT_SEPARATOR: u8 = b';';

/// Reads a delimited file with every column kept as text.
pub fn read_assay_table(path: &Path, separator: u8) -> Result<Table> {
    if !path.exists() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let parse_error = |e: polars::prelude::PolarsError| IngestError::CsvParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    };
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .map_parse_options(|options| options.with_separator(separator))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(parse_error)?
        .finish()
        .map_err(parse_error)?;

    let table = dataframe_to_table(&df)?;
    tracing::info!(
        path = %path.display(),
        rows = table.len(),
        columns = table.columns().len(),
        "read assay table"
    );
    Ok(table)
}

/// Converts a DataFrame into a [`Table`], numbering rows from zero.
pub fn dataframe_to_table(df: &DataFrame) -> Result<Table> {
    let columns: Vec<String> = df
        .get_column_names_owned()
        .into_iter()
        .map(|name| name.to_string())
        .collect();
    let mut rows: Vec<Row> = (0..df.height())
        .map(|idx| Row::new(RowId::new(idx as u64)))
        .collect();
    for name in &columns {
        let column = df.column(name)?;
        for (idx, row) in rows.iter_mut().enumerate() {
            let value = column.get(idx).unwrap_or(AnyValue::Null);
            row.set(name.clone(), CellValue::from_option(any_to_text(value)));
        }
    }
    Ok(Table::from_rows(columns, rows))
}

/// Converts a [`Table`] into a DataFrame of nullable string columns.
pub fn table_to_dataframe(table: &Table) -> Result<DataFrame> {
    let columns: Vec<Column> = table
        .columns()
        .iter()
        .map(|name| {
            let values: Vec<Option<String>> = table
                .column_values(name)
                .map(|cell| cell.as_text().map(str::to_string))
                .collect();
            Column::new(name.as_str().into(), values)
        })
        .collect();
    Ok(DataFrame::new(columns)?)
}

/// Writes `table` as a delimited file with a header row.
pub fn write_table(path: &Path, table: &Table, separator: u8) -> Result<()> {
    let mut df = table_to_dataframe(table)?;
    let mut file = File::create(path).map_err(|source| IngestError::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(separator)
        .finish(&mut df)
        .map_err(|e| IngestError::CsvWrite {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    tracing::debug!(path = %path.display(), rows = table.len(), "wrote assay table");
    Ok(())
}
