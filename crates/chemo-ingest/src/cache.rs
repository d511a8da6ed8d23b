//! File-backed [`LookupCache`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chemo_model::{CellValue, Row, RowId, Table};
use chemo_transform::LookupCache;

use crate::auxiliary::{AuxiliarySchema, load_auxiliary};
use crate::reader::write_table;
use crate::{IngestError, Result};

/// Lookup cache persisted as an auxiliary CSV table.
///
/// Entries map `key_column` to `value_column`; other schema columns are kept
/// as read and written back empty for new entries. Nothing is written until
/// [`CsvLookupCache::flush`].
#[derive(Debug, Clone)]
pub struct CsvLookupCache {
    path: PathBuf,
    schema: AuxiliarySchema,
    separator: u8,
    key_column: &'static str,
    value_column: &'static str,
    records: BTreeMap<String, BTreeMap<String, CellValue>>,
    dirty: bool,
}

impl CsvLookupCache {
    /// Loads the cache at `path`; a missing file starts an empty cache.
    pub fn load(
        path: &Path,
        schema: AuxiliarySchema,
        separator: u8,
        key_column: &'static str,
        value_column: &'static str,
    ) -> Result<Self> {
        let table = match load_auxiliary(path, &schema, separator) {
            Ok(table) => table,
            Err(IngestError::FileNotFound { .. }) => Table::new(schema.column_names()),
            Err(err) => return Err(err),
        };
        let mut records = BTreeMap::new();
        for row in table.rows() {
            let Some(key) = row.text(key_column) else {
                continue;
            };
            let record: BTreeMap<String, CellValue> = schema
                .columns
                .iter()
                .map(|column| ((*column).to_string(), row.get(column).clone()))
                .collect();
            records.insert(key.to_string(), record);
        }
        tracing::debug!(
            path = %path.display(),
            entries = records.len(),
            table = schema.name,
            "loaded lookup cache"
        );
        Ok(Self {
            path: path.to_path_buf(),
            schema,
            separator,
            key_column,
            value_column,
            records,
            dirty: false,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether entries were added since loading or the last flush.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Writes the cache back to its file if it changed.
    pub fn flush(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        let mut table = Table::new(self.schema.column_names());
        for (idx, record) in self.records.values().enumerate() {
            let mut row = Row::new(RowId::new(idx as u64));
            for column in self.schema.columns {
                let value = record.get(*column).cloned().unwrap_or(CellValue::Missing);
                row.set(*column, value);
            }
            table.push_row(row);
        }
        write_table(&self.path, &table, self.separator)?;
        self.dirty = false;
        tracing::info!(
            path = %self.path.display(),
            entries = self.records.len(),
            "flushed lookup cache"
        );
        Ok(())
    }
}

impl LookupCache for CsvLookupCache {
    fn get(&self, keys: &[String]) -> BTreeMap<String, String> {
        keys.iter()
            .filter_map(|key| {
                let value = self.records.get(key)?.get(self.value_column)?.as_text()?;
                Some((key.clone(), value.to_string()))
            })
            .collect()
    }

    fn put(&mut self, entries: BTreeMap<String, String>) {
        for (key, value) in entries {
            let record = self.records.entry(key.clone()).or_default();
            record.insert(self.key_column.to_string(), CellValue::Text(key));
            record.insert(self.value_column.to_string(), CellValue::Text(value));
            self.dirty = true;
        }
    }
}
