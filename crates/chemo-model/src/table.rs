#![deny(unsafe_code)]

use std::collections::{BTreeMap, BTreeSet};

use crate::{FailingRowSet, RowId};

static MISSING: CellValue = CellValue::Missing;

/// A single cell. Missing values are explicit and never equal to any text.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(tag = "kind", content = "value")]
pub enum CellValue {
    Text(String),
    Missing,
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn from_option(value: Option<impl Into<String>>) -> Self {
        value.map_or(Self::Missing, |v| Self::Text(v.into()))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            Self::Missing => None,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    /// Applies `f` to text cells; missing cells pass through untouched.
    pub fn map_text(&self, f: impl FnOnce(&str) -> String) -> Self {
        match self {
            Self::Text(value) => Self::Text(f(value)),
            Self::Missing => Self::Missing,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Row {
    id: RowId,
    cells: BTreeMap<String, CellValue>,
}

impl Row {
    pub fn new(id: RowId) -> Self {
        Self {
            id,
            cells: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> RowId {
        self.id
    }

    /// Returns the cell for `column`; absent columns read as missing.
    pub fn get(&self, column: &str) -> &CellValue {
        self.cells.get(column).unwrap_or(&MISSING)
    }

    pub fn text(&self, column: &str) -> Option<&str> {
        self.get(column).as_text()
    }

    pub fn is_present(&self, column: &str) -> bool {
        self.get(column).is_present()
    }

    pub fn set(&mut self, column: impl Into<String>, value: CellValue) {
        self.cells.insert(column.into(), value);
    }

    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: CellValue) -> Self {
        self.set(column, value);
        self
    }
}

/// An ordered set of rows sharing a column list.
///
/// Every transforming operation returns a new table so that stage outputs stay
/// independent of each other.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn from_rows(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    /// Builds a table from positional records, assigning row ids from zero.
    ///
    /// `None` entries become missing cells. Records shorter than the column list
    /// are padded with missing cells.
    pub fn from_records(columns: &[&str], records: &[Vec<Option<&str>>]) -> Self {
        let names: Vec<String> = columns.iter().map(|c| (*c).to_string()).collect();
        let rows = records
            .iter()
            .enumerate()
            .map(|(idx, record)| {
                let mut row = Row::new(RowId::new(idx as u64));
                for (col_idx, name) in names.iter().enumerate() {
                    let value = record.get(col_idx).copied().flatten();
                    row.set(name.clone(), CellValue::from_option(value));
                }
                row
            })
            .collect();
        Self {
            columns: names,
            rows,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, id: RowId) -> Option<&Row> {
        self.rows.iter().find(|row| row.id == id)
    }

    pub fn row_ids(&self) -> impl Iterator<Item = RowId> + '_ {
        self.rows.iter().map(Row::id)
    }

    pub fn push_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub fn column_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a CellValue> + 'a {
        self.rows.iter().map(move |row| row.get(name))
    }

    /// Distinct present values of a column, sorted.
    pub fn distinct_texts(&self, name: &str) -> BTreeSet<String> {
        self.column_values(name)
            .filter_map(CellValue::as_text)
            .map(str::to_string)
            .collect()
    }

    /// Rows for which `predicate` holds, in their original order.
    pub fn retain(&self, mut predicate: impl FnMut(&Row) -> bool) -> Table {
        Self {
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .filter(|row| predicate(row))
                .cloned()
                .collect(),
        }
    }

    /// Splits into `(matching, rest)`.
    pub fn partition(&self, mut predicate: impl FnMut(&Row) -> bool) -> (Table, Table) {
        let (kept, removed): (Vec<Row>, Vec<Row>) =
            self.rows.iter().cloned().partition(|row| predicate(row));
        (
            Self::from_rows(self.columns.clone(), kept),
            Self::from_rows(self.columns.clone(), removed),
        )
    }

    /// Groups row references by key. Rows for which `key_fn` returns `None` are
    /// left out of every group.
    pub fn partition_by<K: Ord>(
        &self,
        mut key_fn: impl FnMut(&Row) -> Option<K>,
    ) -> BTreeMap<K, Vec<&Row>> {
        let mut groups: BTreeMap<K, Vec<&Row>> = BTreeMap::new();
        for row in &self.rows {
            if let Some(key) = key_fn(row) {
                groups.entry(key).or_default().push(row);
            }
        }
        groups
    }

    /// Rows whose id is not in `failing`.
    pub fn without(&self, failing: &FailingRowSet) -> Table {
        if failing.is_empty() {
            return self.clone();
        }
        self.retain(|row| !failing.contains(row.id))
    }

    /// Returns a copy with `name` set (or added) from `f`.
    pub fn with_column(&self, name: &str, f: impl FnMut(&Row) -> CellValue) -> Table {
        let mut table = self.clone();
        table.set_column(name, f);
        table
    }

    /// Fallible variant of [`Table::with_column`]; the first error aborts.
    pub fn try_with_column<E>(
        &self,
        name: &str,
        mut f: impl FnMut(&Row) -> Result<CellValue, E>,
    ) -> Result<Table, E> {
        let mut table = self.clone();
        table.ensure_column(name);
        for row in &mut table.rows {
            let value = f(row)?;
            row.set(name, value);
        }
        Ok(table)
    }

    /// Rewrites the cells of an existing column. Absent columns are left alone.
    pub fn map_column(&self, name: &str, f: impl FnMut(&CellValue) -> CellValue) -> Table {
        let mut table = self.clone();
        table.update_column(name, f);
        table
    }

    /// In-place form of [`Table::map_column`] for a table the caller owns.
    pub fn update_column(&mut self, name: &str, mut f: impl FnMut(&CellValue) -> CellValue) {
        if !self.has_column(name) {
            return;
        }
        for row in &mut self.rows {
            let value = f(row.get(name));
            row.set(name, value);
        }
    }

    /// In-place form of [`Table::with_column`] for a table the caller owns.
    pub fn set_column(&mut self, name: &str, mut f: impl FnMut(&Row) -> CellValue) {
        self.ensure_column(name);
        for row in &mut self.rows {
            let value = f(row);
            row.set(name, value);
        }
    }

    /// Appends the rows of `other`, unioning the column lists.
    pub fn concat(&self, other: &Table) -> Table {
        let mut table = self.clone();
        for column in &other.columns {
            table.ensure_column(column);
        }
        table.rows.extend(other.rows.iter().cloned());
        table
    }

    fn ensure_column(&mut self, name: &str) {
        if !self.has_column(name) {
            self.columns.push(name.to_string());
        }
    }
}
