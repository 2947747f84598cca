use std::collections::HashMap;
use tracing::debug;

/// Number of entries echoed at debug level when a sheet is loaded.
const PREVIEW_ENTRIES: usize = 10;

/// A single cell of a sheet snapshot. `None` is a missing cell.
pub type Cell = Option<String>;

/// Old name -> new name association. Later inserts of the same key win.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameMapping {
    entries: HashMap<String, String>,
}

impl NameMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, old: impl Into<String>, new: impl Into<String>) {
        self.entries.insert(old.into(), new.into());
    }

    pub fn get(&self, old: &str) -> Option<&str> {
        self.entries.get(old).map(String::as_str)
    }

    pub fn contains(&self, old: &str) -> bool {
        self.entries.contains_key(old)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for NameMapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut mapping = NameMapping::new();
        for (old, new) in iter {
            mapping.insert(old, new);
        }
        mapping
    }
}

/// The two independent rule tiers: one for directory names, one for file base-names.
#[derive(Debug, Clone, Default)]
pub struct MappingRules {
    pub directories: NameMapping,
    pub files: NameMapping,
}

impl MappingRules {
    pub fn new(directories: NameMapping, files: NameMapping) -> Self {
        Self { directories, files }
    }

    pub fn is_empty(&self) -> bool {
        self.directories.is_empty() && self.files.is_empty()
    }
}

/// Rectangular snapshot of one sheet. The first row holds the column headers.
#[derive(Debug, Clone, Default)]
pub struct SheetTable {
    rows: Vec<Vec<Cell>>,
}

impl SheetTable {
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    fn header(&self, column: usize) -> String {
        self.rows
            .first()
            .and_then(|row| cell_text(row.get(column)))
            .map(str::to_string)
            .unwrap_or_else(|| format!("column {}", column + 1))
    }

    fn data_rows(&self) -> &[Vec<Cell>] {
        self.rows.get(1..).unwrap_or(&[])
    }

    fn column_has_data(&self, column: usize) -> bool {
        self.data_rows()
            .iter()
            .any(|row| cell_text(row.get(column)).is_some())
    }
}

/// Mapping pulled out of a sheet together with the columns it came from.
#[derive(Debug, Clone)]
pub struct ExtractedMapping {
    pub key_column: String,
    pub value_column: String,
    pub mapping: NameMapping,
    pub skipped_rows: usize,
}

/// Why a sheet produced no mapping at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractGap {
    /// Header only, or nothing at all.
    NoDataRows,
    /// Every column right of the first is empty.
    NoValueColumn,
}

/// Trimmed text of a cell, or `None` when the cell is missing or blank.
fn cell_text(cell: Option<&Cell>) -> Option<&str> {
    cell.and_then(|c| c.as_deref())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Builds a mapping from the first column (old names) and the right-most
/// column holding any data (new names). Rows missing either cell are skipped.
pub fn extract_mapping(table: &SheetTable) -> Result<ExtractedMapping, ExtractGap> {
    if table.data_rows().is_empty() {
        return Err(ExtractGap::NoDataRows);
    }

    let value_column = (1..table.width())
        .rev()
        .find(|&column| table.column_has_data(column))
        .ok_or(ExtractGap::NoValueColumn)?;

    let mut mapping = NameMapping::new();
    let mut skipped_rows = 0;

    for row in table.data_rows() {
        match (cell_text(row.first()), cell_text(row.get(value_column))) {
            (Some(old), Some(new)) => {
                if mapping.len() < PREVIEW_ENTRIES && !mapping.contains(old) {
                    debug!("  mapping: '{}' -> '{}'", old, new);
                }
                mapping.insert(old, new);
            }
            _ => skipped_rows += 1,
        }
    }

    Ok(ExtractedMapping {
        key_column: table.header(0),
        value_column: table.header(value_column),
        mapping,
        skipped_rows,
    })
}
