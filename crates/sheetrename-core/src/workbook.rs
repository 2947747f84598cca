use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};
use tracing::{info, warn};

use crate::mapping::{extract_mapping, Cell, ExtractGap, MappingRules, NameMapping, SheetTable};
use crate::MappingError;

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Names of the sheets that carry the directory and file rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetNames {
    pub directories: String,
    pub files: String,
}

impl Default for SheetNames {
    fn default() -> Self {
        Self {
            directories: "Sheet1".to_string(),
            files: "Sheet2".to_string(),
        }
    }
}

/// Loads both rule tiers from a workbook.
///
/// Only an unreadable workbook (or an unreadable rule sheet) is an error. A
/// missing sheet or a sheet without a usable value column yields an empty
/// mapping for that tier.
pub fn load_rules(path: &Path, sheets: &SheetNames) -> Result<MappingRules, MappingError> {
    let mut workbook = open_workbook_auto(path).map_err(|source| MappingError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let available = workbook.sheet_names();
    info!("Found {} sheet(s) in {:?}", available.len(), path);

    let directories = load_tier(&available, &sheets.directories, "directories", |sheet| {
        workbook.worksheet_range(sheet)
    })?;
    let files = load_tier(&available, &sheets.files, "files", |sheet| {
        workbook.worksheet_range(sheet)
    })?;

    Ok(MappingRules::new(directories, files))
}

fn load_tier<F>(
    available: &[String],
    sheet: &str,
    tier: &str,
    read: F,
) -> Result<NameMapping, MappingError>
where
    F: FnOnce(&str) -> Result<Range<Data>, calamine::Error>,
{
    if !available.iter().any(|name| name == sheet) {
        warn!("Sheet '{}' not found, no {} will be renamed", sheet, tier);
        return Ok(NameMapping::new());
    }

    let range = read(sheet).map_err(|source| MappingError::Sheet {
        sheet: sheet.to_string(),
        source,
    })?;

    Ok(mapping_from_table(sheet, tier, &table_from_range(&range)))
}

fn mapping_from_table(sheet: &str, tier: &str, table: &SheetTable) -> NameMapping {
    match extract_mapping(table) {
        Ok(extracted) => {
            info!(
                "Loaded {} mapping(s) for {} from '{}': {} -> {}",
                extracted.mapping.len(),
                tier,
                sheet,
                extracted.key_column,
                extracted.value_column
            );
            if extracted.skipped_rows > 0 {
                info!(
                    "Skipped {} row(s) in '{}' with a missing old or new name",
                    extracted.skipped_rows, sheet
                );
            }
            extracted.mapping
        }
        Err(ExtractGap::NoDataRows) => {
            warn!("Sheet '{}' has no data rows", sheet);
            NameMapping::new()
        }
        Err(ExtractGap::NoValueColumn) => {
            warn!("Sheet '{}' has no column with new names", sheet);
            NameMapping::new()
        }
    }
}

/// Snapshots the used range of a sheet as text cells.
pub fn table_from_range(range: &Range<Data>) -> SheetTable {
    SheetTable::from_rows(
        range
            .rows()
            .map(|row| row.iter().map(cell_from_data).collect())
            .collect(),
    )
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
        Data::Bool(true) => Some("True".to_string()),
        Data::Bool(false) => Some("False".to_string()),
        Data::DateTime(dt) if !dt.is_duration() => Some(
            dt.as_datetime()
                .map(|date| date.format(DATETIME_FORMAT).to_string())
                .unwrap_or_else(|| data.to_string()),
        ),
        other => Some(other.to_string()),
    }
}
