use std::collections::HashMap;
use std::path::Path;

use calamine::{DataType, Reader, Xlsx, open_workbook};

use crate::error::{MigrateError, Result};

/// Name → email table loaded from the mapping workbook. Every loaded entry
/// exists under both its original-case and lower-case name key.
pub type EmailTable = HashMap<String, String>;

/// Reads the name → email mapping from the first sheet of an Excel workbook.
///
/// The header row is skipped and rows with a blank name or email are
/// ignored. Each surviving row is indexed twice, once under its exact name
/// and once under the lower-cased name, so lookups can be case-flexible.
pub fn read_mapping(path: &Path) -> Result<EmailTable> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;

    let first_sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| MigrateError::InvalidMapping("workbook has no sheets".into()))?;
    let range = workbook
        .worksheet_range(&first_sheet)
        .ok_or_else(|| MigrateError::InvalidMapping(format!("missing sheet '{first_sheet}'")))?
        .map_err(MigrateError::from)?;

    let mut table = EmailTable::new();
    for row in range.rows().skip(1) {
        let name = cell_to_string(row.first());
        let email = cell_to_string(row.get(1));
        let name = name.trim();
        let email = email.trim();
        if name.is_empty() || email.is_empty() {
            continue;
        }
        table.insert(name.to_string(), email.to_string());
        table.insert(name.to_lowercase(), email.to_string());
    }

    Ok(table)
}

fn cell_to_string(cell: Option<&DataType>) -> String {
    match cell {
        Some(DataType::String(value)) => value.clone(),
        Some(DataType::Float(value)) => value.to_string(),
        Some(DataType::Int(value)) => value.to_string(),
        Some(DataType::Bool(value)) => value.to_string(),
        Some(DataType::Empty) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
