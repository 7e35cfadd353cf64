use std::fs;
use std::path::Path;

use serde::Serialize;
use uuid::Uuid;

use crate::error::{MigrateError, Result};
use crate::rows::RowRecord;
use crate::schema::SheetSchema;

/// Opaque identifier of a created sheet, owned by the sheet service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetHandle(pub String);

/// Opaque identifier of a created row, owned by the sheet service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowHandle(pub String);

/// Boundary to the sheet-hosting service. The migration core only relies on
/// this contract; transport, auth, and retry policy live behind it.
pub trait SheetService {
    /// Creates a sheet with the given schema and returns its handle.
    fn create_sheet(&mut self, schema: &SheetSchema) -> Result<SheetHandle>;

    /// Inserts the rows in one batch, returning one handle per row in the
    /// same order as submitted.
    fn add_rows(&mut self, sheet: &SheetHandle, rows: &[RowRecord]) -> Result<Vec<RowHandle>>;

    /// Attaches a discussion to a row.
    fn create_discussion(
        &mut self,
        sheet: &SheetHandle,
        row: &RowHandle,
        text: &str,
    ) -> Result<()>;
}

/// In-memory [`SheetService`] that records everything it is asked to create
/// and mints generated handles. Backs `--dry-run` previews and the tests.
#[derive(Debug, Default)]
pub struct DryRunService {
    pub sheets: Vec<RecordedSheet>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecordedSheet {
    pub handle: SheetHandle,
    pub schema: SheetSchema,
    pub rows: Vec<RecordedRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecordedRow {
    pub handle: RowHandle,
    pub record: RowRecord,
    pub discussions: Vec<String>,
}

impl DryRunService {
    /// Writes the recorded sheets as pretty-printed JSON, so a migration can
    /// be inspected before any remote call is wired up.
    pub fn write_preview(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.sheets)?;
        fs::write(path, json)?;
        Ok(())
    }

    fn sheet_mut(&mut self, handle: &SheetHandle) -> Result<&mut RecordedSheet> {
        self.sheets
            .iter_mut()
            .find(|sheet| &sheet.handle == handle)
            .ok_or_else(|| MigrateError::Remote(format!("unknown sheet handle {}", handle.0)))
    }
}

impl SheetService for DryRunService {
    fn create_sheet(&mut self, schema: &SheetSchema) -> Result<SheetHandle> {
        let handle = SheetHandle(Uuid::new_v4().to_string());
        self.sheets.push(RecordedSheet {
            handle: handle.clone(),
            schema: schema.clone(),
            rows: Vec::new(),
        });
        Ok(handle)
    }

    fn add_rows(&mut self, sheet: &SheetHandle, rows: &[RowRecord]) -> Result<Vec<RowHandle>> {
        let sheet = self.sheet_mut(sheet)?;
        let mut handles = Vec::with_capacity(rows.len());
        for record in rows {
            let handle = RowHandle(Uuid::new_v4().to_string());
            sheet.rows.push(RecordedRow {
                handle: handle.clone(),
                record: record.clone(),
                discussions: Vec::new(),
            });
            handles.push(handle);
        }
        Ok(handles)
    }

    fn create_discussion(
        &mut self,
        sheet: &SheetHandle,
        row: &RowHandle,
        text: &str,
    ) -> Result<()> {
        let sheet = self.sheet_mut(sheet)?;
        let row = sheet
            .rows
            .iter_mut()
            .find(|candidate| &candidate.handle == row)
            .ok_or_else(|| MigrateError::Remote(format!("unknown row handle {}", row.0)))?;
        row.discussions.push(text.to_string());
        Ok(())
    }
}
