use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use crate::comments;
use crate::email::{DEFAULT_DOMAIN, EmailResolver};
use crate::error::Result;
use crate::io::board_read;
use crate::lookup::Lookups;
use crate::rows;
use crate::schema;
use crate::sheets::{RowHandle, SheetService};

/// Caller-provided knobs for one migration run.
#[derive(Debug, Clone)]
pub struct MigrationOptions {
    /// Optional name → email mapping workbook.
    pub mapping: Option<PathBuf>,
    /// Domain used when generating addresses from member names.
    pub email_domain: String,
}

impl Default for MigrationOptions {
    fn default() -> Self {
        Self {
            mapping: None,
            email_domain: DEFAULT_DOMAIN.to_string(),
        }
    }
}

/// Outcome of a migration run. Per-discussion failures are carried here
/// explicitly rather than only surfacing in the logs, so callers can assert
/// on the partial-failure contract.
#[derive(Debug)]
pub struct MigrationReport {
    pub sheet_id: String,
    pub sheet_name: String,
    pub rows_created: usize,
    pub discussions_attempted: usize,
    pub discussions_created: usize,
    pub discussion_failures: Vec<DiscussionFailure>,
}

#[derive(Debug)]
pub struct DiscussionFailure {
    pub card_id: String,
    pub reason: String,
}

/// Runs the whole pipeline: load the export, build the per-run lookups,
/// derive the schema, create the sheet, batch-insert the rows, then attach
/// the discussions.
///
/// Schema and row creation are all-or-nothing: any failure there aborts the
/// run. Discussion delivery is best-effort: each failure is logged, counted,
/// and the run continues.
#[instrument(level = "info", skip_all, fields(input = %input.display()))]
pub fn migrate_board(
    input: &Path,
    options: &MigrationOptions,
    service: &mut dyn SheetService,
) -> Result<MigrationReport> {
    let board = board_read::read_board(input)?;
    let resolver = EmailResolver::from_mapping_file(options.mapping.as_deref(), &options.email_domain);
    let lookups = Lookups::build(&board, &resolver);
    let sheet_schema = schema::build_schema(&board);

    let sheet = service.create_sheet(&sheet_schema)?;
    info!(sheet = %sheet.0, title = %sheet_schema.title, "sheet created");

    let (card_ids, records) = rows::build_rows(&board, &lookups);
    let row_handles = if records.is_empty() {
        Vec::new()
    } else {
        service.add_rows(&sheet, &records)?
    };
    info!(rows = row_handles.len(), "rows created");

    let card_to_row: HashMap<&str, &RowHandle> =
        card_ids.iter().copied().zip(row_handles.iter()).collect();

    let mut attempted = 0;
    let mut created = 0;
    let mut failures = Vec::new();

    for group in comments::comments_by_card(&board) {
        let Some(row) = card_to_row.get(group.card_id.as_str()).copied() else {
            // Comments on archived or unknown cards have no target row.
            continue;
        };
        for comment in &group.comments {
            attempted += 1;
            let text = comments::format_discussion_text(comment, &lookups, &resolver);
            match service.create_discussion(&sheet, row, &text) {
                Ok(()) => created += 1,
                Err(error) => {
                    warn!(card = %group.card_id, %error, "failed to create discussion");
                    failures.push(DiscussionFailure {
                        card_id: group.card_id.clone(),
                        reason: error.to_string(),
                    });
                }
            }
        }
    }
    info!(attempted, created, "discussions created");

    Ok(MigrationReport {
        sheet_id: sheet.0,
        sheet_name: sheet_schema.title,
        rows_created: row_handles.len(),
        discussions_attempted: attempted,
        discussions_created: created,
        discussion_failures: failures,
    })
}
