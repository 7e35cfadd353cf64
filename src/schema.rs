use std::collections::BTreeSet;

use serde::Serialize;

use crate::model::Board;

/// Fixed prefix of every migrated sheet's title. Truncation always preserves
/// it in full.
pub const SHEET_TITLE_PREFIX: &str = "Trello Import - ";
/// Maximum sheet title length imposed by the sheet service.
pub const SHEET_TITLE_LIMIT: usize = 50;

/// Column title literals. These are the join key between the schema, the
/// row records, and the sheet service, so they must stay stable.
pub const COL_CARD_NAME: &str = "Card Name";
pub const COL_LIST: &str = "List";
pub const COL_DESCRIPTION: &str = "Description";
pub const COL_DUE_DATE: &str = "Due Date";
pub const COL_MEMBERS: &str = "Members";
pub const COL_LABELS: &str = "Labels";
pub const COL_URL: &str = "URL";
pub const COL_CREATED_DATE: &str = "Created Date";

/// The value shape a column accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ColumnKind {
    Text,
    SingleSelect,
    MultiSelect,
    Date,
    ContactList,
}

/// One column of the target sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSpec {
    pub title: &'static str,
    pub kind: ColumnKind,
    pub primary: bool,
    /// Dropdown option set; only present for select kinds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

/// The derived target sheet: title plus the fixed eight-column layout with
/// its data-dependent option sets. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetSchema {
    pub title: String,
    pub columns: Vec<ColumnSpec>,
}

impl SheetSchema {
    pub fn column(&self, title: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|column| column.title == title)
    }
}

/// Derives the sheet schema from a board.
///
/// The `List` options are the non-archived list names in document order;
/// the `Labels` options are the sorted, de-duplicated effective label names
/// across the whole board.
pub fn build_schema(board: &Board) -> SheetSchema {
    let columns = vec![
        ColumnSpec {
            title: COL_CARD_NAME,
            kind: ColumnKind::Text,
            primary: true,
            options: None,
        },
        ColumnSpec {
            title: COL_LIST,
            kind: ColumnKind::SingleSelect,
            primary: false,
            options: Some(list_options(board)),
        },
        ColumnSpec {
            title: COL_DESCRIPTION,
            kind: ColumnKind::Text,
            primary: false,
            options: None,
        },
        ColumnSpec {
            title: COL_DUE_DATE,
            kind: ColumnKind::Date,
            primary: false,
            options: None,
        },
        ColumnSpec {
            title: COL_MEMBERS,
            kind: ColumnKind::ContactList,
            primary: false,
            options: None,
        },
        ColumnSpec {
            title: COL_LABELS,
            kind: ColumnKind::MultiSelect,
            primary: false,
            options: Some(label_options(board)),
        },
        ColumnSpec {
            title: COL_URL,
            kind: ColumnKind::Text,
            primary: false,
            options: None,
        },
        ColumnSpec {
            title: COL_CREATED_DATE,
            kind: ColumnKind::Date,
            primary: false,
            options: None,
        },
    ];

    SheetSchema {
        title: sheet_title(&board.name),
        columns,
    }
}

/// Sheet title: fixed prefix plus the board name, with the board-name
/// portion truncated so the combined title never exceeds the service limit.
fn sheet_title(board_name: &str) -> String {
    let title = format!("{SHEET_TITLE_PREFIX}{board_name}");
    if title.chars().count() <= SHEET_TITLE_LIMIT {
        return title;
    }
    let budget = SHEET_TITLE_LIMIT - SHEET_TITLE_PREFIX.chars().count();
    let truncated: String = board_name.chars().take(budget).collect();
    format!("{SHEET_TITLE_PREFIX}{truncated}")
}

fn list_options(board: &Board) -> Vec<String> {
    board
        .lists
        .iter()
        .filter(|list| !list.closed)
        .map(|list| list.name.clone())
        .collect()
}

fn label_options(board: &Board) -> Vec<String> {
    let names: BTreeSet<&str> = board
        .labels
        .iter()
        .map(|label| label.effective_name())
        .collect();
    names.into_iter().map(str::to_string).collect()
}
