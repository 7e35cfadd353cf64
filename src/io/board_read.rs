use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::info;

use crate::error::{MigrateError, Result};
use crate::model::Board;

/// Reads and validates a board export file.
pub fn read_board(path: &Path) -> Result<Board> {
    let bytes = fs::read(path)?;
    parse_board(&bytes)
}

/// Parses raw export bytes into a validated [`Board`].
///
/// Syntactically invalid JSON yields [`MigrateError::MalformedExport`];
/// structurally invalid JSON (no top-level object, or a missing `name`
/// string) yields [`MigrateError::SchemaViolation`]. Missing optional
/// collections default to empty rather than failing.
pub fn parse_board(bytes: &[u8]) -> Result<Board> {
    let document: Value =
        serde_json::from_slice(bytes).map_err(MigrateError::MalformedExport)?;

    let object = document.as_object().ok_or_else(|| {
        MigrateError::SchemaViolation("top-level value is not an object".into())
    })?;
    match object.get("name") {
        Some(Value::String(_)) => {}
        Some(_) => {
            return Err(MigrateError::SchemaViolation(
                "top-level field 'name' is not a string".into(),
            ));
        }
        None => {
            return Err(MigrateError::SchemaViolation(
                "missing required top-level field 'name'".into(),
            ));
        }
    }

    let board: Board = serde_json::from_value(document)
        .map_err(|err| MigrateError::SchemaViolation(err.to_string()))?;

    info!(
        board = %board.name,
        lists = board.lists.len(),
        cards = board.cards.len(),
        actions = board.actions.len(),
        "loaded board export"
    );
    Ok(board)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_export() {
        let board = parse_board(br#"{"name": "Sprint Board"}"#).expect("board parsed");
        assert_eq!(board.name, "Sprint Board");
        assert!(board.lists.is_empty());
        assert!(board.cards.is_empty());
        assert!(board.actions.is_empty());
    }

    #[test]
    fn invalid_json_is_malformed_export() {
        let error = parse_board(b"{not json").unwrap_err();
        assert!(matches!(error, MigrateError::MalformedExport(_)));
    }

    #[test]
    fn missing_name_is_schema_violation() {
        let error = parse_board(br#"{"lists": []}"#).unwrap_err();
        assert!(matches!(error, MigrateError::SchemaViolation(_)));
    }

    #[test]
    fn non_object_export_is_schema_violation() {
        let error = parse_board(br#"["name"]"#).unwrap_err();
        assert!(matches!(error, MigrateError::SchemaViolation(_)));
    }
}
