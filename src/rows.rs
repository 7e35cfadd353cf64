use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::Serialize;
use tracing::debug;

use crate::lookup::{Contact, Lookups};
use crate::model::{Board, Card};
use crate::schema::{
    COL_CARD_NAME, COL_CREATED_DATE, COL_DESCRIPTION, COL_DUE_DATE, COL_LABELS, COL_LIST,
    COL_MEMBERS, COL_URL,
};

/// Placeholder title for cards whose name is empty.
pub const UNTITLED_CARD: &str = "Untitled";

/// A cell value, shaped according to the owning column's kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum CellValue {
    Text(String),
    Select(String),
    MultiSelect(Vec<String>),
    Date(NaiveDate),
    Contacts(Vec<Contact>),
}

/// One target row: ordered (column title, value) pairs. Columns with no
/// applicable value for the card are omitted, not written as empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowRecord {
    pub cells: Vec<(&'static str, CellValue)>,
}

impl RowRecord {
    pub fn cell(&self, title: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|(cell_title, _)| *cell_title == title)
            .map(|(_, value)| value)
    }
}

/// Parses an export timestamp: ISO-8601 with a literal `Z` designator
/// (normalized to an explicit offset first) or with an explicit offset.
/// Anything else is unparsable and yields `None`.
pub fn parse_export_datetime(raw: &str) -> Option<DateTime<FixedOffset>> {
    let normalized = raw.replace('Z', "+00:00");
    DateTime::parse_from_rfc3339(&normalized).ok()
}

fn parse_sheet_date(raw: &str) -> Option<NaiveDate> {
    parse_export_datetime(raw).map(|datetime| datetime.date_naive())
}

/// Maps every non-archived card to a row record, returning the source card
/// ids alongside so the orchestrator can pair cards with the row handles
/// the service returns, in submission order.
pub fn build_rows<'a>(board: &'a Board, lookups: &Lookups) -> (Vec<&'a str>, Vec<RowRecord>) {
    let mut card_ids = Vec::new();
    let mut records = Vec::new();

    for card in &board.cards {
        if card.closed {
            debug!(card = %card.id, "skipping archived card");
            continue;
        }
        card_ids.push(card.id.as_str());
        records.push(map_card(card, lookups));
    }

    (card_ids, records)
}

/// Builds the row record for one card.
pub fn map_card(card: &Card, lookups: &Lookups) -> RowRecord {
    let mut cells = Vec::new();

    let title = if card.name.trim().is_empty() {
        UNTITLED_CARD.to_string()
    } else {
        card.name.clone()
    };
    cells.push((COL_CARD_NAME, CellValue::Text(title)));

    // Always present, even when the list reference dangles; the empty
    // string renders the card unlaned rather than dropping it.
    let list_name = lookups.list_name(&card.id_list);
    cells.push((COL_LIST, CellValue::Select(list_name.to_string())));

    if !card.desc.is_empty() {
        cells.push((COL_DESCRIPTION, CellValue::Text(card.desc.clone())));
    }

    if let Some(due) = card.due.as_deref().and_then(parse_sheet_date) {
        cells.push((COL_DUE_DATE, CellValue::Date(due)));
    }

    let contacts: Vec<Contact> = card
        .id_members
        .iter()
        .filter_map(|id| lookups.member(id))
        .cloned()
        .collect();
    if !contacts.is_empty() {
        cells.push((COL_MEMBERS, CellValue::Contacts(contacts)));
    }

    if !card.id_labels.is_empty() {
        let labels: Vec<String> = card
            .id_labels
            .iter()
            .map(|id| lookups.label_name(id).to_string())
            .collect();
        cells.push((COL_LABELS, CellValue::MultiSelect(labels)));
    }

    if let Some(url) = card.canonical_url() {
        cells.push((COL_URL, CellValue::Text(url.to_string())));
    }

    // The export carries no creation timestamp; last activity stands in
    // for "Created Date".
    if let Some(created) = card
        .date_last_activity
        .as_deref()
        .and_then(parse_sheet_date)
    {
        cells.push((COL_CREATED_DATE, CellValue::Date(created)));
    }

    RowRecord { cells }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::email::{DEFAULT_DOMAIN, EmailResolver};
    use crate::io::board_read::parse_board;

    fn board_with_cards(cards: &str) -> Board {
        parse_board(
            format!(
                r#"{{
                    "name": "Board",
                    "lists": [{{"id": "l1", "name": "Todo", "closed": false}}],
                    "labels": [{{"id": "lb1", "name": "Bug", "color": "red"}}],
                    "members": [{{"id": "m1", "fullName": "Jane Doe"}}],
                    "cards": {cards}
                }}"#
            )
            .as_bytes(),
        )
        .expect("board parsed")
    }

    fn build<'a>(board: &'a Board) -> (Vec<&'a str>, Vec<RowRecord>) {
        let resolver = EmailResolver::new(DEFAULT_DOMAIN);
        let lookups = Lookups::build(board, &resolver);
        build_rows(board, &lookups)
    }

    #[test]
    fn archived_cards_are_skipped() {
        let board = board_with_cards(
            r#"[
                {"id": "c1", "name": "Keep", "idList": "l1", "closed": false},
                {"id": "c2", "name": "Gone", "idList": "l1", "closed": true}
            ]"#,
        );
        let (card_ids, records) = build(&board);
        assert_eq!(card_ids, vec!["c1"]);
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn empty_card_names_get_the_placeholder_title() {
        let board = board_with_cards(r#"[{"id": "c1", "name": "", "idList": "l1"}]"#);
        let (_, records) = build(&board);
        assert_eq!(
            records[0].cell(COL_CARD_NAME),
            Some(&CellValue::Text(UNTITLED_CARD.to_string()))
        );
    }

    #[test]
    fn due_date_round_trips_and_bad_dates_are_omitted() {
        let board = board_with_cards(
            r#"[
                {"id": "c1", "name": "A", "idList": "l1", "due": "2024-03-01T00:00:00.000Z"},
                {"id": "c2", "name": "B", "idList": "l1", "due": "not-a-date"}
            ]"#,
        );
        let (_, records) = build(&board);

        let expected = NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date");
        assert_eq!(records[0].cell(COL_DUE_DATE), Some(&CellValue::Date(expected)));
        assert_eq!(records[1].cell(COL_DUE_DATE), None);
    }

    #[test]
    fn dangling_list_reference_yields_an_empty_lane() {
        let board = board_with_cards(r#"[{"id": "c1", "name": "A", "idList": "gone"}]"#);
        let (_, records) = build(&board);
        assert_eq!(
            records[0].cell(COL_LIST),
            Some(&CellValue::Select(String::new()))
        );
    }

    #[test]
    fn members_and_labels_are_resolved_or_omitted() {
        let board = board_with_cards(
            r#"[
                {
                    "id": "c1",
                    "name": "A",
                    "idList": "l1",
                    "idMembers": ["m1", "ghost"],
                    "idLabels": ["lb1", "ghost"]
                },
                {"id": "c2", "name": "B", "idList": "l1"}
            ]"#,
        );
        let (_, records) = build(&board);

        assert_eq!(
            records[0].cell(COL_MEMBERS),
            Some(&CellValue::Contacts(vec![Contact {
                name: "Jane Doe".to_string(),
                email: "jane.doe@epfl.ch".to_string(),
            }]))
        );
        assert_eq!(
            records[0].cell(COL_LABELS),
            Some(&CellValue::MultiSelect(vec![
                "Bug".to_string(),
                "Unknown".to_string()
            ]))
        );
        assert_eq!(records[1].cell(COL_MEMBERS), None);
        assert_eq!(records[1].cell(COL_LABELS), None);
    }

    #[test]
    fn url_prefers_short_url_and_created_date_uses_last_activity() {
        let board = board_with_cards(
            r#"[{
                "id": "c1",
                "name": "A",
                "idList": "l1",
                "shortUrl": "https://trello.com/c/abc",
                "url": "https://trello.com/c/abc/1-long",
                "dateLastActivity": "2023-11-05T14:30:00.000Z"
            }]"#,
        );
        let (_, records) = build(&board);

        assert_eq!(
            records[0].cell(COL_URL),
            Some(&CellValue::Text("https://trello.com/c/abc".to_string()))
        );
        let expected = NaiveDate::from_ymd_opt(2023, 11, 5).expect("valid date");
        assert_eq!(
            records[0].cell(COL_CREATED_DATE),
            Some(&CellValue::Date(expected))
        );
    }

    #[test]
    fn explicit_offset_timestamps_parse_without_a_z_designator() {
        let parsed = parse_export_datetime("2024-03-01T10:00:00+02:00").expect("parsed");
        assert_eq!(parsed.date_naive(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert!(parse_export_datetime("2024-03-01").is_none());
    }
}
