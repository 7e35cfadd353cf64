use std::collections::HashMap;

use crate::email::EmailResolver;
use crate::lookup::Lookups;
use crate::model::Board;
use crate::rows::parse_export_datetime;

/// The only activity event type the migration consumes.
pub const COMMENT_CARD: &str = "commentCard";

/// One comment event, stripped down to what the discussion body needs.
#[derive(Debug, Clone, PartialEq)]
pub struct CardComment {
    pub author_name: String,
    pub member_id: Option<String>,
    pub date: String,
    pub text: String,
}

/// All comments targeting one card, in export order.
#[derive(Debug, Clone, PartialEq)]
pub struct CardDiscussions {
    pub card_id: String,
    pub comments: Vec<CardComment>,
}

/// Scans the activity history for `commentCard` events with a resolvable
/// target card id and groups them by card.
///
/// Both the card groups and the comments inside each group keep the
/// export's original order; comments are never re-sorted by timestamp.
pub fn comments_by_card(board: &Board) -> Vec<CardDiscussions> {
    let mut grouped: Vec<CardDiscussions> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for event in &board.actions {
        if event.kind != COMMENT_CARD {
            continue;
        }
        let Some(card_id) = event
            .data
            .card
            .as_ref()
            .and_then(|card| card.id.as_deref())
            .filter(|id| !id.is_empty())
        else {
            continue;
        };

        let author = event.member_creator.as_ref();
        let comment = CardComment {
            author_name: author
                .and_then(|creator| creator.full_name.as_deref())
                .unwrap_or("Unknown")
                .to_string(),
            member_id: author.and_then(|creator| creator.id.clone()),
            date: event.date.clone(),
            text: event.data.text.clone(),
        };

        match index.get(card_id) {
            Some(&position) => grouped[position].comments.push(comment),
            None => {
                index.insert(card_id.to_string(), grouped.len());
                grouped.push(CardDiscussions {
                    card_id: card_id.to_string(),
                    comments: vec![comment],
                });
            }
        }
    }

    grouped
}

/// Formats one comment into a discussion body: a bracketed header line with
/// the author, their resolved email, and the timestamp, followed by the raw
/// comment text.
///
/// The author email comes from the member lookup when the member id
/// resolves; otherwise it is generated from the author name, which is the
/// only identity the event carries for non-board members. An unparsable
/// timestamp is kept verbatim in the header rather than dropped.
pub fn format_discussion_text(
    comment: &CardComment,
    lookups: &Lookups,
    resolver: &EmailResolver,
) -> String {
    let email = comment
        .member_id
        .as_deref()
        .and_then(|id| lookups.member(id))
        .map(|contact| contact.email.clone())
        .unwrap_or_else(|| resolver.generate(&comment.author_name));

    let mut header = format!("[{}", comment.author_name);
    if !email.is_empty() {
        header.push_str(&format!(" ({email})"));
    }
    if !comment.date.is_empty() {
        let display = parse_export_datetime(&comment.date)
            .map(|datetime| datetime.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| comment.date.clone());
        header.push_str(&format!(" - {display}"));
    }

    format!("{header}]\n{}", comment.text)
}
