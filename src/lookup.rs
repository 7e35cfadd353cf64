use std::collections::HashMap;

use serde::Serialize;

use crate::email::EmailResolver;
use crate::model::{Board, Card};

/// A resolved member identity: display name plus the email address the
/// resolver produced for it. Computed once per member id and shared by the
/// row mapper and the comment aggregator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contact {
    pub name: String,
    pub email: String,
}

/// Per-run id → value indexes derived from a [`Board`], each built in one
/// pass and frozen afterwards.
#[derive(Debug)]
pub struct Lookups<'a> {
    list_names: HashMap<&'a str, &'a str>,
    label_names: HashMap<&'a str, &'a str>,
    members: HashMap<&'a str, Contact>,
    cards: HashMap<&'a str, &'a Card>,
}

impl<'a> Lookups<'a> {
    pub fn build(board: &'a Board, resolver: &EmailResolver) -> Self {
        let list_names = board
            .lists
            .iter()
            .map(|list| (list.id.as_str(), list.name.as_str()))
            .collect();

        let label_names = board
            .labels
            .iter()
            .map(|label| (label.id.as_str(), label.effective_name()))
            .collect();

        let members = board
            .members
            .iter()
            .map(|member| {
                let name = member.display_name();
                let contact = Contact {
                    name: name.to_string(),
                    email: resolver.resolve(name),
                };
                (member.id.as_str(), contact)
            })
            .collect();

        let cards = board
            .cards
            .iter()
            .map(|card| (card.id.as_str(), card))
            .collect();

        Self {
            list_names,
            label_names,
            members,
            cards,
        }
    }

    /// List name for an id; a dangling reference resolves to the empty
    /// string, so the card shows up unlaned instead of being dropped.
    pub fn list_name(&self, id: &str) -> &str {
        self.list_names.get(id).copied().unwrap_or("")
    }

    /// Effective label name for an id; a dangling reference resolves to
    /// `"Unknown"`.
    pub fn label_name(&self, id: &str) -> &str {
        self.label_names.get(id).copied().unwrap_or("Unknown")
    }

    pub fn member(&self, id: &str) -> Option<&Contact> {
        self.members.get(id)
    }

    pub fn card(&self, id: &str) -> Option<&'a Card> {
        self.cards.get(id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::email::DEFAULT_DOMAIN;
    use crate::io::board_read::parse_board;

    fn fixture() -> Board {
        parse_board(
            br#"{
                "name": "Board",
                "lists": [{"id": "l1", "name": "Todo", "closed": false}],
                "labels": [{"id": "lb1", "name": "", "color": "red"}],
                "members": [{"id": "m1", "fullName": "Jane Doe"}],
                "cards": [{"id": "c1", "name": "Fix it", "idList": "l1"}]
            }"#,
        )
        .expect("fixture parsed")
    }

    #[test]
    fn dangling_references_resolve_to_fallbacks() {
        let board = fixture();
        let resolver = EmailResolver::new(DEFAULT_DOMAIN);
        let lookups = Lookups::build(&board, &resolver);

        assert_eq!(lookups.list_name("l1"), "Todo");
        assert_eq!(lookups.list_name("missing"), "");
        assert_eq!(lookups.label_name("lb1"), "red");
        assert_eq!(lookups.label_name("missing"), "Unknown");
        assert!(lookups.member("missing").is_none());
        assert!(lookups.card("missing").is_none());
    }

    #[test]
    fn members_are_resolved_once_with_generated_email() {
        let board = fixture();
        let resolver = EmailResolver::new(DEFAULT_DOMAIN);
        let lookups = Lookups::build(&board, &resolver);

        let contact = lookups.member("m1").expect("member resolved");
        assert_eq!(contact.name, "Jane Doe");
        assert_eq!(contact.email, "jane.doe@epfl.ch");
    }
}
