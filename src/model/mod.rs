use serde::Deserialize;

/// A parsed Trello board export. Built once by the board reader and treated
/// as read-only for the rest of the migration run.
#[derive(Debug, Clone, Deserialize)]
pub struct Board {
    /// Board display name. The only required top-level field.
    pub name: String,
    /// Lists in document order. Document order of the non-archived lists
    /// defines the lane order on the target sheet.
    #[serde(default)]
    pub lists: Vec<List>,
    #[serde(default)]
    pub cards: Vec<Card>,
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub labels: Vec<Label>,
    /// Activity history. Only `commentCard` events are consumed.
    #[serde(default)]
    pub actions: Vec<ActivityEvent>,
}

/// A Trello list (lane).
#[derive(Debug, Clone, Deserialize)]
pub struct List {
    pub id: String,
    pub name: String,
    /// Archived flag. Archived lists never contribute lane options.
    #[serde(default)]
    pub closed: bool,
}

/// A Trello card. Foreign keys (`id_list`, `id_members`, `id_labels`) are
/// resolved through the per-run lookups, never by scanning the board again.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub desc: String,
    /// Due date as an ISO-8601 string, when set.
    #[serde(default)]
    pub due: Option<String>,
    /// Timestamp of the last activity on the card. The export carries no
    /// true creation date, so this doubles as the "Created Date" proxy.
    #[serde(default)]
    pub date_last_activity: Option<String>,
    #[serde(default)]
    pub closed: bool,
    #[serde(default)]
    pub id_list: String,
    #[serde(default)]
    pub id_members: Vec<String>,
    #[serde(default)]
    pub id_labels: Vec<String>,
    #[serde(default)]
    pub short_url: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl Card {
    /// Canonical URL for the card: the short URL when present, the long URL
    /// otherwise.
    pub fn canonical_url(&self) -> Option<&str> {
        self.short_url
            .as_deref()
            .or(self.url.as_deref())
            .filter(|url| !url.is_empty())
    }
}

/// A board member as present in the export.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

impl Member {
    /// Display name: `fullName` when present, then `username`, then a fixed
    /// fallback.
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .or(self.username.as_deref())
            .unwrap_or("Unknown")
    }
}

/// A board label.
#[derive(Debug, Clone, Deserialize)]
pub struct Label {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

impl Label {
    /// Effective label name: `name` when non-empty, else the color name,
    /// else `"Unlabeled"`.
    pub fn effective_name(&self) -> &str {
        let name = self.name.trim();
        if !name.is_empty() {
            return name;
        }
        match self.color.as_deref() {
            Some(color) if !color.is_empty() => color,
            _ => "Unlabeled",
        }
    }
}

/// One entry of the board's activity history.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEvent {
    /// Event type tag, e.g. `commentCard`.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub member_creator: Option<EventAuthor>,
    #[serde(default)]
    pub data: EventData,
}

/// The member that authored an activity event.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventAuthor {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
}

/// Event payload. Only the comment text and the target card reference are
/// consumed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventData {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub card: Option<EventCardRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventCardRef {
    #[serde(default)]
    pub id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_display_name_falls_back_to_username() {
        let member: Member =
            serde_json::from_str(r#"{"id": "m1", "username": "jdoe"}"#).expect("member parsed");
        assert_eq!(member.display_name(), "jdoe");

        let member: Member = serde_json::from_str(r#"{"id": "m2"}"#).expect("member parsed");
        assert_eq!(member.display_name(), "Unknown");
    }

    #[test]
    fn label_effective_name_prefers_name_then_color() {
        let named: Label = serde_json::from_str(r#"{"id": "l1", "name": "Bug", "color": "red"}"#)
            .expect("label parsed");
        assert_eq!(named.effective_name(), "Bug");

        let colored: Label =
            serde_json::from_str(r#"{"id": "l2", "name": "", "color": "green"}"#)
                .expect("label parsed");
        assert_eq!(colored.effective_name(), "green");

        let bare: Label =
            serde_json::from_str(r#"{"id": "l3", "name": "", "color": null}"#).expect("label parsed");
        assert_eq!(bare.effective_name(), "Unlabeled");
    }

    #[test]
    fn card_canonical_url_prefers_short_url() {
        let card: Card = serde_json::from_str(
            r#"{"id": "c1", "shortUrl": "https://trello.com/c/abc", "url": "https://trello.com/c/abc/1-long"}"#,
        )
        .expect("card parsed");
        assert_eq!(card.canonical_url(), Some("https://trello.com/c/abc"));

        let card: Card = serde_json::from_str(r#"{"id": "c2"}"#).expect("card parsed");
        assert_eq!(card.canonical_url(), None);
    }
}
