use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Transient view of a remote ticket, fetched fresh for every ticket id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Human key, e.g. `IOS-123`.
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub status: Status,
    /// Opaque user identifier of the current assignee.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub id: String,
    pub name: String,
}

/// A possible move out of the ticket's current status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub id: String,
    pub name: String,
}

impl Transition {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A single field write against a ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    Assignee { account_id: String },
    Custom { field_id: String, value: String },
}

/// Confirmation payload returned by a mutating tracker call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Receipt {
    pub http_status: u16,
    /// Id of the created resource, when the call creates one (comments).
    pub id: Option<String>,
}

/// Field display name to field id mapping, loaded once per session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldIds(HashMap<String, String>);

impl FieldIds {
    pub fn new(map: HashMap<String, String>) -> Self {
        Self(map)
    }

    /// Resolve a display name such as `Build Links` to its id. Names without a
    /// mapping pass through untouched so raw ids like `customfield_10042` work.
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        self.0.get(name).map_or(name, String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for FieldIds {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_ids_resolve_known_name() {
        let ids: FieldIds = [("Build Links".to_string(), "customfield_10042".to_string())]
            .into_iter()
            .collect();
        assert_eq!(ids.resolve("Build Links"), "customfield_10042");
    }

    #[test]
    fn field_ids_pass_unknown_name_through() {
        let ids = FieldIds::default();
        assert_eq!(ids.resolve("customfield_10042"), "customfield_10042");
        assert!(ids.is_empty());
    }

    #[test]
    fn ticket_serialization_skips_missing_assignee() {
        let ticket = Ticket {
            key: "IOS-1".into(),
            summary: None,
            status: Status {
                id: "3".into(),
                name: "In Progress".into(),
            },
            assignee: None,
        };
        let json = serde_json::to_string(&ticket).unwrap();
        assert!(!json.contains("assignee"));
        assert!(!json.contains("summary"));
    }
}
