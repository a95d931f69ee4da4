//! Issue tracker data types.
//!
//! These mirror the tracker's JSON payloads. Only `key`, `fields.summary`,
//! `fields.status`, `fields.assignee` and `fields.updated` feed change
//! detection; everything else passes through for presentation.

use serde::{Deserialize, Serialize};

/// Assignee value stored when an issue has nobody assigned.
pub const UNASSIGNED: &str = "Unassigned";

/// An active iteration (sprint) of a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Iteration {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

impl Iteration {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            state: "active".to_string(),
            start_date: None,
            end_date: None,
        }
    }

    /// Whether the tracker reported this iteration as active.
    ///
    /// Exports that omit the state are treated as active.
    pub fn is_active(&self) -> bool {
        self.state.is_empty() || self.state.eq_ignore_ascii_case("active")
    }
}

/// Envelope of an iteration listing: `{"values": [...]}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IterationPage {
    #[serde(default)]
    pub values: Vec<Iteration>,
}

/// Envelope of an issue listing: `{"issues": [...]}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IssuePage {
    #[serde(default)]
    pub issues: Vec<Issue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub key: String,
    pub fields: IssueFields,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changelog: Option<Changelog>,
}

impl Issue {
    /// Build a minimal issue. Used by sources and tests that do not carry history.
    pub fn new(
        key: impl Into<String>,
        summary: impl Into<String>,
        status: impl Into<String>,
        assignee: Option<&str>,
        updated: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            fields: IssueFields {
                summary: summary.into(),
                status: Status {
                    name: status.into(),
                },
                assignee: assignee.map(|name| User {
                    name: name.to_string(),
                    display_name: name.to_string(),
                }),
                updated: updated.into(),
                ..Default::default()
            },
            changelog: None,
        }
    }

    pub fn status(&self) -> &str {
        &self.fields.status.name
    }

    /// Assignee name, normalized to [`UNASSIGNED`] when absent.
    pub fn assignee_or_unassigned(&self) -> &str {
        self.fields
            .assignee
            .as_ref()
            .map(|a| a.name.as_str())
            .unwrap_or(UNASSIGNED)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IssueFields {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "duedate")]
    pub due_date: Option<String>,
    #[serde(default)]
    pub assignee: Option<User>,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub updated: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Named>,
    #[serde(default, rename = "issuetype", skip_serializing_if = "Option::is_none")]
    pub issue_type: Option<Named>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporter: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<CommentBlock>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    #[serde(default)]
    pub name: String,
}

/// A named tracker value (priority, issue type).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Named {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub display_name: String,
}

impl User {
    /// Display name when present, otherwise the account name.
    pub fn label(&self) -> &str {
        if self.display_name.is_empty() {
            &self.name
        } else {
            &self.display_name
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommentBlock {
    #[serde(default)]
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub author: User,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub updated: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Changelog {
    #[serde(default)]
    pub histories: Vec<History>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub author: User,
    #[serde(default)]
    pub items: Vec<HistoryItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryItem {
    #[serde(default)]
    pub field: String,
    #[serde(default, rename = "fieldtype")]
    pub field_type: String,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default, rename = "fromString")]
    pub from_label: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default, rename = "toString")]
    pub to_label: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_tracker_issue() {
        let json = r#"{
            "key": "PLAT-7",
            "fields": {
                "summary": "Fix login",
                "status": {"name": "In Progress"},
                "assignee": {"name": "alice", "displayName": "Alice A."},
                "updated": "2024-03-01T10:15:00.000+0000",
                "issuetype": {"name": "Bug"},
                "comment": {"comments": [
                    {"id": "1", "body": "on it", "author": {"name": "bob", "displayName": "Bob"},
                     "created": "2024-03-01T10:00:00.000+0000"}
                ]}
            },
            "changelog": {"histories": [
                {"created": "2024-03-01T09:00:00.000+0000",
                 "author": {"name": "alice", "displayName": "Alice A."},
                 "items": [{"field": "status", "fieldtype": "jira",
                            "fromString": "Open", "toString": "In Progress"}]}
            ]}
        }"#;
        let issue: Issue = serde_json::from_str(json).unwrap();
        assert_eq!(issue.key, "PLAT-7");
        assert_eq!(issue.status(), "In Progress");
        assert_eq!(issue.assignee_or_unassigned(), "alice");
        assert_eq!(issue.fields.issue_type.as_ref().unwrap().name, "Bug");
        let histories = &issue.changelog.as_ref().unwrap().histories;
        assert_eq!(histories[0].items[0].to_label.as_deref(), Some("In Progress"));
        assert_eq!(issue.fields.comment.as_ref().unwrap().comments[0].author.label(), "Bob");
    }

    #[test]
    fn test_missing_assignee_is_unassigned() {
        let json = r#"{"key": "X-1", "fields": {"summary": "s", "status": {"name": "Open"}, "assignee": null}}"#;
        let issue: Issue = serde_json::from_str(json).unwrap();
        assert_eq!(issue.assignee_or_unassigned(), UNASSIGNED);
        assert_eq!(issue.fields.updated, "");
    }

    #[test]
    fn test_iteration_page_and_active_filter() {
        let json = r#"{"values": [
            {"id": 10, "name": "Sprint 10", "state": "active"},
            {"id": 9, "name": "Sprint 9", "state": "closed"},
            {"id": 11, "name": "Export without state"}
        ]}"#;
        let page: IterationPage = serde_json::from_str(json).unwrap();
        let active: Vec<u64> = page
            .values
            .iter()
            .filter(|it| it.is_active())
            .map(|it| it.id)
            .collect();
        assert_eq!(active, vec![10, 11]);
    }

    #[test]
    fn test_user_label_falls_back_to_name() {
        let user = User {
            name: "carol".to_string(),
            display_name: String::new(),
        };
        assert_eq!(user.label(), "carol");
    }
}
