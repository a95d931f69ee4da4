//! Per-board activity timeline for the last day.
//!
//! Merges aged-out change notifications with the tracker's own changelog
//! and comment history for the board's most recently fetched issues.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::changes::{ChangeNotification, retention_window};
use crate::tracker::Issue;

/// Timestamp layout the tracker uses, e.g. `2024-03-01T09:15:00.000+0000`.
pub const TRACKER_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

/// Most entries a timeline holds.
pub const ACTIVITY_LIMIT: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Change,
    Status,
    Assignee,
    Comment,
}

impl std::fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivityKind::Change => write!(f, "Change"),
            ActivityKind::Status => write!(f, "Status"),
            ActivityKind::Assignee => write!(f, "Assignee"),
            ActivityKind::Comment => write!(f, "Comment"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityEntry {
    pub at: DateTime<Utc>,
    pub kind: ActivityKind,
    pub issue_key: String,
    pub detail: String,
}

/// Parse a tracker timestamp, falling back to RFC 3339.
pub fn parse_tracker_time(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_str(raw, TRACKER_TIME_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// Build the timeline as of `now`, newest first, capped at [`ACTIVITY_LIMIT`].
///
/// `historical` is expected to hold the board's notifications between the
/// highlight and retention windows. Tracker entries with unparsable
/// timestamps or older than the retention window are skipped.
pub fn build_timeline(
    issues: &[Issue],
    historical: &[ChangeNotification],
    now: DateTime<Utc>,
) -> Vec<ActivityEntry> {
    let cutoff = now - retention_window();
    let mut entries: Vec<ActivityEntry> = historical
        .iter()
        .filter(|c| c.detected_at > cutoff)
        .map(|c| ActivityEntry {
            at: c.detected_at,
            kind: ActivityKind::Change,
            issue_key: c.issue_key.clone(),
            detail: format!("{} - {}", c.summary, c.change),
        })
        .collect();

    for issue in issues {
        if let Some(changelog) = &issue.changelog {
            for history in &changelog.histories {
                let Some(at) = parse_tracker_time(&history.created) else {
                    continue;
                };
                if at < cutoff {
                    continue;
                }
                let author = history.author.label();
                for item in &history.items {
                    let (kind, detail) = match item.field.as_str() {
                        "status" => (
                            ActivityKind::Status,
                            format!(
                                "{} → {} by {}",
                                item.from_label.as_deref().unwrap_or_default(),
                                item.to_label.as_deref().unwrap_or_default(),
                                author
                            ),
                        ),
                        "assignee" => (
                            ActivityKind::Assignee,
                            format!(
                                "assigned to {} by {}",
                                item.to_label.as_deref().unwrap_or_default(),
                                author
                            ),
                        ),
                        _ => continue,
                    };
                    entries.push(ActivityEntry {
                        at,
                        kind,
                        issue_key: issue.key.clone(),
                        detail,
                    });
                }
            }
        }

        if let Some(block) = &issue.fields.comment {
            for comment in &block.comments {
                let Some(at) = parse_tracker_time(&comment.created) else {
                    continue;
                };
                if at < cutoff {
                    continue;
                }
                entries.push(ActivityEntry {
                    at,
                    kind: ActivityKind::Comment,
                    issue_key: issue.key.clone(),
                    detail: format!("commented by {}", comment.author.label()),
                });
            }
        }
    }

    // Stable sort keeps source order for equal timestamps.
    entries.sort_by(|a, b| b.at.cmp(&a.at));
    entries.truncate(ACTIVITY_LIMIT);
    entries
}
