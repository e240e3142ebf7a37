use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::Value;

pub const TICKETS_FILE: &str = "jira_tickets.json";
pub const COMMITS_FILE: &str = "git_activity.json";
pub const MESSAGES_FILE: &str = "slack_messages.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MockTicket {
    #[serde(deserialize_with = "lenient_string")]
    pub key: String,
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(deserialize_with = "lenient_string")]
    pub status: String,
    #[serde(deserialize_with = "lenient_due_date")]
    pub due_date: Option<String>,
}

impl MockTicket {
    pub fn is_done(&self) -> bool {
        self.status.eq_ignore_ascii_case("done")
    }

    /// Done or completed; closed tickets are never overdue.
    pub fn is_closed(&self) -> bool {
        self.is_done() || self.status.eq_ignore_ascii_case("completed")
    }

    pub fn is_in_progress(&self) -> bool {
        let status = self.status.to_ascii_lowercase();
        matches!(status.as_str(), "in progress" | "in_progress" | "inprogress")
    }

    /// Open ticket with a parseable due date before `today`.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.is_closed()
            && self
                .due_date
                .as_deref()
                .and_then(parse_due_date)
                .is_some_and(|due| due < today)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MockCommit {
    #[serde(deserialize_with = "lenient_string")]
    pub commit: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MockMessage {
    #[serde(deserialize_with = "lenient_string")]
    pub message: String,
}

impl MockMessage {
    pub fn mentions_blocker(&self) -> bool {
        let lower = self.message.to_lowercase();
        lower.contains("block") || lower.contains("waiting for")
    }
}

/// Static snapshots read from a mock data directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MockData {
    pub tickets: Vec<MockTicket>,
    pub commits: Vec<MockCommit>,
    pub messages: Vec<MockMessage>,
}

impl MockData {
    /// Missing or malformed files load as empty collections.
    pub async fn load(dir: &Path) -> Self {
        Self {
            tickets: load_collection(&dir.join(TICKETS_FILE)).await,
            commits: load_collection(&dir.join(COMMITS_FILE)).await,
            messages: load_collection(&dir.join(MESSAGES_FILE)).await,
        }
    }

    pub fn blocker_messages(&self) -> impl Iterator<Item = &str> {
        self.messages
            .iter()
            .filter(|message| message.mentions_blocker())
            .map(|message| message.message.as_str())
    }
}

async fn load_collection<T: DeserializeOwned>(path: &Path) -> Vec<T> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("Mock data file {} not found", path.display());
            return Vec::new();
        }
        Err(err) => {
            tracing::warn!("Failed to read mock data {}: {}", path.display(), err);
            return Vec::new();
        }
    };
    let records: Vec<Value> = match serde_json::from_str(&raw) {
        Ok(records) => records,
        Err(err) => {
            tracing::warn!("Ignoring malformed mock data {}: {}", path.display(), err);
            return Vec::new();
        }
    };

    // A bad record is dropped on its own; the rest of the file still loads.
    records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value(record) {
            Ok(item) => Some(item),
            Err(err) => {
                tracing::warn!(
                    "Skipping mock record {} in {}: {}",
                    index,
                    path.display(),
                    err
                );
                None
            }
        })
        .collect()
}

/// Strings pass through, numbers and booleans are rendered, anything else is empty.
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        _ => String::new(),
    })
}

/// Only string due dates are kept; other shapes leave the ticket without one.
fn lenient_due_date<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        _ => None,
    })
}

/// Accepts `YYYY-MM-DD`, a naive ISO datetime, or RFC 3339.
pub fn parse_due_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(datetime.date());
        }
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|datetime| datetime.date_naive())
}
