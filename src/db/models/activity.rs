use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserProfile;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityKind {
    Search,
    CallAction,
    AiConsult,
}

/// One logged action. `user_id`/`user_name` are snapshots of the acting user
/// taken at log time, never live references. Entries are immutable once
/// written; only a whole-log clear removes them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLogEntry {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub action: ActivityKind,
    pub details: String,
    /// Epoch milliseconds.
    pub timestamp: i64,
}

impl ActivityLogEntry {
    pub fn record(actor: &UserProfile, action: ActivityKind, details: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: actor.id.clone(),
            user_name: actor.name.clone(),
            action,
            details: details.into(),
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}
