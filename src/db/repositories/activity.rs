use anyhow::Result;

use crate::db::{
    helpers::{decode_json, kv_delete, kv_get, kv_put},
    models::ActivityLogEntry,
    Database, KEY_ACTIVITY_LOGS,
};

impl Database {
    /// All log entries, newest first; empty when none have been written.
    pub async fn load_activity_log(&self) -> Result<Vec<ActivityLogEntry>> {
        self.execute(|conn| match kv_get(conn, KEY_ACTIVITY_LOGS)? {
            Some(raw) => decode_json(KEY_ACTIVITY_LOGS, &raw),
            None => Ok(Vec::new()),
        })
        .await
    }

    /// Prepend the entry and rewrite the full sequence.
    pub async fn append_activity(&self, entry: &ActivityLogEntry) -> Result<()> {
        let entry = entry.clone();
        self.execute(move |conn| {
            let mut log: Vec<ActivityLogEntry> = match kv_get(conn, KEY_ACTIVITY_LOGS)? {
                Some(raw) => decode_json(KEY_ACTIVITY_LOGS, &raw)?,
                None => Vec::new(),
            };
            log.insert(0, entry);
            let raw = serde_json::to_string(&log)?;
            kv_put(conn, KEY_ACTIVITY_LOGS, &raw)
        })
        .await
    }

    /// Irreversible. The invoking surface must confirm with the user first.
    pub async fn clear_activity_log(&self) -> Result<()> {
        self.execute(|conn| kv_delete(conn, KEY_ACTIVITY_LOGS)).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use crate::db::{
        models::{ActivityKind, ActivityLogEntry, UserProfile},
        Database,
    };

    fn temp_db() -> Database {
        let path = std::env::temp_dir().join(format!("whoparked-test-{}.sqlite3", Uuid::new_v4()));
        Database::new(path).unwrap()
    }

    fn actor() -> UserProfile {
        UserProfile {
            id: Uuid::new_v4().to_string(),
            name: "Alice".to_string(),
            phone: "9087654321".to_string(),
            vehicle_number: "KL01AB1234".to_string(),
            department: "IMCA".to_string(),
            semester: "S2".to_string(),
            registered_at: Utc::now().timestamp_millis(),
        }
    }

    #[tokio::test]
    async fn entries_are_prepended_newest_first() {
        let db = temp_db();
        let who = actor();

        let first = ActivityLogEntry::record(&who, ActivityKind::Search, "Searched for: KL01");
        let second =
            ActivityLogEntry::record(&who, ActivityKind::CallAction, "Attempted to call owner: Bob");
        db.append_activity(&first).await.unwrap();
        db.append_activity(&second).await.unwrap();

        let log = db.load_activity_log().await.unwrap();
        assert_eq!(log, vec![second, first]);
    }

    #[tokio::test]
    async fn clear_empties_the_log_but_not_the_directory() {
        let db = temp_db();
        let who = actor();

        db.append_to_directory(&who).await.unwrap();
        db.append_activity(&ActivityLogEntry::record(
            &who,
            ActivityKind::Search,
            "Searched for: KL01",
        ))
        .await
        .unwrap();

        db.clear_activity_log().await.unwrap();

        assert!(db.load_activity_log().await.unwrap().is_empty());
        assert_eq!(db.load_directory().await.unwrap(), vec![who]);
    }
}
