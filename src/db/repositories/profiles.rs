use anyhow::Result;

use crate::db::{
    helpers::{decode_json, kv_delete, kv_get, kv_put},
    models::UserProfile,
    Database, KEY_ALL_USERS, KEY_IS_ADMIN, KEY_USER_PROFILE,
};

impl Database {
    /// Get the profile of whoever registered on this device, if anyone has.
    pub async fn load_current_user(&self) -> Result<Option<UserProfile>> {
        self.execute(|conn| {
            let raw = kv_get(conn, KEY_USER_PROFILE)?;
            raw.map(|raw| decode_json(KEY_USER_PROFILE, &raw)).transpose()
        })
        .await
    }

    /// Overwrite the current-user slot. No merge semantics.
    pub async fn save_current_user(&self, profile: &UserProfile) -> Result<()> {
        let raw = serde_json::to_string(profile)?;
        self.execute(move |conn| kv_put(conn, KEY_USER_PROFILE, &raw))
            .await
    }

    /// The full directory in insertion order; empty when nobody has registered.
    pub async fn load_directory(&self) -> Result<Vec<UserProfile>> {
        self.execute(|conn| match kv_get(conn, KEY_ALL_USERS)? {
            Some(raw) => decode_json(KEY_ALL_USERS, &raw),
            None => Ok(Vec::new()),
        })
        .await
    }

    /// Read the full directory, push, rewrite. The worker thread serializes
    /// writers within this process; concurrent processes sharing the file are
    /// still last-writer-wins.
    pub async fn append_to_directory(&self, profile: &UserProfile) -> Result<()> {
        let profile = profile.clone();
        self.execute(move |conn| {
            let mut directory: Vec<UserProfile> = match kv_get(conn, KEY_ALL_USERS)? {
                Some(raw) => decode_json(KEY_ALL_USERS, &raw)?,
                None => Vec::new(),
            };
            directory.push(profile);
            let raw = serde_json::to_string(&directory)?;
            kv_put(conn, KEY_ALL_USERS, &raw)
        })
        .await
    }

    pub async fn load_admin_flag(&self) -> Result<bool> {
        self.execute(|conn| Ok(kv_get(conn, KEY_IS_ADMIN)?.as_deref() == Some("true")))
            .await
    }

    pub async fn save_admin_flag(&self) -> Result<()> {
        self.execute(|conn| kv_put(conn, KEY_IS_ADMIN, "true")).await
    }

    pub async fn clear_admin_flag(&self) -> Result<()> {
        self.execute(|conn| kv_delete(conn, KEY_IS_ADMIN)).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use crate::db::{helpers::kv_put, models::UserProfile, Database, KEY_ALL_USERS};

    fn temp_db() -> Database {
        let path = std::env::temp_dir().join(format!("whoparked-test-{}.sqlite3", Uuid::new_v4()));
        Database::new(path).unwrap()
    }

    fn profile(name: &str, plate: &str) -> UserProfile {
        UserProfile {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            phone: "9087654321".to_string(),
            vehicle_number: plate.to_string(),
            department: "IMCA".to_string(),
            semester: "S2".to_string(),
            registered_at: Utc::now().timestamp_millis(),
        }
    }

    #[tokio::test]
    async fn current_user_roundtrip() {
        let db = temp_db();
        assert!(db.load_current_user().await.unwrap().is_none());

        let alice = profile("Alice", "KL01AB1234");
        db.save_current_user(&alice).await.unwrap();
        assert_eq!(db.load_current_user().await.unwrap(), Some(alice));
    }

    #[tokio::test]
    async fn directory_appends_preserve_insertion_order() {
        let db = temp_db();
        let first = profile("Alice", "KL01AB1234");
        let second = profile("Bob", "KL07CD5678");

        db.append_to_directory(&first).await.unwrap();
        db.append_to_directory(&second).await.unwrap();

        let directory = db.load_directory().await.unwrap();
        assert_eq!(directory, vec![first, second.clone()]);
        assert_eq!(directory.last(), Some(&second));
    }

    #[tokio::test]
    async fn load_directory_is_idempotent() {
        let db = temp_db();
        db.append_to_directory(&profile("Alice", "KL01AB1234"))
            .await
            .unwrap();

        let once = db.load_directory().await.unwrap();
        let twice = db.load_directory().await.unwrap();
        assert_eq!(once, twice);
    }

    #[tokio::test]
    async fn malformed_directory_blob_fails_the_read() {
        let db = temp_db();
        db.execute(|conn| kv_put(conn, KEY_ALL_USERS, "not json"))
            .await
            .unwrap();

        let err = db.load_directory().await.unwrap_err();
        assert!(err.to_string().contains(KEY_ALL_USERS));
    }

    #[tokio::test]
    async fn admin_flag_lifecycle() {
        let db = temp_db();
        assert!(!db.load_admin_flag().await.unwrap());

        db.save_admin_flag().await.unwrap();
        assert!(db.load_admin_flag().await.unwrap());

        db.clear_admin_flag().await.unwrap();
        assert!(!db.load_admin_flag().await.unwrap());
    }
}
