use tauri::State;

use crate::{
    db::models::{ActivityLogEntry, UserProfile},
    AppState,
};

async fn require_admin(state: &State<'_, AppState>) -> Result<(), String> {
    if state.session.is_admin().await {
        Ok(())
    } else {
        Err("admin authentication required".to_string())
    }
}

#[tauri::command]
pub async fn list_registered_users(
    state: State<'_, AppState>,
) -> Result<Vec<UserProfile>, String> {
    require_admin(&state).await?;
    state.db.load_directory().await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn list_activity_logs(
    state: State<'_, AppState>,
) -> Result<Vec<ActivityLogEntry>, String> {
    require_admin(&state).await?;
    state
        .db
        .load_activity_log()
        .await
        .map_err(|e| e.to_string())
}

/// Irreversible bulk clear; the dashboard confirms with the user before
/// invoking this. Registered users are unaffected.
#[tauri::command]
pub async fn clear_activity_logs(state: State<'_, AppState>) -> Result<(), String> {
    require_admin(&state).await?;
    state
        .db
        .clear_activity_log()
        .await
        .map_err(|e| e.to_string())
}
