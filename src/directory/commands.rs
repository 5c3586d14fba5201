use tauri::State;

use crate::AppState;

#[tauri::command]
pub async fn queue_search(query: String, state: State<'_, AppState>) -> Result<(), String> {
    let actor = state
        .session
        .current_user()
        .await
        .ok_or_else(|| "no registered profile".to_string())?;

    state.search.queue(query, actor).await;
    Ok(())
}

#[tauri::command]
pub async fn call_owner(
    phone: String,
    owner_name: String,
    state: State<'_, AppState>,
) -> Result<(), String> {
    let actor = state
        .session
        .current_user()
        .await
        .ok_or_else(|| "no registered profile".to_string())?;

    state
        .search
        .call_owner(&phone, &owner_name, &actor)
        .await
        .map_err(|e| e.to_string())
}
