use tauri::{AppHandle, Emitter, State};

use crate::AppState;

use super::{RegistrationForm, Route, SessionState};

fn emit_session_changed(app_handle: &AppHandle, state: &SessionState) {
    let _ = app_handle.emit("session-changed", state.clone());
}

#[tauri::command]
pub async fn bootstrap_session(
    hint: Option<Route>,
    state: State<'_, AppState>,
    app_handle: AppHandle,
) -> Result<SessionState, String> {
    let session = state
        .session
        .bootstrap(hint)
        .await
        .map_err(|e| e.to_string())?;
    emit_session_changed(&app_handle, &session);
    Ok(session)
}

#[tauri::command]
pub async fn get_session_state(state: State<'_, AppState>) -> Result<SessionState, String> {
    Ok(state.session.state().await)
}

#[tauri::command]
pub async fn navigate(
    route: Route,
    state: State<'_, AppState>,
    app_handle: AppHandle,
) -> Result<SessionState, String> {
    let session = state.session.navigate(route).await;
    emit_session_changed(&app_handle, &session);
    Ok(session)
}

#[tauri::command]
pub async fn register_user(
    form: RegistrationForm,
    state: State<'_, AppState>,
    app_handle: AppHandle,
) -> Result<SessionState, String> {
    let session = state
        .session
        .register(form)
        .await
        .map_err(|e| e.to_string())?;
    emit_session_changed(&app_handle, &session);
    Ok(session)
}

#[tauri::command]
pub async fn admin_login(
    username: String,
    password: String,
    state: State<'_, AppState>,
    app_handle: AppHandle,
) -> Result<SessionState, String> {
    let session = state
        .session
        .admin_login(&username, &password)
        .await
        .map_err(|e| e.to_string())?;
    emit_session_changed(&app_handle, &session);
    Ok(session)
}

#[tauri::command]
pub async fn admin_logout(
    state: State<'_, AppState>,
    app_handle: AppHandle,
) -> Result<SessionState, String> {
    let session = state
        .session
        .admin_logout()
        .await
        .map_err(|e| e.to_string())?;
    emit_session_changed(&app_handle, &session);
    Ok(session)
}
