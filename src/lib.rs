mod admin_commands;
mod assistant;
mod db;
mod directory;
mod session;
mod settings;

use admin_commands::{clear_activity_logs, list_activity_logs, list_registered_users};
use assistant::AssistantGateway;
use db::Database;
use directory::{
    commands::{call_owner, queue_search},
    SearchController,
};
use log::info;
use session::{
    commands::{
        admin_login, admin_logout, bootstrap_session, get_session_state, navigate, register_user,
    },
    SessionController,
};
use settings::{SettingsStore, ThemeSettings};
use tauri::{Emitter, Manager, State};

pub(crate) struct AppState {
    pub(crate) db: Database,
    pub(crate) session: SessionController,
    pub(crate) search: SearchController,
    pub(crate) assistant: AssistantGateway,
    pub(crate) settings: SettingsStore,
}

#[tauri::command]
async fn ask_assistant(query: String, state: State<'_, AppState>) -> Result<String, String> {
    let actor = state
        .session
        .current_user()
        .await
        .ok_or_else(|| "no registered profile".to_string())?;

    assistant::consult(&state.db, &state.assistant, &actor, &query)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
fn get_theme_settings(state: State<AppState>) -> Result<ThemeSettings, String> {
    Ok(state.settings.theme())
}

#[tauri::command]
fn set_theme_settings(
    settings: ThemeSettings,
    state: State<AppState>,
    app_handle: tauri::AppHandle,
) -> Result<(), String> {
    state
        .settings
        .update_theme(settings.clone())
        .map_err(|e| e.to_string())?;

    app_handle
        .emit("theme-settings-updated", &settings)
        .map_err(|e| e.to_string())?;

    Ok(())
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("WhoParked starting up...");

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .setup(|app| {
            let result = (|| -> anyhow::Result<()> {
                let app_data_dir = app
                    .path()
                    .app_data_dir()
                    .map_err(|err| anyhow::anyhow!(err))?;
                std::fs::create_dir_all(&app_data_dir)?;

                let db_path = app_data_dir.join("whoparked.sqlite3");
                let database = Database::new(db_path)?;

                let session_controller = SessionController::new(database.clone());

                // Restore the session before the first render; the frontend
                // re-bootstraps with the location-hash hint once it mounts.
                {
                    let controller = session_controller.clone();
                    tauri::async_runtime::block_on(async move {
                        let state = controller.bootstrap(None).await?;
                        info!("Session restored; starting on route {}", state.route.as_str());
                        Ok::<(), anyhow::Error>(())
                    })?;
                }

                let search_controller = SearchController::new(app.handle().clone(), database.clone());

                let settings_path = app_data_dir.join("settings.json");
                let settings_store = SettingsStore::new(settings_path)?;

                app.manage(AppState {
                    db: database,
                    session: session_controller,
                    search: search_controller,
                    assistant: AssistantGateway::from_env()?,
                    settings: settings_store,
                });

                Ok(())
            })();

            result.map_err(|err| err.into())
        })
        .invoke_handler(tauri::generate_handler![
            bootstrap_session,
            get_session_state,
            navigate,
            register_user,
            admin_login,
            admin_logout,
            queue_search,
            call_owner,
            ask_assistant,
            list_registered_users,
            list_activity_logs,
            clear_activity_logs,
            get_theme_settings,
            set_theme_settings,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
