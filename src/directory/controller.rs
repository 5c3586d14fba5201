use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use log::error;
use serde::Serialize;
use tauri::{AppHandle, Emitter, Runtime, Wry};
use tauri_plugin_opener::OpenerExt;
use tokio::{sync::Mutex, task::JoinHandle, time};

use crate::db::{
    models::{ActivityKind, ActivityLogEntry, UserProfile},
    Database,
};

use super::matcher::{query_is_searchable, search_directory};

/// Quiet period after the last keystroke before a scan actually runs.
const DEBOUNCE_WINDOW: Duration = Duration::from_millis(300);

#[derive(Serialize, Clone)]
#[serde(rename_all = "camelCase")]
struct SearchResultsEvent {
    query: String,
    results: Vec<UserProfile>,
}

pub struct SearchController<R: Runtime = Wry> {
    db: Database,
    app_handle: AppHandle<R>,
    pending: Arc<Mutex<Option<JoinHandle<()>>>>,
    debounce: Duration,
}

impl<R: Runtime> SearchController<R> {
    pub fn new(app_handle: AppHandle<R>, db: Database) -> Self {
        Self {
            db,
            app_handle,
            pending: Arc::new(Mutex::new(None)),
            debounce: DEBOUNCE_WINDOW,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_debounce(app_handle: AppHandle<R>, db: Database, debounce: Duration) -> Self {
        Self {
            db,
            app_handle,
            pending: Arc::new(Mutex::new(None)),
            debounce,
        }
    }

    /// Cancel-and-reschedule: each keystroke aborts any pending scan and
    /// schedules a new one, so only the last keystroke within the window
    /// reaches the directory. Short queries clear results immediately without
    /// touching storage.
    pub async fn queue(&self, query: String, actor: UserProfile) {
        let mut pending = self.pending.lock().await;
        if let Some(handle) = pending.take() {
            handle.abort();
        }

        if !query_is_searchable(&query) {
            emit_results(&self.app_handle, &query, Vec::new());
            return;
        }

        let db = self.db.clone();
        let app_handle = self.app_handle.clone();
        let debounce = self.debounce;
        let handle = tokio::spawn(async move {
            time::sleep(debounce).await;
            match run_scan(&db, &query, &actor).await {
                Ok(results) => emit_results(&app_handle, &query, results),
                Err(err) => error!("Directory scan for '{query}' failed: {err:#}"),
            }
        });

        *pending = Some(handle);
    }

    /// Separate from search: records the call attempt, then hands the number
    /// to the platform dialer. Whether the call connects is never verified.
    pub async fn call_owner(&self, phone: &str, owner_name: &str, actor: &UserProfile) -> Result<()> {
        self.db
            .append_activity(&ActivityLogEntry::record(
                actor,
                ActivityKind::CallAction,
                format!("Attempted to call owner: {owner_name}"),
            ))
            .await?;

        self.app_handle
            .opener()
            .open_url(format!("tel:{phone}"), None::<&str>)
            .with_context(|| format!("failed to open dialer for {owner_name}"))?;

        Ok(())
    }
}

/// Load, filter, and log. A search that finds at least one match appends
/// exactly one SEARCH entry; empty-result searches leave no trace.
pub(crate) async fn run_scan(
    db: &Database,
    query: &str,
    actor: &UserProfile,
) -> Result<Vec<UserProfile>> {
    if !query_is_searchable(query) {
        return Ok(Vec::new());
    }

    let directory = db.load_directory().await?;
    let results = search_directory(query, &directory);

    if !results.is_empty() {
        db.append_activity(&ActivityLogEntry::record(
            actor,
            ActivityKind::Search,
            format!("Searched for: {query}"),
        ))
        .await?;
    }

    Ok(results)
}

fn emit_results<R: Runtime>(app_handle: &AppHandle<R>, query: &str, results: Vec<UserProfile>) {
    let payload = SearchResultsEvent {
        query: query.to_string(),
        results,
    };

    let _ = app_handle.emit("search-results", payload);
}
