use std::time::Duration;

use anyhow::{bail, Context, Result};
use log::warn;
use reqwest::Client;
use serde::Serialize;
use serde_json::{json, Value};

use crate::db::{
    models::{ActivityKind, ActivityLogEntry, UserProfile},
    Database,
};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const MODEL: &str = "gemini-3-flash-preview";

const SYSTEM_INSTRUCTION: &str = "You are an AI Parking Assistant for Garvasis College. \
Help users find vehicle information, explain check-in/out procedures, or direct them to \
tutors if their vehicle is blocked. Keep responses concise and friendly for mobile users.";

/// Shown whenever the call cannot be completed for any reason.
pub const CONNECTION_FALLBACK: &str = "I'm having trouble connecting to the smart assistant. \
Please use the manual search or contact a tutor.";

/// Shown when the endpoint answers but produces no text.
pub const EMPTY_RESPONSE_FALLBACK: &str =
    "I'm sorry, I couldn't generate a response at the moment.";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantContext {
    pub user_name: String,
    pub department: String,
    pub semester: String,
    pub activity: String,
}

impl AssistantContext {
    pub fn for_user(profile: &UserProfile, activity: &str) -> Self {
        Self {
            user_name: profile.name.clone(),
            department: profile.department.clone(),
            semester: profile.semester.clone(),
            activity: activity.to_string(),
        }
    }
}

/// Thin wrapper around one hosted text-generation call. Single best-effort
/// POST, no retry, no cancellation; callers always get a displayable string.
pub struct AssistantGateway {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl AssistantGateway {
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY").ok();
        if api_key.is_none() {
            warn!("GEMINI_API_KEY is not set; assistant replies will fall back");
        }
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub(crate) fn with_base_url(api_key: Option<String>, base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Always returns displayable text; every failure path degrades to a
    /// fixed fallback string and the error never reaches the caller.
    pub async fn advise(&self, query: &str, context: &AssistantContext) -> String {
        match self.request(query, context).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!("Assistant request failed: {err:#}");
                CONNECTION_FALLBACK.to_string()
            }
        }
    }

    async fn request(&self, query: &str, context: &AssistantContext) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .context("GEMINI_API_KEY is not set")?;

        let context_json = serde_json::to_string(context)?;
        let body = json!({
            "system_instruction": { "parts": [{ "text": SYSTEM_INSTRUCTION }] },
            "contents": [{
                "role": "user",
                "parts": [{ "text": format!("User Query: {query}\nContext: {context_json}") }]
            }]
        });

        let url = format!("{}/models/{}:generateContent", self.base_url, MODEL);
        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .context("assistant request failed")?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .context("failed to read assistant response body")?;
        if !status.is_success() {
            bail!("assistant endpoint returned {status}: {text}");
        }

        let data: Value =
            serde_json::from_str(&text).context("failed to parse assistant response JSON")?;

        let reply = extract_candidate_text(&data);
        if reply.trim().is_empty() {
            Ok(EMPTY_RESPONSE_FALLBACK.to_string())
        } else {
            Ok(reply)
        }
    }
}

fn extract_candidate_text(data: &Value) -> String {
    data["candidates"]
        .get(0)
        .and_then(|candidate| candidate["content"]["parts"].as_array())
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default()
}

/// One AI_CONSULT entry is written per invocation, before the call, so the
/// audit trail records the query whether or not the endpoint answers.
pub async fn consult(
    db: &Database,
    gateway: &AssistantGateway,
    actor: &UserProfile,
    query: &str,
) -> Result<String> {
    db.append_activity(&ActivityLogEntry::record(
        actor,
        ActivityKind::AiConsult,
        format!("Asked assistant: {query}"),
    ))
    .await?;

    let context = AssistantContext::for_user(actor, "parking-assistant");
    Ok(gateway.advise(query, &context).await)
}
