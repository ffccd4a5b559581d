//! Slack Web API adapter implementing the `ChatService` contract.
//!
//! All endpoints share the same envelope: `ok` plus an `error` code on
//! failure. Error codes are mapped onto the domain taxonomy; anything
//! unrecognized is reported as a transport failure with the raw code.

use std::{collections::HashMap, env, sync::Mutex};

use async_trait::async_trait;
use serde::Deserialize;

use crate::{
    domain::{
        events::ServiceError,
        message::{ChannelInfo, RemoteMessage},
    },
    infra::error::AppError,
    usecases::contracts::ChatService,
};

const API_BASE: &str = "https://slack.com/api";
const TOKEN_ENV_VAR: &str = "SLACK_TOKEN";

pub struct SlackClient {
    http: reqwest::Client,
    token: String,
    // users.info is called per message sender; cache resolutions for
    // the session so polling does not hammer the endpoint.
    user_names: Mutex<HashMap<String, String>>,
}

impl SlackClient {
    pub fn new(token: String) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(AppError::ClientBuild)?;
        Ok(Self {
            http,
            token,
            user_names: Mutex::new(HashMap::new()),
        })
    }

    pub fn from_env() -> Result<Self, AppError> {
        let token = env::var(TOKEN_ENV_VAR).map_err(|_| AppError::MissingToken)?;
        Self::new(token)
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ServiceError> {
        self.http
            .get(format!("{API_BASE}/{method}"))
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .await
            .map_err(transport)?
            .json::<T>()
            .await
            .map_err(transport)
    }

    async fn post<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        body: &serde_json::Value,
    ) -> Result<T, ServiceError> {
        self.http
            .post(format!("{API_BASE}/{method}"))
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await
            .map_err(transport)?
            .json::<T>()
            .await
            .map_err(transport)
    }

    fn cached_name(&self, sender_ref: &str) -> Option<String> {
        self.user_names
            .lock()
            .expect("user name cache lock")
            .get(sender_ref)
            .cloned()
    }

    fn cache_name(&self, sender_ref: &str, name: &str) {
        self.user_names
            .lock()
            .expect("user name cache lock")
            .insert(sender_ref.to_owned(), name.to_owned());
    }
}

#[async_trait]
impl ChatService for SlackClient {
    async fn channel_info(&self, channel_id: &str) -> Result<ChannelInfo, ServiceError> {
        let envelope: ChannelInfoEnvelope = self
            .get("conversations.info", &[("channel", channel_id)])
            .await?;
        let payload = check(envelope.ok, envelope.error, envelope.channel)?;
        Ok(ChannelInfo { name: payload.name })
    }

    async fn fetch_history(
        &self,
        channel_id: &str,
        since_cursor: &str,
        limit: usize,
    ) -> Result<Vec<RemoteMessage>, ServiceError> {
        let limit = limit.to_string();
        let mut query = vec![("channel", channel_id), ("limit", limit.as_str())];
        if !since_cursor.is_empty() {
            query.push(("oldest", since_cursor));
        }

        let envelope: HistoryEnvelope = self.get("conversations.history", &query).await?;
        let messages = check(envelope.ok, envelope.error, Some(envelope.messages))?;
        Ok(messages.into_iter().map(RemoteMessage::from).collect())
    }

    async fn send_message(&self, channel_id: &str, text: &str) -> Result<String, ServiceError> {
        let body = serde_json::json!({ "channel": channel_id, "text": text });
        let envelope: PostMessageEnvelope = self.post("chat.postMessage", &body).await?;
        check(envelope.ok, envelope.error, envelope.ts)
    }

    async fn resolve_sender_name(&self, sender_ref: &str) -> Result<String, ServiceError> {
        if let Some(name) = self.cached_name(sender_ref) {
            return Ok(name);
        }

        let envelope: UserInfoEnvelope = self.get("users.info", &[("user", sender_ref)]).await?;
        let user = check(envelope.ok, envelope.error, envelope.user)?;
        let name = user.display_name();
        self.cache_name(sender_ref, &name);
        Ok(name)
    }
}

fn transport(error: reqwest::Error) -> ServiceError {
    ServiceError::Transport(error.to_string())
}

/// Unwraps a Slack envelope: `ok:false` carries an error code, and a
/// missing payload on `ok:true` is a contract violation.
fn check<T>(ok: bool, error: Option<String>, payload: Option<T>) -> Result<T, ServiceError> {
    if !ok {
        return Err(map_api_error(error.as_deref().unwrap_or("unknown_error")));
    }
    payload.ok_or_else(|| ServiceError::Transport("response payload missing".to_owned()))
}

fn map_api_error(code: &str) -> ServiceError {
    match code {
        "ratelimited" | "rate_limited" => ServiceError::RateLimited,
        "invalid_auth" | "not_authed" | "token_revoked" | "token_expired" | "missing_scope"
        | "not_in_channel" => ServiceError::Auth,
        "channel_not_found" | "user_not_found" => ServiceError::NotFound,
        other => ServiceError::Transport(other.to_owned()),
    }
}

#[derive(Debug, Deserialize)]
struct ChannelInfoEnvelope {
    ok: bool,
    error: Option<String>,
    channel: Option<ChannelPayload>,
}

#[derive(Debug, Deserialize)]
struct ChannelPayload {
    name: String,
}

#[derive(Debug, Deserialize)]
struct HistoryEnvelope {
    ok: bool,
    error: Option<String>,
    #[serde(default)]
    messages: Vec<MessagePayload>,
}

#[derive(Debug, Deserialize)]
struct MessagePayload {
    ts: String,
    #[serde(default)]
    text: String,
    #[serde(default)]
    user: Option<String>,
}

impl From<MessagePayload> for RemoteMessage {
    fn from(payload: MessagePayload) -> Self {
        Self {
            id: payload.ts,
            text: payload.text,
            sender_ref: payload.user.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PostMessageEnvelope {
    ok: bool,
    error: Option<String>,
    ts: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UserInfoEnvelope {
    ok: bool,
    error: Option<String>,
    user: Option<UserPayload>,
}

#[derive(Debug, Deserialize)]
struct UserPayload {
    name: String,
    #[serde(default)]
    profile: Option<UserProfile>,
}

#[derive(Debug, Deserialize)]
struct UserProfile {
    #[serde(default)]
    display_name: String,
}

impl UserPayload {
    /// Prefers the profile display name, falling back to the account
    /// name when the profile leaves it empty.
    fn display_name(&self) -> String {
        self.profile
            .as_ref()
            .map(|profile| profile.display_name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.name)
            .to_owned()
    }
}
