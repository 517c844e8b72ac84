//! Outbound client for the Bot Framework connector REST API.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::activity::Activity;
use crate::bot::ActivitySink;
use crate::config::ConnectorConfig;

/// Refresh the token this long before the issuer says it expires.
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(300);

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

struct CachedToken {
    value: String,
    expires_at: Instant,
}

pub struct ConnectorClient {
    http: reqwest::Client,
    config: ConnectorConfig,
    token: Mutex<Option<CachedToken>>,
}

impl ConnectorClient {
    pub fn new(config: ConnectorConfig) -> Self {
        if !config.has_credentials() {
            log::warn!("No connector credentials configured, replies are sent unauthenticated");
        }
        Self {
            http: reqwest::Client::new(),
            config,
            token: Mutex::new(None),
        }
    }

    async fn access_token(&self) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.expires_at > Instant::now() + TOKEN_REFRESH_MARGIN {
                return Ok(token.value.clone());
            }
        }

        log::debug!("Requesting connector token from {}", self.config.token_url);
        let resp: TokenResponse = self
            .http
            .post(&self.config.token_url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.config.app_id.as_str()),
                ("client_secret", self.config.app_password.as_str()),
                ("scope", self.config.scope.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let expires_at = Instant::now()
            .checked_add(Duration::from_secs(resp.expires_in))
            .ok_or_else(|| format!("token lifetime out of range: {}s", resp.expires_in))?;

        let value = resp.access_token.clone();
        *cached = Some(CachedToken {
            value: resp.access_token,
            expires_at,
        });
        Ok(value)
    }
}

/// `{serviceUrl}/v3/conversations/{id}/activities[/{replyToId}]`, with the
/// ids percent-encoded as path segments.
pub fn activity_url(activity: &Activity) -> Result<Url, Box<dyn std::error::Error + Send + Sync>> {
    if activity.service_url.is_empty() {
        return Err("activity has no serviceUrl".into());
    }
    if activity.conversation.id.is_empty() {
        return Err("activity has no conversation id".into());
    }

    let mut url = Url::parse(&activity.service_url)?;
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| format!("serviceUrl cannot be a base: {}", activity.service_url))?;
        segments
            .pop_if_empty()
            .extend(["v3", "conversations", activity.conversation.id.as_str(), "activities"]);
        if let Some(reply_to) = &activity.reply_to_id {
            segments.push(reply_to);
        }
    }
    Ok(url)
}

#[async_trait]
impl ActivitySink for ConnectorClient {
    async fn send_activity(
        &self,
        activity: &Activity,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let url = activity_url(activity)?;
        let mut request = self.http.post(url.clone()).json(activity);
        if self.config.has_credentials() {
            request = request.bearer_auth(self.access_token().await?);
        }

        let resp = request.send().await?;
        if let Err(e) = resp.error_for_status_ref() {
            log::error!("Connector rejected reply to {}: {}", url, e);
            return Err(e.into());
        }
        Ok(())
    }
}
