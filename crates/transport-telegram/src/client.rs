//! Bot API HTTP client

use crate::types::{ApiResponse, GetUpdatesRequest, SendMessageRequest, Update};
use cmdrelay_core::error::{AppError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

const DEFAULT_API_URL: &str = "https://api.telegram.org";
const DEFAULT_POLL_TIMEOUT_SECS: u64 = 30;

/// Extra time on top of the long-poll timeout before the HTTP call gives up
const HTTP_TIMEOUT_MARGIN: Duration = Duration::from_secs(10);

/// Only plain messages are requested from the Bot API
const ALLOWED_UPDATES: &[&str] = &["message"];

/// Telegram transport configuration
#[derive(Clone)]
pub struct TelegramConfig {
    pub api_url: String,
    pub token: String,
    pub poll_timeout_secs: u64,
}

impl TelegramConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: token.into(),
            poll_timeout_secs: DEFAULT_POLL_TIMEOUT_SECS,
        }
    }
}

// Never print the token
impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("api_url", &self.api_url)
            .field("token", &"<redacted>")
            .field("poll_timeout_secs", &self.poll_timeout_secs)
            .finish()
    }
}

/// Thin Bot API client
pub struct TelegramClient {
    http: reqwest::Client,
    config: TelegramConfig,
}

impl TelegramClient {
    pub fn new(config: TelegramConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.poll_timeout_secs) + HTTP_TIMEOUT_MARGIN)
            .build()
            .map_err(map_reqwest_error)?;

        Ok(Self { http, config })
    }

    /// Long-poll for updates with `update_id >= offset`
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>> {
        let request = GetUpdatesRequest {
            offset,
            timeout: self.config.poll_timeout_secs,
            limit: None,
            allowed_updates: ALLOWED_UPDATES,
        };
        self.call("getUpdates", &request).await
    }

    /// Mark every update below `offset` as read without waiting.
    ///
    /// The Bot API only forgets updates once a later `getUpdates` carries a
    /// higher offset, so this must be the last call before exit.
    pub async fn confirm_offset(&self, offset: i64) -> Result<()> {
        let request = GetUpdatesRequest {
            offset,
            timeout: 0,
            limit: Some(1),
            allowed_updates: ALLOWED_UPDATES,
        };
        let _: Vec<Update> = self.call("getUpdates", &request).await?;
        Ok(())
    }

    /// Send a plain-text message
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        let request = SendMessageRequest { chat_id, text };
        let _: serde_json::Value = self.call("sendMessage", &request).await?;
        Ok(())
    }

    async fn call<P, T>(&self, method: &str, params: &P) -> Result<T>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!(
            "{}/bot{}/{}",
            self.config.api_url.trim_end_matches('/'),
            self.config.token,
            method
        );

        // Error bodies are JSON envelopes too, so the status is not checked
        let response: ApiResponse<T> = self
            .http
            .post(url)
            .json(params)
            .send()
            .await
            .map_err(map_reqwest_error)?
            .json()
            .await
            .map_err(map_reqwest_error)?;

        if !response.ok {
            return Err(AppError::Transport(format!(
                "{} failed ({}): {}",
                method,
                response
                    .error_code
                    .map_or_else(|| "no code".to_string(), |c| c.to_string()),
                response.description.unwrap_or_default()
            )));
        }

        response
            .result
            .ok_or_else(|| AppError::Transport(format!("{} returned no result", method)))
    }
}

/// reqwest errors carry the request URL, which embeds the bot token
fn map_reqwest_error(err: reqwest::Error) -> AppError {
    AppError::Transport(err.without_url().to_string())
}
