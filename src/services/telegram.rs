//! Telegram Bot API notifier.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::config::TelegramConfig;
use crate::services::endpoint;
use crate::services::notifier::{Notifier, NotifierError};

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

pub struct TelegramNotifier {
    client: Client,
    api_url: Url,
    bot_token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(config: &TelegramConfig) -> Result<Self, NotifierError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| NotifierError::Delivery(e.to_string()))?;
        Ok(Self::with_client(config, client))
    }

    pub fn with_client(config: &TelegramConfig, client: Client) -> Self {
        Self {
            client,
            api_url: config.api_url.clone(),
            bot_token: config.bot_token.clone(),
            chat_id: config.chat_id.clone(),
        }
    }

    fn method_url(&self, method: &str) -> Result<Url, NotifierError> {
        let bot = format!("bot{}", self.bot_token);
        endpoint(&self.api_url, &[bot.as_str(), method]).map_err(NotifierError::Delivery)
    }

    /// Call `getMe` to confirm the bot token is accepted.
    pub async fn verify_credentials(&self) -> Result<(), NotifierError> {
        let response = self
            .client
            .get(self.method_url("getMe")?)
            .send()
            .await
            .map_err(|e| NotifierError::Delivery(without_token(&e.to_string(), &self.bot_token)))?;
        check_response(response).await?;
        info!("Telegram: bot credentials verified");
        Ok(())
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, message: &str) -> Result<(), NotifierError> {
        let body = SendMessageRequest {
            chat_id: &self.chat_id,
            text: message,
            parse_mode: "Markdown",
        };

        let response = self
            .client
            .post(self.method_url("sendMessage")?)
            .json(&body)
            .send()
            .await
            .map_err(|e| NotifierError::Delivery(without_token(&e.to_string(), &self.bot_token)))?;
        check_response(response).await?;

        debug!(chat_id = %self.chat_id, "Telegram: message delivered");
        Ok(())
    }
}

async fn check_response(response: reqwest::Response) -> Result<(), NotifierError> {
    let status = response.status();
    let parsed = response.json::<ApiResponse>().await.ok();
    let description = parsed
        .as_ref()
        .and_then(|r| r.description.clone())
        .unwrap_or_else(|| status.to_string());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(NotifierError::Auth(description)),
        s if !s.is_success() => Err(NotifierError::Delivery(description)),
        _ if !parsed.map(|r| r.ok).unwrap_or(false) => Err(NotifierError::Delivery(description)),
        _ => Ok(()),
    }
}

/// reqwest errors include the request URL, which embeds the bot token.
fn without_token(message: &str, token: &str) -> String {
    message.replace(token, "<redacted>")
}
