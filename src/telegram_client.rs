use std::time::Duration;

use anyhow::Context;
use reqwest::{Client, StatusCode, Url, header::CONTENT_TYPE};
use secrecy::ExposeSecret;
use serde::Serialize;

use crate::domain::{NotifyMessage, TelegramCredentials};

const PARSE_MODE: &str = "HTML";

#[derive(Clone)]
pub struct TelegramClient {
    http_client: Client,
    base_url: Url,
    credentials: TelegramCredentials,
}

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

#[derive(thiserror::Error, Debug)]
pub enum TelegramError {
    #[error("error marshaling message: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("error sending message: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("unexpected status code: {}", .0.as_u16())]
    UnexpectedStatus(StatusCode),
}

impl TelegramClient {
    pub fn new(
        base_url: String,
        credentials: TelegramCredentials,
        timeout: Duration,
    ) -> Result<Self, anyhow::Error> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build the Telegram HTTP client.")?;
        let base_url = Url::parse(&base_url).context("Failed parsing Telegram api url.")?;

        Ok(Self {
            http_client,
            base_url,
            credentials,
        })
    }

    fn send_message_url(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.base_url.as_str().trim_end_matches('/'),
            self.credentials.bot_token.expose_secret()
        )
    }

    /// Only a plain `200 OK` from Telegram counts as delivered.
    #[tracing::instrument(name = "Sending message to Telegram", skip_all)]
    pub async fn send_message(&self, message: &NotifyMessage) -> Result<(), TelegramError> {
        let body = SendMessageRequest {
            chat_id: self.credentials.chat_id.as_ref(),
            text: message.as_ref(),
            parse_mode: PARSE_MODE,
        };
        let body = serde_json::to_vec(&body).map_err(TelegramError::Serialize)?;

        // The url embeds the bot token, keep it out of error messages.
        let response = self
            .http_client
            .post(self.send_message_url())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| TelegramError::Transport(e.without_url()))?;

        if response.status() != StatusCode::OK {
            return Err(TelegramError::UnexpectedStatus(response.status()));
        }

        Ok(())
    }
}
