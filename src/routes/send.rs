use actix_web::{HttpResponse, ResponseError, http::StatusCode, web};

use crate::{
    domain::NotifyMessage,
    telegram_client::{TelegramClient, TelegramError},
};

use super::{envelope, helpers::decode_json_body, helpers::error_chain_fmt};

pub const MESSAGE_SENT: &str = "Message sent successfully";

#[derive(serde::Deserialize)]
pub struct NotifyRequest {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(thiserror::Error)]
pub enum SendError {
    #[error("Invalid request body")]
    InvalidBody(#[source] serde_json::Error),
    #[error("{0}")]
    ValidationError(String),
    #[error(transparent)]
    TelegramError(#[from] TelegramError),
}

impl std::fmt::Debug for SendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for SendError {
    fn status_code(&self) -> StatusCode {
        StatusCode::OK
    }

    fn error_response(&self) -> HttpResponse {
        envelope::error_response(&self.to_string())
    }
}

#[tracing::instrument(
    name = "Forwarding a message to Telegram",
    skip(body, telegram_client),
    fields(message_length = tracing::field::Empty)
)]
pub async fn send(
    body: web::Bytes,
    telegram_client: web::Data<TelegramClient>,
) -> Result<HttpResponse, SendError> {
    let request: NotifyRequest = decode_json_body(&body).map_err(SendError::InvalidBody)?;
    let message = NotifyMessage::parse(request.message.unwrap_or_default())
        .map_err(SendError::ValidationError)?;
    tracing::Span::current().record("message_length", message.as_ref().len());

    telegram_client.send_message(&message).await?;

    Ok(envelope::status_response(MESSAGE_SENT))
}
