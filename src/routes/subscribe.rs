use actix_web::{HttpResponse, ResponseError, http::StatusCode, web};

use crate::{
    beehiiv_client::{BeehiivClient, BeehiivCredentials, BeehiivError, MissingSecret},
    domain::{Attribution, NewSubscription},
    secrets::SecretSource,
};

use super::{envelope, helpers::decode_json_body, helpers::error_chain_fmt};

pub const SUBSCRIPTION_SUCCESSFUL: &str = "Subscription successful";

#[derive(serde::Deserialize)]
pub struct SubscribeRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub utm_source: Option<String>,
    #[serde(default)]
    pub utm_medium: Option<String>,
    #[serde(default)]
    pub referring_site: Option<String>,
}

impl TryFrom<SubscribeRequest> for NewSubscription {
    type Error = String;

    fn try_from(value: SubscribeRequest) -> Result<Self, Self::Error> {
        let attribution =
            Attribution::new(value.utm_source, value.utm_medium, value.referring_site);
        NewSubscription::parse(value.email.unwrap_or_default(), attribution)
    }
}

#[derive(thiserror::Error)]
pub enum SubscribeError {
    #[error("Invalid request body")]
    InvalidBody(#[source] serde_json::Error),
    #[error("{0}")]
    ValidationError(String),
    #[error(transparent)]
    MissingSecret(#[from] MissingSecret),
    #[error(transparent)]
    BeehiivError(#[from] BeehiivError),
}

impl std::fmt::Debug for SubscribeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for SubscribeError {
    fn status_code(&self) -> StatusCode {
        StatusCode::OK
    }

    fn error_response(&self) -> HttpResponse {
        envelope::error_response(&self.to_string())
    }
}

#[tracing::instrument(
    name = "Adding a new subscriber.",
    skip(body, beehiiv_client, secrets),
    fields(subscriber_email = tracing::field::Empty)
)]
pub async fn subscribe(
    body: web::Bytes,
    beehiiv_client: web::Data<BeehiivClient>,
    secrets: web::Data<dyn SecretSource>,
) -> Result<HttpResponse, SubscribeError> {
    let request: SubscribeRequest =
        decode_json_body(&body).map_err(SubscribeError::InvalidBody)?;
    let subscription: NewSubscription =
        request.try_into().map_err(SubscribeError::ValidationError)?;
    tracing::Span::current().record(
        "subscriber_email",
        tracing::field::display(subscription.email.as_ref()),
    );

    let credentials = BeehiivCredentials::from_source(secrets.get_ref())?;

    beehiiv_client
        .create_subscription(&credentials, &subscription)
        .await?;

    Ok(envelope::status_response(SUBSCRIPTION_SUCCESSFUL))
}
