use std::time::Duration;

use anyhow::Context;
use reqwest::{
    Client, StatusCode, Url,
    header::{AUTHORIZATION, CONTENT_TYPE},
};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::{domain::NewSubscription, secrets::SecretSource};

pub const PUBLICATION_ID_VAR: &str = "BEEHIIV_PUBLICATION_ID";
pub const API_KEY_VAR: &str = "BEEHIIV_API_KEY";

#[derive(Clone)]
pub struct BeehiivClient {
    http_client: Client,
    base_url: Url,
}

#[derive(Debug)]
pub struct BeehiivCredentials {
    pub publication_id: String,
    pub api_key: SecretString,
}

#[derive(thiserror::Error, Debug)]
#[error("{0} environment variable is not set")]
pub struct MissingSecret(pub &'static str);

impl BeehiivCredentials {
    /// Resolved on every call, nothing is cached between requests.
    pub fn from_source(source: &dyn SecretSource) -> Result<Self, MissingSecret> {
        let publication_id = source
            .get(PUBLICATION_ID_VAR)
            .ok_or(MissingSecret(PUBLICATION_ID_VAR))?;
        let api_key = source.get(API_KEY_VAR).ok_or(MissingSecret(API_KEY_VAR))?;

        Ok(Self {
            publication_id: publication_id.expose_secret().to_owned(),
            api_key,
        })
    }
}

#[derive(Serialize)]
struct CreateSubscriptionRequest<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    utm_source: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    utm_medium: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    referring_site: Option<&'a str>,
}

impl<'a> From<&'a NewSubscription> for CreateSubscriptionRequest<'a> {
    fn from(subscription: &'a NewSubscription) -> Self {
        let attribution = &subscription.attribution;
        Self {
            email: subscription.email.as_ref(),
            utm_source: attribution.utm_source.as_deref(),
            utm_medium: attribution.utm_medium.as_deref(),
            referring_site: attribution.referring_site.as_deref(),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum BeehiivError {
    #[error("error marshaling subscription: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("error creating subscription request: {0}")]
    Request(#[source] reqwest::Error),
    #[error("error sending subscription request: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("unexpected status code: {}", .0.as_u16())]
    UnexpectedStatus(StatusCode),
}

impl BeehiivClient {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, anyhow::Error> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build the beehiiv HTTP client.")?;
        let base_url = Url::parse(&base_url).context("Failed parsing beehiiv api url.")?;

        Ok(Self {
            http_client,
            base_url,
        })
    }

    fn subscriptions_url(&self, publication_id: &str) -> String {
        format!(
            "{}/v2/publications/{}/subscriptions",
            self.base_url.as_str().trim_end_matches('/'),
            publication_id
        )
    }

    /// beehiiv answers `201 Created` for new subscribers and `200 OK` for
    /// existing ones; both are a success.
    #[tracing::instrument(
        name = "Creating beehiiv subscription",
        skip_all,
        fields(publication_id = %credentials.publication_id)
    )]
    pub async fn create_subscription(
        &self,
        credentials: &BeehiivCredentials,
        subscription: &NewSubscription,
    ) -> Result<(), BeehiivError> {
        let body = CreateSubscriptionRequest::from(subscription);
        let body = serde_json::to_vec(&body).map_err(BeehiivError::Serialize)?;

        let request = self
            .http_client
            .post(self.subscriptions_url(&credentials.publication_id))
            .header(CONTENT_TYPE, "application/json")
            .header(
                AUTHORIZATION,
                format!("Bearer {}", credentials.api_key.expose_secret()),
            )
            .body(body)
            .build()
            .map_err(BeehiivError::Request)?;

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(BeehiivError::Transport)?;

        match response.status() {
            StatusCode::OK | StatusCode::CREATED => Ok(()),
            status => Err(BeehiivError::UnexpectedStatus(status)),
        }
    }
}
