use std::net::TcpListener;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::dev::Server;
use actix_web::http::{Uri, header};
use actix_web::{App, HttpServer, web};
use anyhow::Context;
use tracing_actix_web::TracingLogger;

use crate::beehiiv_client::BeehiivClient;
use crate::configuration::Settings;
use crate::routes::{health_check, method_not_allowed, send, subscribe};
use crate::secrets::{EnvSecrets, SecretSource};
use crate::telegram_client::TelegramClient;

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    /// Builds the server with call-time secrets read from the environment.
    pub fn build(config: Settings) -> Result<Self, anyhow::Error> {
        Self::build_with_secrets(config, Arc::new(EnvSecrets))
    }

    pub fn build_with_secrets(
        config: Settings,
        secrets: Arc<dyn SecretSource>,
    ) -> Result<Self, anyhow::Error> {
        let credentials = config.telegram.credentials().map_err(anyhow::Error::msg)?;
        let telegram_client = TelegramClient::new(
            config.telegram.base_url.clone(),
            credentials,
            config.telegram.timeout(),
        )?;
        let beehiiv_client =
            BeehiivClient::new(config.beehiiv.base_url.clone(), config.beehiiv.timeout())?;

        let address = format!("{}:{}", config.application.host, config.application.port);
        let listener =
            TcpListener::bind(&address).with_context(|| format!("Failed to bind {address}."))?;
        let port = listener.local_addr()?.port();
        let server = run(
            listener,
            telegram_client,
            beehiiv_client,
            secrets,
            config.application.allowed_origins,
        )?;

        Ok(Self { port, server })
    }

    pub fn get_port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn run(
    listener: TcpListener,
    telegram_client: TelegramClient,
    beehiiv_client: BeehiivClient,
    secrets: Arc<dyn SecretSource>,
    allowed_origin: Option<String>,
) -> Result<Server, anyhow::Error> {
    let telegram_client = web::Data::new(telegram_client);
    let beehiiv_client = web::Data::new(beehiiv_client);
    let secrets: web::Data<dyn SecretSource> = web::Data::from(secrets);
    let allowed_origin = allowed_origin.and_then(|origin| match validate_origin(&origin) {
        Ok(()) => Some(origin),
        Err(reason) => {
            tracing::warn!(
                allowed_origin = %origin,
                "Ignoring ALLOWED_ORIGINS, {reason}. No cross-origin caller is allowed."
            );
            None
        }
    });

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(cors_policy(allowed_origin.as_deref()))
            .route("/health_check", web::get().to(health_check))
            .service(
                web::resource("/send")
                    .route(web::post().to(send))
                    .default_service(web::to(method_not_allowed)),
            )
            .service(
                web::resource("/subscribe")
                    .route(web::post().to(subscribe))
                    .default_service(web::to(method_not_allowed)),
            )
            .app_data(telegram_client.clone())
            .app_data(beehiiv_client.clone())
            .app_data(secrets.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}

/// An origin is a bare `scheme://host[:port]`; `*` stands for any origin.
fn validate_origin(origin: &str) -> Result<(), String> {
    if origin == "*" {
        return Ok(());
    }
    let uri: Uri = origin
        .parse()
        .map_err(|e| format!("`{origin}` is not a valid origin: {e}"))?;
    if uri.scheme().is_none() || uri.host().is_none() {
        return Err(format!("`{origin}` is missing a scheme or host"));
    }
    header::HeaderValue::from_str(origin)
        .map_err(|e| format!("`{origin}` is not a valid header value: {e}"))?;
    Ok(())
}

/// Single allowed origin with credentials; `*` opens the relay to any origin.
fn cors_policy(allowed_origin: Option<&str>) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .supports_credentials()
        .max_age(3600);

    match allowed_origin {
        Some("*") => cors.allow_any_origin(),
        Some(origin) => cors.allowed_origin(origin),
        None => cors,
    }
}
