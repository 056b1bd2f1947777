use anyhow::Context;
use notify_relay::{
    configuration::get_configuration,
    startup::Application,
    telemetry::{get_subscriber, init_subscriber},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Before telemetry, so a RUST_LOG set in .env is honored.
    let dotenv_loaded = dotenv::dotenv().is_ok();

    let subscriber = get_subscriber("notify-relay".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber)?;

    if !dotenv_loaded {
        tracing::warn!(".env file not found");
    }

    let config = get_configuration().context("Failed to read configuration")?;
    let app = Application::build(config)?;
    tracing::info!("Server running on port {}...", app.get_port());

    if let Err(e) = app.run_until_stopped().await {
        tracing::error!(
            error.cause_chain = ?e,
            error.message = %e,
            "API failed"
        );
        return Err(e.into());
    }

    tracing::info!("API has exited");
    Ok(())
}
