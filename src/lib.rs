pub mod beehiiv_client;
pub mod configuration;
pub mod domain;
pub mod routes;
pub mod secrets;
pub mod startup;
pub mod telegram_client;
pub mod telemetry;
