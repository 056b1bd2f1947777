use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use secrecy::SecretString;
use serde_aux::field_attributes::deserialize_number_from_string;

use crate::domain::TelegramCredentials;

#[derive(serde::Deserialize, Debug, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub telegram: TelegramSettings,
    pub beehiiv: BeehiivSettings,
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct ApplicationSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
    #[serde(default)]
    pub allowed_origins: Option<String>,
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct TelegramSettings {
    pub base_url: String,
    #[serde(default)]
    pub bot_token: Option<SecretString>,
    #[serde(default)]
    pub chat_id: Option<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_ms: u64,
}

impl TelegramSettings {
    pub fn credentials(&self) -> Result<TelegramCredentials, String> {
        TelegramCredentials::parse(self.bot_token.clone(), self.chat_id.clone())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct BeehiivSettings {
    pub base_url: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_ms: u64,
}

impl BeehiivSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Deployment profile picked by `APP_ENV`, selecting a yaml overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn overlay_file(self) -> &'static str {
        match self {
            Environment::Local => "local.yaml",
            Environment::Production => "production.yaml",
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" | "dev" | "development" => Ok(Environment::Local),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(format!(
                "unsupported APP_ENV `{other}`, expected `local` or `production`"
            )),
        }
    }
}

/// Plain variables the deployment sets, mapped onto their settings keys.
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("TELEGRAM_BOT_TOKEN", "telegram.bot_token"),
    ("TELEGRAM_CHAT_ID", "telegram.chat_id"),
    ("ALLOWED_ORIGINS", "application.allowed_origins"),
    ("PORT", "application.port"),
];

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().map_err(|e| {
        config::ConfigError::Message(format!("Failed to determine current directory: {e}"))
    })?;
    let env: HashMap<String, String> = std::env::vars().collect();

    load_configuration(&base_path.join("configuration"), &env)
}

/// Layers `base.yaml`, the `APP_ENV` overlay, `APP_*` variables and finally
/// the plain deployment variables. Empty variables are treated as unset.
pub fn load_configuration(
    conf_dir: &Path,
    env: &HashMap<String, String>,
) -> Result<Settings, config::ConfigError> {
    let lookup = |key: &str| env.get(key).filter(|v| !v.is_empty()).cloned();

    let environment = match lookup("APP_ENV") {
        Some(name) => name.parse().map_err(config::ConfigError::Message)?,
        None => Environment::Local,
    };

    let mut builder = config::Config::builder()
        .add_source(config::File::from(conf_dir.join("base.yaml")).required(true))
        .add_source(
            config::File::from(conf_dir.join(environment.overlay_file())).required(true),
        )
        .add_source(
            config::Environment::with_prefix("APP")
                .separator("__")
                .prefix_separator("_")
                .source(Some(env.clone().into_iter().collect())),
        );

    for &(var, key) in ENV_OVERRIDES {
        builder = builder.set_override_option(key, lookup(var))?;
    }

    builder.build()?.try_deserialize::<Settings>()
}
