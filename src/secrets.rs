//! Call-time lookup of secrets that are deliberately not part of `Settings`.
use std::collections::HashMap;

use secrecy::SecretString;

pub trait SecretSource: Send + Sync {
    /// Returns `None` when the secret is absent or empty.
    fn get(&self, key: &str) -> Option<SecretString>;
}

/// Reads the process environment on every lookup.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvSecrets;

impl SecretSource for EnvSecrets {
    fn get(&self, key: &str) -> Option<SecretString> {
        std::env::var(key)
            .ok()
            .filter(|v| !v.is_empty())
            .map(SecretString::from)
    }
}

/// Fixed set of secrets. Used by the test suite so it never depends on the
/// process environment; production wiring uses [`EnvSecrets`].
#[derive(Debug, Default, Clone)]
pub struct StaticSecrets(HashMap<String, String>);

impl StaticSecrets {
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }
}

impl SecretSource for StaticSecrets {
    fn get(&self, key: &str) -> Option<SecretString> {
        self.0
            .get(key)
            .filter(|v| !v.is_empty())
            .map(|v| SecretString::from(v.clone()))
    }
}
