//! Configuration for skola clients.
//!
//! Layered loading via figment: built-in defaults, then an optional
//! `skola.toml`, then `SKOLA_*` environment variables (double underscore
//! for nesting, e.g. `SKOLA_SUPER_ADMIN__EMAIL`). Validation happens
//! once at load time; consumers construct an [`skola_api::ApiClient`]
//! from the validated config and pass it around by value.

use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use skola_api::transport::TransportConfig;
use skola_api::{ApiClient, Error as ApiError};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("client construction failed: {0}")]
    Client(#[from] ApiError),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Config structs ──────────────────────────────────────────────────

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Gateway base URL.
    pub base_url: String,

    /// Identity-provider base URL (realm paths are appended per org).
    pub identity_url: String,

    /// OAuth client id for password logins.
    #[serde(default = "default_client_id")]
    pub client_id: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// The provisioning account used to create organizations and users.
    #[serde(default)]
    pub super_admin: AdminConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            identity_url: String::new(),
            client_id: default_client_id(),
            timeout_secs: default_timeout(),
            super_admin: AdminConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AdminConfig {
    /// Organization the super admin logs into.
    #[serde(default)]
    pub org_id: String,

    /// Login email.
    #[serde(default)]
    pub email: String,

    /// Password (plaintext in TOML is tolerated for test rigs; prefer
    /// `SKOLA_SUPER_ADMIN__PASSWORD`).
    pub password: Option<String>,
}

impl AdminConfig {
    /// The password wrapped for safe handling.
    pub fn password(&self) -> Option<SecretString> {
        self.password.clone().map(SecretString::from)
    }
}

fn default_client_id() -> String {
    "skola-client".into()
}
fn default_timeout() -> u64 {
    30
}

// ── Loading ─────────────────────────────────────────────────────────

/// Load and validate configuration from defaults, `skola.toml`, and
/// `SKOLA_*` environment variables (later layers win).
pub fn load_config() -> Result<Config, ConfigError> {
    let config: Config = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file("skola.toml"))
        .merge(Env::prefixed("SKOLA_").split("__"))
        .extract()?;

    config.validate()?;
    Ok(config)
}

fn parse_url(field: &str, value: &str) -> Result<Url, ConfigError> {
    value.parse().map_err(|_| ConfigError::Validation {
        field: field.into(),
        reason: format!("invalid URL: {value}"),
    })
}

impl Config {
    fn validate(&self) -> Result<(), ConfigError> {
        parse_url("base_url", &self.base_url)?;
        parse_url("identity_url", &self.identity_url)?;
        if self.client_id.is_empty() {
            return Err(ConfigError::Validation {
                field: "client_id".into(),
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Build an [`ApiClient`] from this config.
    pub fn client(&self) -> Result<ApiClient, ConfigError> {
        let base_url = parse_url("base_url", &self.base_url)?;
        let identity_url = parse_url("identity_url", &self.identity_url)?;

        let transport = TransportConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            ..TransportConfig::default()
        };

        Ok(ApiClient::new(
            base_url,
            identity_url,
            self.client_id.clone(),
            &transport,
        )?)
    }
}
