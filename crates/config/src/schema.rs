use bedrock_types::{ChainError, ProtocolVersion};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Authentication endpoint that exchanges an XSTS token for a login chain.
pub const DEFAULT_ENDPOINT: &str = "https://multiplayer.minecraft.net/authentication";

/// Client identification sent as `User-Agent`.
pub const DEFAULT_USER_AGENT: &str = "MCPE/Android";

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}
fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}
fn default_level() -> String {
    "info".to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default filter directive (overridden by `RUST_LOG`).
    #[serde(default = "default_level")]
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

/// Settings for the identity chain exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Authentication URL (defaults to [`DEFAULT_ENDPOINT`]).
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// `User-Agent` header (defaults to [`DEFAULT_USER_AGENT`]).
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Pinned game protocol; its version string becomes `Client-Version`.
    #[serde(default)]
    pub protocol: ProtocolVersion,
    /// Upper bound on a single exchange, on top of the caller's context.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub log: LogConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            user_agent: default_user_agent(),
            protocol: ProtocolVersion::CURRENT,
            timeout_secs: None,
            log: LogConfig::default(),
        }
    }
}

impl AuthConfig {
    /// Parses configuration from a YAML string, merged with defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`figment::Error`] if the YAML is invalid or extraction fails.
    #[allow(clippy::result_large_err)]
    pub fn from_yaml(yaml: &str) -> Result<Self, figment::Error> {
        use figment::{
            Figment,
            providers::{Format as _, Serialized, Yaml},
        };
        Figment::from(Serialized::defaults(AuthConfig::default()))
            .merge(Yaml::string(yaml))
            .extract()
    }

    /// Loads configuration from a file path, merged with defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`figment::Error`] if the file cannot be read or parsed.
    #[allow(clippy::result_large_err)]
    pub fn from_file(path: &std::path::Path) -> Result<Self, figment::Error> {
        use figment::{
            Figment,
            providers::{Format as _, Serialized, Yaml},
        };
        Figment::from(Serialized::defaults(AuthConfig::default()))
            .merge(Yaml::file(path))
            .extract()
    }

    /// Loads configuration from `BEDROCK_*` environment variables.
    ///
    /// Nested keys use a double underscore, e.g. `BEDROCK_PROTOCOL__VERSION`.
    ///
    /// # Errors
    ///
    /// Returns a [`figment::Error`] if a variable cannot be parsed.
    #[allow(clippy::result_large_err)]
    pub fn from_env() -> Result<Self, figment::Error> {
        use figment::{
            Figment,
            providers::{Env, Serialized},
        };
        Figment::from(Serialized::defaults(AuthConfig::default()))
            .merge(Env::prefixed("BEDROCK_").split("__"))
            .extract()
    }

    /// Checks that the endpoint is an HTTP(S) URL and the client
    /// identification is present and usable as header values.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::Config`] describing the first invalid field.
    pub fn validate(&self) -> Result<(), ChainError> {
        if !(self.endpoint.starts_with("https://") || self.endpoint.starts_with("http://")) {
            return Err(ChainError::Config(format!(
                "endpoint must be an http(s) url, got {:?}",
                self.endpoint
            )));
        }
        if self.user_agent.trim().is_empty() {
            return Err(ChainError::Config("user_agent must not be empty".into()));
        }
        if self.protocol.version().is_empty() {
            return Err(ChainError::Config(
                "protocol.version must not be empty".into(),
            ));
        }
        header_value("user_agent", &self.user_agent)?;
        header_value("protocol.version", self.protocol.version())?;
        Ok(())
    }

    /// The configured per-exchange timeout.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

fn header_value(field: &str, value: &str) -> Result<(), ChainError> {
    http::HeaderValue::from_str(value)
        .map(drop)
        .map_err(|e| ChainError::Config(format!("{field} is not a valid header value: {e}")))
}
