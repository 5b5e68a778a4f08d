//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `homewise.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::time::Duration;

use serde::Deserialize;

use homewise_app::suggestion::{DEFAULT_SESSION_IDLE_TIMEOUT, EngineSettings};

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Database settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Recommendation engine settings.
    pub suggestions: SuggestionsConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// `SQLite` database configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL or file path.
    pub url: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Suggestion scheduler configuration, shared by every user session.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SuggestionsConfig {
    /// Whether suggestions are produced at all. Can be flipped at runtime.
    pub enabled: bool,
    /// Seconds between two periodic evaluations.
    pub evaluation_interval_secs: u64,
    /// Seconds a suggestion banner stays visible.
    pub display_duration_secs: u64,
    /// Seconds a session without an open stream survives without a request.
    pub session_idle_timeout_secs: u64,
}

impl Config {
    /// Load configuration from `homewise.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed or
    /// unreadable, or if the resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("homewise.toml")?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("HOMEWISE_HOST") {
            self.server.host = val;
        }
        if let Some(val) = var("HOMEWISE_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = var("HOMEWISE_BIND") {
            if let Some((host, port)) = val.rsplit_once(':') {
                self.server.host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.server.port = port;
                }
            }
        }
        if let Some(val) = var("HOMEWISE_DATABASE_URL") {
            self.database.url = val;
        }
        if let Some(val) = var("HOMEWISE_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("HOMEWISE_SUGGESTIONS_ENABLED") {
            if let Ok(enabled) = val.parse() {
                self.suggestions.enabled = enabled;
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.suggestions.evaluation_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "suggestions.evaluation_interval_secs must be non-zero".to_string(),
            ));
        }
        if self.suggestions.display_duration_secs == 0 {
            return Err(ConfigError::Validation(
                "suggestions.display_duration_secs must be non-zero".to_string(),
            ));
        }
        if self.suggestions.session_idle_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "suggestions.session_idle_timeout_secs must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Return the database URL in `sqlx`-compatible format.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database.url
    }

    /// Settings the suggestion hub starts with.
    #[must_use]
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            enabled: self.suggestions.enabled,
            evaluation_interval: Duration::from_secs(self.suggestions.evaluation_interval_secs),
            display_duration: Duration::from_secs(self.suggestions.display_duration_secs),
        }
    }

    /// How long an unattended suggestion session is kept alive.
    #[must_use]
    pub fn session_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.suggestions.session_idle_timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:homewise.db?mode=rwc".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "homewised=info,homewise=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for SuggestionsConfig {
    fn default() -> Self {
        let defaults = EngineSettings::default();
        Self {
            enabled: defaults.enabled,
            evaluation_interval_secs: defaults.evaluation_interval.as_secs(),
            display_duration_secs: defaults.display_duration.as_secs(),
            session_idle_timeout_secs: DEFAULT_SESSION_IDLE_TIMEOUT.as_secs(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
