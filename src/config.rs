//! Process configuration loaded once at startup.
//!
//! Both API keys are required; the process refuses to start without them.
//! Everything else has a default.

use std::time::Duration;

use thiserror::Error;

use crate::generation::{MeshyConfig, PollSettings};
use crate::llm::GeminiConfig;
use crate::server::DEFAULT_PORT;

/// Gemini API key.
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";
/// Meshy API key.
pub const MESHY_API_KEY_ENV: &str = "MESHY_API_KEY";
/// HTTP listen port.
pub const PORT_ENV: &str = "FOOD_FORGE_PORT";
/// Gemini model override.
pub const GEMINI_MODEL_ENV: &str = "FOOD_FORGE_GEMINI_MODEL";
/// Gemini base URL override.
pub const GEMINI_URL_ENV: &str = "FOOD_FORGE_GEMINI_URL";
/// Meshy base URL override.
pub const MESHY_URL_ENV: &str = "FOOD_FORGE_MESHY_URL";
/// Poll interval in seconds.
pub const POLL_INTERVAL_ENV: &str = "FOOD_FORGE_POLL_INTERVAL_SECS";
/// Poll ceiling in seconds.
pub const POLL_TIMEOUT_ENV: &str = "FOOD_FORGE_POLL_TIMEOUT_SECS";

/// Longest accepted poll ceiling.
pub const MAX_POLL_CEILING: Duration = Duration::from_secs(24 * 60 * 60);

/// Configuration errors. All of them are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is missing or blank.
    #[error("{0} not found in environment variables. Please create a .env file with your API key.")]
    MissingVar(&'static str),

    /// A variable is set but cannot be parsed.
    #[error("invalid value for {name}: {value:?}")]
    InvalidVar {
        /// Variable name.
        name: &'static str,
        /// Raw value.
        value: String,
    },

    /// Values parse but break an invariant.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level service configuration.
#[derive(Debug)]
pub struct AppConfig {
    /// Chat model settings.
    pub gemini: GeminiConfig,
    /// Text-to-3D service settings.
    pub meshy: MeshyConfig,
    /// Polling cadence and ceiling.
    pub poll: PollSettings,
    /// HTTP listen port.
    pub port: u16,
}

impl AppConfig {
    /// Create a config with the given keys and defaults for everything else.
    #[must_use]
    pub fn new(gemini_api_key: impl Into<String>, meshy_api_key: impl Into<String>) -> Self {
        Self {
            gemini: GeminiConfig::new(gemini_api_key),
            meshy: MeshyConfig::new(meshy_api_key),
            poll: PollSettings::default(),
            port: DEFAULT_PORT,
        }
    }

    /// Load `.env` if present, then read the process environment.
    ///
    /// # Errors
    /// Returns an error if a key is missing or a value is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("Loaded environment from {}", path.display());
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the config from an arbitrary variable lookup.
    ///
    /// # Errors
    /// Returns an error if a key is missing or a value is invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let required = |name: &'static str| get(name).ok_or(ConfigError::MissingVar(name));

        let mut config = Self::new(required(GEMINI_API_KEY_ENV)?, required(MESHY_API_KEY_ENV)?);

        if let Some(model) = get(GEMINI_MODEL_ENV) {
            config.gemini = config.gemini.with_model(model);
        }
        if let Some(url) = get(GEMINI_URL_ENV) {
            config.gemini = config.gemini.with_base_url(url);
        }
        if let Some(url) = get(MESHY_URL_ENV) {
            config.meshy = config.meshy.with_base_url(url);
        }
        if let Some(port) = get(PORT_ENV) {
            config.port = parse_var(PORT_ENV, port)?;
        }

        let defaults = PollSettings::default();
        let interval = match get(POLL_INTERVAL_ENV) {
            Some(secs) => Duration::from_secs(parse_var(POLL_INTERVAL_ENV, secs)?),
            None => defaults.interval,
        };
        let ceiling = match get(POLL_TIMEOUT_ENV) {
            Some(secs) => Duration::from_secs(parse_var(POLL_TIMEOUT_ENV, secs)?),
            None => defaults.ceiling,
        };
        config.poll = PollSettings::new(interval, ceiling);

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration invariants.
    ///
    /// # Errors
    /// Returns an error if any value is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll.interval.is_zero() {
            return Err(ConfigError::Invalid("poll interval must be > 0".to_string()));
        }
        if self.poll.ceiling.is_zero() {
            return Err(ConfigError::Invalid("poll ceiling must be > 0".to_string()));
        }
        if self.poll.ceiling > MAX_POLL_CEILING {
            return Err(ConfigError::Invalid(format!(
                "poll ceiling must be at most {}s",
                MAX_POLL_CEILING.as_secs()
            )));
        }
        if self.poll.interval > self.poll.ceiling {
            return Err(ConfigError::Invalid(
                "poll interval must not exceed the ceiling".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::InvalidVar { name, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[
            (GEMINI_API_KEY_ENV, "g-key"),
            (MESHY_API_KEY_ENV, "m-key"),
        ]));
        let Ok(config) = config else {
            panic!("config should load");
        };
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.poll, PollSettings::default());
        assert_eq!(config.poll.interval, Duration::from_secs(5));
        assert_eq!(config.poll.ceiling, Duration::from_secs(600));
        assert_eq!(config.gemini.model, "gemini-2.0-flash");
    }

    #[test]
    fn test_missing_keys_are_fatal() {
        let err = AppConfig::from_lookup(lookup(&[(MESHY_API_KEY_ENV, "m-key")])).err();
        assert!(matches!(err, Some(ConfigError::MissingVar(GEMINI_API_KEY_ENV))));

        let err = AppConfig::from_lookup(lookup(&[
            (GEMINI_API_KEY_ENV, "g-key"),
            (MESHY_API_KEY_ENV, "   "),
        ]))
        .err();
        assert!(matches!(err, Some(ConfigError::MissingVar(MESHY_API_KEY_ENV))));
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            (GEMINI_API_KEY_ENV, "g-key"),
            (MESHY_API_KEY_ENV, "m-key"),
            (PORT_ENV, "8088"),
            (GEMINI_MODEL_ENV, "gemini-1.5-pro"),
            (MESHY_URL_ENV, "http://localhost:9000/"),
            (POLL_INTERVAL_ENV, "2"),
            (POLL_TIMEOUT_ENV, "30"),
        ]));
        let Ok(config) = config else {
            panic!("config should load");
        };
        assert_eq!(config.port, 8088);
        assert_eq!(config.gemini.model, "gemini-1.5-pro");
        assert_eq!(config.meshy.base_url, "http://localhost:9000");
        assert_eq!(
            config.poll,
            PollSettings::new(Duration::from_secs(2), Duration::from_secs(30))
        );
    }

    #[test]
    fn test_invalid_values() {
        let err = AppConfig::from_lookup(lookup(&[
            (GEMINI_API_KEY_ENV, "g-key"),
            (MESHY_API_KEY_ENV, "m-key"),
            (PORT_ENV, "eighty"),
        ]))
        .err();
        assert!(matches!(err, Some(ConfigError::InvalidVar { name: PORT_ENV, .. })));

        let err = AppConfig::from_lookup(lookup(&[
            (GEMINI_API_KEY_ENV, "g-key"),
            (MESHY_API_KEY_ENV, "m-key"),
            (POLL_INTERVAL_ENV, "0"),
        ]))
        .err();
        assert!(matches!(err, Some(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_oversized_ceiling_is_rejected() {
        let err = AppConfig::from_lookup(lookup(&[
            (GEMINI_API_KEY_ENV, "g-key"),
            (MESHY_API_KEY_ENV, "m-key"),
            (POLL_TIMEOUT_ENV, "18446744073709551615"),
        ]))
        .err();
        assert!(matches!(err, Some(ConfigError::Invalid(msg)) if msg.contains("at most")));

        let day = MAX_POLL_CEILING.as_secs().to_string();
        let config = AppConfig::from_lookup(lookup(&[
            (GEMINI_API_KEY_ENV, "g-key"),
            (MESHY_API_KEY_ENV, "m-key"),
            (POLL_TIMEOUT_ENV, day.as_str()),
        ]));
        assert_eq!(config.ok().map(|c| c.poll.ceiling), Some(MAX_POLL_CEILING));
    }

    #[test]
    fn test_interval_longer_than_ceiling_is_rejected() {
        let err = AppConfig::from_lookup(lookup(&[
            (GEMINI_API_KEY_ENV, "g-key"),
            (MESHY_API_KEY_ENV, "m-key"),
            (POLL_INTERVAL_ENV, "30"),
            (POLL_TIMEOUT_ENV, "10"),
        ]))
        .err();
        assert!(matches!(err, Some(ConfigError::Invalid(_))));
    }
}
