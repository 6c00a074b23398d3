//! Client settings loaded from TOML.

use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// Caller-tunable settings of the default engine.
///
/// The redirect policy is fixed and not part of this struct.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Whole-exchange timeout, in seconds in TOML. `None` keeps the engine default.
    #[serde(deserialize_with = "deserialize_duration")]
    pub timeout: Option<Duration>,

    pub user_agent: Option<String>,

    /// Upper bound on the buffered response body. `None` means unbounded.
    pub max_response_bytes: Option<u64>,
}

impl ClientConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        log::debug!("loaded client config from {path}");
        Ok(config)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let secs = Option::<f64>::deserialize(deserializer)?;
    secs.map(Duration::try_from_secs_f64)
        .transpose()
        .map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = ClientConfig::from_toml_str("").unwrap();
        assert_eq!(config, ClientConfig::default());
        assert!(config.timeout.is_none());
    }

    #[test]
    fn timeout_is_read_as_seconds() {
        let config = ClientConfig::from_toml_str(
            "timeout = 2.5\nuser_agent = \"httpc/0.1\"\nmax_response_bytes = 1024\n",
        )
        .unwrap();
        assert_eq!(config.timeout, Some(Duration::from_millis(2500)));
        assert_eq!(config.user_agent.as_deref(), Some("httpc/0.1"));
        assert_eq!(config.max_response_bytes, Some(1024));
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let err = ClientConfig::from_toml_str("timeout = \"soon\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn negative_timeout_is_an_error() {
        let err = ClientConfig::from_toml_str("timeout = -1.0").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));

        let err = ClientConfig::from_toml_str("timeout = inf").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = ClientConfig::from_file("/nonexistent/httpc.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
