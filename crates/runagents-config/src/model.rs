//! The persisted configuration record and its editable keys.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::defaults::DEFAULT_ENDPOINT;
use crate::error::{ConfigError, ConfigResult};

/// Endpoint and credential the CLI talks to.
///
/// Fields missing from a persisted file load as empty strings, which callers
/// treat as "not configured".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigRecord {
    /// Base URL of the platform API.
    #[serde(default)]
    pub endpoint: String,
    /// Bearer credential; empty means unauthenticated requests.
    #[serde(default)]
    pub api_key: String,
}

impl Default for ConfigRecord {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: String::new(),
        }
    }
}

impl ConfigRecord {
    /// Update a single key in place.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEndpoint`] when an endpoint value is not
    /// an absolute URL.
    pub fn set(&mut self, key: ConfigKey, value: &str) -> ConfigResult<()> {
        match key {
            ConfigKey::Endpoint => {
                Url::parse(value).map_err(|source| ConfigError::InvalidEndpoint {
                    value: value.to_string(),
                    source,
                })?;
                self.endpoint = value.to_string();
            }
            ConfigKey::ApiKey => self.api_key = value.to_string(),
        }
        Ok(())
    }

    /// Masked form of the stored key, or `None` when no key is set.
    #[must_use]
    pub fn masked_api_key(&self) -> Option<String> {
        if self.api_key.is_empty() {
            None
        } else {
            Some(mask_secret(&self.api_key))
        }
    }
}

/// Keys accepted by `config set`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    /// The API base URL.
    Endpoint,
    /// The bearer credential.
    ApiKey,
}

impl ConfigKey {
    /// Name used on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Endpoint => "endpoint",
            Self::ApiKey => "api-key",
        }
    }
}

impl Display for ConfigKey {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "endpoint" => Ok(Self::Endpoint),
            "api-key" => Ok(Self::ApiKey),
            other => Err(ConfigError::UnknownKey {
                key: other.to_string(),
            }),
        }
    }
}

/// Mask all but the first and last four characters of a secret.
///
/// Secrets of eight characters or fewer are masked entirely.
#[must_use]
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}{}{tail}", "*".repeat(chars.len() - 8))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_record_points_at_local_platform() {
        let record = ConfigRecord::default();
        assert_eq!(record.endpoint, "http://localhost:8092");
        assert!(record.api_key.is_empty());
    }

    #[test]
    fn missing_fields_deserialize_as_empty() {
        let record: ConfigRecord = serde_json::from_str("{}").expect("empty object parses");
        assert_eq!(record.endpoint, "");
        assert_eq!(record.api_key, "");
    }

    #[test]
    fn config_key_parses_supported_names() {
        assert_eq!("endpoint".parse::<ConfigKey>().ok(), Some(ConfigKey::Endpoint));
        assert_eq!("api-key".parse::<ConfigKey>().ok(), Some(ConfigKey::ApiKey));
        let err = "token".parse::<ConfigKey>().expect_err("unknown key");
        assert_eq!(
            err.to_string(),
            "unknown config key \"token\"; valid keys: endpoint, api-key"
        );
        assert!(err.is_user_input());
    }

    #[test]
    fn set_endpoint_requires_absolute_url() {
        let mut record = ConfigRecord::default();
        let err = record
            .set(ConfigKey::Endpoint, "not a url")
            .expect_err("relative value should fail");
        assert!(matches!(err, ConfigError::InvalidEndpoint { .. }));
        assert_eq!(record.endpoint, "http://localhost:8092");

        record
            .set(ConfigKey::Endpoint, "https://x.test")
            .expect("absolute URL accepted");
        assert_eq!(record.endpoint, "https://x.test");
    }

    #[test]
    fn set_api_key_accepts_any_value() {
        let mut record = ConfigRecord::default();
        record
            .set(ConfigKey::ApiKey, "abcd1234efgh")
            .expect("api key accepted");
        assert_eq!(record.api_key, "abcd1234efgh");
    }

    #[test]
    fn mask_secret_keeps_edges() {
        assert_eq!(mask_secret("abcd1234efgh"), "abcd****efgh");
        assert_eq!(mask_secret("short"), "*****");
        assert_eq!(mask_secret("12345678"), "********");
        assert_eq!(mask_secret(""), "");
    }

    #[test]
    fn masked_api_key_is_none_when_unset() {
        assert!(ConfigRecord::default().masked_api_key().is_none());
        let record = ConfigRecord {
            endpoint: String::new(),
            api_key: "sk-live-000000001".into(),
        };
        assert_eq!(record.masked_api_key().as_deref(), Some("sk-l*********0001"));
    }
}
