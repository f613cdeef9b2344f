//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::middleware::{ErrorHandler, KeyGetter, MiddlewareOption};

/// Root configuration for the rate-limit middleware.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GateConfig {
    /// How the rate-limit key is derived from a request.
    pub key: KeySource,

    /// Keys that bypass the limiter entirely.
    pub excluded_keys: Vec<String>,

    /// Emit `X-RateLimit-*` headers when the limiter reports a quota.
    pub quota_headers: bool,

    /// What to do when the limiter itself fails.
    pub on_error: ErrorPolicy,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            key: KeySource::default(),
            excluded_keys: Vec::new(),
            quota_headers: true,
            on_error: ErrorPolicy::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl GateConfig {
    /// Translate the file settings into middleware options.
    ///
    /// An empty `excluded_keys` list emits no exclusion option at all.
    pub fn to_options(&self) -> Vec<MiddlewareOption> {
        let mut options = vec![
            MiddlewareOption::KeyGetter(self.key.key_getter()),
            MiddlewareOption::ErrorHandler(self.on_error.error_handler()),
            MiddlewareOption::QuotaHeaders(self.quota_headers),
        ];

        if !self.excluded_keys.is_empty() {
            options.push(MiddlewareOption::excluded_keys(self.excluded_keys.iter().cloned()));
        }

        options
    }

    /// Install the crate's log subscriber at the configured `log_level`.
    ///
    /// Returns `false` when a global subscriber was already installed.
    pub fn init_logging(&self) -> bool {
        crate::observability::logging::init_from_config(&self.observability)
    }
}

/// Key derivation strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum KeySource {
    /// Peer address of the connection.
    #[default]
    ClientIp,

    /// Value of a request header, e.g. an API key.
    Header { name: String },

    /// `X-Forwarded-For` / `X-Real-IP`. Only safe behind a trusted proxy.
    ForwardedFor,
}

impl KeySource {
    pub fn key_getter(&self) -> KeyGetter {
        match self {
            KeySource::ClientIp => KeyGetter::client_ip(),
            KeySource::Header { name } => KeyGetter::header(name.to_ascii_lowercase()),
            KeySource::ForwardedFor => KeyGetter::forwarded_for(),
        }
    }
}

/// Limiter failure policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Escalate: abort the request with a panic.
    #[default]
    Abort,

    /// Fail closed with `503 Service Unavailable`.
    Reject,
}

impl ErrorPolicy {
    pub fn error_handler(&self) -> ErrorHandler {
        match self {
            ErrorPolicy::Abort => ErrorHandler::abort(),
            ErrorPolicy::Reject => ErrorHandler::service_unavailable(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GateConfig::default();
        assert_eq!(config.key, KeySource::ClientIp);
        assert!(config.excluded_keys.is_empty());
        assert!(config.quota_headers);
        assert_eq!(config.on_error, ErrorPolicy::Abort);
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_parse_full_config() {
        let config: GateConfig = toml::from_str(
            r#"
            excluded_keys = ["127.0.0.1", "10.0.0.5"]
            quota_headers = false
            on_error = "reject"

            [key]
            source = "header"
            name = "X-Api-Key"

            [observability]
            log_level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.key, KeySource::Header { name: "X-Api-Key".into() });
        assert_eq!(config.excluded_keys, vec!["127.0.0.1", "10.0.0.5"]);
        assert!(!config.quota_headers);
        assert_eq!(config.on_error, ErrorPolicy::Reject);
        assert_eq!(config.observability.log_level, "debug");
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: GateConfig = toml::from_str("").unwrap();
        assert_eq!(config.key, KeySource::ClientIp);

        let config: GateConfig = toml::from_str("[key]\nsource = \"forwarded_for\"\n").unwrap();
        assert_eq!(config.key, KeySource::ForwardedFor);
    }

    #[test]
    fn test_to_options_skips_empty_exclusions() {
        let options = GateConfig::default().to_options();
        assert_eq!(options.len(), 3);
        assert!(!options
            .iter()
            .any(|o| matches!(o, MiddlewareOption::ExcludedKey(_))));

        let config = GateConfig {
            excluded_keys: vec!["a".into()],
            ..GateConfig::default()
        };
        let options = config.to_options();
        assert!(matches!(options.last(), Some(MiddlewareOption::ExcludedKey(ex)) if ex.matches("a")));
    }
}
