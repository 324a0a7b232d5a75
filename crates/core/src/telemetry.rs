//! Tracing initialization for native binaries

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "taproom=debug,tower_http=debug";

/// Output format of the fmt layer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Instrumentation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstrumentationConfig {
    /// Service name recorded on the startup event
    pub service_name: String,
    pub service_version: String,
    /// Filter directives, e.g. `info` or `taproom=debug,tower_http=info`
    pub log_level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for InstrumentationConfig {
    fn default() -> Self {
        Self {
            service_name: "taproom".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            log_level: DEFAULT_LOG_FILTER.to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl InstrumentationConfig {
    /// Read `SERVICE_NAME`, `RUST_LOG` and `LOG_FORMAT` (`json` or `pretty`)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let format = match std::env::var("LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Self {
            service_name: std::env::var("SERVICE_NAME").unwrap_or(defaults.service_name),
            service_version: defaults.service_version,
            log_level: std::env::var("RUST_LOG").unwrap_or(defaults.log_level),
            format,
        }
    }

    pub fn with_log_level(mut self, log_level: impl Into<String>) -> Self {
        self.log_level = log_level.into();
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// The filter this configuration installs; `RUST_LOG` wins over `log_level`
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.log_level))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Install the global subscriber
pub fn init_tracing(config: &InstrumentationConfig) -> Result<()> {
    let registry = tracing_subscriber::registry().with(config.env_filter());

    match config.format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init()?,
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .try_init()?,
    }

    tracing::info!(
        service = %config.service_name,
        version = %config.service_version,
        "Tracing initialized"
    );
    Ok(())
}

/// Initialize from environment variables
pub fn init_default() -> Result<()> {
    init_tracing(&InstrumentationConfig::from_env())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = InstrumentationConfig::default();
        assert_eq!(config.service_name, "taproom");
        assert_eq!(config.log_level, DEFAULT_LOG_FILTER);
        assert_eq!(config.format, LogFormat::Pretty);
    }

    #[test]
    fn test_format_deserializes_lowercase() {
        let config: InstrumentationConfig = serde_json::from_str(
            r#"{"service_name":"s","service_version":"1","log_level":"info","format":"json"}"#,
        )
        .unwrap();
        assert_eq!(config.format, LogFormat::Json);
    }
}
