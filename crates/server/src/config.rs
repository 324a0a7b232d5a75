//! Configuration management for the Taproom server
//!
//! Sources, lowest precedence first: built-in defaults, an optional YAML/TOML file, then
//! `TAPROOM__*` environment variables (`TAPROOM__SERVER__PORT=9000`,
//! `TAPROOM__AUTH__ISSUER=...`, `TAPROOM__SERVER__CORS_ORIGINS=http://a,http://b`).

use crate::error::{Result, ServerError};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use taproom_http::config::ResourceServerConfig;

/// Main server configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    pub server: ServerConfig,
    /// Access-token validation
    pub auth: ResourceServerConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Browser origins allowed to call the API
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            cors_origins: vec!["http://localhost:4200".to_string()],
        }
    }
}

impl ServerConfig {
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ServerError::InvalidAddress(format!("{}:{} ({e})", self.host, self.port)))
    }
}

impl Settings {
    pub const ENV_PREFIX: &'static str = "TAPROOM";

    /// Load defaults, then `path` if given, then the environment
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or a value does not parse
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let defaults = Self::default();

        let mut builder = config::Config::builder()
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", u64::from(defaults.server.port))?
            .set_default("server.cors_origins", defaults.server.cors_origins)?
            .set_default("auth.issuer", defaults.auth.issuer)?
            .set_default("auth.audience", defaults.auth.audience)?
            .set_default("auth.leeway_seconds", defaults.auth.leeway_seconds)?
            .set_default("auth.required_scopes", Vec::<String>::new())?;

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(Self::ENV_PREFIX)
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors_origins")
                    .with_list_parse_key("auth.required_scopes")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::load(None).unwrap();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.auth.audience, "api://default");
        assert_eq!(settings.server.cors_origins, ["http://localhost:4200"]);
        assert_eq!(
            settings.server.listen_addr().unwrap().to_string(),
            "127.0.0.1:8080"
        );
    }

    #[test]
    fn test_file_overrides_defaults() {
        let path = std::env::temp_dir().join(format!("taproom-{}.yaml", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "server:\n  port: 9090\nauth:\n  issuer: https://idp.test/oauth2/custom\n  required_scopes: [beers]"
        )
        .unwrap();

        let settings = Settings::load(Some(&path)).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.server.port, 9090);
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.auth.issuer, "https://idp.test/oauth2/custom");
        assert_eq!(settings.auth.required_scopes, ["beers"]);
    }

    #[test]
    fn test_invalid_host() {
        let config = ServerConfig {
            host: "not a host".to_string(),
            ..ServerConfig::default()
        };
        assert!(matches!(
            config.listen_addr(),
            Err(ServerError::InvalidAddress(_))
        ));
    }
}
