//! Server configuration

use anyhow::{Context, Result};
use std::net::SocketAddr;

/// HTTP listener and startup configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Whether to create the users table on startup
    pub init_schema: bool,
}

impl ServerConfig {
    /// Create a new ServerConfig from environment variables
    ///
    /// # Environment Variables
    /// - `HOST`: interface to bind (default: "0.0.0.0")
    /// - `PORT`: port to listen on (default: 9000)
    /// - `DB_INIT_SCHEMA`: create the users table if missing (default: true)
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = match std::env::var("PORT") {
            Ok(port) => port
                .parse()
                .with_context(|| format!("PORT must be a valid port number, got {:?}", port))?,
            Err(_) => 9000,
        };

        let init_schema = std::env::var("DB_INIT_SCHEMA")
            .map(|v| !matches!(v.to_ascii_lowercase().as_str(), "0" | "false" | "no"))
            .unwrap_or(true);

        Ok(ServerConfig {
            host,
            port,
            init_schema,
        })
    }

    /// Socket address to bind the listener to
    pub fn bind_address(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid listen address {}:{}", self.host, self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        unsafe {
            std::env::remove_var("HOST");
            std::env::remove_var("PORT");
            std::env::remove_var("DB_INIT_SCHEMA");
        }
    }

    #[test]
    #[serial]
    fn test_server_config_defaults() {
        clear_env();

        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9000);
        assert!(config.init_schema);
        assert_eq!(config.bind_address().unwrap().to_string(), "0.0.0.0:9000");
    }

    #[test]
    #[serial]
    fn test_server_config_from_env_with_custom_values() {
        clear_env();
        unsafe {
            std::env::set_var("HOST", "127.0.0.1");
            std::env::set_var("PORT", "8080");
            std::env::set_var("DB_INIT_SCHEMA", "false");
        }

        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.bind_address().unwrap().to_string(), "127.0.0.1:8080");
        assert!(!config.init_schema);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_port_is_rejected() {
        clear_env();
        unsafe {
            std::env::set_var("PORT", "not-a-port");
        }

        assert!(ServerConfig::from_env().is_err());

        clear_env();
    }
}
