//! Server configuration from environment variables

use std::env;
use std::net::SocketAddr;

#[derive(Debug)]
pub enum ConfigError {
    MissingVariable(String),
    InvalidValue(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingVariable(var) => write!(f, "Missing environment variable: {}", var),
            ConfigError::InvalidValue(msg) => write!(f, "Invalid configuration value: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite catalog file
    pub db_path: String,

    /// Directory holding the `.sql` migration files
    pub schema_dir: String,

    pub host: String,
    pub port: u16,

    pub rust_log: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `NUTRIGUIDE_DB_PATH` (default: data/nutriguide.db)
    /// - `NUTRIGUIDE_SCHEMA_DIR` (default: sql)
    /// - `HOST` (default: 0.0.0.0)
    /// - `PORT` (default: 3000)
    /// - `RUST_LOG` (optional)
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match env::var("PORT") {
            Ok(raw) => raw.trim().parse::<u16>().map_err(|_| {
                ConfigError::InvalidValue(format!("PORT must be a port number, got '{}'", raw))
            })?,
            Err(_) => 3000,
        };

        let db_path = env::var("NUTRIGUIDE_DB_PATH")
            .unwrap_or_else(|_| "data/nutriguide.db".to_string());
        if db_path.trim().is_empty() {
            return Err(ConfigError::MissingVariable("NUTRIGUIDE_DB_PATH".to_string()));
        }

        Ok(Self {
            db_path,
            schema_dir: env::var("NUTRIGUIDE_SCHEMA_DIR").unwrap_or_else(|_| "sql".to_string()),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port,
            rust_log: env::var("RUST_LOG").ok(),
        })
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| {
                ConfigError::InvalidValue(format!(
                    "HOST/PORT do not form a socket address: {}:{}",
                    self.host, self.port
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env vars are process-global; keep every case in one test so they cannot race.
    #[test]
    fn test_config_from_env() {
        env::remove_var("NUTRIGUIDE_DB_PATH");
        env::remove_var("NUTRIGUIDE_SCHEMA_DIR");
        env::remove_var("HOST");
        env::remove_var("PORT");

        let config = Config::from_env().unwrap();
        assert_eq!(config.db_path, "data/nutriguide.db");
        assert_eq!(config.schema_dir, "sql");
        assert_eq!(config.port, 3000);
        assert_eq!(config.bind_addr().unwrap().to_string(), "0.0.0.0:3000");

        env::set_var("NUTRIGUIDE_DB_PATH", "/tmp/test.db");
        env::set_var("HOST", "127.0.0.1");
        env::set_var("PORT", "8080");
        let config = Config::from_env().unwrap();
        assert_eq!(config.db_path, "/tmp/test.db");
        assert_eq!(config.bind_addr().unwrap().to_string(), "127.0.0.1:8080");

        env::set_var("PORT", "not-a-port");
        assert!(matches!(Config::from_env(), Err(ConfigError::InvalidValue(_))));

        env::set_var("PORT", "8080");
        env::set_var("HOST", "not a host");
        assert!(Config::from_env().unwrap().bind_addr().is_err());

        env::remove_var("NUTRIGUIDE_DB_PATH");
        env::remove_var("HOST");
        env::remove_var("PORT");
    }
}
