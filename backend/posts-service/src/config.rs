/// Configuration management for Posts Service
///
/// All settings come from environment variables (optionally seeded from a
/// `.env` file by the binary). Every value has a default, so an empty
/// environment reproduces the stock deployment: `0.0.0.0:5000` with the
/// database at `/app/data/app.db`.
use db_pool::env_utils::{parse_env_optional, parse_env_or_default};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// Database location
    pub database: DatabaseConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, production, ...)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
    /// HTTP worker count; `None` keeps the actix default
    pub workers: Option<usize>,
}

/// Database location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Directory holding the database file, created on startup
    pub data_dir: PathBuf,
    /// Database file name inside `data_dir`
    pub file_name: String,
}

impl DatabaseConfig {
    /// Full path of the SQLite database file
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.file_name)
    }
}

impl AppConfig {
    /// `host:port` string for `HttpServer::bind`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let workers = parse_env_optional::<usize>("HTTP_WORKERS")?;
        if workers == Some(0) {
            return Err("HTTP_WORKERS must be greater than zero".to_string());
        }

        let file_name = std::env::var("POSTS_DB_FILE").unwrap_or_else(|_| "app.db".to_string());
        if file_name.trim().is_empty() {
            return Err("POSTS_DB_FILE must not be empty".to_string());
        }

        Ok(Config {
            app: AppConfig {
                env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                host: std::env::var("POSTS_SERVICE_HOST")
                    .unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or_default("POSTS_SERVICE_PORT", 5000)?,
                workers,
            },
            database: DatabaseConfig {
                data_dir: std::env::var("POSTS_DATA_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("/app/data")),
                file_name,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 6] = [
        "APP_ENV",
        "POSTS_SERVICE_HOST",
        "POSTS_SERVICE_PORT",
        "POSTS_DATA_DIR",
        "POSTS_DB_FILE",
        "HTTP_WORKERS",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();

        let config = Config::from_env().unwrap();
        assert_eq!(config.app.env, "development");
        assert_eq!(config.app.bind_address(), "0.0.0.0:5000");
        assert_eq!(config.app.workers, None);
        assert_eq!(
            config.database.database_path(),
            PathBuf::from("/app/data/app.db")
        );
    }

    #[test]
    #[serial]
    fn test_overrides() {
        clear_env();
        std::env::set_var("POSTS_SERVICE_PORT", "8088");
        std::env::set_var("POSTS_DATA_DIR", "/var/lib/posts");
        std::env::set_var("POSTS_DB_FILE", "posts.db");
        std::env::set_var("HTTP_WORKERS", "2");

        let config = Config::from_env().unwrap();
        assert_eq!(config.app.port, 8088);
        assert_eq!(config.app.workers, Some(2));
        assert_eq!(
            config.database.database_path(),
            PathBuf::from("/var/lib/posts/posts.db")
        );

        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_port_is_rejected() {
        clear_env();
        std::env::set_var("POSTS_SERVICE_PORT", "not-a-port");

        let err = Config::from_env().unwrap_err();
        assert!(err.contains("POSTS_SERVICE_PORT"));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_zero_workers_is_rejected() {
        clear_env();
        std::env::set_var("HTTP_WORKERS", "0");

        assert!(Config::from_env().is_err());

        clear_env();
    }
}
