//! Application configuration management.

use std::path::PathBuf;

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// CSV import configuration.
    #[serde(default)]
    pub import: ImportConfig,
    /// Transaction classifier configuration.
    #[serde(default)]
    pub classifier: ClassifierConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// CSV import configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportConfig {
    /// Number of rows persisted concurrently.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
        }
    }
}

/// Transaction classifier configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierConfig {
    /// Mapping table to load instead of the packaged one.
    #[serde(default)]
    pub mapping_file: Option<PathBuf>,
    /// Number of transactions saved concurrently.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            mapping_file: None,
            concurrency: default_concurrency(),
        }
    }
}

fn default_concurrency() -> usize {
    8
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

fn default_filter() -> String {
    "fambud=info".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("FAMBUD").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{Config, File, FileFormat};

    fn from_toml(toml: &str) -> Result<AppConfig, config::ConfigError> {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    #[test]
    fn test_defaults_applied() {
        let config = from_toml(
            r#"
            [database]
            url = "postgres://localhost/fambud"
            "#,
        )
        .unwrap();

        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.database.min_connections, 1);
        assert_eq!(config.import.concurrency, 8);
        assert_eq!(config.classifier.concurrency, 8);
        assert!(config.classifier.mapping_file.is_none());
        assert_eq!(config.logging.filter, "fambud=info");
    }

    #[test]
    fn test_overrides() {
        let config = from_toml(
            r#"
            [database]
            url = "postgres://localhost/fambud"
            max_connections = 3

            [import]
            concurrency = 2

            [classifier]
            mapping_file = "/etc/fambud/mapping.csv"
            "#,
        )
        .unwrap();

        assert_eq!(config.database.max_connections, 3);
        assert_eq!(config.import.concurrency, 2);
        assert_eq!(
            config.classifier.mapping_file,
            Some(PathBuf::from("/etc/fambud/mapping.csv"))
        );
    }

    #[test]
    fn test_missing_database_url_is_an_error() {
        assert!(from_toml("[import]\nconcurrency = 1\n").is_err());
    }
}
