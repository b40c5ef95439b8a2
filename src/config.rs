//! Configuration management for the scoring dashboard

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Default configuration file, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";

/// Prefix for environment overrides, e.g. `FRAUD_DASH__SERVER__PORT=9000`
pub const ENV_PREFIX: &str = "FRAUD_DASH";

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub model: ModelConfig,
    pub content: ContentConfig,
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Largest accepted CSV upload in bytes
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

/// Trained model configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Model artifact (`.onnx` or `.json`), relative to the working directory
    pub path: String,
    /// Number of threads for ONNX inference (default: 1)
    pub onnx_threads: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: "model/model.onnx".to_string(),
            onnx_threads: 1,
        }
    }
}

/// Static page content
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Screenshot shown on the EDA tab
    pub eda_image: Option<String>,
    /// Link to the full exploratory analysis notebook
    pub notebook_url: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            eda_image: None,
            notebook_url: "https://colab.research.google.com/drive/1yogRmw0EFoETKz3TcXok-Wz2BjaYIT2S"
                .to_string(),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (pretty, json)
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl AppConfig {
    /// Load configuration from the default file (if present) and the
    /// environment, over built-in defaults
    pub fn load() -> Result<Self> {
        Self::build(Path::new(DEFAULT_CONFIG_PATH), false)
    }

    /// Load configuration from a specific path, which must exist
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::build(path.as_ref(), true)
    }

    fn build(path: &Path, required: bool) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path).required(required))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8501);
        assert_eq!(config.server.bind_addr(), "127.0.0.1:8501");
        assert_eq!(config.model.path, "model/model.onnx");
        assert_eq!(config.model.onnx_threads, 1);
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(config.content.eda_image.is_none());
    }

    #[test]
    fn test_load_from_path_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[model]\npath = \"model/demo.json\"\n\n[logging]\nformat = \"json\"\n",
        )
        .unwrap();

        let config = AppConfig::load_from_path(&path).unwrap();
        assert_eq!(config.model.path, "model/demo.json");
        assert_eq!(config.model.onnx_threads, 1);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.server.port, 8501);
    }

    #[test]
    fn test_shipped_config_points_at_bundled_model() {
        let config = AppConfig::load_from_path(DEFAULT_CONFIG_PATH).unwrap();
        assert_eq!(config.server.port, 8501);
        assert!(Path::new(&config.model.path).exists());
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        assert!(AppConfig::load_from_path("does/not/exist.toml").is_err());
    }
}
