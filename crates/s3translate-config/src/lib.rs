// s3translate-config - Unified configuration for the Lambda handler and the CLI
//
// Supports configuration from multiple sources:
// 1. Environment variables (highest priority)
// 2. Config file path from S3TRANSLATE_CONFIG env var
// 3. Config file contents from S3TRANSLATE_CONFIG_CONTENT env var
// 4. Default config file locations (./s3translate.toml, ./.s3translate.toml)
// 5. Platform-specific defaults (lowest priority)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

mod env_overrides;
mod platform;
mod sources;
mod validation;

pub use env_overrides::{EnvSource, ENV_PREFIX};
pub use platform::Platform;

/// Main runtime configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub buckets: BucketConfig,

    #[serde(default)]
    pub translation: TranslationConfig,

    #[serde(default)]
    pub client: ClientConfig,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

/// Bucket names and region. The Lambda reads the object's bucket from the
/// triggering event, so `input` is informational there.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BucketConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reports: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

/// Translation workflow configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationConfig {
    #[serde(default = "default_max_chunk_bytes")]
    pub max_chunk_bytes: usize,
    #[serde(default = "default_detection_sample_chars")]
    pub detection_sample_chars: usize,
}

fn default_max_chunk_bytes() -> usize {
    4500
}

fn default_detection_sample_chars() -> usize {
    1000
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            max_chunk_bytes: default_max_chunk_bytes(),
            detection_sample_chars: default_detection_sample_chars(),
        }
    }
}

/// Upload/poll/download client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub key_prefix: String,
    pub timeout_secs: u64,
    pub poll_secs: u64,
    pub results_dir: String,
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_secs)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            key_prefix: "audit".to_string(),
            timeout_secs: 180,
            poll_secs: 5,
            results_dir: "LAB3-DELIVERABLES/results".to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => anyhow::bail!("Unsupported log format: {}. Supported: text, json", s),
        }
    }
}

/// Bucket names the Lambda handler cannot run without
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LambdaBuckets {
    pub output: String,
    pub reports: String,
}

impl RuntimeConfig {
    /// Load configuration for a specific platform (useful for testing)
    pub fn load_for_platform(platform: Platform) -> Result<Self> {
        sources::load_config(platform)
    }

    /// Load configuration from an explicit file (CLI `--config`)
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        sources::load_from_file_path(path)
    }

    pub fn from_platform_defaults(platform: Platform) -> Self {
        let defaults = platform.defaults();
        Self {
            buckets: BucketConfig::default(),
            translation: TranslationConfig::default(),
            client: ClientConfig::default(),
            logging: Some(LoggingConfig {
                level: defaults.log_level.to_string(),
                format: defaults.log_format,
            }),
        }
    }

    /// Parse TOML content into a configuration.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse s3translate configuration")
    }

    /// Merge another config into this one (used for TOML layering).
    pub fn merge(&mut self, other: RuntimeConfig) {
        self.buckets = other.buckets;
        self.translation = other.translation;
        self.client = other.client;

        if other.logging.is_some() {
            self.logging = other.logging;
        }
    }

    /// Apply environment overrides from a custom source.
    pub fn apply_env_overrides_from<E: EnvSource>(&mut self, env: &E) -> Result<()> {
        env_overrides::apply_env_overrides(self, env)
    }

    /// Effective logging configuration.
    pub fn logging(&self) -> LoggingConfig {
        self.logging.clone().unwrap_or_default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }

    /// Output and reports buckets, required by the Lambda handler.
    pub fn lambda_buckets(&self) -> Result<LambdaBuckets> {
        validation::require_lambda_buckets(&self.buckets)
    }
}
