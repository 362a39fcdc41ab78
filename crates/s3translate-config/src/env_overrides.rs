use super::{LogFormat, LoggingConfig, RuntimeConfig};
use anyhow::{anyhow, Context, Result};

pub const ENV_PREFIX: &str = "S3TRANSLATE_";

/// Abstraction over environment-variable lookups so tests (and other hosts)
/// can supply their own source of overrides.
pub trait EnvSource {
    fn get(&self, key: &str) -> Option<String>;

    /// Get an environment variable WITHOUT the S3TRANSLATE_ prefix
    /// Used for the Lambda's plain variables (INPUT_BUCKET, AWS_REGION, etc.)
    fn get_raw(&self, key: &str) -> Option<String>;
}

/// Apply environment-variable overrides (highest priority) to the runtime config.
///
/// Plain Lambda variables are applied first so that prefixed variables win
/// when both are present.
pub fn apply_env_overrides<E: EnvSource>(config: &mut RuntimeConfig, env: &E) -> Result<()> {
    // Lambda function environment
    if let Some(bucket) = get_raw_env_string(env, "INPUT_BUCKET") {
        config.buckets.input = Some(bucket);
    }
    if let Some(bucket) = get_raw_env_string(env, "OUTPUT_BUCKET") {
        config.buckets.output = Some(bucket);
    }
    if let Some(bucket) = get_raw_env_string(env, "REPORTS_BUCKET") {
        config.buckets.reports = Some(bucket);
    }
    if let Some(region) = get_raw_env_string(env, "AWS_REGION") {
        config.buckets.region = Some(region);
    }

    // Buckets
    if let Some(bucket) = get_env_string(env, "INPUT_BUCKET") {
        config.buckets.input = Some(bucket);
    }
    if let Some(bucket) = get_env_string(env, "OUTPUT_BUCKET") {
        config.buckets.output = Some(bucket);
    }
    if let Some(bucket) = get_env_string(env, "REPORTS_BUCKET") {
        config.buckets.reports = Some(bucket);
    }
    if let Some(region) = get_env_string(env, "REGION") {
        config.buckets.region = Some(region);
    }

    // Translation
    if let Some(val) = get_env_usize(env, "MAX_CHUNK_BYTES")? {
        config.translation.max_chunk_bytes = val;
    }
    if let Some(val) = get_env_usize(env, "DETECTION_SAMPLE_CHARS")? {
        config.translation.detection_sample_chars = val;
    }

    // Client
    if let Some(prefix) = get_env_string(env, "KEY_PREFIX") {
        config.client.key_prefix = prefix;
    }
    if let Some(val) = get_env_u64(env, "TIMEOUT_SECS")? {
        config.client.timeout_secs = val;
    }
    if let Some(val) = get_env_u64(env, "POLL_SECS")? {
        config.client.poll_secs = val;
    }
    if let Some(dir) = get_env_string(env, "RESULTS_DIR") {
        config.client.results_dir = dir;
    }

    // Logging
    if let Some(level) = get_env_string(env, "LOG_LEVEL") {
        ensure_logging(config).level = level;
    }
    if let Some(format) = get_env_string(env, "LOG_FORMAT") {
        ensure_logging(config).format = format
            .parse::<LogFormat>()
            .context("Invalid S3TRANSLATE_LOG_FORMAT value")?;
    }

    Ok(())
}

fn ensure_logging(config: &mut RuntimeConfig) -> &mut LoggingConfig {
    config.logging.get_or_insert_with(LoggingConfig::default)
}

fn get_env_string<E: EnvSource>(env: &E, key: &str) -> Option<String> {
    env.get(key).filter(|v| !v.is_empty())
}

/// Get a raw environment variable without the S3TRANSLATE_ prefix
fn get_raw_env_string<E: EnvSource>(env: &E, key: &str) -> Option<String> {
    env.get_raw(key).filter(|v| !v.is_empty())
}

fn get_env_usize<E: EnvSource>(env: &E, key: &str) -> Result<Option<usize>> {
    match get_env_string(env, key) {
        Some(val) => {
            let parsed = val
                .parse::<usize>()
                .map_err(|e| anyhow!("Failed to parse {}{}: {}", ENV_PREFIX, key, e))?;
            Ok(Some(parsed))
        }
        None => Ok(None),
    }
}

fn get_env_u64<E: EnvSource>(env: &E, key: &str) -> Result<Option<u64>> {
    match get_env_string(env, key) {
        Some(val) => {
            let parsed = val
                .parse::<u64>()
                .map_err(|e| anyhow!("Failed to parse {}{}: {}", ENV_PREFIX, key, e))?;
            Ok(Some(parsed))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Platform;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MapEnv {
        prefixed: HashMap<&'static str, &'static str>,
        raw: HashMap<&'static str, &'static str>,
    }

    impl EnvSource for MapEnv {
        fn get(&self, key: &str) -> Option<String> {
            self.prefixed.get(key).map(|v| v.to_string())
        }

        fn get_raw(&self, key: &str) -> Option<String> {
            self.raw.get(key).map(|v| v.to_string())
        }
    }

    #[test]
    fn lambda_variables_fill_buckets() {
        let env = MapEnv {
            raw: HashMap::from([
                ("INPUT_BUCKET", "lab-input"),
                ("OUTPUT_BUCKET", "lab-output"),
                ("REPORTS_BUCKET", "lab-reports"),
                ("AWS_REGION", "ap-northeast-1"),
            ]),
            ..Default::default()
        };

        let mut config = RuntimeConfig::from_platform_defaults(Platform::Lambda);
        apply_env_overrides(&mut config, &env).unwrap();

        assert_eq!(config.buckets.input.as_deref(), Some("lab-input"));
        assert_eq!(config.buckets.output.as_deref(), Some("lab-output"));
        assert_eq!(config.buckets.reports.as_deref(), Some("lab-reports"));
        assert_eq!(config.buckets.region.as_deref(), Some("ap-northeast-1"));
    }

    #[test]
    fn prefixed_variables_win() {
        let env = MapEnv {
            prefixed: HashMap::from([("OUTPUT_BUCKET", "override-output"), ("REGION", "us-east-1")]),
            raw: HashMap::from([("OUTPUT_BUCKET", "lab-output"), ("AWS_REGION", "ap-northeast-1")]),
        };

        let mut config = RuntimeConfig::default();
        apply_env_overrides(&mut config, &env).unwrap();

        assert_eq!(config.buckets.output.as_deref(), Some("override-output"));
        assert_eq!(config.buckets.region.as_deref(), Some("us-east-1"));
    }

    #[test]
    fn numeric_and_logging_overrides() {
        let env = MapEnv {
            prefixed: HashMap::from([
                ("MAX_CHUNK_BYTES", "3000"),
                ("POLL_SECS", "2"),
                ("TIMEOUT_SECS", "30"),
                ("LOG_LEVEL", "debug"),
                ("LOG_FORMAT", "json"),
            ]),
            ..Default::default()
        };

        let mut config = RuntimeConfig::default();
        apply_env_overrides(&mut config, &env).unwrap();

        assert_eq!(config.translation.max_chunk_bytes, 3000);
        assert_eq!(config.client.poll_secs, 2);
        assert_eq!(config.client.timeout_secs, 30);
        assert_eq!(config.logging().level, "debug");
        assert_eq!(config.logging().format, LogFormat::Json);
    }

    #[test]
    fn invalid_number_is_an_error() {
        let env = MapEnv {
            prefixed: HashMap::from([("MAX_CHUNK_BYTES", "lots")]),
            ..Default::default()
        };

        let mut config = RuntimeConfig::default();
        let err = apply_env_overrides(&mut config, &env).unwrap_err();
        assert!(err.to_string().contains("S3TRANSLATE_MAX_CHUNK_BYTES"));
    }

    #[test]
    fn empty_values_are_ignored() {
        let env = MapEnv {
            raw: HashMap::from([("OUTPUT_BUCKET", "")]),
            ..Default::default()
        };

        let mut config = RuntimeConfig::default();
        apply_env_overrides(&mut config, &env).unwrap();
        assert!(config.buckets.output.is_none());
    }
}
