use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use s3translate::{
    default_download_path, run_batch, BatchRequest, RoundtripClient, RoundtripError,
    RoundtripRequest,
};
use s3translate_config::{Platform, RuntimeConfig};
use s3translate_storage::{load_sdk_config, ObjectStore, S3Store};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Upload documents for S3-triggered translation and download the results
#[derive(Parser)]
#[command(name = "s3translate")]
#[command(version)]
#[command(about = "Upload documents for S3-triggered translation and download the results", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short = 'v', long, value_name = "LEVEL", global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate one file: upload, wait for the result, download it
    Roundtrip(RoundtripArgs),
    /// Translate every matching file in a directory, one at a time
    Batch(BatchArgs),
}

/// Options shared by both commands
#[derive(Args)]
struct CommonArgs {
    /// S3 input bucket that triggers Lambda translation (default: buckets.input)
    #[arg(long, value_name = "BUCKET")]
    input_bucket: Option<String>,

    /// S3 output bucket where the translated object is written (default: buckets.output)
    #[arg(long, value_name = "BUCKET")]
    output_bucket: Option<String>,

    /// AWS region (defaults to profile/environment)
    #[arg(long, value_name = "REGION")]
    region: Option<String>,

    /// Max wait time for translated output [default: 180]
    #[arg(long, value_name = "SECONDS")]
    timeout_seconds: Option<u64>,

    /// Polling interval while waiting [default: 5]
    #[arg(long, value_name = "SECONDS")]
    poll_seconds: Option<u64>,
}

#[derive(Args)]
struct RoundtripArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Local source file path
    #[arg(long, value_name = "FILE")]
    source_file: PathBuf,

    /// Destination key in the input bucket (default: audit/<basename>)
    #[arg(long, value_name = "KEY")]
    s3_key: Option<String>,

    /// Local output path (default: LAB3-DELIVERABLES/results/<stem>_translated<ext>)
    #[arg(long, value_name = "PATH")]
    download_to: Option<PathBuf>,
}

#[derive(Args)]
struct BatchArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Local folder of source files
    #[arg(long, value_name = "DIR", default_value = "Tokyo/audit")]
    source_dir: PathBuf,

    /// File pattern in the source folder
    #[arg(long, value_name = "PATTERN", default_value = "*.txt")]
    glob: String,

    /// S3 input key prefix [default: audit]
    #[arg(long, value_name = "PREFIX")]
    key_prefix: Option<String>,

    /// Local folder for downloaded translated files (default: LAB3-DELIVERABLES/results/translations)
    #[arg(long, value_name = "DIR")]
    dest_dir: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("[ERROR] {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(async_main(cli)) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("[ERROR] {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn async_main(cli: Cli) -> Result<ExitCode> {
    // Step 1: Load base configuration
    let mut config = match &cli.config {
        Some(path) => RuntimeConfig::load_from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => RuntimeConfig::load_for_platform(Platform::Cli)
            .context("Failed to load configuration")?,
    };

    // Step 2: Apply CLI overrides (highest priority)
    let common = match &cli.command {
        Commands::Roundtrip(args) => &args.common,
        Commands::Batch(args) => &args.common,
    };
    apply_cli_overrides(&mut config, common, cli.log_level.as_deref());

    // Step 3: Initialize tracing
    s3translate::init_tracing(&config.logging());
    config.validate()?;

    let outcome = match cli.command {
        Commands::Roundtrip(args) => run_roundtrip(&config, args).await,
        Commands::Batch(args) => run_batch_command(&config, args).await,
    };

    Ok(match outcome {
        Ok(code) => code,
        Err(e) => {
            eprintln!("[ERROR] {}", e);
            ExitCode::from(e.exit_code())
        }
    })
}

fn apply_cli_overrides(config: &mut RuntimeConfig, common: &CommonArgs, log_level: Option<&str>) {
    if let Some(bucket) = &common.input_bucket {
        config.buckets.input = Some(bucket.clone());
    }
    if let Some(bucket) = &common.output_bucket {
        config.buckets.output = Some(bucket.clone());
    }
    if let Some(region) = &common.region {
        config.buckets.region = Some(region.clone());
    }
    if let Some(secs) = common.timeout_seconds {
        config.client.timeout_secs = secs;
    }
    if let Some(secs) = common.poll_seconds {
        config.client.poll_secs = secs;
    }
    if let Some(level) = log_level {
        config.logging.get_or_insert_with(Default::default).level = level.to_string();
    }
}

/// Input and output bucket names, required for both commands.
fn buckets(config: &RuntimeConfig) -> Result<(String, String), RoundtripError> {
    let input = config.buckets.input.clone().filter(|b| !b.is_empty()).ok_or_else(|| {
        RoundtripError::InvalidInput("--input-bucket is required (or set buckets.input)".into())
    })?;
    let output = config.buckets.output.clone().filter(|b| !b.is_empty()).ok_or_else(|| {
        RoundtripError::InvalidInput("--output-bucket is required (or set buckets.output)".into())
    })?;
    Ok((input, output))
}

async fn build_client(config: &RuntimeConfig) -> RoundtripClient {
    let sdk_config = load_sdk_config(config.buckets.region.as_deref()).await;
    let store: Arc<dyn ObjectStore> = Arc::new(S3Store::from_sdk_config(&sdk_config));
    RoundtripClient::new(store)
}

fn timing(config: &RuntimeConfig) -> (Duration, Duration) {
    (config.client.timeout(), config.client.poll_interval())
}

async fn run_roundtrip(
    config: &RuntimeConfig,
    args: RoundtripArgs,
) -> Result<ExitCode, RoundtripError> {
    // Checked before any network call
    if !args.source_file.is_file() {
        return Err(RoundtripError::MissingSource {
            path: args.source_file,
        });
    }
    let (input_bucket, output_bucket) = buckets(config)?;

    let download_to = args
        .download_to
        .unwrap_or_else(|| default_download_path(&config.client.results_dir, &args.source_file));
    let (timeout, poll_interval) = timing(config);

    let mut request = RoundtripRequest::new(
        &args.source_file,
        input_bucket,
        output_bucket,
        &config.client.key_prefix,
        download_to,
    )
    .with_timing(timeout, poll_interval);
    if let Some(key) = args.s3_key {
        request = request.with_key(key);
    }

    info!(key = %request.key, timeout_secs = timeout.as_secs(), "starting roundtrip");
    let client = build_client(config).await;
    client.roundtrip(&request).await?;
    Ok(ExitCode::SUCCESS)
}

async fn run_batch_command(
    config: &RuntimeConfig,
    args: BatchArgs,
) -> Result<ExitCode, RoundtripError> {
    let (input_bucket, output_bucket) = buckets(config)?;
    let (timeout, poll_interval) = timing(config);

    let request = BatchRequest {
        source_dir: args.source_dir,
        pattern: args.glob,
        key_prefix: args
            .key_prefix
            .unwrap_or_else(|| config.client.key_prefix.clone()),
        dest_dir: args
            .dest_dir
            .unwrap_or_else(|| PathBuf::from(&config.client.results_dir).join("translations")),
        input_bucket,
        output_bucket,
        timeout,
        poll_interval,
    };

    // No files means nothing to upload, so skip building the S3 client
    if s3translate::find_sources(&request.source_dir, &request.pattern).is_empty() {
        return Err(RoundtripError::NoSourceFiles {
            dir: request.source_dir,
            pattern: request.pattern,
        });
    }

    let client = build_client(config).await;
    let summary = run_batch(&client, &request).await?;

    if summary.is_success() {
        println!("[DONE] All files translated successfully.");
        Ok(ExitCode::SUCCESS)
    } else {
        eprintln!(
            "[DONE] Completed with {} failure(s).",
            summary.failure_count()
        );
        Ok(ExitCode::FAILURE)
    }
}
