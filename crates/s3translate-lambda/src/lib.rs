// AWS Lambda runtime adapter
//
// Handles S3 ObjectCreated events: translates uploaded text into the output
// bucket and archives both language variants in the reports bucket.
//
// Uses lambda_runtime's provided tokio; we don't add our own runtime.

use chrono::Utc;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use s3translate_config::{LogFormat, LoggingConfig, Platform, RuntimeConfig};
use s3translate_handlers::{AwsTranslate, DocumentTranslator, Processor, ProcessorConfig};
use s3translate_storage::{load_sdk_config, ObjectStore, S3Store};
use std::sync::Arc;
use tracing::info;

use aws_lambda_events::event::s3::S3Event;

mod handler;
mod response;

pub use response::HandlerResponse;

type LambdaProcessor = Processor<AwsTranslate, AwsTranslate>;

async fn handle_request(
    event: LambdaEvent<S3Event>,
    processor: Arc<LambdaProcessor>,
) -> Result<HandlerResponse, Error> {
    let (event, _context) = event.into_parts();
    info!(records = event.records.len(), "processing event");
    Ok(handler::handle_event(&event, &processor, Utc::now()).await)
}

/// Lambda runtime entry point
pub async fn run() -> Result<(), Error> {
    let config = RuntimeConfig::load_for_platform(Platform::Lambda)
        .map_err(|e| Error::from(format!("Failed to load configuration: {:#}", e)))?;
    init_tracing(&config.logging());

    info!(
        version = env!("CARGO_PKG_VERSION"),
        git_hash = env!("GIT_HASH"),
        build_timestamp = env!("BUILD_TIMESTAMP"),
        "s3translate lambda starting"
    );

    let buckets = config
        .lambda_buckets()
        .map_err(|e| Error::from(format!("Invalid configuration: {:#}", e)))?;

    // Credentials come from the function's execution role
    let sdk_config = load_sdk_config(config.buckets.region.as_deref()).await;
    let store: Arc<dyn ObjectStore> = Arc::new(S3Store::from_sdk_config(&sdk_config));
    let translate = AwsTranslate::from_sdk_config(&sdk_config);

    let translator = DocumentTranslator::new(translate.clone(), translate).with_limits(
        config.translation.max_chunk_bytes,
        config.translation.detection_sample_chars,
    );

    info!(
        output_bucket = %buckets.output,
        reports_bucket = %buckets.reports,
        max_chunk_bytes = config.translation.max_chunk_bytes,
        "translation workflow configured"
    );

    let processor = Arc::new(Processor::new(
        store,
        translator,
        ProcessorConfig {
            output_bucket: buckets.output,
            reports_bucket: buckets.reports,
        },
    ));

    lambda_runtime::run(service_fn(move |event: LambdaEvent<S3Event>| {
        let processor = processor.clone();
        async move { handle_request(event, processor).await }
    }))
    .await
}

fn init_tracing(logging: &LoggingConfig) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let env_filter =
        EnvFilter::try_new(&logging.level).unwrap_or_else(|_| EnvFilter::new("info"));

    // CloudWatch does not render ANSI colours
    let registry = tracing_subscriber::registry().with(env_filter);
    let _ = match logging.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_ansi(false).without_time())
            .try_init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_ansi(false).without_time())
            .try_init(),
    };
}
