// AWS Lambda binary entry point
//
// Build with: cargo build -p s3translate-lambda --release
//
// The lambda_runtime crate provides the tokio runtime, so we use #[tokio::main]

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    s3translate_lambda::run().await
}
