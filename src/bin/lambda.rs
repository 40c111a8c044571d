//! AWS Lambda entry point for OwwJurnal
//!
//! Deploy with `cargo lambda build --release --features lambda,s3`
//! behind a function URL.

use lambda_runtime::{Error as LambdaError, LambdaEvent, service_fn};
use owwjurnal::functions::Functions;
use owwjurnal::lambda::{FunctionUrlRequest, handler};
use owwjurnal::models::Config;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the AWS Lambda function.
#[tokio::main]
async fn main() -> Result<(), LambdaError> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!("OwwJurnal Lambda starting...");

    let mut config = Config::default();
    config.apply_env();
    config.validate()?;

    let functions = Functions::from_config(&config).await?;
    let functions = &functions;

    lambda_runtime::run(service_fn(move |event: LambdaEvent<FunctionUrlRequest>| async move {
        handler(functions, event).await
    }))
    .await
}
