//! crab-snapshot-lambda — backup/restore entry points
//!
//! - POST /backup  → archive every collection to S3
//! - POST /restore → restore the newest archive (or `{"key": ...}`)
//! - GET  /health

mod api;
mod state;

use crab_snapshot::Config;
use state::AppState;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), lambda_http::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crab_snapshot=info,crab_snapshot_lambda=info".into()),
        )
        .without_time() // CloudWatch adds timestamps
        .init();

    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    // AWS SDK client is process-wide; per-invocation pipelines borrow it
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let s3_client = aws_sdk_s3::Client::new(&aws_config);

    let state = AppState::new(config, s3_client);
    let app = api::router(state);

    info!("crab-snapshot Lambda handler ready");
    lambda_http::run(app).await
}
