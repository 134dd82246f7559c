use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use crab_snapshot::{InvocationResponse, ResponseBody};
use serde::Deserialize;

use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
struct RestoreRequest {
    key: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/backup", post(backup))
        .route("/restore", post(restore))
        .with_state(state)
}

fn into_reply(resp: InvocationResponse) -> (StatusCode, Json<ResponseBody>) {
    let status = StatusCode::from_u16(resp.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(resp.body))
}

async fn health() -> &'static str {
    "ok"
}

async fn backup(State(state): State<AppState>) -> (StatusCode, Json<ResponseBody>) {
    into_reply(state.pipeline().run_backup().await)
}

/// Empty body means "latest"; an unparsable one is rejected with 400 before
/// any pipeline runs
fn parse_restore_request(body: &[u8]) -> Result<RestoreRequest, InvocationResponse> {
    if body.is_empty() {
        return Ok(RestoreRequest::default());
    }
    serde_json::from_slice::<RestoreRequest>(body).map_err(|e| InvocationResponse {
        status: StatusCode::BAD_REQUEST.as_u16(),
        body: ResponseBody {
            message: "Invalid restore request".into(),
            error: Some(e.to_string()),
            report: None,
        },
    })
}

async fn restore(State(state): State<AppState>, body: Bytes) -> (StatusCode, Json<ResponseBody>) {
    match parse_restore_request(&body) {
        Ok(request) => into_reply(state.pipeline().run_restore(request.key).await),
        Err(rejected) => into_reply(rejected),
    }
}
