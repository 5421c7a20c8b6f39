use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use tracing::{info, warn};

use crate::pipeline::{DiscomfortResult, ProviderError};

use super::client_ip;
use super::state::AppState;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

pub(super) struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    ApiError(status, msg.into())
}

/// Provider failures surface as 502: the request was valid, the upstream
/// was not. The process keeps serving.
impl From<ProviderError> for ApiError {
    fn from(err: ProviderError) -> Self {
        api_error(StatusCode::BAD_GATEWAY, err.to_string())
    }
}

// ─── GET {api_path} ──────────────────────────────────────────────

pub async fn discomfort(
    State(state): State<Arc<AppState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Result<Json<DiscomfortResult>, ApiError> {
    let start = Instant::now();

    // None means the detected address is private and the public address has
    // to be looked up first, which is a network call of its own.
    let ip: Option<String> = match state.ip_override.clone() {
        Some(ip) => Some(ip),
        None => {
            let detected = client_ip::from_request(&headers, peer);
            (!client_ip::is_private(detected)).then(|| detected.to_string())
        }
    };

    // The pipeline and the public-IP fallback are blocking ureq calls; keep
    // them off the async workers.
    let worker_state = state.clone();
    let outcome = tokio::task::spawn_blocking(move || -> Result<(String, DiscomfortResult), ProviderError> {
        let ip = match ip {
            Some(ip) => ip,
            None => client_ip::lookup_public()?,
        };
        let result = worker_state.pipeline.run(&ip, &worker_state.api_key)?;
        Ok((ip, result))
    })
    .await
    .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    let (ip, result) = outcome.map_err(|e| {
        warn!(provider = e.provider(), error = %e, "provider failure");
        ApiError::from(e)
    })?;

    info!(
        ip = %ip,
        city = %result.city,
        index = result.index,
        feeling = %result.feeling,
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "request served"
    );

    Ok(Json(result))
}
