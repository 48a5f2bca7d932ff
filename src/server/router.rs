use crate::gateway::{FreshnessTracker, SqliteGateway};
use crate::server::routes::viewer;

use axum::{
    Router,
    extract::Request,
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::Response,
};
use base64::Engine as _;
use rand::RngCore;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

const MAX_REQUEST_ID_LEN: usize = 128;
const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Caller-supplied `x-request-id` when usable, otherwise a fresh 64-bit
/// base64url id.
fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty() && v.len() <= MAX_REQUEST_ID_LEN)
        .map_or_else(
            || {
                let mut bytes = [0u8; 8];
                rand::rng().fill_bytes(&mut bytes);
                base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
            },
            str::to_string,
        )
}

/// Shared per-process gateway state. Cloned into every request.
#[derive(Clone)]
pub struct MobdbState {
    pub gateway: Arc<SqliteGateway>,
    pub freshness: Arc<FreshnessTracker>,
}

impl MobdbState {
    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        Self {
            gateway: Arc::new(SqliteGateway::new(database_path)),
            freshness: Arc::new(FreshnessTracker::default()),
        }
    }
}

async fn not_found_handler() -> StatusCode {
    StatusCode::NOT_FOUND
}

async fn access_log(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let version = req.version();
    let request_id = request_id(req.headers());

    let start = Instant::now();
    let mut resp = next.run(req).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        resp.headers_mut().insert(X_REQUEST_ID, value);
    }

    let status = resp.status();
    let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
    macro_rules! access_event {
        ($level:ident) => {
            $level!(
                status = status.as_u16(),
                request_id = %request_id,
                method = %method,
                version = ?version,
                path = %path,
                latency_ms,
                "request served"
            )
        };
    }
    if status.is_server_error() {
        access_event!(error);
    } else if status.is_client_error() {
        access_event!(warn);
    } else {
        access_event!(info);
    }

    resp
}

pub fn mobdb_router(state: MobdbState) -> Router {
    Router::new()
        .merge(viewer::router())
        .fallback(not_found_handler)
        .with_state(state)
        .layer(middleware::from_fn(access_log))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caller_request_id_is_kept_when_reasonable() {
        let mut headers = HeaderMap::new();
        headers.insert(X_REQUEST_ID, HeaderValue::from_static("abc-1"));
        assert_eq!(request_id(&headers), "abc-1");
    }

    #[test]
    fn oversized_or_missing_ids_are_replaced() {
        let generated = request_id(&HeaderMap::new());
        assert_eq!(generated.len(), 11);

        let mut headers = HeaderMap::new();
        let long = "x".repeat(MAX_REQUEST_ID_LEN + 1);
        headers.insert(X_REQUEST_ID, HeaderValue::from_str(&long).unwrap());
        assert_ne!(request_id(&headers), long);
    }
}
