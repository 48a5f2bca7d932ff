use crate::server::router::MobdbState;
use axum::{
    Router,
    routing::{any, post},
};

pub mod handlers;

/// Read endpoints answer on every method; `/query` is POST only.
pub fn router() -> Router<MobdbState> {
    Router::new()
        .route("/schema", any(handlers::schema_handler))
        .route("/data/{table}", any(handlers::data_handler))
        .route("/db_status", any(handlers::db_status_handler))
        .route("/query", post(handlers::query_handler))
}
