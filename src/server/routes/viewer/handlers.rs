use crate::error::MobdbError;
use crate::server::router::MobdbState;
use crate::utils::logging::with_pretty_json_debug;
use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
};
use mobdb_schema::{DbStatus, QueryOutcome, QueryRequest, ResultRow, SchemaMap};
use tracing::{debug, warn};

pub(super) async fn schema_handler(
    State(state): State<MobdbState>,
) -> Result<Json<SchemaMap>, MobdbError> {
    let schema = state.gateway.schema().await?;
    debug!(tables = schema.len(), "Schema loaded");
    Ok(Json(schema))
}

pub(super) async fn data_handler(
    State(state): State<MobdbState>,
    table: Result<Path<String>, PathRejection>,
) -> Result<Json<Vec<ResultRow>>, MobdbError> {
    let Path(table) = table?;
    let rows = state.gateway.dump_table(&table).await?;
    debug!(table = %table, rows = rows.len(), "Table data loaded");
    Ok(Json(rows))
}

pub(super) async fn db_status_handler(State(state): State<MobdbState>) -> Json<DbStatus> {
    Json(state.freshness.check_status(state.gateway.path()).await)
}

/// Bad bodies and engine failures both come back as `{"error": ...}` with a
/// 200 status; only the method check (done by routing) is a transport error.
/// A missing database file takes precedence over body errors.
pub(super) async fn query_handler(
    State(state): State<MobdbState>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> Json<QueryOutcome> {
    Json(run_query(&state, payload).await.unwrap_or_else(|e| {
        warn!(error = %e, "Query request failed");
        QueryOutcome::failed(e.to_string())
    }))
}

async fn run_query(
    state: &MobdbState,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<QueryOutcome, MobdbError> {
    state.gateway.ensure_present().await?;
    let Json(req) = payload?;
    with_pretty_json_debug(&req, |pretty_body| {
        debug!(body = %pretty_body, "Incoming query request");
    });
    state.gateway.execute(&req.query).await
}
