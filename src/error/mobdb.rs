use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use mobdb_schema::ErrorBody;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum MobdbError {
    #[error("Remote fetch failed: {0}")]
    RemoteFetch(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("{0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl MobdbError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn database_not_found() -> Self {
        Self::validation("Database file not found")
    }
}

impl From<JsonRejection> for MobdbError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(format!("Error parsing request: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for MobdbError {
    fn from(rejection: PathRejection) -> Self {
        Self::Validation(format!("Invalid table name: {}", rejection.body_text()))
    }
}

impl From<figment::Error> for MobdbError {
    fn from(err: figment::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Every gateway failure is a domain-level outcome: the transport status stays
/// 200 and the payload carries the description.
impl IntoResponse for MobdbError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (StatusCode::OK, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn errors_render_as_ok_with_error_payload() {
        let resp = MobdbError::database_not_found().into_response();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], br#"{"error":"Database file not found"}"#);
    }

    #[test]
    fn database_errors_carry_sqlite_prefix() {
        let err = MobdbError::from(sqlx::Error::RowNotFound);
        assert!(err.to_string().starts_with("SQLite error: "));
    }
}
