use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use log::error;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to parse date parameter: {0}")]
    DateParse(String),
    #[error("Failed to query climate data: {0}")]
    Query(#[from] sqlx::Error),
}

/// Every failure is reported to the caller as an opaque 500; the cause only
/// goes to the log.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        error!("error handling request: {}", self);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            StatusCode::INTERNAL_SERVER_ERROR
                .canonical_reason()
                .unwrap_or_default(),
        )
            .into_response()
    }
}
