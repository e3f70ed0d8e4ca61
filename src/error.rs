//! Service error taxonomy and its HTTP mapping.
//!
//! Every per-request failure is converted at the handler boundary into a
//! JSON body of the form `{"error": "<message>"}` with a 400 status, except
//! for absent records which map to 404. Startup failures (configuration,
//! model artifact, store connection) are fatal and never reach this type.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Malformed, missing or wrong-typed input field.
    #[error("{0}")]
    Validation(String),

    /// Identifier is well-formed but no record exists for it.
    #[error("record {0} not found")]
    NotFound(String),

    /// Identifier does not match the store's expected format.
    #[error("invalid record identifier: {0}")]
    InvalidIdentifier(String),

    /// The underlying datastore failed at request time.
    #[error("storage error: {0}")]
    Store(#[source] anyhow::Error),

    /// The classifier rejected the encoded feature row.
    #[error("prediction failed: {0}")]
    Model(String),
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        Error::Store(err.into())
    }
}

impl From<redis::RedisError> for Error {
    fn from(err: redis::RedisError) -> Self {
        Error::Store(err.into())
    }
}

impl From<bb8_redis::bb8::RunError<redis::RedisError>> for Error {
    fn from(err: bb8_redis::bb8::RunError<redis::RedisError>) -> Self {
        Error::Store(err.into())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Store(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let err = Error::NotFound("17".into());
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn other_variants_map_to_400() {
        let cases = [
            Error::Validation("field `age` must be an integer".into()),
            Error::InvalidIdentifier("abc".into()),
            Error::Model("empty prediction".into()),
        ];
        for err in cases {
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        }
    }
}
