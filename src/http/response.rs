//! Lookup error translation for clients.
//!
//! # Responsibilities
//! - Map classified lookup failures to HTTP status codes
//! - Keep provider error detail out of client-visible bodies
//!
//! # Mapping
//! - NotFound → 404
//! - Unavailable / Invalid → 500

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::lookup::LookupError;

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
}

/// A lookup failure on its way out to the client.
#[derive(Debug)]
pub struct ApiError(pub LookupError);

impl From<LookupError> for ApiError {
    fn from(err: LookupError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            LookupError::NotFound => StatusCode::NOT_FOUND,
            LookupError::Unavailable(_) | LookupError::Invalid(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error = match self.0 {
            LookupError::NotFound => "not_found",
            LookupError::Unavailable(_) | LookupError::Invalid(_) => "unavailable",
        };
        (self.status(), Json(ErrorBody { error })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError(LookupError::NotFound).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError(LookupError::Unavailable("502".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError(LookupError::Invalid("bad".into())).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
