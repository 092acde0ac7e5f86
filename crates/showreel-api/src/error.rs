//! Showreel — API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use showreel_catalog::CatalogError;
use showreel_core::error::PlaybackError;
use thiserror::Error;

/// Startup errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// An environment variable is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The catalog could not be loaded.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// The player could not be started.
    #[error("playback error: {0}")]
    Playback(#[from] PlaybackError),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// HTTP-layer wrapper around `PlaybackError` that implements `IntoResponse`.
#[derive(Debug)]
pub struct ApiError(pub PlaybackError);

impl From<PlaybackError> for ApiError {
    fn from(err: PlaybackError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self.0 {
            PlaybackError::IndexOutOfRange { .. } => {
                (StatusCode::BAD_REQUEST, "index_out_of_range")
            }
            PlaybackError::InvalidState(_) => (StatusCode::CONFLICT, "invalid_state"),
            PlaybackError::Unavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "unavailable"),
            PlaybackError::Configuration(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "configuration_error")
            }
        };

        let body = ErrorBody {
            error: error_code,
            message: self.0.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: PlaybackError) -> StatusCode {
        let response = ApiError(err).into_response();
        response.status()
    }

    #[test]
    fn test_index_out_of_range_maps_to_400() {
        assert_eq!(
            status_of(PlaybackError::IndexOutOfRange {
                what: "group",
                index: 9,
                len: 6,
            }),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_invalid_state_maps_to_409() {
        assert_eq!(
            status_of(PlaybackError::InvalidState("stopped".into())),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_unavailable_maps_to_503() {
        assert_eq!(
            status_of(PlaybackError::Unavailable("gone".into())),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_configuration_maps_to_500() {
        assert_eq!(
            status_of(PlaybackError::Configuration("bad catalog".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
