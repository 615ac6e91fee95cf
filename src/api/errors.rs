use crate::engine::aggregate::AggregateError;
use crate::engine::errors::StoreError;
use crate::shared::response::{Response, StatusCode};
use thiserror::Error;
use tracing::{error, warn};

/// Message sent to clients for every failure they did not cause.
pub const INTERNAL_MESSAGE: &str = "Something went wrong!";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{method} not allowed for {path}")]
    MethodNotAllowed { method: String, path: String },

    #[error("{0}")]
    BadRequest(String),

    #[error("Request body exceeds {0} bytes")]
    PayloadTooLarge(usize),

    #[error("{0}")]
    Unavailable(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Aggregation error: {0}")]
    Aggregate(#[from] AggregateError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn method_not_allowed(method: &str, path: &str) -> Self {
        ApiError::MethodNotAllowed {
            method: method.to_string(),
            path: path.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NotFound,
            ApiError::MethodNotAllowed { .. } => StatusCode::MethodNotAllowed,
            ApiError::BadRequest(_) => StatusCode::BadRequest,
            ApiError::PayloadTooLarge(_) => StatusCode::PayloadTooLarge,
            ApiError::Unavailable(_) => StatusCode::ServiceUnavailable,
            ApiError::Store(_) | ApiError::Aggregate(_) | ApiError::Internal(_) => {
                StatusCode::InternalError
            }
        }
    }

    /// Text safe to return to the client. Server-side failures collapse to
    /// [`INTERNAL_MESSAGE`].
    pub fn public_message(&self) -> String {
        match self.status() {
            StatusCode::InternalError => INTERNAL_MESSAGE.to_string(),
            _ => self.to_string(),
        }
    }

    pub fn log_error(&self) {
        match self {
            ApiError::Store(e) => e.log_error(),
            ApiError::Aggregate(e) => {
                error!(target: "marquee::api", error = %e, "Aggregation failed");
            }
            ApiError::Internal(e) => {
                error!(target: "marquee::api", error = %e, "Internal error");
            }
            other => {
                warn!(target: "marquee::api", status = other.status().code(), error = %other, "Request rejected");
            }
        }
    }

    pub fn into_response(self) -> Response {
        self.log_error();
        Response::error(self.status(), self.public_message())
    }
}
