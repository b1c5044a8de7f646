//! # Company Errors
//!
//! Every failure of a company operation funnels through [`CompanyError`],
//! and [`CompanyError::status_code`] is the one place that decides the HTTP
//! status. Anything that is not a missing row is reported as a 500 carrying
//! the underlying message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::datastore::DatastoreError;

/// Result type for company operations
pub type CompanyResult<T> = Result<T, CompanyError>;

/// Company operation errors
#[derive(Debug, Error)]
pub enum CompanyError {
    /// No row matched the requested code
    #[error("There is no company with code '{code}'")]
    NotFound { code: String },

    /// The datastore rejected or failed the statement
    #[error("{0}")]
    Datastore(#[from] DatastoreError),

    /// A returned row did not match the expected record
    #[error("Unexpected row shape: {0}")]
    Decode(#[from] serde_json::Error),

    /// A statement expected to return a row returned none
    #[error("Statement returned no rows")]
    EmptyResult,
}

impl CompanyError {
    pub fn not_found(code: impl Into<String>) -> Self {
        Self::NotFound { code: code.into() }
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            CompanyError::NotFound { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl From<&CompanyError> for ErrorResponse {
    fn from(err: &CompanyError) -> Self {
        Self {
            code: err.status_code().as_u16(),
            error: err.to_string(),
        }
    }
}

impl IntoResponse for CompanyError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "request rejected");
        }
        (status, Json(ErrorResponse::from(&self))).into_response()
    }
}
