//! API error type and its HTTP mapping.
//!
//! Every failure is rendered as `{"error": "<message>"}`. Client mistakes are
//! 400 (415 for a body not declared as JSON), classifier failures are 500
//! with a fixed message; the underlying cause only goes to the log.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use vitalwatch_nn::NnError;

use super::dto::ErrorResponse;
use crate::pipeline::PipelineError;

/// Body text for a reading with absent fields
pub const MISSING_FIELDS_MESSAGE: &str = "Missing input fields";

/// Body text for a classifier failure
pub const PREDICTION_FAILED_MESSAGE: &str = "Prediction failed";

/// API error type that converts to HTTP responses
#[derive(Debug, Error)]
pub enum ApiError {
    /// One or more required reading fields absent (400)
    #[error("Missing input fields: {}", .fields.join(", "))]
    MissingFields {
        /// Wire names of the absent fields
        fields: Vec<&'static str>,
    },

    /// Body could not be decoded as a reading (400)
    #[error("Bad request: {message}")]
    BadRequest {
        /// Decoder reason, returned to the client
        message: String,
    },

    /// Request body not declared as `application/json` (415)
    #[error("Unsupported media type: {message}")]
    UnsupportedMediaType {
        /// Rejection reason, returned to the client
        message: String,
    },

    /// Classifier failed (500)
    #[error("Prediction failed: {source}")]
    PredictionFailed {
        /// Underlying inference error
        #[source]
        source: NnError,
    },
}

impl ApiError {
    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingFields { .. } | Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::UnsupportedMediaType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::PredictionFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message placed in the response body
    pub fn client_message(&self) -> String {
        match self {
            Self::MissingFields { .. } => MISSING_FIELDS_MESSAGE.to_string(),
            Self::BadRequest { message } | Self::UnsupportedMediaType { message } => message.clone(),
            Self::PredictionFailed { .. } => PREDICTION_FAILED_MESSAGE.to_string(),
        }
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::MissingFields(fields) => Self::MissingFields { fields },
            PipelineError::Inference(source) => Self::PredictionFailed { source },
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let message = rejection.body_text();
        match rejection {
            JsonRejection::MissingJsonContentType(_) => Self::UnsupportedMediaType { message },
            _ => Self::BadRequest { message },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "API error");
        } else {
            tracing::warn!(error = %self, "API error");
        }

        (status, Json(ErrorResponse::new(self.client_message()))).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
