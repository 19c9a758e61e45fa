//! HTTP rendering of domain errors.
//!
//! The status comes from the [`ErrorCode`]. Internal failures are logged with
//! their real message and replaced on the wire by a generic one, keeping only
//! the trace id so operators can find the log line.

use actix_web::error::JsonPayloadError;
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode, web};
use serde_json::json;
use tracing::{debug, error};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Result alias for handlers.
pub type ApiResult<T> = Result<T, Error>;

const REDACTED_MESSAGE: &str = ErrorCode::InternalError.default_message();

impl Error {
    /// Copy safe to serialise for a client.
    fn public_view(&self) -> Error {
        if self.code() != ErrorCode::InternalError {
            return self.clone();
        }
        error!(message = self.message(), trace_id = ?self.trace_id(), "internal error");
        let redacted = Error::internal(REDACTED_MESSAGE);
        match self.trace_id() {
            Some(id) => redacted.with_trace_id(id),
            None => redacted,
        }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self.code() {
            ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            response.insert_header((TRACE_ID_HEADER, id));
        }
        response.json(self.public_view())
    }
}

/// JSON extractor settings turning unreadable bodies into `400` errors with
/// the usual payload instead of actix's plain-text response.
#[must_use]
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error_handler)
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, "rejecting request body");
    let code = match err {
        JsonPayloadError::ContentType => "unsupported_content_type",
        JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
            "body_too_large"
        }
        _ => "malformed_body",
    };
    Error::invalid_request(format!("invalid JSON request body: {err}"))
        .with_details(json!({ "code": code }))
        .into()
}
