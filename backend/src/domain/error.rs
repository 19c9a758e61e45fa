//! Transport-agnostic error payload.
//!
//! Services return [`Error`]; `inbound::http::error` turns it into a response.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::TraceId;

/// Response header carrying the request trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";

/// Failure category. Each maps to exactly one HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Blank credentials, an empty city name or an unreadable body.
    InvalidRequest,
    /// Bad credentials, or no identity in the session.
    Forbidden,
    /// No city with the requested name.
    NotFound,
    /// Username already registered.
    Conflict,
    /// Storage, hashing or session failures. Never shown verbatim.
    InternalError,
}

impl ErrorCode {
    /// Message used when a caller supplies none.
    #[must_use]
    pub const fn default_message(self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid request",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not found",
            Self::Conflict => "conflict",
            Self::InternalError => "Internal server error",
        }
    }
}

/// Error payload shared by services and the HTTP layer.
///
/// Serialises as `{code, message, traceId?, details?}`.
///
/// ## Invariants
/// - `message` is never blank.
/// - `trace_id`, when present, is never blank.
///
/// # Examples
/// ```
/// use cities_backend::domain::{Error, ErrorCode};
///
/// let err = Error::not_found("no city named Atlantis");
/// assert_eq!(err.code(), ErrorCode::NotFound);
///
/// // Blank messages fall back to the code's default.
/// assert_eq!(Error::new(ErrorCode::Conflict, "  ").message(), "conflict");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", try_from = "WireError", into = "WireError")]
pub struct Error {
    #[schema(example = "forbidden")]
    code: ErrorCode,
    #[schema(example = "please login")]
    message: String,
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    details: Option<Value>,
}

/// Rejection raised by the fallible [`Error`] builders.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorValidationError {
    /// The message was empty or whitespace.
    #[error("error message must not be empty")]
    EmptyMessage,
    /// The trace identifier was empty or whitespace.
    #[error("trace identifier must not be empty")]
    EmptyTraceId,
}

fn non_blank(value: &str) -> bool {
    !value.trim().is_empty()
}

impl Error {
    /// Build an error tagged with the current [`TraceId`], if any.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::try_new(code, message)
            .unwrap_or_else(|_| Self::untraced(code, code.default_message().to_owned()).traced())
    }

    /// Like [`Error::new`] but rejects a blank message.
    pub fn try_new(
        code: ErrorCode,
        message: impl Into<String>,
    ) -> Result<Self, ErrorValidationError> {
        let text = message.into();
        if !non_blank(&text) {
            return Err(ErrorValidationError::EmptyMessage);
        }
        Ok(Self::untraced(code, text).traced())
    }

    fn untraced(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            trace_id: None,
            details: None,
        }
    }

    fn traced(mut self) -> Self {
        self.trace_id = TraceId::current().map(|id| id.to_string());
        self
    }

    /// Machine-readable category.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable description.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Identifier of the request that failed, when known.
    #[must_use]
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Structured context, if any was attached.
    #[must_use]
    pub const fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Replace the trace identifier. Blank values leave it unchanged.
    pub fn with_trace_id(self, trace_id: impl Into<String>) -> Self {
        let id = trace_id.into();
        if non_blank(&id) {
            Self {
                trace_id: Some(id),
                ..self
            }
        } else {
            self
        }
    }

    /// Like [`Error::with_trace_id`] but rejects a blank value.
    pub fn try_with_trace_id(
        self,
        trace_id: impl Into<String>,
    ) -> Result<Self, ErrorValidationError> {
        let id = trace_id.into();
        if !non_blank(&id) {
            return Err(ErrorValidationError::EmptyTraceId);
        }
        Ok(self.with_trace_id(id))
    }

    /// Attach machine-readable context such as the offending field.
    ///
    /// ```
    /// use cities_backend::domain::Error;
    /// use serde_json::json;
    ///
    /// let err = Error::invalid_request("username must not be empty")
    ///     .with_details(json!({ "field": "username", "code": "empty_username" }));
    /// assert_eq!(err.details().unwrap()["field"], "username");
    /// ```
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Malformed or invalid input (400).
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Missing login or bad credentials (403).
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    /// The requested resource does not exist (404).
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// The resource already exists (409).
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    /// Unexpected failure (500). The message is logged, never returned.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Error {}

/// Wire form. Deserialisation re-checks the invariants and never picks up the
/// ambient trace id.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct WireError {
    code: ErrorCode,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "trace_id")]
    trace_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl From<Error> for WireError {
    fn from(error: Error) -> Self {
        let Error {
            code,
            message,
            trace_id,
            details,
        } = error;
        Self {
            code,
            message,
            trace_id,
            details,
        }
    }
}

impl TryFrom<WireError> for Error {
    type Error = ErrorValidationError;

    fn try_from(wire: WireError) -> Result<Self, Self::Error> {
        if !non_blank(&wire.message) {
            return Err(ErrorValidationError::EmptyMessage);
        }
        let error = Self {
            details: wire.details,
            ..Self::untraced(wire.code, wire.message)
        };
        match wire.trace_id {
            Some(id) => error.try_with_trace_id(id),
            None => Ok(error),
        }
    }
}
