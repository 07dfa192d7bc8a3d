use std::borrow::Cow;

use axum::response::{IntoResponse, Response};
use http::StatusCode;
use thiserror::Error;

/// Trait for errors that map to HTTP responses
///
/// Provides a uniform interface for the central responder to build the
/// client envelope from any error type
pub trait HttpError: std::error::Error {
    /// HTTP status code for this error
    fn status_code(&self) -> StatusCode;

    /// Machine-readable error type (e.g. `validation_error`)
    fn error_type(&self) -> &str;

    /// Message safe to expose to API consumers
    fn client_message(&self) -> String;
}

/// Category of a signaled error, used for diagnostics only
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorCategory {
    /// Fault raised by the runtime rather than by route logic
    UncaughtRuntime,
    /// Input rejected by explicit validation
    Validation,
    /// A deferred computation or dependency failed
    Upstream,
    /// A middleware stage refused to pass the request on
    MiddlewareRejected,
    /// No route matched the request
    NotFound,
    /// Generic error with no more specific category
    Internal,
}

/// An error value produced by route logic
///
/// Immutable once constructed: the builder methods consume and return the
/// value, and all fields are read through accessors. Constructing one does
/// not signal anything. It only reaches the responder when returned as the
/// `Err` of a handler, or when panicked with.
#[derive(Debug, Clone, Error)]
#[error("{name}: {message}")]
pub struct ErrorValue {
    message: Cow<'static, str>,
    name: Cow<'static, str>,
    status_code: Option<StatusCode>,
    category: ErrorCategory,
    detail: Option<String>,
    opaque: bool,
}

impl ErrorValue {
    /// Name used when none is given
    pub const DEFAULT_NAME: &'static str = "Error";

    /// Create a generic error with the default name and no status code
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            message: message.into(),
            name: Cow::Borrowed(Self::DEFAULT_NAME),
            status_code: None,
            category: ErrorCategory::Internal,
            detail: None,
            opaque: false,
        }
    }

    /// Error for requests that match no route
    pub fn not_found() -> Self {
        Self::new("Not Found")
            .with_status(StatusCode::NOT_FOUND)
            .with_category(ErrorCategory::NotFound)
    }

    /// Error for a fault raised by the runtime itself (e.g. a panic)
    ///
    /// Runtime faults are opaque: their client envelope carries no fields
    /// at all, only the status code. The detail is kept for diagnostics.
    pub fn runtime_fault(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self {
            message: Cow::Owned(detail.clone()),
            name: Cow::Borrowed("TypeError"),
            status_code: None,
            category: ErrorCategory::UncaughtRuntime,
            detail: Some(detail),
            opaque: true,
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status_code = Some(status);
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: ErrorCategory) -> Self {
        self.category = category;
        self
    }

    /// Attach internal diagnostic detail, never shown to clients
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared status code, if any
    pub const fn declared_status(&self) -> Option<StatusCode> {
        self.status_code
    }

    pub const fn category(&self) -> ErrorCategory {
        self.category
    }

    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// Whether the client envelope must be rendered without fields
    pub const fn is_opaque(&self) -> bool {
        self.opaque
    }
}

impl HttpError for ErrorValue {
    fn status_code(&self) -> StatusCode {
        self.status_code.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_type(&self) -> &str {
        self.category.as_ref()
    }

    fn client_message(&self) -> String {
        self.message.to_string()
    }
}

/// Marker carrying a signaled error from a handler to the responder
#[derive(Debug, Clone)]
pub struct Signaled(pub ErrorValue);

/// Marker set on a response once the responder has rendered it
#[derive(Debug, Clone, Copy)]
pub struct Responded;

impl IntoResponse for ErrorValue {
    /// Produce a bare response holding the error in its extensions
    ///
    /// The body is left empty: the central responder removes the error and
    /// renders the envelope, so rendering happens in exactly one place.
    fn into_response(self) -> Response {
        let mut response = self.status_code().into_response();
        response.extensions_mut().insert(Signaled(self));
        response
    }
}
