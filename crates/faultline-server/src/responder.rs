use std::sync::Arc;

use axum::Json;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use faultline_config::Mode;
use faultline_core::{ErrorEnvelope, ErrorValue, HttpError, Responded, Signaled};

/// Destination for full error diagnostics
///
/// Receives the complete error, including the detail that is never shown
/// to clients
pub trait DiagnosticSink: Send + Sync + 'static {
    fn record(&self, error: &ErrorValue);
}

/// Sink that writes one `tracing` error event per failed request
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&self, error: &ErrorValue) {
        tracing::error!(
            status = error.status_code().as_u16(),
            name = error.name(),
            error_type = error.error_type(),
            detail = error.detail(),
            "{}",
            error.message()
        );
    }
}

/// The single place where signaled errors become HTTP responses
#[derive(Clone)]
pub struct Responder {
    mode: Mode,
    sink: Arc<dyn DiagnosticSink>,
}

impl Responder {
    pub fn new(mode: Mode, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self { mode, sink }
    }

    /// Render an error as the final response for its request
    ///
    /// Diagnostics are written once unless running in test mode. The body
    /// is the client envelope and nothing else.
    pub fn respond(&self, error: &ErrorValue) -> Response {
        if self.mode.writes_diagnostics() {
            self.sink.record(error);
        }

        let mut response = (error.status_code(), Json(ErrorEnvelope::new(error))).into_response();
        response.extensions_mut().insert(Responded);
        response
    }
}

/// Middleware that hands every signaled error to the [`Responder`]
///
/// Responses without a signal pass through untouched, as do responses the
/// responder has already rendered.
pub async fn respond_to_errors(State(responder): State<Responder>, request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;

    if response.extensions().get::<Responded>().is_some() {
        return response;
    }

    match response.extensions_mut().remove::<Signaled>() {
        Some(Signaled(error)) => responder.respond(&error),
        None => response,
    }
}
