//! Operations that each produce an error through one propagation mechanism
//!
//! Some of them deliberately fail to propagate: an error that is only
//! constructed and returned, or caught and resolved as a value, never reaches
//! the responder and the request succeeds.

use std::time::Duration;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use faultline_core::{ErrorCategory, ErrorValue};
use http::{StatusCode, Uri};
use serde::Serialize;

/// How long a deferred computation waits before settling
const DEFERRAL: Duration = Duration::from_millis(5);

/// A record an upstream dependency would return on success
#[derive(Debug, Clone, Serialize)]
pub struct Record {
    pub id: u64,
    pub label: String,
}

/// What route logic sees of the incoming request
#[derive(Debug, Default)]
pub struct RequestInput {
    pub query: Option<String>,
    profile: Option<Profile>,
}

/// Profile a request body would carry
#[derive(Debug)]
pub struct Profile {
    pub display_name: String,
}

impl RequestInput {
    /// Build the input from the request URI
    ///
    /// A GET carries no body, so the profile is never present.
    pub fn from_uri(uri: &Uri) -> Self {
        Self {
            query: uri.query().map(ToOwned::to_owned),
            profile: None,
        }
    }
}

/// Read the display name from the request's profile
///
/// # Panics
///
/// Always panics when the profile is absent, which it is for every request
/// built by [`RequestInput::from_uri`]. The panic is a runtime fault, not an
/// error value.
pub fn dereference_absent(input: &RequestInput) -> &str {
    match input.profile {
        Some(ref profile) => &profile.display_name,
        None => panic!("cannot read field `display_name` of absent `profile`"),
    }
}

/// Throw an error synchronously
///
/// # Panics
///
/// Always, with an [`ErrorValue`] payload that the panic capture layer
/// re-signals unchanged.
pub fn throw_direct() -> ! {
    std::panic::panic_any(ErrorValue::new("direct throw"))
}

/// Construct an error and hand it back as a plain value
///
/// Nothing is signaled, so callers carry on down the success path.
pub fn return_direct() -> ErrorValue {
    ErrorValue::new("direct return").with_detail("constructed but never signaled")
}

/// A deferred computation that rejects
pub async fn rejected_promise() -> Result<Record, ErrorValue> {
    tokio::time::sleep(DEFERRAL).await;

    Err(ErrorValue::new("Promise Failed")
        .with_status(StatusCode::SERVICE_UNAVAILABLE)
        .with_category(ErrorCategory::Upstream)
        .with_detail("inventory lookup rejected"))
}

/// Consume [`rejected_promise`] and re-raise its rejection unchanged
pub async fn nested_promise_rethrow() -> Result<Record, ErrorValue> {
    rejected_promise()
        .await
        .inspect_err(|_| tracing::trace!("re-raising nested rejection"))
}

/// Consume [`rejected_promise`] and resolve with its rejection as a value
///
/// The error is absorbed here and never reaches the responder.
pub async fn nested_promise_swallow() -> Option<ErrorValue> {
    rejected_promise().await.err()
}

/// Synchronous validation that rejects its input
pub fn validate_expected() -> Result<(), ErrorValue> {
    Err(ErrorValue::new("expected error")
        .with_status(StatusCode::BAD_REQUEST)
        .with_category(ErrorCategory::Validation))
}

/// Middleware stage that signals an error instead of running the next stage
#[allow(clippy::needless_pass_by_value)]
pub async fn reject_in_middleware(request: Request, _next: Next) -> Result<Response, ErrorValue> {
    Err(ErrorValue::new("error in middleware")
        .with_status(StatusCode::UNAUTHORIZED)
        .with_category(ErrorCategory::MiddlewareRejected)
        .with_detail(format!("{} {} stopped before the handler", request.method(), request.uri().path())))
}

/// An async function whose inner await rejects
///
/// The inner rejection becomes this function's own rejection through `?`.
pub async fn async_await_failure() -> Result<Record, ErrorValue> {
    let record = fetch_remote_record().await?;
    tracing::debug!(id = record.id, "remote record fetched");
    Ok(record)
}

async fn fetch_remote_record() -> Result<Record, ErrorValue> {
    tokio::time::sleep(DEFERRAL).await;

    Err(ErrorValue::new("async await error")
        .with_status(StatusCode::SERVICE_UNAVAILABLE)
        .with_category(ErrorCategory::Upstream))
}

/// Read a record and report the outcome through an error-first callback
///
/// The callback runs once, on a spawned task, after the call has returned.
pub fn read_with_callback<F>(callback: F)
where
    F: FnOnce(Result<Record, ErrorValue>) + Send + 'static,
{
    tokio::spawn(async move {
        tokio::time::sleep(DEFERRAL).await;

        callback(Err(ErrorValue::new("callback error")
            .with_status(StatusCode::SERVICE_UNAVAILABLE)
            .with_category(ErrorCategory::Upstream)));
    });
}
