//! Route handlers, one per propagation mechanism
//!
//! Failures leave a handler as `Err(ErrorValue)` or as a panic. Either way
//! they end at the responder; nothing here renders an error body.

use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use faultline_core::ErrorValue;
use http::{StatusCode, Uri};
use serde::Serialize;
use tokio::sync::oneshot;

use crate::taxonomy::{self, RequestInput};

/// Body of every successful response
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Outcome {
    status: &'static str,
}

impl Outcome {
    pub const SUCCESS: Self = Self { status: "success" };
}

type HandlerResult = Result<Json<Outcome>, ErrorValue>;

/// Routes under `/error`
pub fn error_router() -> Router {
    Router::new()
        .route("/error", get(runtime_fault))
        .route("/error/throw", get(direct_throw))
        .route("/error/return", get(direct_return))
        .route("/error/promise", get(promise))
        .route("/error/nested-promise/return", get(nested_promise_return))
        .route("/error/nested-promise/throw", get(nested_promise_throw))
        .route("/error/expected", get(expected))
        .route(
            "/error/middleware",
            get(after_middleware).route_layer(axum::middleware::from_fn(taxonomy::reject_in_middleware)),
        )
        .route("/error/async-await", get(async_await))
        .route("/error/callback", get(callback))
}

/// Health check handler
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// Fallback for anything no route matches
pub async fn not_found() -> ErrorValue {
    ErrorValue::not_found()
}

async fn runtime_fault(uri: Uri) -> Json<Outcome> {
    let input = RequestInput::from_uri(&uri);
    let display_name = taxonomy::dereference_absent(&input);
    tracing::debug!(display_name, "profile read");
    Json(Outcome::SUCCESS)
}

async fn direct_throw() -> Json<Outcome> {
    taxonomy::throw_direct()
}

async fn direct_return() -> Json<Outcome> {
    let _unsignaled = taxonomy::return_direct();
    Json(Outcome::SUCCESS)
}

async fn promise() -> HandlerResult {
    let record = taxonomy::rejected_promise().await?;
    tracing::debug!(id = record.id, "record resolved");
    Ok(Json(Outcome::SUCCESS))
}

async fn nested_promise_return() -> Json<Outcome> {
    if taxonomy::nested_promise_swallow().await.is_some() {
        tracing::trace!("nested rejection absorbed");
    }
    Json(Outcome::SUCCESS)
}

async fn nested_promise_throw() -> HandlerResult {
    let record = taxonomy::nested_promise_rethrow().await?;
    tracing::debug!(id = record.id, "record resolved");
    Ok(Json(Outcome::SUCCESS))
}

async fn expected() -> HandlerResult {
    // A failed check stops here and the responder owns the response
    taxonomy::validate_expected()?;

    Ok(Json(Outcome::SUCCESS))
}

/// Terminal stage of `/error/middleware`, unreachable past the rejecting stage
async fn after_middleware() -> Json<Outcome> {
    Json(Outcome::SUCCESS)
}

async fn async_await() -> HandlerResult {
    let record = taxonomy::async_await_failure().await?;
    tracing::debug!(id = record.id, label = %record.label, "record loaded");
    Ok(Json(Outcome::SUCCESS))
}

async fn callback() -> HandlerResult {
    let (tx, rx) = oneshot::channel();

    taxonomy::read_with_callback(move |result| {
        tx.send(result).ok();
    });

    match rx.await {
        Ok(Ok(record)) => {
            tracing::debug!(id = record.id, "callback delivered record");
            Ok(Json(Outcome::SUCCESS))
        }
        Ok(Err(error)) => Err(error),
        Err(_) => Err(ErrorValue::new("completion callback was dropped without being invoked")),
    }
}
