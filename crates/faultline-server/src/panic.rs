use std::any::Any;
use std::cell::Cell;
use std::sync::Once;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use faultline_core::ErrorValue;

thread_local! {
    static CAPTURING: Cell<bool> = const { Cell::new(false) };
}

static QUIET_HOOK: Once = Once::new();

/// Install a panic hook that stays silent for panics the server captures
///
/// Captured panics are reported by the responder, so the default hook would
/// write a second diagnostic for the same failure. Panics anywhere else go
/// to the previously installed hook.
pub fn install_quiet_hook() {
    QUIET_HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            if !in_capture_scope() {
                previous(info);
            }
        }));
    });
}

/// Whether the current thread is polling a request inside the capture layer
pub fn in_capture_scope() -> bool {
    CAPTURING.with(Cell::get)
}

/// Resets the capture flag on drop, including during unwinding
struct CaptureScope {
    outer: bool,
}

impl CaptureScope {
    fn enter() -> Self {
        Self {
            outer: CAPTURING.with(|flag| flag.replace(true)),
        }
    }
}

impl Drop for CaptureScope {
    fn drop(&mut self) {
        CAPTURING.with(|flag| flag.set(self.outer));
    }
}

/// Middleware marking every poll of the inner stack as captured
///
/// Must sit inside the panic capture layer.
pub async fn capture_scope(request: Request, next: Next) -> Response {
    let mut inner = std::pin::pin!(next.run(request));

    std::future::poll_fn(|cx| {
        let _scope = CaptureScope::enter();
        inner.as_mut().poll(cx)
    })
    .await
}

/// Turn a captured panic into a signaled error
///
/// A panic carrying an [`ErrorValue`] is a thrown error and is re-signaled
/// unchanged. Any other payload is a runtime fault.
pub fn signal_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let error = match payload.downcast::<ErrorValue>() {
        Ok(thrown) => *thrown,
        Err(payload) => ErrorValue::runtime_fault(panic_text(payload.as_ref())),
    };

    error.into_response()
}

fn panic_text(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_owned()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "panic with a non-text payload".to_owned()
    }
}
