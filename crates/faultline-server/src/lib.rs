#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod panic;
pub mod responder;
mod routes;
pub mod taxonomy;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use faultline_config::Config;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

pub use responder::{DiagnosticSink, Responder, TracingSink};

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

impl Server {
    /// Build the server from configuration, writing diagnostics to `tracing`
    pub fn new(config: &Config) -> Self {
        Self::with_sink(config, Arc::new(TracingSink))
    }

    /// Build the server with a custom diagnostic sink
    pub fn with_sink(config: &Config, sink: Arc<dyn DiagnosticSink>) -> Self {
        let listen_address = config
            .server
            .listen_address
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

        let responder = Responder::new(config.mode, sink);

        // The responder is the only writer of error diagnostics
        panic::install_quiet_hook();

        let mut app = routes::error_router();

        if config.server.health.enabled {
            app = app.route(&config.server.health.path, axum::routing::get(routes::health));
        }

        // Unknown paths and unknown methods on known paths both end as 404
        app = app
            .fallback(routes::not_found)
            .method_not_allowed_fallback(routes::not_found);

        // Apply middleware layers (innermost first)

        // Panics raised past this point are captured, not reported by the hook
        app = app.layer(axum::middleware::from_fn(panic::capture_scope));

        // Panics become signaled errors before the responder sees the response
        app = app.layer(CatchPanicLayer::custom(panic::signal_panic));

        // Central error responder
        app = app.layer(axum::middleware::from_fn_with_state(
            responder,
            responder::respond_to_errors,
        ));

        // Tracing, without failure events: failed requests are the responder's to report
        app = app.layer(TraceLayer::new_for_http().on_failure(()));

        tracing::debug!(mode = %config.mode, %listen_address, "server assembled");

        Self {
            router: app,
            listen_address,
        }
    }

    /// Get the configured listen address
    #[must_use]
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Consume the server and return the inner router
    ///
    /// Useful for testing when the caller manages the listener
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Start serving requests
    ///
    /// Blocks until the cancellation token is triggered.
    ///
    /// # Errors
    ///
    /// Returns an error if binding the TCP listener or serving fails
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("graceful shutdown initiated");
            })
            .await?;

        Ok(())
    }
}
