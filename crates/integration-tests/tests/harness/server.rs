//! Test server wrapper that starts Faultline on a random port

use std::net::SocketAddr;
use std::sync::Arc;

use faultline_config::Config;
use faultline_server::Server;
use tokio_util::sync::CancellationToken;

use super::sink::RecordingSink;

/// A running test server instance
pub struct TestServer {
    addr: SocketAddr,
    shutdown: CancellationToken,
    client: reqwest::Client,
    sink: Arc<RecordingSink>,
}

impl TestServer {
    /// Start a test server with the given configuration
    ///
    /// Binds to port 0 for automatic port assignment. Diagnostics go to a
    /// recording sink readable through [`TestServer::sink`].
    pub async fn start(config: Config) -> anyhow::Result<Self> {
        let sink = Arc::new(RecordingSink::default());
        let server = Server::with_sink(&config, sink.clone());
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        tokio::spawn(async move {
            axum::serve(listener, server.into_router())
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self {
            addr,
            shutdown,
            client: reqwest::Client::new(),
            sink,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    pub fn sink(&self) -> &RecordingSink {
        &self.sink
    }

    /// GET a path and return the status with the parsed JSON body
    pub async fn get_json(&self, path: &str) -> (u16, serde_json::Value) {
        let resp = self.client.get(self.url(path)).send().await.unwrap();
        let status = resp.status().as_u16();
        let body = resp.json().await.unwrap();
        (status, body)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
