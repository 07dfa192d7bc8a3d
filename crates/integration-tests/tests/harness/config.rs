//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;

use faultline_config::{Config, HealthConfig, Mode, ServerConfig};

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Minimal config in test mode on an ephemeral port
    pub fn new() -> Self {
        Self {
            config: Config {
                mode: Mode::Test,
                server: ServerConfig {
                    listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                    health: HealthConfig::default(),
                },
                telemetry: None,
            },
        }
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.config.mode = mode;
        self
    }

    pub fn with_health_path(mut self, path: &str) -> Self {
        self.config.server.health.path = path.to_owned();
        self
    }

    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
