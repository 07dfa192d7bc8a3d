use std::path::Path;

use anyhow::Context;

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;

        Self::from_toml(&raw)
    }

    /// Parse and validate configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing, or validation fails
    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        let expanded = crate::env::expand_env(raw).context("config variable expansion failed")?;

        let config: Self = toml::from_str(&expanded).context("failed to parse config")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if the health path is malformed or shadows the
    /// error routes, or if the log filter is not a valid directive
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_health()?;
        self.validate_telemetry()?;
        Ok(())
    }

    fn validate_health(&self) -> anyhow::Result<()> {
        let health = &self.server.health;
        if !health.enabled {
            return Ok(());
        }

        if !health.path.starts_with('/') {
            anyhow::bail!("server.health.path must start with '/': `{}`", health.path);
        }

        if health.path == "/error" || health.path.starts_with("/error/") {
            anyhow::bail!("server.health.path must not be under /error: `{}`", health.path);
        }

        Ok(())
    }

    fn validate_telemetry(&self) -> anyhow::Result<()> {
        let Some(ref telemetry) = self.telemetry else {
            return Ok(());
        };

        tracing_subscriber::EnvFilter::try_new(&telemetry.log_filter)
            .with_context(|| format!("invalid telemetry.log_filter `{}`", telemetry.log_filter))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use crate::{Config, ExportProtocol, LogFormat, Mode};

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::from_toml("").unwrap();

        assert_eq!(config.mode, Mode::Development);
        assert!(config.server.listen_address.is_none());
        assert!(config.server.health.enabled);
        assert_eq!(config.server.health.path, "/health");
        assert!(config.telemetry.is_none());
    }

    #[test]
    fn full_config_parses() {
        let raw = r#"
mode = "test"

[server]
listen_address = "127.0.0.1:4000"

[server.health]
path = "/livez"

[telemetry]
service_name = "faultline-demo"
log_filter = "faultline_server=debug,info"
log_format = "json"

[telemetry.exporter]
endpoint = "http://localhost:4318"
protocol = "http_proto"
"#;

        let config = Config::from_toml(raw).unwrap();
        assert_eq!(config.mode, Mode::Test);
        assert_eq!(config.server.listen_address.unwrap().port(), 4000);
        assert_eq!(config.server.health.path, "/livez");

        let telemetry = config.telemetry.unwrap();
        assert_eq!(telemetry.service_name, "faultline-demo");
        assert_eq!(telemetry.log_format, LogFormat::Json);
        assert_eq!(telemetry.exporter.unwrap().protocol, ExportProtocol::HttpProto);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = Config::from_toml("[server]\nport = 3000\n").unwrap_err();
        assert!(format!("{err:#}").contains("unknown field"));
    }

    #[test]
    fn health_path_must_be_absolute() {
        let err = Config::from_toml("[server.health]\npath = \"health\"\n").unwrap_err();
        assert!(err.to_string().contains("must start with '/'"));
    }

    #[test]
    fn health_path_cannot_shadow_error_routes() {
        let err = Config::from_toml("[server.health]\npath = \"/error/health\"\n").unwrap_err();
        assert!(err.to_string().contains("must not be under /error"));
    }

    #[test]
    fn disabled_health_skips_path_checks() {
        let config = Config::from_toml("[server.health]\nenabled = false\npath = \"health\"\n").unwrap();
        assert!(!config.server.health.enabled);
    }

    #[test]
    fn invalid_log_filter_is_rejected() {
        let err = Config::from_toml("[telemetry]\nlog_filter = \"faultline=verbose\"\n").unwrap_err();
        assert!(err.to_string().contains("invalid telemetry.log_filter"));
    }

    #[test]
    fn mode_can_come_from_environment() {
        temp_env::with_var("FAULTLINE_MODE_UNDER_TEST", Some("production"), || {
            let config = Config::from_toml("mode = \"{{ env.FAULTLINE_MODE_UNDER_TEST }}\"").unwrap();
            assert_eq!(config.mode, Mode::Production);
        });
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "mode = \"test\"").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.mode, Mode::Test);
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }
}
