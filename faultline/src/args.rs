use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use faultline_config::Mode;

/// Faultline error propagation demo server
#[derive(Debug, Parser)]
#[command(name = "faultline", about = "Routes that show how errors reach a central responder")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "faultline.toml", env = "FAULTLINE_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "FAULTLINE_LISTEN")]
    pub listen: Option<SocketAddr>,

    /// Override the process mode (test, development, production)
    #[arg(long, env = "FAULTLINE_MODE")]
    pub mode: Option<Mode>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_parse() {
        let args = Args::try_parse_from(["faultline", "--mode", "test", "--listen", "127.0.0.1:8080"]).unwrap();

        assert_eq!(args.mode, Some(Mode::Test));
        assert_eq!(args.listen.unwrap().port(), 8080);
    }

    #[test]
    fn rejects_unknown_mode() {
        assert!(Args::try_parse_from(["faultline", "--mode", "staging"]).is_err());
    }
}
