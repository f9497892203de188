//! Client configuration from command-line flags and environment variables.

use clap::Parser;
use reqwest::Url;

/// History store collection used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api/history";

/// Runtime configuration for `calc_cli`.
#[derive(Debug, Clone, Parser)]
#[command(name = "calc_cli", version, about = "Terminal calculator with stored history")]
pub struct ClientConfig {
    /// History collection endpoint of the store service.
    #[arg(long, env = "CALC_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: Url,

    /// trace|debug|info|warn|error; defaults by build mode.
    #[arg(long, env = "CALC_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rotating log files; stderr when unset.
    #[arg(long, env = "CALC_LOG_DIR")]
    pub log_dir: Option<String>,
}

impl ClientConfig {
    pub fn log_level(&self) -> &str {
        self.log_level
            .as_deref()
            .unwrap_or(calc_core::default_log_level())
    }
}

#[cfg(test)]
mod tests {
    use super::{ClientConfig, DEFAULT_API_URL};
    use clap::Parser;

    #[test]
    fn api_url_flag_overrides_default() {
        let config = ClientConfig::try_parse_from([
            "calc_cli",
            "--api-url",
            "http://10.0.0.5:8080/api/history",
            "--log-level",
            "error",
        ])
        .unwrap();
        assert_eq!(config.api_url.as_str(), "http://10.0.0.5:8080/api/history");
        assert_eq!(config.log_level(), "error");
        assert_ne!(config.api_url.as_str(), DEFAULT_API_URL);
    }

    #[test]
    fn log_level_defaults_by_build_mode() {
        let config = ClientConfig {
            log_level: None,
            ..ClientConfig::try_parse_from(["calc_cli"]).unwrap()
        };
        assert_eq!(config.log_level(), calc_core::default_log_level());
    }

    #[test]
    fn malformed_api_url_is_rejected() {
        let result = ClientConfig::try_parse_from(["calc_cli", "--api-url", "not a url"]);
        assert!(result.is_err());
    }
}
