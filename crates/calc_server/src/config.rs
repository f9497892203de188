//! Server configuration from command-line flags and environment variables.

use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Runtime configuration for `calc_server`.
///
/// Every flag falls back to an environment variable, then to a default.
#[derive(Debug, Clone, Parser)]
#[command(name = "calc_server", version, about = "Calculator history store service")]
pub struct ServerConfig {
    /// Interface to listen on.
    #[arg(long, env = "CALC_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// TCP port to listen on.
    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// SQLite file holding the calculation history; created when missing.
    #[arg(long, env = "CALC_DB_PATH", default_value = "calculator_db.sqlite3")]
    pub db_path: PathBuf,

    /// trace|debug|info|warn|error; defaults by build mode.
    #[arg(long, env = "CALC_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rotating log files; stderr when unset.
    #[arg(long, env = "CALC_LOG_DIR")]
    pub log_dir: Option<String>,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn log_level(&self) -> &str {
        self.log_level
            .as_deref()
            .unwrap_or(calc_core::default_log_level())
    }
}
