//! Server lifecycle: open the store, bind, serve until shutdown.
//!
//! # Invariants
//! - The store connection is opened (and migrated) before the socket is bound.
//! - The connection is dropped only after the server loop has stopped.

use crate::api::routes::router;
use crate::config::ServerConfig;
use crate::state::AppState;
use calc_core::db::{open_db, DbError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::future::Future;
use tokio::net::TcpListener;

/// Fatal startup or serve-loop failure.
#[derive(Debug)]
pub enum ServerError {
    Db(DbError),
    Io(std::io::Error),
}

impl Display for ServerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "history store unavailable: {err}"),
            Self::Io(err) => write!(f, "http server error: {err}"),
        }
    }
}

impl Error for ServerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<DbError> for ServerError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<std::io::Error> for ServerError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Opens the configured store and serves until `shutdown` resolves.
pub async fn serve(
    config: &ServerConfig,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), ServerError> {
    let conn = open_db(&config.db_path)?;
    info!(
        "event=store_connected module=server status=ok db_path={}",
        config.db_path.display()
    );

    let listener = TcpListener::bind(config.bind_addr()).await?;
    serve_listener(listener, AppState::new(conn), shutdown).await
}

/// Serves the history API on an already bound listener.
pub async fn serve_listener(
    listener: TcpListener,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), ServerError> {
    let addr = listener.local_addr()?;
    info!(
        "event=server_start module=server status=ok addr=http://{addr} version={}",
        env!("CARGO_PKG_VERSION")
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("event=server_stop module=server status=ok addr={addr}");
    Ok(())
}
