//! HTTP history store service for the calculator.
//!
//! # Responsibility
//! - Expose `calc_core` history use-cases as JSON endpoints under `/api/history`.
//! - Own the process-wide store connection for the server lifetime.

pub mod api;
pub mod config;
pub mod server;
pub mod state;

pub use api::routes::{router, HISTORY_PATH};
pub use config::ServerConfig;
pub use server::{serve, serve_listener, ServerError};
pub use state::AppState;
