//! Terminal client for the calculator.
//!
//! # Responsibility
//! - Turn typed lines into calculator key presses and history commands.
//! - Talk to the history store service over HTTP, degrading to local history
//!   when it is unreachable.

pub mod command;
pub mod config;
pub mod remote;
pub mod render;
pub mod session;

pub use command::{Command, CommandError};
pub use config::{ClientConfig, DEFAULT_API_URL};
pub use remote::HttpHistoryRemote;
pub use session::{Session, Step};
