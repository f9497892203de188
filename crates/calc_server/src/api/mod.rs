//! REST surface of the history store.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;
