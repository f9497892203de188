//! Client-side history synchronization with the remote history store.

pub mod remote;
pub mod synchronizer;
