//! Contains the error type returned by the [`Server`](crate::Server)
//! lifecycle methods.

use thiserror::Error;

/// Error returned by [`Server::start`](crate::Server::start) and
/// [`Server::stop`](crate::Server::stop).
#[derive(Error, Debug)]
pub enum ServerError {
    /// `start` was called while the server was already running.
    #[error("server is already running")]
    AlreadyRunning,
    /// Binding the listen port or setting up the runtime failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
