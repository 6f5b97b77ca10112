//! Contains the error type of the control channel.

use super::parse_error::ParseError;

use thiserror::Error;

/// The errors a control channel can run into. Parse failures turn into
/// error replies and the session survives; everything else ends it.
#[derive(Debug, Error)]
pub(crate) enum ControlChanError {
    /// We encountered a system IO error.
    #[error("failed to perform IO: {0}")]
    Io(#[from] std::io::Error),
    /// Something went wrong parsing the client's command.
    #[error("failed to parse command: {0}")]
    Parse(#[from] ParseError),
    /// The client sent a command line longer than we are willing to read.
    #[error("command line too long")]
    CommandLineTooLong,
    /// The timer on the control channel elapsed.
    #[error("read timeout on the control channel")]
    ControlChannelTimeout,
}
