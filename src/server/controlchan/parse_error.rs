use thiserror::Error;

/// Something went wrong parsing a command line.
#[derive(Debug, PartialEq, Eq, Clone, Error)]
pub(crate) enum ParseError {
    /// The client issued a command that we know about, but in an invalid
    /// way (e.g. `REST` without an offset).
    #[error("invalid command (invalid parameter)")]
    InvalidCommand,
    /// A control character showed up inside a command line.
    #[error("invalid token in command: {token:#x}")]
    InvalidToken {
        /// The offending byte.
        token: u8,
    },
    /// The verb was not valid UTF-8.
    #[error("non-UTF8 character in command verb")]
    InvalidUtf8,
    /// The line did not end in CRLF or LF.
    #[error("invalid end-of-line")]
    InvalidEol,
}

pub(crate) type Result<T> = std::result::Result<T, ParseError>;
