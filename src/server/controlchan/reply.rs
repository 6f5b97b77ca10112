use crate::storage;

/// A reply to the FTP client
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Reply {
    None,
    CodeAndMsg { code: ReplyCode, msg: String },
    MultiLine { code: ReplyCode, lines: Vec<String> },
}

/// The reply codes according to RFC 959. Clients only promise to look at
/// the first digit: 1xx marks, 2xx/3xx acceptance, 4xx/5xx rejection.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(u32)]
pub(crate) enum ReplyCode {
    FileStatusOkay = 150,

    CommandOkay = 200,
    SystemStatus = 211,
    FileStatus = 213,
    SystemType = 215,
    ServiceReady = 220,
    ClosingControlConnection = 221,
    ClosingDataConnection = 226,
    EnteringPassiveMode = 227,
    EnteringExtendedPassiveMode = 229,
    UserLoggedIn = 230,
    FileActionOkay = 250,
    DirCreated = 257,

    NeedPassword = 331,
    FileActionPending = 350,

    ServiceNotAvailable = 421,
    CantOpenDataConnection = 425,
    ConnectionClosed = 426,
    LocalError = 451,

    CommandSyntaxError = 500,
    ParameterSyntaxError = 501,
    BadCommandSequence = 503,
    CommandNotImplementedForParameter = 504,
    ProtocolNotSupported = 522,
    NotLoggedIn = 530,
    FileError = 550,
}

impl Reply {
    pub fn new(code: ReplyCode, message: &str) -> Self {
        Reply::CodeAndMsg {
            code,
            msg: message.to_string(),
        }
    }

    pub fn new_with_string(code: ReplyCode, msg: String) -> Self {
        Reply::CodeAndMsg { code, msg }
    }

    pub fn new_multiline<I>(code: ReplyCode, lines: I) -> Self
    where
        I: IntoIterator,
        I::Item: std::fmt::Display,
    {
        Reply::MultiLine {
            code,
            lines: lines.into_iter().map(|item| format!("{}", item)).collect(),
        }
    }

    // A no-reply
    pub fn none() -> Self {
        Reply::None
    }
}

impl From<storage::Error> for Reply {
    fn from(err: storage::Error) -> Reply {
        match err.kind() {
            storage::ErrorKind::AccessDenied => Reply::new(ReplyCode::FileError, "Access denied"),
            storage::ErrorKind::NotFound => Reply::new(ReplyCode::FileError, "File not found"),
            storage::ErrorKind::PermissionDenied => Reply::new(ReplyCode::FileError, "Permission denied"),
            storage::ErrorKind::NotAFile => Reply::new(ReplyCode::FileError, "Not a file"),
            storage::ErrorKind::DirectoryNotEmpty => Reply::new(ReplyCode::FileError, "Directory not empty"),
            storage::ErrorKind::LocalError => Reply::new(ReplyCode::LocalError, "Local error"),
        }
    }
}
