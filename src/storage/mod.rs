//! Sandboxed access to the directory served over FTP.

pub(crate) mod filesystem;

pub(crate) use filesystem::Filesystem;

use chrono::{DateTime, Local};
use derive_more::Display;
use std::fmt;
use thiserror::Error;

/// The error returned by filesystem operations.
#[derive(Debug, Error)]
#[error("storage error: {kind}")]
pub(crate) struct Error {
    kind: ErrorKind,
    #[source]
    source: Option<std::io::Error>,
}

impl Error {
    pub fn new(kind: ErrorKind, source: std::io::Error) -> Error {
        Error { kind, source: Some(source) }
    }

    /// Tells the control channel what kind of failure this was so it can
    /// pick the reply code.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error { kind, source: None }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
            _ => ErrorKind::LocalError,
        };
        Error::new(kind, err)
    }
}

/// The failure categories produced by [`Filesystem`] operations.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Display)]
pub(crate) enum ErrorKind {
    /// The requested path resolves outside of the served root.
    #[display(fmt = "access denied")]
    AccessDenied,
    /// The requested path does not exist.
    #[display(fmt = "not found")]
    NotFound,
    /// The host filesystem refused the operation.
    #[display(fmt = "permission denied")]
    PermissionDenied,
    /// A regular file was expected but the path is something else.
    #[display(fmt = "not a regular file")]
    NotAFile,
    /// RMD on a directory that still has entries.
    #[display(fmt = "directory not empty")]
    DirectoryNotEmpty,
    /// Some other local I/O failure.
    #[display(fmt = "local error")]
    LocalError,
}

pub(crate) type Result<T> = std::result::Result<T, Error>;

/// A directory entry paired with its metadata.
///
/// The `Display` implementation renders the Unix `ls -l`-like line that
/// LIST and STAT emit.
#[derive(Debug)]
pub(crate) struct Fileinfo {
    pub name: String,
    pub metadata: std::fs::Metadata,
}

impl fmt::Display for Fileinfo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let modified: String = self
            .metadata
            .modified()
            .map(|t| DateTime::<Local>::from(t).format("%b %e %H:%M").to_string())
            .unwrap_or_else(|_| "-".to_string());
        write!(f, "{} {:8} {} {}", mode_string(&self.metadata), self.metadata.len(), modified, self.name)
    }
}

#[cfg(unix)]
fn mode_string(metadata: &std::fs::Metadata) -> String {
    use std::os::unix::fs::PermissionsExt;

    let mode = metadata.permissions().mode();
    let mut out = String::with_capacity(10);
    out.push(if metadata.is_dir() {
        'd'
    } else if metadata.file_type().is_symlink() {
        'l'
    } else {
        '-'
    });
    for shift in [6u32, 3, 0] {
        let bits = (mode >> shift) & 0o7;
        out.push(if bits & 0o4 != 0 { 'r' } else { '-' });
        out.push(if bits & 0o2 != 0 { 'w' } else { '-' });
        out.push(if bits & 0o1 != 0 { 'x' } else { '-' });
    }
    out
}

#[cfg(not(unix))]
fn mode_string(metadata: &std::fs::Metadata) -> String {
    if metadata.is_dir() {
        "drwxr-xr-x".to_string()
    } else {
        "-rw-r--r--".to_string()
    }
}
