//! Per-connection session state.

use crate::server::charset::WireCharset;
use crate::server::datachan::DataEndpoint;
use crate::storage::Filesystem;

use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Where the session is in the login handshake.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub(crate) enum SessionState {
    /// Fresh connection, no USER seen yet.
    New,
    /// USER was given, waiting for PASS.
    WaitPass,
    /// Logged in, commands are accepted.
    WaitCmd,
}

/// The single credential the server authenticates against. An empty
/// password accepts any password.
#[derive(Debug, Clone)]
pub(crate) struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub(crate) enum TransferType {
    Ascii,
    Binary,
}

impl fmt::Display for TransferType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TransferType::Ascii => write!(f, "ASCII"),
            TransferType::Binary => write!(f, "BINARY"),
        }
    }
}

// File types that break when a misconfigured client transfers them in
// ASCII mode. Matching transfers run binary no matter the session type.
const BINARY_EXTENSIONS: &[&str] = &[
    "xlsx", "xls", "doc", "docx", "pdf", "zip", "rar", "7z", "exe", "dll", "jpg", "jpeg", "png", "gif", "bmp", "mp3", "mp4", "avi", "mov",
];

fn has_binary_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| BINARY_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// State for one FTP session. The control loop owns it exclusively; there
/// is no sharing between sessions.
#[derive(Debug)]
pub(crate) struct Session {
    pub storage: Arc<Filesystem>,
    /// Remote address of the control connection.
    pub peer: SocketAddr,
    /// Local address of the control connection, used for passive-mode
    /// host advertisement.
    pub local_addr: SocketAddr,
    pub credentials: Credentials,
    /// Bound on data-connection dialing, accepting and streaming.
    pub timeout: Duration,
    pub state: SessionState,
    /// The name given by USER. Kept across a failed PASS so STAT can show
    /// who tried to log in.
    pub username: Option<String>,
    /// Current working directory as an absolute host path, always at or
    /// below the storage root.
    pub cwd: PathBuf,
    pub transfer_type: TransferType,
    /// The pending data endpoint; at most one lives at a time.
    pub data: Option<DataEndpoint>,
    /// Source path stored by RNFR for the immediately following RNTO.
    pub rename_from: Option<PathBuf>,
    /// Restart offset from REST, consumed by the next STOR or RETR.
    pub start_pos: u64,
    pub charset: WireCharset,
}

impl Session {
    pub fn new(storage: Arc<Filesystem>, peer: SocketAddr, local_addr: SocketAddr, credentials: Credentials, timeout: Duration) -> Self {
        let cwd = storage.root().to_path_buf();
        Session {
            storage,
            peer,
            local_addr,
            credentials,
            timeout,
            state: SessionState::New,
            username: None,
            cwd,
            transfer_type: TransferType::Binary,
            data: None,
            rename_from: None,
            start_pos: 0,
            charset: WireCharset::Gbk,
        }
    }

    /// The working directory as the client sees it: relative to the root,
    /// forward slashes, `/` for the root itself.
    pub fn virtual_cwd(&self) -> String {
        let rel = self.cwd.strip_prefix(self.storage.root()).unwrap_or_else(|_| Path::new(""));
        format!("/{}", rel.to_string_lossy().replace('\\', "/"))
    }

    /// The transfer type to use for one file, honoring the binary
    /// extension override without touching the session type.
    pub fn transfer_type_for(&self, path: &Path) -> TransferType {
        if has_binary_extension(path) {
            TransferType::Binary
        } else {
            self.transfer_type
        }
    }
}
