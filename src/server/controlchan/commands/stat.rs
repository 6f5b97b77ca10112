//! The RFC 959 Status (`STAT`) command
//
// Without an argument it reports the session over the control connection;
// with one it reports a single file or directory, like a one-entry LIST
// that needs no data connection.

use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::{Reply, ReplyCode};
use crate::storage::Fileinfo;

use async_trait::async_trait;
use bytes::Bytes;
use std::path::Path;

#[derive(Debug)]
pub(crate) struct Stat {
    path: Option<Bytes>,
}

impl Stat {
    pub fn new(path: Option<Bytes>) -> Self {
        Stat { path }
    }
}

#[async_trait]
impl CommandHandler for Stat {
    async fn handle(&self, args: CommandContext<'_>) -> Result<Reply, ControlChanError> {
        let session = args.session;
        let path = match &self.path {
            None => {
                let lines = vec![
                    "FTP Server Status:".to_string(),
                    format!(" Connected from: {}", session.peer),
                    format!(" Logged in as: {}", session.username.as_deref().unwrap_or("")),
                    format!(" Type: {}", session.transfer_type),
                    format!(" Working Directory: {}", session.virtual_cwd()),
                    "End of status".to_string(),
                ];
                return Ok(Reply::new_multiline(ReplyCode::SystemStatus, lines));
            }
            Some(path) => session.charset.decode(path),
        };

        let target = match session.storage.resolve(&session.cwd, &path) {
            Ok(target) => target,
            Err(err) => return Ok(err.into()),
        };
        let metadata = match session.storage.metadata(&target).await {
            Ok(metadata) => metadata,
            Err(_) => return Ok(Reply::new(ReplyCode::FileError, "File not found")),
        };
        let name = target
            .file_name()
            .unwrap_or_else(|| Path::new("/").as_os_str())
            .to_string_lossy()
            .into_owned();
        let entry = Fileinfo { name, metadata };
        let lines = vec!["Status follows:".to_string(), format!("{}", entry), "End of status".to_string()];
        Ok(Reply::new_multiline(ReplyCode::FileStatus, lines))
    }
}
