//! The RFC 3659 Modification Time (`MDTM`) command
//
// Tells when a file in the server NVFS was last modified, as a
// YYYYMMDDhhmmss timestamp in UTC.

use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::{Reply, ReplyCode};
use crate::storage::{Error as StorageError, ErrorKind};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};

#[derive(Debug)]
pub(crate) struct Mdtm {
    path: Bytes,
}

impl Mdtm {
    pub fn new(path: Bytes) -> Self {
        Mdtm { path }
    }
}

#[async_trait]
impl CommandHandler for Mdtm {
    async fn handle(&self, args: CommandContext<'_>) -> Result<Reply, ControlChanError> {
        let session = args.session;
        let path = session.charset.decode(&self.path);
        let target = match session.storage.resolve(&session.cwd, &path) {
            Ok(target) => target,
            Err(err) => return Ok(err.into()),
        };
        let metadata = match session.storage.metadata(&target).await {
            Ok(metadata) => metadata,
            Err(err) => return Ok(err.into()),
        };
        if metadata.is_dir() {
            return Ok(StorageError::from(ErrorKind::NotAFile).into());
        }
        match metadata.modified() {
            Ok(modified) => Ok(Reply::new_with_string(
                ReplyCode::FileStatus,
                DateTime::<Utc>::from(modified).format("%Y%m%d%H%M%S").to_string(),
            )),
            Err(_) => Ok(Reply::new(ReplyCode::FileError, "Cannot get file information")),
        }
    }
}
