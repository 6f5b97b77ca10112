//! The RFC 3659 File Size (`SIZE`) command

use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::{Reply, ReplyCode};
use crate::storage::{Error as StorageError, ErrorKind};

use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug)]
pub(crate) struct Size {
    path: Bytes,
}

impl Size {
    pub fn new(path: Bytes) -> Self {
        Size { path }
    }
}

#[async_trait]
impl CommandHandler for Size {
    async fn handle(&self, args: CommandContext<'_>) -> Result<Reply, ControlChanError> {
        let session = args.session;
        let path = session.charset.decode(&self.path);
        let target = match session.storage.resolve(&session.cwd, &path) {
            Ok(target) => target,
            Err(err) => return Ok(err.into()),
        };
        match session.storage.metadata(&target).await {
            Ok(metadata) if metadata.is_dir() => Ok(StorageError::from(ErrorKind::NotAFile).into()),
            Ok(metadata) => Ok(Reply::new_with_string(ReplyCode::FileStatus, metadata.len().to_string())),
            Err(err) => Ok(err.into()),
        }
    }
}
