//! The RFC 959 Remove Directory (`RMD`) command

use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::{Reply, ReplyCode};
use crate::storage::ErrorKind;

use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug)]
pub(crate) struct Rmd {
    path: Bytes,
}

impl Rmd {
    pub fn new(path: Bytes) -> Self {
        Rmd { path }
    }
}

#[async_trait]
impl CommandHandler for Rmd {
    async fn handle(&self, args: CommandContext<'_>) -> Result<Reply, ControlChanError> {
        let session = args.session;
        let path = session.charset.decode(&self.path);
        let target = match session.storage.resolve(&session.cwd, &path) {
            Ok(target) => target,
            Err(err) => return Ok(err.into()),
        };
        match session.storage.rmd(&target).await {
            Ok(()) => Ok(Reply::new(ReplyCode::FileActionOkay, "Directory removed")),
            Err(err) if err.kind() == ErrorKind::DirectoryNotEmpty => Ok(Reply::new(ReplyCode::FileError, "Directory not empty")),
            Err(err) => {
                slog::warn!(args.logger, "Failed to remove directory {:?}: {}", target, err);
                Ok(Reply::new(ReplyCode::FileError, "Directory not found"))
            }
        }
    }
}
