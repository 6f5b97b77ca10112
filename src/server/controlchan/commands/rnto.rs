//! The RFC 959 Rename To (`RNTO`) command

use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::{Reply, ReplyCode};

use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug)]
pub(crate) struct Rnto {
    path: Bytes,
}

impl Rnto {
    pub fn new(path: Bytes) -> Self {
        Rnto { path }
    }
}

#[async_trait]
impl CommandHandler for Rnto {
    async fn handle(&self, args: CommandContext<'_>) -> Result<Reply, ControlChanError> {
        let session = args.session;
        // The source is consumed whether or not the rename goes through.
        let source = match session.rename_from.take() {
            Some(source) => source,
            None => return Ok(Reply::new(ReplyCode::BadCommandSequence, "Bad sequence of commands")),
        };
        let path = session.charset.decode(&self.path);
        let target = match session.storage.resolve(&session.cwd, &path) {
            Ok(target) => target,
            Err(err) => return Ok(err.into()),
        };
        match session.storage.rename(&source, &target).await {
            Ok(()) => Ok(Reply::new(ReplyCode::FileActionOkay, "Rename successful")),
            Err(err) => {
                slog::warn!(args.logger, "Failed to rename {:?} to {:?}: {}", source, target, err);
                Ok(Reply::new(ReplyCode::FileError, "Rename failed"))
            }
        }
    }
}
