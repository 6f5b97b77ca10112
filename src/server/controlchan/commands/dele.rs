//! The RFC 959 Delete (`DELE`) command

use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::{Reply, ReplyCode};

use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug)]
pub(crate) struct Dele {
    path: Bytes,
}

impl Dele {
    pub fn new(path: Bytes) -> Self {
        Dele { path }
    }
}

#[async_trait]
impl CommandHandler for Dele {
    async fn handle(&self, args: CommandContext<'_>) -> Result<Reply, ControlChanError> {
        let session = args.session;
        let path = session.charset.decode(&self.path);
        let target = match session.storage.resolve(&session.cwd, &path) {
            Ok(target) => target,
            Err(err) => return Ok(err.into()),
        };
        match session.storage.del(&target).await {
            Ok(()) => Ok(Reply::new(ReplyCode::FileActionOkay, "File deleted")),
            Err(err) => {
                slog::warn!(args.logger, "Failed to delete {:?}: {}", target, err);
                Ok(err.into())
            }
        }
    }
}
