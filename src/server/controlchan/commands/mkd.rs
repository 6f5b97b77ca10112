//! The RFC 959 Make Directory (`MKD`) command

use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::{Reply, ReplyCode};

use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug)]
pub(crate) struct Mkd {
    path: Bytes,
}

impl Mkd {
    pub fn new(path: Bytes) -> Self {
        Mkd { path }
    }
}

#[async_trait]
impl CommandHandler for Mkd {
    async fn handle(&self, args: CommandContext<'_>) -> Result<Reply, ControlChanError> {
        let session = args.session;
        let path = session.charset.decode(&self.path);
        let target = match session.storage.resolve(&session.cwd, &path) {
            Ok(target) => target,
            Err(err) => return Ok(err.into()),
        };
        // Intermediate directories are created along the way.
        match session.storage.mkd(&target).await {
            Ok(()) => Ok(Reply::new_with_string(ReplyCode::DirCreated, format!("\"{}\" created", path))),
            Err(err) => {
                slog::warn!(args.logger, "Failed to create directory {:?}: {}", target, err);
                Ok(Reply::new(ReplyCode::FileError, "Failed to create directory"))
            }
        }
    }
}
