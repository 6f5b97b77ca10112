//! The RFC 959 Rename From (`RNFR`) command

use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::{Reply, ReplyCode};

use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug)]
pub(crate) struct Rnfr {
    path: Bytes,
}

impl Rnfr {
    pub fn new(path: Bytes) -> Self {
        Rnfr { path }
    }
}

#[async_trait]
impl CommandHandler for Rnfr {
    async fn handle(&self, args: CommandContext<'_>) -> Result<Reply, ControlChanError> {
        let session = args.session;
        let path = session.charset.decode(&self.path);
        let source = match session.storage.resolve(&session.cwd, &path) {
            Ok(source) => source,
            Err(err) => return Ok(err.into()),
        };
        if session.storage.metadata(&source).await.is_err() {
            return Ok(Reply::new(ReplyCode::FileError, "File not found"));
        }
        // Only the immediately following RNTO may consume this; the
        // control loop clears it on any other command.
        session.rename_from = Some(source);
        Ok(Reply::new(ReplyCode::FileActionPending, "Ready for destination name"))
    }
}
