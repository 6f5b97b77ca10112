//! The RFC 959 Change To Parent Directory (`CDUP`) command

use super::cwd::Cwd;
use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::Reply;

use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug)]
pub(crate) struct Cdup;

#[async_trait]
impl CommandHandler for Cdup {
    async fn handle(&self, args: CommandContext<'_>) -> Result<Reply, ControlChanError> {
        // CDUP is CWD .. with a fixed argument.
        Cwd::new(Bytes::from_static(b"..")).handle(args).await
    }
}
