//! The RFC 959 Append (`APPE`) command

use super::stor::execute_store;
use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::Reply;

use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug)]
pub(crate) struct Appe {
    path: Bytes,
}

impl Appe {
    pub fn new(path: Bytes) -> Self {
        Appe { path }
    }
}

#[async_trait]
impl CommandHandler for Appe {
    async fn handle(&self, args: CommandContext<'_>) -> Result<Reply, ControlChanError> {
        execute_store(args, &self.path, true).await
    }
}
