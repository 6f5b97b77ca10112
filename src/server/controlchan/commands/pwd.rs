//! The RFC 959 Print Working Directory (`PWD`) command

use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::{Reply, ReplyCode};

use async_trait::async_trait;

#[derive(Debug)]
pub(crate) struct Pwd;

#[async_trait]
impl CommandHandler for Pwd {
    async fn handle(&self, args: CommandContext<'_>) -> Result<Reply, ControlChanError> {
        // RFC 959 wants the directory double-quoted.
        Ok(Reply::new_with_string(
            ReplyCode::DirCreated,
            format!("\"{}\" is current directory", args.session.virtual_cwd()),
        ))
    }
}
