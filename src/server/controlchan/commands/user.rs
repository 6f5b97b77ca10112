//! The RFC 959 User Name (`USER`) command

use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::{Reply, ReplyCode};
use crate::server::session::SessionState;

use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug)]
pub(crate) struct User {
    username: Bytes,
}

impl User {
    pub fn new(username: Bytes) -> Self {
        User { username }
    }
}

#[async_trait]
impl CommandHandler for User {
    async fn handle(&self, args: CommandContext<'_>) -> Result<Reply, ControlChanError> {
        let session = args.session;
        // USER always restarts the handshake, even on a logged-in session.
        session.username = Some(String::from_utf8_lossy(&self.username).to_string());
        session.state = SessionState::WaitPass;
        Ok(Reply::new(ReplyCode::NeedPassword, "Please enter password"))
    }
}
