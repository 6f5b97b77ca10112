//! The RFC 959 Password (`PASS`) command

use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::{Reply, ReplyCode};
use crate::server::session::SessionState;

use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug)]
pub(crate) struct Pass {
    password: Bytes,
}

impl Pass {
    pub fn new(password: Bytes) -> Self {
        Pass { password }
    }
}

#[async_trait]
impl CommandHandler for Pass {
    async fn handle(&self, args: CommandContext<'_>) -> Result<Reply, ControlChanError> {
        let session = args.session;
        if session.state == SessionState::New {
            return Ok(Reply::new(ReplyCode::BadCommandSequence, "Login with USER first"));
        }

        let given_user = session.username.as_deref().unwrap_or("");
        let given_pass = String::from_utf8_lossy(&self.password);
        // An empty configured password accepts any password; the username
        // still has to match.
        let pass_ok = session.credentials.password.is_empty() || given_pass == session.credentials.password.as_str();
        if given_user == session.credentials.username && pass_ok {
            session.state = SessionState::WaitCmd;
            slog::info!(args.logger, "User logged in"; "username" => given_user);
            Ok(Reply::new(ReplyCode::UserLoggedIn, "Login successful"))
        } else {
            session.state = SessionState::New;
            slog::info!(args.logger, "Login failed"; "username" => given_user);
            Ok(Reply::new(ReplyCode::NotLoggedIn, "Invalid username or password"))
        }
    }
}
