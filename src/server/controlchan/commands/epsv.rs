//! The RFC 2428 Extended Passive Mode (`EPSV`) command
//
// Like PASV, but the reply carries only the port so it works through
// address translation.

use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::{Reply, ReplyCode};
use crate::server::datachan::{self, DataEndpoint};

use async_trait::async_trait;

#[derive(Debug)]
pub(crate) struct Epsv;

#[async_trait]
impl CommandHandler for Epsv {
    async fn handle(&self, args: CommandContext<'_>) -> Result<Reply, ControlChanError> {
        let session = args.session;
        let listener = match datachan::bind_passive().await {
            Ok(listener) => listener,
            Err(err) => {
                slog::warn!(args.logger, "Failed to bind passive listener: {}", err);
                return Ok(Reply::new(ReplyCode::CantOpenDataConnection, "Cannot enter extended passive mode"));
            }
        };
        let port = listener.local_addr()?.port();

        session.data = Some(DataEndpoint::PassivePending { listener });

        Ok(Reply::new_with_string(
            ReplyCode::EnteringExtendedPassiveMode,
            format!("Entering Extended Passive Mode (|||{}|)", port),
        ))
    }
}
