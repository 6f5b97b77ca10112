//! The RFC 959 Passive (`PASV`) command
//
// This command requests the server-DTP to "listen" on a data port and to
// wait for a connection rather than initiate one upon receipt of a
// transfer command. The response includes the host and port address this
// server is listening on.

use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::{Reply, ReplyCode};
use crate::server::datachan::{self, DataEndpoint};

use async_trait::async_trait;

#[derive(Debug)]
pub(crate) struct Pasv;

#[async_trait]
impl CommandHandler for Pasv {
    async fn handle(&self, args: CommandContext<'_>) -> Result<Reply, ControlChanError> {
        let session = args.session;
        let listener = match datachan::bind_passive().await {
            Ok(listener) => listener,
            Err(err) => {
                slog::warn!(args.logger, "Failed to bind passive listener: {}", err);
                return Ok(Reply::new(ReplyCode::CantOpenDataConnection, "Cannot enter passive mode"));
            }
        };
        let port = listener.local_addr()?.port();
        let octets = datachan::advertised_host(session.local_addr).octets();
        let p1 = port >> 8;
        let p2 = port & 0xff;

        session.data = Some(DataEndpoint::PassivePending { listener });

        Ok(Reply::new_with_string(
            ReplyCode::EnteringPassiveMode,
            format!(
                "Entering passive mode ({},{},{},{},{},{})",
                octets[0], octets[1], octets[2], octets[3], p1, p2
            ),
        ))
    }
}
