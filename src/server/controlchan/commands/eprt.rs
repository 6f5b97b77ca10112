//! The RFC 2428 Extended Data Port (`EPRT`) command
//
// The argument is |proto|host|port| with proto 1 for IPv4 and 2 for IPv6,
// e.g. |2|::1|1234|.

use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::{Reply, ReplyCode};
use crate::server::datachan::DataEndpoint;

use async_trait::async_trait;
use bytes::Bytes;
use std::net::{IpAddr, SocketAddr};

#[derive(Debug)]
pub(crate) struct Eprt {
    addr: Bytes,
}

impl Eprt {
    pub fn new(addr: Bytes) -> Self {
        Eprt { addr }
    }
}

#[async_trait]
impl CommandHandler for Eprt {
    async fn handle(&self, args: CommandContext<'_>) -> Result<Reply, ControlChanError> {
        let arg = String::from_utf8_lossy(&self.addr).to_string();
        let parts: Vec<&str> = arg.split('|').collect();
        if parts.len() != 5 || !parts[0].is_empty() || !parts[4].is_empty() {
            return Ok(Reply::new(ReplyCode::CommandSyntaxError, "Invalid EPRT command"));
        }
        match parts[1] {
            "1" | "2" => {}
            _ => return Ok(Reply::new(ReplyCode::ProtocolNotSupported, "Unsupported network protocol")),
        }
        let host: IpAddr = match parts[2].parse() {
            Ok(host) => host,
            Err(_) => return Ok(Reply::new(ReplyCode::CommandSyntaxError, "Invalid EPRT command")),
        };
        let port: u16 = match parts[3].parse() {
            Ok(port) => port,
            Err(_) => return Ok(Reply::new(ReplyCode::CommandSyntaxError, "Invalid port number")),
        };

        args.session.data = Some(DataEndpoint::Active {
            peer: SocketAddr::new(host, port),
        });
        Ok(Reply::new(ReplyCode::CommandOkay, "EPRT command successful"))
    }
}
