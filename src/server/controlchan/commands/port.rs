//! The RFC 959 Data Port (`PORT`) command
//
// The argument is HOST-PORT in the form h1,h2,h3,h4,p1,p2 where h1 is the
// high order 8 bits of the internet host address.

use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::{Reply, ReplyCode};
use crate::server::datachan::DataEndpoint;

use async_trait::async_trait;
use bytes::Bytes;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

#[derive(Debug)]
pub(crate) struct Port {
    addr: Bytes,
}

impl Port {
    pub fn new(addr: Bytes) -> Self {
        Port { addr }
    }
}

fn parse_host_port(arg: &str) -> Option<SocketAddr> {
    let mut octets = [0u8; 6];
    let mut count = 0;
    for part in arg.split(',') {
        if count == 6 {
            return None;
        }
        octets[count] = part.trim().parse().ok()?;
        count += 1;
    }
    if count != 6 {
        return None;
    }
    let ip = Ipv4Addr::new(octets[0], octets[1], octets[2], octets[3]);
    let port = u16::from(octets[4]) * 256 + u16::from(octets[5]);
    Some(SocketAddr::V4(SocketAddrV4::new(ip, port)))
}

#[async_trait]
impl CommandHandler for Port {
    async fn handle(&self, args: CommandContext<'_>) -> Result<Reply, ControlChanError> {
        let arg = String::from_utf8_lossy(&self.addr);
        match parse_host_port(&arg) {
            Some(peer) => {
                // Replacing the endpoint drops any previously prepared one.
                args.session.data = Some(DataEndpoint::Active { peer });
                Ok(Reply::new(ReplyCode::CommandOkay, "PORT command successful"))
            }
            None => Ok(Reply::new(ReplyCode::CommandSyntaxError, "Invalid PORT command")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_the_classic_form() {
        let addr = parse_host_port("127,0,0,1,4,1").unwrap();
        assert_eq!(addr, "127.0.0.1:1025".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn rejects_wrong_arity_and_garbage() {
        assert_eq!(parse_host_port("127,0,0,1,4"), None);
        assert_eq!(parse_host_port("127,0,0,1,4,1,9"), None);
        assert_eq!(parse_host_port("a,b,c,d,e,f"), None);
        assert_eq!(parse_host_port("300,0,0,1,4,1"), None);
    }
}
