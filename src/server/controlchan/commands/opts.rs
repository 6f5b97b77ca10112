//! The RFC 2389 Options (`OPTS`) command
//
// The only option we know is UTF8, which switches the session's filename
// charset between GBK and UTF-8 passthrough.

use crate::server::charset::WireCharset;
use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::{Reply, ReplyCode};

use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug)]
pub(crate) struct Opts {
    option: Bytes,
}

impl Opts {
    pub fn new(option: Bytes) -> Self {
        Opts { option }
    }
}

#[async_trait]
impl CommandHandler for Opts {
    async fn handle(&self, args: CommandContext<'_>) -> Result<Reply, ControlChanError> {
        let session = args.session;
        let option = String::from_utf8_lossy(&self.option).trim().to_uppercase();
        let mut parts = option.split_whitespace();
        match (parts.next(), parts.next()) {
            (Some("UTF8"), Some("ON")) => {
                session.charset = WireCharset::Utf8;
                Ok(Reply::new(ReplyCode::CommandOkay, "UTF8 mode enabled"))
            }
            (Some("UTF8"), Some("OFF")) => {
                session.charset = WireCharset::Gbk;
                Ok(Reply::new(ReplyCode::CommandOkay, "UTF8 mode disabled"))
            }
            (Some("UTF8"), None) => {
                let state = match session.charset {
                    WireCharset::Utf8 => "UTF8 mode enabled",
                    WireCharset::Gbk => "UTF8 mode disabled",
                };
                Ok(Reply::new(ReplyCode::CommandOkay, state))
            }
            (Some("UTF8"), Some(_)) => Ok(Reply::new(ReplyCode::ParameterSyntaxError, "Invalid value for UTF8")),
            _ => Ok(Reply::new(ReplyCode::ParameterSyntaxError, "Option not supported")),
        }
    }
}
