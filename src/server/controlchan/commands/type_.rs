//! The RFC 959 Representation Type (`TYPE`) command
//
// A - ASCII, with line endings translated on the wire.
// I - Image, bytes passed through untouched.
// L <byte size> - Local byte size; on octet machines `L 8` is Image.

use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::{Reply, ReplyCode};
use crate::server::session::TransferType;

use async_trait::async_trait;

#[derive(Debug)]
pub(crate) struct Type {
    param: String,
}

impl Type {
    pub fn new(param: String) -> Self {
        Type { param }
    }
}

#[async_trait]
impl CommandHandler for Type {
    async fn handle(&self, args: CommandContext<'_>) -> Result<Reply, ControlChanError> {
        match self.param.as_str() {
            "A" => {
                args.session.transfer_type = TransferType::Ascii;
                Ok(Reply::new(ReplyCode::CommandOkay, "Switching to ASCII mode"))
            }
            "I" | "L" | "L 8" => {
                args.session.transfer_type = TransferType::Binary;
                Ok(Reply::new(ReplyCode::CommandOkay, "Switching to binary mode"))
            }
            _ => Ok(Reply::new(ReplyCode::CommandNotImplementedForParameter, "Unsupported transfer type")),
        }
    }
}
