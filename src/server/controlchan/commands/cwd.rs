//! The RFC 959 Change Working Directory (`CWD`) command

use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::{Reply, ReplyCode};

use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug)]
pub(crate) struct Cwd {
    path: Bytes,
}

impl Cwd {
    pub fn new(path: Bytes) -> Self {
        Cwd { path }
    }
}

#[async_trait]
impl CommandHandler for Cwd {
    async fn handle(&self, args: CommandContext<'_>) -> Result<Reply, ControlChanError> {
        let session = args.session;
        let path = session.charset.decode(&self.path);

        if path == "/" {
            session.cwd = session.storage.root().to_path_buf();
            return Ok(Reply::new(ReplyCode::FileActionOkay, "Directory changed to root"));
        }

        let target = match session.storage.resolve(&session.cwd, &path) {
            Ok(target) => target,
            Err(err) => return Ok(err.into()),
        };
        match session.storage.metadata(&target).await {
            Ok(metadata) if metadata.is_dir() => {
                session.cwd = target;
                Ok(Reply::new(ReplyCode::FileActionOkay, "Directory changed"))
            }
            _ => Ok(Reply::new(ReplyCode::FileError, "Directory not accessible")),
        }
    }
}
