//! The RFC 959 Retrieve (`RETR`) command
//
// Sends a file over the data connection. The writer side of the data
// socket is half-closed before the socket is dropped, and the final reply
// only goes out after that.

use crate::server::ascii;
use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::{Reply, ReplyCode};
use crate::server::session::TransferType;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::SinkExt;
use tokio::io::AsyncWriteExt;

#[derive(Debug)]
pub(crate) struct Retr {
    path: Bytes,
}

impl Retr {
    pub fn new(path: Bytes) -> Self {
        Retr { path }
    }
}

#[async_trait]
impl CommandHandler for Retr {
    async fn handle(&self, args: CommandContext<'_>) -> Result<Reply, ControlChanError> {
        let CommandContext { session, reply_sink, logger } = args;

        // Take the endpoint up front so every exit path releases it.
        let endpoint = match session.data.take() {
            Some(endpoint) => endpoint,
            None => return Ok(Reply::new(ReplyCode::CantOpenDataConnection, "No data connection established")),
        };

        let path = session.charset.decode(&self.path);
        let target = match session.storage.resolve(&session.cwd, &path) {
            Ok(target) => target,
            Err(err) => return Ok(err.into()),
        };
        let metadata = match session.storage.metadata(&target).await {
            Ok(metadata) => metadata,
            Err(err) => return Ok(err.into()),
        };
        if metadata.is_dir() {
            return Ok(Reply::new(ReplyCode::FileError, "Cannot download directory"));
        }

        let start_pos = std::mem::take(&mut session.start_pos);
        let mut file = match session.storage.open_read(&target, start_pos).await {
            Ok(file) => file,
            Err(err) => return Ok(err.into()),
        };

        let mut socket = match endpoint.open(session.timeout).await {
            Ok(socket) => socket,
            Err(err) => {
                slog::warn!(logger, "Failed to open data connection for download: {}", err);
                return Ok(Reply::new(ReplyCode::CantOpenDataConnection, "Cannot establish data connection"));
            }
        };

        let transfer_type = session.transfer_type_for(&target);
        let name = target.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        reply_sink
            .send(Reply::new_with_string(
                ReplyCode::FileStatusOkay,
                format!("Opening {} mode data connection for {} ({} bytes)", transfer_type, name, metadata.len()),
            ))
            .await?;

        let result = tokio::time::timeout(session.timeout, async {
            let bytes = match transfer_type {
                TransferType::Ascii => ascii::copy_outbound(&mut file, &mut socket).await?,
                TransferType::Binary => tokio::io::copy(&mut file, &mut socket).await?,
            };
            socket.shutdown().await?;
            Ok(bytes)
        })
        .await
        .unwrap_or_else(|_| Err(std::io::Error::new(std::io::ErrorKind::TimedOut, "data transfer timed out")));

        match result {
            Ok(bytes) => {
                drop(socket);
                slog::info!(logger, "Sent {} bytes from {:?}", bytes, target);
                Ok(Reply::new_with_string(
                    ReplyCode::ClosingDataConnection,
                    format!("Transfer complete, {} bytes sent", bytes),
                ))
            }
            Err(err) => {
                slog::warn!(logger, "Error during file download of {:?}: {}", target, err);
                reply_sink.send(Reply::new(ReplyCode::ConnectionClosed, "Connection closed")).await?;
                drop(socket);
                Ok(Reply::new(ReplyCode::FileError, "File transfer failed"))
            }
        }
    }
}
