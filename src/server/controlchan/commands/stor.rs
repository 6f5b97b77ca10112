//! The RFC 959 Store (`STOR`) command
//
// Receives a file over the data connection, creating missing parent
// directories and truncating any existing file. APPE shares everything
// but the open mode.

use crate::server::ascii;
use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::{Reply, ReplyCode};
use crate::server::session::TransferType;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::SinkExt;
use tokio::io::{AsyncWriteExt, BufWriter};

#[derive(Debug)]
pub(crate) struct Stor {
    path: Bytes,
}

impl Stor {
    pub fn new(path: Bytes) -> Self {
        Stor { path }
    }
}

#[async_trait]
impl CommandHandler for Stor {
    async fn handle(&self, args: CommandContext<'_>) -> Result<Reply, ControlChanError> {
        execute_store(args, &self.path, false).await
    }
}

/// The shared receive path of STOR and APPE.
pub(super) async fn execute_store(args: CommandContext<'_>, path: &Bytes, append: bool) -> Result<Reply, ControlChanError> {
    let CommandContext { session, reply_sink, logger } = args;

    // Take the endpoint up front so every exit path releases it.
    let endpoint = match session.data.take() {
        Some(endpoint) => endpoint,
        None => return Ok(Reply::new(ReplyCode::CantOpenDataConnection, "No data connection established")),
    };

    let path = session.charset.decode(path);
    let target = match session.storage.resolve(&session.cwd, &path) {
        Ok(target) => target,
        Err(err) => return Ok(err.into()),
    };
    let start_pos = std::mem::take(&mut session.start_pos);

    let file = if append {
        session.storage.open_append(&target).await
    } else {
        session.storage.create_write(&target, start_pos).await
    };
    let file = match file {
        Ok(file) => file,
        Err(err) => {
            slog::warn!(logger, "Failed to create {:?}: {}", target, err);
            return Ok(Reply::new(ReplyCode::FileError, "Cannot create file"));
        }
    };

    let mut socket = match endpoint.open(session.timeout).await {
        Ok(socket) => socket,
        Err(err) => {
            slog::warn!(logger, "Failed to open data connection for upload: {}", err);
            return Ok(Reply::new(ReplyCode::CantOpenDataConnection, "Cannot establish data connection"));
        }
    };

    reply_sink
        .send(Reply::new(ReplyCode::FileStatusOkay, "Opening data connection for file upload"))
        .await?;

    let transfer_type = session.transfer_type_for(&target);
    let mut writer = BufWriter::new(file);
    let result = tokio::time::timeout(session.timeout, async {
        match transfer_type {
            TransferType::Ascii => ascii::copy_inbound(&mut socket, &mut writer).await,
            TransferType::Binary => {
                let bytes = tokio::io::copy(&mut socket, &mut writer).await?;
                writer.flush().await?;
                Ok(bytes)
            }
        }
    })
    .await
    .unwrap_or_else(|_| Err(std::io::Error::new(std::io::ErrorKind::TimedOut, "data transfer timed out")));

    match result {
        Ok(bytes) => {
            let _ = socket.shutdown().await;
            drop(socket);
            slog::info!(logger, "Received {} bytes into {:?}", bytes, target);
            Ok(Reply::new_with_string(
                ReplyCode::ClosingDataConnection,
                format!("Transfer complete, {} bytes received", bytes),
            ))
        }
        Err(err) => {
            slog::warn!(logger, "Error during file upload to {:?}: {}", target, err);
            reply_sink.send(Reply::new(ReplyCode::ConnectionClosed, "Connection closed")).await?;
            drop(socket);
            Ok(Reply::new(ReplyCode::FileError, "Error during file upload"))
        }
    }
}
