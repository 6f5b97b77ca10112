//! The RFC 959 Name List (`NLST`) command
//
// Like LIST but names only, one per CRLF-terminated line.

use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::{Reply, ReplyCode};
use crate::server::datachan::{DataEndpoint, LIST_ACCEPT_TIMEOUT};

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::SinkExt;
use tokio::io::AsyncWriteExt;

#[derive(Debug)]
pub(crate) struct Nlst {
    path: Option<Bytes>,
}

impl Nlst {
    pub fn new(path: Option<Bytes>) -> Self {
        Nlst { path }
    }
}

#[async_trait]
impl CommandHandler for Nlst {
    async fn handle(&self, args: CommandContext<'_>) -> Result<Reply, ControlChanError> {
        let CommandContext { session, reply_sink, logger } = args;

        let endpoint = match session.data.take() {
            Some(endpoint) => endpoint,
            None => return Ok(Reply::new(ReplyCode::CantOpenDataConnection, "No data connection established")),
        };

        let target = match &self.path {
            Some(path) => {
                let path = session.charset.decode(path);
                match session.storage.resolve(&session.cwd, &path) {
                    Ok(target) => target,
                    Err(err) => return Ok(err.into()),
                }
            }
            None => session.cwd.clone(),
        };
        let entries = match session.storage.list(&target).await {
            Ok(entries) => entries,
            Err(err) => {
                slog::warn!(logger, "Failed to list {:?}: {}", target, err);
                return Ok(Reply::new(ReplyCode::FileError, "Failed to read directory"));
            }
        };

        let bound = match &endpoint {
            DataEndpoint::PassivePending { .. } => LIST_ACCEPT_TIMEOUT,
            _ => session.timeout,
        };
        let mut socket = match endpoint.open(bound).await {
            Ok(socket) => socket,
            Err(err) => {
                slog::warn!(logger, "Failed to open data connection for NLST: {}", err);
                return Ok(Reply::new(ReplyCode::CantOpenDataConnection, "Cannot establish data connection"));
            }
        };

        reply_sink.send(Reply::new(ReplyCode::FileStatusOkay, "Starting file list transfer")).await?;

        let mut payload = Vec::new();
        for entry in &entries {
            payload.extend_from_slice(&session.charset.encode(&entry.name));
            payload.extend_from_slice(b"\r\n");
        }
        let written = tokio::time::timeout(session.timeout, async {
            socket.write_all(&payload).await?;
            socket.shutdown().await
        })
        .await
        .unwrap_or_else(|_| Err(std::io::Error::new(std::io::ErrorKind::TimedOut, "data transfer timed out")));

        match written {
            Ok(()) => {
                drop(socket);
                Ok(Reply::new(ReplyCode::ClosingDataConnection, "Transfer complete"))
            }
            Err(err) => {
                slog::warn!(logger, "Failed to write name list: {}", err);
                reply_sink.send(Reply::new(ReplyCode::ConnectionClosed, "Connection closed")).await?;
                drop(socket);
                Ok(Reply::new(ReplyCode::FileError, "Failed to send name list"))
            }
        }
    }
}
