//! The RFC 959 List (`LIST`) command
//
// Sends one `ls -l`-like line per directory entry over the data
// connection. The final reply only goes out after the data socket is
// closed; clients treat it as the transfer-complete fence.

use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::{Reply, ReplyCode};
use crate::server::datachan::{DataEndpoint, LIST_ACCEPT_TIMEOUT};

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::SinkExt;
use tokio::io::AsyncWriteExt;

#[derive(Debug)]
pub(crate) struct List {
    path: Option<Bytes>,
}

impl List {
    pub fn new(path: Option<Bytes>) -> Self {
        List { path }
    }
}

#[async_trait]
impl CommandHandler for List {
    async fn handle(&self, args: CommandContext<'_>) -> Result<Reply, ControlChanError> {
        let CommandContext { session, reply_sink, logger } = args;

        // Take the endpoint up front so every exit path releases it.
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
                return Ok(Reply::new(ReplyCode::FileError, "Cannot list directory"));
            }
        };

        let bound = match &endpoint {
            DataEndpoint::PassivePending { .. } => LIST_ACCEPT_TIMEOUT,
            _ => session.timeout,
        };
        let mut socket = match endpoint.open(bound).await {
            Ok(socket) => socket,
            Err(err) => {
                slog::warn!(logger, "Failed to open data connection for LIST: {}", err);
                return Ok(Reply::new(ReplyCode::CantOpenDataConnection, "Cannot establish data connection"));
            }
        };

        reply_sink
            .send(Reply::new(ReplyCode::FileStatusOkay, "Starting directory list transfer"))
            .await?;

        let mut payload = Vec::new();
        for entry in &entries {
            payload.extend_from_slice(&session.charset.encode(&entry.to_string()));
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
                slog::warn!(logger, "Failed to write directory list: {}", err);
                reply_sink.send(Reply::new(ReplyCode::ConnectionClosed, "Connection closed")).await?;
                drop(socket);
                Ok(Reply::new(ReplyCode::FileError, "Failed to send directory list"))
            }
        }
    }
}
