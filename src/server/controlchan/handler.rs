use super::{codecs::FtpCodec, error::ControlChanError, Reply};
use crate::server::session::Session;

use async_trait::async_trait;
use futures_util::stream::SplitSink;
use tokio::net::TcpStream;
use tokio_util::codec::Framed;

/// The write half of the control connection. Transfer handlers use it to
/// emit their 150 before streaming; the final reply goes through the
/// control loop.
pub(crate) type ReplySink = SplitSink<Framed<TcpStream, FtpCodec>, Reply>;

// Common interface for all handlers of `Command`s.
#[async_trait]
pub(crate) trait CommandHandler: Send + Sync + std::fmt::Debug {
    async fn handle(&self, args: CommandContext<'_>) -> Result<Reply, ControlChanError>;
}

/// Everything a handler gets to work with. The session is exclusively
/// borrowed: within one connection, commands run strictly one at a time.
pub(crate) struct CommandContext<'a> {
    pub session: &'a mut Session,
    pub reply_sink: &'a mut ReplySink,
    pub logger: &'a slog::Logger,
}
