//! The per-session control loop: reads CRLF-framed commands, gates on
//! authentication and routes them to their handlers.

use super::{
    codecs::FtpCodec,
    command::Command,
    commands,
    error::ControlChanError,
    handler::{CommandContext, CommandHandler},
    parse_error::ParseError,
    Reply, ReplyCode,
};
use crate::server::session::{Credentials, Session, SessionState};
use crate::server::shutdown;
use crate::storage::Filesystem;

use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_util::codec::Decoder;

/// What a session needs to know from the server configuration.
#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub storage: Arc<Filesystem>,
    pub greeting: &'static str,
    pub credentials: Credentials,
    pub idle_session_timeout: Duration,
    pub logger: slog::Logger,
}

/// Runs one control connection to completion. Returns `Err` only for
/// control-socket I/O failures; protocol-level errors are answered on the
/// wire and the loop carries on.
pub(crate) async fn run(config: Config, tcp_stream: TcpStream, mut shutdown: shutdown::Listener) -> Result<(), ControlChanError> {
    let peer = tcp_stream.peer_addr()?;
    let local_addr = tcp_stream.local_addr()?;
    let logger = config.logger.new(slog::o!("source" => peer.to_string()));
    let mut session = Session::new(
        config.storage,
        peer,
        local_addr,
        config.credentials,
        config.idle_session_timeout,
    );

    let cmd_and_reply_stream = FtpCodec::new().framed(tcp_stream);
    let (mut reply_sink, mut command_source) = cmd_and_reply_stream.split();

    reply_sink.send(Reply::new(ReplyCode::ServiceReady, config.greeting)).await?;

    slog::info!(logger, "Starting control loop");
    loop {
        let timeout_delay = tokio::time::sleep(config.idle_session_timeout);
        tokio::pin!(timeout_delay);
        let incoming = tokio::select! {
            line_result = command_source.next() => match line_result {
                // Parsing happens here rather than in the codec so that a
                // malformed line gets its error reply and the session
                // lives on.
                Some(line_result) => line_result.and_then(|line| Ok(Command::parse(line)?)),
                // Client went away without QUIT.
                None => return Ok(()),
            },
            _ = &mut timeout_delay => Err(ControlChanError::ControlChannelTimeout),
            _ = shutdown.listen() => {
                slog::info!(logger, "Shutting down control loop");
                return Ok(());
            }
        };

        match incoming {
            Ok(cmd) => {
                slog::debug!(logger, "Received command: {}", cmd);

                // A pending rename source only survives into RNTO.
                if !matches!(cmd, Command::Rnto { .. }) {
                    session.rename_from = None;
                }

                let exempt = matches!(cmd, Command::User { .. } | Command::Pass { .. } | Command::Quit);
                if !exempt && session.state != SessionState::WaitCmd {
                    reply_sink.send(Reply::new(ReplyCode::NotLoggedIn, "Please login with USER and PASS")).await?;
                    continue;
                }

                if matches!(cmd, Command::Quit) {
                    reply_sink.send(Reply::new(ReplyCode::ClosingControlConnection, "Goodbye")).await?;
                    return Ok(());
                }

                let context = CommandContext {
                    session: &mut session,
                    reply_sink: &mut reply_sink,
                    logger: &logger,
                };
                match dispatch(cmd, context).await? {
                    Reply::None => {}
                    reply => reply_sink.send(reply).await?,
                }
            }
            Err(error) => {
                if let ControlChanError::Io(_) = error {
                    slog::warn!(logger, "Control channel I/O error: {}", error);
                    return Ok(());
                }
                let (reply, close_connection) = handle_control_channel_error(&logger, &error);
                reply_sink.send(reply).await?;
                if close_connection {
                    return Ok(());
                }
            }
        }
    }
}

async fn dispatch(cmd: Command, context: CommandContext<'_>) -> Result<Reply, ControlChanError> {
    let handler: Box<dyn CommandHandler> = match cmd {
        Command::User { username } => Box::new(commands::User::new(username)),
        Command::Pass { password } => Box::new(commands::Pass::new(password)),
        Command::Pwd => Box::new(commands::Pwd),
        Command::Cwd { path } => Box::new(commands::Cwd::new(path)),
        Command::Cdup => Box::new(commands::Cdup),
        Command::Type { param } => Box::new(commands::Type::new(param)),
        Command::Port { addr } => Box::new(commands::Port::new(addr)),
        Command::Eprt { addr } => Box::new(commands::Eprt::new(addr)),
        Command::Pasv => Box::new(commands::Pasv),
        Command::Epsv => Box::new(commands::Epsv),
        Command::List { path } => Box::new(commands::List::new(path)),
        Command::Nlst { path } => Box::new(commands::Nlst::new(path)),
        Command::Stor { path } => Box::new(commands::Stor::new(path)),
        Command::Appe { path } => Box::new(commands::Appe::new(path)),
        Command::Retr { path } => Box::new(commands::Retr::new(path)),
        Command::Dele { path } => Box::new(commands::Dele::new(path)),
        Command::Mkd { path } => Box::new(commands::Mkd::new(path)),
        Command::Rmd { path } => Box::new(commands::Rmd::new(path)),
        Command::Rnfr { path } => Box::new(commands::Rnfr::new(path)),
        Command::Rnto { path } => Box::new(commands::Rnto::new(path)),
        Command::Size { path } => Box::new(commands::Size::new(path)),
        Command::Mdtm { path } => Box::new(commands::Mdtm::new(path)),
        Command::Rest { offset } => Box::new(commands::Rest::new(offset)),
        Command::Syst => Box::new(commands::Syst),
        Command::Noop => Box::new(commands::Noop),
        Command::Feat => Box::new(commands::Feat),
        Command::Opts { option } => Box::new(commands::Opts::new(option)),
        Command::Stat { path } => Box::new(commands::Stat::new(path)),
        Command::Quit => return Ok(Reply::new(ReplyCode::ClosingControlConnection, "Goodbye")),
        Command::Other { .. } => return Ok(Reply::new(ReplyCode::CommandSyntaxError, "Unknown command")),
    };

    handler.handle(context).await
}

// Gets the reply to be sent to the client and tells if the connection
// should be closed.
fn handle_control_channel_error(logger: &slog::Logger, error: &ControlChanError) -> (Reply, bool) {
    slog::warn!(logger, "Control channel error: {}", error);
    match error {
        ControlChanError::Parse(ParseError::InvalidCommand) => (Reply::new(ReplyCode::ParameterSyntaxError, "Invalid parameter"), false),
        ControlChanError::Parse(_) => (Reply::new(ReplyCode::CommandSyntaxError, "Invalid command"), false),
        ControlChanError::CommandLineTooLong => (Reply::new(ReplyCode::CommandSyntaxError, "Command line too long"), true),
        ControlChanError::ControlChannelTimeout => (
            Reply::new(ReplyCode::ServiceNotAvailable, "Session timed out. Closing control connection"),
            true,
        ),
        ControlChanError::Io(_) => (Reply::new(ReplyCode::ServiceNotAvailable, "Internal server error"), true),
    }
}
