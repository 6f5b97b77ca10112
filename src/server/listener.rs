//! Accepts control connections and spawns one session task per client.

use crate::server::controlchan::{self, control_loop};
use crate::server::shutdown;

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Live sessions keyed by their remote address. `stop()` aborts them all;
/// a session that ends on its own removes itself.
#[derive(Debug, Default)]
pub(crate) struct Registry {
    sessions: Mutex<HashMap<SocketAddr, JoinHandle<()>>>,
}

impl Registry {
    pub fn insert(&self, peer: SocketAddr, handle: JoinHandle<()>) {
        if let Ok(mut sessions) = self.sessions.lock() {
            sessions.insert(peer, handle);
        }
    }

    pub fn remove(&self, peer: SocketAddr) {
        if let Ok(mut sessions) = self.sessions.lock() {
            sessions.remove(&peer);
        }
    }

    /// Tears down every live session. In-flight transfers observe a
    /// connection reset; there is no graceful drain.
    pub fn abort_all(&self) {
        if let Ok(mut sessions) = self.sessions.lock() {
            for (_, handle) in sessions.drain() {
                handle.abort();
            }
        }
    }
}

// Listener listens for control channel connections on a TCP port and
// spawns a control loop in a new task for each incoming connection.
pub(crate) struct Listener {
    pub listener: TcpListener,
    pub logger: slog::Logger,
    pub config: control_loop::Config,
    pub shutdown_topic: Arc<shutdown::Notifier>,
    pub registry: Arc<Registry>,
}

impl Listener {
    pub async fn listen(self) {
        let Listener {
            listener,
            logger,
            config,
            shutdown_topic,
            registry,
        } = self;
        let mut shutdown_listener = shutdown_topic.subscribe();
        loop {
            let accepted = tokio::select! {
                _ = shutdown_listener.listen() => {
                    slog::info!(logger, "Shutting down listener");
                    return;
                }
                accepted = listener.accept() => accepted,
            };
            match accepted {
                Ok((tcp_stream, peer)) => {
                    slog::info!(logger, "Incoming control connection from {}", peer);
                    let session_config = config.clone();
                    let session_shutdown = shutdown_topic.subscribe();
                    let session_registry = Arc::clone(&registry);
                    let session_logger = logger.clone();
                    let handle = tokio::spawn(async move {
                        let result = controlchan::control_loop::run(session_config, tcp_stream, session_shutdown).await;
                        if let Err(err) = result {
                            slog::warn!(session_logger, "Control loop for {} ended with error: {}", peer, err);
                        }
                        session_registry.remove(peer);
                    });
                    registry.insert(peer, handle);
                }
                Err(err) => {
                    slog::error!(logger, "Error accepting incoming control connection: {}", err);
                }
            }
        }
    }
}
