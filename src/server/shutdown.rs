//! Shutdown signaling between the server handle, the accept loop and the
//! per-session tasks.

use std::sync::RwLock;
use tokio::sync::broadcast;

// Notifier lets the accept loop and the sessions know that we're shutting
// down.
#[derive(Debug)]
pub(crate) struct Notifier {
    shutdown_tx: RwLock<Option<broadcast::Sender<()>>>,
}

impl Notifier {
    pub fn new() -> Notifier {
        let (shutdown_tx, _) = broadcast::channel(1);
        Notifier {
            shutdown_tx: RwLock::new(Some(shutdown_tx)),
        }
    }

    // Notifies shutdown listeners that shutdown is commencing. When the
    // sender is dropped, every task that `subscribe`d sees the signal.
    pub fn notify(&self) {
        if let Ok(mut guard) = self.shutdown_tx.write() {
            drop(guard.take());
        }
    }

    pub fn subscribe(&self) -> Listener {
        let guard = self.shutdown_tx.read().ok();
        let sender = guard.as_ref().and_then(|g| g.as_ref());
        Listener {
            shutdown: sender.is_none(),
            shutdown_rx: sender.map(|tx| tx.subscribe()),
        }
    }
}

// Listener waits for the shutdown notification.
#[derive(Debug)]
pub(crate) struct Listener {
    shutdown: bool,
    shutdown_rx: Option<broadcast::Receiver<()>>,
}

impl Listener {
    /// Receive the shutdown notice, waiting if necessary.
    pub async fn listen(&mut self) {
        if self.shutdown {
            return;
        }
        match self.shutdown_rx.as_mut() {
            // Cannot receive a "lag error" as no value is ever sent; the
            // channel only ever closes.
            Some(rx) => {
                let _ = rx.recv().await;
            }
            None => return,
        }
        self.shutdown = true;
    }
}
