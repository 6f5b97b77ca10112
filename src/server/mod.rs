//! Contains the `Server` struct that is used to configure and control a
//! FTP server instance, plus the machinery behind it.

pub(crate) mod ascii;
pub(crate) mod charset;
pub(crate) mod controlchan;
pub(crate) mod datachan;
pub mod error;
pub(crate) mod listener;
pub(crate) mod session;
pub(crate) mod shutdown;

use controlchan::control_loop;
use error::ServerError;
use listener::Registry;
use session::Credentials;
use crate::storage::Filesystem;

use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const DEFAULT_GREETING: &str = "Welcome to Go FTP Server";
const DEFAULT_PORT: u16 = 2121;
const DEFAULT_USERNAME: &str = "admin";
const DEFAULT_PASSWORD: &str = "123456";
const DEFAULT_IDLE_SESSION_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Clone)]
struct Config {
    root: PathBuf,
    port: u16,
    username: String,
    password: String,
    greeting: &'static str,
    idle_session_timeout: Duration,
    logger: slog::Logger,
}

// What exists while the server runs: its own runtime, the shutdown topic
// and the session registry.
struct Running {
    runtime: tokio::runtime::Runtime,
    shutdown_topic: Arc<shutdown::Notifier>,
    registry: Arc<Registry>,
}

/// An embeddable FTP server serving one sandboxed root directory to
/// clients authenticating with one configured credential.
///
/// The server is inert until [`start`](Server::start) and runs on its own
/// runtime, so it can be embedded in any application. Configuration is
/// fixed once started; stop and start again to change it.
///
/// # Example
///
/// ```no_run
/// use easyftp::Server;
///
/// let server = Server::new("/srv/ftp");
/// server.set_credentials("admin", "123456");
/// server.set_port(":2121");
/// server.start().unwrap();
/// assert!(server.is_running());
/// server.stop().unwrap();
/// ```
pub struct Server {
    config: Mutex<Config>,
    running: Mutex<Option<Running>>,
}

impl Server {
    /// Creates a server serving the given root directory, with default
    /// credentials and port.
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Server {
            config: Mutex::new(Config {
                root: root.into(),
                port: DEFAULT_PORT,
                username: DEFAULT_USERNAME.to_string(),
                password: DEFAULT_PASSWORD.to_string(),
                greeting: DEFAULT_GREETING,
                idle_session_timeout: Duration::from_secs(DEFAULT_IDLE_SESSION_TIMEOUT_SECS),
                logger: slog::Logger::root(slog::Discard, slog::o!()),
            }),
            running: Mutex::new(None),
        }
    }

    /// Sets the greeting that will be sent to the client after connecting.
    pub fn greeting(self, greeting: &'static str) -> Self {
        self.config.lock().unwrap().greeting = greeting;
        self
    }

    /// Sets the logger the server and its sessions log to. The default
    /// discards everything; process-wide logging setup stays with the
    /// embedding application.
    pub fn logger(self, logger: slog::Logger) -> Self {
        self.config.lock().unwrap().logger = logger;
        self
    }

    /// Sets the idle session timeout. It also bounds data-connection
    /// dialing, accepting and streaming.
    pub fn idle_session_timeout(self, timeout: Duration) -> Self {
        self.config.lock().unwrap().idle_session_timeout = timeout;
        self
    }

    /// Sets the credential clients authenticate against. An empty
    /// password accepts any password.
    pub fn set_credentials(&self, username: &str, password: &str) {
        let mut config = self.config.lock().unwrap();
        config.username = username.to_string();
        config.password = password.to_string();
    }

    /// Sets the listen port. Accepts both `"2121"` and `":2121"`; an
    /// unparsable value falls back to the default port.
    pub fn set_port(&self, port: &str) {
        let port = port.trim_start_matches(':').parse().unwrap_or(DEFAULT_PORT);
        self.config.lock().unwrap().port = port;
    }

    /// Starts accepting connections in the background. Fails when the
    /// server is already running or the port cannot be bound.
    pub fn start(&self) -> Result<(), ServerError> {
        let mut running = self.running.lock().unwrap();
        if running.is_some() {
            return Err(ServerError::AlreadyRunning);
        }
        let config = self.config.lock().unwrap().clone();

        // Bind synchronously so the caller learns about port clashes here
        // instead of from a log line.
        let std_listener = std::net::TcpListener::bind((Ipv4Addr::UNSPECIFIED, config.port))?;
        std_listener.set_nonblocking(true)?;

        let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
        let shutdown_topic = Arc::new(shutdown::Notifier::new());
        let registry = Arc::new(Registry::default());

        slog::info!(config.logger, "Starting FTP server"; "port" => config.port, "root" => %config.root.display());

        let session_config = control_loop::Config {
            storage: Arc::new(Filesystem::new(config.root)),
            greeting: config.greeting,
            credentials: Credentials {
                username: config.username,
                password: config.password,
            },
            idle_session_timeout: config.idle_session_timeout,
            logger: config.logger.clone(),
        };
        let listener_logger = config.logger.clone();
        let listener_shutdown = Arc::clone(&shutdown_topic);
        let listener_registry = Arc::clone(&registry);
        runtime.spawn(async move {
            let listener = match tokio::net::TcpListener::from_std(std_listener) {
                Ok(listener) => listener,
                Err(err) => {
                    slog::error!(listener_logger, "Could not register listener with the runtime: {}", err);
                    return;
                }
            };
            listener::Listener {
                listener,
                logger: listener_logger,
                config: session_config,
                shutdown_topic: listener_shutdown,
                registry: listener_registry,
            }
            .listen()
            .await;
        });

        *running = Some(Running {
            runtime,
            shutdown_topic,
            registry,
        });
        Ok(())
    }

    /// Stops the server: the listener closes, every live session is torn
    /// down and in-flight transfers observe a connection reset. Stopping
    /// a stopped server is a no-op.
    pub fn stop(&self) -> Result<(), ServerError> {
        let mut running = self.running.lock().unwrap();
        let Running {
            runtime,
            shutdown_topic,
            registry,
        } = match running.take() {
            Some(state) => state,
            None => return Ok(()),
        };

        shutdown_topic.notify();
        registry.abort_all();
        runtime.shutdown_background();
        Ok(())
    }

    /// Whether the server is currently accepting connections.
    pub fn is_running(&self) -> bool {
        self.running.lock().unwrap().is_some()
    }

    /// Best-effort guess of the address LAN clients should use to reach
    /// this server.
    pub fn server_ip(&self) -> String {
        datachan::discover_server_ip()
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}
