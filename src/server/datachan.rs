//! The FTP *data* channel: one short-lived TCP connection per transfer,
//! set up in active (PORT/EPRT) or passive (PASV/EPSV) mode.

use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};

/// How long a LIST/NLST waits for the client to connect in passive mode.
/// File transfers wait the full session timeout instead.
pub(crate) const LIST_ACCEPT_TIMEOUT: Duration = Duration::from_secs(15);

/// The session's pending data connection. PORT/EPRT/PASV/EPSV store one of
/// these; the transfer handler takes it out and turns it into a socket.
/// Replacing or dropping an endpoint releases its listener or socket.
#[derive(Debug)]
pub(crate) enum DataEndpoint {
    /// Remote address announced by PORT/EPRT; dialed at transfer time.
    Active { peer: SocketAddr },
    /// Bound listener announced by PASV/EPSV, awaiting one connection.
    PassivePending { listener: TcpListener },
    /// An already-established data socket.
    Connected { socket: TcpStream },
}

impl DataEndpoint {
    /// Materializes the connected data socket, consuming the endpoint. The
    /// caller owns the socket exclusively for the duration of the transfer.
    pub async fn open(self, bound: Duration) -> io::Result<TcpStream> {
        match self {
            DataEndpoint::Active { peer } => match tokio::time::timeout(bound, TcpStream::connect(peer)).await {
                Ok(result) => result,
                Err(_) => Err(io::Error::new(io::ErrorKind::TimedOut, "data connection dial timed out")),
            },
            DataEndpoint::PassivePending { listener } => match tokio::time::timeout(bound, listener.accept()).await {
                Ok(result) => result.map(|(socket, _)| socket),
                Err(_) => Err(io::Error::new(io::ErrorKind::TimedOut, "data connection accept timed out")),
            },
            DataEndpoint::Connected { socket } => Ok(socket),
        }
    }
}

/// Binds a fresh passive-mode listener on an ephemeral port on all
/// interfaces.
pub(crate) async fn bind_passive() -> io::Result<TcpListener> {
    TcpListener::bind((Ipv4Addr::UNSPECIFIED, 0)).await
}

/// Picks the IPv4 address to put in a PASV announcement: the address the
/// client reached us on, unless that is loopback or a wildcard bind, in
/// which case the first up, non-loopback, private interface address wins.
pub(crate) fn advertised_host(control_local: SocketAddr) -> Ipv4Addr {
    match control_local.ip() {
        IpAddr::V4(ip) if !ip.is_loopback() && !ip.is_unspecified() => ip,
        IpAddr::V4(ip) => first_private_ipv4().unwrap_or(ip),
        IpAddr::V6(_) => first_private_ipv4().unwrap_or(Ipv4Addr::LOCALHOST),
    }
}

fn first_private_ipv4() -> Option<Ipv4Addr> {
    let interfaces = if_addrs::get_if_addrs().ok()?;
    interfaces.into_iter().find_map(|iface| {
        if iface.is_loopback() {
            return None;
        }
        match iface.ip() {
            IpAddr::V4(ip) if ip.is_private() => Some(ip),
            _ => None,
        }
    })
}

/// Best-effort guess of the address clients on the LAN should use to reach
/// this host. Routing a UDP socket toward a public resolver reveals the
/// outbound interface without sending a packet; the interface walk is the
/// fallback for hosts without a default route.
pub(crate) fn discover_server_ip() -> String {
    let via_route = std::net::UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))
        .and_then(|socket| {
            socket.connect(("8.8.8.8", 53))?;
            socket.local_addr()
        })
        .map(|addr| addr.ip());
    match via_route {
        Ok(ip) if !ip.is_loopback() && !ip.is_unspecified() => ip.to_string(),
        _ => first_private_ipv4().map(|ip| ip.to_string()).unwrap_or_else(|| "localhost".to_string()),
    }
}
