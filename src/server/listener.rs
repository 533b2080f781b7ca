//! Listener construction module
//!
//! Builds the TCP listener with socket2 and classifies bind failures so
//! the caller can print the right operator guidance.

use socket2::{Domain, Protocol, Socket, Type};
use std::fmt;
use std::io;
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Bind failure classification
#[derive(Debug)]
pub enum BindError {
    /// The port is already held by another process
    PortInUse { port: u16 },
    /// Any other socket setup or bind failure
    Other(io::Error),
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PortInUse { port } => write!(f, "port {port} is already in use"),
            Self::Other(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for BindError {}

/// Create a TcpListener bound to `addr`.
///
/// SO_REUSEADDR is set so a restart does not trip over TIME_WAIT sockets.
/// SO_REUSEPORT is deliberately not set: a second server instance on the
/// same port must fail with `PortInUse` rather than silently sharing it.
pub fn bind(addr: SocketAddr) -> Result<TcpListener, BindError> {
    create_listener(addr).map_err(|e| {
        if e.kind() == io::ErrorKind::AddrInUse {
            BindError::PortInUse { port: addr.port() }
        } else {
            BindError::Other(e)
        }
    })
}

fn create_listener(addr: SocketAddr) -> io::Result<TcpListener> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_address(true)?;

    // Non-blocking mode for async compatibility
    socket.set_nonblocking(true)?;

    socket.bind(&addr.into())?;
    socket.listen(128)?;

    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bind_ephemeral_port() {
        let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
        let listener = bind(addr).expect("ephemeral bind should succeed");
        assert_ne!(listener.local_addr().unwrap().port(), 0);
    }

    #[tokio::test]
    async fn test_second_bind_reports_port_in_use() {
        let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
        let first = bind(addr).expect("first bind should succeed");
        let held_addr = first.local_addr().unwrap();

        match bind(held_addr) {
            Err(BindError::PortInUse { port }) => assert_eq!(port, held_addr.port()),
            Err(BindError::Other(e)) => panic!("expected PortInUse, got {e}"),
            Ok(_) => panic!("second bind should fail while the first listener is alive"),
        }

        // First listener keeps working after the failed second bind
        assert_eq!(first.local_addr().unwrap(), held_addr);
    }
}
