use std::io::ErrorKind;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs, UdpSocket};
use std::time::{Duration, Instant};

use bytes::Bytes;
use tracing::{debug, info};

use crate::config::TransportConfig;
use crate::error::{Result, TransportError};
use crate::traits::Exchange;

/// Largest reply datagram accepted from a controller.
pub const MAX_DATAGRAM: usize = 1024;

/// Blocking UDP transport to a single controller endpoint.
///
/// The local socket is bound to an ephemeral port and released on drop.
/// Only one request may be outstanding at a time; `&mut self` on the send
/// methods enforces that. A late reply to an earlier, timed-out request
/// that arrives inside a later wait window is returned to the later caller.
/// Datagrams from any address other than the endpoint are dropped.
pub struct UdpTransport {
    socket: UdpSocket,
    endpoint: SocketAddr,
    timeout: Duration,
    last_ok: bool,
}

impl UdpTransport {
    /// Resolve the configured endpoint and bind a local datagram socket.
    pub fn bind(config: &TransportConfig) -> Result<Self> {
        check_timeout(config.timeout)?;

        let endpoint = resolve(config)?;
        let local = unspecified_for(&endpoint);
        let socket = UdpSocket::bind(local).map_err(|e| TransportError::Bind {
            addr: local.to_string(),
            source: e,
        })?;

        info!(%endpoint, "UDP target");
        debug!(local = ?socket.local_addr().ok(), "bound local datagram socket");

        Ok(Self {
            socket,
            endpoint,
            timeout: config.timeout,
            last_ok: false,
        })
    }

    /// Send one datagram and wait for one reply using the configured timeout.
    pub fn send_raw(&mut self, msg: &[u8]) -> Result<Bytes> {
        self.send_raw_with_timeout(msg, self.timeout)
    }

    /// Send one datagram and wait up to `timeout` for one reply.
    ///
    /// The reply is returned verbatim, without any framing checks. Every
    /// attempt that reaches the network updates [`last_ok`](Self::last_ok).
    pub fn send_raw_with_timeout(&mut self, msg: &[u8], timeout: Duration) -> Result<Bytes> {
        check_timeout(timeout)?;

        let result = self.round_trip(msg, timeout);
        self.last_ok = result.is_ok();
        result
    }

    fn round_trip(&self, msg: &[u8], timeout: Duration) -> Result<Bytes> {
        debug!(request = ?String::from_utf8_lossy(msg), endpoint = %self.endpoint, "sending datagram");
        self.socket.send_to(msg, self.endpoint)?;

        let deadline = Instant::now()
            .checked_add(timeout)
            .ok_or(TransportError::InvalidTimeout)?;
        let mut buf = [0u8; MAX_DATAGRAM];
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                debug!(?timeout, "socket timeout without response");
                return Err(TransportError::Timeout(timeout));
            }
            self.socket.set_read_timeout(Some(remaining))?;

            match self.socket.recv_from(&mut buf) {
                Ok((n, from)) if from != self.endpoint => {
                    debug!(%from, len = n, "dropping datagram from unexpected sender");
                }
                Ok((n, from)) => {
                    let reply = Bytes::copy_from_slice(&buf[..n]);
                    debug!(response = ?String::from_utf8_lossy(&reply), %from, "received datagram");
                    return Ok(reply);
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                    debug!(?timeout, "socket timeout without response");
                    return Err(TransportError::Timeout(timeout));
                }
                Err(err) => return Err(TransportError::Io(err)),
            }
        }
    }

    /// Whether the most recent round trip produced a reply.
    pub fn last_ok(&self) -> bool {
        self.last_ok
    }

    /// The resolved controller endpoint.
    pub fn endpoint(&self) -> SocketAddr {
        self.endpoint
    }

    /// The ephemeral local address the socket is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.socket.local_addr().map_err(Into::into)
    }

    /// Default wait window for [`send_raw`](Self::send_raw).
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Exchange for UdpTransport {
    fn exchange(&mut self, request: &[u8]) -> Result<Bytes> {
        self.send_raw(request)
    }

    fn last_ok(&self) -> bool {
        self.last_ok
    }
}

impl std::fmt::Debug for UdpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UdpTransport")
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .field("last_ok", &self.last_ok)
            .finish()
    }
}

/// Reject wait windows that are zero or too long to form a deadline.
pub(crate) fn check_timeout(timeout: Duration) -> Result<()> {
    if timeout.is_zero() || Instant::now().checked_add(timeout).is_none() {
        return Err(TransportError::InvalidTimeout);
    }
    Ok(())
}

/// Resolve the configured endpoint to its first socket address.
pub(crate) fn resolve(config: &TransportConfig) -> Result<SocketAddr> {
    let endpoint = config.endpoint();
    let mut addrs = (config.host.as_str(), config.port)
        .to_socket_addrs()
        .map_err(|e| TransportError::Resolve {
            endpoint: endpoint.clone(),
            reason: e.to_string(),
        })?;
    addrs.next().ok_or_else(|| TransportError::Resolve {
        endpoint,
        reason: "no addresses found".to_string(),
    })
}

/// Wildcard address of the same family as `endpoint`, ephemeral port.
pub(crate) fn unspecified_for(endpoint: &SocketAddr) -> SocketAddr {
    match endpoint {
        SocketAddr::V4(_) => SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0)),
        SocketAddr::V6(_) => SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0)),
    }
}
