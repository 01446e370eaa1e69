use std::net::SocketAddr;
use std::time::Duration;

use bytes::Bytes;
use tokio::net::UdpSocket;
use tracing::{debug, info};

use crate::config::TransportConfig;
use crate::error::{Result, TransportError};
use crate::udp::{check_timeout, unspecified_for, MAX_DATAGRAM};

/// Tokio flavour of [`UdpTransport`](crate::UdpTransport).
///
/// Same single-outstanding-request discipline, same reply handling and the
/// same `last_ok` flag; only the wait is an `await` instead of a block.
pub struct AsyncUdpTransport {
    socket: UdpSocket,
    endpoint: SocketAddr,
    timeout: Duration,
    last_ok: bool,
}

impl AsyncUdpTransport {
    /// Resolve the configured endpoint and bind a local datagram socket.
    pub async fn bind(config: &TransportConfig) -> Result<Self> {
        check_timeout(config.timeout)?;

        let endpoint_str = config.endpoint();
        let endpoint = tokio::net::lookup_host((config.host.as_str(), config.port))
            .await
            .map_err(|e| TransportError::Resolve {
                endpoint: endpoint_str.clone(),
                reason: e.to_string(),
            })?
            .next()
            .ok_or_else(|| TransportError::Resolve {
                endpoint: endpoint_str,
                reason: "no addresses found".to_string(),
            })?;

        let local = unspecified_for(&endpoint);
        let socket = UdpSocket::bind(local)
            .await
            .map_err(|e| TransportError::Bind {
                addr: local.to_string(),
                source: e,
            })?;

        info!(%endpoint, "UDP target");

        Ok(Self {
            socket,
            endpoint,
            timeout: config.timeout,
            last_ok: false,
        })
    }

    /// Send one datagram and wait for one reply using the configured timeout.
    pub async fn send_raw(&mut self, msg: &[u8]) -> Result<Bytes> {
        self.send_raw_with_timeout(msg, self.timeout).await
    }

    /// Send one datagram and wait up to `timeout` for one reply.
    pub async fn send_raw_with_timeout(&mut self, msg: &[u8], timeout: Duration) -> Result<Bytes> {
        check_timeout(timeout)?;

        let result = self.round_trip(msg, timeout).await;
        self.last_ok = result.is_ok();
        result
    }

    async fn round_trip(&self, msg: &[u8], timeout: Duration) -> Result<Bytes> {
        debug!(request = ?String::from_utf8_lossy(msg), endpoint = %self.endpoint, "sending datagram");
        self.socket.send_to(msg, self.endpoint).await?;

        match tokio::time::timeout(timeout, self.recv_from_endpoint()).await {
            Ok(Ok(reply)) => Ok(reply),
            Ok(Err(err)) => Err(TransportError::Io(err)),
            Err(_) => {
                debug!(?timeout, "socket timeout without response");
                Err(TransportError::Timeout(timeout))
            }
        }
    }

    async fn recv_from_endpoint(&self) -> std::io::Result<Bytes> {
        let mut buf = [0u8; MAX_DATAGRAM];
        loop {
            let (n, from) = self.socket.recv_from(&mut buf).await?;
            if from != self.endpoint {
                debug!(%from, len = n, "dropping datagram from unexpected sender");
                continue;
            }
            let reply = Bytes::copy_from_slice(&buf[..n]);
            debug!(response = ?String::from_utf8_lossy(&reply), %from, "received datagram");
            return Ok(reply);
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
}

impl std::fmt::Debug for AsyncUdpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncUdpTransport")
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .field("last_ok", &self.last_ok)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn round_trip_and_timeout_track_flag() {
        let controller = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let port = controller.local_addr().unwrap().port();
        let config =
            TransportConfig::new("127.0.0.1", port).with_timeout(Duration::from_millis(200));
        let mut transport = AsyncUdpTransport::bind(&config).await.unwrap();

        let err = transport.send_raw(b":F1\r").await.unwrap_err();
        assert!(matches!(err, TransportError::Timeout(_)));
        assert!(!transport.last_ok());

        let responder = tokio::spawn(async move {
            let mut buf = [0u8; MAX_DATAGRAM];
            // First datagram is the timed-out request; answer the second.
            let _ = controller.recv_from(&mut buf).await.unwrap();
            let (n, from) = controller.recv_from(&mut buf).await.unwrap();
            assert_eq!(&buf[..n], b":F3\r");
            controller.send_to(b"=\r", from).await.unwrap();
        });

        let reply = transport.send_raw(b":F3\r").await.unwrap();
        assert_eq!(reply.as_ref(), b"=\r");
        assert!(transport.last_ok());
        responder.await.unwrap();
    }
}
