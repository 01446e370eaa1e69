use bytes::Bytes;
use synscan_codec::{Axis, DigitWidth, Payload, PROBE_REQUEST};
use synscan_transport::{AsyncUdpTransport, TransportConfig};
use tracing::info;

use crate::comm::{build_request, interpret_reply, probe_ready};
use crate::error::Result;

/// Tokio flavour of [`SynscanComm`](crate::SynscanComm).
///
/// One request in flight at a time, enforced by `&mut self`.
#[derive(Debug)]
pub struct AsyncSynscanComm {
    transport: AsyncUdpTransport,
}

impl AsyncSynscanComm {
    /// Bind an async UDP transport for `config` and wrap it.
    pub async fn bind(config: &TransportConfig) -> Result<Self> {
        Ok(Self::new(AsyncUdpTransport::bind(config).await?))
    }

    /// Wrap an existing transport.
    pub fn new(transport: AsyncUdpTransport) -> Self {
        Self { transport }
    }

    /// Send one command and decode the controller's reply.
    pub async fn send_command(
        &mut self,
        command: char,
        axis: Axis,
        value: Option<u32>,
        width: DigitWidth,
    ) -> Result<Payload> {
        let request = build_request(command, axis, value, width)?;
        let reply = self.transport.send_raw(&request).await?;
        interpret_reply(&reply)
    }

    /// Send a pre-framed request and return the reply verbatim.
    pub async fn send_raw(&mut self, request: &[u8]) -> Result<Bytes> {
        Ok(self.transport.send_raw(request).await?)
    }

    /// Ask the controller whether it has finished initializing.
    pub async fn test_comm(&mut self) -> Result<bool> {
        info!("testing comms, asking if initialized");
        let reply = self.transport.send_raw(PROBE_REQUEST).await?;
        Ok(probe_ready(&reply))
    }

    /// Whether the most recent round trip produced a reply.
    pub fn last_ok(&self) -> bool {
        self.transport.last_ok()
    }
}
