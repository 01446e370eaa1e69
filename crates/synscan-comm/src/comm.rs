use bytes::{Bytes, BytesMut};
use synscan_codec::{
    encode_command, parse_response, Axis, DigitWidth, Payload, Response, PROBE_READY,
    PROBE_REQUEST,
};
use synscan_transport::{Exchange, TransportConfig, UdpTransport};
use tracing::{debug, info, warn};

use crate::error::{CommError, Result};

/// Command-level access to one motor controller.
///
/// Each call is one blocking round trip: encode, send, wait, decode. No
/// state survives between calls except the transport's `last_ok` flag.
pub struct SynscanComm<T = UdpTransport> {
    transport: T,
}

impl SynscanComm<UdpTransport> {
    /// Bind a UDP transport for `config` and wrap it.
    pub fn bind(config: &TransportConfig) -> Result<Self> {
        Ok(Self::new(UdpTransport::bind(config)?))
    }

    /// Bind using `SYNSCAN_UDP_IP`, `SYNSCAN_UDP_PORT` and `SYNSCAN_TIMEOUT`.
    pub fn from_env() -> Result<Self> {
        Self::bind(&TransportConfig::from_env()?)
    }
}

impl<T: Exchange> SynscanComm<T> {
    /// Wrap an existing transport.
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Send one command and decode the controller's reply.
    ///
    /// `value` is encoded with `width` hex digits; without a value the
    /// request carries no payload whatever `width` says. Precondition
    /// failures are reported before anything is sent.
    pub fn send_command(
        &mut self,
        command: char,
        axis: Axis,
        value: Option<u32>,
        width: DigitWidth,
    ) -> Result<Payload> {
        let request = build_request(command, axis, value, width)?;
        let reply = self.transport.exchange(&request)?;
        interpret_reply(&reply)
    }

    /// Send a pre-framed request and return the reply verbatim.
    pub fn send_raw(&mut self, request: &[u8]) -> Result<Bytes> {
        Ok(self.transport.exchange(request)?)
    }

    /// Ask the controller whether it has finished initializing.
    ///
    /// Any reply other than the bare success line means "not initialized"
    /// and is not an error. No reply at all is still a [`CommError::Timeout`].
    pub fn test_comm(&mut self) -> Result<bool> {
        info!("testing comms, asking if initialized");
        let reply = self.transport.exchange(PROBE_REQUEST)?;
        Ok(probe_ready(&reply))
    }

    /// Whether the most recent round trip produced a reply.
    pub fn last_ok(&self) -> bool {
        self.transport.last_ok()
    }

    /// Borrow the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Consume the wrapper and return the transport.
    pub fn into_inner(self) -> T {
        self.transport
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for SynscanComm<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SynscanComm")
            .field("transport", &self.transport)
            .finish()
    }
}

pub(crate) fn build_request(
    command: char,
    axis: Axis,
    value: Option<u32>,
    width: DigitWidth,
) -> Result<Bytes> {
    let mut buf = BytesMut::with_capacity(12);
    encode_command(command, axis, value, width, &mut buf)?;
    debug!(request = ?String::from_utf8_lossy(&buf), "sending cmd");
    Ok(buf.freeze())
}

pub(crate) fn interpret_reply(reply: &[u8]) -> Result<Payload> {
    match parse_response(reply)? {
        Response::Ok(payload) => Ok(payload),
        Response::Error { code, raw } => {
            warn!(?code, response = ?String::from_utf8_lossy(&raw), "controller rejected command");
            Err(CommError::Command { code, raw })
        }
    }
}

pub(crate) fn probe_ready(reply: &[u8]) -> bool {
    let ready = reply == PROBE_READY;
    if ready {
        info!("mount initialized, connection OK");
    } else {
        info!(response = ?String::from_utf8_lossy(reply), "mount not initialized");
    }
    ready
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::time::Duration;

    use synscan_codec::CodecError;
    use synscan_transport::TransportError;

    use super::*;

    /// Replays canned replies and records every request.
    #[derive(Default)]
    struct ScriptedTransport {
        replies: VecDeque<synscan_transport::Result<Bytes>>,
        requests: Vec<Vec<u8>>,
        last_ok: bool,
    }

    impl ScriptedTransport {
        fn replying(replies: &[&'static str]) -> Self {
            Self {
                replies: replies
                    .iter()
                    .map(|&r| Ok(Bytes::from_static(r.as_bytes())))
                    .collect(),
                ..Self::default()
            }
        }

        fn timing_out() -> Self {
            let mut transport = Self::default();
            transport
                .replies
                .push_back(Err(TransportError::Timeout(Duration::from_secs(2))));
            transport
        }
    }

    impl Exchange for ScriptedTransport {
        fn exchange(&mut self, request: &[u8]) -> synscan_transport::Result<Bytes> {
            self.requests.push(request.to_vec());
            let reply = self
                .replies
                .pop_front()
                .unwrap_or(Err(TransportError::Timeout(Duration::from_secs(2))));
            self.last_ok = reply.is_ok();
            reply
        }

        fn last_ok(&self) -> bool {
            self.last_ok
        }
    }

    #[test]
    fn send_command_frames_request_and_decodes_value() {
        let mut comm = SynscanComm::new(ScriptedTransport::replying(&["=89CA1F\r"]));
        let payload = comm
            .send_command('j', Axis::ONE, None, DigitWidth::Six)
            .unwrap();

        assert_eq!(payload, Payload::Value(0x1FCA89));
        assert_eq!(comm.transport().requests, vec![b":j1\r".to_vec()]);
        assert!(comm.last_ok());
    }

    #[test]
    fn send_command_encodes_payload_in_synscan_hex() {
        let mut comm = SynscanComm::new(ScriptedTransport::replying(&["=\r"]));
        let payload = comm
            .send_command('S', Axis::TWO, Some(0x5F3A), DigitWidth::Four)
            .unwrap();

        assert_eq!(payload, Payload::Empty);
        assert_eq!(comm.transport().requests, vec![b":S23A5F\r".to_vec()]);
    }

    #[test]
    fn send_command_returns_status_string() {
        let mut comm = SynscanComm::new(ScriptedTransport::replying(&["=101\r"]));
        let payload = comm
            .send_command('f', Axis::ONE, None, DigitWidth::Zero)
            .unwrap();
        assert_eq!(payload.as_status(), Some("101"));
    }

    #[test]
    fn error_marker_is_command_error_with_raw_reply() {
        let mut comm = SynscanComm::new(ScriptedTransport::replying(&["!3\r"]));
        let err = comm
            .send_command('G', Axis::ONE, Some(0x30), DigitWidth::Two)
            .unwrap_err();

        match err {
            CommError::Command { code, raw } => {
                assert_eq!(code, Some(3));
                assert_eq!(raw.as_ref(), b"!3\r");
            }
            other => panic!("expected command error, got {other:?}"),
        }
        // The round trip itself worked; only the controller said no.
        assert!(comm.last_ok());
    }

    #[test]
    fn unknown_marker_is_command_error() {
        let mut comm = SynscanComm::new(ScriptedTransport::replying(&["?\r"]));
        let err = comm
            .send_command('j', Axis::ONE, None, DigitWidth::Six)
            .unwrap_err();
        assert!(matches!(err, CommError::Command { code: None, .. }));
    }

    #[test]
    fn malformed_success_payload_is_codec_error() {
        let mut comm = SynscanComm::new(ScriptedTransport::replying(&["=12345\r"]));
        let err = comm
            .send_command('j', Axis::ONE, None, DigitWidth::Six)
            .unwrap_err();
        assert!(matches!(
            err,
            CommError::Codec(CodecError::MalformedPayload { .. })
        ));
    }

    #[test]
    fn precondition_failure_sends_nothing() {
        let mut comm = SynscanComm::new(ScriptedTransport::replying(&["=\r"]));
        let err = comm
            .send_command('S', Axis::ONE, Some(0x1_0000), DigitWidth::Four)
            .unwrap_err();

        assert!(matches!(
            err,
            CommError::Codec(CodecError::ValueTooWide { .. })
        ));
        assert!(comm.transport().requests.is_empty());
    }

    #[test]
    fn timeout_surfaces_as_comm_timeout() {
        let mut comm = SynscanComm::new(ScriptedTransport::timing_out());
        let err = comm
            .send_command('j', Axis::ONE, None, DigitWidth::Six)
            .unwrap_err();

        assert!(matches!(err, CommError::Timeout(d) if d == Duration::from_secs(2)));
        assert!(!comm.last_ok());
    }

    #[test]
    fn test_comm_reports_initialized() {
        let mut comm = SynscanComm::new(ScriptedTransport::replying(&["=\r"]));
        assert!(comm.test_comm().unwrap());
        assert_eq!(comm.transport().requests, vec![b":F3\r".to_vec()]);
    }

    #[test]
    fn test_comm_other_reply_is_not_initialized() {
        let mut comm = SynscanComm::new(ScriptedTransport::replying(&["!0\r", "=000000\r"]));
        assert!(!comm.test_comm().unwrap());
        assert!(!comm.test_comm().unwrap());
    }

    #[test]
    fn test_comm_timeout_is_error() {
        let mut comm = SynscanComm::new(ScriptedTransport::timing_out());
        assert!(matches!(comm.test_comm(), Err(CommError::Timeout(_))));
    }

    #[test]
    fn comm_over_borrowed_transport() {
        let mut transport = ScriptedTransport::replying(&["=B8\r"]);
        let payload = SynscanComm::new(&mut transport)
            .send_command('e', Axis::ONE, None, DigitWidth::Six)
            .unwrap();
        assert_eq!(payload.value(), Some(0xB8));
        assert_eq!(transport.requests.len(), 1);
    }

    #[test]
    fn udp_round_trip_against_local_controller() {
        let controller = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();
        let port = controller.local_addr().unwrap().port();
        let responder = std::thread::spawn(move || {
            let mut buf = [0u8; 64];
            let (n, from) = controller.recv_from(&mut buf).unwrap();
            assert_eq!(&buf[..n], b":j2\r");
            controller.send_to(b"=563412\r", from).unwrap();
        });

        let config =
            TransportConfig::new("127.0.0.1", port).with_timeout(Duration::from_millis(500));
        let mut comm = SynscanComm::bind(&config).unwrap();
        let payload = comm
            .send_command('j', Axis::TWO, None, DigitWidth::Six)
            .unwrap();

        assert_eq!(payload, Payload::Value(0x123456));
        assert!(comm.last_ok());
        responder.join().unwrap();
    }

    #[derive(Clone, Default)]
    struct CapturedLog(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn bind_logs_target_once() {
        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let config = TransportConfig::new("127.0.0.1", 9);
            SynscanComm::bind(&config).unwrap();
        });

        let output = String::from_utf8(log.0.lock().unwrap().clone()).unwrap();
        assert_eq!(output.matches("UDP target").count(), 1, "{output}");
    }
}
