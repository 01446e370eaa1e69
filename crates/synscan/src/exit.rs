use std::fmt;
use std::io;

use synscan_codec::CodecError;
use synscan_comm::CommError;
use synscan_transport::TransportError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
/// The controller answered the probe but is not initialized.
pub const NOT_INITIALIZED: i32 = 30;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
/// The controller replied with an error marker.
pub const COMMAND_REJECTED: i32 = 65;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        // ICMP port unreachable from a previous datagram surfaces here.
        io::ErrorKind::ConnectionRefused => FAILURE,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::AddrNotAvailable | io::ErrorKind::NetworkUnreachable => TRANSPORT_ERROR,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    match err {
        TransportError::Bind { source, .. } | TransportError::Io(source) => {
            io_error(context, source)
        }
        TransportError::Timeout(_) => CliError::new(TIMEOUT, format!("{context}: {err}")),
        TransportError::InvalidTimeout | TransportError::InvalidConfig { .. } => {
            CliError::new(USAGE, format!("{context}: {err}"))
        }
        other => CliError::new(TRANSPORT_ERROR, format!("{context}: {other}")),
    }
}

pub fn codec_error(context: &str, err: CodecError) -> CliError {
    match err {
        CodecError::MalformedPayload { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        other => CliError::new(USAGE, format!("{context}: {other}")),
    }
}

pub fn comm_error(context: &str, err: CommError) -> CliError {
    match err {
        CommError::Timeout(_) => CliError::new(TIMEOUT, format!("{context}: {err}")),
        CommError::Command { .. } => CliError::new(COMMAND_REJECTED, format!("{context}: {err}")),
        CommError::Codec(err) => codec_error(context, err),
        CommError::Transport(err) => transport_error(context, err),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn rejected(reply: &'static str) -> CommError {
        CommError::Command {
            code: None,
            raw: reply.as_bytes().to_vec().into(),
        }
    }

    #[test]
    fn comm_errors_map_to_distinct_codes() {
        assert_eq!(
            comm_error("x", CommError::Timeout(Duration::from_secs(2))).code,
            TIMEOUT
        );
        assert_eq!(comm_error("x", rejected("!0\r")).code, COMMAND_REJECTED);
        assert_eq!(
            comm_error(
                "x",
                CommError::Codec(CodecError::MalformedPayload {
                    payload: "12345".to_string(),
                    reason: "bad length",
                })
            )
            .code,
            DATA_INVALID
        );
        assert_eq!(
            comm_error("x", CommError::Codec(CodecError::InvalidWidth(3))).code,
            USAGE
        );
    }

    #[test]
    fn transport_config_errors_are_usage() {
        let err = TransportError::InvalidConfig {
            key: "SYNSCAN_UDP_PORT",
            value: "x".to_string(),
        };
        assert_eq!(transport_error("x", err).code, USAGE);
    }
}
