use std::time::Duration;

use bytes::Bytes;
use synscan_codec::CodecError;
use synscan_transport::TransportError;

/// Errors that can occur during a command round trip.
#[derive(Debug, thiserror::Error)]
pub enum CommError {
    /// The controller did not reply within the wait window.
    #[error("no reply from controller within {0:?}")]
    Timeout(Duration),

    /// The controller replied without the `=` success marker.
    #[error("controller rejected command (reply {raw:?})")]
    Command { code: Option<u32>, raw: Bytes },

    /// A precondition failed before sending, or the reply payload was malformed.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// Transport-level error other than a timeout.
    #[error("transport error: {0}")]
    Transport(TransportError),
}

impl From<TransportError> for CommError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout(waited) => CommError::Timeout(waited),
            other => CommError::Transport(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, CommError>;
