use std::time::Duration;

/// Errors that can occur in UDP transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to bind the local datagram socket.
    #[error("failed to bind local socket {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    /// The controller endpoint could not be resolved to a socket address.
    #[error("failed to resolve {endpoint}: {reason}")]
    Resolve { endpoint: String, reason: String },

    /// An I/O error occurred while sending or receiving a datagram.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No reply datagram arrived within the wait window.
    #[error("no reply within {0:?}")]
    Timeout(Duration),

    /// A wait window that is zero or too long to form a deadline.
    #[error("timeout must be greater than zero and fit a deadline")]
    InvalidTimeout,

    /// A configuration value could not be parsed.
    #[error("invalid value for {key}: {value:?}")]
    InvalidConfig { key: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, TransportError>;
