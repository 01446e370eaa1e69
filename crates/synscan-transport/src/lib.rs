//! Single-request UDP transport for Skywatcher Synscan motor controllers.
//!
//! A controller answers every datagram with exactly one datagram. This
//! crate owns the socket, sends one request, waits a bounded time for one
//! reply and records whether that round trip succeeded. It performs no
//! retries, no deduplication and no framing checks.
//!
//! This is the lowest layer of synscan. Everything else builds on top of
//! [`UdpTransport`] through the [`Exchange`] trait.

pub mod config;
pub mod error;
pub mod traits;
pub mod udp;

#[cfg(feature = "async")]
pub mod async_udp;

pub use config::{TransportConfig, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_TIMEOUT};
pub use error::{Result, TransportError};
pub use traits::Exchange;
pub use udp::{UdpTransport, MAX_DATAGRAM};

#[cfg(feature = "async")]
pub use async_udp::AsyncUdpTransport;
