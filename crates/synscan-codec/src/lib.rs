//! Synscan hex encoding and command/response framing.
//!
//! Every request is one ASCII line:
//! - a `:` request marker
//! - a command letter and an axis digit
//! - an optional payload in synscan hex (0, 2, 4 or 6 digits)
//! - a `\r` terminator
//!
//! Replies start with `=` (success) or `!` (error). All functions here are
//! pure; nothing in this crate touches the network.

pub mod error;
pub mod frame;
pub mod hex;

pub use error::{CodecError, Result};
pub use frame::{
    encode_command, parse_response, Axis, Response, ERROR_MARKER, PROBE_READY, PROBE_REQUEST,
    REQUEST_MARKER, SUCCESS_MARKER, TERMINATOR,
};
pub use hex::{decode, decode_bytes, encode, DigitWidth, Payload, MAX_PAYLOAD_DIGITS};
