use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{CodecError, Result};
use crate::hex::{decode_bytes, encode, DigitWidth, Payload};

/// Leading byte of every request.
pub const REQUEST_MARKER: u8 = b':';
/// Leading byte of a success reply.
pub const SUCCESS_MARKER: u8 = b'=';
/// Leading byte of an error reply.
pub const ERROR_MARKER: u8 = b'!';
/// Trailing byte of every request and reply.
pub const TERMINATOR: u8 = b'\r';

/// Liveness probe request: "is the motor controller initialized?"
pub const PROBE_REQUEST: &[u8] = b":F3\r";
/// Reply to [`PROBE_REQUEST`] from an initialized controller.
pub const PROBE_READY: &[u8] = b"=\r";

/// A motor axis, addressed on the wire by a single ASCII digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Axis(u8);

impl Axis {
    /// First axis (right ascension / azimuth).
    pub const ONE: Axis = Axis(b'1');
    /// Second axis (declination / altitude).
    pub const TWO: Axis = Axis(b'2');

    /// Build an axis from its wire digit.
    pub fn new(digit: char) -> Result<Self> {
        if digit.is_ascii_digit() {
            Ok(Axis(digit as u8))
        } else {
            Err(CodecError::InvalidAxis(digit))
        }
    }

    /// The wire digit as a byte.
    pub fn as_byte(self) -> u8 {
        self.0
    }
}

impl TryFrom<char> for Axis {
    type Error = CodecError;

    fn try_from(digit: char) -> Result<Self> {
        Axis::new(digit)
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0 as char)
    }
}

/// Encode a request line into `dst`.
///
/// Wire format:
/// ```text
/// ┌─────┬─────────┬──────┬──────────────────┬──────┐
/// │ ':' │ command │ axis │ payload (0-6)    │ '\r' │
/// │     │ letter  │ digit│ synscan hex      │      │
/// └─────┴─────────┴──────┴──────────────────┴──────┘
/// ```
///
/// When `value` is `None` the width is forced to zero. Nothing is written
/// to `dst` unless the whole line is valid.
pub fn encode_command(
    command: char,
    axis: Axis,
    value: Option<u32>,
    width: DigitWidth,
    dst: &mut BytesMut,
) -> Result<()> {
    if !command.is_ascii_alphabetic() {
        return Err(CodecError::InvalidCommand(command));
    }
    let width = if value.is_none() {
        DigitWidth::Zero
    } else {
        width
    };
    let payload = encode(value, width)?;

    dst.reserve(4 + payload.len());
    dst.put_u8(REQUEST_MARKER);
    dst.put_u8(command as u8);
    dst.put_u8(axis.as_byte());
    dst.put_slice(payload.as_bytes());
    dst.put_u8(TERMINATOR);
    Ok(())
}

/// A parsed reply line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// `=` reply with its decoded payload.
    Ok(Payload),
    /// Any reply not starting with `=`.
    Error {
        /// Error code following a `!` marker, when it parses as a number.
        code: Option<u32>,
        /// The reply exactly as received.
        raw: Bytes,
    },
}

/// Classify a reply by its first byte and decode a success payload.
///
/// A success reply has its marker and one trailing `\r` removed; a reply
/// missing the terminator is decoded from everything after the marker. An
/// empty datagram is an error reply. A malformed success payload is a
/// [`CodecError::MalformedPayload`].
pub fn parse_response(raw: &[u8]) -> Result<Response> {
    match raw.first() {
        Some(&SUCCESS_MARKER) => {
            let body = &raw[1..];
            let body = body.strip_suffix(&[TERMINATOR]).unwrap_or(body);
            decode_bytes(body).map(Response::Ok)
        }
        Some(&ERROR_MARKER) => Ok(Response::Error {
            code: error_code(&raw[1..]),
            raw: Bytes::copy_from_slice(raw),
        }),
        _ => Ok(Response::Error {
            code: None,
            raw: Bytes::copy_from_slice(raw),
        }),
    }
}

fn error_code(body: &[u8]) -> Option<u32> {
    let body = body.strip_suffix(&[TERMINATOR]).unwrap_or(body);
    if body.is_empty() || !body.iter().all(u8::is_ascii_digit) {
        return None;
    }
    std::str::from_utf8(body).ok()?.parse().ok()
}
