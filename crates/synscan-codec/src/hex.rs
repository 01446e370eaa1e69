//! Synscan hex: the protocol's byte-group-reversed ASCII hex.
//!
//! Multi-byte values travel least significant byte first, but each byte is
//! still written as two hex digits in natural order:
//!
//! ```text
//! 0x123456  ->  "56" "34" "12"  ->  "563412"
//! 0x1234    ->  "34" "12"       ->  "3412"
//! 0x12      ->  "12"            ->  "12"
//! ```
//!
//! The swap works on 2-character groups of the zero-padded hex string, not
//! on the integer's bytes. A 3-digit payload is a status bitfield and is
//! never interpreted numerically.

use std::fmt;

use tracing::debug;

use crate::error::{CodecError, Result};

/// Longest payload a controller sends, in hex digits.
pub const MAX_PAYLOAD_DIGITS: usize = 6;

/// Length of the status bitfield payload, in hex digits.
pub const STATUS_DIGITS: usize = 3;

/// Number of hex digits an encoded value occupies on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DigitWidth {
    /// No payload.
    Zero,
    /// One byte.
    Two,
    /// Two bytes, low byte first.
    Four,
    /// Three bytes, low byte first.
    #[default]
    Six,
}

impl DigitWidth {
    /// Digit count on the wire.
    pub const fn digits(self) -> usize {
        match self {
            DigitWidth::Zero => 0,
            DigitWidth::Two => 2,
            DigitWidth::Four => 4,
            DigitWidth::Six => 6,
        }
    }

    /// Largest value representable in this width.
    pub const fn max_value(self) -> u32 {
        match self {
            DigitWidth::Zero => 0,
            DigitWidth::Two => 0xFF,
            DigitWidth::Four => 0xFFFF,
            DigitWidth::Six => 0xFF_FFFF,
        }
    }
}

impl TryFrom<usize> for DigitWidth {
    type Error = CodecError;

    fn try_from(digits: usize) -> Result<Self> {
        match digits {
            0 => Ok(DigitWidth::Zero),
            2 => Ok(DigitWidth::Two),
            4 => Ok(DigitWidth::Four),
            6 => Ok(DigitWidth::Six),
            other => Err(CodecError::InvalidWidth(other)),
        }
    }
}

impl fmt::Display for DigitWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.digits())
    }
}

/// A decoded reply payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// The reply carried no data. Distinct from `Value(0)`.
    Empty,
    /// A 2, 4 or 6 digit integer.
    Value(u32),
    /// A 3 digit status bitfield, exactly as received.
    Status(String),
}

impl Payload {
    /// The integer value, if this payload carries one.
    pub fn value(&self) -> Option<u32> {
        match self {
            Payload::Value(v) => Some(*v),
            _ => None,
        }
    }

    /// The raw status digits, if this is a status payload.
    pub fn as_status(&self) -> Option<&str> {
        match self {
            Payload::Status(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Payload::Empty)
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Empty => Ok(()),
            Payload::Value(v) => write!(f, "{v}"),
            Payload::Status(s) => f.write_str(s),
        }
    }
}

/// Encode `value` as synscan hex of the given width.
///
/// An absent value is only valid with [`DigitWidth::Zero`]. A value that
/// does not fit in `width` digits is rejected with
/// [`CodecError::ValueTooWide`] rather than truncated.
pub fn encode(value: Option<u32>, width: DigitWidth) -> Result<String> {
    let value = match (value, width) {
        (None, DigitWidth::Zero) => return Ok(String::new()),
        (None, width) => {
            return Err(CodecError::MissingValue {
                width: width.digits(),
            })
        }
        (Some(value), DigitWidth::Zero) => {
            return Err(CodecError::ValueTooWide { value, width: 0 })
        }
        (Some(value), width) if value > width.max_value() => {
            return Err(CodecError::ValueTooWide {
                value,
                width: width.digits(),
            })
        }
        (Some(value), _) => value,
    };

    let natural = format!("{value:0digits$X}", digits = width.digits());
    let wire = reverse_groups(natural.as_bytes());
    debug!(value, hex = %natural, synscan = %wire, "encoded synscan hex");
    Ok(wire)
}

/// Decode a synscan hex payload.
///
/// - 0 digits: [`Payload::Empty`]
/// - 3 digits: [`Payload::Status`], returned unchanged
/// - 2, 4 or 6 digits: [`Payload::Value`]
/// - anything else: [`CodecError::MalformedPayload`]
pub fn decode(payload: &str) -> Result<Payload> {
    if !payload.is_ascii() {
        return Err(malformed(payload, "payload is not ASCII"));
    }

    match payload.len() {
        0 => Ok(Payload::Empty),
        STATUS_DIGITS => {
            debug!(status = payload, "status payload, not converting to integer");
            Ok(Payload::Status(payload.to_string()))
        }
        2 | 4 | 6 => {
            if !payload.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(malformed(payload, "payload is not hexadecimal"));
            }
            let natural = reverse_groups(payload.as_bytes());
            let value = u32::from_str_radix(&natural, 16)
                .map_err(|_| malformed(payload, "payload is not hexadecimal"))?;
            debug!(synscan = payload, hex = %natural, value, "decoded synscan hex");
            Ok(Payload::Value(value))
        }
        len if len > MAX_PAYLOAD_DIGITS => {
            Err(malformed(payload, "payload longer than 6 hex digits"))
        }
        _ => Err(malformed(payload, "payload length must be 0, 2, 3, 4 or 6")),
    }
}

/// Decode a payload received as raw bytes.
pub fn decode_bytes(payload: &[u8]) -> Result<Payload> {
    match std::str::from_utf8(payload) {
        Ok(text) => decode(text),
        Err(_) => Err(CodecError::MalformedPayload {
            payload: String::from_utf8_lossy(payload).into_owned(),
            reason: "payload is not ASCII",
        }),
    }
}

/// Emit 2-character groups from the end of `digits` toward the start.
///
/// The operation is its own inverse for even-length input.
fn reverse_groups(digits: &[u8]) -> String {
    let mut out = String::with_capacity(digits.len());
    for group in digits.rchunks(2) {
        out.extend(group.iter().map(|&b| b as char));
    }
    out
}

fn malformed(payload: &str, reason: &'static str) -> CodecError {
    CodecError::MalformedPayload {
        payload: payload.to_string(),
        reason,
    }
}
