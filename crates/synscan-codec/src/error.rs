/// Errors that can occur while encoding or decoding synscan messages.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// The requested digit count is not one of 0, 2, 4 or 6.
    #[error("digit width must be one of 0, 2, 4, 6 (got {0})")]
    InvalidWidth(usize),

    /// The value needs more hex digits than the requested width.
    #[error("value {value:#X} does not fit in {width} hex digits")]
    ValueTooWide { value: u32, width: usize },

    /// A non-zero width was requested without a value to encode.
    #[error("no value given for a {width}-digit payload")]
    MissingValue { width: usize },

    /// The command identifier is not a single ASCII letter.
    #[error("command must be a single ASCII letter (got {0:?})")]
    InvalidCommand(char),

    /// The axis identifier is not a single ASCII digit.
    #[error("axis must be a single ASCII digit (got {0:?})")]
    InvalidAxis(char),

    /// A received payload cannot be decoded.
    #[error("malformed payload {payload:?}: {reason}")]
    MalformedPayload {
        payload: String,
        reason: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, CodecError>;
