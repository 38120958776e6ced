use std::fmt;

/// Errors produced while transcoding contract call data and return data.
///
/// Every decode path reports one of these instead of panicking, so a
/// malformed node response surfaces as a "bad on-chain response".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The output holds fewer bytes than the layout requires.
    OutputTooShort { expected: usize, actual: usize },
    /// A dynamic offset points outside the output.
    OffsetOutOfBounds { offset: u64, len: usize },
    /// A dynamic array's declared length runs past the end of the output.
    ArrayOutOfBounds { length: u64, len: usize },
    /// A word does not fit the integer type it is decoded into.
    ValueOverflow { field: &'static str },
    /// A boolean word carries bits outside its low byte.
    InvalidBool,
    /// A hex string could not be decoded.
    InvalidHex(String),
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutputTooShort { expected, actual } => {
                write!(f, "need at least {} bytes, got {}", expected, actual)
            }
            Self::OffsetOutOfBounds { offset, len } => {
                write!(f, "invalid offset {} for output of {} bytes", offset, len)
            }
            Self::ArrayOutOfBounds { length, len } => {
                write!(f, "array length {} exceeds output of {} bytes", length, len)
            }
            Self::ValueOverflow { field } => write!(f, "{} does not fit its integer type", field),
            Self::InvalidBool => write!(f, "invalid boolean word"),
            Self::InvalidHex(e) => write!(f, "invalid hex: {}", e),
        }
    }
}

impl std::error::Error for CodecError {}
