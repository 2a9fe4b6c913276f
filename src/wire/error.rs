//! Wire codec error types

use thiserror::Error;

use crate::message::FieldType;

/// Wire codec errors
#[derive(Error, Debug)]
pub enum Error {
    /// Frame does not start with the magic constant
    #[error("invalid frame magic: expected {:#010x}, got {found:#010x}", crate::wire::MAGIC)]
    InvalidMagic {
        /// First four bytes of the input, decoded big-endian
        found: i32,
    },

    /// Input ends before the bytes a header declares
    #[error("truncated frame: need {needed} bytes, got {got}")]
    Truncated {
        /// Bytes required to continue decoding
        needed: usize,
        /// Bytes actually available
        got: usize,
    },

    /// A length header decoded to a negative value
    #[error("invalid {context} length: {value}")]
    InvalidLength {
        /// Which length header was malformed
        context: &'static str,
        /// The decoded value
        value: i32,
    },

    /// Message carries a field the frame cannot represent
    #[error("cannot serialize field `{name}` of type {field_type}")]
    NotSerializable {
        /// Offending field name
        name: String,
        /// Offending field type
        field_type: FieldType,
    },

    /// Name or string value bytes are not valid UTF-8
    #[error("invalid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
