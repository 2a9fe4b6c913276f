//! Binary wire format
//!
//! This module provides the endian-neutral primitive codec, the framed
//! message codec, and the serialized-data carrier.

mod codec;
mod error;
pub mod pack;
mod serdata;

pub use codec::{decode, encode, verify, BinSerializer, MessageSerializer};
pub use error::{Error, Result};
pub use serdata::SerializedData;

/// Frame magic: the first four bytes of every serialized message,
/// as a signed 32-bit big-endian integer
pub const MAGIC: i32 = 0x3E3E_3E3D;

/// Fixed overhead of a message frame: magic, total length, name length,
/// and field count, four bytes each
pub const MESSAGE_FIXED_LEN: usize = 16;

/// Fixed overhead of a field sub-frame: total length, name length, type
/// tag, and value length, four bytes each
pub const FIELD_FIXED_LEN: usize = 16;

/// Frames whose computed length does not exceed this are not emitted
pub const MIN_FRAME_LEN: usize = 32;
