//! dynmsg - Self-describing dynamic messages with a portable binary codec
//!
//! A dynamic message is a named record whose schema travels with the data:
//! an insertion-ordered sequence of typed, named fields, addressable by name
//! in O(1) and by position in O(1). The wire module turns such records into
//! a self-describing big-endian byte frame and back, independent of the
//! host's byte order or float layout.
//!
//! # Quick Start
//!
//! ```rust
//! use dynmsg::{DynMessage, Value};
//!
//! // Build a message
//! let mut msg = DynMessage::new("Heartbeat");
//! msg.put("message_counter", Value::I32(1));
//! msg.put("message_name", Value::Str("Heartbeat".into()));
//!
//! // Encode to a byte frame
//! let frame = msg.encode()?;
//!
//! // Decode it back
//! let decoded = DynMessage::decode(frame.as_bytes())?;
//! assert_eq!(decoded.name(), "Heartbeat");
//! assert_eq!(decoded.get_i32("message_counter"), Some(1));
//! # Ok::<(), dynmsg::Error>(())
//! ```
//!
//! # Guarantees
//!
//! - **Endian-neutral** - all multi-byte integers are big-endian on the
//!   wire; floats travel as their IEEE-754 bit patterns.
//! - **Order-preserving** - fields appear in every frame and every snapshot
//!   in the order they were first added.
//! - **Lossless** - `decode(encode(m))` reproduces the message name, field
//!   count, and every `(name, type, value)` triple in order.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod message;
pub mod wire;

pub use message::{DynMessage, Field, FieldType, Value};
pub use wire::{
    decode, encode, verify, BinSerializer, Error, MessageSerializer, Result, SerializedData,
};

/// Wire format version
pub const VERSION: &str = "1.0.0";
