//! Field type tags and values

use std::fmt;

/// Field type tag
///
/// The ordinals are part of the wire format (the type tag of a field
/// sub-frame is the ordinal as a signed 32-bit big-endian integer) and
/// must never be reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum FieldType {
    /// Enumeration constant, carried as an unsigned 32-bit integer
    Enum = 0,
    /// Signed 8-bit integer (in-memory only, never serialized)
    I8 = 1,
    /// Unsigned 8-bit integer (in-memory only, never serialized)
    U8 = 2,
    /// Signed 16-bit integer
    I16 = 3,
    /// Unsigned 16-bit integer
    U16 = 4,
    /// Signed 32-bit integer
    I32 = 5,
    /// Unsigned 32-bit integer
    U32 = 6,
    /// Signed 64-bit integer
    I64 = 7,
    /// Unsigned 64-bit integer
    U64 = 8,
    /// IEEE-754 binary32 floating point
    F32 = 9,
    /// IEEE-754 binary64 floating point
    F64 = 10,
    /// Owned text, length carried in the frame, no terminator
    Str = 11,
    /// Absent type; marks a lookup miss or a field decoded from an
    /// unknown ordinal. Never written by a well-formed encoder.
    NoType = 12,
}

impl FieldType {
    /// Convert from a wire ordinal
    #[must_use]
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::Enum),
            1 => Some(Self::I8),
            2 => Some(Self::U8),
            3 => Some(Self::I16),
            4 => Some(Self::U16),
            5 => Some(Self::I32),
            6 => Some(Self::U32),
            7 => Some(Self::I64),
            8 => Some(Self::U64),
            9 => Some(Self::F32),
            10 => Some(Self::F64),
            11 => Some(Self::Str),
            12 => Some(Self::NoType),
            _ => None,
        }
    }

    /// Convert to the wire ordinal
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    /// Size in bytes of a serialized value of this type
    ///
    /// `None` for [`FieldType::Str`], whose size is the string length and
    /// travels in the sub-frame header, and for the 8-bit types, which the
    /// framed codec refuses to serialize.
    #[must_use]
    pub const fn wire_size(self) -> Option<usize> {
        match self {
            Self::I16 | Self::U16 => Some(2),
            Self::Enum | Self::I32 | Self::U32 | Self::F32 => Some(4),
            Self::I64 | Self::U64 | Self::F64 => Some(8),
            Self::NoType => Some(0),
            Self::Str | Self::I8 | Self::U8 => None,
        }
    }

    /// Check whether values of this type may appear in a serialized frame
    ///
    /// The 8-bit types are updatable in the container but have no wire
    /// representation, and `NO_TYPE` marks absence rather than data; the
    /// encoder rejects messages that carry any of them.
    #[must_use]
    pub const fn is_serializable(self) -> bool {
        !matches!(self, Self::I8 | Self::U8 | Self::NoType)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Enum => "ENUM",
            Self::I8 => "I8",
            Self::U8 => "U8",
            Self::I16 => "I16",
            Self::U16 => "U16",
            Self::I32 => "I32",
            Self::U32 => "U32",
            Self::I64 => "I64",
            Self::U64 => "U64",
            Self::F32 => "F32",
            Self::F64 => "F64",
            Self::Str => "STRING",
            Self::NoType => "NO_TYPE",
        };
        write!(f, "{name}")
    }
}

/// Field value
///
/// Exactly one variant is inhabited; the variant and the field's type tag
/// agree by construction since every mutation goes through a single update
/// path. There is no variant for [`FieldType::NoType`] - a typeless value
/// is unrepresentable, a registered-but-unset field simply holds no value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Enumeration constant
    Enum(u32),
    /// Signed 8-bit integer
    I8(i8),
    /// Unsigned 8-bit integer
    U8(u8),
    /// Signed 16-bit integer
    I16(i16),
    /// Unsigned 16-bit integer
    U16(u16),
    /// Signed 32-bit integer
    I32(i32),
    /// Unsigned 32-bit integer
    U32(u32),
    /// Signed 64-bit integer
    I64(i64),
    /// Unsigned 64-bit integer
    U64(u64),
    /// IEEE-754 binary32 floating point
    F32(f32),
    /// IEEE-754 binary64 floating point
    F64(f64),
    /// Owned text
    Str(String),
}

impl Value {
    /// Type tag matching this value's variant
    #[must_use]
    pub const fn field_type(&self) -> FieldType {
        match self {
            Self::Enum(_) => FieldType::Enum,
            Self::I8(_) => FieldType::I8,
            Self::U8(_) => FieldType::U8,
            Self::I16(_) => FieldType::I16,
            Self::U16(_) => FieldType::U16,
            Self::I32(_) => FieldType::I32,
            Self::U32(_) => FieldType::U32,
            Self::I64(_) => FieldType::I64,
            Self::U64(_) => FieldType::U64,
            Self::F32(_) => FieldType::F32,
            Self::F64(_) => FieldType::F64,
            Self::Str(_) => FieldType::Str,
        }
    }

    /// Get the enumeration constant, if this is an `Enum` value
    #[must_use]
    pub const fn as_enum(&self) -> Option<u32> {
        match self {
            Self::Enum(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the `i8`, if this is an `I8` value
    #[must_use]
    pub const fn as_i8(&self) -> Option<i8> {
        match self {
            Self::I8(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the `u8`, if this is a `U8` value
    #[must_use]
    pub const fn as_u8(&self) -> Option<u8> {
        match self {
            Self::U8(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the `i16`, if this is an `I16` value
    #[must_use]
    pub const fn as_i16(&self) -> Option<i16> {
        match self {
            Self::I16(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the `u16`, if this is a `U16` value
    #[must_use]
    pub const fn as_u16(&self) -> Option<u16> {
        match self {
            Self::U16(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the `i32`, if this is an `I32` value
    #[must_use]
    pub const fn as_i32(&self) -> Option<i32> {
        match self {
            Self::I32(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the `u32`, if this is a `U32` value
    #[must_use]
    pub const fn as_u32(&self) -> Option<u32> {
        match self {
            Self::U32(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the `i64`, if this is an `I64` value
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::I64(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the `u64`, if this is a `U64` value
    #[must_use]
    pub const fn as_u64(&self) -> Option<u64> {
        match self {
            Self::U64(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the `f32`, if this is an `F32` value
    #[must_use]
    pub const fn as_f32(&self) -> Option<f32> {
        match self {
            Self::F32(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the `f64`, if this is an `F64` value
    #[must_use]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::F64(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the string, if this is a `Str` value
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(v) => Some(v),
            _ => None,
        }
    }
}
