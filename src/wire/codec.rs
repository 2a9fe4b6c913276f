//! Framed message codec (encode/decode)
//!
//! Composes the primitive codec and the dynamic message container into a
//! self-describing byte frame.
//!
//! # Format
//!
//! All multi-byte integers are signed 32-bit big-endian; strings are raw
//! bytes with the length carried explicitly, no terminator.
//!
//! ```text
//! magic                          4 bytes
//! frame length (total)           4 bytes
//! message name length            4 bytes
//! message name                   m bytes
//! number of fields (n)           4 bytes
//!
//! ---> (repeated n times)        n * (16 + k + l) bytes
//! |   field length (total)       4 bytes
//! |   field name length          4 bytes
//! |   field name                 k bytes
//! |   field type tag             4 bytes
//! |   field value length         4 bytes
//! |   field value                l bytes
//! --->
//! ```
//!
//! Fields appear in `seq` order, so a decoded message enumerates its
//! fields exactly as the sender inserted them.

use tracing::warn;

use crate::message::{DynMessage, FieldType, Value};

use super::{pack, Error, Result, SerializedData, FIELD_FIXED_LEN, MAGIC, MESSAGE_FIXED_LEN, MIN_FRAME_LEN};

/// Serialized size of a field's value body
fn value_len(value: Option<&Value>) -> usize {
    match value {
        Some(Value::Str(s)) => s.len(),
        Some(v) => v.field_type().wire_size().unwrap_or(0),
        // only reachable for a valueless string field, which emits an
        // empty body; valueless fixed-width fields are rejected up front
        None => 0,
    }
}

/// Total frame length of a message, zero when it has no fields
fn serialized_len(message: &DynMessage) -> usize {
    if message.is_empty() {
        return 0;
    }
    let fields: usize = message
        .fields()
        .iter()
        .map(|f| FIELD_FIXED_LEN + f.name().len() + value_len(f.value()))
        .sum();
    MESSAGE_FIXED_LEN + message.name().len() + fields
}

/// Encode a message into a byte frame
///
/// Fields are written in `seq` order. A message whose computed frame
/// length does not exceed [`MIN_FRAME_LEN`] (in particular, any message
/// with zero fields) is not emitted: the returned carrier is empty.
///
/// # Errors
///
/// Returns [`Error::NotSerializable`] if the message carries a field the
/// frame cannot represent: an 8-bit or `NO_TYPE` type tag, or a
/// fixed-width field that was registered without a value.
pub fn encode(message: &DynMessage) -> Result<SerializedData> {
    for field in message.fields() {
        if !field.field_type().is_serializable() {
            return Err(Error::NotSerializable {
                name: field.name().to_string(),
                field_type: field.field_type(),
            });
        }
        // a fixed-width field registered without a value has no
        // conformant body to emit
        if field.value().is_none()
            && field.field_type().wire_size().is_some_and(|size| size > 0)
        {
            return Err(Error::NotSerializable {
                name: field.name().to_string(),
                field_type: field.field_type(),
            });
        }
    }

    let total = serialized_len(message);
    if total <= MIN_FRAME_LEN {
        return Ok(SerializedData::empty());
    }

    let mut buf = Vec::with_capacity(total);
    buf.extend_from_slice(&pack::pack_i32(MAGIC));
    buf.extend_from_slice(&pack::pack_i32(total as i32));
    buf.extend_from_slice(&pack::pack_i32(message.name().len() as i32));
    buf.extend_from_slice(message.name().as_bytes());
    buf.extend_from_slice(&pack::pack_i32(message.field_count() as i32));

    for field in message.fields() {
        let body_len = value_len(field.value());
        let field_len = FIELD_FIXED_LEN + field.name().len() + body_len;
        buf.extend_from_slice(&pack::pack_i32(field_len as i32));
        buf.extend_from_slice(&pack::pack_i32(field.name().len() as i32));
        buf.extend_from_slice(field.name().as_bytes());
        buf.extend_from_slice(&pack::pack_i32(field.field_type().as_i32()));
        buf.extend_from_slice(&pack::pack_i32(body_len as i32));
        match field.value() {
            Some(Value::Enum(v)) => buf.extend_from_slice(&pack::pack_u32(*v)),
            Some(Value::I16(v)) => buf.extend_from_slice(&pack::pack_i16(*v)),
            Some(Value::U16(v)) => buf.extend_from_slice(&pack::pack_u16(*v)),
            Some(Value::I32(v)) => buf.extend_from_slice(&pack::pack_i32(*v)),
            Some(Value::U32(v)) => buf.extend_from_slice(&pack::pack_u32(*v)),
            Some(Value::I64(v)) => buf.extend_from_slice(&pack::pack_i64(*v)),
            Some(Value::U64(v)) => buf.extend_from_slice(&pack::pack_u64(*v)),
            Some(Value::F32(v)) => buf.extend_from_slice(&pack::pack_f32(*v)),
            Some(Value::F64(v)) => buf.extend_from_slice(&pack::pack_f64(*v)),
            Some(Value::Str(s)) => buf.extend_from_slice(s.as_bytes()),
            // 8-bit and valueless fixed-width fields were rejected
            // above; only a valueless string reaches here, with its
            // empty body
            Some(Value::I8(_) | Value::U8(_)) | None => {}
        }
    }

    debug_assert_eq!(buf.len(), total);
    Ok(SerializedData::new(buf))
}

/// Verify that a byte sequence starts with a complete message frame
///
/// Checks the magic constant in the first four bytes and that the declared
/// total length is present. Bytes past the declared length are permitted
/// and ignored.
///
/// # Errors
///
/// [`Error::InvalidMagic`] if the first four bytes are not the magic,
/// [`Error::Truncated`] if the input is shorter than the headers or the
/// declared length, [`Error::InvalidLength`] if the declared length is
/// negative.
pub fn verify(data: &[u8]) -> Result<()> {
    if data.len() < 4 {
        return Err(Error::Truncated {
            needed: 4,
            got: data.len(),
        });
    }
    let found = pack::unpack_i32(data[..4].try_into().unwrap());
    if found != MAGIC {
        return Err(Error::InvalidMagic { found });
    }
    if data.len() < 8 {
        return Err(Error::Truncated {
            needed: 8,
            got: data.len(),
        });
    }
    let declared = pack::unpack_i32(data[4..8].try_into().unwrap());
    let declared = usize::try_from(declared).map_err(|_| Error::InvalidLength {
        context: "frame",
        value: declared,
    })?;
    if declared > data.len() {
        return Err(Error::Truncated {
            needed: declared,
            got: data.len(),
        });
    }
    Ok(())
}

/// Decode a message from a byte frame
///
/// The input is verified first; see [`verify`]. Fields materialize in the
/// order they appear on the wire, so `seq` survives the trip. A field
/// whose type tag is unknown, 8-bit, or `NO_TYPE` is registered under its
/// name with no value and its declared value bytes are consumed. A frame
/// that declares zero fields decodes to an empty message; this is logged
/// as a warning.
///
/// # Errors
///
/// Everything [`verify`] returns, plus [`Error::Truncated`] /
/// [`Error::InvalidLength`] for malformed sub-frame headers and
/// [`Error::InvalidUtf8`] for non-UTF-8 name or string bytes.
pub fn decode(data: &[u8]) -> Result<DynMessage> {
    verify(data)?;

    let mut reader = Reader::new(data);
    // magic and total length, already verified
    reader.read_i32()?;
    reader.read_i32()?;

    let name_len = reader.read_len("message name")?;
    let name = String::from_utf8(reader.read_bytes(name_len)?.to_vec())?;
    let mut message = DynMessage::new(name);

    let field_count = reader.read_i32()?;
    if field_count <= 0 {
        warn!("decoded frame `{}` declares no fields", message.name());
        return Ok(message);
    }

    for _ in 0..field_count {
        // the sub-frame length is redundant with the name and value
        // lengths that follow
        reader.read_i32()?;
        let name_len = reader.read_len("field name")?;
        let field_name = String::from_utf8(reader.read_bytes(name_len)?.to_vec())?;
        let ty = FieldType::from_i32(reader.read_i32()?).unwrap_or(FieldType::NoType);
        let body_len = reader.read_len("field value")?;
        // register first so the seq exists even for a zero-width value
        message.put_field(field_name.clone(), ty);
        let body = reader.read_bytes(body_len)?;
        if let Some(value) = decode_value(ty, body)? {
            message.put(field_name, value);
        }
    }

    Ok(message)
}

/// Decode a value body under the given tag
///
/// `None` when the tag carries no data (unknown, 8-bit, `NO_TYPE`) or the
/// body does not have the tag's fixed width.
fn decode_value(ty: FieldType, body: &[u8]) -> Result<Option<Value>> {
    let value = match ty {
        FieldType::Enum if body.len() == 4 => {
            Some(Value::Enum(pack::unpack_u32(body.try_into().unwrap())))
        }
        FieldType::I16 if body.len() == 2 => {
            Some(Value::I16(pack::unpack_i16(body.try_into().unwrap())))
        }
        FieldType::U16 if body.len() == 2 => {
            Some(Value::U16(pack::unpack_u16(body.try_into().unwrap())))
        }
        FieldType::I32 if body.len() == 4 => {
            Some(Value::I32(pack::unpack_i32(body.try_into().unwrap())))
        }
        FieldType::U32 if body.len() == 4 => {
            Some(Value::U32(pack::unpack_u32(body.try_into().unwrap())))
        }
        FieldType::I64 if body.len() == 8 => {
            Some(Value::I64(pack::unpack_i64(body.try_into().unwrap())))
        }
        FieldType::U64 if body.len() == 8 => {
            Some(Value::U64(pack::unpack_u64(body.try_into().unwrap())))
        }
        FieldType::F32 if body.len() == 4 => {
            Some(Value::F32(pack::unpack_f32(body.try_into().unwrap())))
        }
        FieldType::F64 if body.len() == 8 => {
            Some(Value::F64(pack::unpack_f64(body.try_into().unwrap())))
        }
        FieldType::Str => Some(Value::Str(String::from_utf8(body.to_vec())?)),
        _ => None,
    };
    Ok(value)
}

/// Bounds-checked sequential reader over a frame
struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self.pos + n;
        if end > self.data.len() {
            return Err(Error::Truncated {
                needed: end,
                got: self.data.len(),
            });
        }
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn read_i32(&mut self) -> Result<i32> {
        Ok(pack::unpack_i32(self.read_bytes(4)?.try_into().unwrap()))
    }

    fn read_len(&mut self, context: &'static str) -> Result<usize> {
        let value = self.read_i32()?;
        usize::try_from(value).map_err(|_| Error::InvalidLength { context, value })
    }
}

/// A named (de)serialization strategy for dynamic messages
///
/// The seam external converters program against: a format identifier plus
/// the serialize/deserialize pair. Generated per-message wrappers take any
/// implementation rather than hard-wiring the binary frame.
pub trait MessageSerializer {
    /// Identifier of the wire format
    fn format(&self) -> &'static str;

    /// Serialize a message into a carrier
    fn serialize(&self, message: &DynMessage) -> Result<SerializedData>;

    /// Deserialize a message from bytes
    fn deserialize(&self, data: &[u8]) -> Result<DynMessage>;
}

/// The framed binary format of this module
#[derive(Debug, Clone, Copy, Default)]
pub struct BinSerializer;

impl MessageSerializer for BinSerializer {
    fn format(&self) -> &'static str {
        "dynmsg-bin"
    }

    fn serialize(&self, message: &DynMessage) -> Result<SerializedData> {
        encode(message)
    }

    fn deserialize(&self, data: &[u8]) -> Result<DynMessage> {
        decode(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DynMessage {
        let mut msg = DynMessage::new("sample");
        msg.put_i32("count", -3);
        msg.put_u64("total", 9_000_000_000);
        msg.put_str("unit", "ms");
        msg
    }

    #[test]
    fn test_frame_layout() {
        let mut msg = DynMessage::new("m");
        msg.put_str("s", "abc");
        let frame = encode(&msg).unwrap();

        // 16 + 1 (name) + 16 + 1 (field name) + 3 (value)
        assert_eq!(frame.len(), 37);
        let bytes = frame.as_bytes();
        assert_eq!(&bytes[0..4], &[0x3E, 0x3E, 0x3E, 0x3D]); // magic
        assert_eq!(&bytes[4..8], &[0, 0, 0, 37]); // total length
        assert_eq!(&bytes[8..12], &[0, 0, 0, 1]); // name length
        assert_eq!(&bytes[12..13], b"m");
        assert_eq!(&bytes[13..17], &[0, 0, 0, 1]); // field count
        assert_eq!(&bytes[17..21], &[0, 0, 0, 20]); // field length
        assert_eq!(&bytes[21..25], &[0, 0, 0, 1]); // field name length
        assert_eq!(&bytes[25..26], b"s");
        assert_eq!(&bytes[26..30], &[0, 0, 0, 11]); // STRING tag
        assert_eq!(&bytes[30..34], &[0, 0, 0, 3]); // value length
        assert_eq!(&bytes[34..37], b"abc"); // raw bytes, no terminator
    }

    #[test]
    fn test_roundtrip_preserves_triples() {
        let msg = sample();
        let frame = encode(&msg).unwrap();
        let decoded = decode(frame.as_bytes()).unwrap();

        assert_eq!(decoded.name(), msg.name());
        assert_eq!(decoded.field_count(), msg.field_count());
        assert_eq!(decoded.fields(), msg.fields());
    }

    #[test]
    fn test_empty_message_declines_to_emit() {
        let msg = DynMessage::new("empty");
        let frame = encode(&msg).unwrap();
        assert_eq!(frame.len(), 0);
        assert!(frame.is_empty());
    }

    #[test]
    fn test_degenerate_frame_at_min_length_not_emitted() {
        // empty message name, empty field name, empty string value:
        // computed length is exactly the minimum, so nothing is emitted
        let mut msg = DynMessage::new("");
        msg.put_str("", "");
        assert_eq!(encode(&msg).unwrap().len(), 0);
    }

    #[test]
    fn test_eight_bit_field_rejected() {
        let mut msg = DynMessage::new("m");
        msg.put_i32("ok", 1);
        msg.put_u8("bad", 0xFF);

        let err = encode(&msg).unwrap_err();
        assert!(matches!(
            err,
            Error::NotSerializable { ref name, field_type: FieldType::U8 } if name == "bad"
        ));
    }

    #[test]
    fn test_no_type_field_rejected() {
        let mut msg = DynMessage::new("m");
        msg.put_i32("ok", 1);
        msg.put_field("absent", FieldType::NoType);

        let err = encode(&msg).unwrap_err();
        assert!(matches!(
            err,
            Error::NotSerializable { ref name, field_type: FieldType::NoType } if name == "absent"
        ));
    }

    #[test]
    fn test_valueless_fixed_width_field_rejected() {
        let mut msg = DynMessage::new("m");
        msg.put_field("n", FieldType::I32);

        let err = encode(&msg).unwrap_err();
        assert!(matches!(
            err,
            Error::NotSerializable { ref name, field_type: FieldType::I32 } if name == "n"
        ));
    }

    #[test]
    fn test_valueless_string_field_emits_empty_body() {
        let mut msg = DynMessage::new("msg");
        msg.put_field("s", FieldType::Str);
        msg.put_i32("n", 1);

        let decoded = decode(encode(&msg).unwrap().as_bytes()).unwrap();
        assert_eq!(decoded.get_str("s"), Some(""));
        assert_eq!(decoded.get_i32("n"), Some(1));
    }

    #[test]
    fn test_magic_gate() {
        let err = decode(&[0u8; 40]).unwrap_err();
        assert!(matches!(err, Error::InvalidMagic { found: 0 }));
    }

    #[test]
    fn test_short_input_rejected() {
        assert!(matches!(decode(&[]), Err(Error::Truncated { .. })));
        assert!(matches!(
            decode(&[0x3E, 0x3E]),
            Err(Error::Truncated { .. })
        ));
        // good magic, missing length word
        assert!(matches!(
            decode(&[0x3E, 0x3E, 0x3E, 0x3D, 0, 0]),
            Err(Error::Truncated { .. })
        ));
    }

    #[test]
    fn test_length_gate() {
        let frame = encode(&sample()).unwrap();
        let cut = &frame.as_bytes()[..frame.len() - 1];
        let err = decode(cut).unwrap_err();
        assert!(matches!(err, Error::Truncated { .. }));
    }

    #[test]
    fn test_trailing_bytes_ignored() {
        let frame = encode(&sample()).unwrap();
        let mut padded = frame.as_bytes().to_vec();
        padded.extend_from_slice(&[0xAA; 16]);

        let decoded = decode(&padded).unwrap();
        assert_eq!(decoded.fields(), sample().fields());
    }

    #[test]
    fn test_unknown_ordinal_registers_valueless_field() {
        let mut msg = DynMessage::new("mixed");
        msg.put_i32("before", 1);
        msg.put_u32("after", 2);
        let frame = encode(&msg).unwrap();
        let mut bytes = frame.as_bytes().to_vec();

        // rewrite the first field's type tag (offset: 16 + 5 name,
        // then 4 + 4 + 6 field name) to an unknown ordinal
        let tag_at = 16 + 5 + 4 + 4 + 6;
        assert_eq!(&bytes[tag_at..tag_at + 4], &pack::pack_i32(5)); // I32
        bytes[tag_at..tag_at + 4].copy_from_slice(&pack::pack_i32(99));

        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded.field_count(), 2);

        let before = decoded.get("before").unwrap();
        assert_eq!(before.field_type(), FieldType::NoType);
        assert_eq!(before.value(), None);
        assert_eq!(before.seq(), 1);
        // the unknown field's value bytes were consumed, not resynced into
        // the next sub-frame
        assert_eq!(decoded.get_u32("after"), Some(2));
        assert_eq!(decoded.get("after").unwrap().seq(), 2);
    }

    #[test]
    fn test_eight_bit_ordinals_decode_valueless() {
        // 8-bit tags are valid ordinals but carry no wire data; a frame
        // holding them registers the fields under their real type
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&pack::pack_i32(MAGIC));
        bytes.extend_from_slice(&pack::pack_i32(55)); // 16 + 3 + 18 + 18
        bytes.extend_from_slice(&pack::pack_i32(3));
        bytes.extend_from_slice(b"raw");
        bytes.extend_from_slice(&pack::pack_i32(2)); // field count
        for (name, tag, body) in [(b"s", FieldType::I8, 0x80_u8), (b"u", FieldType::U8, 0xFF)] {
            bytes.extend_from_slice(&pack::pack_i32(18)); // 16 + 1 + 1
            bytes.extend_from_slice(&pack::pack_i32(1));
            bytes.extend_from_slice(name);
            bytes.extend_from_slice(&pack::pack_i32(tag.as_i32()));
            bytes.extend_from_slice(&pack::pack_i32(1));
            bytes.push(body);
        }

        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded.field_count(), 2);

        let signed = decoded.get("s").unwrap();
        assert_eq!(signed.field_type(), FieldType::I8);
        assert_eq!(signed.value(), None);
        assert_eq!(signed.seq(), 1);

        let unsigned = decoded.get("u").unwrap();
        assert_eq!(unsigned.field_type(), FieldType::U8);
        assert_eq!(unsigned.value(), None);
        assert_eq!(unsigned.seq(), 2);
    }

    #[test]
    fn test_zero_field_frame_decodes_to_empty_message() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&pack::pack_i32(MAGIC));
        bytes.extend_from_slice(&pack::pack_i32(21)); // 16 + "empty"
        bytes.extend_from_slice(&pack::pack_i32(5));
        bytes.extend_from_slice(b"empty");
        bytes.extend_from_slice(&pack::pack_i32(0));

        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded.name(), "empty");
        assert_eq!(decoded.field_count(), 0);
    }

    #[test]
    fn test_negative_length_rejected() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&pack::pack_i32(MAGIC));
        bytes.extend_from_slice(&pack::pack_i32(16));
        bytes.extend_from_slice(&pack::pack_i32(-4));
        bytes.extend_from_slice(&pack::pack_i32(0));

        let err = decode(&bytes).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidLength { context: "message name", value: -4 }
        ));
    }

    #[test]
    fn test_verify_accepts_exact_frame() {
        let frame = encode(&sample()).unwrap();
        assert!(verify(frame.as_bytes()).is_ok());
    }

    #[test]
    fn test_bin_serializer_strategy() {
        let codec = BinSerializer;
        assert_eq!(codec.format(), "dynmsg-bin");

        let frame = codec.serialize(&sample()).unwrap();
        let decoded = codec.deserialize(frame.as_bytes()).unwrap();
        assert_eq!(decoded.fields(), sample().fields());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn value_strategy() -> impl Strategy<Value = Value> {
            prop_oneof![
                any::<u32>().prop_map(Value::Enum),
                any::<i16>().prop_map(Value::I16),
                any::<u16>().prop_map(Value::U16),
                any::<i32>().prop_map(Value::I32),
                any::<u32>().prop_map(Value::U32),
                any::<i64>().prop_map(Value::I64),
                any::<u64>().prop_map(Value::U64),
                (proptest::num::f32::NORMAL | proptest::num::f32::ZERO).prop_map(Value::F32),
                (proptest::num::f64::NORMAL | proptest::num::f64::ZERO).prop_map(Value::F64),
                "[a-zA-Z0-9 _.:-]{0,48}".prop_map(Value::Str),
            ]
        }

        fn message_strategy() -> impl Strategy<Value = DynMessage> {
            (
                "[A-Za-z][A-Za-z0-9_]{0,24}",
                prop::collection::vec(value_strategy(), 1..24),
            )
                .prop_map(|(name, values)| {
                    let mut msg = DynMessage::new(name);
                    for (i, value) in values.into_iter().enumerate() {
                        msg.put(format!("field_{i}"), value);
                    }
                    msg
                })
        }

        proptest! {
            /// Any well-formed message round-trips losslessly
            #[test]
            fn prop_frame_roundtrip(msg in message_strategy()) {
                let frame = encode(&msg).unwrap();
                let decoded = decode(frame.as_bytes()).unwrap();

                prop_assert_eq!(decoded.name(), msg.name());
                prop_assert_eq!(decoded.field_count(), msg.field_count());
                prop_assert_eq!(decoded.fields(), msg.fields());
            }

            /// Snapshot position i always holds seq i+1, decoded or not
            #[test]
            fn prop_field_list_ordering(msg in message_strategy()) {
                let decoded = decode(encode(&msg).unwrap().as_bytes()).unwrap();
                for (i, field) in decoded.fields().iter().enumerate() {
                    prop_assert_eq!(field.seq(), i + 1);
                }
            }

            /// The declared frame length always matches the emitted bytes
            #[test]
            fn prop_declared_length_matches(msg in message_strategy()) {
                let frame = encode(&msg).unwrap();
                let bytes = frame.as_bytes();
                let declared = pack::unpack_i32(bytes[4..8].try_into().unwrap());
                prop_assert_eq!(declared as usize, bytes.len());
            }

            /// Inputs that do not start with the magic never decode
            #[test]
            fn prop_magic_gate(mut bytes in prop::collection::vec(any::<u8>(), 4..64)) {
                prop_assume!(bytes.len() >= 4);
                // force a magic mismatch in the first word
                bytes[0] ^= 0x80;
                if pack::unpack_i32(bytes[..4].try_into().unwrap()) != MAGIC {
                    prop_assert!(decode(&bytes).is_err());
                }
            }

            /// Any strict prefix of a frame is rejected
            #[test]
            fn prop_truncation_rejected(msg in message_strategy(), keep in 0.0f64..1.0) {
                let frame = encode(&msg).unwrap();
                let cut = (frame.len() as f64 * keep) as usize;
                prop_assume!(cut < frame.len());
                prop_assert!(decode(&frame.as_bytes()[..cut]).is_err());
            }
        }
    }
}
