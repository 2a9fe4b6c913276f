//! Dynamic message container

use std::collections::HashMap;

use super::{Field, FieldType, Value};
use crate::wire::{Result, SerializedData};

/// A named, ordered, heterogeneous record whose schema is carried with
/// the data
///
/// Fields live in a vector in insertion (`seq`) order with a side index
/// keyed by name, so name lookup is O(1) expected and positional access is
/// O(1) worst case. Within a message, names are unique and `seq` values
/// form a dense `1..=field_count` permutation.
///
/// A message is not safe for concurrent mutation; distinct messages are
/// independent.
#[derive(Debug, Clone, Default)]
pub struct DynMessage {
    name: String,
    fields: Vec<Field>,
    index: HashMap<String, usize>,
}

impl DynMessage {
    /// Create an empty message with the given name
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Message name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of fields
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Check whether the message has no fields
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Add or update a field
    ///
    /// If `name` is not present, a new field is appended with the next
    /// `seq`. If it is present, the value is replaced in place and the
    /// field keeps its `seq`; the stored type tag follows the value's
    /// variant, so tag and value never disagree.
    pub fn put(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        if let Some(&at) = self.index.get(&name) {
            self.fields[at].set_value(value);
        } else {
            let seq = self.fields.len() + 1;
            self.index.insert(name.clone(), self.fields.len());
            self.fields
                .push(Field::new(name, value.field_type(), Some(value), seq));
        }
    }

    /// Register a field by name and type without setting a value
    ///
    /// The field takes the next `seq` and holds no value until the first
    /// [`put`](Self::put). No-op when the name is already present. The
    /// decoder relies on this to allocate a `seq` for fields whose ordinal
    /// carries no data.
    pub fn put_field(&mut self, name: impl Into<String>, ty: FieldType) {
        let name = name.into();
        if self.index.contains_key(&name) {
            return;
        }
        let seq = self.fields.len() + 1;
        self.index.insert(name.clone(), self.fields.len());
        self.fields.push(Field::new(name, ty, None, seq));
    }

    /// Look up a field by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.index.get(name).map(|&at| &self.fields[at])
    }

    /// All fields in `seq` order
    ///
    /// Position `i` holds the field whose `seq == i + 1`. The slice borrows
    /// the message and reflects it at the time of the call.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Drop every field, leaving an empty message with the same name
    pub fn clear(&mut self) {
        self.fields.clear();
        self.index.clear();
    }

    /// Serialize into a byte frame
    pub fn encode(&self) -> Result<SerializedData> {
        crate::wire::encode(self)
    }

    /// Deserialize a message from a byte frame
    pub fn decode(data: &[u8]) -> Result<Self> {
        crate::wire::decode(data)
    }

    /// Add or update an enumeration field
    pub fn put_enum(&mut self, name: impl Into<String>, value: u32) {
        self.put(name, Value::Enum(value));
    }

    /// Add or update a signed 8-bit field (in-memory only)
    pub fn put_i8(&mut self, name: impl Into<String>, value: i8) {
        self.put(name, Value::I8(value));
    }

    /// Add or update an unsigned 8-bit field (in-memory only)
    pub fn put_u8(&mut self, name: impl Into<String>, value: u8) {
        self.put(name, Value::U8(value));
    }

    /// Add or update a signed 16-bit field
    pub fn put_i16(&mut self, name: impl Into<String>, value: i16) {
        self.put(name, Value::I16(value));
    }

    /// Add or update an unsigned 16-bit field
    pub fn put_u16(&mut self, name: impl Into<String>, value: u16) {
        self.put(name, Value::U16(value));
    }

    /// Add or update a signed 32-bit field
    pub fn put_i32(&mut self, name: impl Into<String>, value: i32) {
        self.put(name, Value::I32(value));
    }

    /// Add or update an unsigned 32-bit field
    pub fn put_u32(&mut self, name: impl Into<String>, value: u32) {
        self.put(name, Value::U32(value));
    }

    /// Add or update a signed 64-bit field
    pub fn put_i64(&mut self, name: impl Into<String>, value: i64) {
        self.put(name, Value::I64(value));
    }

    /// Add or update an unsigned 64-bit field
    pub fn put_u64(&mut self, name: impl Into<String>, value: u64) {
        self.put(name, Value::U64(value));
    }

    /// Add or update a binary32 float field
    pub fn put_f32(&mut self, name: impl Into<String>, value: f32) {
        self.put(name, Value::F32(value));
    }

    /// Add or update a binary64 float field
    pub fn put_f64(&mut self, name: impl Into<String>, value: f64) {
        self.put(name, Value::F64(value));
    }

    /// Add or update a string field
    pub fn put_str(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.put(name, Value::Str(value.into()));
    }

    /// Get an enumeration field value
    #[must_use]
    pub fn get_enum(&self, name: &str) -> Option<u32> {
        self.get(name)?.value()?.as_enum()
    }

    /// Get a signed 8-bit field value
    #[must_use]
    pub fn get_i8(&self, name: &str) -> Option<i8> {
        self.get(name)?.value()?.as_i8()
    }

    /// Get an unsigned 8-bit field value
    #[must_use]
    pub fn get_u8(&self, name: &str) -> Option<u8> {
        self.get(name)?.value()?.as_u8()
    }

    /// Get a signed 16-bit field value
    #[must_use]
    pub fn get_i16(&self, name: &str) -> Option<i16> {
        self.get(name)?.value()?.as_i16()
    }

    /// Get an unsigned 16-bit field value
    #[must_use]
    pub fn get_u16(&self, name: &str) -> Option<u16> {
        self.get(name)?.value()?.as_u16()
    }

    /// Get a signed 32-bit field value
    #[must_use]
    pub fn get_i32(&self, name: &str) -> Option<i32> {
        self.get(name)?.value()?.as_i32()
    }

    /// Get an unsigned 32-bit field value
    #[must_use]
    pub fn get_u32(&self, name: &str) -> Option<u32> {
        self.get(name)?.value()?.as_u32()
    }

    /// Get a signed 64-bit field value
    #[must_use]
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name)?.value()?.as_i64()
    }

    /// Get an unsigned 64-bit field value
    #[must_use]
    pub fn get_u64(&self, name: &str) -> Option<u64> {
        self.get(name)?.value()?.as_u64()
    }

    /// Get a binary32 float field value
    #[must_use]
    pub fn get_f32(&self, name: &str) -> Option<f32> {
        self.get(name)?.value()?.as_f32()
    }

    /// Get a binary64 float field value
    #[must_use]
    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.get(name)?.value()?.as_f64()
    }

    /// Get a string field value
    #[must_use]
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name)?.value()?.as_str()
    }
}
