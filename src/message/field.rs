//! Message field

use super::{FieldType, Value};

/// One named, typed slot within a dynamic message
///
/// A field is uniquely identified by `name` within its message and
/// positionally indexed by `seq`, the 1-based order in which it was first
/// added. Replacing the value leaves `seq` untouched. A field registered
/// without a value (the decoder does this for zero-width ordinals) holds
/// `None` until the first update.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    name: String,
    ty: FieldType,
    value: Option<Value>,
    seq: usize,
}

impl Field {
    pub(super) fn new(name: String, ty: FieldType, value: Option<Value>, seq: usize) -> Self {
        Self { name, ty, value, seq }
    }

    pub(super) fn set_value(&mut self, value: Value) {
        self.ty = value.field_type();
        self.value = Some(value);
    }

    /// Field name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Field type tag
    #[must_use]
    pub const fn field_type(&self) -> FieldType {
        self.ty
    }

    /// Field value, if one has been set
    #[must_use]
    pub const fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// 1-based insertion index within the parent message
    #[must_use]
    pub const fn seq(&self) -> usize {
        self.seq
    }
}
