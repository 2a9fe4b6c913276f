//! Serialized data carrier

use bytes::Bytes;

/// Owned carrier for a serialized message frame
///
/// The interchange type between the framed codec and whatever ships the
/// bytes. An encoder that declines to emit (a message below the minimum
/// frame length) returns a carrier with `len() == 0`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerializedData {
    data: Bytes,
}

impl SerializedData {
    /// Wrap serialized bytes
    #[must_use]
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }

    /// Carrier with no content
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Serialized bytes
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Content length in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check whether the carrier holds no content
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Release the content and zero the length
    pub fn clear(&mut self) {
        self.data = Bytes::new();
    }

    /// Consume the carrier, yielding the underlying bytes
    #[must_use]
    pub fn into_bytes(self) -> Bytes {
        self.data
    }
}

impl AsRef<[u8]> for SerializedData {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl From<Vec<u8>> for SerializedData {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}
