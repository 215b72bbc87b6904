//! Binary serialization trait for format headers.
//!
//! Both mesh headers implement `BinarySerializable` so tooling can peek at a
//! file's counts without decoding its payload. Each header also keeps a
//! type-specific `to_bytes()` returning a fixed-size array.

/// Trait for binary-serializable format headers.
///
/// The trait uses `Vec<u8>` for the return type because associated const
/// generics in return types (`[u8; Self::SIZE]`) are not yet stable in Rust.
///
/// # Example
///
/// ```
/// use bob_common::formats::{BinarySerializable, BobFormat, BobHeader};
///
/// let header = BobHeader::new(BobFormat::Index16, 3, 1);
///
/// let bytes = header.serialize();
/// let parsed = BobHeader::deserialize(&bytes).unwrap();
/// assert_eq!(parsed.vertex_count, 3);
/// ```
pub trait BinarySerializable: Sized {
    /// Size of the serialized header in bytes.
    const SIZE: usize;

    /// Serialize to bytes.
    fn serialize(&self) -> Vec<u8>;

    /// Deserialize from bytes.
    ///
    /// Returns `None` if the byte slice is too short. Magic and format fields
    /// are returned as read; validation happens in the document readers.
    fn deserialize(bytes: &[u8]) -> Option<Self>;
}

impl BinarySerializable for super::BobHeader {
    const SIZE: usize = Self::SIZE;

    fn serialize(&self) -> Vec<u8> {
        self.to_bytes().to_vec()
    }

    fn deserialize(bytes: &[u8]) -> Option<Self> {
        Self::from_bytes(bytes)
    }
}

impl BinarySerializable for super::CobHeader {
    const SIZE: usize = Self::SIZE;

    fn serialize(&self) -> Vec<u8> {
        self.to_bytes().to_vec()
    }

    fn deserialize(bytes: &[u8]) -> Option<Self> {
        Self::from_bytes(bytes)
    }
}
