//! BOB/COB binary mesh formats
//!
//! Both formats are little-endian and identified by a leading u32 magic.
//! Headers implement the [`BinarySerializable`] trait for consistent
//! serialization/deserialization.

pub mod bob;
pub mod cob;
mod io;
mod serialization;

pub use bob::*;
pub use cob::*;
pub use serialization::BinarySerializable;

/// File extension for renderable meshes
pub const BOB_EXT: &str = "bob";

/// File extension for collision meshes
pub const COB_EXT: &str = "cob";

/// Which format a file holds, judged by its leading magic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshFileKind {
    Bob,
    Cob,
}

impl MeshFileKind {
    /// Identify a file by its first four bytes
    pub fn sniff(data: &[u8]) -> Option<Self> {
        let magic = u32::from_le_bytes(data.get(0..4)?.try_into().ok()?);
        match magic {
            BOB_MAGIC => Some(MeshFileKind::Bob),
            COB_MAGIC => Some(MeshFileKind::Cob),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            MeshFileKind::Bob => BOB_EXT,
            MeshFileKind::Cob => COB_EXT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff() {
        assert_eq!(
            MeshFileKind::sniff(&45623u32.to_le_bytes()),
            Some(MeshFileKind::Bob)
        );
        assert_eq!(
            MeshFileKind::sniff(&[0x9A, 0x34, 0, 0, 1, 2]),
            Some(MeshFileKind::Cob)
        );
        assert_eq!(MeshFileKind::sniff(&[1, 2, 3]), None);
        assert_eq!(MeshFileKind::sniff(&[0; 4]), None);
    }
}
