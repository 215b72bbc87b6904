//! Shared codec for BOB and COB game meshes
//!
//! This crate is used by `bob-export` (asset pipeline) and by anything that
//! needs to read the engine's mesh files directly.
//!
//! # Modules
//!
//! - [`packing`] - UV/normal quantization (f32 → unorm16/snorm16 and back)
//! - [`weld`] - Face-corner welding into an indexed vertex buffer
//! - [`formats`] - BOB and COB binary readers/writers
//! - [`mesh`] - Generic mesh handed to and returned from the codecs
//!
//! # Usage
//!
//! ```
//! use bob_common::{Corner, Mesh, Polygon, decode_bob, encode_bob};
//! use glam::{Vec2, Vec3};
//!
//! let corners = (0..3)
//!     .map(|i| Corner { vertex: i, normal: Vec3::Z, uv: Some(Vec2::ZERO) })
//!     .collect();
//! let mesh = Mesh::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![Polygon::new(corners)]);
//!
//! let bytes = encode_bob(&mesh).unwrap();
//! let decoded = decode_bob(&bytes).unwrap();
//! assert_eq!(decoded.polygons.len(), 1);
//! ```

pub mod error;
pub mod formats;
pub mod mesh;
pub mod packing;
pub mod weld;

pub use error::MeshError;
pub use mesh::{Corner, Mesh, Polygon};
pub use weld::{FaceCorner, VertexWelder, WELD_TOLERANCE, WeldedMesh, WeldedVertex, weld_corners};

// Re-export commonly used packing items
pub use packing::{
    NORMAL_SCALE, UV_SCALE, clamp_logged, clamp_uv, decode_normal, decode_uv, encode_normal,
    encode_uv, flip_v,
};

// Re-export commonly used format items
pub use formats::{
    BOB_EXT, BOB_MAGIC, BOB_MAX_VERTICES, BinarySerializable, BobDocument, BobFormat, BobHeader,
    BobIndices, BobVertex, COB_EXT, COB_MAGIC, CobDocument, CobHeader, MeshFileKind, decode_bob,
    decode_cob, encode_bob, encode_cob,
};
