//! bob-export library
//!
//! Conversion between Wavefront OBJ and the BOB/COB mesh formats, for use by
//! the `bob-export` binary and other tools.

pub mod axis;
pub mod inspect;
pub mod manifest;
pub mod mesh;

// Re-export the codec layer so callers need only one dependency
pub use bob_common::{
    BOB_EXT, COB_EXT, Mesh, MeshError, MeshFileKind, decode_bob, decode_cob, encode_bob,
    encode_cob,
};

pub use inspect::{MeshSummary, inspect, summarize};
pub use mesh::{
    ConvertedMesh, ExportOptions, convert_obj, convert_obj_to_memory, import_mesh, load_mesh_file,
};
