//! Codec error types

/// Errors produced while encoding or decoding BOB/COB meshes
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeshError {
    /// Leading integer does not identify the expected format
    #[error("bad magic {found} (expected {expected})")]
    BadMagic { expected: u32, found: u32 },

    /// Valid magic but an unknown format variant
    #[error("unsupported mesh format variant {0} (must be 0 or 1)")]
    UnsupportedFormat(u32),

    /// Fewer bytes than the header or the declared counts require
    #[error("truncated data: need {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    /// A polygon that is not a triangle reached the codec
    #[error("polygon {polygon} has {corners} corners - mesh must be triangulated")]
    MalformedMesh { polygon: usize, corners: usize },

    /// A polygon corner references a vertex that does not exist
    #[error("polygon {polygon} references vertex {vertex}, mesh has {vertex_count} vertices")]
    InvalidVertexReference {
        polygon: usize,
        vertex: u32,
        vertex_count: usize,
    },

    /// A face-corner stream whose length is not a multiple of three
    #[error("{corners} face corners do not form whole triangles")]
    IncompleteFace { corners: usize },

    /// Welded vertex count exceeds what 16-bit indices can address
    #[error("mesh has {count} vertices, exceeds maximum {max} for u16 indices")]
    TooManyVertices { count: usize, max: usize },

    /// A decoded face index points past the vertex array
    #[error("index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: u32 },
}

impl MeshError {
    /// True for errors caused by an invalid input mesh on the write path
    pub fn is_malformed_mesh(&self) -> bool {
        matches!(
            self,
            MeshError::MalformedMesh { .. }
                | MeshError::InvalidVertexReference { .. }
                | MeshError::IncompleteFace { .. }
        )
    }
}
