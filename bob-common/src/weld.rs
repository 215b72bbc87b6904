//! Vertex welding
//!
//! Reduces a per-face-corner attribute stream into an indexed vertex buffer.
//! Candidates are only searched among corners sharing the same source index,
//! so distinct source vertices never merge even when numerically identical.

use glam::{Vec2, Vec3};
use hashbrown::HashMap;

use crate::error::MeshError;

/// Maximum attribute distance for two corners to share a vertex
pub const WELD_TOLERANCE: f32 = 0.01;

/// A single face corner before welding
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceCorner {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Option<Vec2>,
    /// Index of the caller's original vertex
    pub source_index: u32,
}

/// A welded vertex with its assigned buffer index
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeldedVertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Option<Vec2>,
    pub index: u32,
}

impl WeldedVertex {
    /// Whether `corner` is close enough to reuse this vertex
    ///
    /// A UV missing on either side is not a mismatch.
    pub fn is_similar(&self, corner: &FaceCorner) -> bool {
        let similar = (self.position - corner.position).length() < WELD_TOLERANCE
            && (self.normal - corner.normal).length() < WELD_TOLERANCE;
        match (self.uv, corner.uv) {
            (Some(a), Some(b)) => similar && (a - b).length() < WELD_TOLERANCE,
            _ => similar,
        }
    }
}

/// Welded output: vertices in index order plus triangle indices
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeldedMesh {
    pub vertices: Vec<WeldedVertex>,
    pub faces: Vec<[u32; 3]>,
}

/// Incremental welder, one instance per export
#[derive(Debug, Default)]
pub struct VertexWelder {
    vertices: Vec<WeldedVertex>,
    by_source: HashMap<u32, Vec<u32>>,
}

impl VertexWelder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the index of a vertex matching `corner`, creating one if needed
    pub fn weld(&mut self, corner: &FaceCorner) -> u32 {
        let candidates = self.by_source.entry(corner.source_index).or_default();

        for &index in candidates.iter() {
            if self.vertices[index as usize].is_similar(corner) {
                return index;
            }
        }

        let index = self.vertices.len() as u32;
        self.vertices.push(WeldedVertex {
            position: corner.position,
            normal: corner.normal,
            uv: corner.uv,
            index,
        });
        candidates.push(index);
        index
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertices(&self) -> &[WeldedVertex] {
        &self.vertices
    }

    pub fn into_vertices(self) -> Vec<WeldedVertex> {
        self.vertices
    }
}

/// Weld a corner stream laid out as consecutive triangles
pub fn weld_corners(corners: &[FaceCorner]) -> Result<WeldedMesh, MeshError> {
    if corners.len() % 3 != 0 {
        return Err(MeshError::IncompleteFace {
            corners: corners.len(),
        });
    }

    let mut welder = VertexWelder::new();
    let faces = corners
        .chunks_exact(3)
        .map(|tri| [welder.weld(&tri[0]), welder.weld(&tri[1]), welder.weld(&tri[2])])
        .collect::<Vec<_>>();

    tracing::debug!(
        "welded {} corners into {} vertices",
        corners.len(),
        welder.len()
    );

    Ok(WeldedMesh {
        vertices: welder.into_vertices(),
        faces,
    })
}
