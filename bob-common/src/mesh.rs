//! Generic caller-facing mesh
//!
//! [`Mesh`] is the value callers hand to the encoders and get back from the
//! decoders. Polygons may have any arity here, but the codecs only accept
//! triangles: triangulation is the caller's job, and [`Mesh::ensure_triangulated`]
//! is the gate every encoder goes through.

use glam::{Vec2, Vec3};

use crate::error::MeshError;
use crate::weld::{FaceCorner, WeldedMesh};

/// One polygon corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Corner {
    /// Index into [`Mesh::vertices`]
    pub vertex: u32,
    pub normal: Vec3,
    pub uv: Option<Vec2>,
}

/// A polygon with an optional explicit face normal
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polygon {
    pub corners: Vec<Corner>,
    pub normal: Option<Vec3>,
}

impl Polygon {
    pub fn new(corners: Vec<Corner>) -> Self {
        Self {
            corners,
            normal: None,
        }
    }

    pub fn is_triangle(&self) -> bool {
        self.corners.len() == 3
    }

    /// Explicit normal, or the geometric normal of the first three corners
    ///
    /// Degenerate polygons and polygons referencing missing vertices yield zero.
    pub fn face_normal(&self, vertices: &[Vec3]) -> Vec3 {
        if let Some(normal) = self.normal {
            return normal;
        }
        let mut points = self
            .corners
            .iter()
            .take(3)
            .filter_map(|c| vertices.get(c.vertex as usize));
        match (points.next(), points.next(), points.next()) {
            (Some(&a), Some(&b), Some(&c)) => (b - a).cross(c - a).normalize_or_zero(),
            _ => Vec3::ZERO,
        }
    }
}

/// Vertex positions plus polygons referencing them
///
/// A vertex's position in `vertices` is its source index when welding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vec3>,
    pub polygons: Vec<Polygon>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vec3>, polygons: Vec<Polygon>) -> Self {
        Self { vertices, polygons }
    }

    /// Fail with [`MeshError::MalformedMesh`] on the first non-triangle
    pub fn ensure_triangulated(&self) -> Result<(), MeshError> {
        match self.polygons.iter().position(|p| !p.is_triangle()) {
            Some(polygon) => Err(MeshError::MalformedMesh {
                polygon,
                corners: self.polygons[polygon].corners.len(),
            }),
            None => Ok(()),
        }
    }

    /// Fail on the first corner referencing a vertex that does not exist
    pub fn ensure_valid_references(&self) -> Result<(), MeshError> {
        for (polygon, p) in self.polygons.iter().enumerate() {
            for corner in &p.corners {
                if corner.vertex as usize >= self.vertices.len() {
                    return Err(MeshError::InvalidVertexReference {
                        polygon,
                        vertex: corner.vertex,
                        vertex_count: self.vertices.len(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Flatten triangles into the corner stream consumed by the welder
    pub fn face_corners(&self) -> Result<Vec<FaceCorner>, MeshError> {
        self.ensure_triangulated()?;
        self.ensure_valid_references()?;

        Ok(self
            .polygons
            .iter()
            .flat_map(|p| p.corners.iter())
            .map(|c| FaceCorner {
                position: self.vertices[c.vertex as usize],
                normal: c.normal,
                uv: c.uv,
                source_index: c.vertex,
            })
            .collect())
    }

    /// Rebuild a mesh from welded output, one mesh vertex per welded vertex
    pub fn from_welded(welded: &WeldedMesh) -> Self {
        let vertices = welded.vertices.iter().map(|v| v.position).collect();
        let polygons = welded
            .faces
            .iter()
            .map(|face| {
                Polygon::new(
                    face.iter()
                        .map(|&i| {
                            let v = &welded.vertices[i as usize];
                            Corner {
                                vertex: i,
                                normal: v.normal,
                                uv: v.uv,
                            }
                        })
                        .collect(),
                )
            })
            .collect();
        Self { vertices, polygons }
    }

    /// Whether any corner carries a UV
    pub fn has_uvs(&self) -> bool {
        self.polygons
            .iter()
            .flat_map(|p| p.corners.iter())
            .any(|c| c.uv.is_some())
    }

    /// Number of triangles a fan triangulation of this mesh would produce
    pub fn triangle_count(&self) -> usize {
        self.polygons
            .iter()
            .map(|p| p.corners.len().saturating_sub(2))
            .sum()
    }
}
