//! Fan triangulation
//!
//! Stands in for the host application's triangulator: the codecs only accept
//! triangles and never triangulate on their own.

use bob_common::{Mesh, Polygon};

/// Whether any polygon is not a triangle
pub fn needs_triangulation(mesh: &Mesh) -> bool {
    mesh.polygons.iter().any(|p| !p.is_triangle())
}

/// Split every polygon into a fan of triangles around its first corner
///
/// Polygons with fewer than three corners are dropped. Explicit face normals
/// carry over to every triangle of the fan.
pub fn triangulate(mesh: &Mesh) -> Mesh {
    let mut polygons = Vec::with_capacity(mesh.triangle_count());

    for (index, polygon) in mesh.polygons.iter().enumerate() {
        let corners = &polygon.corners;
        if corners.len() < 3 {
            tracing::warn!(
                "dropping polygon {} with {} corners",
                index,
                corners.len()
            );
            continue;
        }
        for i in 1..corners.len() - 1 {
            polygons.push(Polygon {
                corners: vec![corners[0], corners[i], corners[i + 1]],
                normal: polygon.normal,
            });
        }
    }

    Mesh::new(mesh.vertices.clone(), polygons)
}
