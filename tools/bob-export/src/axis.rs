//! Axis conversion between Z-up sources and the engine's Y-up space
//!
//! The engine is Y-up with -Z forward. A Z-up, Y-forward source maps
//! `(x, y, z) -> (x, z, -y)` on export and back on import.

use bob_common::Mesh;
use glam::{Mat3, Vec3};

/// Rotation taking Z-up coordinates into engine space
pub fn z_up_to_engine() -> Mat3 {
    Mat3::from_cols(Vec3::X, Vec3::NEG_Z, Vec3::Y)
}

/// Rotation taking engine coordinates back to Z-up
pub fn engine_to_z_up() -> Mat3 {
    z_up_to_engine().transpose()
}

/// Rotate positions, corner normals and face normals in place
pub fn transform_mesh(mesh: &mut Mesh, rotation: Mat3) {
    for v in &mut mesh.vertices {
        *v = rotation * *v;
    }
    for polygon in &mut mesh.polygons {
        polygon.normal = polygon.normal.map(|n| rotation * n);
        for corner in &mut polygon.corners {
            corner.normal = rotation * corner.normal;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bob_common::{Corner, Polygon};

    #[test]
    fn test_z_up_mapping() {
        let m = z_up_to_engine();
        assert_eq!(m * Vec3::new(1.0, 2.0, 3.0), Vec3::new(1.0, 3.0, -2.0));
        // Up stays up
        assert_eq!(m * Vec3::Z, Vec3::Y);
    }

    #[test]
    fn test_inverse() {
        let p = Vec3::new(0.5, -4.0, 2.0);
        assert_eq!(engine_to_z_up() * (z_up_to_engine() * p), p);
        assert_eq!(engine_to_z_up() * Vec3::new(1.0, 3.0, -2.0), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_transform_mesh() {
        let mut mesh = Mesh::new(
            vec![Vec3::new(0.0, 1.0, 0.0)],
            vec![Polygon {
                corners: vec![Corner {
                    vertex: 0,
                    normal: Vec3::Z,
                    uv: None,
                }],
                normal: Some(Vec3::Z),
            }],
        );
        transform_mesh(&mut mesh, z_up_to_engine());
        assert_eq!(mesh.vertices[0], Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(mesh.polygons[0].corners[0].normal, Vec3::Y);
        assert_eq!(mesh.polygons[0].normal, Some(Vec3::Y));
    }
}
