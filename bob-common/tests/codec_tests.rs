//! End-to-end codec tests
//!
//! Builds meshes the way an exporter would (one corner per face vertex, shared
//! source indices) and checks what survives a trip through the binary formats.

use bob_common::{
    BOB_MAGIC, BobDocument, BobHeader, COB_MAGIC, Corner, FaceCorner, Mesh, MeshError, Polygon,
    VertexWelder, decode_bob, decode_cob, encode_bob, encode_cob, encode_normal, encode_uv,
};
use glam::{Vec2, Vec3};

/// A UV-mapped grid of `n` x `n` quads, split into triangles
///
/// Each grid point is one source vertex. Corners on the seam column get a
/// different U on either side, so welding must split those vertices.
fn grid(n: u32) -> Mesh {
    let side = n + 1;
    let vertices = (0..side * side)
        .map(|i| Vec3::new((i % side) as f32, ((i / side) as f32).sin(), (i / side) as f32))
        .collect();

    let corner = |x: u32, y: u32, seam_right: bool| {
        let u = if seam_right && x == n { 0.0 } else { x as f32 / n as f32 };
        Corner {
            vertex: y * side + x,
            normal: Vec3::new(0.0, 1.0, 0.0),
            uv: Some(Vec2::new(u, y as f32 / n as f32)),
        }
    };

    let mut polygons = Vec::new();
    for y in 0..n {
        for x in 0..n {
            let seam = x == n - 1 && y % 2 == 0;
            polygons.push(Polygon::new(vec![
                corner(x, y, false),
                corner(x + 1, y, seam),
                corner(x + 1, y + 1, seam),
            ]));
            polygons.push(Polygon::new(vec![
                corner(x, y, false),
                corner(x + 1, y + 1, seam),
                corner(x, y + 1, false),
            ]));
        }
    }
    Mesh::new(vertices, polygons)
}

fn le_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
}

#[test]
fn bob_roundtrip_within_quantization_error() {
    let mesh = grid(6);
    let decoded = decode_bob(&encode_bob(&mesh).unwrap()).unwrap();

    assert_eq!(decoded.polygons.len(), mesh.polygons.len());
    for (original, round) in mesh.polygons.iter().zip(&decoded.polygons) {
        for (a, b) in original.corners.iter().zip(&round.corners) {
            let pa = mesh.vertices[a.vertex as usize];
            let pb = decoded.vertices[b.vertex as usize];
            assert_eq!(pa, pb);

            let uv_error = (a.uv.unwrap() - b.uv.unwrap()).abs().max_element();
            assert!(uv_error <= 1.0 / 65535.0 + f32::EPSILON, "uv error {}", uv_error);

            let normal_error = (a.normal - b.normal).abs().max_element();
            assert!(normal_error <= 1.0 / 32767.0, "normal error {}", normal_error);
        }
    }
}

#[test]
fn bob_welds_shared_vertices_and_splits_seams() {
    let mesh = grid(4);
    let document = BobDocument::read(&encode_bob(&mesh).unwrap()).unwrap();

    // 25 grid points, plus a split copy of (4,1), (4,2) and (4,3), which
    // appear with both U = 0 and U = 1. (4,0) only ever has U = 0.
    assert_eq!(document.vertices.len(), 28);
    assert_eq!(document.face_count(), 32);
}

#[test]
fn bob_encoded_size_matches_counts() {
    let bytes = encode_bob(&grid(3)).unwrap();
    let header = BobHeader::from_bytes(&bytes).unwrap();
    assert_eq!(header.magic, BOB_MAGIC);
    assert_eq!(
        bytes.len(),
        16 + 24 * header.vertex_count as usize + 6 * header.face_count as usize
    );
    assert_eq!(header.file_size(), Some(bytes.len()));
}

#[test]
fn decoded_indices_are_in_bounds() {
    let bytes = encode_bob(&grid(5)).unwrap();
    let document = BobDocument::read(&bytes).unwrap();
    let vertex_count = document.vertices.len() as u32;
    assert!(document.indices.iter().all(|i| i < vertex_count));

    let mesh = decode_cob(&encode_cob(&grid(5)).unwrap()).unwrap();
    let count = mesh.vertices.len() as u32;
    assert!(
        mesh.polygons
            .iter()
            .flat_map(|p| p.corners.iter())
            .all(|c| c.vertex < count)
    );
}

#[test]
fn welder_idempotence_and_separation() {
    let a = FaceCorner {
        position: Vec3::new(1.0, 1.0, 1.0),
        normal: Vec3::Y,
        uv: Some(Vec2::new(0.5, 0.5)),
        source_index: 10,
    };
    let b = FaceCorner {
        source_index: 11,
        ..a
    };

    let mut welder = VertexWelder::new();
    let first = welder.weld(&a);
    assert_eq!(welder.weld(&a), first);
    assert_ne!(welder.weld(&b), first);
    assert_eq!(welder.len(), 2);
}

#[test]
fn format_rejection_by_magic() {
    let bob = encode_bob(&grid(1)).unwrap();
    let cob = encode_cob(&grid(1)).unwrap();

    assert_eq!(le_u32(&bob, 0), BOB_MAGIC);
    assert_eq!(le_u32(&cob, 0), COB_MAGIC);

    assert_eq!(
        decode_bob(&cob),
        Err(MeshError::BadMagic {
            expected: BOB_MAGIC,
            found: COB_MAGIC
        })
    );
    assert_eq!(
        decode_cob(&bob),
        Err(MeshError::BadMagic {
            expected: COB_MAGIC,
            found: BOB_MAGIC
        })
    );
}

#[test]
fn clamp_behavior() {
    assert_eq!(encode_uv(1.5, -0.2), [65535, 0]);
    assert_eq!(encode_normal(2.0, -2.0, 0.0), [32767, -32767, 0]);
}

#[test]
fn untriangulated_quad_is_malformed() {
    let corners = (0..4)
        .map(|vertex| Corner {
            vertex,
            normal: Vec3::Z,
            uv: None,
        })
        .collect();
    let quad = Mesh::new(
        vec![Vec3::ZERO, Vec3::X, Vec3::new(1.0, 1.0, 0.0), Vec3::Y],
        vec![Polygon::new(corners)],
    );

    for result in [encode_bob(&quad), encode_cob(&quad)] {
        let err = result.unwrap_err();
        assert!(err.is_malformed_mesh());
        assert_eq!(
            err,
            MeshError::MalformedMesh {
                polygon: 0,
                corners: 4
            }
        );
    }
}

#[test]
fn cob_roundtrip_keeps_caller_vertices() {
    let mesh = grid(3);
    let bytes = encode_cob(&mesh).unwrap();
    assert_eq!(le_u32(&bytes, 4), 16);
    assert_eq!(le_u32(&bytes, 8), 18);
    assert_eq!(bytes.len(), 12 + 16 * 12 + 18 * 24);

    let decoded = decode_cob(&bytes).unwrap();
    assert_eq!(decoded.vertices, mesh.vertices);
    for (a, b) in mesh.polygons.iter().zip(&decoded.polygons) {
        let indices_a: Vec<u32> = a.corners.iter().map(|c| c.vertex).collect();
        let indices_b: Vec<u32> = b.corners.iter().map(|c| c.vertex).collect();
        assert_eq!(indices_a, indices_b);
        assert_eq!(b.normal, Some(a.face_normal(&mesh.vertices)));
    }
}
