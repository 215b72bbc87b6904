//! COB collision mesh format (.cob)
//!
//! Positions only, u32-indexed triangles, one float normal per face.
//! Vertices are stored one per caller vertex, without welding.
//!
//! # Layout
//! ```text
//! 0x00: magic u32 (13466)
//! 0x04: vertex_count u32
//! 0x08: face_count u32
//! 0x0C: positions (vertex_count * f32x3)
//! var:  indices (face_count * 3 * u32)
//! var:  face normals (face_count * f32x3)
//! ```

use std::io::{Cursor, Write};

use glam::Vec3;

use super::io::{ensure_len, put_f32x3, read_f32x3, read_u32};
use crate::error::MeshError;
use crate::mesh::{Corner, Mesh, Polygon};

/// COB file magic
pub const COB_MAGIC: u32 = 13466;

/// COB header (12 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CobHeader {
    pub magic: u32,
    pub vertex_count: u32,
    pub face_count: u32,
}

impl CobHeader {
    pub const SIZE: usize = 12;

    pub fn new(vertex_count: u32, face_count: u32) -> Self {
        Self {
            magic: COB_MAGIC,
            vertex_count,
            face_count,
        }
    }

    /// Write header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&self.magic.to_le_bytes());
        bytes[4..8].copy_from_slice(&self.vertex_count.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.face_count.to_le_bytes());
        bytes
    }

    /// Read header from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        let word = |i: usize| u32::from_le_bytes([bytes[i], bytes[i + 1], bytes[i + 2], bytes[i + 3]]);
        Some(Self {
            magic: word(0),
            vertex_count: word(4),
            face_count: word(8),
        })
    }

    /// Total file size implied by the counts
    pub fn file_size(&self) -> Option<usize> {
        let positions = (self.vertex_count as usize).checked_mul(12)?;
        // 12 bytes of indices plus 12 bytes of normal per face
        let faces = (self.face_count as usize).checked_mul(24)?;
        Self::SIZE.checked_add(positions)?.checked_add(faces)
    }
}

/// A decoded or ready-to-write COB file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CobDocument {
    pub positions: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
    /// One normal per face
    pub normals: Vec<[f32; 3]>,
}

impl CobDocument {
    /// Take positions in caller order and a normal per triangle
    ///
    /// Faces without an explicit normal get their geometric normal.
    pub fn from_mesh(mesh: &Mesh) -> Result<Self, MeshError> {
        mesh.ensure_triangulated()?;
        mesh.ensure_valid_references()?;

        Ok(Self {
            positions: mesh.vertices.iter().map(|v| v.to_array()).collect(),
            indices: mesh
                .polygons
                .iter()
                .flat_map(|p| p.corners.iter().map(|c| c.vertex))
                .collect(),
            normals: mesh
                .polygons
                .iter()
                .map(|p| p.face_normal(&mesh.vertices).to_array())
                .collect(),
        })
    }

    pub fn face_count(&self) -> usize {
        self.normals.len()
    }

    pub fn header(&self) -> CobHeader {
        CobHeader::new(self.positions.len() as u32, self.face_count() as u32)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let header = self.header();
        let mut out = Vec::with_capacity(header.file_size().unwrap_or(CobHeader::SIZE));
        out.extend_from_slice(&header.to_bytes());
        for &position in &self.positions {
            put_f32x3(&mut out, position);
        }
        for index in &self.indices {
            out.extend_from_slice(&index.to_le_bytes());
        }
        for &normal in &self.normals {
            put_f32x3(&mut out, normal);
        }
        out
    }

    pub fn write<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        w.write_all(&self.to_bytes())
    }

    /// Parse and validate a COB file
    pub fn read(data: &[u8]) -> Result<Self, MeshError> {
        let mut cursor = Cursor::new(data);

        let magic = read_u32(&mut cursor)?;
        if magic != COB_MAGIC {
            return Err(MeshError::BadMagic {
                expected: COB_MAGIC,
                found: magic,
            });
        }
        let vertex_count = read_u32(&mut cursor)?;
        let face_count = read_u32(&mut cursor)?;

        ensure_len(
            data,
            CobHeader::SIZE,
            &[(vertex_count, 12), (face_count, 12), (face_count, 12)],
        )?;

        let positions = (0..vertex_count)
            .map(|_| read_f32x3(&mut cursor))
            .collect::<Result<Vec<_>, _>>()?;
        let indices = (0..face_count as usize * 3)
            .map(|_| read_u32(&mut cursor))
            .collect::<Result<Vec<_>, _>>()?;
        let normals = (0..face_count)
            .map(|_| read_f32x3(&mut cursor))
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(&index) = indices.iter().find(|&&i| i >= vertex_count) {
            return Err(MeshError::IndexOutOfRange {
                index,
                vertex_count,
            });
        }

        tracing::debug!("read COB: {} vertices, {} faces", vertex_count, face_count);

        Ok(Self {
            positions,
            indices,
            normals,
        })
    }

    /// Build a caller mesh with the face normal on the polygon and every corner
    pub fn to_mesh(&self) -> Mesh {
        let vertices = self.positions.iter().copied().map(Vec3::from).collect();
        let polygons = self
            .indices
            .chunks_exact(3)
            .zip(&self.normals)
            .map(|(face, &normal)| {
                let normal = Vec3::from(normal);
                Polygon {
                    corners: face
                        .iter()
                        .map(|&vertex| Corner {
                            vertex,
                            normal,
                            uv: None,
                        })
                        .collect(),
                    normal: Some(normal),
                }
            })
            .collect();
        Mesh::new(vertices, polygons)
    }
}

/// Encode a triangulated mesh as a COB file
pub fn encode_cob(mesh: &Mesh) -> Result<Vec<u8>, MeshError> {
    Ok(CobDocument::from_mesh(mesh)?.to_bytes())
}

/// Decode a COB file into a mesh
pub fn decode_cob(data: &[u8]) -> Result<Mesh, MeshError> {
    Ok(CobDocument::read(data)?.to_mesh())
}
