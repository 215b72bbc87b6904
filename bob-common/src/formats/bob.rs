//! BOB renderable mesh format (.bob)
//!
//! Indexed triangles with a quantized UV and normal per vertex.
//!
//! # Layout
//! ```text
//! 0x00: magic u32 (45623)
//! 0x04: format u32 (0 = u8 indices, 1 = u16 indices)
//! 0x08: vertex_count u32
//! 0x0C: face_count u32
//! 0x10: vertices (vertex_count * 24 bytes)
//!         f32 x, y, z | u16 u, v | i16 nx, ny, nz | 2 bytes padding
//! var:  indices (face_count * 3 * index size)
//! ```
//!
//! Writers always emit format 1. Format 0 is only read.

use std::io::{Cursor, Write};

use glam::{Vec2, Vec3};

use super::io::{ensure_len, put_f32x3, read_f32x3, read_i16, read_u8, read_u16, read_u32, skip};
use crate::error::MeshError;
use crate::mesh::{Corner, Mesh, Polygon};
use crate::packing::{clamp_uv, decode_normal, decode_uv, encode_normal, encode_uv, flip_v};
use crate::weld::{WeldedMesh, WeldedVertex, weld_corners};

/// BOB file magic
pub const BOB_MAGIC: u32 = 45623;

/// Largest vertex count addressable by u16 indices
pub const BOB_MAX_VERTICES: usize = u16::MAX as usize + 1;

/// Index width variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum BobFormat {
    /// u8 indices (legacy, read-only)
    Index8 = 0,
    /// u16 indices
    Index16 = 1,
}

impl BobFormat {
    /// Bytes per index on disk
    pub const fn index_size(self) -> usize {
        match self {
            BobFormat::Index8 => 1,
            BobFormat::Index16 => 2,
        }
    }
}

impl TryFrom<u32> for BobFormat {
    type Error = MeshError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(BobFormat::Index8),
            1 => Ok(BobFormat::Index16),
            other => Err(MeshError::UnsupportedFormat(other)),
        }
    }
}

/// BOB header (16 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BobHeader {
    pub magic: u32,
    pub format: u32,
    pub vertex_count: u32,
    pub face_count: u32,
}

impl BobHeader {
    pub const SIZE: usize = 16;

    pub fn new(format: BobFormat, vertex_count: u32, face_count: u32) -> Self {
        Self {
            magic: BOB_MAGIC,
            format: format as u32,
            vertex_count,
            face_count,
        }
    }

    /// Write header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&self.magic.to_le_bytes());
        bytes[4..8].copy_from_slice(&self.format.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.vertex_count.to_le_bytes());
        bytes[12..16].copy_from_slice(&self.face_count.to_le_bytes());
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
            format: word(4),
            vertex_count: word(8),
            face_count: word(12),
        })
    }

    /// Total file size implied by the counts, if the format is known
    pub fn file_size(&self) -> Option<usize> {
        let format = BobFormat::try_from(self.format).ok()?;
        let vertices = (self.vertex_count as usize).checked_mul(BobVertex::SIZE)?;
        let indices = (self.face_count as usize)
            .checked_mul(3)?
            .checked_mul(format.index_size())?;
        Self::SIZE.checked_add(vertices)?.checked_add(indices)
    }
}

/// One quantized vertex record (24 bytes on disk)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BobVertex {
    pub position: [f32; 3],
    pub uv: [u16; 2],
    pub normal: [i16; 3],
}

impl BobVertex {
    pub const SIZE: usize = 24;

    /// Quantize a welded vertex, flipping V into the engine's convention
    pub fn from_welded(vertex: &WeldedVertex) -> Self {
        let uv = match vertex.uv {
            Some(uv) => {
                let uv = flip_v(clamp_uv(uv));
                encode_uv(uv.x, uv.y)
            }
            None => [0, 0],
        };
        let n = vertex.normal;
        Self {
            position: vertex.position.to_array(),
            uv,
            normal: encode_normal(n.x, n.y, n.z),
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from(self.position)
    }

    /// Dequantized UV in the engine's convention (not flipped)
    pub fn uv(&self) -> Vec2 {
        decode_uv(self.uv[0], self.uv[1])
    }

    pub fn normal(&self) -> Vec3 {
        decode_normal(self.normal[0], self.normal[1], self.normal[2])
    }

    fn put(&self, out: &mut Vec<u8>) {
        put_f32x3(out, self.position);
        for c in self.uv {
            out.extend_from_slice(&c.to_le_bytes());
        }
        for c in self.normal {
            out.extend_from_slice(&c.to_le_bytes());
        }
        out.extend_from_slice(&[0, 0]);
    }

    fn read(cursor: &mut Cursor<&[u8]>) -> Result<Self, MeshError> {
        let position = read_f32x3(cursor)?;
        let uv = [read_u16(cursor)?, read_u16(cursor)?];
        let normal = [read_i16(cursor)?, read_i16(cursor)?, read_i16(cursor)?];
        skip(cursor, 2)?;
        Ok(Self {
            position,
            uv,
            normal,
        })
    }
}

/// Index buffer, with the width resolved once per document
#[derive(Debug, Clone, PartialEq)]
pub enum BobIndices {
    /// Format 0; on-disk bytes are read as unsigned 0..=255
    Index8(Vec<u8>),
    /// Format 1
    Index16(Vec<u16>),
}

impl BobIndices {
    pub fn format(&self) -> BobFormat {
        match self {
            BobIndices::Index8(_) => BobFormat::Index8,
            BobIndices::Index16(_) => BobFormat::Index16,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            BobIndices::Index8(v) => v.len(),
            BobIndices::Index16(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate indices widened to u32
    pub fn iter(&self) -> Box<dyn Iterator<Item = u32> + '_> {
        match self {
            BobIndices::Index8(v) => Box::new(v.iter().map(|&i| u32::from(i))),
            BobIndices::Index16(v) => Box::new(v.iter().map(|&i| u32::from(i))),
        }
    }

    fn read(
        cursor: &mut Cursor<&[u8]>,
        format: BobFormat,
        count: usize,
    ) -> Result<Self, MeshError> {
        Ok(match format {
            BobFormat::Index8 => BobIndices::Index8(
                (0..count)
                    .map(|_| read_u8(cursor))
                    .collect::<Result<_, _>>()?,
            ),
            BobFormat::Index16 => BobIndices::Index16(
                (0..count)
                    .map(|_| read_u16(cursor))
                    .collect::<Result<_, _>>()?,
            ),
        })
    }

    /// Write as u16; legacy u8 indices are widened
    fn put(&self, out: &mut Vec<u8>) {
        for i in self.iter() {
            out.extend_from_slice(&(i as u16).to_le_bytes());
        }
    }
}

/// A decoded or ready-to-write BOB file
#[derive(Debug, Clone, PartialEq)]
pub struct BobDocument {
    pub vertices: Vec<BobVertex>,
    pub indices: BobIndices,
}

impl BobDocument {
    /// Quantize welded output into a format-1 document
    pub fn from_welded(welded: &WeldedMesh) -> Result<Self, MeshError> {
        if welded.vertices.len() > BOB_MAX_VERTICES {
            return Err(MeshError::TooManyVertices {
                count: welded.vertices.len(),
                max: BOB_MAX_VERTICES,
            });
        }

        let vertices = welded.vertices.iter().map(BobVertex::from_welded).collect();
        let indices = welded
            .faces
            .iter()
            .flat_map(|face| face.iter().map(|&i| i as u16))
            .collect();

        Ok(Self {
            vertices,
            indices: BobIndices::Index16(indices),
        })
    }

    pub fn format(&self) -> BobFormat {
        self.indices.format()
    }

    pub fn face_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Header as written: always format 1, whatever format was read
    pub fn header(&self) -> BobHeader {
        BobHeader::new(
            BobFormat::Index16,
            self.vertices.len() as u32,
            self.face_count() as u32,
        )
    }

    /// Index triples in file order
    pub fn faces(&self) -> Vec<[u32; 3]> {
        let flat: Vec<u32> = self.indices.iter().collect();
        flat.chunks_exact(3).map(|f| [f[0], f[1], f[2]]).collect()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let header = self.header();
        let mut out = Vec::with_capacity(header.file_size().unwrap_or(BobHeader::SIZE));
        out.extend_from_slice(&header.to_bytes());
        for vertex in &self.vertices {
            vertex.put(&mut out);
        }
        self.indices.put(&mut out);
        out
    }

    pub fn write<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        w.write_all(&self.to_bytes())
    }

    /// Parse and validate a BOB file
    pub fn read(data: &[u8]) -> Result<Self, MeshError> {
        let mut cursor = Cursor::new(data);

        let magic = read_u32(&mut cursor)?;
        if magic != BOB_MAGIC {
            return Err(MeshError::BadMagic {
                expected: BOB_MAGIC,
                found: magic,
            });
        }
        let format = BobFormat::try_from(read_u32(&mut cursor)?)?;
        let vertex_count = read_u32(&mut cursor)?;
        let face_count = read_u32(&mut cursor)?;

        let index_count = face_count.checked_mul(3).ok_or(MeshError::Truncated {
            expected: usize::MAX,
            actual: data.len(),
        })?;
        ensure_len(
            data,
            BobHeader::SIZE,
            &[
                (vertex_count, BobVertex::SIZE),
                (index_count, format.index_size()),
            ],
        )?;

        let vertices = (0..vertex_count)
            .map(|_| BobVertex::read(&mut cursor))
            .collect::<Result<Vec<_>, _>>()?;
        let indices = BobIndices::read(&mut cursor, format, index_count as usize)?;

        if let Some(index) = indices.iter().find(|&i| i >= vertex_count) {
            return Err(MeshError::IndexOutOfRange {
                index,
                vertex_count,
            });
        }

        tracing::debug!(
            "read BOB: format={:?}, {} vertices, {} faces",
            format,
            vertex_count,
            face_count
        );

        Ok(Self { vertices, indices })
    }

    /// Build a caller mesh: normals and UVs are looked up per corner, V is flipped back
    pub fn to_mesh(&self) -> Mesh {
        let vertices = self.vertices.iter().map(BobVertex::position).collect();
        let polygons = self
            .faces()
            .into_iter()
            .map(|face| {
                Polygon::new(
                    face.iter()
                        .map(|&i| {
                            let v = &self.vertices[i as usize];
                            Corner {
                                vertex: i,
                                normal: v.normal(),
                                uv: Some(flip_v(v.uv())),
                            }
                        })
                        .collect(),
                )
            })
            .collect();
        Mesh::new(vertices, polygons)
    }
}

/// Encode a triangulated mesh as a BOB file
///
/// Nothing is returned unless the whole mesh encodes.
pub fn encode_bob(mesh: &Mesh) -> Result<Vec<u8>, MeshError> {
    let corners = mesh.face_corners()?;
    let welded = weld_corners(&corners)?;
    let document = BobDocument::from_welded(&welded)?;
    Ok(document.to_bytes())
}

/// Decode a BOB file into a mesh
pub fn decode_bob(data: &[u8]) -> Result<Mesh, MeshError> {
    Ok(BobDocument::read(data)?.to_mesh())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Mesh {
        let uvs = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]];
        Mesh::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            vec![Polygon::new(
                (0..3)
                    .map(|i| Corner {
                        vertex: i,
                        normal: Vec3::Z,
                        uv: Some(Vec2::from(uvs[i as usize])),
                    })
                    .collect(),
            )],
        )
    }

    /// Hand-built file with format 0 and the given indices
    fn index8_file(vertex_count: u32, indices: &[u8]) -> Vec<u8> {
        let mut data = BobHeader::new(BobFormat::Index8, vertex_count, (indices.len() / 3) as u32)
            .to_bytes()
            .to_vec();
        for i in 0..vertex_count {
            BobVertex {
                position: [i as f32, 0.0, 0.0],
                uv: [0, 65535],
                normal: [0, 32767, 0],
            }
            .put(&mut data);
        }
        data.extend_from_slice(indices);
        data
    }

    #[test]
    fn test_vertex_record_layout() {
        let vertex = BobVertex {
            position: [1.0, 2.0, 3.0],
            uv: [0x1234, 0xFFFF],
            normal: [-32767, 0, 32767],
        };
        let mut out = Vec::new();
        vertex.put(&mut out);
        assert_eq!(out.len(), BobVertex::SIZE);
        assert_eq!(&out[0..4], &1.0f32.to_le_bytes());
        assert_eq!(&out[12..14], &[0x34, 0x12]);
        assert_eq!(&out[16..18], &(-32767i16).to_le_bytes());
        assert_eq!(&out[22..24], &[0, 0]);

        let mut cursor = Cursor::new(&out[..]);
        assert_eq!(BobVertex::read(&mut cursor).unwrap(), vertex);
    }

    #[test]
    fn test_single_triangle_scenario() {
        let bytes = encode_bob(&triangle()).unwrap();
        assert_eq!(bytes.len(), BobHeader::SIZE + 3 * BobVertex::SIZE + 3 * 2);

        let header = BobHeader::from_bytes(&bytes).unwrap();
        assert_eq!(header.magic, BOB_MAGIC);
        assert_eq!(header.format, 1);
        assert_eq!(header.vertex_count, 3);
        assert_eq!(header.face_count, 1);

        let document = BobDocument::read(&bytes).unwrap();
        let stored: Vec<Vec2> = document.vertices.iter().map(BobVertex::uv).collect();
        assert_eq!(
            stored,
            vec![Vec2::new(0.0, 1.0), Vec2::new(1.0, 1.0), Vec2::new(0.0, 0.0)]
        );

        let mesh = document.to_mesh();
        assert_eq!(mesh.vertices, triangle().vertices);
        let uvs: Vec<Vec2> = mesh.polygons[0]
            .corners
            .iter()
            .map(|c| c.uv.unwrap())
            .collect();
        assert_eq!(
            uvs,
            vec![Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)]
        );
        assert_eq!(mesh.polygons[0].corners[0].normal, Vec3::Z);
    }

    #[test]
    fn test_missing_uv_writes_zero() {
        let mut mesh = triangle();
        for corner in &mut mesh.polygons[0].corners {
            corner.uv = None;
        }
        let document = BobDocument::read(&encode_bob(&mesh).unwrap()).unwrap();
        assert!(document.vertices.iter().all(|v| v.uv == [0, 0]));
    }

    #[test]
    fn test_out_of_range_uv_is_clamped() {
        let mut mesh = triangle();
        mesh.polygons[0].corners[0].uv = Some(Vec2::new(1.5, -0.2));
        let document = BobDocument::read(&encode_bob(&mesh).unwrap()).unwrap();
        // V is clamped to 0 then flipped to 1
        assert_eq!(document.vertices[0].uv, [65535, 65535]);
    }

    #[test]
    fn test_bad_magic() {
        let mut bytes = encode_bob(&triangle()).unwrap();
        bytes[0..4].copy_from_slice(&13466u32.to_le_bytes());
        assert_eq!(
            decode_bob(&bytes),
            Err(MeshError::BadMagic {
                expected: BOB_MAGIC,
                found: 13466
            })
        );
    }

    #[test]
    fn test_unsupported_format() {
        let mut bytes = encode_bob(&triangle()).unwrap();
        bytes[4..8].copy_from_slice(&2u32.to_le_bytes());
        assert_eq!(decode_bob(&bytes), Err(MeshError::UnsupportedFormat(2)));
    }

    #[test]
    fn test_truncated_payload() {
        let bytes = encode_bob(&triangle()).unwrap();
        let result = decode_bob(&bytes[..bytes.len() - 1]);
        assert_eq!(
            result,
            Err(MeshError::Truncated {
                expected: bytes.len(),
                actual: bytes.len() - 1
            })
        );
    }

    #[test]
    fn test_truncated_header() {
        let bytes = 45623u32.to_le_bytes();
        assert!(matches!(
            decode_bob(&bytes),
            Err(MeshError::Truncated { expected: 8, actual: 4 })
        ));
    }

    #[test]
    fn test_index8_reads_unsigned() {
        let mut indices = vec![0u8, 1, 2];
        indices.extend_from_slice(&[200, 150, 199]);
        let data = index8_file(201, &indices);

        let document = BobDocument::read(&data).unwrap();
        assert_eq!(document.format(), BobFormat::Index8);
        assert_eq!(document.faces(), vec![[0, 1, 2], [200, 150, 199]]);

        let mesh = document.to_mesh();
        assert_eq!(mesh.polygons.len(), 2);
        assert_eq!(mesh.vertices[200], Vec3::new(200.0, 0.0, 0.0));
        // Stored V of 1.0 flips back to 0.0
        assert_eq!(mesh.polygons[1].corners[0].uv, Some(Vec2::new(0.0, 0.0)));
    }

    #[test]
    fn test_index8_rewritten_as_index16() {
        let data = index8_file(201, &[0, 1, 2, 200, 150, 199]);
        let document = BobDocument::read(&data).unwrap();

        let rewritten = document.to_bytes();
        let header = BobHeader::from_bytes(&rewritten).unwrap();
        assert_eq!(header.format, 1);
        assert_eq!(header.face_count, 2);
        assert_eq!(Some(rewritten.len()), header.file_size());

        let reread = BobDocument::read(&rewritten).unwrap();
        assert_eq!(reread.format(), BobFormat::Index16);
        assert_eq!(reread.faces(), vec![[0, 1, 2], [200, 150, 199]]);
        assert_eq!(reread.vertices, document.vertices);
    }

    #[test]
    fn test_write_matches_to_bytes() {
        let document = BobDocument::read(&encode_bob(&triangle()).unwrap()).unwrap();
        let mut out = Vec::new();
        document.write(&mut out).unwrap();
        assert_eq!(out, document.to_bytes());
    }

    #[test]
    fn test_index_out_of_range() {
        let data = index8_file(3, &[0, 1, 3]);
        assert_eq!(
            decode_bob(&data),
            Err(MeshError::IndexOutOfRange {
                index: 3,
                vertex_count: 3
            })
        );
    }

    #[test]
    fn test_trailing_bytes_ignored() {
        let mut bytes = encode_bob(&triangle()).unwrap();
        bytes.extend_from_slice(&[0xAA; 5]);
        assert_eq!(decode_bob(&bytes).unwrap().polygons.len(), 1);
    }

    #[test]
    fn test_quad_rejected_before_writing() {
        let mut mesh = triangle();
        mesh.vertices.push(Vec3::ONE);
        mesh.polygons[0].corners.push(Corner {
            vertex: 3,
            normal: Vec3::Z,
            uv: None,
        });
        assert_eq!(
            encode_bob(&mesh),
            Err(MeshError::MalformedMesh {
                polygon: 0,
                corners: 4
            })
        );
    }

    #[test]
    fn test_too_many_vertices() {
        let welded = WeldedMesh {
            vertices: (0..=BOB_MAX_VERTICES as u32)
                .map(|index| WeldedVertex {
                    position: Vec3::ZERO,
                    normal: Vec3::Z,
                    uv: None,
                    index,
                })
                .collect(),
            faces: Vec::new(),
        };
        assert_eq!(
            BobDocument::from_welded(&welded),
            Err(MeshError::TooManyVertices {
                count: BOB_MAX_VERTICES + 1,
                max: BOB_MAX_VERTICES
            })
        );
    }

    #[test]
    fn test_indices_iter_widens() {
        let indices = BobIndices::Index16(vec![0, 65535, 7]);
        assert_eq!(indices.iter().collect::<Vec<_>>(), vec![0, 65535, 7]);
        assert_eq!(indices.format(), BobFormat::Index16);
        assert_eq!(BobFormat::Index8.index_size(), 1);
    }

    #[test]
    fn test_header_file_size() {
        assert_eq!(
            BobHeader::new(BobFormat::Index16, 3, 1).file_size(),
            Some(16 + 72 + 6)
        );
        let mut header = BobHeader::new(BobFormat::Index8, 3, 1);
        assert_eq!(header.file_size(), Some(16 + 72 + 3));
        header.format = 9;
        assert_eq!(header.file_size(), None);
    }
}
