//! Mesh file summaries for the `inspect` command

use anyhow::{Context, Result};
use bob_common::{BobHeader, MeshFileKind, decode_bob, decode_cob};
use glam::Vec3;
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// What a BOB/COB file contains, after a full decode
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeshSummary {
    pub kind: &'static str,
    /// BOB index variant; absent for COB
    pub format: Option<u32>,
    pub vertex_count: u32,
    pub face_count: u32,
    pub file_size: usize,
    pub bounds_min: [f32; 3],
    pub bounds_max: [f32; 3],
}

impl fmt::Display for MeshSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(format) = self.format {
            write!(f, " (format {})", format)?;
        }
        writeln!(f, ", {} bytes", self.file_size)?;
        writeln!(f, "  vertices: {}", self.vertex_count)?;
        writeln!(f, "  faces:    {}", self.face_count)?;
        write!(
            f,
            "  bounds:   {:?} .. {:?}",
            self.bounds_min, self.bounds_max
        )
    }
}

/// Summarise in-memory file contents
pub fn summarize(data: &[u8]) -> Result<MeshSummary> {
    let kind = MeshFileKind::sniff(data).context("Not a BOB or COB file")?;

    let (format, mesh) = match kind {
        MeshFileKind::Bob => {
            let mesh = decode_bob(data)?;
            (BobHeader::from_bytes(data).map(|h| h.format), mesh)
        }
        MeshFileKind::Cob => (None, decode_cob(data)?),
    };

    let (min, max) = if mesh.vertices.is_empty() {
        (Vec3::ZERO, Vec3::ZERO)
    } else {
        mesh.vertices.iter().fold(
            (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
            |(min, max), &v| (min.min(v), max.max(v)),
        )
    };

    Ok(MeshSummary {
        kind: kind.extension(),
        format,
        vertex_count: mesh.vertices.len() as u32,
        face_count: mesh.polygons.len() as u32,
        file_size: data.len(),
        bounds_min: min.to_array(),
        bounds_max: max.to_array(),
    })
}

/// Read and summarise a mesh file
pub fn inspect(path: &Path) -> Result<MeshSummary> {
    let data = std::fs::read(path).with_context(|| format!("Failed to read mesh: {:?}", path))?;
    summarize(&data).with_context(|| format!("Failed to inspect {:?}", path))
}
