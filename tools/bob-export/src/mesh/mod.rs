//! Mesh converter (OBJ <-> .bob/.cob)

mod obj;
mod triangulate;

pub use obj::{ObjError, parse_obj, read_obj, save_obj, write_obj};
pub use triangulate::{needs_triangulation, triangulate};

use anyhow::{Context, Result};
use bob_common::{
    BobHeader, CobDocument, Mesh, MeshFileKind, decode_bob, decode_cob, encode_bob,
};
use std::path::Path;

use crate::axis::{engine_to_z_up, transform_mesh, z_up_to_engine};

/// Options shared by the BOB and COB export paths
#[derive(Debug, Clone, Copy, Default)]
pub struct ExportOptions {
    /// Triangulate even when every face already is a triangle
    pub triangulate: bool,
    /// Source is Z-up and needs rotating into engine space
    pub z_up: bool,
}

/// Result of in-memory mesh conversion
pub struct ConvertedMesh {
    pub kind: MeshFileKind,
    /// Number of vertices written (welded for BOB, caller vertices for COB)
    pub vertex_count: u32,
    pub face_count: u32,
    /// Complete file contents
    pub data: Vec<u8>,
}

/// Load an OBJ and bring it into the shape the encoders accept
pub fn prepare_obj(input: &Path, options: ExportOptions) -> Result<Mesh> {
    let mut mesh = read_obj(input)?;

    if options.z_up {
        transform_mesh(&mut mesh, z_up_to_engine());
    }
    if options.triangulate || needs_triangulation(&mesh) {
        tracing::info!("triangulating {:?}", input);
        mesh = triangulate(&mesh);
    }

    Ok(mesh)
}

/// Encode a prepared mesh without touching the filesystem
pub fn convert_mesh(mesh: &Mesh, kind: MeshFileKind) -> Result<ConvertedMesh> {
    let converted = match kind {
        MeshFileKind::Bob => {
            let data = encode_bob(mesh)?;
            let header = BobHeader::from_bytes(&data).context("Encoded BOB has no header")?;
            ConvertedMesh {
                kind,
                vertex_count: header.vertex_count,
                face_count: header.face_count,
                data,
            }
        }
        MeshFileKind::Cob => {
            let document = CobDocument::from_mesh(mesh)?;
            ConvertedMesh {
                kind,
                vertex_count: document.positions.len() as u32,
                face_count: document.face_count() as u32,
                data: document.to_bytes(),
            }
        }
    };
    Ok(converted)
}

/// Convert an OBJ file to in-memory BOB/COB data
pub fn convert_obj_to_memory(
    input: &Path,
    kind: MeshFileKind,
    options: ExportOptions,
) -> Result<ConvertedMesh> {
    let mesh = prepare_obj(input, options)?;
    convert_mesh(&mesh, kind).with_context(|| format!("Failed to encode {:?}", input))
}

/// Convert an OBJ file to a BOB or COB file
///
/// The output is only created once the whole mesh has encoded.
pub fn convert_obj(
    input: &Path,
    output: &Path,
    kind: MeshFileKind,
    options: ExportOptions,
) -> Result<()> {
    let converted = convert_obj_to_memory(input, kind, options)?;
    std::fs::write(output, &converted.data)
        .with_context(|| format!("Failed to write output: {:?}", output))?;

    tracing::info!(
        "Converted OBJ mesh: {} vertices, {} faces, {} bytes -> {:?}",
        converted.vertex_count,
        converted.face_count,
        converted.data.len(),
        output
    );
    Ok(())
}

/// Decode a BOB or COB file, telling them apart by magic
pub fn load_mesh_file(input: &Path) -> Result<(MeshFileKind, Mesh)> {
    let data =
        std::fs::read(input).with_context(|| format!("Failed to read mesh: {:?}", input))?;
    let kind = MeshFileKind::sniff(&data)
        .with_context(|| format!("Not a BOB or COB file: {:?}", input))?;
    let mesh = match kind {
        MeshFileKind::Bob => decode_bob(&data),
        MeshFileKind::Cob => decode_cob(&data),
    }
    .with_context(|| format!("Failed to decode {:?}", input))?;
    Ok((kind, mesh))
}

/// Convert a BOB or COB file back to OBJ
pub fn import_mesh(input: &Path, output: &Path, z_up: bool) -> Result<()> {
    let (kind, mut mesh) = load_mesh_file(input)?;
    if z_up {
        transform_mesh(&mut mesh, engine_to_z_up());
    }
    save_obj(output, &mesh)?;

    tracing::info!(
        "Imported {:?} mesh: {} vertices, {} faces -> {:?}",
        kind,
        mesh.vertices.len(),
        mesh.polygons.len(),
        output
    );
    Ok(())
}
