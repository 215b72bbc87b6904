//! Wavefront OBJ reading and writing
//!
//! Polygons keep their arity; triangulation is a separate step. Corners without
//! a `vn` reference take the polygon's geometric normal.

use anyhow::{Context, Result};
use bob_common::{Corner, Mesh, Polygon};
use glam::{Vec2, Vec3};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// OBJ parse errors, tagged with the 1-based line number
#[derive(Debug, thiserror::Error)]
pub enum ObjError {
    #[error("line {line}: invalid number {value:?}")]
    InvalidNumber { line: usize, value: String },

    #[error("line {line}: invalid vertex reference {value:?}")]
    InvalidReference { line: usize, value: String },

    #[error("line {line}: {element} index {index} out of range (have {count})")]
    IndexOutOfRange {
        line: usize,
        element: &'static str,
        index: i64,
        count: usize,
    },

    #[error("line {line}: face has fewer than 3 vertices")]
    DegenerateFace { line: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Face corner as referenced in the file, with indices already resolved
type RawCorner = (u32, Option<usize>, Option<usize>);

/// Read an OBJ file into a mesh
pub fn read_obj(input: &Path) -> Result<Mesh> {
    let file = File::open(input).with_context(|| format!("Failed to open OBJ: {:?}", input))?;
    parse_obj(BufReader::new(file)).with_context(|| format!("Failed to parse OBJ: {:?}", input))
}

/// Parse OBJ text into a mesh
pub fn parse_obj<R: BufRead>(reader: R) -> Result<Mesh, ObjError> {
    let mut positions: Vec<Vec3> = Vec::new();
    let mut tex_coords: Vec<Vec2> = Vec::new();
    let mut normals: Vec<Vec3> = Vec::new();
    let mut faces: Vec<Vec<RawCorner>> = Vec::new();

    for (number, line) in reader.lines().enumerate() {
        let line_no = number + 1;
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts[0] {
            "v" if parts.len() >= 4 => {
                positions.push(Vec3::from(parse_floats::<3>(&parts[1..], line_no)?));
            }
            "vt" if parts.len() >= 3 => {
                tex_coords.push(Vec2::from(parse_floats::<2>(&parts[1..], line_no)?));
            }
            "vn" if parts.len() >= 4 => {
                normals.push(Vec3::from(parse_floats::<3>(&parts[1..], line_no)?));
            }
            "f" => {
                if parts.len() < 4 {
                    return Err(ObjError::DegenerateFace { line: line_no });
                }
                let counts = (positions.len(), tex_coords.len(), normals.len());
                let face = parts[1..]
                    .iter()
                    .map(|s| parse_corner(s, counts, line_no))
                    .collect::<Result<Vec<_>, _>>()?;
                faces.push(face);
            }
            // Groups, materials, smoothing groups and objects carry nothing we store
            _ => {}
        }
    }

    let polygons = faces
        .into_iter()
        .map(|face| {
            let corners: Vec<Corner> = face
                .iter()
                .map(|&(vertex, vt, vn)| Corner {
                    vertex,
                    normal: vn.map(|i| normals[i]).unwrap_or(Vec3::ZERO),
                    uv: vt.map(|i| tex_coords[i]),
                })
                .collect();
            let mut polygon = Polygon::new(corners);

            if face.iter().any(|&(_, _, vn)| vn.is_none()) {
                let face_normal = polygon.face_normal(&positions);
                for (corner, &(_, _, vn)) in polygon.corners.iter_mut().zip(&face) {
                    if vn.is_none() {
                        corner.normal = face_normal;
                    }
                }
            }
            polygon
        })
        .collect();

    Ok(Mesh::new(positions, polygons))
}

fn parse_floats<const N: usize>(parts: &[&str], line: usize) -> Result<[f32; N], ObjError> {
    let mut out = [0.0f32; N];
    for (slot, value) in out.iter_mut().zip(parts) {
        *slot = value.parse().map_err(|_| ObjError::InvalidNumber {
            line,
            value: value.to_string(),
        })?;
    }
    Ok(out)
}

/// Parse OBJ vertex reference: "v", "v/vt", "v/vt/vn", or "v//vn"
fn parse_corner(
    s: &str,
    (positions, tex_coords, normals): (usize, usize, usize),
    line: usize,
) -> Result<RawCorner, ObjError> {
    let invalid = || ObjError::InvalidReference {
        line,
        value: s.to_string(),
    };
    let mut parts = s.split('/');

    let vi = parts.next().filter(|p| !p.is_empty()).ok_or_else(invalid)?;
    let vi = resolve_index(vi, positions, "vertex", line).map_err(|e| e.unwrap_or_else(invalid))?;

    let mut optional = |count: usize, element: &'static str| -> Result<Option<usize>, ObjError> {
        match parts.next().filter(|p| !p.is_empty()) {
            Some(p) => resolve_index(p, count, element, line)
                .map(Some)
                .map_err(|e| e.unwrap_or_else(invalid)),
            None => Ok(None),
        }
    };
    let vti = optional(tex_coords, "texture coordinate")?;
    let vni = optional(normals, "normal")?;

    Ok((vi as u32, vti, vni))
}

/// Resolve a 1-based or negative (relative) OBJ index
///
/// `Err(None)` means the text was not an integer.
fn resolve_index(
    s: &str,
    count: usize,
    element: &'static str,
    line: usize,
) -> Result<usize, Option<ObjError>> {
    let index: i64 = s.parse().map_err(|_| None)?;
    let resolved = if index < 0 {
        count as i64 + index
    } else {
        index - 1
    };
    if resolved < 0 || resolved >= count as i64 {
        return Err(Some(ObjError::IndexOutOfRange {
            line,
            element,
            index,
            count,
        }));
    }
    Ok(resolved as usize)
}

/// Write a mesh as OBJ text
///
/// Every corner gets its own `vt`/`vn` entry, so attribute splits survive.
pub fn write_obj<W: Write>(w: &mut W, mesh: &Mesh, name: &str) -> std::io::Result<()> {
    writeln!(w, "# bob-export")?;
    writeln!(w, "o {}", name)?;

    for v in &mesh.vertices {
        writeln!(w, "v {} {} {}", v.x, v.y, v.z)?;
    }

    let corners = || mesh.polygons.iter().flat_map(|p| p.corners.iter());
    let has_uvs = mesh.has_uvs();
    if has_uvs {
        for c in corners() {
            let uv = c.uv.unwrap_or(Vec2::ZERO);
            writeln!(w, "vt {} {}", uv.x, uv.y)?;
        }
    }
    for c in corners() {
        writeln!(w, "vn {} {} {}", c.normal.x, c.normal.y, c.normal.z)?;
    }

    let mut next = 1;
    for polygon in &mesh.polygons {
        write!(w, "f")?;
        for corner in &polygon.corners {
            let v = corner.vertex + 1;
            if has_uvs {
                write!(w, " {}/{}/{}", v, next, next)?;
            } else {
                write!(w, " {}//{}", v, next)?;
            }
            next += 1;
        }
        writeln!(w)?;
    }

    Ok(())
}

/// Write a mesh to an OBJ file
pub fn save_obj(output: &Path, mesh: &Mesh) -> Result<()> {
    let name = output
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("mesh");
    let file =
        File::create(output).with_context(|| format!("Failed to create output: {:?}", output))?;
    let mut writer = BufWriter::new(file);
    write_obj(&mut writer, mesh, name)?;
    writer.flush()?;
    Ok(())
}
