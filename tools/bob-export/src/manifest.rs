//! Manifest parsing and build orchestration
//!
//! Parses a TOML manifest and converts every listed mesh. Relative paths are
//! resolved against the manifest's directory.
//!
//! ```toml
//! [output]
//! dir = "out/"
//!
//! [meshes]
//! crate = "models/crate.obj"
//! floor = { path = "models/floor.obj", kind = "cob", triangulate = true }
//! ```

use anyhow::{Context, Result};
use bob_common::MeshFileKind;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::mesh::{ExportOptions, convert_obj};

/// Root manifest structure
#[derive(Debug, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub meshes: BTreeMap<String, MeshEntry>,
    /// Directory the manifest was loaded from
    #[serde(skip)]
    pub base_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("assets/")
}

/// Target format of a manifest entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeshKind {
    #[default]
    Bob,
    Cob,
}

impl From<MeshKind> for MeshFileKind {
    fn from(kind: MeshKind) -> Self {
        match kind {
            MeshKind::Bob => MeshFileKind::Bob,
            MeshKind::Cob => MeshFileKind::Cob,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum MeshEntry {
    Simple(PathBuf),
    Detailed {
        path: PathBuf,
        #[serde(default)]
        kind: MeshKind,
        #[serde(default)]
        triangulate: bool,
        #[serde(default)]
        z_up: bool,
    },
}

impl MeshEntry {
    pub fn path(&self) -> &Path {
        match self {
            MeshEntry::Simple(p) => p,
            MeshEntry::Detailed { path, .. } => path,
        }
    }

    pub fn kind(&self) -> MeshKind {
        match self {
            MeshEntry::Simple(_) => MeshKind::Bob,
            MeshEntry::Detailed { kind, .. } => *kind,
        }
    }

    pub fn options(&self) -> ExportOptions {
        match self {
            MeshEntry::Simple(_) => ExportOptions::default(),
            MeshEntry::Detailed {
                triangulate, z_up, ..
            } => ExportOptions {
                triangulate: *triangulate,
                z_up: *z_up,
            },
        }
    }
}

impl Manifest {
    /// Source path of an entry, resolved against the manifest directory
    pub fn source(&self, entry: &MeshEntry) -> PathBuf {
        self.base_dir.join(entry.path())
    }

    /// Output directory, resolved against the manifest directory
    pub fn output_dir(&self) -> PathBuf {
        self.base_dir.join(&self.output.dir)
    }
}

/// Parse manifest text
pub fn parse_manifest(content: &str) -> Result<Manifest> {
    Ok(toml::from_str(content)?)
}

/// Load and parse a manifest file
pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {:?}", path))?;
    let mut manifest =
        parse_manifest(&content).with_context(|| format!("Failed to parse manifest: {:?}", path))?;
    manifest.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    Ok(manifest)
}

/// Validate a manifest without building
pub fn validate(manifest: &Manifest) -> Result<()> {
    for (name, entry) in &manifest.meshes {
        let source = manifest.source(entry);
        if !source.exists() {
            anyhow::bail!("Mesh '{}' source not found: {:?}", name, source);
        }
    }
    Ok(())
}

/// Build all meshes from a manifest, in name order
pub fn build_all(manifest: &Manifest, output_override: Option<&Path>) -> Result<()> {
    let output_dir = output_override
        .map(Path::to_path_buf)
        .unwrap_or_else(|| manifest.output_dir());
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;

    for (name, entry) in &manifest.meshes {
        let kind = MeshFileKind::from(entry.kind());
        let output = output_dir.join(format!("{}.{}", name, kind.extension()));
        tracing::info!("Converting mesh: {} -> {:?}", name, output);

        convert_obj(&manifest.source(entry), &output, kind, entry.options())
            .with_context(|| format!("Failed to build mesh '{}'", name))?;
    }

    tracing::info!("Built {} meshes into {:?}", manifest.meshes.len(), output_dir);
    Ok(())
}
