//! bob-export - mesh export tool
//!
//! Converts Wavefront OBJ meshes to game meshes (.bob) and collision meshes
//! (.cob), and back again.

use anyhow::Result;
use bob_common::{BOB_EXT, COB_EXT, MeshFileKind};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use bob_export::mesh::ExportOptions;
use bob_export::{inspect, manifest, mesh};

#[derive(Parser)]
#[command(name = "bob-export")]
#[command(about = "BOB/COB mesh export tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export an OBJ mesh as a .bob game mesh
    Bob {
        /// Input OBJ file
        input: PathBuf,

        /// Output .bob file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Triangulate polygons before export
        #[arg(long)]
        triangulate: bool,

        /// Source is Z-up; rotate into the engine's Y-up space
        #[arg(long)]
        z_up: bool,
    },

    /// Export an OBJ mesh as a .cob collision mesh
    Cob {
        /// Input OBJ file
        input: PathBuf,

        /// Output .cob file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Triangulate polygons before export
        #[arg(long)]
        triangulate: bool,

        /// Source is Z-up; rotate into the engine's Y-up space
        #[arg(long)]
        z_up: bool,
    },

    /// Convert a .bob or .cob file back to OBJ
    Import {
        /// Input .bob/.cob file
        input: PathBuf,

        /// Output OBJ file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write Z-up coordinates
        #[arg(long)]
        z_up: bool,
    },

    /// Print a summary of a .bob or .cob file
    Inspect {
        /// Input .bob/.cob file
        input: PathBuf,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Build meshes from a manifest file
    Build {
        /// Path to bob.toml manifest
        #[arg(default_value = "bob.toml")]
        manifest: PathBuf,

        /// Output directory (overrides manifest)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Validate manifest without building
    Check {
        /// Path to bob.toml manifest
        #[arg(default_value = "bob.toml")]
        manifest: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Bob {
            input,
            output,
            triangulate,
            z_up,
        } => {
            let output = output.unwrap_or_else(|| input.with_extension(BOB_EXT));
            tracing::info!("Converting {:?} -> {:?}", input, output);
            let options = ExportOptions { triangulate, z_up };
            mesh::convert_obj(&input, &output, MeshFileKind::Bob, options)?;
            tracing::info!("Done!");
        }

        Commands::Cob {
            input,
            output,
            triangulate,
            z_up,
        } => {
            let output = output.unwrap_or_else(|| input.with_extension(COB_EXT));
            tracing::info!("Converting {:?} -> {:?}", input, output);
            let options = ExportOptions { triangulate, z_up };
            mesh::convert_obj(&input, &output, MeshFileKind::Cob, options)?;
            tracing::info!("Done!");
        }

        Commands::Import {
            input,
            output,
            z_up,
        } => {
            let output = output.unwrap_or_else(|| input.with_extension("obj"));
            tracing::info!("Importing {:?} -> {:?}", input, output);
            mesh::import_mesh(&input, &output, z_up)?;
            tracing::info!("Done!");
        }

        Commands::Inspect { input, json } => {
            let summary = inspect::inspect(&input)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("{}", summary);
            }
        }

        Commands::Build {
            manifest,
            output,
            verbose,
        } => {
            if verbose {
                tracing::info!("Building meshes from {:?}", manifest);
            }
            let config = manifest::load_manifest(&manifest)?;
            manifest::validate(&config)?;
            manifest::build_all(&config, output.as_deref())?;
            tracing::info!("Build complete!");
        }

        Commands::Check { manifest } => {
            tracing::info!("Checking manifest {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            manifest::validate(&config)?;
            tracing::info!("Manifest is valid!");
        }
    }

    Ok(())
}
