//! Quadwarp CLI — Command-line interface for warp/blend projects.
//!
//! Usage:
//!   quadwarp init <NAME>                 Create a new project
//!   quadwarp info <PATH>                 Show project information
//!   quadwarp add <PATH> <KIND>           Add a mesh
//!   quadwarp remove <PATH> <KIND> <NAME> Remove a mesh
//!   quadwarp copy <PATH> <KIND> <NAME>   Duplicate a mesh
//!   quadwarp flag <PATH> <KIND> <NAME>   Set hidden/locked/solo flags
//!   quadwarp export <PATH>               Write PLY meshes
//!   quadwarp validate <PATH>             Validate a project

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use quadwarp_common::config::AppConfig;
use quadwarp_mesh_model::MeshKind;

mod commands;

#[derive(Parser)]
#[command(
    name = "quadwarp",
    about = "Warp and blend mesh authoring for projection mapping",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Mesh collection selector.
#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    Warp,
    Blend,
}

impl From<Kind> for MeshKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Warp => MeshKind::Warp,
            Kind::Blend => MeshKind::Blend,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new project with one warp and one blend mesh
    Init {
        /// Project name
        name: String,

        /// Output directory (defaults to the configured projects directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Source texture width (defaults to the configured value)
        #[arg(long)]
        width: Option<u32>,

        /// Source texture height (defaults to the configured value)
        #[arg(long)]
        height: Option<u32>,
    },

    /// Show project information
    Info {
        /// Path to the project directory
        path: PathBuf,

        /// Print the mesh list as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a mesh covering the texture (warp) or output (blend)
    Add {
        /// Path to the project directory
        path: PathBuf,

        kind: Kind,

        /// Base name; a numeric suffix is appended if taken
        #[arg(short, long)]
        name: Option<String>,

        /// Control grid columns (warp only)
        #[arg(long, default_value = "1")]
        cols: usize,

        /// Control grid rows (warp only)
        #[arg(long, default_value = "1")]
        rows: usize,
    },

    /// Remove a mesh
    Remove {
        /// Path to the project directory
        path: PathBuf,

        kind: Kind,

        name: String,
    },

    /// Duplicate a mesh with its flags
    Copy {
        /// Path to the project directory
        path: PathBuf,

        kind: Kind,

        /// Source mesh
        name: String,

        /// Name of the copy (defaults to `<name>_copy`)
        #[arg(short, long)]
        to: Option<String>,
    },

    /// Set mesh flags
    Flag {
        /// Path to the project directory
        path: PathBuf,

        kind: Kind,

        name: String,

        #[arg(long)]
        hidden: Option<bool>,

        #[arg(long)]
        locked: Option<bool>,

        #[arg(long)]
        solo: Option<bool>,
    },

    /// Write warp and blend meshes as PLY files
    Export {
        /// Path to the project directory
        path: PathBuf,

        /// Include hidden and non-solo meshes
        #[arg(long)]
        all: bool,

        /// Override the resample interval of both meshes
        #[arg(long)]
        interval: Option<f32>,
    },

    /// Validate a project
    Validate {
        /// Path to the project directory
        path: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load();

    // Initialize logging
    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    quadwarp_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Init {
            name,
            output,
            width,
            height,
        } => commands::init::run(&config, name, output, width, height),
        Commands::Info { path, json } => commands::info::run(path, json),
        Commands::Add {
            path,
            kind,
            name,
            cols,
            rows,
        } => commands::mesh::add(path, kind.into(), name, cols, rows),
        Commands::Remove { path, kind, name } => commands::mesh::remove(path, kind.into(), name),
        Commands::Copy {
            path,
            kind,
            name,
            to,
        } => commands::mesh::copy(path, kind.into(), name, to),
        Commands::Flag {
            path,
            kind,
            name,
            hidden,
            locked,
            solo,
        } => commands::mesh::flag(
            path,
            kind.into(),
            name,
            commands::mesh::FlagUpdate {
                hidden,
                locked,
                solo,
            },
        ),
        Commands::Export {
            path,
            all,
            interval,
        } => commands::export::run(path, !all, interval),
        Commands::Validate { path } => commands::validate::run(path),
    }
}
