//! Initialize a new Quadwarp project.

use std::path::PathBuf;

use quadwarp_common::config::AppConfig;
use quadwarp_mesh_model::{GridData, LoadedProject, Vec2};

pub fn run(
    config: &AppConfig,
    name: String,
    output: Option<PathBuf>,
    width: Option<u32>,
    height: Option<u32>,
) -> anyhow::Result<()> {
    let output = output.unwrap_or_else(|| config.projects_dir.clone());
    let project_dir = output.join(&name);
    println!("Creating project '{}' at {}", name, project_dir.display());

    let defaults = &config.editor;
    let width = width.unwrap_or(defaults.texture_width);
    let height = height.unwrap_or(defaults.texture_height);

    let mut project = LoadedProject::create(&project_dir, &name, [width, height])
        .map_err(|e| anyhow::anyhow!("Failed to create project: {e}"))?;

    let grid = GridData {
        enabled_snap: defaults.snap_to_grid,
        size: Vec2::new(defaults.grid_size, defaults.grid_size),
        ..GridData::default()
    };
    project.folder.grid.uv = grid;
    project.folder.grid.warp = grid;
    project.folder.grid.blend = grid;
    project.folder.export.warp.max_mesh_size = defaults.resample_interval;
    project.folder.export.blend.max_mesh_size = defaults.resample_interval;
    project
        .save()
        .map_err(|e| anyhow::anyhow!("Failed to save project: {e}"))?;

    println!("Project created successfully:");
    println!("  Directory: {}", project.root.display());
    println!("  Texture: {}x{}", width, height);
    println!(
        "  Meshes: {} warp, {} blend",
        project.meshes.warp.len(),
        project.meshes.blend.len()
    );
    println!();
    let data_file = project
        .data_file_path()
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    println!("Directory structure:");
    println!("  {}/", name);
    println!("  ├── project.json  (settings)");
    println!("  ├── {data_file}  (meshes)");
    println!("  ├── {}/  (data file history)", project.folder.backup.folder);
    println!("  └── {}/  (PLY output)", project.folder.export.folder);

    Ok(())
}
