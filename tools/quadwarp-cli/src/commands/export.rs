//! Export a project's meshes as PLY.

use std::path::PathBuf;

use quadwarp_common::error::QuadwarpError;

use super::load_project;

pub fn run(path: PathBuf, only_visible: bool, interval: Option<f32>) -> anyhow::Result<()> {
    println!("Exporting project at: {}", path.display());

    let mut project = load_project(&path)?;
    if let Some(interval) = interval {
        project.folder.export.warp.max_mesh_size = interval;
        project.folder.export.blend.max_mesh_size = interval;
    }

    println!("  Folder: {}", project.export_folder().display());
    println!(
        "  Meshes: {}",
        if only_visible { "visible only" } else { "all" }
    );

    let report = project
        .export(only_visible)
        .map_err(|e| QuadwarpError::export(e.to_string()))?;

    for file in &report.files {
        println!("  Wrote {}", file.display());
    }
    println!("\nExport complete.");

    Ok(())
}
