//! Validate a Quadwarp project.

use std::path::PathBuf;

use quadwarp_mesh_model::LoadedProject;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    println!("Validating project at: {}", path.display());

    // Load errors (bad JSON, corrupt data file) are reported, not propagated.
    let project = match LoadedProject::load(&path) {
        Ok(project) => project,
        Err(e) => {
            println!("\nProject failed to load:");
            println!("  - {e}");
            anyhow::bail!("project is not valid");
        }
    };

    println!("  Name: {}", project.folder.name);
    println!("  Version: {}", project.folder.version);
    println!(
        "  Texture size: {}x{}",
        project.folder.texture.size_cache[0], project.folder.texture.size_cache[1]
    );
    println!(
        "  Meshes: {} warp, {} blend",
        project.meshes.warp.len(),
        project.meshes.blend.len()
    );

    let errors = project.validate();
    if errors.is_empty() {
        println!("  Sources: All present");
        println!("\nProject is valid.");
    } else {
        println!("\nValidation issues:");
        for error in &errors {
            println!("  - {error}");
        }
        println!(
            "\n{} issue(s) found. Project may not be fully usable.",
            errors.len()
        );
    }

    Ok(())
}
