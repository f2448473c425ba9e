//! Show project information.

use std::path::PathBuf;

use quadwarp_mesh_model::{MeshCollection, MeshPayload};

use super::load_project;

fn mesh_rows<T: MeshPayload>(meshes: &MeshCollection<T>) -> Vec<serde_json::Value> {
    meshes
        .iter()
        .map(|(name, entry)| {
            serde_json::json!({
                "name": name,
                "hidden": entry.is_hidden,
                "locked": entry.is_locked,
                "solo": entry.is_solo,
                "visible": meshes.is_visible(entry.id()),
            })
        })
        .collect()
}

fn print_meshes<T: MeshPayload>(label: &str, meshes: &MeshCollection<T>) {
    println!("{label} meshes: {}", meshes.len());
    for (name, entry) in meshes.iter() {
        let mut flags = vec![];
        if entry.is_hidden {
            flags.push("hidden");
        }
        if entry.is_locked {
            flags.push("locked");
        }
        if entry.is_solo {
            flags.push("solo");
        }
        let visibility = if meshes.is_visible(entry.id()) {
            "visible"
        } else {
            "not visible"
        };
        println!("  {name} [{}] ({visibility})", flags.join(", "));
    }
    println!();
}

pub fn run(path: PathBuf, json: bool) -> anyhow::Result<()> {
    let project = load_project(&path)?;

    if json {
        let out = serde_json::json!({
            "warp": mesh_rows(&project.meshes.warp),
            "blend": mesh_rows(&project.meshes.blend),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let p = &project.folder;

    println!("Project: {}", p.name);
    println!("  Created: {}", p.created_at);
    println!("  Modified: {}", p.modified_at);
    println!("  Data file: {}", project.data_file_path().display());
    println!();

    println!("Texture:");
    if p.texture.file.is_empty() {
        println!("  Source: (none)");
    } else {
        println!("  Source: {}", p.texture.file);
    }
    println!(
        "  Size: {}x{}",
        p.texture.size_cache[0], p.texture.size_cache[1]
    );
    println!(
        "  Bridge resolution: {}x{}",
        p.bridge.resolution[0], p.bridge.resolution[1]
    );
    println!();

    print_meshes("Warp", &project.meshes.warp);
    print_meshes("Blend", &project.meshes.blend);

    println!("Export config:");
    println!("  Folder: {}", p.export.folder);
    println!(
        "  Warp: {} (interval {})",
        p.export.warp.filename, p.export.warp.max_mesh_size
    );
    println!(
        "  Blend: {} (interval {})",
        p.export.blend.filename, p.export.blend.max_mesh_size
    );
    println!("  Blend shader: {}", p.export.blend_shader.filename);
    println!(
        "  Texture coordinates: {}",
        if p.export.is_arb { "pixels" } else { "normalized" }
    );
    println!();

    let b = &p.blend_params;
    println!("Blend shader:");
    println!("  Gamma: {:?}", b.gamma);
    println!("  Luminance control: {:?}", b.luminance_control);
    println!("  Blend power: {:?}", b.blend_power);
    println!("  Base color: {:?}", b.base_color);
    println!();

    println!("Backup:");
    if p.backup.enabled {
        let limit = match p.backup.limit {
            0 => "unlimited".to_string(),
            n => n.to_string(),
        };
        println!("  Folder: {} (keep {limit})", p.backup.folder);
    } else {
        println!("  Disabled");
    }

    Ok(())
}
