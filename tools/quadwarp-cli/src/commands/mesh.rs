//! Add, remove, copy and flag meshes.

use std::path::PathBuf;

use quadwarp_common::error::QuadwarpError;
use quadwarp_mesh_model::{GridSize, LoadedProject, MeshCollection, MeshKind, MeshPayload, Rect};

use super::load_project;

/// Flags to change; `None` leaves a flag as it is.
pub struct FlagUpdate {
    pub hidden: Option<bool>,
    pub locked: Option<bool>,
    pub solo: Option<bool>,
}

fn save(project: &mut LoadedProject) -> anyhow::Result<()> {
    project
        .save()
        .map_err(|e| anyhow::anyhow!("Failed to save project: {e}"))?;
    Ok(())
}

pub fn add(
    path: PathBuf,
    kind: MeshKind,
    name: Option<String>,
    cols: usize,
    rows: usize,
) -> anyhow::Result<()> {
    if cols == 0 || rows == 0 {
        anyhow::bail!("Grid must have at least one column and one row");
    }
    let mut project = load_project(&path)?;
    let cells = GridSize::new(cols, rows);
    let assigned = match kind {
        MeshKind::Warp => {
            let rect = project.folder.texture_rect();
            let base = name.unwrap_or_else(|| "warp".to_string());
            project.meshes.warp.create(&base, cells, rect, Rect::UNIT).0
        }
        MeshKind::Blend => {
            let rect = project.folder.bridge_rect();
            let base = name.unwrap_or_else(|| "blend".to_string());
            project.meshes.blend.create(&base, cells, rect, Rect::UNIT).0
        }
    };
    save(&mut project)?;
    println!("Added {kind:?} mesh '{assigned}'");
    Ok(())
}

pub fn remove(path: PathBuf, kind: MeshKind, name: String) -> anyhow::Result<()> {
    let mut project = load_project(&path)?;
    let removed = match kind {
        MeshKind::Warp => project.meshes.warp.remove(&name),
        MeshKind::Blend => project.meshes.blend.remove(&name),
    };
    if !removed {
        return Err(QuadwarpError::not_found(name).into());
    }
    save(&mut project)?;
    println!("Removed {kind:?} mesh '{name}'");
    Ok(())
}

fn copy_in<T: MeshPayload>(
    meshes: &mut MeshCollection<T>,
    name: &str,
    to: &str,
) -> Result<String, QuadwarpError> {
    let id = meshes
        .get(name)
        .map(|e| e.id())
        .ok_or_else(|| QuadwarpError::not_found(name))?;
    meshes
        .duplicate(to, id)
        .map(|(assigned, _)| assigned)
        .ok_or_else(|| QuadwarpError::not_found(name))
}

pub fn copy(path: PathBuf, kind: MeshKind, name: String, to: Option<String>) -> anyhow::Result<()> {
    let mut project = load_project(&path)?;
    let to = to.unwrap_or_else(|| format!("{name}_copy"));
    let assigned = match kind {
        MeshKind::Warp => copy_in(&mut project.meshes.warp, &name, &to)?,
        MeshKind::Blend => copy_in(&mut project.meshes.blend, &name, &to)?,
    };
    save(&mut project)?;
    println!("Copied {kind:?} mesh '{name}' to '{assigned}'");
    Ok(())
}

fn flag_in<T: MeshPayload>(
    meshes: &mut MeshCollection<T>,
    name: &str,
    update: &FlagUpdate,
) -> Result<(bool, bool, bool), QuadwarpError> {
    let entry = meshes
        .get_mut(name)
        .ok_or_else(|| QuadwarpError::not_found(name))?;
    if let Some(hidden) = update.hidden {
        entry.is_hidden = hidden;
    }
    if let Some(locked) = update.locked {
        entry.is_locked = locked;
    }
    if let Some(solo) = update.solo {
        entry.is_solo = solo;
    }
    Ok((entry.is_hidden, entry.is_locked, entry.is_solo))
}

pub fn flag(path: PathBuf, kind: MeshKind, name: String, update: FlagUpdate) -> anyhow::Result<()> {
    let mut project = load_project(&path)?;
    let (hidden, locked, solo) = match kind {
        MeshKind::Warp => flag_in(&mut project.meshes.warp, &name, &update)?,
        MeshKind::Blend => flag_in(&mut project.meshes.blend, &name, &update)?,
    };
    save(&mut project)?;
    println!("{kind:?} mesh '{name}': hidden={hidden} locked={locked} solo={solo}");
    Ok(())
}
