pub mod export;
pub mod info;
pub mod init;
pub mod mesh;
pub mod validate;

use std::path::Path;

use quadwarp_common::error::QuadwarpError;
use quadwarp_mesh_model::{LoadedProject, ProjectError};

pub(crate) fn load_project(path: &Path) -> anyhow::Result<LoadedProject> {
    LoadedProject::load(path).map_err(|e| match e {
        ProjectError::DecodeError { path, source } => {
            QuadwarpError::decode(format!("{}: {source}", path.display())).into()
        }
        other => QuadwarpError::project(format!("Failed to load project: {other}")).into(),
    })
}
