//! Project folders.
//!
//! A project is a directory holding `project.json` (settings, serialized
//! with serde) and a binary data file with the warp and blend meshes.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::codec::DecodeError;
use crate::control_mesh::GridSize;
use crate::data_file::{MeshData, PackScale};
use crate::editor::GridData;
use crate::geom::{Rect, Vec2};

pub const PROJECT_FILE_NAME: &str = "project.json";
pub const DATA_FILE_EXTENSION: &str = "qwrp";

/// Top-level project file (`project.json`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectFolder {
    /// Schema version.
    pub version: String,

    /// Human-readable project name.
    pub name: String,

    /// Creation timestamp (RFC 3339).
    pub created_at: String,

    /// Last modified timestamp (RFC 3339).
    pub modified_at: String,

    #[serde(default)]
    pub texture: TextureSource,

    #[serde(default)]
    pub viewport: ViewportConfig,

    #[serde(default)]
    pub export: ExportConfig,

    #[serde(default)]
    pub backup: BackupConfig,

    #[serde(default)]
    pub grid: GridConfig,

    #[serde(default)]
    pub bridge: BridgeConfig,

    #[serde(default)]
    pub result: ResultView,

    #[serde(default)]
    pub blend_params: BlendParams,

    /// Data file base name, without extension.
    #[serde(default = "default_data_file")]
    pub data_file: String,
}

fn default_data_file() -> String {
    "data".to_string()
}

/// Source texture the warp meshes sample from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureSource {
    /// Image or video path, relative to the project root. Empty if unset.
    pub file: String,

    /// Pixel size the warp meshes were last authored against.
    pub size_cache: [u32; 2],
}

/// Pan and zoom of one editor view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub pos: Vec2,
    pub scale: f32,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            scale: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Output window placement.
    pub result: Rect,
    pub uv: ViewTransform,
    pub warp: ViewTransform,
    pub blend: ViewTransform,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            result: Rect::new(0.0, 0.0, 1920.0, 1080.0),
            uv: ViewTransform::default(),
            warp: ViewTransform::default(),
            blend: ViewTransform::default(),
        }
    }
}

/// Output file settings for one mesh kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshExport {
    pub filename: String,

    /// Longest edge allowed in the resampled mesh, in output pixels.
    pub max_mesh_size: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Output folder, relative to the project root.
    pub folder: String,

    /// Keep texture coordinates in pixels instead of normalizing them.
    pub is_arb: bool,

    pub warp: MeshExport,
    pub blend: MeshExport,

    /// Where the blend shader parameters are written as JSON.
    pub blend_shader: ShaderExport,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShaderExport {
    pub filename: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            folder: "exports".to_string(),
            is_arb: false,
            warp: MeshExport {
                filename: "warp.ply".to_string(),
                max_mesh_size: 100.0,
            },
            blend: MeshExport {
                filename: "blend.ply".to_string(),
                max_mesh_size: 100.0,
            },
            blend_shader: ShaderExport {
                filename: "blend_shader.json".to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackupConfig {
    pub enabled: bool,

    /// Backup folder, relative to the project root.
    pub folder: String,

    /// Number of backups kept; 0 keeps all.
    pub limit: usize,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            folder: "backup".to_string(),
            limit: 0,
        }
    }
}

/// Grid settings of the three editors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub uv: GridData,
    pub warp: GridData,
    pub blend: GridData,
}

/// Output surface the blend meshes are authored for.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub resolution: [u32; 2],
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            resolution: [1920, 1080],
        }
    }
}

/// Per-channel (RGB) parameters of the edge blend shader.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlendParams {
    pub gamma: [f32; 3],
    pub luminance_control: [f32; 3],
    pub blend_power: [f32; 3],
    pub base_color: [f32; 3],
}

impl Default for BlendParams {
    fn default() -> Self {
        Self {
            gamma: [1.0; 3],
            luminance_control: [0.5; 3],
            blend_power: [1.0; 3],
            base_color: [0.0; 3],
        }
    }
}

/// State of the result window.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultView {
    pub editor_name: String,
    pub is_scale_to_viewport: bool,
    pub is_show_control: bool,
    pub is_show_cursor: bool,
}

impl Default for ResultView {
    fn default() -> Self {
        Self {
            editor_name: "uv".to_string(),
            is_scale_to_viewport: false,
            is_show_control: false,
            is_show_cursor: false,
        }
    }
}

impl ProjectFolder {
    /// Create project settings with defaults.
    pub fn new(name: impl Into<String>, texture_size: [u32; 2]) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            version: "1.0".to_string(),
            name: name.into(),
            created_at: now.clone(),
            modified_at: now,
            texture: TextureSource {
                file: String::new(),
                size_cache: texture_size,
            },
            viewport: ViewportConfig::default(),
            export: ExportConfig::default(),
            backup: BackupConfig::default(),
            grid: GridConfig::default(),
            bridge: BridgeConfig::default(),
            result: ResultView::default(),
            blend_params: BlendParams::default(),
            data_file: default_data_file(),
        }
    }

    /// Scales applied when the data file is written or read.
    pub fn pack_scale(&self) -> PackScale {
        PackScale::normalizing(self.texture.size_cache, self.bridge.resolution)
    }

    /// Texture coordinate scale for exported meshes: pixels when `is_arb`,
    /// otherwise normalized by the texture (warp) or the bridge (blend).
    pub fn export_coord_size(&self, kind: MeshKind) -> Vec2 {
        if self.export.is_arb {
            return Vec2::ONE;
        }
        let scale = self.pack_scale();
        match kind {
            MeshKind::Warp => scale.warp,
            MeshKind::Blend => scale.blend,
        }
    }

    pub fn texture_rect(&self) -> Rect {
        let [w, h] = self.texture.size_cache;
        Rect::new(0.0, 0.0, w as f32, h as f32)
    }

    pub fn bridge_rect(&self) -> Rect {
        let [w, h] = self.bridge.resolution;
        Rect::new(0.0, 0.0, w as f32, h as f32)
    }
}

/// Which mesh collection an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeshKind {
    Warp,
    Blend,
}

/// Files written by [`LoadedProject::export`].
#[derive(Debug, Clone, Default)]
pub struct ExportReport {
    pub files: Vec<PathBuf>,
}

/// The complete in-memory representation of a loaded project.
#[derive(Debug, Clone)]
pub struct LoadedProject {
    /// Filesystem path to the project directory.
    pub root: PathBuf,

    /// Project settings.
    pub folder: ProjectFolder,

    /// Warp and blend meshes.
    pub meshes: MeshData,
}

impl LoadedProject {
    pub fn project_path(&self) -> PathBuf {
        self.root.join(PROJECT_FILE_NAME)
    }

    pub fn data_file_path(&self) -> PathBuf {
        self.root
            .join(format!("{}.{DATA_FILE_EXTENSION}", self.folder.data_file))
    }

    pub fn backup_folder(&self) -> PathBuf {
        self.root.join(&self.folder.backup.folder)
    }

    pub fn export_folder(&self) -> PathBuf {
        self.root.join(&self.folder.export.folder)
    }

    pub fn texture_path(&self) -> Option<PathBuf> {
        (!self.folder.texture.file.is_empty()).then(|| self.root.join(&self.folder.texture.file))
    }

    /// Load a project from a directory. A missing data file yields empty
    /// collections.
    pub fn load(root: impl AsRef<Path>) -> Result<Self, ProjectError> {
        let root = root.as_ref().to_path_buf();
        let project_path = root.join(PROJECT_FILE_NAME);

        let project_json =
            std::fs::read_to_string(&project_path).map_err(|e| ProjectError::IoError {
                path: project_path.clone(),
                source: e,
            })?;

        let folder: ProjectFolder =
            serde_json::from_str(&project_json).map_err(|e| ProjectError::ParseError {
                path: project_path,
                source: e,
            })?;

        let mut loaded = Self {
            root,
            folder,
            meshes: MeshData::new(),
        };

        let data_path = loaded.data_file_path();
        if data_path.exists() {
            let bytes = std::fs::read(&data_path).map_err(|e| ProjectError::IoError {
                path: data_path.clone(),
                source: e,
            })?;
            loaded.meshes = MeshData::decode(&bytes, loaded.folder.pack_scale()).map_err(|e| {
                ProjectError::DecodeError {
                    path: data_path.clone(),
                    source: e,
                }
            })?;
        } else {
            warn!(path = %data_path.display(), "data file missing, starting with no meshes");
        }

        info!(
            root = %loaded.root.display(),
            warp = loaded.meshes.warp.len(),
            blend = loaded.meshes.blend.len(),
            "loaded project"
        );
        Ok(loaded)
    }

    /// Save settings and meshes to disk. When backups are enabled the new
    /// data file is also copied into the backup folder; the copy's path is
    /// returned.
    pub fn save(&mut self) -> Result<Option<PathBuf>, ProjectError> {
        std::fs::create_dir_all(&self.root).map_err(|e| ProjectError::IoError {
            path: self.root.clone(),
            source: e,
        })?;

        self.folder.modified_at = chrono::Utc::now().to_rfc3339();
        let project_path = self.project_path();
        let project_json =
            serde_json::to_string_pretty(&self.folder).map_err(|e| ProjectError::ParseError {
                path: project_path.clone(),
                source: e,
            })?;
        std::fs::write(&project_path, project_json).map_err(|e| ProjectError::IoError {
            path: project_path,
            source: e,
        })?;

        let data_path = self.data_file_path();
        let bytes = self.meshes.encode(self.folder.pack_scale());
        std::fs::write(&data_path, &bytes).map_err(|e| ProjectError::IoError {
            path: data_path.clone(),
            source: e,
        })?;
        info!(path = %data_path.display(), bytes = bytes.len(), "saved data file");

        if self.folder.backup.enabled {
            self.backup().map(Some)
        } else {
            Ok(None)
        }
    }

    /// Copy the current data file into the backup folder under a timestamped
    /// name, then prune the oldest copies beyond the configured limit.
    pub fn backup(&self) -> Result<PathBuf, ProjectError> {
        let folder = self.backup_folder();
        std::fs::create_dir_all(&folder).map_err(|e| ProjectError::IoError {
            path: folder.clone(),
            source: e,
        })?;

        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S_%3f");
        let backup_path = folder.join(format!(
            "{}_{stamp}.{DATA_FILE_EXTENSION}",
            self.folder.data_file
        ));
        let data_path = self.data_file_path();
        std::fs::copy(&data_path, &backup_path).map_err(|e| ProjectError::IoError {
            path: data_path,
            source: e,
        })?;
        debug!(path = %backup_path.display(), "wrote backup");

        if self.folder.backup.limit > 0 {
            self.prune_backups(&folder)?;
        }
        Ok(backup_path)
    }

    /// Timestamped names sort chronologically, so the oldest go first.
    fn prune_backups(&self, folder: &Path) -> Result<(), ProjectError> {
        let io_err = |e| ProjectError::IoError {
            path: folder.to_path_buf(),
            source: e,
        };
        let prefix = format!("{}_", self.folder.data_file);
        let mut backups: Vec<PathBuf> = std::fs::read_dir(folder)
            .map_err(io_err)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| {
                p.extension().is_some_and(|ext| ext == DATA_FILE_EXTENSION)
                    && p.file_name()
                        .and_then(|n| n.to_str())
                        .is_some_and(|n| n.starts_with(&prefix))
            })
            .collect();
        backups.sort();

        let excess = backups.len().saturating_sub(self.folder.backup.limit);
        for old in &backups[..excess] {
            std::fs::remove_file(old).map_err(|e| ProjectError::IoError {
                path: old.clone(),
                source: e,
            })?;
            debug!(path = %old.display(), "pruned backup");
        }
        Ok(())
    }

    /// Create a new project on disk with one default warp mesh over the
    /// texture and one default blend mesh over the output.
    pub fn create(
        root: impl AsRef<Path>,
        name: impl Into<String>,
        texture_size: [u32; 2],
    ) -> Result<Self, ProjectError> {
        let root = root.as_ref().to_path_buf();
        let folder = ProjectFolder::new(name, texture_size);

        let mut meshes = MeshData::new();
        meshes.warp.create(
            "warp",
            GridSize::new(1, 1),
            folder.texture_rect(),
            Rect::UNIT,
        );
        meshes.blend.create(
            "blend",
            GridSize::new(1, 1),
            folder.bridge_rect(),
            Rect::UNIT,
        );

        let mut loaded = Self {
            root,
            folder,
            meshes,
        };
        loaded.save()?;
        Ok(loaded)
    }

    /// Record a new source texture size, rescaling warp uv quads so they
    /// cover the same relative region.
    pub fn set_texture_size(&mut self, size: [u32; 2]) {
        let old = self.folder.texture.size_cache;
        if old == size {
            return;
        }
        if old[0] > 0 && old[1] > 0 {
            let scale = Vec2::new(
                size[0] as f32 / old[0] as f32,
                size[1] as f32 / old[1] as f32,
            );
            self.meshes.warp.uv_rescale(scale);
            debug!(?old, new = ?size, "rescaled warp uv quads");
        }
        self.folder.texture.size_cache = size;
    }

    /// Write the warp and blend meshes to the export folder as PLY, followed
    /// by the blend shader parameters as JSON.
    pub fn export(&mut self, only_visible: bool) -> Result<ExportReport, ProjectError> {
        let folder = self.export_folder();
        std::fs::create_dir_all(&folder).map_err(|e| ProjectError::IoError {
            path: folder.clone(),
            source: e,
        })?;
        let mut report = ExportReport::default();

        let warp = &self.folder.export.warp;
        let path = folder.join(&warp.filename);
        let coord_size = self.folder.export_coord_size(MeshKind::Warp);
        self.meshes
            .warp
            .export_mesh(&path, warp.max_mesh_size, coord_size, only_visible)
            .map_err(|e| ProjectError::IoError {
                path: path.clone(),
                source: e,
            })?;
        report.files.push(path);

        let blend = &self.folder.export.blend;
        let path = folder.join(&blend.filename);
        let coord_size = self.folder.export_coord_size(MeshKind::Blend);
        self.meshes
            .blend
            .export_mesh(&path, blend.max_mesh_size, coord_size, only_visible)
            .map_err(|e| ProjectError::IoError {
                path: path.clone(),
                source: e,
            })?;
        report.files.push(path);

        let path = folder.join(&self.folder.export.blend_shader.filename);
        let json = serde_json::to_string_pretty(&self.folder.blend_params).map_err(|e| {
            ProjectError::ParseError {
                path: path.clone(),
                source: e,
            }
        })?;
        std::fs::write(&path, json).map_err(|e| ProjectError::IoError {
            path: path.clone(),
            source: e,
        })?;
        debug!(path = %path.display(), "exported blend shader parameters");
        report.files.push(path);

        Ok(report)
    }

    /// Problems that would break loading or rendering.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = vec![];

        match self.texture_path() {
            Some(path) if !path.exists() => {
                errors.push(format!("Texture source missing: {}", self.folder.texture.file));
            }
            None => errors.push("No texture source set".to_string()),
            _ => {}
        }

        let [w, h] = self.folder.texture.size_cache;
        if w == 0 || h == 0 {
            errors.push(format!("Texture size cache is empty: {w}x{h}"));
        }
        let [w, h] = self.folder.bridge.resolution;
        if w == 0 || h == 0 {
            errors.push(format!("Bridge resolution is empty: {w}x{h}"));
        }

        if !self.data_file_path().exists() {
            errors.push(format!(
                "Data file missing: {}.{DATA_FILE_EXTENSION}",
                self.folder.data_file
            ));
        }

        let export = &self.folder.export;
        let outputs = [
            ("warp mesh", &export.warp.filename),
            ("blend mesh", &export.blend.filename),
            ("blend shader", &export.blend_shader.filename),
        ];
        for (i, (label, filename)) in outputs.iter().enumerate() {
            if filename.is_empty() {
                errors.push(format!("Export file name for the {label} is empty"));
                continue;
            }
            if let Some((other, _)) = outputs[..i].iter().find(|(_, f)| f == filename) {
                errors.push(format!(
                    "Export file names of the {other} and the {label} collide: {filename}"
                ));
            }
        }

        errors
    }
}

/// Errors that can occur when working with projects.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Corrupt data file {path}: {source}")]
    DecodeError { path: PathBuf, source: DecodeError },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_project(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("quadwarp_test_{tag}"));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_project_folder_serialization() {
        let folder = ProjectFolder::new("Test", [1920, 1080]);
        let json = serde_json::to_string_pretty(&folder).unwrap();
        let parsed: ProjectFolder = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.name, "Test");
        assert_eq!(parsed.texture.size_cache, [1920, 1080]);
        assert_eq!(parsed.export.warp.filename, "warp.ply");
    }

    #[test]
    fn test_missing_sections_default() {
        let json = r#"{
            "version": "1.0",
            "name": "Legacy",
            "created_at": "2024-01-01T00:00:00Z",
            "modified_at": "2024-01-01T00:00:00Z",
            "backup": { "limit": 3 }
        }"#;
        let parsed: ProjectFolder = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.data_file, "data");
        assert!(parsed.backup.enabled);
        assert_eq!(parsed.backup.limit, 3);
        assert_eq!(parsed.bridge.resolution, [1920, 1080]);
        assert_eq!(parsed.grid.blend, GridData::default());
        assert_eq!(parsed.blend_params, BlendParams::default());
        assert_eq!(parsed.export.blend_shader.filename, "blend_shader.json");
    }

    #[test]
    fn test_create_save_load_round_trip() {
        let dir = temp_project("round_trip");
        let mut created = LoadedProject::create(&dir, "Round Trip", [1024, 512]).unwrap();
        assert_eq!(created.meshes.warp.len(), 1);
        assert_eq!(created.meshes.blend.len(), 1);

        created.meshes.warp.get_mut("warp").unwrap().is_locked = true;
        created.folder.backup.enabled = false;
        assert!(created.save().unwrap().is_none());

        let loaded = LoadedProject::load(&dir).unwrap();
        assert_eq!(loaded.folder.name, "Round Trip");
        let warp = loaded.meshes.warp.get("warp").unwrap();
        assert!(warp.is_locked);
        assert_eq!(warp.mesh.uv_quad().bounds(), Rect::new(0.0, 0.0, 1024.0, 512.0));
        let blend = loaded.meshes.blend.get("blend").unwrap();
        let frame = blend.mesh.quads.frame().bounds();
        assert!((frame.w - 1920.0).abs() < 1e-2 && (frame.h - 1080.0).abs() < 1e-2);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_backups_are_pruned_to_limit() {
        let dir = temp_project("backup");
        let mut project = LoadedProject::create(&dir, "Backup", [64, 64]).unwrap();
        project.folder.backup.limit = 2;
        let mut last = None;
        for _ in 0..4 {
            last = project.save().unwrap();
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        let remaining: Vec<_> = std::fs::read_dir(project.backup_folder())
            .unwrap()
            .filter_map(|e| e.ok())
            .collect();
        assert_eq!(remaining.len(), 2);
        assert!(last.unwrap().exists());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_reports_corrupt_data_file() {
        let dir = temp_project("corrupt");
        let project = LoadedProject::create(&dir, "Corrupt", [64, 64]).unwrap();
        std::fs::write(project.data_file_path(), b"QWRP\x01").unwrap();
        let err = LoadedProject::load(&dir).unwrap_err();
        assert!(matches!(err, ProjectError::DecodeError { .. }));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_set_texture_size_rescales_uv() {
        let dir = temp_project("rescale");
        let mut project = LoadedProject::create(&dir, "Rescale", [100, 50]).unwrap();
        project.set_texture_size([200, 200]);
        let uv = *project.meshes.warp.get("warp").unwrap().mesh.uv_quad();
        assert_eq!(uv.bounds(), Rect::new(0.0, 0.0, 200.0, 200.0));
        assert_eq!(project.folder.texture.size_cache, [200, 200]);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_export_writes_meshes_and_shader_params() {
        let dir = temp_project("export");
        let mut project = LoadedProject::create(&dir, "Export", [64, 64]).unwrap();
        project.folder.blend_params.gamma = [2.2, 2.2, 2.2];
        let report = project.export(true).unwrap();
        assert_eq!(report.files.len(), 3);
        for file in &report.files[..2] {
            let text = std::fs::read_to_string(file).unwrap();
            assert!(text.starts_with("ply\n"));
        }

        let shader = &report.files[2];
        assert_eq!(shader.file_name().unwrap(), "blend_shader.json");
        let params: BlendParams =
            serde_json::from_str(&std::fs::read_to_string(shader).unwrap()).unwrap();
        assert_eq!(params.gamma, [2.2, 2.2, 2.2]);
        assert_eq!(params.base_color, [0.0; 3]);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_blend_export_is_normalized_by_bridge() {
        let dir = temp_project("export_coords");
        let mut project = LoadedProject::create(&dir, "Coords", [64, 64]).unwrap();
        assert_eq!(project.folder.bridge.resolution, [1920, 1080]);

        let max_coord = |mesh: &crate::render::RenderMesh| {
            mesh.texcoords
                .iter()
                .fold(Vec2::ZERO, |m, t| Vec2::new(m.x.max(t.x), m.y.max(t.y)))
        };
        let blend_size = project.folder.export_coord_size(MeshKind::Blend);
        let blend = project.meshes.blend.mesh_for_export(100.0, blend_size, true);
        let max = max_coord(&blend);
        assert!((max.x - 1.0).abs() < 1e-4 && (max.y - 1.0).abs() < 1e-4, "{max:?}");

        let warp_size = project.folder.export_coord_size(MeshKind::Warp);
        assert_eq!(warp_size, Vec2::new(1.0 / 64.0, 1.0 / 64.0));
        let warp = project.meshes.warp.mesh_for_export(100.0, warp_size, true);
        let max = max_coord(&warp);
        assert!((max.x - 1.0).abs() < 1e-4 && (max.y - 1.0).abs() < 1e-4, "{max:?}");

        project.folder.export.is_arb = true;
        assert_eq!(project.folder.export_coord_size(MeshKind::Blend), Vec2::ONE);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_validate_reports_missing_texture() {
        let dir = temp_project("validate");
        let mut project = LoadedProject::create(&dir, "Validate", [64, 64]).unwrap();
        assert!(project.validate().iter().any(|e| e.contains("No texture source")));

        project.folder.texture.file = "sources/missing.png".to_string();
        let errors = project.validate();
        assert!(errors.iter().any(|e| e.contains("Texture source missing")));
        assert!(!errors.iter().any(|e| e.contains("Data file missing")));

        project.folder.export.blend_shader.filename = "warp.ply".to_string();
        let errors = project.validate();
        assert!(errors
            .iter()
            .any(|e| e.contains("warp mesh and the blend shader collide")));

        std::fs::remove_dir_all(&dir).ok();
    }
}
