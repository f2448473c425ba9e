//! Quad editing for blend meshes.
//!
//! The editor holds the current [`EditMode`], grid settings and selection.
//! Geometry lives in the collection; every operation takes the mesh it acts
//! on, so one editor can serve any number of collections.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::blend::{BlendMesh, BlendQuadSet, FRAME};
use crate::collection::{MeshCollection, MeshEntry, MeshId};
use crate::geom::Vec2;
use crate::quad::Quad;

/// Which quads of a blend set are open for editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditMode {
    /// The frame only. Corner drags keep it an axis-aligned rectangle.
    Frame,
    /// Outer and inner quads, freely deformable.
    Vertex,
    #[default]
    All,
}

/// Quad indices editable in `mode`.
pub fn editable_quad_indices(mode: EditMode) -> &'static [usize] {
    match mode {
        EditMode::Frame => &[0],
        EditMode::Vertex => &[1, 2],
        EditMode::All => &[0, 1, 2],
    }
}

/// Address of one corner inside a [`BlendQuadSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointIndex {
    pub quad: usize,
    pub corner: usize,
}

impl PointIndex {
    pub const fn new(quad: usize, corner: usize) -> Self {
        Self { quad, corner }
    }

    fn is_valid(&self) -> bool {
        self.quad < BlendQuadSet::SIZE && self.corner < Quad::SIZE
    }
}

/// Background grid of an editor view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridData {
    pub is_show: bool,
    pub enabled_snap: bool,
    pub offset: Vec2,
    pub size: Vec2,
}

impl Default for GridData {
    fn default() -> Self {
        Self {
            is_show: true,
            enabled_snap: false,
            offset: Vec2::ZERO,
            size: Vec2::new(32.0, 32.0),
        }
    }
}

impl GridData {
    /// Nearest grid intersection when snapping is on, else `p` unchanged.
    /// Axes with a non-positive cell size are left alone.
    pub fn snap(&self, p: Vec2) -> Vec2 {
        if !self.enabled_snap {
            return p;
        }
        let axis = |v: f32, offset: f32, size: f32| {
            if size > 0.0 {
                ((v - offset) / size).round() * size + offset
            } else {
                v
            }
        };
        Vec2::new(
            axis(p.x, self.offset.x, self.size.x),
            axis(p.y, self.offset.y, self.size.y),
        )
    }
}

/// Whole meshes and single corners picked in the view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    meshes: BTreeSet<MeshId>,
    points: BTreeSet<(MeshId, PointIndex)>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty() && self.points.is_empty()
    }

    pub fn clear(&mut self) {
        self.meshes.clear();
        self.points.clear();
    }

    pub fn select_mesh(&mut self, id: MeshId) {
        self.meshes.insert(id);
    }

    pub fn select_point(&mut self, id: MeshId, index: PointIndex) {
        self.points.insert((id, index));
    }

    /// Toggle membership of a mesh; returns whether it is now selected.
    pub fn toggle_mesh(&mut self, id: MeshId) -> bool {
        if self.meshes.remove(&id) {
            false
        } else {
            self.meshes.insert(id);
            true
        }
    }

    pub fn contains_mesh(&self, id: MeshId) -> bool {
        self.meshes.contains(&id)
    }

    pub fn contains_point(&self, id: MeshId, index: PointIndex) -> bool {
        self.points.contains(&(id, index))
    }

    pub fn meshes(&self) -> impl Iterator<Item = MeshId> + '_ {
        self.meshes.iter().copied()
    }

    pub fn points(&self) -> impl Iterator<Item = (MeshId, PointIndex)> + '_ {
        self.points.iter().copied()
    }
}

/// Editing state for blend quad sets.
#[derive(Debug, Clone, Default)]
pub struct BlendQuadEditor {
    mode: EditMode,
    grid: GridData,
    pub selection: Selection,
}

impl BlendQuadEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_grid(grid: GridData) -> Self {
        Self {
            grid,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: EditMode) {
        if self.mode != mode {
            debug!(?mode, "edit mode changed");
        }
        self.mode = mode;
    }

    pub fn grid(&self) -> &GridData {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut GridData {
        &mut self.grid
    }

    pub fn editable_quad_indices(&self) -> &'static [usize] {
        editable_quad_indices(self.mode)
    }

    pub fn get_point(&self, mesh: &BlendMesh, index: PointIndex) -> Option<Vec2> {
        index
            .is_valid()
            .then(|| mesh.quads[index.quad][index.corner])
    }

    /// Move a corner to `pos`, with the same mirroring as [`Self::move_point`].
    pub fn set_point(&self, mesh: &mut BlendMesh, index: PointIndex, pos: Vec2) -> bool {
        match self.get_point(mesh, index) {
            Some(current) => self.move_point(mesh, index, pos - current),
            None => false,
        }
    }

    /// Move one corner by `delta`. In frame mode a frame corner drags the
    /// corner sharing its x (`corner ^ 2`) and the one sharing its y
    /// (`corner ^ 1`) along, so the frame stays rectangular. Outer and inner
    /// corners always move alone.
    pub fn move_point(&self, mesh: &mut BlendMesh, index: PointIndex, delta: Vec2) -> bool {
        if !index.is_valid() {
            return false;
        }
        let quad = &mut mesh.quads[index.quad];
        quad[index.corner] += delta;
        let p = quad[index.corner];
        if self.mode == EditMode::Frame && index.quad == FRAME {
            quad[Quad::vertical_pair(index.corner)].x = p.x;
            quad[Quad::horizontal_pair(index.corner)].y = p.y;
        }
        true
    }

    /// Translate every editable quad.
    pub fn move_mesh(&self, mesh: &mut BlendMesh, delta: Vec2) {
        for &i in self.editable_quad_indices() {
            mesh.quads[i].translate(delta);
        }
    }

    /// Hit test against all three quads of `entry`, editable or not.
    ///
    /// `min_distance` is lowered to the smallest centroid distance of any quad
    /// containing `point`. Returns the entry's id if any quad contained it.
    pub fn get_if_inside(
        &self,
        entry: &MeshEntry<BlendMesh>,
        point: Vec2,
        min_distance: &mut f32,
    ) -> Option<MeshId> {
        let mut found = false;
        for quad in entry.mesh.quads.iter() {
            if !quad.contains(point) {
                continue;
            }
            *min_distance = min_distance.min(quad.centroid_distance(point));
            found = true;
        }
        found.then(|| entry.id())
    }

    /// Visit every corner, quad 0 to 2, corner 0 to 3.
    pub fn for_each_point(&self, mesh: &BlendMesh, mut visitor: impl FnMut(Vec2, PointIndex)) {
        for (qi, quad) in mesh.quads.iter().enumerate() {
            for (ci, p) in quad.iter().enumerate() {
                visitor(*p, PointIndex::new(qi, ci));
            }
        }
    }

    /// Editable entry under `point` whose hit quad centroid is nearest.
    pub fn pick_mesh(&self, meshes: &MeshCollection<BlendMesh>, point: Vec2) -> Option<MeshId> {
        let mut min_distance = f32::INFINITY;
        let mut best = None;
        for id in meshes.editable(false).into_values() {
            let Some(entry) = meshes.get_by_id(id) else {
                continue;
            };
            let before = min_distance;
            if self.get_if_inside(entry, point, &mut min_distance).is_some() && min_distance < before {
                best = Some(id);
            }
        }
        best
    }

    /// Nearest corner of an editable quad within `radius` of `point`.
    pub fn pick_point(
        &self,
        meshes: &MeshCollection<BlendMesh>,
        point: Vec2,
        radius: f32,
    ) -> Option<(MeshId, PointIndex)> {
        let editable = self.editable_quad_indices();
        let mut best: Option<(f32, MeshId, PointIndex)> = None;
        for id in meshes.editable(false).into_values() {
            let Some(entry) = meshes.get_by_id(id) else {
                continue;
            };
            self.for_each_point(&entry.mesh, |p, index| {
                if !editable.contains(&index.quad) {
                    return;
                }
                let d = p.distance_to(point);
                if d <= radius && best.map_or(true, |(bd, _, _)| d < bd) {
                    best = Some((d, id, index));
                }
            });
        }
        best.map(|(_, id, index)| (id, index))
    }

    /// Move a corner to `target`, snapped to the grid when enabled.
    pub fn drag_point(&self, mesh: &mut BlendMesh, index: PointIndex, target: Vec2) -> bool {
        self.set_point(mesh, index, self.grid.snap(target))
    }

    /// Move everything in the selection by `delta`. Selected meshes move
    /// their editable quads; selected points move unless their mesh already
    /// moved or their quad is not editable in the current mode. Locked or
    /// removed entries are skipped. Returns how many meshes were touched.
    pub fn move_selected(&self, meshes: &mut MeshCollection<BlendMesh>, delta: Vec2) -> usize {
        let mut touched = BTreeSet::new();
        for id in self.selection.meshes() {
            if let Some(entry) = meshes.get_by_id_mut(id).filter(|e| !e.is_locked) {
                self.move_mesh(&mut entry.mesh, delta);
                touched.insert(id);
            }
        }
        let mut moved_points = BTreeSet::new();
        for (id, index) in self.selection.points() {
            if self.selection.contains_mesh(id)
                || !self.editable_quad_indices().contains(&index.quad)
            {
                continue;
            }
            if let Some(entry) = meshes.get_by_id_mut(id).filter(|e| !e.is_locked) {
                if self.move_point(&mut entry.mesh, index, delta) {
                    moved_points.insert(id);
                }
            }
        }
        touched.extend(moved_points);
        debug!(count = touched.len(), "moved selection");
        touched.len()
    }
}
