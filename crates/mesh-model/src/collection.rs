//! Named mesh collections.
//!
//! A [`MeshCollection`] maps unique names to [`MeshEntry`] values, sorted by
//! name. Each entry also gets a [`MeshId`] when it is inserted; ids are never
//! reused within a collection, so editors can hold on to them across edits
//! and a removed entry simply stops resolving.
//!
//! Visibility follows the solo rule: if any entry is soloed, only soloed
//! entries that are not hidden are visible. Otherwise every entry that is not
//! hidden is visible. Editable entries are the visible ones that are not
//! locked; `include_hidden` drops the visibility part and keeps only the lock
//! filter.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;

use tracing::{debug, info};

use crate::codec::{DecodeError, Decoder, Encoder};
use crate::control_mesh::GridSize;
use crate::geom::{Rect, Vec2};
use crate::render::RenderMesh;

/// Stable handle of one entry within its collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(u64);

impl fmt::Display for MeshId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identity of an entry's uv quad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QuadRef(MeshId);

/// Identity of an entry's control mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControlMeshRef(MeshId);

/// The per-entry geometry a collection can hold.
pub trait MeshPayload: Clone {
    /// A fresh payload covering `vert_rect` in output space and
    /// `coord_rect` in texture space.
    fn create(cells: GridSize, vert_rect: Rect, coord_rect: Rect) -> Self;

    /// Per-frame step. Must be cheap and side-effect free when nothing changed.
    fn update(&mut self) {}

    /// Drop any cached render output.
    fn set_dirty(&mut self) {}

    /// Rescale texture-space coordinates after the source texture resized.
    fn uv_rescale(&mut self, _scale: Vec2) {}

    /// Write the geometry part of a mesh record.
    fn pack(&self, enc: &mut Encoder, scale: Vec2);

    /// Read what [`MeshPayload::pack`] wrote with the same `scale`.
    fn unpack(dec: &mut Decoder<'_>, scale: Vec2) -> Result<Self, DecodeError>;
}

/// Payloads that can produce a dense render mesh.
pub trait RenderSource {
    fn render_mesh(&mut self, resample_min_interval: f32, remap_coord: Vec2) -> RenderMesh;
}

/// One named deformable region.
#[derive(Debug, Clone)]
pub struct MeshEntry<T> {
    pub is_hidden: bool,
    pub is_locked: bool,
    pub is_solo: bool,
    pub mesh: T,
    id: MeshId,
}

impl<T: MeshPayload> MeshEntry<T> {
    pub fn id(&self) -> MeshId {
        self.id
    }

    pub fn quad_ref(&self) -> QuadRef {
        QuadRef(self.id)
    }

    pub fn control_mesh_ref(&self) -> ControlMeshRef {
        ControlMeshRef(self.id)
    }

    /// Flags plus geometry, as stored in the data file.
    pub fn pack(&self, enc: &mut Encoder, scale: Vec2) {
        enc.write_bool(self.is_hidden);
        enc.write_bool(self.is_locked);
        enc.write_bool(self.is_solo);
        self.mesh.pack(enc, scale);
    }

    fn unpack(dec: &mut Decoder<'_>, scale: Vec2, id: MeshId) -> Result<Self, DecodeError> {
        Ok(Self {
            is_hidden: dec.read_bool("is_hidden")?,
            is_locked: dec.read_bool("is_locked")?,
            is_solo: dec.read_bool("is_solo")?,
            mesh: T::unpack(dec, scale)?,
            id,
        })
    }
}

/// Ordered name -> entry map with unique names.
#[derive(Debug, Clone)]
pub struct MeshCollection<T> {
    entries: BTreeMap<String, MeshEntry<T>>,
    names: HashMap<MeshId, String>,
    next_id: u64,
}

impl<T> Default for MeshCollection<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
            names: HashMap::new(),
            next_id: 0,
        }
    }
}

impl<T: MeshPayload> MeshCollection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> MeshId {
        let id = MeshId(self.next_id);
        self.next_id += 1;
        id
    }

    /// First of `base`, `base0`, `base1`, ... not already taken.
    fn unique_name(&self, base: &str) -> String {
        if !self.entries.contains_key(base) {
            return base.to_string();
        }
        let mut suffix = 0u64;
        loop {
            let name = format!("{base}{suffix}");
            if !self.entries.contains_key(&name) {
                return name;
            }
            suffix += 1;
        }
    }

    fn insert_new(&mut self, base: &str, mesh: T) -> (String, &mut MeshEntry<T>) {
        let name = self.unique_name(base);
        let id = self.allocate_id();
        self.names.insert(id, name.clone());
        let entry = MeshEntry {
            is_hidden: false,
            is_locked: false,
            is_solo: false,
            mesh,
            id,
        };
        debug!(name = %name, id = %id, "created mesh");
        let slot = self.entries.entry(name.clone()).or_insert(entry);
        (name, slot)
    }

    /// Create an entry under `base` or the first free suffixed variant.
    pub fn create(
        &mut self,
        base: &str,
        cells: GridSize,
        vert_rect: Rect,
        coord_rect: Rect,
    ) -> (String, &mut MeshEntry<T>) {
        self.insert_new(base, T::create(cells, vert_rect, coord_rect))
    }

    /// Create an independent deep copy of `source` (flags included) under
    /// `name` or the first free suffixed variant.
    pub fn create_copy(&mut self, name: &str, source: &MeshEntry<T>) -> (String, &mut MeshEntry<T>) {
        let (assigned, entry) =
            self.insert_new(name, T::create(GridSize::new(1, 1), Rect::UNIT, Rect::UNIT));
        entry.mesh = source.mesh.clone();
        entry.is_hidden = source.is_hidden;
        entry.is_locked = source.is_locked;
        entry.is_solo = source.is_solo;
        (assigned, entry)
    }

    /// [`MeshCollection::create_copy`] for an entry of this collection.
    pub fn duplicate(&mut self, name: &str, source: MeshId) -> Option<(String, &mut MeshEntry<T>)> {
        let source = self.get_by_id(source)?.clone();
        Some(self.create_copy(name, &source))
    }

    pub fn remove(&mut self, name: &str) -> bool {
        match self.entries.remove(name) {
            Some(entry) => {
                self.names.remove(&entry.id);
                debug!(name, "removed mesh");
                true
            }
            None => false,
        }
    }

    pub fn remove_by_id(&mut self, id: MeshId) -> bool {
        match self.names.get(&id).cloned() {
            Some(name) => self.remove(&name),
            None => false,
        }
    }

    /// Rename an entry. Fails if `from` is absent or `to` is taken.
    pub fn rename(&mut self, from: &str, to: &str) -> bool {
        if from == to {
            return self.entries.contains_key(from);
        }
        if self.entries.contains_key(to) {
            return false;
        }
        let Some(entry) = self.entries.remove(from) else {
            return false;
        };
        self.names.insert(entry.id, to.to_string());
        self.entries.insert(to.to_string(), entry);
        true
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.names.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&MeshEntry<T>> {
        self.entries.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut MeshEntry<T>> {
        self.entries.get_mut(name)
    }

    pub fn name_of(&self, id: MeshId) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    pub fn get_by_id(&self, id: MeshId) -> Option<&MeshEntry<T>> {
        self.entries.get(self.names.get(&id)?)
    }

    pub fn get_by_id_mut(&mut self, id: MeshId) -> Option<&mut MeshEntry<T>> {
        let name = self.names.get(&id)?;
        self.entries.get_mut(name)
    }

    /// Name and entry owning `id`.
    pub fn find(&self, id: MeshId) -> Option<(&str, &MeshEntry<T>)> {
        let (name, entry) = self.entries.get_key_value(self.names.get(&id)?)?;
        Some((name.as_str(), entry))
    }

    /// Name and entry owning the uv quad `quad`.
    pub fn find_by_quad(&self, quad: QuadRef) -> Option<(&str, &MeshEntry<T>)> {
        self.find(quad.0)
    }

    /// Name and entry owning the control mesh `mesh`.
    pub fn find_by_control_mesh(&self, mesh: ControlMeshRef) -> Option<(&str, &MeshEntry<T>)> {
        self.find(mesh.0)
    }

    /// Entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MeshEntry<T>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut MeshEntry<T>)> {
        self.entries.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn any_solo(&self) -> bool {
        self.entries.values().any(|e| e.is_solo)
    }

    fn visible_under(any_solo: bool, entry: &MeshEntry<T>) -> bool {
        if any_solo {
            entry.is_solo && !entry.is_hidden
        } else {
            !entry.is_hidden
        }
    }

    /// False for ids that no longer resolve.
    pub fn is_visible(&self, id: MeshId) -> bool {
        self.get_by_id(id)
            .is_some_and(|e| Self::visible_under(self.any_solo(), e))
    }

    pub fn is_editable(&self, id: MeshId, include_hidden: bool) -> bool {
        self.get_by_id(id)
            .is_some_and(|e| !e.is_locked && (include_hidden || self.is_visible(id)))
    }

    /// Snapshot of the visible entries. Owned, so the collection may be
    /// mutated while walking it.
    pub fn visible(&self) -> BTreeMap<String, MeshId> {
        let any_solo = self.any_solo();
        self.entries
            .iter()
            .filter(|(_, e)| Self::visible_under(any_solo, e))
            .map(|(n, e)| (n.clone(), e.id))
            .collect()
    }

    /// Snapshot of the editable entries.
    pub fn editable(&self, include_hidden: bool) -> BTreeMap<String, MeshId> {
        let any_solo = self.any_solo();
        self.entries
            .iter()
            .filter(|(_, e)| !e.is_locked && (include_hidden || Self::visible_under(any_solo, e)))
            .map(|(n, e)| (n.clone(), e.id))
            .collect()
    }

    /// Advance every entry, visible or not.
    pub fn update(&mut self) {
        for entry in self.entries.values_mut() {
            entry.mesh.update();
        }
    }

    /// Rescale every entry's texture-space coordinates.
    pub fn uv_rescale(&mut self, scale: Vec2) {
        for entry in self.entries.values_mut() {
            entry.mesh.uv_rescale(scale);
        }
    }

    /// Write the container: entry count, then each padded name and record.
    pub fn pack(&self, enc: &mut Encoder, scale: Vec2) {
        enc.write_size(self.entries.len());
        for (name, entry) in &self.entries {
            enc.write_padded_str(name);
            entry.pack(enc, scale);
        }
    }

    /// Replace the whole collection with a decoded container. The
    /// collection is cleared first and stays empty if decoding fails.
    pub fn unpack(&mut self, dec: &mut Decoder<'_>, scale: Vec2) -> Result<(), DecodeError> {
        self.clear();
        // Smallest possible entry: name length, three flags.
        let count = dec.read_count(8 + 3, "entry count")?;
        let mut decoded = Vec::with_capacity(count);
        for _ in 0..count {
            let name = dec.read_padded_str()?;
            let id = self.allocate_id();
            let entry = MeshEntry::unpack(dec, scale, id)?;
            decoded.push((name, entry));
        }
        for (name, entry) in decoded {
            if self.entries.contains_key(&name) {
                self.clear();
                return Err(DecodeError::DuplicateName(name));
            }
            self.names.insert(entry.id, name.clone());
            self.entries.insert(name, entry);
        }
        Ok(())
    }

    /// Pack into a fresh buffer.
    pub fn to_bytes(&self, scale: Vec2) -> Vec<u8> {
        let mut enc = Encoder::new();
        self.pack(&mut enc, scale);
        enc.into_inner()
    }

    /// Unpack a buffer holding exactly one container.
    pub fn load_bytes(&mut self, bytes: &[u8], scale: Vec2) -> Result<(), DecodeError> {
        let mut dec = Decoder::new(bytes);
        self.unpack(&mut dec, scale)
    }

    /// Unit-scale state blob suitable for an undo store.
    pub fn snapshot(&self) -> Vec<u8> {
        self.to_bytes(Vec2::ONE)
    }

    /// Restore a [`MeshCollection::snapshot`]. Entry ids are reassigned.
    pub fn restore(&mut self, snapshot: &[u8]) -> Result<(), DecodeError> {
        self.load_bytes(snapshot, Vec2::ONE)
    }
}

impl<T: MeshPayload + RenderSource> MeshCollection<T> {
    /// Dense render mesh of one entry.
    pub fn render_mesh(
        &mut self,
        id: MeshId,
        resample_min_interval: f32,
        remap_coord: Vec2,
    ) -> Option<RenderMesh> {
        self.get_by_id_mut(id)
            .map(|e| e.mesh.render_mesh(resample_min_interval, remap_coord))
    }

    /// All chosen entries resampled and appended in name order. Render
    /// caches are dropped first.
    pub fn mesh_for_export(
        &mut self,
        resample_min_interval: f32,
        coord_size: Vec2,
        only_visible: bool,
    ) -> RenderMesh {
        let any_solo = self.any_solo();
        let mut out = RenderMesh::new();
        for entry in self.entries.values_mut() {
            if only_visible && !Self::visible_under(any_solo, entry) {
                continue;
            }
            entry.mesh.set_dirty();
            out.append(entry.mesh.render_mesh(resample_min_interval, coord_size));
        }
        out
    }

    /// Write [`MeshCollection::mesh_for_export`] as a PLY file.
    pub fn export_mesh(
        &mut self,
        path: impl AsRef<Path>,
        resample_min_interval: f32,
        coord_size: Vec2,
        only_visible: bool,
    ) -> std::io::Result<()> {
        let path = path.as_ref();
        let mesh = self.mesh_for_export(resample_min_interval, coord_size, only_visible);
        mesh.save_ply(path)?;
        info!(
            path = %path.display(),
            vertices = mesh.num_vertices(),
            triangles = mesh.num_triangles(),
            "exported mesh"
        );
        Ok(())
    }
}
