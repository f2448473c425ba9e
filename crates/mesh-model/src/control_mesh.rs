//! Control grids and the interpolator that keeps them smooth.
//!
//! A [`ControlMesh`] is a rectangular grid of `(cols + 1) x (rows + 1)`
//! control points stored row-major. Each point carries its output position,
//! the rest position it had when it was created, and a texture coordinate.
//!
//! The [`Interpolator`] pins the grid corners plus any selected points and
//! derives every other point from the pinned points' displacement, weighted
//! by inverse squared distance in texture-coordinate space.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::codec::{DecodeError, Decoder, Encoder};
use crate::geom::{Rect, Vec2};

/// Number of cells along each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSize {
    pub cols: usize,
    pub rows: usize,
}

impl GridSize {
    pub const fn new(cols: usize, rows: usize) -> Self {
        Self { cols, rows }
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

/// One draggable grid point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlPoint {
    /// Output-space position.
    pub position: Vec2,
    /// Position before any interpolated displacement.
    pub rest: Vec2,
    /// Texture coordinate.
    pub coord: Vec2,
}

impl ControlPoint {
    fn lerp(a: &ControlPoint, b: &ControlPoint, t: f32) -> ControlPoint {
        ControlPoint {
            position: Vec2::lerp(a.position, b.position, t),
            rest: Vec2::lerp(a.rest, b.rest, t),
            coord: Vec2::lerp(a.coord, b.coord, t),
        }
    }
}

/// Rectangular grid of control points.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlMesh {
    cells: GridSize,
    points: Vec<ControlPoint>,
}

impl Default for ControlMesh {
    fn default() -> Self {
        Self::new(GridSize::default(), Rect::UNIT, Rect::UNIT)
    }
}

impl ControlMesh {
    /// A grid of `cells` spanning `vert_rect` in output space and
    /// `coord_rect` in texture space.
    pub fn new(cells: GridSize, vert_rect: Rect, coord_rect: Rect) -> Self {
        let mut mesh = Self {
            cells,
            points: Vec::new(),
        };
        mesh.init(cells, vert_rect, coord_rect);
        mesh
    }

    /// Reset to an evenly spaced grid. Zero cell counts are raised to one.
    pub fn init(&mut self, cells: GridSize, vert_rect: Rect, coord_rect: Rect) {
        let cells = GridSize::new(cells.cols.max(1), cells.rows.max(1));
        self.cells = cells;
        self.points.clear();
        for r in 0..=cells.rows {
            for c in 0..=cells.cols {
                let uv = Vec2::new(c as f32 / cells.cols as f32, r as f32 / cells.rows as f32);
                let position = vert_rect.point_at(uv);
                self.points.push(ControlPoint {
                    position,
                    rest: position,
                    coord: coord_rect.point_at(uv),
                });
            }
        }
    }

    pub fn num_cells(&self) -> GridSize {
        self.cells
    }

    /// Points per row.
    pub fn stride(&self) -> usize {
        self.cells.cols + 1
    }

    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    pub fn points(&self) -> &[ControlPoint] {
        &self.points
    }

    pub fn point(&self, col: usize, row: usize) -> Option<&ControlPoint> {
        if col > self.cells.cols || row > self.cells.rows {
            return None;
        }
        self.points.get(row * self.stride() + col)
    }

    pub fn point_mut(&mut self, col: usize, row: usize) -> Option<&mut ControlPoint> {
        if col > self.cells.cols || row > self.cells.rows {
            return None;
        }
        let stride = self.stride();
        self.points.get_mut(row * stride + col)
    }

    pub fn is_corner(&self, col: usize, row: usize) -> bool {
        (col == 0 || col == self.cells.cols) && (row == 0 || row == self.cells.rows)
    }

    /// Split cell row `index` at `frac` (0..1 from its top edge), inserting
    /// a new row of points. Returns false when `index` is out of range.
    pub fn divide_row(&mut self, index: usize, frac: f32) -> bool {
        if index >= self.cells.rows {
            return false;
        }
        let stride = self.stride();
        let new_row: Vec<ControlPoint> = (0..stride)
            .map(|c| {
                let above = &self.points[index * stride + c];
                let below = &self.points[(index + 1) * stride + c];
                ControlPoint::lerp(above, below, frac)
            })
            .collect();
        let at = (index + 1) * stride;
        self.points.splice(at..at, new_row);
        self.cells.rows += 1;
        true
    }

    /// Split cell column `index` at `frac` (0..1 from its left edge).
    pub fn divide_col(&mut self, index: usize, frac: f32) -> bool {
        if index >= self.cells.cols {
            return false;
        }
        let stride = self.stride();
        let mut points = Vec::with_capacity(self.points.len() + self.cells.rows + 1);
        for row in self.points.chunks(stride) {
            points.extend_from_slice(&row[..=index]);
            points.push(ControlPoint::lerp(&row[index], &row[index + 1], frac));
            points.extend_from_slice(&row[index + 1..]);
        }
        self.points = points;
        self.cells.cols += 1;
        true
    }

    /// Move every point, rest positions included.
    pub fn translate(&mut self, delta: Vec2) {
        for p in &mut self.points {
            p.position += delta;
            p.rest += delta;
        }
    }

    /// Nearest control point to `p` in output space within `radius`.
    pub fn find_point(&self, p: Vec2, radius: f32) -> Option<(usize, usize)> {
        let stride = self.stride();
        self.points
            .iter()
            .enumerate()
            .map(|(i, cp)| (i, cp.position.distance_to(p)))
            .filter(|(_, d)| *d <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| (i % stride, i / stride))
    }

    /// Grid size, point count, then each point's position, rest and
    /// texture coordinate. Texture coordinates are multiplied by `scale`.
    pub fn pack(&self, enc: &mut Encoder, scale: Vec2) {
        enc.write_u32(self.cells.cols as u32);
        enc.write_u32(self.cells.rows as u32);
        enc.write_size(self.points.len());
        for p in &self.points {
            enc.write_vec2(p.position);
            enc.write_vec2(p.rest);
            enc.write_vec2(p.coord.scale(scale));
        }
    }

    /// Inverse of [`ControlMesh::pack`]: texture coordinates are divided by `scale`.
    pub fn unpack(&mut self, dec: &mut Decoder<'_>, scale: Vec2) -> Result<(), DecodeError> {
        let cols = dec.read_u32("grid columns")?;
        let rows = dec.read_u32("grid rows")?;
        let count = dec.read_count(24, "control point count")?;
        let expected = (cols as u64 + 1) * (rows as u64 + 1);
        if cols == 0 || rows == 0 || expected != count as u64 {
            return Err(DecodeError::InvalidGrid {
                cols,
                rows,
                points: count as u64,
            });
        }
        let mut points = Vec::with_capacity(count);
        for _ in 0..count {
            points.push(ControlPoint {
                position: dec.read_vec2("control point position")?,
                rest: dec.read_vec2("control point rest")?,
                coord: dec.read_vec2("control point coord")?.unscale(scale),
            });
        }
        self.cells = GridSize::new(cols as usize, rows as usize);
        self.points = points;
        Ok(())
    }
}

/// Keeps unpinned control points smoothly following the pinned ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Interpolator {
    selected: BTreeSet<(usize, usize)>,
    /// Pinned positions seen by the last update, with the grid size.
    last: Option<(GridSize, Vec<Vec2>)>,
}

impl Interpolator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin a point so it drives its neighbors.
    pub fn select_point(&mut self, col: usize, row: usize) {
        if self.selected.insert((col, row)) {
            self.last = None;
        }
    }

    pub fn deselect_point(&mut self, col: usize, row: usize) -> bool {
        let removed = self.selected.remove(&(col, row));
        if removed {
            self.last = None;
        }
        removed
    }

    pub fn is_selected(&self, col: usize, row: usize) -> bool {
        self.selected.contains(&(col, row))
    }

    pub fn selected(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.selected.iter().copied()
    }

    /// Force the next [`Interpolator::update`] to recompute.
    pub fn set_dirty(&mut self) {
        self.last = None;
    }

    /// Shift selections below an inserted row.
    pub fn row_divided(&mut self, index: usize) {
        self.selected = self
            .selected
            .iter()
            .map(|&(c, r)| if r > index { (c, r + 1) } else { (c, r) })
            .collect();
        self.last = None;
    }

    /// Shift selections right of an inserted column.
    pub fn col_divided(&mut self, index: usize) {
        self.selected = self
            .selected
            .iter()
            .map(|&(c, r)| if c > index { (c + 1, r) } else { (c, r) })
            .collect();
        self.last = None;
    }

    fn is_pinned(&self, mesh: &ControlMesh, col: usize, row: usize) -> bool {
        mesh.is_corner(col, row) || self.selected.contains(&(col, row))
    }

    fn pinned_positions(&self, mesh: &ControlMesh) -> Vec<Vec2> {
        let stride = mesh.stride();
        mesh.points
            .iter()
            .enumerate()
            .filter(|(i, _)| self.is_pinned(mesh, i % stride, i / stride))
            .map(|(_, p)| p.position)
            .collect()
    }

    /// Recompute unpinned points if any pinned point moved since the last
    /// call. Returns whether anything was recomputed. Calling this with no
    /// pending change is a no-op.
    pub fn update(&mut self, mesh: &mut ControlMesh) -> bool {
        let pinned = self.pinned_positions(mesh);
        if let Some((cells, last)) = &self.last {
            if *cells == mesh.num_cells() && *last == pinned {
                return false;
            }
        }

        let stride = mesh.stride();
        let anchors: Vec<(Vec2, Vec2)> = mesh
            .points
            .iter()
            .enumerate()
            .filter(|(i, _)| self.is_pinned(mesh, i % stride, i / stride))
            .map(|(_, p)| (p.coord, p.position - p.rest))
            .collect();

        for i in 0..mesh.points.len() {
            if self.is_pinned(mesh, i % stride, i / stride) {
                continue;
            }
            let p = &mut mesh.points[i];
            p.position = p.rest + weighted_displacement(&anchors, p.coord);
        }

        self.last = Some((mesh.num_cells(), pinned));
        true
    }

    /// Selected points as a count followed by `(col, row)` pairs.
    pub fn pack(&self, enc: &mut Encoder) {
        enc.write_size(self.selected.len());
        for &(c, r) in &self.selected {
            enc.write_u32(c as u32);
            enc.write_u32(r as u32);
        }
    }

    pub fn unpack(&mut self, dec: &mut Decoder<'_>) -> Result<(), DecodeError> {
        let count = dec.read_count(8, "selection count")?;
        let mut selected = BTreeSet::new();
        for _ in 0..count {
            let c = dec.read_u32("selected column")? as usize;
            let r = dec.read_u32("selected row")? as usize;
            selected.insert((c, r));
        }
        self.selected = selected;
        self.last = None;
        Ok(())
    }
}

/// Inverse-squared-distance blend of anchor displacements at `coord`.
fn weighted_displacement(anchors: &[(Vec2, Vec2)], coord: Vec2) -> Vec2 {
    let mut sum = Vec2::ZERO;
    let mut weight_sum = 0.0f32;
    for &(anchor_coord, displacement) in anchors {
        let d2 = (anchor_coord - coord).x.powi(2) + (anchor_coord - coord).y.powi(2);
        if d2 <= f32::EPSILON {
            return displacement;
        }
        let w = 1.0 / d2;
        sum += displacement * w;
        weight_sum += w;
    }
    if weight_sum > 0.0 {
        sum * (1.0 / weight_sum)
    } else {
        Vec2::ZERO
    }
}
