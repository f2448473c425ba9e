//! Warp meshes: a control grid deforming a region of the source texture.

use crate::codec::{DecodeError, Decoder, Encoder};
use crate::collection::{MeshPayload, RenderSource};
use crate::control_mesh::{ControlMesh, GridSize, Interpolator};
use crate::geom::{Rect, Vec2};
use crate::quad::Quad;
use crate::render::RenderMesh;
use crate::resample::Resampler;

#[derive(Debug, Clone)]
struct RenderCache {
    resample_min_interval: f32,
    remap_coord: Vec2,
    mesh: RenderMesh,
}

/// Geometry of one warp entry.
///
/// `uv_quad` selects the texture region in texture pixels; the control
/// mesh's texture coordinates are normalized within that quad.
#[derive(Debug, Clone)]
pub struct WarpMesh {
    uv_quad: Quad,
    mesh: ControlMesh,
    interpolator: Interpolator,
    cache: Option<RenderCache>,
}

impl WarpMesh {
    pub fn uv_quad(&self) -> &Quad {
        &self.uv_quad
    }

    pub fn uv_quad_mut(&mut self) -> &mut Quad {
        self.cache = None;
        &mut self.uv_quad
    }

    pub fn control_mesh(&self) -> &ControlMesh {
        &self.mesh
    }

    pub fn control_mesh_mut(&mut self) -> &mut ControlMesh {
        self.cache = None;
        &mut self.mesh
    }

    pub fn interpolator(&self) -> &Interpolator {
        &self.interpolator
    }

    pub fn interpolator_mut(&mut self) -> &mut Interpolator {
        self.cache = None;
        &mut self.interpolator
    }

    pub fn divide_row(&mut self, index: usize, frac: f32) -> bool {
        let divided = self.mesh.divide_row(index, frac);
        if divided {
            self.interpolator.row_divided(index);
            self.cache = None;
        }
        divided
    }

    pub fn divide_col(&mut self, index: usize, frac: f32) -> bool {
        let divided = self.mesh.divide_col(index, frac);
        if divided {
            self.interpolator.col_divided(index);
            self.cache = None;
        }
        divided
    }

    /// Move a control point by `delta` and pin it so the grid follows.
    pub fn drag_point(&mut self, col: usize, row: usize, delta: Vec2) -> bool {
        let Some(p) = self.mesh.point_mut(col, row) else {
            return false;
        };
        p.position += delta;
        self.interpolator.select_point(col, row);
        self.cache = None;
        true
    }

    /// Resample the control mesh and map its texture coordinates through
    /// `uv_quad` scaled by `remap_coord`.
    pub fn get_mesh(&self, resample_min_interval: f32, remap_coord: Vec2) -> RenderMesh {
        let mut ret = Resampler::new().proc(&self.mesh, resample_min_interval);
        let uv = self.uv_quad.scaled(remap_coord);
        for t in &mut ret.texcoords {
            *t = uv.rescale_position(*t);
        }
        ret
    }
}

impl MeshPayload for WarpMesh {
    /// A `cells` grid pre-split once at the middle of the first row and
    /// column, with the new interior point selected. The uv quad covers
    /// `vert_rect`, so a fresh mesh shows the texture undistorted.
    fn create(cells: GridSize, vert_rect: Rect, coord_rect: Rect) -> Self {
        let mut ret = Self {
            uv_quad: Quad::from_rect(vert_rect),
            mesh: ControlMesh::new(cells, vert_rect, coord_rect),
            interpolator: Interpolator::new(),
            cache: None,
        };
        ret.divide_row(0, 0.5);
        ret.divide_col(0, 0.5);
        ret.interpolator.select_point(1, 1);
        ret
    }

    fn update(&mut self) {
        if self.interpolator.update(&mut self.mesh) {
            self.cache = None;
        }
    }

    fn set_dirty(&mut self) {
        self.interpolator.set_dirty();
        self.cache = None;
    }

    fn uv_rescale(&mut self, scale: Vec2) {
        self.uv_quad = self.uv_quad.scaled(scale);
        self.cache = None;
    }

    /// Four uv points scaled by `scale`, then the control mesh (which gets
    /// the reciprocal scale) and its selection.
    fn pack(&self, enc: &mut Encoder, scale: Vec2) {
        for p in self.uv_quad.iter() {
            enc.write_f32(p.x * scale.x);
            enc.write_f32(p.y * scale.y);
        }
        self.mesh.pack(enc, Vec2::ONE.unscale(scale));
        self.interpolator.pack(enc);
    }

    fn unpack(dec: &mut Decoder<'_>, scale: Vec2) -> Result<Self, DecodeError> {
        let mut uv_quad = Quad::default();
        for p in &mut uv_quad.pt {
            *p = dec.read_vec2("uv quad point")?.unscale(scale);
        }
        let mut mesh = ControlMesh::default();
        mesh.unpack(dec, Vec2::ONE.unscale(scale))?;
        let mut interpolator = Interpolator::new();
        interpolator.unpack(dec)?;
        Ok(Self {
            uv_quad,
            mesh,
            interpolator,
            cache: None,
        })
    }
}

impl RenderSource for WarpMesh {
    fn render_mesh(&mut self, resample_min_interval: f32, remap_coord: Vec2) -> RenderMesh {
        if let Some(cache) = &self.cache {
            if cache.resample_min_interval == resample_min_interval
                && cache.remap_coord == remap_coord
            {
                return cache.mesh.clone();
            }
        }
        let mesh = self.get_mesh(resample_min_interval, remap_coord);
        self.cache = Some(RenderCache {
            resample_min_interval,
            remap_coord,
            mesh: mesh.clone(),
        });
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quad::{BOTTOM_RIGHT, TOP_LEFT};

    fn warp() -> WarpMesh {
        WarpMesh::create(
            GridSize::new(1, 1),
            Rect::new(0.0, 0.0, 100.0, 100.0),
            Rect::UNIT,
        )
    }

    #[test]
    fn test_create_presplits_and_selects_center() {
        let w = warp();
        assert_eq!(w.control_mesh().num_cells(), GridSize::new(2, 2));
        assert!(w.interpolator().is_selected(1, 1));
        let center = w.control_mesh().point(1, 1).unwrap();
        assert_eq!(center.position, Vec2::new(50.0, 50.0));
        assert_eq!(center.coord, Vec2::new(0.5, 0.5));
    }

    #[test]
    fn test_get_mesh_remaps_texcoords_through_uv_quad() {
        let mut w = warp();
        *w.uv_quad_mut() = Quad::from_rect(Rect::new(100.0, 0.0, 200.0, 100.0));
        let m = w.get_mesh(1000.0, Vec2::new(0.5, 1.0));
        // uv quad scaled to (50, 0)-(150, 100)
        assert_eq!(m.texcoords[0], Vec2::new(50.0, 0.0));
        assert_eq!(*m.texcoords.last().unwrap(), Vec2::new(150.0, 100.0));
    }

    #[test]
    fn test_drag_center_moves_neighbors_on_update() {
        let mut w = warp();
        w.update();
        assert!(w.drag_point(1, 1, Vec2::new(0.0, 20.0)));
        w.update();
        let edge = w.control_mesh().point(0, 1).unwrap().position;
        assert!(edge.y > 50.0);
        assert_eq!(w.control_mesh().point(0, 0).unwrap().position, Vec2::ZERO);
        assert!(!w.drag_point(5, 5, Vec2::ONE));
    }

    #[test]
    fn test_render_cache_invalidates_on_edit() {
        let mut w = warp();
        let first = w.render_mesh(1000.0, Vec2::ONE);
        w.uv_quad_mut().translate(Vec2::new(10.0, 0.0));
        let second = w.render_mesh(1000.0, Vec2::ONE);
        assert_ne!(first.texcoords, second.texcoords);
        assert_eq!(first.vertices, second.vertices);
    }

    #[test]
    fn test_pack_scales_uv_quad() {
        let w = warp();
        let mut enc = Encoder::new();
        w.pack(&mut enc, Vec2::new(0.25, 0.5));
        let bytes = enc.into_inner();
        let mut dec = Decoder::new(&bytes);
        assert_eq!(dec.read_vec2("pt").unwrap(), Vec2::new(0.0, 0.0));
        dec.read_vec2("pt").unwrap();
        dec.read_vec2("pt").unwrap();
        assert_eq!(dec.read_vec2("pt").unwrap(), Vec2::new(25.0, 50.0));

        let back = WarpMesh::unpack(&mut Decoder::new(&bytes), Vec2::new(0.25, 0.5)).unwrap();
        assert_eq!(back.uv_quad()[BOTTOM_RIGHT], Vec2::new(100.0, 100.0));
        assert_eq!(back.uv_quad()[TOP_LEFT], Vec2::ZERO);
        assert!(back.interpolator().is_selected(1, 1));
    }

    #[test]
    fn test_copy_is_independent() {
        let a = warp();
        let mut b = a.clone();
        b.uv_quad_mut().translate(Vec2::new(5.0, 5.0));
        b.drag_point(1, 1, Vec2::ONE);
        assert_eq!(a.uv_quad()[TOP_LEFT], Vec2::ZERO);
        assert_eq!(a.control_mesh().point(1, 1).unwrap().position, Vec2::new(50.0, 50.0));
    }
}
