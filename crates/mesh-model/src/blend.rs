//! Blend meshes: three quads describing an edge-blend region.
//!
//! The frame quad places the region in output space. The outer and inner
//! quads bound the falloff band: fully lit inside `inner`, fading to black
//! at `outer`, black between `outer` and `frame`.

use std::ops::{Index, IndexMut};

use crate::codec::{DecodeError, Decoder, Encoder};
use crate::collection::{MeshPayload, RenderSource};
use crate::control_mesh::GridSize;
use crate::geom::{Rect, Vec2};
use crate::quad::{Quad, BOTTOM_LEFT, BOTTOM_RIGHT, TOP_LEFT, TOP_RIGHT};
use crate::render::RenderMesh;

pub const FRAME: usize = 0;
pub const OUTER: usize = 1;
pub const INNER: usize = 2;

/// Labels for the three quads, in index order.
pub const QUAD_NAMES: [&str; 3] = ["frame", "outer", "inner"];

/// Inset of a new inner quad, as a fraction of the frame size per side.
const DEFAULT_INNER_INSET: f32 = 0.1;

/// Exactly three quads with fixed roles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendQuadSet {
    pub quad: [Quad; 3],
}

impl BlendQuadSet {
    pub const SIZE: usize = 3;

    /// Frame and outer over `rect`, inner inset from it.
    pub fn from_rect(rect: Rect) -> Self {
        let dx = rect.w * DEFAULT_INNER_INSET;
        let dy = rect.h * DEFAULT_INNER_INSET;
        let inner = Rect::new(rect.x + dx, rect.y + dy, rect.w - 2.0 * dx, rect.h - 2.0 * dy);
        Self {
            quad: [Quad::from_rect(rect), Quad::from_rect(rect), Quad::from_rect(inner)],
        }
    }

    pub fn frame(&self) -> &Quad {
        &self.quad[FRAME]
    }

    pub fn outer(&self) -> &Quad {
        &self.quad[OUTER]
    }

    pub fn inner(&self) -> &Quad {
        &self.quad[INNER]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Quad> {
        self.quad.iter()
    }
}

impl Default for BlendQuadSet {
    fn default() -> Self {
        Self::from_rect(Rect::UNIT)
    }
}

impl Index<usize> for BlendQuadSet {
    type Output = Quad;
    fn index(&self, i: usize) -> &Quad {
        &self.quad[i]
    }
}

impl IndexMut<usize> for BlendQuadSet {
    fn index_mut(&mut self, i: usize) -> &mut Quad {
        &mut self.quad[i]
    }
}

/// Geometry of one blend entry.
#[derive(Debug, Clone, PartialEq)]
pub struct BlendMesh {
    pub quads: BlendQuadSet,
}

impl BlendMesh {
    /// Band mesh: inner quad lit, inner-to-outer ring fading, outer-to-frame
    /// ring black. Texture coordinates are output positions times
    /// `remap_coord`.
    pub fn get_mesh(&self, remap_coord: Vec2) -> RenderMesh {
        const OUTLINE: [usize; 4] = [TOP_LEFT, TOP_RIGHT, BOTTOM_RIGHT, BOTTOM_LEFT];
        let mut ret = RenderMesh::new();
        let ring = |quad: &Quad, alpha: f32, ret: &mut RenderMesh| -> [u32; 4] {
            quad.pt.map(|p| {
                let i = ret.push_vertex(p, p.scale(remap_coord));
                ret.colors.push([1.0, 1.0, 1.0, alpha]);
                i
            })
        };
        let inner = ring(self.quads.inner(), 1.0, &mut ret);
        let outer = ring(self.quads.outer(), 0.0, &mut ret);
        let frame = ring(self.quads.frame(), 0.0, &mut ret);

        ret.push_triangle(inner[TOP_LEFT], inner[TOP_RIGHT], inner[BOTTOM_RIGHT]);
        ret.push_triangle(inner[TOP_LEFT], inner[BOTTOM_RIGHT], inner[BOTTOM_LEFT]);
        for (from, to) in [(inner, outer), (outer, frame)] {
            for k in 0..OUTLINE.len() {
                let a = OUTLINE[k];
                let b = OUTLINE[(k + 1) % OUTLINE.len()];
                ret.push_triangle(from[a], to[a], to[b]);
                ret.push_triangle(from[a], to[b], from[b]);
            }
        }
        ret
    }
}

impl MeshPayload for BlendMesh {
    fn create(_cells: GridSize, vert_rect: Rect, _coord_rect: Rect) -> Self {
        Self {
            quads: BlendQuadSet::from_rect(vert_rect),
        }
    }

    fn uv_rescale(&mut self, scale: Vec2) {
        for q in &mut self.quads.quad {
            *q = q.scaled(scale);
        }
    }

    /// Twelve points, frame then outer then inner, each scaled by `scale`.
    fn pack(&self, enc: &mut Encoder, scale: Vec2) {
        for q in self.quads.iter() {
            for p in q.iter() {
                enc.write_vec2(p.scale(scale));
            }
        }
    }

    fn unpack(dec: &mut Decoder<'_>, scale: Vec2) -> Result<Self, DecodeError> {
        let mut quads = BlendQuadSet::default();
        for q in &mut quads.quad {
            for p in &mut q.pt {
                *p = dec.read_vec2("blend quad point")?.unscale(scale);
            }
        }
        Ok(Self { quads })
    }
}

impl RenderSource for BlendMesh {
    /// Blend bands are not resampled; `resample_min_interval` is ignored.
    fn render_mesh(&mut self, _resample_min_interval: f32, remap_coord: Vec2) -> RenderMesh {
        self.get_mesh(remap_coord)
    }
}
