//! Four-point quads and their geometric queries.
//!
//! Corner order is fixed across the crate:
//!
//! ```text
//!   0 (top-left) ---- 1 (top-right)
//!        |                 |
//!   2 (bottom-left) - 3 (bottom-right)
//! ```
//!
//! With this layout `i ^ 1` is the corner sharing `y` with `i` and `i ^ 2`
//! is the corner sharing `x`. The polygon outline is `0 -> 1 -> 3 -> 2`.

use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::geom::{Rect, Vec2};

/// Top-left corner index.
pub const TOP_LEFT: usize = 0;
/// Top-right corner index.
pub const TOP_RIGHT: usize = 1;
/// Bottom-left corner index.
pub const BOTTOM_LEFT: usize = 2;
/// Bottom-right corner index.
pub const BOTTOM_RIGHT: usize = 3;

/// Short labels for the corners, in index order.
pub const CORNER_NAMES: [&str; 4] = ["lt", "rt", "lb", "rb"];

const OUTLINE: [usize; 4] = [TOP_LEFT, TOP_RIGHT, BOTTOM_RIGHT, BOTTOM_LEFT];

/// A four-point polygon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quad {
    pub pt: [Vec2; 4],
}

impl Quad {
    /// Number of corners.
    pub const SIZE: usize = 4;

    pub fn new(pt: [Vec2; 4]) -> Self {
        Self { pt }
    }

    /// Axis-aligned quad covering `rect`.
    pub fn from_rect(rect: Rect) -> Self {
        Self::new([
            Vec2::new(rect.x, rect.y),
            Vec2::new(rect.right(), rect.y),
            Vec2::new(rect.x, rect.bottom()),
            Vec2::new(rect.right(), rect.bottom()),
        ])
    }

    /// Corner sharing `y` with `corner`.
    pub fn horizontal_pair(corner: usize) -> usize {
        corner ^ 1
    }

    /// Corner sharing `x` with `corner`.
    pub fn vertical_pair(corner: usize) -> usize {
        corner ^ 2
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vec2> {
        self.pt.iter()
    }

    /// Average of the four corners.
    pub fn centroid(&self) -> Vec2 {
        let sum = self.pt.iter().fold(Vec2::ZERO, |acc, p| acc + *p);
        sum * 0.25
    }

    /// Distance from `p` to the quad's center of gravity.
    pub fn centroid_distance(&self, p: Vec2) -> f32 {
        self.centroid().distance_to(p)
    }

    /// Even-odd point-in-polygon test over the outline `0 -> 1 -> 3 -> 2`.
    ///
    /// Works for convex quads and for the concave shapes that free vertex
    /// editing can produce.
    pub fn contains(&self, p: Vec2) -> bool {
        let mut inside = false;
        for k in 0..OUTLINE.len() {
            let a = self.pt[OUTLINE[k]];
            let b = self.pt[OUTLINE[(k + 1) % OUTLINE.len()]];
            if (a.y > p.y) != (b.y > p.y) {
                let x_at = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if p.x < x_at {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// Move every corner by `delta`.
    pub fn translate(&mut self, delta: Vec2) {
        for p in &mut self.pt {
            *p += delta;
        }
    }

    /// A copy with each corner scaled about the origin by `factor`.
    pub fn scaled(&self, factor: Vec2) -> Quad {
        Quad::new(self.pt.map(|p| p.scale(factor)))
    }

    /// Bilinear map of a normalized `(u, v)` onto the quad: `(0, 0)` lands
    /// on the top-left corner and `(1, 1)` on the bottom-right.
    pub fn rescale_position(&self, uv: Vec2) -> Vec2 {
        let top = Vec2::lerp(self.pt[TOP_LEFT], self.pt[TOP_RIGHT], uv.x);
        let bottom = Vec2::lerp(self.pt[BOTTOM_LEFT], self.pt[BOTTOM_RIGHT], uv.x);
        Vec2::lerp(top, bottom, uv.y)
    }

    /// Axis-aligned bounding box.
    pub fn bounds(&self) -> Rect {
        let (mut min, mut max) = (self.pt[0], self.pt[0]);
        for p in &self.pt[1..] {
            min = Vec2::new(min.x.min(p.x), min.y.min(p.y));
            max = Vec2::new(max.x.max(p.x), max.y.max(p.y));
        }
        Rect::from_corners(min, max)
    }

    /// Whether paired corners share their coordinates exactly, i.e. the quad
    /// is an axis-aligned rectangle in the fixed corner order.
    pub fn is_axis_aligned(&self) -> bool {
        (0..Self::SIZE).all(|i| {
            self.pt[i].y == self.pt[Self::horizontal_pair(i)].y
                && self.pt[i].x == self.pt[Self::vertical_pair(i)].x
        })
    }
}

impl Default for Quad {
    fn default() -> Self {
        Self::from_rect(Rect::UNIT)
    }
}

impl Index<usize> for Quad {
    type Output = Vec2;
    fn index(&self, corner: usize) -> &Vec2 {
        &self.pt[corner]
    }
}

impl IndexMut<usize> for Quad {
    fn index_mut(&mut self, corner: usize) -> &mut Vec2 {
        &mut self.pt[corner]
    }
}
