//! 2D point and rectangle primitives.
//!
//! Coordinates are `f32` throughout because that is what the data file
//! stores. Texture-space values are in pixels unless a caller normalizes
//! them with a scale.

use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// A 2D point or displacement.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };
    pub const ONE: Vec2 = Vec2 { x: 1.0, y: 1.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: Vec2) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// Component-wise product.
    pub fn scale(self, factor: Vec2) -> Vec2 {
        Vec2::new(self.x * factor.x, self.y * factor.y)
    }

    /// Component-wise quotient.
    pub fn unscale(self, factor: Vec2) -> Vec2 {
        Vec2::new(self.x / factor.x, self.y / factor.y)
    }

    /// Linear interpolation between two points. `t` is not clamped.
    pub fn lerp(a: Vec2, b: Vec2, t: f32) -> Vec2 {
        Vec2::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
    }

    /// 2D cross product (z component of the 3D cross).
    pub fn cross(self, other: Vec2) -> f32 {
        self.x * other.y - self.y * other.x
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Vec2) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl From<(f32, f32)> for Vec2 {
    fn from((x, y): (f32, f32)) -> Self {
        Vec2::new(x, y)
    }
}

/// An axis-aligned rectangle: `(x, y)` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    /// The unit rectangle `(0, 0, 1, 1)`.
    pub const UNIT: Rect = Rect {
        x: 0.0,
        y: 0.0,
        w: 1.0,
        h: 1.0,
    };

    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Right edge.
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// The center point of this rectangle.
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Check if a point is within this rectangle (edges inclusive).
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Map a normalized `(u, v)` in `[0, 1]^2` to a point inside the rectangle.
    pub fn point_at(&self, uv: Vec2) -> Vec2 {
        Vec2::new(self.x + self.w * uv.x, self.y + self.h * uv.y)
    }

    /// Inverse of [`Rect::point_at`]. Degenerate axes map to 0.
    pub fn normalize(&self, p: Vec2) -> Vec2 {
        let u = if self.w != 0.0 { (p.x - self.x) / self.w } else { 0.0 };
        let v = if self.h != 0.0 { (p.y - self.y) / self.h } else { 0.0 };
        Vec2::new(u, v)
    }

    /// Smallest rectangle spanning two points.
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        Self::new(x, y, (a.x - b.x).abs(), (a.y - b.y).abs())
    }
}

impl Default for Rect {
    fn default() -> Self {
        Self::UNIT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec2_ops() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(3.0, -1.0);
        assert_eq!(a + b, Vec2::new(4.0, 1.0));
        assert_eq!(a - b, Vec2::new(-2.0, 3.0));
        assert_eq!(a.scale(Vec2::new(2.0, 0.5)), Vec2::new(2.0, 1.0));
        assert_eq!(a.scale(b).unscale(b), a);
    }

    #[test]
    fn test_distance() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(3.0, 4.0);
        assert!((a.distance_to(b) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_rect_point_at_and_normalize() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0);
        let p = r.point_at(Vec2::new(0.5, 0.5));
        assert_eq!(p, Vec2::new(60.0, 45.0));
        assert_eq!(r.normalize(p), Vec2::new(0.5, 0.5));
        assert_eq!(r.center(), p);
        assert!(r.contains(p));
        assert!(!r.contains(Vec2::new(0.0, 0.0)));
    }

    #[test]
    fn test_rect_from_corners() {
        let r = Rect::from_corners(Vec2::new(5.0, 1.0), Vec2::new(1.0, 4.0));
        assert_eq!(r, Rect::new(1.0, 1.0, 4.0, 3.0));
    }

    #[test]
    fn test_degenerate_normalize() {
        let r = Rect::new(0.0, 0.0, 0.0, 2.0);
        assert_eq!(r.normalize(Vec2::new(3.0, 1.0)), Vec2::new(0.0, 0.5));
    }
}
