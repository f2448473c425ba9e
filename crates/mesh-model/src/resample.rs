//! Resampling of control grids into dense triangle meshes.

use crate::control_mesh::{ControlMesh, ControlPoint};
use crate::geom::Vec2;
use crate::render::RenderMesh;

/// Turns a sparse [`ControlMesh`] into a [`RenderMesh`] whose edges are no
/// longer than the requested minimum interval.
///
/// Each control column is split into as many sub-columns as its longest
/// horizontal edge needs, and likewise for rows, so neighbouring cells
/// share their boundary vertices.
///
/// Each axis is limited to [`MAX_AXIS_STEPS`] dense steps, spread over its
/// cells, so tiny intervals cannot overflow the `u32` index space.
#[derive(Debug, Clone, Copy, Default)]
pub struct Resampler;

/// Upper bound on dense steps along one axis.
pub const MAX_AXIS_STEPS: usize = 4096;

impl Resampler {
    pub fn new() -> Self {
        Self
    }

    pub fn proc(&self, mesh: &ControlMesh, min_interval: f32) -> RenderMesh {
        let cells = mesh.num_cells();
        let point = |c: usize, r: usize| at(mesh, c, r);
        let col_cap = (MAX_AXIS_STEPS / cells.cols.max(1)).max(1);
        let row_cap = (MAX_AXIS_STEPS / cells.rows.max(1)).max(1);

        let col_steps: Vec<usize> = (0..cells.cols)
            .map(|c| {
                let longest = (0..=cells.rows)
                    .map(|r| point(c, r).position.distance_to(point(c + 1, r).position))
                    .fold(0.0f32, f32::max);
                steps_for(longest, min_interval, col_cap)
            })
            .collect();
        let row_steps: Vec<usize> = (0..cells.rows)
            .map(|r| {
                let longest = (0..=cells.cols)
                    .map(|c| point(c, r).position.distance_to(point(c, r + 1).position))
                    .fold(0.0f32, f32::max);
                steps_for(longest, min_interval, row_cap)
            })
            .collect();

        // (cell index, fraction inside the cell) for every dense column/row.
        let xs = dense_axis(&col_steps);
        let ys = dense_axis(&row_steps);

        let mut out = RenderMesh::new();
        for &(r, v) in &ys {
            for &(c, u) in &xs {
                let (p00, p10, p01, p11) =
                    (point(c, r), point(c + 1, r), point(c, r + 1), point(c + 1, r + 1));
                let position = bilinear(p00.position, p10.position, p01.position, p11.position, u, v);
                let coord = bilinear(p00.coord, p10.coord, p01.coord, p11.coord, u, v);
                out.push_vertex(position, coord);
            }
        }

        let width = xs.len() as u32;
        for j in 0..ys.len() as u32 - 1 {
            for i in 0..width - 1 {
                let i00 = j * width + i;
                let i10 = i00 + 1;
                let i01 = i00 + width;
                let i11 = i01 + 1;
                out.push_triangle(i00, i10, i11);
                out.push_triangle(i00, i11, i01);
            }
        }

        tracing::trace!(
            vertices = out.num_vertices(),
            triangles = out.num_triangles(),
            "resampled control mesh"
        );
        out
    }
}

/// Grid indices here always come from the mesh's own bounds.
fn at(mesh: &ControlMesh, col: usize, row: usize) -> &ControlPoint {
    &mesh.points()[row * mesh.stride() + col]
}

fn steps_for(length: f32, min_interval: f32, cap: usize) -> usize {
    if min_interval.is_nan() || min_interval <= 0.0 || !length.is_finite() {
        return 1;
    }
    let wanted = (length / min_interval).ceil();
    if wanted >= cap as f32 {
        tracing::debug!(length, min_interval, cap, "clamped resample steps");
        return cap;
    }
    (wanted as usize).max(1)
}

fn dense_axis(steps: &[usize]) -> Vec<(usize, f32)> {
    let mut out = Vec::with_capacity(steps.iter().sum::<usize>() + 1);
    for (cell, &n) in steps.iter().enumerate() {
        for k in 0..n {
            out.push((cell, k as f32 / n as f32));
        }
    }
    out.push((steps.len() - 1, 1.0));
    out
}

fn bilinear(p00: Vec2, p10: Vec2, p01: Vec2, p11: Vec2, u: f32, v: f32) -> Vec2 {
    Vec2::lerp(Vec2::lerp(p00, p10, u), Vec2::lerp(p01, p11, u), v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control_mesh::GridSize;
    use crate::geom::Rect;

    #[test]
    fn test_single_cell_without_subdivision() {
        let mesh = ControlMesh::new(GridSize::new(1, 1), Rect::new(0.0, 0.0, 10.0, 10.0), Rect::UNIT);
        let out = Resampler::new().proc(&mesh, 100.0);
        assert_eq!(out.num_vertices(), 4);
        assert_eq!(out.num_triangles(), 2);
        assert_eq!(out.vertices[3], Vec2::new(10.0, 10.0));
        assert_eq!(out.texcoords[3], Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_min_interval_controls_density() {
        let mesh = ControlMesh::new(GridSize::new(2, 1), Rect::new(0.0, 0.0, 100.0, 30.0), Rect::UNIT);
        let out = Resampler::new().proc(&mesh, 10.0);
        // 5 + 5 sub-columns, 3 sub-rows
        assert_eq!(out.num_vertices(), 11 * 4);
        assert_eq!(out.num_triangles(), 10 * 3 * 2);
        for w in out.vertices.windows(2).take(10) {
            assert!(w[0].distance_to(w[1]) <= 10.0 + 1e-4);
        }
    }

    #[test]
    fn test_zero_interval_falls_back_to_grid() {
        let mesh = ControlMesh::new(GridSize::new(3, 2), Rect::new(0.0, 0.0, 30.0, 20.0), Rect::UNIT);
        let out = Resampler::new().proc(&mesh, 0.0);
        assert_eq!(out.num_vertices(), 12);
        assert_eq!(out.num_triangles(), 12);
    }

    #[test]
    fn test_tiny_interval_is_clamped() {
        assert_eq!(steps_for(1000.0, 1e-6, 2048), 2048);
        assert_eq!(steps_for(1000.0, 100.0, 2048), 10);
        assert_eq!(steps_for(f32::INFINITY, 1.0, 2048), 1);
    }
}
