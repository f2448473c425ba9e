//! Dense triangle meshes produced for rendering and file export.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::geom::Vec2;

/// RGBA in `[0, 1]`.
pub type Color = [f32; 4];

pub const WHITE: Color = [1.0, 1.0, 1.0, 1.0];

/// An indexed triangle list with per-vertex texture coordinates and
/// optional per-vertex colors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderMesh {
    pub vertices: Vec<Vec2>,
    pub texcoords: Vec<Vec2>,
    /// Either empty or one entry per vertex.
    pub colors: Vec<Color>,
    /// Three indices per triangle.
    pub indices: Vec<u32>,
}

impl RenderMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn has_colors(&self) -> bool {
        !self.colors.is_empty()
    }

    pub fn push_vertex(&mut self, position: Vec2, texcoord: Vec2) -> u32 {
        self.vertices.push(position);
        self.texcoords.push(texcoord);
        (self.vertices.len() - 1) as u32
    }

    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Append `other`, offsetting its indices. If only one side carries
    /// colors the other side is filled with white.
    pub fn append(&mut self, other: RenderMesh) {
        let offset = self.vertices.len() as u32;
        if self.has_colors() || other.has_colors() {
            self.colors.resize(self.vertices.len(), WHITE);
            if other.has_colors() {
                self.colors.extend(other.colors);
            } else {
                self.colors
                    .extend(std::iter::repeat(WHITE).take(other.vertices.len()));
            }
        }
        self.vertices.extend(other.vertices);
        self.texcoords.extend(other.texcoords);
        self.indices.extend(other.indices.into_iter().map(|i| i + offset));
    }

    /// Multiply every vertex color by `tint`, adding colors if absent.
    pub fn tint(&mut self, tint: Color) {
        self.colors.resize(self.vertices.len(), WHITE);
        for c in &mut self.colors {
            for (ch, t) in c.iter_mut().zip(tint) {
                *ch *= t;
            }
        }
    }

    /// Write an ASCII PLY file with `x y z`, `s t` and, when present,
    /// `red green blue alpha` vertex properties.
    pub fn save_ply(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let file = File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);
        self.write_ply(&mut writer)?;
        writer.flush()
    }

    pub fn write_ply<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer, "ply")?;
        writeln!(writer, "format ascii 1.0")?;
        writeln!(writer, "comment Generated by quadwarp")?;
        writeln!(writer, "element vertex {}", self.vertices.len())?;
        writeln!(writer, "property float x")?;
        writeln!(writer, "property float y")?;
        writeln!(writer, "property float z")?;
        writeln!(writer, "property float s")?;
        writeln!(writer, "property float t")?;
        if self.has_colors() {
            writeln!(writer, "property uchar red")?;
            writeln!(writer, "property uchar green")?;
            writeln!(writer, "property uchar blue")?;
            writeln!(writer, "property uchar alpha")?;
        }
        writeln!(writer, "element face {}", self.num_triangles())?;
        writeln!(writer, "property list uchar int vertex_indices")?;
        writeln!(writer, "end_header")?;

        for (i, (v, t)) in self.vertices.iter().zip(&self.texcoords).enumerate() {
            write!(writer, "{} {} 0 {} {}", v.x, v.y, t.x, t.y)?;
            if let Some(c) = self.colors.get(i) {
                let [r, g, b, a] = c.map(|ch| (ch.clamp(0.0, 1.0) * 255.0).round() as u8);
                write!(writer, " {r} {g} {b} {a}")?;
            }
            writeln!(writer)?;
        }

        for f in self.indices.chunks_exact(3) {
            writeln!(writer, "3 {} {} {}", f[0], f[1], f[2])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle(offset: f32) -> RenderMesh {
        let mut m = RenderMesh::new();
        let a = m.push_vertex(Vec2::new(offset, 0.0), Vec2::new(0.0, 0.0));
        let b = m.push_vertex(Vec2::new(offset + 1.0, 0.0), Vec2::new(1.0, 0.0));
        let c = m.push_vertex(Vec2::new(offset, 1.0), Vec2::new(0.0, 1.0));
        m.push_triangle(a, b, c);
        m
    }

    #[test]
    fn test_append_offsets_indices() {
        let mut m = triangle(0.0);
        m.append(triangle(5.0));
        assert_eq!(m.num_vertices(), 6);
        assert_eq!(m.indices, vec![0, 1, 2, 3, 4, 5]);
        assert!(!m.has_colors());
    }

    #[test]
    fn test_append_fills_missing_colors() {
        let mut colored = triangle(0.0);
        colored.tint([1.0, 0.0, 0.0, 0.5]);
        let mut m = triangle(0.0);
        m.append(colored);
        assert_eq!(m.colors.len(), 6);
        assert_eq!(m.colors[0], WHITE);
        assert_eq!(m.colors[5], [1.0, 0.0, 0.0, 0.5]);
    }

    #[test]
    fn test_write_ply() {
        let m = triangle(0.0);
        let mut out = Vec::new();
        m.write_ply(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("ply\nformat ascii 1.0\n"));
        assert!(text.contains("element vertex 3\n"));
        assert!(text.contains("element face 1\n"));
        assert!(text.contains("1 0 0 1 0\n"));
        assert!(text.trim_end().ends_with("3 0 1 2"));
        assert!(!text.contains("alpha"));
    }
}
