//! Mesh and bounding volume types
//!
//! Pure data structures with minimal behavior. Meshes are owned by the host
//! scene and shared read-only between render objects.

use serde::{Serialize, Deserialize};
use crate::error::{RenderError, Result};
use crate::rasterizer::{Mat4, Vec2, Vec3, Vertex};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for Aabb {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::ZERO)
    }
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box that contains nothing; expanding it by a point yields that point
    pub fn empty() -> Self {
        Self::new(
            Vec3::new(f32::MAX, f32::MAX, f32::MAX),
            Vec3::new(f32::MIN, f32::MIN, f32::MIN),
        )
    }

    pub fn from_points<I: IntoIterator<Item = Vec3>>(points: I) -> Self {
        let mut b = Self::empty();
        let mut any = false;
        for p in points {
            b.expand(p);
            any = true;
        }
        if any { b } else { Self::default() }
    }

    /// Check if a point is inside the box
    pub fn contains(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x
            && point.y >= self.min.y && point.y <= self.max.y
            && point.z >= self.min.z && point.z <= self.max.z
    }

    /// Expand bounds to include a point
    pub fn expand(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Get center of the box
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(b.x, b.y, a.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(a.x, b.y, b.z),
            Vec3::new(b.x, b.y, b.z),
        ]
    }

    /// World-space box enclosing this box after `m`
    pub fn transformed(&self, m: &Mat4) -> Aabb {
        Aabb::from_points(self.corners().map(|c| m.transform_point(c)))
    }
}

/// Indexed triangle mesh. Indices are checked once on construction and the
/// mesh is read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    triangles: Vec<[usize; 3]>,
    bounds: Aabb,
}

impl Mesh {
    /// Build from the separate attribute arrays a scene hands over.
    ///
    /// `indices` is a flat list, three entries per triangle.
    pub fn from_arrays(
        positions: &[Vec3],
        normals: &[Vec3],
        uvs: &[Vec2],
        indices: &[usize],
    ) -> Result<Self> {
        if normals.len() != positions.len() || uvs.len() != positions.len() {
            return Err(RenderError::AttributeMismatch {
                positions: positions.len(),
                normals: normals.len(),
                uvs: uvs.len(),
            });
        }
        if indices.len() % 3 != 0 {
            return Err(RenderError::RaggedIndices(indices.len()));
        }

        let vertices = positions
            .iter()
            .zip(normals)
            .zip(uvs)
            .map(|((&p, &n), &uv)| Vertex::new(p, uv, n))
            .collect();
        let triangles = indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]]).collect();

        Self::new(vertices, triangles)
    }

    pub fn new(vertices: Vec<Vertex>, triangles: Vec<[usize; 3]>) -> Result<Self> {
        for (i, tri) in triangles.iter().enumerate() {
            if let Some(&bad) = tri.iter().find(|&&idx| idx >= vertices.len()) {
                return Err(RenderError::IndexOutOfRange {
                    triangle: i,
                    index: bad,
                    vertex_count: vertices.len(),
                });
            }
        }
        if triangles.is_empty() {
            log::warn!("mesh with {} vertices has no triangles", vertices.len());
        }

        let bounds = Aabb::from_points(vertices.iter().map(|v| v.pos));
        Ok(Self { vertices, triangles, bounds })
    }

    /// Model-space bounds
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn iter_triangles(&self) -> impl Iterator<Item = [Vertex; 3]> + '_ {
        self.triangles.iter().map(move |t| t.map(|idx| self.vertices[idx]))
    }

    /// Unit quad in the XY plane facing +Z, counter-clockwise
    pub fn quad(half_width: f32, half_height: f32) -> Self {
        let n = Vec3::new(0.0, 0.0, 1.0);
        let vertices = vec![
            Vertex::new(Vec3::new(-half_width, -half_height, 0.0), Vec2::new(0.0, 0.0), n),
            Vertex::new(Vec3::new(half_width, -half_height, 0.0), Vec2::new(1.0, 0.0), n),
            Vertex::new(Vec3::new(half_width, half_height, 0.0), Vec2::new(1.0, 1.0), n),
            Vertex::new(Vec3::new(-half_width, half_height, 0.0), Vec2::new(0.0, 1.0), n),
        ];
        let bounds = Aabb::from_points(vertices.iter().map(|v| v.pos));
        Self {
            vertices,
            triangles: vec![[0, 1, 2], [0, 2, 3]],
            bounds,
        }
    }

    /// Cube from -1 to 1 with per-face normals, counter-clockwise outside
    pub fn cube() -> Self {
        let mut vertices = Vec::with_capacity(24);
        let mut triangles = Vec::with_capacity(12);

        // (normal, right, up) per face; corners are normal +- right +- up
        let faces = [
            (Vec3::new(0.0, 0.0, 1.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)),
            (Vec3::new(0.0, 0.0, -1.0), Vec3::new(-1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)),
            (Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0)),
            (Vec3::new(0.0, -1.0, 0.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0)),
            (Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0), Vec3::new(0.0, 1.0, 0.0)),
            (Vec3::new(-1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 1.0, 0.0)),
        ];

        let uvs = [
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ];

        for (normal, right, up) in faces {
            let base = vertices.len();
            let corners = [
                normal - right - up,
                normal + right - up,
                normal + right + up,
                normal - right + up,
            ];
            for (pos, uv) in corners.into_iter().zip(uvs) {
                vertices.push(Vertex::new(pos, uv, normal));
            }
            triangles.push([base, base + 1, base + 2]);
            triangles.push([base, base + 2, base + 3]);
        }

        let bounds = Aabb::from_points(vertices.iter().map(|v| v.pos));
        Self { vertices, triangles, bounds }
    }
}
