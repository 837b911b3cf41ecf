use crate::{Interaction, Shape};
use geometry::bounds::BBox;
use geometry::ray::Ray;
use geometry::{AffineTransform, Transform};
use math::hcm::Point3;

/// Triangles with `|det|` below this are parallel to the ray, or degenerate.
const DETERMINANT_EPSILON: f32 = 1e-4;

/// Indexed triangle soup in world space. Each triangle's geometric normal is `e1 x e2`, where
/// `e1 = p1 - p0` and `e2 = p2 - p0`.
///
/// The mesh keeps a cumulative-area table so points can be drawn uniformly over its surface.
#[derive(Debug, Clone)]
pub struct TriangleMesh {
    positions: Vec<Point3>,
    triangles: Vec<[usize; 3]>,
    area_cdf: Vec<f32>,
    area: f32,
}

impl TriangleMesh {
    /// Builds a mesh from vertices in local space and a flat list of vertex-index triplets.
    /// Trailing indices that don't form a whole triangle are ignored.
    pub fn new(local_to_world: &AffineTransform, vertices: &[Point3], indices: &[usize]) -> Self {
        let positions = vertices
            .iter()
            .map(|p| local_to_world.apply(*p))
            .collect::<Vec<_>>();
        let triangles = indices
            .chunks_exact(3)
            .map(|ijk| [ijk[0], ijk[1], ijk[2]])
            .collect::<Vec<_>>();

        let mut mesh = Self {
            positions,
            triangles,
            area_cdf: vec![],
            area: 0.0,
        };
        let mut running_area = 0.0;
        for i in 0..mesh.triangles.len() {
            running_area += mesh.triangle_area(i);
            mesh.area_cdf.push(running_area);
        }
        mesh.area = running_area;
        mesh
    }

    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    pub fn triangle(&self, index: usize) -> (Point3, Point3, Point3) {
        let [i, j, k] = self.triangles[index];
        (self.positions[i], self.positions[j], self.positions[k])
    }

    pub fn triangle_area(&self, index: usize) -> f32 {
        let (p0, p1, p2) = self.triangle(index);
        (p1 - p0).cross(p2 - p0).norm() * 0.5
    }

    /// Total surface area.
    pub fn area(&self) -> f32 {
        self.area
    }

    /// Picks a triangle with probability proportional to its area, using `u` in [0, 1).
    /// Returns the triangle index and `u` rescaled to [0, 1) within the picked triangle's share,
    /// so it can be reused as a fresh uniform variable.
    pub fn pick_triangle(&self, u: f32) -> Option<(usize, f32)> {
        if self.triangles.is_empty() || self.area <= 0.0 {
            return None;
        }
        let target = u * self.area;
        let index = self
            .area_cdf
            .partition_point(|&cdf| cdf <= target)
            .min(self.triangles.len() - 1);
        let low = if index == 0 { 0.0 } else { self.area_cdf[index - 1] };
        let share = self.area_cdf[index] - low;
        let remapped = if share > 0.0 {
            ((target - low) / share).clamp(0.0, math::float::ONE_MINUS_EPSILON)
        } else {
            0.0
        };
        Some((index, remapped))
    }

    /// Moller-Trumbore ray-triangle intersection.
    fn intersect_triangle(&self, index: usize, r: &Ray) -> Option<Interaction> {
        let (p0, p1, p2) = self.triangle(index);
        let (e1, e2) = (p1 - p0, p2 - p0);
        let q = r.dir.cross(e2);
        let det = e1.dot(q);
        if det.abs() < DETERMINANT_EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;
        let s = r.origin - p0;
        let u = inv_det * s.dot(q);
        if u < 0.0 {
            return None;
        }
        let sxe1 = s.cross(e1);
        let v = inv_det * r.dir.dot(sxe1);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }
        let t = r.truncated_t(inv_det * e2.dot(sxe1))?;
        let normal = e1.cross(e2).try_hat()?;
        Some(Interaction::new(r.position_at(t), t, normal).with_dpdu(e1))
    }
}

impl Shape for TriangleMesh {
    fn summary(&self) -> String {
        format!(
            "TriangleMesh{{ {} triangles, area = {:.2}, bounded by {} }}",
            self.triangles.len(),
            self.area,
            self.bbox()
        )
    }
    fn bbox(&self) -> BBox {
        self.positions
            .iter()
            .fold(BBox::empty(), |b, p| b.enclose(*p))
    }
    fn intersect(&self, r: &Ray) -> Option<Interaction> {
        let mut ray = *r;
        let mut nearest = None;
        for index in 0..self.triangles.len() {
            if let Some(hit) = self.intersect_triangle(index, &ray) {
                ray.t_max = hit.ray_t;
                nearest = Some(hit);
            }
        }
        nearest
    }
    fn occludes(&self, r: &Ray) -> bool {
        (0..self.triangles.len()).any(|index| self.intersect_triangle(index, r).is_some())
    }
}
