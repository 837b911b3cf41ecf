use geometry::{bounds::BBox, ray::Ray, sampling::uniform_sample_sphere, Interaction};
use math::hcm::{Point3, Vec3};
use shape::{Disk, Shape, Sphere, TriangleMesh};
use std::f32::consts::PI;

/// Shapes that can emit: points are drawn uniformly by surface area.
pub trait ShapeSample: Shape {
    /// Maps a uniform pair in [0, 1)^2 to a surface point with its normal.
    fn sample(&self, rnd2: (f32, f32)) -> Interaction;

    fn area(&self) -> f32;

    /// Density of `sample()` with respect to area; 0 for degenerate shapes.
    fn pdf_area(&self) -> f32 {
        match self.area() {
            a if a > 0.0 => a.recip(),
            _ => 0.0,
        }
    }
}

/// Shapes with a finite area, which can therefore carry an area light.
#[derive(Debug, Clone)]
pub enum SamplableShape {
    Sphere(Sphere),
    Disk(Disk),
    Mesh(TriangleMesh),
}

impl SamplableShape {
    fn as_dyn(&self) -> &dyn ShapeSample {
        match self {
            Self::Sphere(s) => s,
            Self::Disk(d) => d,
            Self::Mesh(m) => m,
        }
    }
}

impl Shape for SamplableShape {
    fn summary(&self) -> String {
        self.as_dyn().summary()
    }
    fn bbox(&self) -> BBox {
        self.as_dyn().bbox()
    }
    fn intersect(&self, r: &Ray) -> Option<Interaction> {
        self.as_dyn().intersect(r)
    }
    fn occludes(&self, r: &Ray) -> bool {
        self.as_dyn().occludes(r)
    }
}

impl ShapeSample for SamplableShape {
    fn sample(&self, rnd2: (f32, f32)) -> Interaction {
        self.as_dyn().sample(rnd2)
    }
    fn area(&self) -> f32 {
        self.as_dyn().area()
    }
}

impl From<Sphere> for SamplableShape {
    fn from(s: Sphere) -> Self {
        Self::Sphere(s)
    }
}
impl From<Disk> for SamplableShape {
    fn from(d: Disk) -> Self {
        Self::Disk(d)
    }
}
impl From<TriangleMesh> for SamplableShape {
    fn from(m: TriangleMesh) -> Self {
        Self::Mesh(m)
    }
}

impl ShapeSample for Sphere {
    fn sample(&self, rnd2: (f32, f32)) -> Interaction {
        let (normal, _) = uniform_sample_sphere(rnd2);
        Interaction::rayless(self.center() + normal * self.radius(), normal)
    }
    fn area(&self) -> f32 {
        Sphere::area(self)
    }
}

impl ShapeSample for Disk {
    /// Polar mapping with `r = R sqrt(u)`, which is uniform in area.
    fn sample(&self, (u, v): (f32, f32)) -> Interaction {
        let pos = self.point_at(self.radius() * u.sqrt(), 2.0 * PI * v);
        Interaction::rayless(pos, self.normal())
    }
    fn area(&self) -> f32 {
        Disk::area(self)
    }
}

impl ShapeSample for TriangleMesh {
    /// Picks a triangle by area with `u`, then reuses the rescaled `u` for the point inside it.
    fn sample(&self, (u, v): (f32, f32)) -> Interaction {
        let (index, u) = match self.pick_triangle(u) {
            Some(picked) => picked,
            None => return Interaction::rayless(Point3::ORIGIN, Vec3::Y),
        };
        let (p0, p1, p2) = self.triangle(index);
        let (e1, e2) = (p1 - p0, p2 - p0);
        let su = u.sqrt();
        let pos = p0 + e1 * (su * (1.0 - v)) + e2 * (su * v);
        let normal = e1.cross(e2).try_hat().unwrap_or(Vec3::Y);
        Interaction::rayless(pos, normal).with_dpdu(e1)
    }
    fn area(&self) -> f32 {
        TriangleMesh::area(self)
    }
}
