use geometry::bounds::BBox;
use geometry::ray::Ray;
use geometry::{AffineTransform, Transform};
use math::hcm::{Point3, Vec3};
use std::f32::consts::PI;

use crate::{Interaction, Shape};

/// Rays closer to parallel than this with a plane are treated as missing it.
const PARALLEL_COSINE: f32 = 1e-4;

/// Solves the ray-plane equation `(o + td - point) dot normal = 0`.
fn plane_hit_t(point: Point3, normal: Vec3, r: &Ray) -> Option<f32> {
    let den = normal.dot(r.dir);
    if den.abs() <= PARALLEL_COSINE {
        return None;
    }
    r.truncated_t((point - r.origin).dot(normal) / den)
}

/// Infinite plane through the local origin, normal to local +Y.
#[derive(Debug, Clone)]
pub struct Plane {
    point: Point3,
    normal: Vec3,
    tangent: Vec3,
}

impl Plane {
    pub fn new(local_to_world: &AffineTransform) -> Self {
        Self {
            point: local_to_world.apply(Point3::ORIGIN),
            normal: local_to_world.apply_normal(Vec3::Y).hat(),
            tangent: local_to_world.apply(Vec3::X),
        }
    }
    pub fn point(&self) -> Point3 {
        self.point
    }
    pub fn normal(&self) -> Vec3 {
        self.normal
    }
}

impl Shape for Plane {
    fn summary(&self) -> String {
        format!("Plane{{ {}, normal = {} }}", self.point, self.normal)
    }
    fn bbox(&self) -> BBox {
        let inf = f32::INFINITY;
        BBox::new(Point3::new(-inf, -inf, -inf), Point3::new(inf, inf, inf))
    }
    fn intersect(&self, r: &Ray) -> Option<Interaction> {
        let t = plane_hit_t(self.point, self.normal, r)?;
        Some(Interaction::new(r.position_at(t), t, self.normal).with_dpdu(self.tangent))
    }
}

/// Disk in the local XZ-plane, centered at the origin and facing +Y.
#[derive(Debug, Clone)]
pub struct Disk {
    center: Point3,
    normal: Vec3,
    radial_x: Vec3,
    radial_z: Vec3,
    radius: f32,
}

impl Disk {
    pub fn new(local_to_world: &AffineTransform, radius: f32) -> Self {
        let normal = local_to_world.apply_normal(Vec3::Y).hat();
        let radial_x = local_to_world.apply(Vec3::X).hat();
        Self {
            center: local_to_world.apply(Point3::ORIGIN),
            normal,
            radial_x,
            radial_z: radial_x.cross(normal),
            radius,
        }
    }
    pub fn center(&self) -> Point3 {
        self.center
    }
    pub fn normal(&self) -> Vec3 {
        self.normal
    }
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Maps polar coordinates on the disk onto the surface in world space.
    pub fn point_at(&self, r: f32, theta: f32) -> Point3 {
        self.center + self.radial_x * (r * theta.cos()) + self.radial_z * (r * theta.sin())
    }

    pub fn area(&self) -> f32 {
        PI * self.radius * self.radius
    }
}

impl Shape for Disk {
    fn summary(&self) -> String {
        format!(
            "Disk{{ {}, normal = {}, radius = {} }}",
            self.center, self.normal, self.radius
        )
    }
    fn bbox(&self) -> BBox {
        let (u, v) = (self.radial_x * self.radius, self.radial_z * self.radius);
        BBox::new(self.center + u + v, self.center + u - v)
            .merge(BBox::new(self.center - u - v, self.center - u + v))
    }
    fn intersect(&self, r: &Ray) -> Option<Interaction> {
        let t = plane_hit_t(self.center, self.normal, r)?;
        let pos = r.position_at(t);
        (pos.squared_distance_to(self.center) <= self.radius * self.radius)
            .then(|| Interaction::new(pos, t, self.normal).with_dpdu(self.radial_x))
    }
}

/// Sphere around the local origin. Only the translation of its transform matters.
#[derive(Debug, Clone, Copy)]
pub struct Sphere {
    center: Point3,
    radius: f32,
}

impl Sphere {
    pub fn new(local_to_world: &AffineTransform, radius: f32) -> Sphere {
        Sphere {
            center: local_to_world.apply(Point3::ORIGIN),
            radius,
        }
    }
    pub fn center(&self) -> Point3 {
        self.center
    }
    pub fn radius(&self) -> f32 {
        self.radius
    }
    pub fn area(&self) -> f32 {
        4.0 * PI * self.radius * self.radius
    }
}

impl Shape for Sphere {
    fn summary(&self) -> String {
        format!("Sphere{{ {}, radius = {} }}", self.center, self.radius)
    }
    fn bbox(&self) -> BBox {
        let r = Vec3::new(self.radius, self.radius, self.radius);
        BBox::new(self.center - r, self.center + r)
    }
    fn intersect(&self, r: &Ray) -> Option<Interaction> {
        // Measures from the point of the ray closest to the center, which keeps the roots
        // accurate for spheres far from the ray origin.
        let to_origin = r.origin - self.center;
        let a = r.dir.norm_squared();
        let t_mid = -to_origin.dot(r.dir) / a;
        let miss_distance2 = (to_origin + r.dir * t_mid).norm_squared();
        let half_chord2 = (self.radius * self.radius - miss_distance2) / a;
        if half_chord2 < 0.0 {
            return None;
        }
        let half_chord = half_chord2.sqrt();
        let ray_t = r
            .truncated_t(t_mid - half_chord)
            .or_else(|| r.truncated_t(t_mid + half_chord))?;

        let pos = r.position_at(ray_t);
        let normal = (pos - self.center).hat();
        let dpdu = Vec3::Z.cross(normal).try_hat().unwrap_or(Vec3::X);
        Some(Interaction::new(pos, ray_t, normal).with_dpdu(dpdu))
    }
}
