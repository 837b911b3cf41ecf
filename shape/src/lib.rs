mod mesh;
mod simple;

use geometry::bounds::BBox;
use geometry::interaction::Interaction;
use geometry::ray::Ray;

pub use mesh::TriangleMesh;
pub use simple::{Disk, Plane, Sphere};

/// Represents the characteristics of a shape: has a bounding box, and can interact with a ray.
/// - See `simple.rs` for the analytic shapes: `Plane`, `Disk` and `Sphere`.
/// - See `mesh.rs` for `TriangleMesh`.
///
/// Intersections report the geometric normal of the surface, regardless of which side the ray
/// comes from. Callers flip it when they need the side facing the ray.
pub trait Shape: Send + Sync {
    fn summary(&self) -> String;
    fn bbox(&self) -> BBox;
    fn intersect(&self, r: &Ray) -> Option<Interaction>;
    fn occludes(&self, r: &Ray) -> bool {
        self.intersect(r).is_some()
    }
}

/// Closed set of shapes a scene object can be made of.
#[derive(Debug, Clone)]
pub enum ShapeKind {
    Plane(Plane),
    Disk(Disk),
    Sphere(Sphere),
    Mesh(TriangleMesh),
}

macro_rules! impl_shape_kind_method {
    ($method_name: ident, $return_type: ty) => {
        fn $method_name(&self) -> $return_type {
            match self {
                Self::Plane(p) => p.$method_name(),
                Self::Disk(d) => d.$method_name(),
                Self::Sphere(s) => s.$method_name(),
                Self::Mesh(m) => m.$method_name(),
            }
        }
    };
    ($method_name:ident, {$($arg_name:ident : $type:ty),+}, $return_type:ty) => {
        fn $method_name(&self, $($arg_name: $type),+) -> $return_type {
            match self {
                Self::Plane(p) => p.$method_name($($arg_name),+),
                Self::Disk(d) => d.$method_name($($arg_name),+),
                Self::Sphere(s) => s.$method_name($($arg_name),+),
                Self::Mesh(m) => m.$method_name($($arg_name),+),
            }
        }
    };
}

impl Shape for ShapeKind {
    impl_shape_kind_method!(summary, String);
    impl_shape_kind_method!(bbox, BBox);
    impl_shape_kind_method!(intersect, { r: &Ray }, Option<Interaction>);
    impl_shape_kind_method!(occludes, { r: &Ray }, bool);
}

impl From<Plane> for ShapeKind {
    fn from(p: Plane) -> Self {
        Self::Plane(p)
    }
}
impl From<Disk> for ShapeKind {
    fn from(d: Disk) -> Self {
        Self::Disk(d)
    }
}
impl From<Sphere> for ShapeKind {
    fn from(s: Sphere) -> Self {
        Self::Sphere(s)
    }
}
impl From<TriangleMesh> for ShapeKind {
    fn from(m: TriangleMesh) -> Self {
        Self::Mesh(m)
    }
}
