/// Defines the `BBox` bounding-box type.
pub mod bounds;
/// Pinhole camera producing anti-aliased primary rays.
pub mod camera;
pub mod ray;
/// Material models: diffuse, glossy, Phong mixture and Fresnel-weighted specular.
pub mod bxdf;
/// Random streams and hemisphere / sphere direction samplers.
pub mod sampling;
pub mod transform;
pub mod interaction;

pub use interaction::Interaction;
pub use transform::{AffineTransform, Transform, TransformError};
