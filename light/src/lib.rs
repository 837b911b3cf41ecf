mod sample_shape;

use enum_dispatch::enum_dispatch;
use geometry::sampling::{cos_sample_hemisphere, uniform_sample_sphere};
use geometry::Interaction;
use math::hcm::{Point3, Vec3};
use radiometry::color::Color;
use std::f32::consts::PI;

pub use sample_shape::{SamplableShape, ShapeSample};

/// A point sampled on a light for next-event estimation, as seen from a shading point.
/// - `pdf` is a solid-angle density at the shading point for area lights, and 1 for point lights.
/// - `radiance` is the unoccluded radiance arriving at the shading point.
#[derive(Debug, Clone, Copy)]
pub struct IncidentSample {
    pub point: Interaction,
    pub pdf: f32,
    pub radiance: Color,
}

/// A ray of light leaving an emitter, used to start photon paths. The initial photon weight is
/// `radiance * |cos| / (pdf_pos * pdf_dir)`.
#[derive(Debug, Clone, Copy)]
pub struct EmissionSample {
    pub origin: Interaction,
    pub dir: Vec3,
    pub pdf_pos: f32,
    pub pdf_dir: f32,
    pub radiance: Color,
}

impl EmissionSample {
    /// Initial throughput of a photon path started by this sample. Black if either density is
    /// zero.
    pub fn throughput(&self) -> Color {
        let pdf = self.pdf_pos * self.pdf_dir;
        if pdf > 0.0 {
            self.radiance * (self.origin.normal.dot(self.dir).abs() / pdf)
        } else {
            Color::black()
        }
    }
}

#[enum_dispatch]
pub trait Light {
    /// Samples a point on the light towards the shading point `target`, consuming a 2D uniform
    /// random variable. Occlusion is not considered.
    fn sample_li(&self, target: &Interaction, rnd2: (f32, f32)) -> IncidentSample;

    /// Samples a ray leaving the light: `rnd2_pos` picks the origin and `rnd2_dir` the direction.
    fn sample_le(&self, rnd2_pos: (f32, f32), rnd2_dir: (f32, f32)) -> EmissionSample;

    /// Radiance emitted from `light_point` on the light's surface in direction `w`.
    fn radiance_from(&self, light_point: &Interaction, w: Vec3) -> Color;

    /// Total emitted power.
    fn power(&self) -> Color;
}

// Various kinds of lights.

/// Isotropic point light. It can't be hit by rays, so it only contributes through `sample_li`.
#[derive(Debug, Clone, Copy)]
pub struct PointLight {
    position: Point3,
    intensity: Color,
}

impl PointLight {
    pub fn new(position: Point3, intensity: Color) -> Self {
        Self {
            position,
            intensity,
        }
    }
    pub fn position(&self) -> Point3 {
        self.position
    }
}

impl Light for PointLight {
    fn sample_li(&self, target: &Interaction, _rnd2: (f32, f32)) -> IncidentSample {
        let to_light = self.position - target.pos;
        let dist2 = to_light.norm_squared();
        let radiance = if dist2 > 0.0 {
            self.intensity / dist2
        } else {
            Color::black()
        };
        IncidentSample {
            point: Interaction::rayless(self.position, -to_light),
            pdf: 1.0,
            radiance,
        }
    }

    fn sample_le(&self, _rnd2_pos: (f32, f32), rnd2_dir: (f32, f32)) -> EmissionSample {
        let (dir, pdf_dir) = uniform_sample_sphere(rnd2_dir);
        EmissionSample {
            origin: Interaction::rayless(self.position, dir),
            dir,
            pdf_pos: 1.0,
            pdf_dir,
            radiance: self.intensity,
        }
    }

    fn radiance_from(&self, _light_point: &Interaction, _w: Vec3) -> Color {
        Color::black()
    }

    fn power(&self) -> Color {
        self.intensity * 4.0 * PI
    }
}

/// Implements a basic area light source with a uniform spatial and directional radiance
/// distribution. Owns a `shape` that defines its surface, and emits only on the side its normal
/// points to.
#[derive(Debug, Clone)]
pub struct DiffuseAreaLight {
    emit_radiance: Color,
    shape: SamplableShape,
    area: f32,
}

impl DiffuseAreaLight {
    pub fn new(emit_radiance: Color, shape: SamplableShape) -> Self {
        let area = shape.area();
        Self {
            emit_radiance,
            shape,
            area,
        }
    }

    pub fn shape(&self) -> &SamplableShape {
        &self.shape
    }
}

impl Light for DiffuseAreaLight {
    /// Samples the shape uniformly by area and converts the density into solid angle at `target`:
    /// `pdf = dist^2 / (|cos| * area)`.
    fn sample_li(&self, target: &Interaction, rnd2: (f32, f32)) -> IncidentSample {
        let point = self.shape.sample(rnd2);
        let to_light = point.pos - target.pos;
        let dist2 = to_light.norm_squared();
        let abs_cos = match to_light.try_hat() {
            Some(wi) => point.normal.dot(wi).abs(),
            None => 0.0,
        };
        let pdf = if abs_cos > 0.0 && self.area > 0.0 {
            dist2 / (abs_cos * self.area)
        } else {
            0.0
        };
        IncidentSample {
            point,
            pdf,
            radiance: self.radiance_from(&point, -to_light),
        }
    }

    fn sample_le(&self, rnd2_pos: (f32, f32), rnd2_dir: (f32, f32)) -> EmissionSample {
        let origin = self.shape.sample(rnd2_pos);
        let (dir_local, pdf_dir) = cos_sample_hemisphere(rnd2_dir);
        EmissionSample {
            origin,
            dir: origin.local_to_world(dir_local),
            pdf_pos: self.shape.pdf_area(),
            pdf_dir,
            radiance: self.emit_radiance,
        }
    }

    fn radiance_from(&self, light_point: &Interaction, w: Vec3) -> Color {
        if light_point.normal.dot(w) > 0.0 {
            self.emit_radiance
        } else {
            Color::black()
        }
    }

    fn power(&self) -> Color {
        self.emit_radiance * self.area * PI
    }
}

/// Closed set of lights a scene can hold.
#[enum_dispatch(Light)]
#[derive(Debug, Clone)]
pub enum LightSource {
    Point(PointLight),
    Area(DiffuseAreaLight),
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn point_light_falls_off_with_square_distance() {
        let light = PointLight::new(Point3::new(0.0, 4.0, 0.0), Color::gray(16.0));
        let near = Interaction::rayless(Point3::new(0.0, 2.0, 0.0), Vec3::Y);
        let far = Interaction::rayless(Point3::ORIGIN, Vec3::Y);
        let s_near = light.sample_li(&near, (0.5, 0.5));
        let s_far = light.sample_li(&far, (0.5, 0.5));
        assert_eq!(s_near.pdf, 1.0);
        assert_eq!(s_near.radiance, Color::gray(4.0));
        assert_eq!(s_far.radiance, Color::gray(1.0));
        assert_eq!(s_far.point.pos, light.position());
    }

    #[test]
    fn emitted_photons_carry_light_power() {
        let light = PointLight::new(Point3::ORIGIN, Color::gray(2.0));
        let emitted = light.sample_le((0.1, 0.2), (0.3, 0.4));
        let weight = emitted.throughput();
        assert!((weight.r - light.power().r).abs() < 1e-3);
    }
}
