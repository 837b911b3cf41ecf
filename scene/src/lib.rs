pub mod preset;

use geometry::bounds::BBox;
use geometry::bxdf::{Bsdf, BxDFType};
use geometry::{ray::Ray, Interaction};
use light::{Light, LightSource};
use math::hcm::Vec3;
use radiometry::color::Color;
use shape::{Shape, ShapeKind};

pub use preset::{SceneName, UnknownScene};

/// A renderable surface: geometry, the material on it, and the index of the area light in the
/// scene's light list if the surface emits.
#[derive(Debug, Clone)]
pub struct Object {
    pub shape: ShapeKind,
    pub bsdf: Bsdf,
    pub light: Option<usize>,
}

/// Flat arena of objects and lights. Objects refer to their lights by index, and intersections
/// refer back to objects by index, so nothing borrows across the arena.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    objects: Vec<Object>,
    lights: Vec<LightSource>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a non-emissive object and returns its index.
    pub fn add_object<S: Into<ShapeKind>>(&mut self, shape: S, bsdf: Bsdf) -> usize {
        self.objects.push(Object {
            shape: shape.into(),
            bsdf,
            light: None,
        });
        self.objects.len() - 1
    }

    /// Adds a light that has no geometry of its own (e.g., a point light).
    pub fn add_light<L: Into<LightSource>>(&mut self, light: L) -> usize {
        self.lights.push(light.into());
        self.lights.len() - 1
    }

    /// Adds an object whose surface is the area light `light`. Returns the object index.
    pub fn add_emitter<S, L>(&mut self, shape: S, bsdf: Bsdf, light: L) -> usize
    where
        S: Into<ShapeKind>,
        L: Into<LightSource>,
    {
        let light_index = self.add_light(light);
        let object_index = self.add_object(shape, bsdf);
        self.objects[object_index].light = Some(light_index);
        object_index
    }

    pub fn objects(&self) -> &[Object] {
        &self.objects
    }

    pub fn lights(&self) -> &[LightSource] {
        &self.lights
    }

    /// Finds the nearest intersection along `r`. The returned interaction carries the index of
    /// the hit object.
    pub fn intersect(&self, r: &Ray) -> Option<(Interaction, &Object)> {
        let mut ray = *r;
        let mut nearest = None;
        for (index, object) in self.objects.iter().enumerate() {
            if let Some(hit) = object.shape.intersect(&ray) {
                ray.t_max = hit.ray_t;
                nearest = Some((hit.with_object(index), object));
            }
        }
        nearest
    }

    /// Tests whether anything blocks `r` within its extent.
    pub fn occluded(&self, r: &Ray) -> bool {
        self.objects.iter().any(|o| o.shape.occludes(r))
    }

    /// Whether any object's material has a component among `flags`.
    pub fn any_object_with(&self, flags: BxDFType) -> bool {
        self.objects.iter().any(|o| o.bsdf.has_type(flags))
    }

    /// Radiance emitted by `object` at `hit` towards direction `w`; black for non-emitters.
    pub fn emitted_radiance(&self, object: &Object, hit: &Interaction, w: Vec3) -> Color {
        object
            .light
            .and_then(|i| self.lights.get(i))
            .map_or(Color::black(), |light| light.radiance_from(hit, w))
    }

    /// Box around every object; empty for an empty scene.
    pub fn bbox(&self) -> BBox {
        self.objects
            .iter()
            .fold(BBox::empty(), |b, o| b.merge(o.shape.bbox()))
    }

    /// Total power emitted by all lights.
    pub fn light_power(&self) -> Color {
        self.lights.iter().map(|l| l.power()).sum()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} objects, {} lights emitting {:.1} within {}",
            self.objects.len(),
            self.lights.len(),
            self.light_power(),
            self.bbox()
        )
    }
}
