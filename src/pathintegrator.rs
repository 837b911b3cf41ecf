use crate::directlighting::estimate_direct;
use crate::render::{russian_roulette, Integrator};
use geometry::bxdf::TransportMode;
use geometry::ray::Ray;
use geometry::sampling::Sampler;
use math::prob::Prob;
use radiometry::color::Color;
use scene::Scene;

/// Paths longer than this many bounces are subject to Russian roulette.
pub const ROULETTE_START: usize = 4;

/// Unidirectional path tracer with next-event estimation at every bounce.
#[derive(Debug, Clone, Copy)]
pub struct PathTracer {
    pub light_samples: u32,
}

impl PathTracer {
    pub fn new(light_samples: u32) -> Self {
        Self { light_samples }
    }
}

impl Integrator for PathTracer {
    type Scratch = ();

    fn incident_radiance(
        &self, scene: &Scene, mut ray: Ray, sampler: &mut Sampler, _: &mut (),
    ) -> Color {
        let mut radiance = Color::black();
        let mut specular_bounce = false;
        let mut beta = Color::ONE;
        for bounces in 0.. {
            // Intersects ray with scene.
            let (hit, object) = match scene.intersect(&ray) {
                Some(found) => found,
                None => break,
            };
            let wo = -ray.dir;

            // Emission is only counted where next-event estimation couldn't have seen it.
            if bounces == 0 || specular_bounce {
                radiance += beta * scene.emitted_radiance(object, &hit, wo);
            }

            // Samples illumination from lights to find path contribution.
            radiance +=
                beta * estimate_direct(scene, &hit, &object.bsdf, wo, self.light_samples, sampler);

            // Samples BSDF to get new path direction.
            let (f, wi, pr) =
                object
                    .bsdf
                    .sample_f(&hit, wo, sampler.uniform2(), TransportMode::Radiance);
            if f.is_black() || !pr.is_positive() {
                break;
            }
            specular_bounce = matches!(pr, Prob::Mass(_));
            beta = beta * f * (wi.dot(hit.normal).abs() / pr.value());
            if !beta.is_finite() {
                break;
            }

            // Terminates the path probabilistically with Russian roulette.
            if bounces > ROULETTE_START {
                beta = match russian_roulette(beta, sampler.uniform()) {
                    Some(b) => b,
                    None => break,
                };
            }
            ray = hit.spawn_ray(wi);
        }
        radiance
    }
}
