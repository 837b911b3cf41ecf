use crate::directlighting::estimate_direct;
use crate::pathintegrator::ROULETTE_START;
use crate::photonmap::{NearestPhotons, Photon, PhotonMap};
use crate::render::{russian_roulette, Integrator, RenderSettings};
use geometry::bxdf::{Bsdf, BxDFType, TransportMode};
use geometry::ray::Ray;
use geometry::sampling::Sampler;
use geometry::Interaction;
use light::{Light, LightSource};
use math::float::Float;
use math::hcm::Vec3;
use math::prob::Prob;
use radiometry::color::Color;
use scene::Scene;
use std::f32::consts::PI;
use std::time::Instant;

/// Random stream reserved for photon tracing; image rows use the streams from 0 upwards.
const PHOTON_STREAM: u64 = u64::MAX;

/// Photon paths are cut after this many bounces. Total internal reflection inside a sphere keeps
/// the throughput unchanged, so roulette alone may never end such a path.
const MAX_PHOTON_BOUNCES: usize = 128;

/// Photon quotas and lookup size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotonSettings {
    /// Photons to store after a specular bounce.
    pub caustic: usize,
    /// Photons to store after diffuse or glossy bounces.
    pub indirect: usize,
    /// Photons gathered per density estimate.
    pub neighbours: usize,
    /// Upper bound on emitted paths, reached only when the quotas can't be filled.
    pub max_paths: usize,
}

impl Default for PhotonSettings {
    fn default() -> Self {
        Self {
            caustic: 50_000,
            indirect: 10_000_000,
            neighbours: 100,
            max_paths: 100_000_000,
        }
    }
}

/// Outcome of the photon tracing pass.
#[derive(Debug, Clone, Default)]
pub struct TracedPhotons {
    pub caustic: Vec<Photon>,
    pub indirect: Vec<Photon>,
    /// Number of paths started from the lights, stored or not.
    pub emitted: usize,
}

/// Shoots photons from every light in turn until both quotas are met. A quota counts as met
/// when the scene has no object that could produce such photons: nothing specular or
/// transmissive for caustics, nothing diffuse for indirect light.
pub fn trace_photons(scene: &Scene, settings: &PhotonSettings, sampler: &mut Sampler) -> TracedPhotons {
    let mut traced = TracedPhotons::default();
    if scene.lights().is_empty() {
        log::warn!("scene has no lights; no photons traced");
        return traced;
    }
    let caustic_target = if scene.any_object_with(BxDFType::SPECULAR | BxDFType::TRANSMISSIVE) {
        settings.caustic
    } else {
        0
    };
    let indirect_target = if scene.any_object_with(BxDFType::DIFFUSE) {
        settings.indirect
    } else {
        0
    };
    let quotas_met =
        |t: &TracedPhotons| t.caustic.len() >= caustic_target && t.indirect.len() >= indirect_target;

    'emission: while !quotas_met(&traced) {
        for light in scene.lights() {
            if traced.emitted >= settings.max_paths {
                log::warn!(
                    "stopped after {} photon paths with {}/{} caustic and {}/{} indirect photons",
                    traced.emitted,
                    traced.caustic.len(),
                    caustic_target,
                    traced.indirect.len(),
                    indirect_target
                );
                break 'emission;
            }
            traced.emitted += 1;
            trace_path(scene, light, (caustic_target, indirect_target), sampler, &mut traced);
        }
    }
    traced
}

/// Follows one photon path from `light`, storing a photon at every diffuse surface after the
/// first hit. Scattering uses the adjoint BSDF.
fn trace_path(
    scene: &Scene, light: &LightSource, (caustic_target, indirect_target): (usize, usize),
    sampler: &mut Sampler, traced: &mut TracedPhotons,
) {
    let emission = light.sample_le(sampler.uniform2(), sampler.uniform2());
    let mut beta = emission.throughput();
    if beta.is_black() {
        return;
    }
    let mut ray = emission.origin.spawn_ray(emission.dir);
    let mut specular_bounce = false;
    for bounces in 1..=MAX_PHOTON_BOUNCES {
        let (hit, object) = match scene.intersect(&ray) {
            Some(found) => found,
            None => break,
        };
        let wo = -ray.dir;
        if bounces > 1 && object.bsdf.has_type(BxDFType::DIFFUSE) {
            let photon = Photon::new(hit.pos, beta, wo);
            if specular_bounce && traced.caustic.len() < caustic_target {
                traced.caustic.push(photon);
            } else if traced.indirect.len() < indirect_target {
                traced.indirect.push(photon);
            }
        }

        let (f, wi, pr) =
            object
                .bsdf
                .sample_f(&hit, wo, sampler.uniform2(), TransportMode::Importance);
        if f.is_black() || !pr.is_positive() {
            break;
        }
        specular_bounce = matches!(pr, Prob::Mass(_));
        let new_beta = beta * f * (wi.dot(hit.normal).abs() / pr.value());
        if !new_beta.is_finite() {
            break;
        }

        // Survives with the ratio of new to old throughput, so stored powers stay comparable.
        let survival = new_beta
            .max_channel()
            .try_divide(beta.max_channel())
            .map_or(0.0, |p| p.min(1.0));
        if sampler.uniform() >= survival {
            break;
        }
        beta = new_beta / survival;
        ray = hit.spawn_ray(wi);
    }
}

/// Photon mapping: a photon tracing pass builds the photon map once, then camera paths are
/// traced like in the path tracer until they reach a diffuse surface, where indirect light is
/// estimated from the density of nearby photons.
#[derive(Debug, Clone)]
pub struct PhotonMapper {
    map: PhotonMap,
    emitted: usize,
    neighbours: usize,
    light_samples: u32,
}

impl PhotonMapper {
    pub fn new(scene: &Scene, settings: &RenderSettings) -> Self {
        let start = Instant::now();
        let mut sampler = Sampler::for_stream(settings.seed, PHOTON_STREAM);
        let traced = trace_photons(scene, &settings.photons, &mut sampler);
        log::info!(
            "emitted {} photon paths; stored {} caustic and {} indirect photons",
            traced.emitted,
            traced.caustic.len(),
            traced.indirect.len()
        );

        let emitted = traced.emitted;
        let mut photons = traced.indirect;
        photons.extend(traced.caustic);
        let map = PhotonMap::build(photons);
        log::info!("photon map of {} photons ready after {:.2?}", map.len(), start.elapsed());
        Self {
            map,
            emitted,
            neighbours: settings.photons.neighbours,
            light_samples: settings.light_samples,
        }
    }

    pub fn photon_map(&self) -> &PhotonMap {
        &self.map
    }

    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Density estimate of reflected indirect radiance at `hit`:
    /// sum(f(wo, photon.dir) * photon.power) / (2 pi r^2 emitted), where r is the distance to
    /// the farthest of the gathered photons.
    pub fn indirect_radiance(
        &self, hit: &Interaction, bsdf: &Bsdf, wo: Vec3, found: &mut NearestPhotons,
    ) -> Color {
        if self.emitted == 0 {
            return Color::black();
        }
        self.map.query_nearest(hit.pos, self.neighbours, found);
        let r2 = match found.max_dist2() {
            Some(r2) if r2 > 0.0 => r2,
            _ => return Color::black(),
        };
        let flux: Color = self
            .map
            .photons_in(found)
            .map(|p| bsdf.f(hit, wo, p.dir, TransportMode::Radiance) * p.power)
            .sum();
        flux / (2.0 * PI * r2 * self.emitted as f32)
    }
}

impl Integrator for PhotonMapper {
    type Scratch = NearestPhotons;

    fn incident_radiance(
        &self, scene: &Scene, mut ray: Ray, sampler: &mut Sampler, found: &mut NearestPhotons,
    ) -> Color {
        let mut radiance = Color::black();
        let mut specular_bounce = false;
        let mut beta = Color::ONE;
        for bounces in 0.. {
            let (hit, object) = match scene.intersect(&ray) {
                Some(nearest) => nearest,
                None => break,
            };
            let wo = -ray.dir;
            if bounces == 0 || specular_bounce {
                radiance += beta * scene.emitted_radiance(object, &hit, wo);
            }
            radiance +=
                beta * estimate_direct(scene, &hit, &object.bsdf, wo, self.light_samples, sampler);

            // Diffuse surfaces end the path with a photon lookup.
            if object.bsdf.has_type(BxDFType::DIFFUSE) {
                radiance += beta * self.indirect_radiance(&hit, &object.bsdf, wo, found);
                break;
            }

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

#[cfg(test)]
mod test {
    use super::*;
    use math::hcm::Point3;

    fn mapper_over(photons: Vec<Photon>, emitted: usize, neighbours: usize) -> PhotonMapper {
        PhotonMapper {
            map: PhotonMap::build(photons),
            emitted,
            neighbours,
            light_samples: 1,
        }
    }

    fn floor_photon(x: f32, z: f32, power: f32) -> Photon {
        Photon::new(Point3::new(x, 0.0, z), Color::gray(power), Vec3::new(0.3, 1.0, -0.2).hat())
    }

    #[test]
    fn density_estimate_uses_the_farthest_neighbour() {
        let photons = vec![
            floor_photon(1.0, 0.0, 2.0),
            floor_photon(0.0, 2.0, 4.0),
            floor_photon(3.0, 0.0, 100.0),
            floor_photon(0.0, -5.0, 100.0),
        ];
        let mapper = mapper_over(photons, 10, 2);
        let hit = Interaction::rayless(Point3::ORIGIN, Vec3::Y);
        let bsdf = Bsdf::lambertian(Color::gray(0.5));
        let mut found = NearestPhotons::default();

        let radiance = mapper.indirect_radiance(&hit, &bsdf, Vec3::Y, &mut found);
        // (0.5 / pi) * (2 + 4) over 2 pi r^2 N, with r = 2 and N = 10.
        let expected = 3.0 / PI / (2.0 * PI * 4.0 * 10.0);
        assert_eq!(found.len(), 2);
        assert!((radiance.r - expected).abs() < 1e-6, "{} vs {}", radiance, expected);
        assert_eq!(radiance.r, radiance.b);

        let all = mapper_over(vec![floor_photon(1.0, 0.0, 2.0)], 10, 5);
        let radiance = all.indirect_radiance(&hit, &bsdf, Vec3::Y, &mut found);
        let expected = 1.0 / PI / (2.0 * PI * 10.0);
        assert!((radiance.g - expected).abs() < 1e-6, "{} vs {}", radiance, expected);
    }

    #[test]
    fn degenerate_lookups_are_black() {
        let hit = Interaction::rayless(Point3::ORIGIN, Vec3::Y);
        let bsdf = Bsdf::lambertian(Color::gray(0.5));
        let mut found = NearestPhotons::default();

        let empty = mapper_over(Vec::new(), 10, 4);
        assert!(empty.indirect_radiance(&hit, &bsdf, Vec3::Y, &mut found).is_black());

        let nothing_emitted = mapper_over(vec![floor_photon(1.0, 0.0, 2.0)], 0, 4);
        assert!(nothing_emitted.indirect_radiance(&hit, &bsdf, Vec3::Y, &mut found).is_black());

        // Every neighbour sits on the shading point, so the gather radius is zero.
        let stacked = mapper_over(vec![floor_photon(0.0, 0.0, 2.0); 3], 10, 2);
        assert!(stacked.indirect_radiance(&hit, &bsdf, Vec3::Y, &mut found).is_black());
    }
}
