use geometry::bxdf::{Bsdf, TransportMode};
use geometry::sampling::Sampler;
use geometry::Interaction;
use light::Light;
use math::hcm::Vec3;
use radiometry::color::Color;
use scene::Scene;

/// Next-event estimation at `hit`: draws `samples` shadow samples per light and sums the
/// per-light averages of `f(wo, wi) * |cos| * Li / pdf` over unoccluded samples.
pub fn estimate_direct(
    scene: &Scene, hit: &Interaction, bsdf: &Bsdf, wo: Vec3, samples: u32, sampler: &mut Sampler,
) -> Color {
    if samples == 0 {
        return Color::black();
    }
    scene
        .lights()
        .iter()
        .map(|light| {
            let total: Color = (0..samples)
                .filter_map(|_| sample_one(scene, hit, bsdf, wo, light, sampler.uniform2()))
                .sum();
            total / samples as f32
        })
        .sum()
}

/// Contribution of one light sample. Returns `None` on zero pdf, black radiance or BSDF value,
/// or if the light is occluded.
fn sample_one<L: Light>(
    scene: &Scene, hit: &Interaction, bsdf: &Bsdf, wo: Vec3, light: &L, rnd2: (f32, f32),
) -> Option<Color> {
    let incident = light.sample_li(hit, rnd2);
    if incident.pdf <= 0.0 || incident.radiance.is_black() {
        return None;
    }
    let wi = (incident.point.pos - hit.pos).try_hat()?;
    let f = bsdf.f(hit, wo, wi, TransportMode::Radiance) * wi.dot(hit.normal).abs();
    if f.is_black() {
        return None;
    }
    // Only now pays for the shadow ray.
    if scene.occluded(&hit.spawn_ray_to(incident.point.pos)) {
        return None;
    }
    Some(f * incident.radiance / incident.pdf)
}
