use math::hcm::Vec3;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::f32::consts::{FRAC_1_PI, PI};

/// Uniform random number stream. Every worker owns one, so no generator state is shared between
/// threads; streams derived from the same seed are reproducible.
pub struct Sampler {
    rng: StdRng,
}

impl Sampler {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Derives an independent stream, e.g., one per image row.
    pub fn for_stream(seed: u64, stream: u64) -> Self {
        Self::new(seed ^ stream.wrapping_add(1).wrapping_mul(0x9e37_79b9_7f4a_7c15))
    }

    /// Uniform sample in [0, 1).
    pub fn uniform(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }

    pub fn uniform2(&mut self) -> (f32, f32) {
        self.rng.gen::<(f32, f32)>()
    }
}

/// Maps the unit square onto the unit disk, keeping relative areas.
pub fn concentric_sample_disk(uv: (f32, f32)) -> (f32, f32) {
    let x = uv.0 * 2.0 - 1.0;
    let y = uv.1 * 2.0 - 1.0;

    if x == 0.0 && y == 0.0 {
        return (0.0, 0.0);
    }
    let r = x.abs().max(y.abs());
    let hypot = x.hypot(y);
    let (cos_theta, sin_theta) = (x / hypot, y / hypot);
    (r * cos_theta, r * sin_theta)
}

/// Samples a direction in the +Z hemisphere with density proportional to its cosine.
/// Returns the direction and its density cos(theta) / pi.
pub fn cos_sample_hemisphere(uv: (f32, f32)) -> (Vec3, f32) {
    let (x, y) = concentric_sample_disk(uv);
    let z = (1.0 - x * x - y * y).max(0.0).sqrt();
    let w = Vec3::new(x, y, z);
    (w, cos_hemisphere_pdf(w))
}

pub fn cos_hemisphere_pdf(w_local: Vec3) -> f32 {
    w_local.z.max(0.0) * FRAC_1_PI
}

/// Samples a direction in the +Z hemisphere uniformly, with density 1 / (2 pi).
pub fn uniform_sample_hemisphere(uv: (f32, f32)) -> (Vec3, f32) {
    let (u, v) = uv;
    let z = u;
    let r = (1.0 - z * z).max(0.0).sqrt();
    let phi = 2.0 * PI * v;
    (Vec3::new(r * phi.cos(), r * phi.sin(), z), 0.5 * FRAC_1_PI)
}

/// Samples a direction on the unit sphere uniformly, with density 1 / (4 pi).
pub fn uniform_sample_sphere(uv: (f32, f32)) -> (Vec3, f32) {
    let (u, v) = uv;
    let z = 1.0 - 2.0 * u;
    let r = (1.0 - z * z).max(0.0).sqrt();
    let phi = 2.0 * PI * v;
    (Vec3::new(r * phi.cos(), r * phi.sin(), z), 0.25 * FRAC_1_PI)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn streams_are_reproducible() {
        let mut a = Sampler::for_stream(7, 3);
        let mut b = Sampler::for_stream(7, 3);
        let mut c = Sampler::for_stream(7, 4);
        let xs: Vec<f32> = (0..8).map(|_| a.uniform()).collect();
        let ys: Vec<f32> = (0..8).map(|_| b.uniform()).collect();
        let zs: Vec<f32> = (0..8).map(|_| c.uniform()).collect();
        assert_eq!(xs, ys);
        assert_ne!(xs, zs);
        assert!(xs.iter().all(|x| (0.0f32..1.0).contains(x)));
    }

    #[test]
    fn sampled_directions_are_unit_length() {
        let (us, _) = math::float::linspace((0.0, 1.0), 12);
        for u in us.iter().copied() {
            for v in us.iter().copied() {
                for (w, _) in [
                    cos_sample_hemisphere((u, v)),
                    uniform_sample_hemisphere((u, v)),
                    uniform_sample_sphere((u, v)),
                ]
                .iter()
                {
                    assert!((w.norm() - 1.0).abs() < 1e-4, "{}", w);
                }
            }
        }
    }
}
