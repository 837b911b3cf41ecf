use crate::interaction::Interaction;
use crate::sampling::{cos_hemisphere_pdf, cos_sample_hemisphere};
use bitflags::bitflags;
use enum_dispatch::enum_dispatch;
use math::float::Float;
use math::hcm::{self, make_coord_system, Vec3};
use math::prob::Prob;
use radiometry::color::Color;
use std::f32::consts::{FRAC_1_PI, PI};

bitflags! {
    /// Classifies the scattering components of a material. Every model reports a fixed non-empty
    /// combination.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BxDFType: u32 {
        const REFLECTIVE = 1;
        const TRANSMISSIVE = 2;
        const DIFFUSE = 4;
        const GLOSSY = 8;
        const SPECULAR = 16;
    }
}

/// Which quantity is carried along the path. Light traced from emitters (photons) carries
/// importance-adjoint values, which differ from radiance on refraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMode {
    Radiance,
    Importance,
}

/// Directions in the local shading frame, where +Z is the surface normal.
pub mod local {
    use super::Vec3;
    pub fn cos_theta(w: Vec3) -> f32 {
        w.z
    }
    pub fn same_hemisphere(w0: Vec3, w1: Vec3) -> bool {
        w0.z * w1.z > 0.0
    }
    /// Mirror direction of `w` about the normal.
    pub fn mirrored(w: Vec3) -> Vec3 {
        Vec3::new(-w.x, -w.y, w.z)
    }
}

/// Describes the ray scattering behaviors in a probabilistic way. All vectors involved are in the
/// intersection coordinate system: +Z being the normal vector, and both `wo` and `wi` pointing
/// away from the surface.
///
/// BSDF plays a key role in the rendering integration:
/// ```text
///             /
/// L_o - L_e = | L(wi) * f(wo, wi) * abscos(wi) d(wi)
///            / Sphere
/// ```
/// By Monte-Carlo integration, the integral is estimated as the expectation of the following:
/// ```text
/// L_o - L_e = L(wi) * f(wo, wi) * abscos(wi) / pdf(wi)
/// ```
/// `sample(wo, (u, v))` returns the evaluated bsdf `f`, the sampled incident direction `wi` and
/// its probability. A zero probability or a black `f` means the path carries nothing further.
#[enum_dispatch]
pub trait BxDF {
    fn get_type(&self) -> BxDFType;

    /// Evaluates the BSDF function at given in-out angles. Note that specular BSDFs always return
    /// 0. Use `sample()` in those cases instead.
    fn eval(&self, wo_local: Vec3, wi_local: Vec3, mode: TransportMode) -> Color;

    /// Produces a possible incident direction given the outgoing direction, consuming a 2D
    /// uniform random variable.
    fn sample(&self, wo_local: Vec3, rnd2: (f32, f32), mode: TransportMode) -> (Color, Vec3, Prob);

    /// Density with which `sample()` produces `wi_local`. Zero for specular models.
    fn pdf(&self, wo_local: Vec3, wi_local: Vec3) -> f32;
}

/// Closed set of material models a scene object can carry.
#[enum_dispatch(BxDF)]
#[derive(Debug, Clone)]
pub enum Bsdf {
    Lambertian(LambertianReflection),
    PhongLobe(PhongLobe),
    Phong(Phong),
    Specular(FresnelSpecular),
}

impl Bsdf {
    pub fn lambertian(albedo: Color) -> Self {
        Self::Lambertian(LambertianReflection::new(albedo))
    }
    pub fn phong(kd: Color, ks: Color, exponent: f32) -> Self {
        Self::Phong(Phong::new(kd, ks, exponent))
    }
    pub fn glass(eta_outside: f32, eta_inside: f32) -> Self {
        Self::Specular(FresnelSpecular::new(eta_outside, eta_inside))
    }

    pub fn has_type(&self, flags: BxDFType) -> bool {
        self.get_type().intersects(flags)
    }

    /// World-space evaluation of f(wo, wi) at a surface point.
    pub fn f(&self, hit: &Interaction, wo: Vec3, wi: Vec3, mode: TransportMode) -> Color {
        self.eval(hit.world_to_local(wo), hit.world_to_local(wi), mode)
    }

    /// World-space importance sampling of an incident direction at a surface point. Returns the
    /// BSDF value, the world-space `wi` and its probability.
    pub fn sample_f(
        &self, hit: &Interaction, wo: Vec3, rnd2: (f32, f32), mode: TransportMode,
    ) -> (Color, Vec3, Prob) {
        let (f, wi_local, pr) = self.sample(hit.world_to_local(wo), rnd2, mode);
        (f, hit.local_to_world(wi_local), pr)
    }
}

// ---------------------------

/// Fresnel reflectivity ratio computation for dielectric materials (e.g., glass).
#[derive(Debug, Clone, Copy)]
pub struct FresnelDielectric {
    eta_i: f32,
    eta_t: f32,
}

impl FresnelDielectric {
    /// `eta_i` is the IOR on the side the normal points to, `eta_t` the other side.
    pub fn new(eta_i: f32, eta_t: f32) -> Self {
        Self { eta_i, eta_t }
    }

    /// Computes ratio of reflected radiance from the surface scattering, averaging the s- and
    /// p-polarized terms. If `cos_theta_i` is negative, the refractive indices swap sides.
    pub fn refl_coeff(&self, cos_theta_i: f32) -> f32 {
        let cos_theta_i = cos_theta_i.clamp(-1.0, 1.0);
        let (eta_i, eta_t, cos_theta_i) = if cos_theta_i > 0.0 {
            (self.eta_i, self.eta_t, cos_theta_i)
        } else {
            (self.eta_t, self.eta_i, -cos_theta_i)
        };

        let sin_theta_i = 1.0f32.cathetus(cos_theta_i);
        let sin_theta_t = eta_i / eta_t * sin_theta_i;
        if sin_theta_t >= 1.0 {
            return 1.0;
        }
        let cos_theta_t = 1.0f32.cathetus(sin_theta_t);
        // perp  /n_i cos_i - n_t cos_t\ 2  parl  /n_t cos_i - n_i cos_t\ 2
        // R_s = |---------------------|    R_p = |---------------------|
        //       \n_i cos_i + n_t cos_t/          \n_t cos_i + n_i cos_t/
        let r_perpendicular = (eta_i * cos_theta_i - eta_t * cos_theta_t)
            / (eta_i * cos_theta_i + eta_t * cos_theta_t);
        let r_parallel = (eta_t * cos_theta_i - eta_i * cos_theta_t)
            / (eta_t * cos_theta_i + eta_i * cos_theta_t);
        ((r_parallel.powi(2) + r_perpendicular.powi(2)) * 0.5).clamp(0.0, 1.0)
    }
}

/// BSDF representing dielectric material (e.g., glass). Ray scattering is both reflective and
/// transmissive; which one happens is decided per sample against the Fresnel reflectance.
#[derive(Debug, Clone)]
pub struct FresnelSpecular {
    eta_a: f32,
    eta_b: f32,
}

impl FresnelSpecular {
    /// `eta_a` is the IOR of the medium on the positive side of the normal vector, and `eta_b`
    /// the opposite side.
    pub fn new(eta_a: f32, eta_b: f32) -> Self {
        Self { eta_a, eta_b }
    }
}

impl BxDF for FresnelSpecular {
    fn get_type(&self) -> BxDFType {
        BxDFType::SPECULAR | BxDFType::TRANSMISSIVE | BxDFType::REFLECTIVE
    }

    fn eval(&self, _wo_local: Vec3, _wi_local: Vec3, _mode: TransportMode) -> Color {
        Color::black()
    }

    fn sample(&self, wo_local: Vec3, rnd2: (f32, f32), mode: TransportMode) -> (Color, Vec3, Prob) {
        let cos_o = local::cos_theta(wo_local);
        let refl_coeff = FresnelDielectric::new(self.eta_a, self.eta_b).refl_coeff(cos_o);
        let (u, _v) = rnd2;
        if u < refl_coeff {
            let wi_local = local::mirrored(wo_local);
            let f = Color::gray(refl_coeff / local::cos_theta(wi_local).abs());
            return (f, wi_local, Prob::Mass(refl_coeff));
        }

        // Normal flipped to the side of `wo`, and the IORs swapped accordingly.
        let (eta_i, eta_t, normal) = if cos_o > 0.0 {
            (self.eta_a, self.eta_b, Vec3::Z)
        } else {
            (self.eta_b, self.eta_a, -Vec3::Z)
        };
        match hcm::refract(normal, wo_local, eta_i / eta_t) {
            hcm::FullReflect(_) => (Color::black(), Vec3::ZERO, Prob::Mass(0.0)),
            hcm::Transmit(wi_local) => {
                let transmit_coeff = 1.0 - refl_coeff;
                let mut f_t = transmit_coeff / local::cos_theta(wi_local).abs();
                if mode == TransportMode::Radiance {
                    f_t *= (eta_i / eta_t).powi(2);
                }
                (Color::gray(f_t), wi_local, Prob::Mass(transmit_coeff))
            }
        }
    }

    fn pdf(&self, _wo_local: Vec3, _wi_local: Vec3) -> f32 {
        0.0
    }
}

/// Ideal diffuse reflection: constant albedo / pi over the hemisphere of `wo`.
#[derive(Debug, Clone)]
pub struct LambertianReflection {
    albedo: Color,
}

impl LambertianReflection {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }
    pub fn albedo(&self) -> Color {
        self.albedo
    }
}

impl BxDF for LambertianReflection {
    fn get_type(&self) -> BxDFType {
        BxDFType::REFLECTIVE | BxDFType::DIFFUSE
    }

    fn eval(&self, wo_local: Vec3, wi_local: Vec3, _mode: TransportMode) -> Color {
        if local::same_hemisphere(wo_local, wi_local) {
            self.albedo * FRAC_1_PI
        } else {
            Color::black()
        }
    }

    fn sample(&self, wo_local: Vec3, rnd2: (f32, f32), mode: TransportMode) -> (Color, Vec3, Prob) {
        let (mut wi_local, pdf) = cos_sample_hemisphere(rnd2);
        if local::cos_theta(wo_local) < 0.0 {
            wi_local.z = -wi_local.z;
        }
        (self.eval(wo_local, wi_local, mode), wi_local, Prob::Density(pdf))
    }

    fn pdf(&self, wo_local: Vec3, wi_local: Vec3) -> f32 {
        if local::same_hemisphere(wo_local, wi_local) {
            cos_hemisphere_pdf(Vec3::new(wi_local.x, wi_local.y, wi_local.z.abs()))
        } else {
            0.0
        }
    }
}

/// Normalized Phong specular lobe: ks * (n + 2) / (2 pi) * cos^n(alpha), where alpha is the angle
/// between `wi` and the mirror direction of `wo`.
#[derive(Debug, Clone)]
pub struct PhongLobe {
    ks: Color,
    exponent: f32,
}

impl PhongLobe {
    pub fn new(ks: Color, exponent: f32) -> Self {
        Self { ks, exponent }
    }

    fn cos_alpha(wo_local: Vec3, wi_local: Vec3) -> f32 {
        local::mirrored(wo_local).hat().dot(wi_local.hat())
    }
}

impl BxDF for PhongLobe {
    fn get_type(&self) -> BxDFType {
        BxDFType::REFLECTIVE | BxDFType::GLOSSY
    }

    fn eval(&self, wo_local: Vec3, wi_local: Vec3, _mode: TransportMode) -> Color {
        let cos_alpha = Self::cos_alpha(wo_local, wi_local);
        if !local::same_hemisphere(wo_local, wi_local) || cos_alpha <= 0.0 {
            return Color::black();
        }
        self.ks * ((self.exponent + 2.0) * 0.5 * FRAC_1_PI * cos_alpha.powf(self.exponent))
    }

    fn sample(&self, wo_local: Vec3, rnd2: (f32, f32), mode: TransportMode) -> (Color, Vec3, Prob) {
        let (u, v) = rnd2;
        let cos_alpha = u.powf(1.0 / (self.exponent + 1.0));
        let sin_alpha = 1.0f32.cathetus(cos_alpha);
        let phi = 2.0 * PI * v;

        let mirror = local::mirrored(wo_local).hat();
        let (t0, t1) = make_coord_system(mirror);
        let wi_local =
            t0 * (sin_alpha * phi.cos()) + t1 * (sin_alpha * phi.sin()) + mirror * cos_alpha;
        let pdf = (self.exponent + 1.0) * 0.5 * FRAC_1_PI * cos_alpha.powf(self.exponent);
        (self.eval(wo_local, wi_local, mode), wi_local, Prob::Density(pdf))
    }

    fn pdf(&self, wo_local: Vec3, wi_local: Vec3) -> f32 {
        let cos_alpha = Self::cos_alpha(wo_local, wi_local);
        if cos_alpha <= 0.0 {
            0.0
        } else {
            (self.exponent + 1.0) * 0.5 * FRAC_1_PI * cos_alpha.powf(self.exponent)
        }
    }
}

/// Phong material: a Lambertian base plus a Phong lobe. Sampling picks the diffuse component with
/// probability equal to the average diffuse albedo, and the glossy one otherwise.
#[derive(Debug, Clone)]
pub struct Phong {
    diffuse: LambertianReflection,
    glossy: PhongLobe,
}

impl Phong {
    pub fn new(kd: Color, ks: Color, exponent: f32) -> Self {
        Self {
            diffuse: LambertianReflection::new(kd),
            glossy: PhongLobe::new(ks, exponent),
        }
    }

    /// Probability of sampling the diffuse component.
    pub fn diffuse_selection(&self) -> f32 {
        self.diffuse.albedo().channel_avg().clamp(0.0, 1.0)
    }
}

impl BxDF for Phong {
    fn get_type(&self) -> BxDFType {
        BxDFType::REFLECTIVE | BxDFType::GLOSSY
    }

    /// Sum of both lobes, i.e. the expected value of the component chosen by selection.
    fn eval(&self, wo_local: Vec3, wi_local: Vec3, mode: TransportMode) -> Color {
        self.diffuse.eval(wo_local, wi_local, mode) + self.glossy.eval(wo_local, wi_local, mode)
    }

    fn sample(&self, wo_local: Vec3, rnd2: (f32, f32), mode: TransportMode) -> (Color, Vec3, Prob) {
        let p_diffuse = self.diffuse_selection();
        let (u, v) = rnd2;
        if u < p_diffuse {
            // Reuses `u` after rescaling it back into [0, 1).
            let (f, wi, pr) = self.diffuse.sample(wo_local, (u / p_diffuse, v), mode);
            (f, wi, pr.scaled(p_diffuse))
        } else {
            let u = ((u - p_diffuse) / (1.0 - p_diffuse)).min(math::float::ONE_MINUS_EPSILON);
            let (f, wi, pr) = self.glossy.sample(wo_local, (u, v), mode);
            (f, wi, pr.scaled(1.0 - p_diffuse))
        }
    }

    fn pdf(&self, wo_local: Vec3, wi_local: Vec3) -> f32 {
        let p_diffuse = self.diffuse_selection();
        p_diffuse * self.diffuse.pdf(wo_local, wi_local)
            + (1.0 - p_diffuse) * self.glossy.pdf(wo_local, wi_local)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn every_model_reports_a_type() {
        let models = [
            Bsdf::lambertian(Color::gray(0.5)),
            Bsdf::PhongLobe(PhongLobe::new(Color::gray(0.5), 10.0)),
            Bsdf::phong(Color::gray(0.2), Color::gray(0.3), 10.0),
            Bsdf::glass(1.0, 1.5),
        ];
        for m in models.iter() {
            assert!(!m.get_type().is_empty());
        }
        assert!(models[0].has_type(BxDFType::DIFFUSE));
        assert!(!models[2].has_type(BxDFType::DIFFUSE | BxDFType::SPECULAR));
        assert!(models[3].has_type(BxDFType::SPECULAR));
    }

    #[test]
    fn mirrored_direction_keeps_elevation() {
        let w = Vec3::new(0.48, 0.64, 0.6);
        assert_eq!(local::mirrored(w), Vec3::new(-0.48, -0.64, 0.6));
        assert!(local::same_hemisphere(w, local::mirrored(w)));
    }
}
