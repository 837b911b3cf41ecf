use crate::ray::Ray;
use math::hcm::{make_coord_system, Mat3, Point3, Vec3};
use std::fmt::{Display, Formatter, Result};

/// Distance by which spawned rays are pushed off a surface to avoid hitting it again.
pub const RAY_EPSILON: f32 = 1e-3;
/// Fraction of a shadow ray's length left out near the light, so the light's own geometry
/// doesn't occlude it.
pub const SHADOW_EPSILON: f32 = 1e-3;

/// Contains geometric information on a ray-surface intersection or a sampled surface point:
///  - `pos`: position of intersection
///  - `ray_t`: t-value of the ray at the intersection, or 0 for sampled points.
///  - `normal`: normal vector of the surface.
///  - `object`: index of the scene object that was hit, if any.
///
/// The tangent-bitangent-normal frame maps world-space directions into the local shading space
/// where +Z is the normal.
#[derive(Debug, Clone, Copy)]
pub struct Interaction {
    pub pos: Point3,
    pub ray_t: f32,
    pub normal: Vec3,
    pub object: Option<usize>,
    tbn_frame: Mat3,
}

impl Interaction {
    /// Makes an interaction with an arbitrary tangent around the given normal.
    pub fn new(pos: Point3, ray_t: f32, normal: Vec3) -> Interaction {
        let normal = normal.hat();
        let (tangent, bitangent) = make_coord_system(normal);
        Interaction {
            pos,
            ray_t,
            normal,
            object: None,
            tbn_frame: Mat3::from_cols(tangent, bitangent, normal),
        }
    }

    /// Makes an interaction for a point that isn't produced by a ray hit, e.g., sampled on a light.
    pub fn rayless(pos: Point3, normal: Vec3) -> Interaction {
        Self::new(pos, 0.0, normal)
    }

    pub fn tangent(&self) -> Vec3 {
        self.tbn_frame.cols[0]
    }
    pub fn bitangent(&self) -> Vec3 {
        self.tbn_frame.cols[1]
    }

    /// Builds the tangent-bitangent-normal frame with the given tangent and existing normal.
    pub fn with_dpdu(self, dpdu: Vec3) -> Interaction {
        let normal = self.normal;
        let bitangent = match normal.cross(dpdu).try_hat() {
            Some(b) => b,
            None => return self,
        };
        let dpdu = bitangent.cross(normal);
        Self {
            tbn_frame: Mat3::from_cols(dpdu, bitangent, normal),
            ..self
        }
    }

    pub fn with_object(self, object: usize) -> Interaction {
        Self {
            object: Some(object),
            ..self
        }
    }

    pub fn world_to_local(&self, world: Vec3) -> Vec3 {
        let cols = self.tbn_frame.cols;
        Vec3::new(cols[0].dot(world), cols[1].dot(world), cols[2].dot(world))
    }

    pub fn local_to_world(&self, local: Vec3) -> Vec3 {
        self.tbn_frame * local
    }

    /// Spawns a ray towards `dir`, with the origin pushed off the surface on the side `dir` leaves.
    pub fn spawn_ray(&self, dir: Vec3) -> Ray {
        let out_normal = self.normal.flipped_towards(dir);
        Ray::new(self.pos + out_normal * RAY_EPSILON, dir)
    }

    /// Spawns a unit-direction shadow ray towards `target` that stops just short of it.
    pub fn spawn_ray_to(&self, target: Point3) -> Ray {
        let r = self.spawn_ray(target - self.pos);
        let to_target = target - r.origin;
        let distance = to_target.norm();
        Ray::new(r.origin, to_target / distance).with_extent(distance * (1.0 - SHADOW_EPSILON))
    }

    pub fn has_valid_frame(&self) -> bool {
        let cols = self.tbn_frame.cols;
        let det = cols[0].cross(cols[1]).dot(cols[2]);
        (det - 1.0).abs() < 1e-4
    }
}

impl Display for Interaction {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(
            f,
            "pos = {}, t = {:.2}, normal = {}, object = {:?}",
            self.pos, self.ray_t, self.normal, self.object
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use math::assert_close;

    #[test]
    fn local_frame_round_trip() {
        let hit = Interaction::new(Point3::new(1.0, 2.0, 3.0), 4.0, Vec3::new(0.3, -0.5, 0.8));
        assert!(hit.has_valid_frame());
        let w = Vec3::new(0.2, 0.7, -0.1);
        assert_close!(hit.local_to_world(hit.world_to_local(w)), w);
        assert_close!(hit.world_to_local(hit.normal), Vec3::Z);

        let tangent_hit = hit.with_dpdu(Vec3::new(1.0, 0.0, 0.0));
        assert!(tangent_hit.has_valid_frame());
        assert!(tangent_hit.tangent().dot(tangent_hit.normal).abs() < 1e-5);
        assert!(tangent_hit.tangent().x > 0.0);
    }

    #[test]
    fn spawned_rays_leave_the_surface() {
        let hit = Interaction::rayless(Point3::ORIGIN, Vec3::Y);
        let up = hit.spawn_ray(Vec3::new(0.0, 1.0, 1.0));
        let down = hit.spawn_ray(Vec3::new(0.0, -1.0, 1.0));
        assert!(up.origin.y > 0.0);
        assert!(down.origin.y < 0.0);

        let shadow = hit.spawn_ray_to(Point3::new(0.0, 10.0, 0.0));
        assert!((shadow.dir.norm() - 1.0).abs() < 1e-6);
        assert!(shadow.position_at(shadow.t_max).y < 10.0);
        assert!(shadow.position_at(shadow.t_max).y > 9.9);
    }
}
