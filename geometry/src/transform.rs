use crate::ray::Ray;
use math::hcm::{Mat4, Point3, Vec3};
use std::ops::Mul;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("transform matrix is singular (determinant = {determinant:e})")]
    Singular { determinant: f32 },
    #[error("can't orient a frame at {eye} towards {target} with up vector {up}")]
    DegenerateLookAt { eye: Point3, target: Point3, up: Vec3 },
}

/// Local-to-world matrix paired with its inverse.
#[derive(Debug, Clone, Copy)]
pub struct AffineTransform {
    m: Mat4,
    m_inv: Mat4,
}

/// Maps a value from local to world coordinates.
pub trait Transform<T> {
    fn apply(&self, x: T) -> T;
}

impl AffineTransform {
    pub fn identity() -> Self {
        Self {
            m: Mat4::IDENTITY,
            m_inv: Mat4::IDENTITY,
        }
    }

    pub fn from_matrix(m: Mat4) -> Result<Self, TransformError> {
        match m.try_inverse() {
            Some(m_inv) => Ok(Self { m, m_inv }),
            None => Err(TransformError::Singular {
                determinant: m.determinant(),
            }),
        }
    }

    pub fn translater(t: Vec3) -> Self {
        Self {
            m: Mat4::translater(t),
            m_inv: Mat4::translater(-t),
        }
    }

    /// Right-handed rotation about `axis`. Rotations are orthonormal, so the inverse is the
    /// transpose.
    pub fn rotater(axis: Vec3, radians: f32) -> Self {
        let m = Mat4::rotater(axis, radians);
        Self {
            m,
            m_inv: m.transpose(),
        }
    }

    pub fn scaler(scale: Vec3) -> Result<Self, TransformError> {
        Self::from_matrix(Mat4::nonuniform_scale(scale))
    }

    /// Camera-to-world frame of a viewer at `eye` facing `target`: local -z is the view direction,
    /// +x points right and +y up.
    pub fn look_at(eye: Point3, target: Point3, up: Vec3) -> Result<Self, TransformError> {
        let degenerate = || TransformError::DegenerateLookAt { eye, target, up };
        let view = (target - eye).try_hat().ok_or_else(degenerate)?;
        let right = view.cross(up).try_hat().ok_or_else(degenerate)?;
        let m = Mat4::from_cols(
            right.as_vec4(),
            right.cross(view).as_vec4(),
            (-view).as_vec4(),
            eye.as_vec4(),
        );
        Self::from_matrix(m)
    }

    pub fn inverse(&self) -> Self {
        Self {
            m: self.m_inv,
            m_inv: self.m,
        }
    }

    /// Normals transform with the inverse transpose.
    pub fn apply_normal(&self, n: Vec3) -> Vec3 {
        (self.m_inv.transpose() * n.as_vec4()).into()
    }
}

/// `a * b` applies `b` first.
impl Mul for AffineTransform {
    type Output = AffineTransform;
    fn mul(self, rhs: Self) -> Self {
        Self {
            m: self.m * rhs.m,
            m_inv: rhs.m_inv * self.m_inv,
        }
    }
}

impl Transform<Vec3> for AffineTransform {
    fn apply(&self, v: Vec3) -> Vec3 {
        (self.m * v.as_vec4()).into()
    }
}

impl Transform<Point3> for AffineTransform {
    fn apply(&self, p: Point3) -> Point3 {
        let h = self.m * p.as_vec4();
        let w = if h.w == 0.0 { 1.0 } else { h.w };
        Point3::new(h.x / w, h.y / w, h.z / w)
    }
}

impl Transform<Ray> for AffineTransform {
    fn apply(&self, r: Ray) -> Ray {
        Ray::new(self.apply(r.origin), self.apply(r.dir)).with_extent(r.t_max)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use math::assert_le;

    #[test]
    fn ray_survives_a_round_trip() {
        let trans = AffineTransform::translater(Vec3::new(7.0, 8.0, -13.0))
            * AffineTransform::rotater(Vec3::new(0.6, 0.8, 0.0), 0.3)
            * AffineTransform::scaler(Vec3::new(2.0, 3.0, 0.5)).unwrap();
        let ray = Ray::new(Point3::new(-0.3, 0.4, 0.8), Vec3::new(3.4, 2.3, 4.4).hat());

        let back = trans.inverse().apply(trans.apply(ray));
        assert_le!(back.origin.squared_distance_to(ray.origin), 1e-8);
        assert_le!((back.dir - ray.dir).norm_squared(), 1e-8);
    }

    #[test]
    fn normals_stay_perpendicular_under_scaling() {
        let trans = AffineTransform::rotater(Vec3::Z, 0.7)
            * AffineTransform::scaler(Vec3::new(4.0, 1.0, 1.0)).unwrap();
        let tangent = Vec3::new(1.0, 1.0, 0.0);
        let normal = Vec3::new(1.0, -1.0, 0.0);
        let dot = trans.apply(tangent).dot(trans.apply_normal(normal));
        assert_le!(dot.abs(), 1e-5);
    }

    #[test]
    fn degenerate_frames_are_errors() {
        let flat = AffineTransform::scaler(Vec3::new(1.0, 0.0, 1.0));
        assert!(matches!(flat, Err(TransformError::Singular { .. })));

        let looking_up = AffineTransform::look_at(Point3::ORIGIN, Point3::new(0.0, 5.0, 0.0), Vec3::Y);
        assert!(matches!(looking_up, Err(TransformError::DegenerateLookAt { .. })));
    }

    #[test]
    fn look_at_frame() {
        let eye = Point3::new(278.0, 273.0, -800.0);
        let cam = AffineTransform::look_at(eye, Point3::new(278.0, 273.0, 0.0), Vec3::Y).unwrap();
        // Looking down world +z from the front, camera +x is world -x.
        math::assert_close!(cam.apply(-Vec3::Z), Vec3::Z);
        math::assert_close!(cam.apply(Vec3::X), -Vec3::X);
        math::assert_close!(cam.apply(Vec3::Y), Vec3::Y);
        assert_le!(cam.apply(Point3::ORIGIN).squared_distance_to(eye), 1e-6);
    }
}
