use math::hcm::{Point3, Vec3};

/// Half-line `origin + t * dir` for `t` in (0, `t_max`). Camera and bounce rays are unbounded.
/// Shadow rays stop short of the light so that the light itself doesn't occlude.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Point3,
    pub dir: Vec3,
    pub t_max: f32,
}

impl Ray {
    pub fn new(origin: Point3, dir: Vec3) -> Self {
        Self::new_bounded(origin, dir, f32::INFINITY)
    }

    fn new_bounded(origin: Point3, dir: Vec3, t_max: f32) -> Self {
        Ray { origin, dir, t_max }
    }

    pub fn with_extent(self, t_max: f32) -> Self {
        Self::new_bounded(self.origin, self.dir, t_max)
    }

    /// Keeps a hit parameter only if it lies inside the ray's extent.
    pub fn truncated_t(&self, t: f32) -> Option<f32> {
        (f32::EPSILON..self.t_max).contains(&t).then(|| t)
    }

    pub fn position_at(&self, t: f32) -> Point3 {
        self.origin + self.dir * t
    }
}

impl std::fmt::Display for Ray {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let p = f.precision().unwrap_or(2);
        write!(f, "{:.p$} + t{:.p$}", self.origin, self.dir, p = p)
    }
}
