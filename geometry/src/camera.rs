use crate::ray::Ray;
use crate::sampling::Sampler;
use crate::transform::{AffineTransform, Transform, TransformError};
use itertools::iproduct;
use math::hcm::{Point3, Vec3};

/// Pinhole camera. In camera space the eye sits at the origin looking down -z, and the film is a
/// `film_width` x `film_height` rectangle at distance `focal_length`, covered by
/// `width` x `height` pixels. Row 0 is the top of the image.
#[derive(Debug, Clone)]
pub struct Camera {
    camera_to_world: AffineTransform,
    top_left: Vec3,
    pixel_size: (f32, f32),

    // Film image resolution.
    width: u32,
    height: u32,
}

impl Camera {
    pub fn new(resolution: (u32, u32), film_size: (f32, f32), focal_length: f32) -> Camera {
        let (width, height) = resolution;
        let (film_width, film_height) = film_size;
        Camera {
            camera_to_world: AffineTransform::identity(),
            top_left: Vec3::new(-film_width * 0.5, film_height * 0.5, -focal_length),
            pixel_size: (film_width / width as f32, film_height / height as f32),
            width,
            height,
        }
    }

    /// Places the camera at `from`, facing `target`. Fails if the view direction is zero or
    /// parallel to `up`.
    pub fn looking_at(
        self, from: Point3, target: Point3, up: Vec3,
    ) -> Result<Self, TransformError> {
        Ok(Self {
            camera_to_world: AffineTransform::look_at(from, target, up)?,
            ..self
        })
    }

    /// Shoots a world-space ray through the film position (`col` + dx, `row` + dy), where the
    /// offsets are fractions of a pixel. Returns `None` for pixels outside the film.
    pub fn shoot_ray(&self, row: u32, col: u32, (dx, dy): (f32, f32)) -> Option<Ray> {
        if row >= self.height || col >= self.width {
            return None;
        }
        let (pw, ph) = self.pixel_size;
        let x = (col as f32 + dx) * pw;
        let y = (row as f32 + dy) * ph;
        let dir = (self.top_left + Vec3::new(x, -y, 0.0)).hat();
        Some(
            self.camera_to_world
                .apply(Ray::new(Point3::ORIGIN, dir)),
        )
    }

    /// Anti-aliasing rays of one pixel: the pixel is split into 2x2 sub-pixels and one ray is
    /// jittered uniformly inside each of them.
    pub fn shoot_subpixel_rays(&self, row: u32, col: u32, sampler: &mut Sampler) -> Vec<Ray> {
        iproduct!(0..2, 0..2)
            .filter_map(|(i, j)| {
                let (u, v) = sampler.uniform2();
                let dx = (j as f32 + u) * 0.5;
                let dy = (i as f32 + v) * 0.5;
                self.shoot_ray(row, col, (dx, dy))
            })
            .collect()
    }

    /// Returns resolution (width x height) of the camera film.
    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn center_pixel_looks_at_target() {
        let camera = Camera::new((64, 64), (0.025, 0.025), 0.035)
            .looking_at(
                Point3::new(278.0, 273.0, -800.0),
                Point3::new(278.0, 273.0, 0.0),
                Vec3::Y,
            )
            .unwrap();
        let center = camera.shoot_ray(32, 32, (0.0, 0.0)).unwrap();
        math::assert_close!(center.dir, Vec3::Z);
        assert!(camera.shoot_ray(64, 0, (0.0, 0.0)).is_none());

        // Top-left pixels point up, and to the viewer's left (which is +x in this set-up).
        let corner = camera.shoot_ray(0, 0, (0.5, 0.5)).unwrap();
        assert!(corner.dir.y > 0.0 && corner.dir.x > 0.0);
    }

    #[test]
    fn subpixel_rays_stay_inside_the_pixel() {
        let camera = Camera::new((4, 4), (1.0, 1.0), 1.0);
        let mut sampler = Sampler::new(3);
        let rays = camera.shoot_subpixel_rays(1, 2, &mut sampler);
        assert_eq!(rays.len(), 4);
        for r in rays.iter() {
            // Project back onto the film plane z = -1.
            let t = -1.0 / r.dir.z;
            let p = r.position_at(t);
            assert!(p.x >= 0.0 && p.x <= 0.25, "{}", p);
            assert!(p.y <= 0.25 && p.y >= 0.0, "{}", p);
        }
    }
}
