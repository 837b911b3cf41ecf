use crate::error::RenderError;
use crate::film::Film;
use crate::photonmapper::PhotonSettings;
use geometry::camera::Camera;
use geometry::ray::Ray;
use geometry::sampling::Sampler;
use indicatif::{ProgressBar, ProgressStyle};
use radiometry::color::Color;
use rayon::prelude::*;
use scene::Scene;
use std::time::Instant;

/// Values that drive a render. `Default` matches the command-line defaults.
#[derive(Debug, Clone)]
pub struct RenderSettings {
    /// Width x height in pixels.
    pub resolution: (u32, u32),
    pub spp: u32,
    pub seed: u64,
    /// Shadow samples drawn per light at every shading point.
    pub light_samples: u32,
    pub photons: PhotonSettings,
    pub show_progress: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            resolution: (512, 512),
            spp: 8,
            seed: 0,
            light_samples: 1,
            photons: PhotonSettings::default(),
            show_progress: true,
        }
    }
}

impl RenderSettings {
    pub fn validate(&self) -> Result<(), RenderError> {
        let (width, height) = self.resolution;
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidSettings(format!(
                "resolution {}x{} has no pixels",
                width, height
            )));
        }
        if self.spp == 0 {
            return Err(RenderError::InvalidSettings("spp must be positive".into()));
        }
        if self.light_samples == 0 {
            return Err(RenderError::InvalidSettings(
                "light samples must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Estimates the radiance arriving at the camera along a ray.
pub trait Integrator: Sync {
    /// Per-row working memory, reused across the pixels of a row.
    type Scratch: Default;

    fn incident_radiance(
        &self, scene: &Scene, ray: Ray, sampler: &mut Sampler, scratch: &mut Self::Scratch,
    ) -> Color;
}

/// Renders every pixel of `camera`'s film. Rows are split into contiguous bands, one per worker
/// thread. Each row draws from its own random stream, so the image only depends on the seed.
pub fn render<I: Integrator>(
    integrator: &I, scene: &Scene, camera: &Camera, settings: &RenderSettings,
) -> Result<Film, RenderError> {
    settings.validate()?;
    let (width, height) = camera.resolution();
    if width == 0 || height == 0 {
        return Err(RenderError::InvalidSettings("camera film has no pixels".into()));
    }

    let mut film = Film::new(width, height);
    let workers = rayon::current_num_threads().max(1);
    let rows_per_band = (height as usize + workers - 1) / workers;
    log::info!(
        "rendering {}x{} at {} spp, {} bands of {} rows",
        width,
        height,
        settings.spp,
        (height as usize + rows_per_band - 1) / rows_per_band,
        rows_per_band
    );

    let progress = if settings.show_progress {
        ProgressBar::new(height as u64)
    } else {
        ProgressBar::hidden()
    };
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{elapsed_precise} [{bar:40}] {pos}/{len} rows ({eta})")
            .progress_chars("=> "),
    );

    let start = Instant::now();
    film.pixels_mut()
        .par_chunks_mut(rows_per_band * width as usize)
        .enumerate()
        .for_each(|(band, pixels)| {
            let mut scratch = I::Scratch::default();
            for (i, row_pixels) in pixels.chunks_mut(width as usize).enumerate() {
                let row = (band * rows_per_band + i) as u32;
                let mut sampler = Sampler::for_stream(settings.seed, row as u64);
                for (col, pixel) in row_pixels.iter_mut().enumerate() {
                    *pixel += render_pixel(
                        integrator,
                        scene,
                        camera,
                        (row, col as u32),
                        settings.spp,
                        &mut sampler,
                        &mut scratch,
                    );
                }
                progress.inc(1);
            }
        });
    progress.finish_and_clear();
    log::info!("rendering took {:.2?}", start.elapsed());
    Ok(film)
}

/// Averages `spp` estimates, each of which averages the pixel's anti-aliasing sub-rays.
fn render_pixel<I: Integrator>(
    integrator: &I, scene: &Scene, camera: &Camera, (row, col): (u32, u32), spp: u32,
    sampler: &mut Sampler, scratch: &mut I::Scratch,
) -> Color {
    let mut total = Color::black();
    for _ in 0..spp {
        let rays = camera.shoot_subpixel_rays(row, col, sampler);
        let radiances: Vec<Color> = rays
            .into_iter()
            .map(|ray| integrator.incident_radiance(scene, ray, sampler, scratch))
            .collect();
        total += Color::average(&radiances);
    }
    total / spp as f32
}

/// Terminates a path with probability `max(0.1, 1 - max_channel(throughput))`, using `u` as the
/// uniform sample. Survivors get their throughput divided by the survival probability, so the
/// expected throughput is unchanged.
pub fn russian_roulette(throughput: Color, u: f32) -> Option<Color> {
    let q = (1.0 - throughput.max_channel()).max(0.1);
    if u < q {
        None
    } else {
        Some(throughput / (1.0 - q))
    }
}
