use anyhow::{Context, Result};
use clap::Parser;
use rt_photon::cli_options::{CliOptions, RendererKind};
use rt_photon::{render, PathTracer, PhotonMapper};
use scene::preset::cornell_camera;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let options = CliOptions::parse();

    if let Some(threads) = options.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to set up the worker threads")?;
    }
    let seed = options.seed.unwrap_or_else(rand::random);
    log::info!("seed = {}", seed);
    let settings = options.render_settings(seed);
    settings.validate()?;

    let scene = options.scene.build();
    log::info!("scene {}: {}", options.scene, scene.summary());
    let camera = cornell_camera(settings.resolution).context("can't place the camera")?;

    let film = match options.renderer {
        RendererKind::Pt => {
            let path_tracer = PathTracer::new(settings.light_samples);
            render(&path_tracer, &scene, &camera, &settings)?
        }
        RendererKind::Pm => {
            let photon_mapper = PhotonMapper::new(&scene, &settings);
            render(&photon_mapper, &scene, &camera, &settings)?
        }
    };

    let path = options.output_path();
    film.save(&path, options.format)
        .with_context(|| format!("can't save {}", path.display()))?;
    Ok(())
}
