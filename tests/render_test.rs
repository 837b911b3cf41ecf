use geometry::bxdf::Bsdf;
use geometry::ray::Ray;
use geometry::sampling::Sampler;
use geometry::AffineTransform;
use light::PointLight;
use math::hcm::{Point3, Vec3};
use radiometry::color::Color;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rt_photon::photonmapper::trace_photons;
use rt_photon::render::russian_roulette;
use rt_photon::{render, Integrator, PathTracer, PhotonMapper, PhotonSettings, RenderSettings};
use scene::preset::cornell_camera;
use scene::{SceneName, Scene};
use shape::Plane;
use std::f32::consts::PI;

/// A gray diffuse floor at y = 0 lit by a point light one unit above the origin. The intensity
/// makes the radiance straight below the light exactly 1.
fn lit_floor() -> Scene {
    let mut scene = Scene::new();
    scene.add_object(Plane::new(&AffineTransform::identity()), Bsdf::lambertian(Color::gray(0.5)));
    scene.add_light(PointLight::new(Point3::new(0.0, 1.0, 0.0), Color::gray(2.0 * PI)));
    scene
}

fn quiet_settings(resolution: (u32, u32), spp: u32, seed: u64) -> RenderSettings {
    RenderSettings {
        resolution,
        spp,
        seed,
        show_progress: false,
        photons: PhotonSettings {
            caustic: 500,
            indirect: 5000,
            neighbours: 20,
            max_paths: 1_000_000,
        },
        ..RenderSettings::default()
    }
}

#[test]
fn point_light_falls_off_and_leaves_the_back_dark() {
    let scene = lit_floor();
    let tracer = PathTracer::new(1);
    let mut sampler = Sampler::new(1);
    let radiance_below = |x: f32, sampler: &mut Sampler| {
        let ray = Ray::new(Point3::new(x, 0.5, 0.0), -Vec3::Y);
        tracer.incident_radiance(&scene, ray, sampler, &mut ())
    };

    let center = radiance_below(0.0, &mut sampler);
    assert!((center.r - 1.0).abs() < 1e-3, "{}", center);
    let mut previous = center.r;
    for &x in [0.5f32, 1.0, 2.0, 4.0].iter() {
        let l = radiance_below(x, &mut sampler);
        // f * cos * I / d^2 with d^2 = 1 + x^2 and cos = 1 / d.
        let expected = 1.0 / (1.0 + x * x).powf(1.5);
        assert!((l.g - expected).abs() < 1e-3, "x = {}: {} vs {}", x, l, expected);
        assert!(l.g < previous);
        previous = l.g;
    }

    let from_behind = Ray::new(Point3::new(0.0, -1.0, 0.0), Vec3::Y);
    let behind = tracer.incident_radiance(&scene, from_behind, &mut sampler, &mut ());
    assert!(behind.is_black(), "{}", behind);
}

#[test]
fn fixed_seed_renders_are_identical() {
    let scene = SceneName::CboxBlocks.build();
    let settings = quiet_settings((12, 12), 1, 2024);
    let camera = cornell_camera(settings.resolution).unwrap();
    let tracer = PathTracer::new(settings.light_samples);

    let render_with_threads = |threads: usize| {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .unwrap()
            .install(|| render(&tracer, &scene, &camera, &settings).unwrap())
    };
    let first = render_with_threads(1);
    let second = render_with_threads(3);
    assert_eq!(first, second);
    assert_eq!(first, render_with_threads(3));

    let center = first.pixel(6, 6);
    assert!(center.is_finite() && !center.is_black(), "{}", center);
}

#[test]
fn caustic_quota_without_glass_still_terminates() {
    let scene = SceneName::CboxBlocks.build();
    let settings = PhotonSettings {
        caustic: 1000,
        indirect: 3000,
        neighbours: 10,
        max_paths: 1_000_000,
    };
    let traced = trace_photons(&scene, &settings, &mut Sampler::new(9));
    assert!(traced.caustic.is_empty());
    assert_eq!(traced.indirect.len(), 3000);
    assert!(traced.emitted < settings.max_paths);
    assert!(traced.indirect.iter().all(|p| p.power.is_finite() && !p.power.is_black()));
}

#[test]
fn glass_focuses_caustic_photons() {
    let scene = SceneName::CboxSpheres.build();
    let settings = PhotonSettings {
        caustic: 200,
        indirect: 200,
        neighbours: 10,
        max_paths: 1_000_000,
    };
    let traced = trace_photons(&scene, &settings, &mut Sampler::new(4));
    assert_eq!(traced.caustic.len(), 200);
    assert_eq!(traced.indirect.len(), 200);
}

#[test]
fn photon_tracing_stops_at_the_path_cap() {
    let scene = SceneName::CboxBlocks.build();
    let settings = PhotonSettings {
        caustic: 0,
        indirect: 1_000_000,
        neighbours: 10,
        max_paths: 300,
    };
    let traced = trace_photons(&scene, &settings, &mut Sampler::new(2));
    assert_eq!(traced.emitted, 300);
    assert!(traced.indirect.len() < 1_000_000);

    let dark = Scene::new();
    let traced = trace_photons(&dark, &settings, &mut Sampler::new(2));
    assert_eq!(traced.emitted, 0);
}

#[test]
fn photon_mapper_renders_the_box() {
    let scene = SceneName::CboxSpheres.build();
    let settings = quiet_settings((8, 8), 1, 3);
    let camera = cornell_camera(settings.resolution).unwrap();
    let mapper = PhotonMapper::new(&scene, &settings);
    assert!(mapper.emitted() > 0);
    assert_eq!(mapper.photon_map().len(), 5500);

    let film = render(&mapper, &scene, &camera, &settings).unwrap();
    let (width, height) = film.resolution();
    for row in 0..height {
        for col in 0..width {
            let c = film.pixel(row, col);
            assert!(c.is_finite() && c.r >= 0.0 && c.g >= 0.0 && c.b >= 0.0, "{}", c);
        }
    }
    assert!(!film.pixel(4, 4).is_black());
}

#[test]
fn russian_roulette_is_unbiased() {
    let mut rng = StdRng::seed_from_u64(31);
    let throughput = Color::new(0.3, 0.2, 0.1);
    let trials = 200_000;
    let total: Color = (0..trials)
        .filter_map(|_| russian_roulette(throughput, rng.gen()))
        .sum();
    let mean = total / trials as f32;
    assert!((mean.r - 0.3).abs() < 0.01, "{}", mean);
    assert!((mean.b - 0.1).abs() < 0.005, "{}", mean);
}
