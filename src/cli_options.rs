use crate::film::ImageFormat;
use crate::photonmapper::PhotonSettings;
use crate::render::RenderSettings;
use clap::Parser;
use scene::SceneName;
use std::path::PathBuf;

/// Light-transport algorithm used to produce the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum RendererKind {
    /// Unidirectional path tracing with next-event estimation.
    Pt,
    /// Photon tracing followed by density-estimation gathering.
    Pm,
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Offline Cornell-box renderer: path tracing and photon mapping")]
pub struct CliOptions {
    #[arg(long, value_enum, default_value_t = RendererKind::Pt, help = "Rendering algorithm")]
    pub renderer: RendererKind,

    #[arg(long, value_name = "NUM", default_value_t = 8, help = "Samples per pixel")]
    pub spp: u32,

    #[arg(long, value_name = "NUM", default_value_t = 50_000, help = "Caustic photons to store")]
    pub caustic_photons: usize,

    #[arg(
        long,
        value_name = "NUM",
        default_value_t = 10_000_000,
        help = "Indirect photons to store"
    )]
    pub indirect_photons: usize,

    #[arg(long, value_name = "NUM", default_value_t = 100, help = "Photons gathered per lookup")]
    pub neighbours: usize,

    #[arg(
        long,
        value_name = "PATH",
        default_value = "output",
        help = "Output path; the format's extension is appended"
    )]
    pub output: PathBuf,

    #[arg(long, value_enum, default_value_t = ImageFormat::Ppm, help = "Output image format")]
    pub format: ImageFormat,

    #[arg(long, default_value_t = SceneName::CboxBlocks, help = "Preset scene to render")]
    pub scene: SceneName,

    #[arg(long, value_name = "PIXELS", default_value_t = 512, help = "Image width")]
    pub width: u32,

    #[arg(long, value_name = "PIXELS", default_value_t = 512, help = "Image height")]
    pub height: u32,

    #[arg(long, value_name = "SEED", help = "Random seed; picked at random when absent")]
    pub seed: Option<u64>,

    #[arg(long, value_name = "NUM", help = "Worker threads; one per hardware thread by default")]
    pub threads: Option<usize>,

    #[arg(long, value_name = "NUM", default_value_t = 1, help = "Shadow samples per light")]
    pub light_samples: u32,

    #[arg(
        long,
        value_name = "NUM",
        default_value_t = PhotonSettings::default().max_paths,
        help = "Upper bound on emitted photon paths"
    )]
    pub max_photon_paths: usize,
}

impl CliOptions {
    /// Path of the image file, with the extension of the chosen format.
    pub fn output_path(&self) -> PathBuf {
        self.output.with_extension(self.format.extension())
    }

    pub fn render_settings(&self, seed: u64) -> RenderSettings {
        RenderSettings {
            resolution: (self.width, self.height),
            spp: self.spp,
            seed,
            light_samples: self.light_samples,
            photons: PhotonSettings {
                caustic: self.caustic_photons,
                indirect: self.indirect_photons,
                neighbours: self.neighbours,
                max_paths: self.max_photon_paths,
            },
            show_progress: true,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults_match_render_settings() {
        let options = CliOptions::try_parse_from(["rt-photon"]).unwrap();
        assert_eq!(options.renderer, RendererKind::Pt);
        assert_eq!(options.scene, SceneName::CboxBlocks);
        assert_eq!(options.output_path(), PathBuf::from("output.ppm"));

        let settings = options.render_settings(0);
        let defaults = RenderSettings::default();
        assert_eq!(settings.resolution, defaults.resolution);
        assert_eq!(settings.spp, defaults.spp);
        assert_eq!(settings.light_samples, defaults.light_samples);
        assert_eq!(settings.photons, defaults.photons);
    }

    #[test]
    fn parses_photon_mapping_flags() {
        let options = CliOptions::try_parse_from([
            "rt-photon",
            "--renderer",
            "pm",
            "--scene",
            "cbox_spheres",
            "--caustic-photons",
            "1000",
            "--format",
            "png",
            "--output",
            "renders/spheres",
        ])
        .unwrap();
        assert_eq!(options.renderer, RendererKind::Pm);
        assert_eq!(options.scene, SceneName::CboxSpheres);
        assert_eq!(options.caustic_photons, 1000);
        assert_eq!(options.output_path(), PathBuf::from("renders/spheres.png"));
    }

    #[test]
    fn rejects_unknown_scenes_and_flags() {
        assert!(CliOptions::try_parse_from(["rt-photon", "--scene", "teapot"]).is_err());
        assert!(CliOptions::try_parse_from(["rt-photon", "--spp", "many"]).is_err());
        assert!(CliOptions::try_parse_from(["rt-photon", "--use_single_thread"]).is_err());
    }
}
