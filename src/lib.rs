/// Command-line options and their conversion into `RenderSettings`.
pub mod cli_options;
/// Next-event estimation shared by both renderers.
pub mod directlighting;
pub mod error;
/// Pixel buffer and PPM / PNG output.
pub mod film;
pub mod pathintegrator;
/// Static k-d tree over photons with k-nearest queries.
pub mod photonmap;
pub mod photonmapper;
/// Band-parallel pixel loop and the `Integrator` trait.
pub mod render;

pub use error::RenderError;
pub use film::{Film, ImageFormat};
pub use pathintegrator::PathTracer;
pub use photonmapper::{PhotonMapper, PhotonSettings};
pub use render::{render, Integrator, RenderSettings};
