use crate::error::RenderError;
use itertools::Itertools;
use radiometry::color::Color;
use std::path::Path;

/// Output image encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ImageFormat {
    /// Plain-text `P3` portable pixmap.
    Ppm,
    Png,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Ppm => "ppm",
            Self::Png => "png",
        }
    }
}

/// Row-major RGB pixel buffer. Row 0 is the top of the image.
#[derive(Debug, Clone, PartialEq)]
pub struct Film {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl Film {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::black(); width as usize * height as usize],
        }
    }

    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn index(&self, row: u32, col: u32) -> usize {
        assert!(row < self.height && col < self.width, "pixel ({}, {}) off the film", row, col);
        (row * self.width + col) as usize
    }

    pub fn pixel(&self, row: u32, col: u32) -> Color {
        self.pixels[self.index(row, col)]
    }

    /// All pixels, row after row. Renderers split this into disjoint bands of rows.
    pub fn pixels_mut(&mut self) -> &mut [Color] {
        &mut self.pixels
    }

    /// Encodes as `P3`: a header of format tag, dimensions and max value, followed by one
    /// "r g b" triple per pixel. Channels are clamped to [0, 1] before scaling to 255.
    pub fn encode_ppm(&self) -> Vec<u8> {
        let mut text = format!("P3\n{} {}\n255\n", self.width, self.height);
        for row in self.pixels.chunks(self.width.max(1) as usize) {
            let line = row
                .iter()
                .map(|c| {
                    let [r, g, b] = c.to_u8();
                    format!("{} {} {}", r, g, b)
                })
                .join(" ");
            text.push_str(&line);
            text.push('\n');
        }
        text.into_bytes()
    }

    pub fn encode_png(&self) -> Result<Vec<u8>, RenderError> {
        let data: Vec<u8> = self.pixels.iter().flat_map(|c| c.to_u8()).collect();
        let mut bytes = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut bytes, self.width, self.height);
            encoder.set_color(png::ColorType::RGB);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header()?;
            writer.write_image_data(&data)?;
        }
        Ok(bytes)
    }

    pub fn encode(&self, format: ImageFormat) -> Result<Vec<u8>, RenderError> {
        match format {
            ImageFormat::Ppm => Ok(self.encode_ppm()),
            ImageFormat::Png => self.encode_png(),
        }
    }

    /// Encodes the whole image in memory, then writes it with a single call.
    pub fn save(&self, path: &Path, format: ImageFormat) -> Result<(), RenderError> {
        let bytes = self.encode(format)?;
        std::fs::write(path, bytes).map_err(|source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("image saved to {}", path.display());
        Ok(())
    }
}
