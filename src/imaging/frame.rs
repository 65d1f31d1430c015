use std::path::Path;

use anyhow::Context as _;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageReader};

use crate::foundation::error::{CamsnapResult, FetchError};

/// Decoded image held in memory during one composition operation.
#[derive(Clone, Debug, PartialEq)]
pub struct RasterFrame {
    image: DynamicImage,
}

impl RasterFrame {
    /// Wrap an already-decoded image.
    pub fn new(image: DynamicImage) -> Self {
        Self { image }
    }

    /// Decode the image stored at `path`, sniffing the format from its contents.
    pub fn open(path: &Path) -> Result<Self, FetchError> {
        let image = ImageReader::open(path)?
            .with_guessed_format()?
            .decode()
            .map_err(|e| FetchError::Decode(e.to_string()))?;
        Ok(Self { image })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// `(width, height)` in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }

    /// Borrow the decoded image.
    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    /// Take the decoded image.
    pub fn into_image(self) -> DynamicImage {
        self.image
    }

    /// Round-trip through JPEG at `quality` (1..=100), dropping any alpha channel.
    pub fn reencode_jpeg(self, quality: u8) -> CamsnapResult<Self> {
        let rgb = DynamicImage::ImageRgb8(self.image.into_rgb8());
        let mut buf = Vec::new();
        rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100)))
            .context("encode jpeg frame")?;
        let image = image::load_from_memory(&buf).context("decode re-encoded jpeg frame")?;
        Ok(Self { image })
    }
}

impl From<DynamicImage> for RasterFrame {
    fn from(image: DynamicImage) -> Self {
        Self::new(image)
    }
}
