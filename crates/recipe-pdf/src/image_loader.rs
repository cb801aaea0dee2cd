//! Best-effort hero image loading
//!
//! The loader fetches an image, decodes it, and re-encodes it as a JPEG ready
//! to embed. Every failure is logged and turned into `None`; a missing image
//! never stops a document from being generated.

use crate::options::ExportOptions;
use crate::types::{RecipePdfError, Result};
use image::codecs::jpeg::JpegEncoder;
use log::{debug, warn};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Why an image could not be used. Only ever logged, never returned to
/// callers of the export pipeline.
#[derive(Error, Debug)]
pub enum ImageUnavailable {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("read failed: {0}")]
    Read(#[from] std::io::Error),
    #[error("decode failed: {0}")]
    Decode(#[from] image::ImageError),
    #[error("image has no pixels")]
    Empty,
    #[error("task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

/// A decoded image, re-encoded as JPEG for embedding
#[derive(Debug, Clone, PartialEq)]
pub struct HeroImage {
    jpeg: Vec<u8>,
    width: u32,
    height: u32,
}

impl HeroImage {
    /// Decode any supported image format and re-encode it as JPEG
    pub fn from_image_bytes(
        bytes: &[u8],
        quality: u8,
    ) -> std::result::Result<Self, ImageUnavailable> {
        let decoded = image::load_from_memory(bytes)?;
        let rgb = decoded.to_rgb8();
        if rgb.width() == 0 || rgb.height() == 0 {
            return Err(ImageUnavailable::Empty);
        }

        let mut jpeg = Vec::new();
        {
            let mut encoder = JpegEncoder::new_with_quality(&mut jpeg, quality.clamp(1, 100));
            encoder.encode_image(&rgb)?;
        }

        Ok(Self {
            jpeg,
            width: rgb.width(),
            height: rgb.height(),
        })
    }

    pub fn jpeg(&self) -> &[u8] {
        &self.jpeg
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Fetches hero images over HTTP(S) or from the local filesystem
#[derive(Debug, Clone)]
pub struct ImageLoader {
    client: Client,
    timeout: Duration,
    quality: u8,
}

impl ImageLoader {
    pub fn new(timeout: Duration, quality: u8) -> Result<Self> {
        // A zero timeout would fail every fetch
        if timeout.is_zero() {
            return Err(RecipePdfError::Config(
                "Image timeout must be greater than zero".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("recipe-pdf/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RecipePdfError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            timeout,
            quality,
        })
    }

    pub fn from_options(options: &ExportOptions) -> Result<Self> {
        Self::new(options.image_timeout(), options.image_quality)
    }

    /// Load and re-encode the image at `location`.
    ///
    /// `location` is an `http(s)://` URL, a `file://` URL, or a plain path.
    /// Returns `None` on any failure, including running past the timeout.
    pub async fn load(&self, location: &str) -> Option<HeroImage> {
        let location = location.trim();
        if location.is_empty() {
            return None;
        }

        match tokio::time::timeout(self.timeout, self.fetch_and_encode(location)).await {
            Ok(Ok(image)) => {
                debug!(
                    "Loaded hero image {} ({}x{}, {} bytes as JPEG)",
                    location,
                    image.width,
                    image.height,
                    image.jpeg.len()
                );
                Some(image)
            }
            Ok(Err(e)) => {
                warn!("Skipping hero image {}: {}", location, e);
                None
            }
            Err(_) => {
                warn!(
                    "Skipping hero image {}: timed out after {:?}",
                    location, self.timeout
                );
                None
            }
        }
    }

    async fn fetch_and_encode(
        &self,
        location: &str,
    ) -> std::result::Result<HeroImage, ImageUnavailable> {
        let bytes = self.fetch(location).await?;
        let quality = self.quality;

        // Decoding and encoding are CPU-bound, spawn blocking
        tokio::task::spawn_blocking(move || HeroImage::from_image_bytes(&bytes, quality)).await?
    }

    async fn fetch(&self, location: &str) -> std::result::Result<Vec<u8>, ImageUnavailable> {
        if location.starts_with("http://") || location.starts_with("https://") {
            let response = self.client.get(location).send().await?.error_for_status()?;
            return Ok(response.bytes().await?.to_vec());
        }

        let path = location.strip_prefix("file://").unwrap_or(location);
        Ok(tokio::fs::read(path).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = image::RgbImage::from_pixel(width, height, image::Rgb([200, 120, 40]));
        let mut bytes = std::io::Cursor::new(Vec::new());
        image
            .write_to(&mut bytes, image::ImageFormat::Png)
            .unwrap();
        bytes.into_inner()
    }

    #[test]
    fn test_reencodes_png_as_jpeg() {
        let hero = HeroImage::from_image_bytes(&png_bytes(40, 20), 85).unwrap();
        assert_eq!(hero.width(), 40);
        assert_eq!(hero.height(), 20);
        assert_eq!(hero.aspect_ratio(), 2.0);
        // JPEG SOI marker
        assert_eq!(&hero.jpeg()[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_garbage_is_a_decode_error() {
        let result = HeroImage::from_image_bytes(b"definitely not an image", 85);
        assert!(matches!(result, Err(ImageUnavailable::Decode(_))));
    }

    #[tokio::test]
    async fn test_blank_location_is_skipped() {
        let loader = ImageLoader::new(Duration::from_secs(1), 85).unwrap();
        assert!(loader.load("   ").await.is_none());
    }

    #[tokio::test]
    async fn test_missing_local_file_is_skipped() {
        let loader = ImageLoader::new(Duration::from_secs(1), 85).unwrap();
        assert!(loader.load("file:///nonexistent/hero.png").await.is_none());
    }
}
