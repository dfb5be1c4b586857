//! Candidate portrait normalization: locally supplied images are shrunk and
//! re-encoded before they are submitted with an add-candidate command, so
//! the ledger only ever stores a small, embeddable payload. Deterministic
//! for identical input bytes and target constants.

use data_encoding::BASE64;
use image::{codecs::jpeg::JpegEncoder, imageops::FilterType, GenericImageView};

use crate::config::Config;
use crate::error::{Error, Result};

pub struct PortraitNormalizer {
    max_dimension: u32,
    quality: f32,
}

impl PortraitNormalizer {
    pub fn new(config: &Config) -> Self {
        Self {
            max_dimension: config.portrait_max_dimension(),
            // Quality is a factor in (0, 1]; out-of-range config values are
            // clamped rather than wrapped at the u8 conversion below.
            quality: config.portrait_quality().clamp(0.01, 1.0),
        }
    }

    /// Normalize raw image bytes into a `data:image/jpeg;base64,` payload.
    ///
    /// Images whose larger side exceeds the target are scaled down
    /// preserving aspect ratio so the larger side becomes exactly the
    /// target; smaller images keep their dimensions (never scaled up).
    pub fn normalize(&self, bytes: &[u8], media_type: &str) -> Result<String> {
        if !media_type.starts_with("image/") {
            return Err(Error::Validation(format!(
                "Expected an image, got {media_type}"
            )));
        }

        // A declared image/* payload that fails to decode is still caller
        // error, so it surfaces as a validation failure.
        let decoded = image::load_from_memory(bytes)
            .map_err(|err| Error::Validation(format!("Could not decode image: {err}")))?;
        let resized = if decoded.width().max(decoded.height()) > self.max_dimension {
            decoded.resize(self.max_dimension, self.max_dimension, FilterType::Triangle)
        } else {
            decoded
        };

        // JPEG output: flatten any alpha first.
        let rgb = resized.into_rgb8();
        let mut encoded = Vec::new();
        let quality = (self.quality * 100.0).round() as u8;
        JpegEncoder::new_with_quality(&mut encoded, quality).encode_image(&rgb)?;

        Ok(format!("data:image/jpeg;base64,{}", BASE64.encode(&encoded)))
    }
}
