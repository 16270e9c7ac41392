//! Image payloads attached to nodes.
//!
//! Decoding happens in the host; the engine only needs the encoded bytes
//! (for cache keys) and the decoded pixel dimensions (for sizing).

use sha2::{Digest, Sha256};

/// Default bounding box images are subsampled into for display.
pub const MAX_IMAGE_WIDTH: u32 = 200;
pub const MAX_IMAGE_HEIGHT: u32 = 200;

/// An encoded image plus its decoded pixel size.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImagePayload {
    /// Encoded image bytes as stored in the document
    pub data: Vec<u8>,
    /// Decoded width in pixels
    pub width: u32,
    /// Decoded height in pixels
    pub height: u32,
}

impl ImagePayload {
    pub fn new(data: impl Into<Vec<u8>>, width: u32, height: u32) -> Self {
        Self {
            data: data.into(),
            width,
            height,
        }
    }

    /// Hex digest of the encoded bytes (first 96 bits of SHA-256).
    ///
    /// Used instead of the bytes themselves when keying caches.
    pub fn content_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.data);
        let result = hasher.finalize();
        hex::encode(&result[..12])
    }

    /// Size the image is displayed at once subsampled into `max_width` x `max_height`.
    pub fn display_size(&self, max_width: u32, max_height: u32) -> (u32, u32) {
        let factor = subsample_factor(self.width, self.height, max_width, max_height);
        (self.width / factor, self.height / factor)
    }
}

/// Smallest integer sampling rate that fits `width` x `height` into the box.
///
/// Returns 1 when the image already fits. A zero-sized box is treated as 1.
pub fn subsample_factor(width: u32, height: u32, max_width: u32, max_height: u32) -> u32 {
    let max_width = max_width.max(1);
    let max_height = max_height.max(1);
    if width <= max_width && height <= max_height {
        return 1;
    }
    let sample_x = width.div_ceil(max_width);
    let sample_y = height.div_ceil(max_height);
    sample_x.max(sample_y)
}
