//! Image classification: does a decoded byte buffer hold a real image?
//!
//! Magic-byte sniffing alone is not enough. Garbage that happens to start
//! with `\x89PNG` would be accepted, and so would a valid header followed by a
//! truncated payload. The classifier therefore recognises the container from
//! its signature and then decodes the whole image; only a complete decode
//! counts as a valid image. The format tag always comes from the bytes, never
//! from the codec name or a file extension.

use image::{ImageFormat, ImageReader, Limits};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, warn};

/// Buffers shorter than this cannot hold any supported image.
pub const MIN_IMAGE_LEN: usize = 8;

/// Verdict on one decoded buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub is_valid_image: bool,
    /// Lower-case format name (`png`, `jpeg`, …) when `is_valid_image`.
    pub format_tag: Option<String>,
}

impl Classification {
    pub fn image(format_tag: impl Into<String>) -> Self {
        Self {
            is_valid_image: true,
            format_tag: Some(format_tag.into()),
        }
    }

    pub fn rejected() -> Self {
        Self {
            is_valid_image: false,
            format_tag: None,
        }
    }
}

/// Decides whether bytes are an image.
///
/// The decode pipeline takes any implementation, so callers can restrict or
/// extend what counts as an image. Implementations must not panic.
pub trait Classifier: Send + Sync {
    fn classify(&self, bytes: &[u8]) -> Classification;
}

/// [`Classifier`] backed by the `image` crate's full decoders.
#[derive(Debug, Clone, Default)]
pub struct ImageClassifier {
    limits: Limits,
}

impl ImageClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the memory a single image decode may allocate.
    pub fn with_max_alloc(max_alloc: u64) -> Self {
        let mut limits = Limits::default();
        limits.max_alloc = Some(max_alloc);
        Self { limits }
    }

    fn verify(&self, bytes: &[u8]) -> Result<ImageFormat, String> {
        let mut reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| e.to_string())?;
        let format = reader
            .format()
            .ok_or_else(|| "no known image signature".to_string())?;
        reader.limits(self.limits.clone());
        reader.decode().map_err(|e| e.to_string())?;
        Ok(format)
    }
}

impl Classifier for ImageClassifier {
    fn classify(&self, bytes: &[u8]) -> Classification {
        if bytes.len() < MIN_IMAGE_LEN {
            debug!("{} bytes is below the minimal image size", bytes.len());
            return Classification::rejected();
        }

        // Decoders run on untrusted bytes; a decoder panic is one more way
        // for a candidate to not be an image.
        match panic::catch_unwind(AssertUnwindSafe(|| self.verify(bytes))) {
            Ok(Ok(format)) => Classification::image(format_tag(format)),
            Ok(Err(reason)) => {
                debug!("Not an image ({} bytes): {}", bytes.len(), reason);
                Classification::rejected()
            }
            Err(_) => {
                warn!("Image decoder panicked on a {}-byte candidate", bytes.len());
                Classification::rejected()
            }
        }
    }
}

/// Lower-case name for a detected format.
pub fn format_tag(format: ImageFormat) -> String {
    let tag = match format {
        ImageFormat::Png => "png",
        ImageFormat::Jpeg => "jpeg",
        ImageFormat::Gif => "gif",
        ImageFormat::Bmp => "bmp",
        ImageFormat::Tiff => "tiff",
        ImageFormat::WebP => "webp",
        ImageFormat::Ico => "ico",
        ImageFormat::Pnm => "pnm",
        ImageFormat::Qoi => "qoi",
        other => return format!("{other:?}").to_ascii_lowercase(),
    };
    tag.to_string()
}
