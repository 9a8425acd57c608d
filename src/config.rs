//! Configuration types for a decode run.
//!
//! The decode pipeline itself needs no configuration: given the standard
//! registry, [`crate::decode_candidates`] is a pure function of its text.
//! [`DecodeConfig`] collects everything around it: the codecs to try, the
//! input size limit and where matches are saved. No default path or
//! directory is ever read from global state.

use crate::error::Base2ImgError;
use crate::pipeline::codecs::CodecKind;
use crate::progress::ProgressCallback;
use std::fmt;
use std::path::PathBuf;

/// Configuration for a decode run.
///
/// Built via [`DecodeConfig::builder()`] or using [`DecodeConfig::default()`].
///
/// # Example
/// ```rust
/// use base2img::{CodecKind, DecodeConfig};
///
/// let config = DecodeConfig::builder()
///     .codecs([CodecKind::Base64, CodecKind::Base16])
///     .output_dir("recovered")
///     .build()
///     .unwrap();
/// assert_eq!(config.codecs, [CodecKind::Base64, CodecKind::Base16]);
/// ```
#[derive(Clone)]
pub struct DecodeConfig {
    /// Codecs to try. Default: all five.
    ///
    /// Always run in registry order (base16, base32, base64, base85, base91)
    /// whatever order they are listed in here.
    pub codecs: Vec<CodecKind>,

    /// Directory matched images are written to. Default: `decoded_images`.
    ///
    /// Created on first write.
    pub output_dir: PathBuf,

    /// chrono `strftime` pattern for the timestamp in output filenames.
    /// Default: `%Y%m%d_%H%M%S`.
    pub timestamp_format: String,

    /// Largest input file accepted, in bytes. Default: 64 MiB.
    ///
    /// The whole input is held in memory several times over (raw, normalized,
    /// one decoded buffer per codec), so the cap bounds peak memory.
    pub max_input_bytes: u64,

    /// Allocation cap for a single image decode during classification.
    /// If None, the `image` crate's default limit applies.
    pub max_image_alloc: Option<u64>,

    /// Observer for per-codec and per-artifact events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            codecs: CodecKind::ALL.to_vec(),
            output_dir: PathBuf::from("decoded_images"),
            timestamp_format: "%Y%m%d_%H%M%S".to_string(),
            max_input_bytes: 64 * 1024 * 1024,
            max_image_alloc: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for DecodeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodeConfig")
            .field("codecs", &self.codecs)
            .field("output_dir", &self.output_dir)
            .field("timestamp_format", &self.timestamp_format)
            .field("max_input_bytes", &self.max_input_bytes)
            .field("max_image_alloc", &self.max_image_alloc)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn DecodeProgressCallback>"),
            )
            .finish()
    }
}

impl DecodeConfig {
    /// Create a new builder for `DecodeConfig`.
    pub fn builder() -> DecodeConfigBuilder {
        DecodeConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`DecodeConfig`].
#[derive(Debug)]
pub struct DecodeConfigBuilder {
    config: DecodeConfig,
}

impl DecodeConfigBuilder {
    pub fn codecs(mut self, codecs: impl IntoIterator<Item = CodecKind>) -> Self {
        self.config.codecs = codecs.into_iter().collect();
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.config.timestamp_format = format.into();
        self
    }

    pub fn max_input_bytes(mut self, n: u64) -> Self {
        self.config.max_input_bytes = n;
        self
    }

    pub fn max_image_alloc(mut self, bytes: u64) -> Self {
        self.config.max_image_alloc = Some(bytes);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<DecodeConfig, Base2ImgError> {
        let c = &self.config;
        if c.codecs.is_empty() {
            return Err(Base2ImgError::InvalidConfig(
                "at least one codec must be selected".into(),
            ));
        }
        if c.timestamp_format.trim().is_empty() {
            return Err(Base2ImgError::InvalidConfig(
                "timestamp format must not be empty".into(),
            ));
        }
        crate::sink::validate_timestamp_format(&c.timestamp_format)?;
        if c.max_input_bytes == 0 {
            return Err(Base2ImgError::InvalidConfig(
                "max input size must be at least 1 byte".into(),
            ));
        }
        if c.output_dir.as_os_str().is_empty() {
            return Err(Base2ImgError::InvalidConfig(
                "output directory must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}
