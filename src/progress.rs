//! Progress-callback trait for per-codec decode events.
//!
//! Inject an [`Arc<dyn DecodeProgressCallback>`] via
//! [`crate::config::DecodeConfigBuilder::progress_callback`] to observe a run
//! as it tries each codec and saves each image. Callbacks are purely
//! observational: nothing they do changes which outcomes are produced.
//!
//! # Example
//!
//! ```rust
//! use base2img::{CodecKind, DecodeConfig, DecodeProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     matches: AtomicUsize,
//! }
//!
//! impl DecodeProgressCallback for CountingCallback {
//!     fn on_codec_match(&self, codec: CodecKind, format_tag: &str, byte_length: usize) {
//!         self.matches.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{codec}: {format_tag} ({byte_length} bytes)");
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { matches: AtomicUsize::new(0) });
//!
//! let config = DecodeConfig::builder()
//!     .progress_callback(counter as Arc<dyn DecodeProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use crate::pipeline::codecs::CodecKind;
use std::path::Path;
use std::sync::Arc;

/// Called by the decode pipeline as it works through the registry.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Events arrive in registry order on the calling
/// thread.
pub trait DecodeProgressCallback: Send + Sync {
    /// Called once, after normalization, when at least one codec will run.
    ///
    /// # Arguments
    /// * `normalized_chars`: length of the text handed to each codec
    /// * `codec_count`     : registry entries about to be visited
    fn on_decode_start(&self, normalized_chars: usize, codec_count: usize) {
        let _ = (normalized_chars, codec_count);
    }

    /// Called just before a codec runs.
    fn on_codec_start(&self, codec: CodecKind) {
        let _ = codec;
    }

    /// Called when a codec's output classified as an image.
    fn on_codec_match(&self, codec: CodecKind, format_tag: &str, byte_length: usize) {
        let _ = (codec, format_tag, byte_length);
    }

    /// Called when a codec failed to decode, or decoded to a non-image.
    ///
    /// # Arguments
    /// * `reason`: human-readable description
    fn on_codec_reject(&self, codec: CodecKind, reason: &str) {
        let _ = (codec, reason);
    }

    /// Called instead of `on_codec_start` for a codec that cannot run in
    /// this build.
    fn on_codec_skipped(&self, codec: CodecKind) {
        let _ = codec;
    }

    /// Called once at the end of every run, including a blank input where
    /// no codec was visited.
    ///
    /// # Arguments
    /// * `attempted`: codecs that ran (skipped ones excluded)
    /// * `matched`  : outcomes produced
    fn on_decode_complete(&self, attempted: usize, matched: usize) {
        let _ = (attempted, matched);
    }

    /// Called after an outcome was written by an artifact sink.
    fn on_artifact_saved(&self, codec: CodecKind, path: &Path, byte_length: usize) {
        let _ = (codec, path, byte_length);
    }

    /// Called when an outcome could not be written.
    fn on_artifact_error(&self, codec: CodecKind, error: &str) {
        let _ = (codec, error);
    }
}

/// A no-op implementation for callers that don't need progress events.
///
/// This is the default when no callback is configured.
pub struct NoopProgressCallback;

impl DecodeProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::DecodeConfig`].
pub type ProgressCallback = Arc<dyn DecodeProgressCallback>;
