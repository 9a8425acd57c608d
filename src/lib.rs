//! # base2img
//!
//! Recover an image hidden in a blob of text when the encoding is unknown.
//!
//! CTF challenges, pastebins and log dumps often carry an image as hex,
//! base32, base64, Ascii85 or basE91 text with no hint which one. This crate
//! tries all of them and keeps only the decodings that turn out to be real,
//! fully decodable images.
//!
//! ## Pipeline Overview
//!
//! ```text
//! text
//!  │
//!  ├─ 1. Normalize  remove every whitespace character
//!  ├─ 2. Decode     base16 → base32 → base64 → base85 → base91
//!  ├─ 3. Classify   full image decode (png, jpeg, gif, bmp, tiff, webp, …)
//!  └─ 4. Report     every match, in codec order; optionally saved to disk
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use base2img::{decode_candidates, decode_file_to_dir, DecodeConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Pure: text in, outcomes out.
//!     let text = std::fs::read_to_string("blob.txt")?;
//!     for outcome in decode_candidates(&text) {
//!         println!("{} -> {} ({} bytes)", outcome.codec, outcome.format_tag, outcome.byte_length);
//!     }
//!
//!     // Or read, decode and save in one call.
//!     let config = DecodeConfig::builder().output_dir("recovered").build()?;
//!     let summary = decode_file_to_dir("blob.txt", &config)?;
//!     eprintln!("saved {} image(s)", summary.saved_count());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature  | Default | Description |
//! |----------|---------|-------------|
//! | `cli`    | on      | Enables the `base2img` binary (clap + anyhow + tracing-subscriber + indicatif) |
//! | `base91` | on      | basE91 support; without it the codec is reported as skipped |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod decode;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod sink;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{DecodeConfig, DecodeConfigBuilder};
pub use decode::{
    decode_candidates, decode_file, decode_file_to_dir, decode_text, run_pipeline, save_outcomes,
};
pub use error::{Base2ImgError, CodecError, PersistError};
pub use output::{
    AttemptStatus, CodecAttempt, DecodeOutcome, DecodeReport, DecodeStats, RunSummary,
    SavedArtifact,
};
pub use pipeline::classify::{Classification, Classifier, ImageClassifier};
pub use pipeline::codecs::{Capabilities, CodecDescriptor, CodecKind, CodecRegistry};
pub use pipeline::normalize::normalize;
pub use progress::{DecodeProgressCallback, NoopProgressCallback, ProgressCallback};
pub use sink::{ArtifactSink, DirectorySink};
