//! Error types for the base2img library.
//!
//! Three error types reflect three distinct failure modes:
//!
//! * [`Base2ImgError`]: **Fatal**: the run cannot start at all (input file
//!   missing, not text, too large, bad configuration). Returned as
//!   `Err(Base2ImgError)` from the file-based entry points, always before the
//!   decode pipeline sees any text.
//!
//! * [`CodecError`]: **Non-fatal**: one codec could not turn the normalized
//!   text into bytes. Recorded in [`crate::output::AttemptStatus::Failed`] and
//!   the pipeline moves on to the next codec.
//!
//! * [`PersistError`]: **Non-fatal**: one decoded image could not be written.
//!   Stored in [`crate::output::SavedArtifact`] so the remaining images are
//!   still saved.
//!
//! A run that finds no image is not an error of any kind: it returns an empty
//! outcome list.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the base2img library.
#[derive(Debug, Error)]
pub enum Base2ImgError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Input file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file was read but is not valid UTF-8 text.
    #[error("Input '{path}' is not UTF-8 text: {detail}\nEncoded images must be supplied as text.")]
    NotText { path: PathBuf, detail: String },

    /// The file is larger than the configured input limit.
    #[error("Input '{path}' is {size} bytes, above the {limit}-byte limit\nRaise it with --max-input-bytes.")]
    InputTooLarge { path: PathBuf, size: u64, limit: u64 },

    /// Any other I/O failure while reading the input.
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// A non-fatal failure of a single codec.
///
/// Offsets are byte offsets into the normalized text handed to the codec.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum CodecError {
    /// Nothing left to decode after normalization (and prefix stripping).
    #[error("input is empty")]
    EmptyInput,

    /// A character outside the codec's alphabet.
    #[error("invalid character {ch:?} at offset {offset}")]
    InvalidCharacter { ch: char, offset: usize },

    /// The text length cannot be produced by this encoding.
    #[error("invalid length {len}")]
    InvalidLength { len: usize },

    /// Padding characters are missing, misplaced or miscounted.
    #[error("incorrect padding")]
    InvalidPadding,

    /// A group decodes to something the encoding cannot represent.
    #[error("malformed group at offset {offset}: {detail}")]
    MalformedGroup { offset: usize, detail: String },

    /// The codec's support is not compiled into this build.
    #[error("codec '{codec}' is not available in this build")]
    Unavailable { codec: String },
}

impl CodecError {
    /// Build an [`CodecError::InvalidCharacter`] for the character starting at
    /// byte `offset` of `input`.
    pub(crate) fn invalid_char(input: &str, offset: usize) -> Self {
        let ch = input
            .get(offset..)
            .and_then(|rest| rest.chars().next())
            .unwrap_or(char::REPLACEMENT_CHARACTER);
        CodecError::InvalidCharacter { ch, offset }
    }
}

/// A non-fatal failure to persist one decoded image.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
pub enum PersistError {
    /// The output directory could not be created.
    #[error("Failed to create output directory '{path}': {detail}")]
    CreateDirFailed { path: PathBuf, detail: String },

    /// The image file could not be written.
    #[error("Failed to write '{path}': {detail}")]
    WriteFailed { path: PathBuf, detail: String },
}
