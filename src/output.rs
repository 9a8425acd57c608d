//! Result types produced by a decode run.

use crate::error::{CodecError, PersistError};
use crate::pipeline::codecs::CodecKind;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A codec whose output passed image classification.
///
/// `bytes` is left out of JSON output; `byte_length` stays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeOutcome {
    pub codec: CodecKind,
    pub format_tag: String,
    pub byte_length: usize,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl DecodeOutcome {
    pub fn codec_name(&self) -> &'static str {
        self.codec.name()
    }
}

/// What happened when one codec was tried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AttemptStatus {
    /// Decoded, and the bytes are an image.
    Matched { format_tag: String, byte_length: usize },
    /// Decoded, but the bytes are not an image.
    NotAnImage { byte_length: usize },
    /// The text is not valid in this encoding.
    Failed { error: CodecError },
    /// The codec is not available in this build and was not run.
    Skipped,
}

/// One registry entry's result, in registry order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecAttempt {
    pub codec: CodecKind,
    #[serde(flatten)]
    pub status: AttemptStatus,
}

impl CodecAttempt {
    pub fn was_attempted(&self) -> bool {
        !matches!(self.status, AttemptStatus::Skipped)
    }
}

/// Aggregate counters for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeStats {
    /// Characters in the raw input.
    pub raw_chars: usize,
    /// Characters left after whitespace removal.
    pub normalized_chars: usize,
    /// Codecs that actually ran.
    pub attempted: usize,
    pub matched: usize,
    /// Codecs not run because their support is missing.
    pub skipped: usize,
    pub duration_ms: u64,
}

/// Everything a decode run produced.
///
/// `attempts` is empty when the input normalized to nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeReport {
    pub outcomes: Vec<DecodeOutcome>,
    pub attempts: Vec<CodecAttempt>,
    pub stats: DecodeStats,
}

impl DecodeReport {
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Codecs reported as skipped (capability missing), in registry order.
    pub fn skipped(&self) -> impl Iterator<Item = CodecKind> + '_ {
        self.attempts
            .iter()
            .filter(|a| !a.was_attempted())
            .map(|a| a.codec)
    }
}

/// The persistence result for one outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedArtifact {
    pub codec: CodecKind,
    pub format_tag: String,
    pub byte_length: usize,
    /// Final path when the write succeeded.
    pub path: Option<PathBuf>,
    pub error: Option<PersistError>,
}

impl SavedArtifact {
    pub fn is_saved(&self) -> bool {
        self.path.is_some()
    }
}

/// A decode run plus the artifacts written for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub report: DecodeReport,
    pub saved: Vec<SavedArtifact>,
}

impl RunSummary {
    pub fn saved_count(&self) -> usize {
        self.saved.iter().filter(|a| a.is_saved()).count()
    }
}
