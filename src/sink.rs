//! Artifact sinks: where matched images go.
//!
//! The decode pipeline never touches the filesystem. Persisting is a side
//! effect layered on top through [`ArtifactSink`], and each outcome is
//! persisted independently so one failed write does not stop the rest.

use crate::error::{Base2ImgError, PersistError};
use crate::output::DecodeOutcome;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local};
use std::path::PathBuf;
use tracing::{debug, info};

/// Persists one decoded image and returns where it ended up.
pub trait ArtifactSink {
    fn persist(&self, outcome: &DecodeOutcome) -> Result<PathBuf, PersistError>;
}

/// File extension (with dot) for a format tag. Unknown tags get `.bin`.
pub fn extension_for(format_tag: &str) -> &'static str {
    match format_tag.to_ascii_lowercase().as_str() {
        "png" => ".png",
        "jpeg" | "jpg" => ".jpg",
        "gif" => ".gif",
        "bmp" => ".bmp",
        "tiff" => ".tiff",
        "webp" => ".webp",
        _ => ".bin",
    }
}

/// Check a chrono `strftime` pattern without formatting anything.
pub fn validate_timestamp_format(format: &str) -> Result<(), Base2ImgError> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(Base2ImgError::InvalidConfig(format!(
            "invalid timestamp format '{format}'"
        )));
    }
    Ok(())
}

/// Writes images into a directory as `{codec}_{timestamp}{ext}`.
///
/// The directory is created on the first write. Each file is written to a
/// temporary name and renamed into place, so a failed write never leaves a
/// half-written image under the final name.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
    timestamp_format: String,
}

impl DirectorySink {
    pub fn new(
        dir: impl Into<PathBuf>,
        timestamp_format: impl Into<String>,
    ) -> Result<Self, Base2ImgError> {
        let timestamp_format = timestamp_format.into();
        validate_timestamp_format(&timestamp_format)?;
        Ok(Self {
            dir: dir.into(),
            timestamp_format,
        })
    }

    /// Filename for `outcome` if it were written at `now`.
    pub fn file_name(&self, outcome: &DecodeOutcome, now: DateTime<Local>) -> String {
        format!(
            "{}_{}{}",
            outcome.codec_name(),
            now.format(&self.timestamp_format),
            extension_for(&outcome.format_tag)
        )
    }
}

impl ArtifactSink for DirectorySink {
    fn persist(&self, outcome: &DecodeOutcome) -> Result<PathBuf, PersistError> {
        if !self.dir.exists() {
            std::fs::create_dir_all(&self.dir).map_err(|e| PersistError::CreateDirFailed {
                path: self.dir.clone(),
                detail: e.to_string(),
            })?;
            info!("Created output directory: {}", self.dir.display());
        }

        let path = self.dir.join(self.file_name(outcome, Local::now()));
        let write_failed = |e: std::io::Error| PersistError::WriteFailed {
            path: path.clone(),
            detail: e.to_string(),
        };

        let mut tmp_name = path.clone().into_os_string();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        std::fs::write(&tmp_path, &outcome.bytes).map_err(write_failed)?;
        if let Err(e) = std::fs::rename(&tmp_path, &path) {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(write_failed(e));
        }

        debug!("Wrote {} bytes to {}", outcome.bytes.len(), path.display());
        Ok(path)
    }
}
