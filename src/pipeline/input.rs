//! Input resolution: read the encoded text from a file.
//!
//! All input failures surface here, before the decode pipeline runs: the
//! pipeline only ever sees a `&str`. The size check uses file metadata so an
//! oversized file is refused without being read into memory.

use crate::error::Base2ImgError;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

/// Read `path` as UTF-8 text, refusing files larger than `max_bytes`.
pub fn read_text(path: impl AsRef<Path>, max_bytes: u64) -> Result<String, Base2ImgError> {
    let path = path.as_ref();

    let meta = std::fs::metadata(path).map_err(|e| io_error(path, e))?;
    if meta.len() > max_bytes {
        return Err(Base2ImgError::InputTooLarge {
            path: path.to_path_buf(),
            size: meta.len(),
            limit: max_bytes,
        });
    }

    let bytes = std::fs::read(path).map_err(|e| io_error(path, e))?;
    let text = String::from_utf8(bytes).map_err(|e| Base2ImgError::NotText {
        path: path.to_path_buf(),
        detail: e.utf8_error().to_string(),
    })?;

    debug!("Read {} bytes from {}", text.len(), path.display());
    Ok(text)
}

fn io_error(path: &Path, e: std::io::Error) -> Base2ImgError {
    let path = path.to_path_buf();
    match e.kind() {
        ErrorKind::NotFound => Base2ImgError::FileNotFound { path },
        ErrorKind::PermissionDenied => Base2ImgError::PermissionDenied { path },
        _ => Base2ImgError::ReadFailed { path, source: e },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_text_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "iVBORw0K\nGgo=\n").unwrap();
        assert_eq!(read_text(f.path(), 1024).unwrap(), "iVBORw0K\nGgo=\n");
    }

    #[test]
    fn missing_file() {
        let err = read_text("/definitely/not/here.txt", 1024).unwrap_err();
        assert!(matches!(err, Base2ImgError::FileNotFound { .. }), "got: {err}");
    }

    #[test]
    fn binary_file_is_not_text() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(&[0x89, b'P', b'N', b'G', 0xFF, 0xFE]).unwrap();
        let err = read_text(f.path(), 1024).unwrap_err();
        assert!(matches!(err, Base2ImgError::NotText { .. }), "got: {err}");
    }

    #[test]
    fn oversized_file_is_refused() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(&[b'A'; 64]).unwrap();
        let err = read_text(f.path(), 16).unwrap_err();
        assert!(
            matches!(err, Base2ImgError::InputTooLarge { size: 64, limit: 16, .. }),
            "got: {err}"
        );
    }
}
