//! Base16 (hex) via the `hex` crate.

use crate::error::CodecError;
use std::borrow::Cow;

/// Prefixes commonly left on hex dumps; at most one is stripped.
const PREFIXES: [&str; 3] = ["0x", "0X", "\\x"];

/// Decode hex digits (either case).
///
/// An odd-length input is left-padded with one `0` first, then a single
/// leading `0x`, `0X` or `\x` is stripped. Padding comes before stripping, so
/// a prefixed input of odd total length keeps its prefix and fails.
pub(super) fn decode(text: &str) -> Result<Vec<u8>, CodecError> {
    let padded: Cow<'_, str> = if text.len() % 2 == 0 {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(format!("0{text}"))
    };
    let pad = padded.len() - text.len();

    let digits = PREFIXES
        .iter()
        .find_map(|p| padded.strip_prefix(p))
        .unwrap_or(&*padded);
    if digits.is_empty() {
        return Err(CodecError::EmptyInput);
    }
    let prefix_len = padded.len() - digits.len();

    hex::decode(digits).map_err(|e| map_error(e, text, prefix_len, pad))
}

/// `prefix_len` and `pad` map an index in `digits` back to `text`. The pad
/// digit is always valid, so the subtraction never goes below zero.
fn map_error(err: hex::FromHexError, text: &str, prefix_len: usize, pad: usize) -> CodecError {
    match err {
        hex::FromHexError::InvalidHexCharacter { index, .. } => {
            CodecError::invalid_char(text, (index + prefix_len).saturating_sub(pad))
        }
        hex::FromHexError::OddLength | hex::FromHexError::InvalidStringLength => {
            CodecError::InvalidLength { len: text.len() }
        }
    }
}
