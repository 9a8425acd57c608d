//! Whitespace normalization: the first stage every codec shares.
//!
//! Encoded blobs are usually pasted from e-mails, terminals or PDF exports and
//! arrive hard-wrapped at 64 or 76 columns, indented, or with CRLF endings.
//! None of the five alphabets contains whitespace, so every whitespace
//! character is dropped before any codec sees the text.

/// Remove every Unicode whitespace character from `text`, preserving the
/// order of everything else.
///
/// Total and idempotent: `normalize(&normalize(x)) == normalize(x)`.
pub fn normalize(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}
