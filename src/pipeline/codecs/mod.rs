//! The codec registry: five text-to-bytes decoders tried in a fixed order.
//!
//! Each codec is a pure function of the normalized text. A codec never
//! panics and never lets a decoding library error escape; everything is
//! converted to a [`CodecError`] at the codec boundary so one bad codec cannot
//! stop the pipeline from trying the next.
//!
//! | Order | Codec    | Alphabet                                  |
//! |-------|----------|-------------------------------------------|
//! | 1     | `base16` | `0-9a-fA-F`, optional `0x`/`\x` prefix     |
//! | 2     | `base32` | RFC 4648, case-insensitive, `=` padding    |
//! | 3     | `base64` | RFC 4648 standard, `+` `/` `=`             |
//! | 4     | `base85` | Ascii85 `!`..`u` plus `z`                  |
//! | 5     | `base91` | basE91 (optional, cargo feature `base91`)  |
//!
//! The order only affects reporting: decoders are independent, and every
//! successful decoding is reported.

mod base16;
mod base32;
mod base64;
mod base85;
#[cfg(feature = "base91")]
mod base91;

use crate::error::{Base2ImgError, CodecError};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the five supported text encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodecKind {
    Base16,
    Base32,
    Base64,
    Base85,
    Base91,
}

impl CodecKind {
    /// Every codec, in registry order.
    pub const ALL: [CodecKind; 5] = [
        CodecKind::Base16,
        CodecKind::Base32,
        CodecKind::Base64,
        CodecKind::Base85,
        CodecKind::Base91,
    ];

    /// Stable identifier used in reports and output filenames.
    pub fn name(self) -> &'static str {
        match self {
            CodecKind::Base16 => "base16",
            CodecKind::Base32 => "base32",
            CodecKind::Base64 => "base64",
            CodecKind::Base85 => "base85",
            CodecKind::Base91 => "base91",
        }
    }

    /// Decode normalized text.
    ///
    /// Empty input is always a failure. For `base91` in a build without the
    /// `base91` feature this returns [`CodecError::Unavailable`].
    pub fn decode(self, text: &str) -> Result<Vec<u8>, CodecError> {
        if text.is_empty() {
            return Err(CodecError::EmptyInput);
        }
        match self {
            CodecKind::Base16 => base16::decode(text),
            CodecKind::Base32 => base32::decode(text),
            CodecKind::Base64 => base64::decode(text),
            CodecKind::Base85 => base85::decode(text),
            CodecKind::Base91 => decode_base91(text),
        }
    }
}

#[cfg(feature = "base91")]
fn decode_base91(text: &str) -> Result<Vec<u8>, CodecError> {
    base91::decode(text)
}

#[cfg(not(feature = "base91"))]
fn decode_base91(_text: &str) -> Result<Vec<u8>, CodecError> {
    Err(CodecError::Unavailable {
        codec: CodecKind::Base91.name().to_string(),
    })
}

impl fmt::Display for CodecKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CodecKind {
    type Err = Base2ImgError;

    /// Accepts the canonical names plus the common aliases `hex` and
    /// `ascii85`, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "base16" | "hex" => Ok(CodecKind::Base16),
            "base32" => Ok(CodecKind::Base32),
            "base64" => Ok(CodecKind::Base64),
            "base85" | "ascii85" => Ok(CodecKind::Base85),
            "base91" => Ok(CodecKind::Base91),
            other => Err(Base2ImgError::InvalidConfig(format!(
                "unknown codec '{other}' (expected base16, base32, base64, base85 or base91)"
            ))),
        }
    }
}

/// Which optional codecs this process can run.
///
/// Fixed for the lifetime of the process; [`CodecRegistry::standard`] reads
/// it exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub base91: bool,
}

impl Capabilities {
    /// Capabilities compiled into this build.
    pub fn detect() -> Self {
        Self {
            base91: cfg!(feature = "base91"),
        }
    }

    pub fn supports(&self, kind: CodecKind) -> bool {
        match kind {
            CodecKind::Base91 => self.base91,
            _ => true,
        }
    }
}

/// A registry entry: a codec plus whether it can run in this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecDescriptor {
    kind: CodecKind,
    available: bool,
}

impl CodecDescriptor {
    pub fn kind(&self) -> CodecKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Decode through this entry; unavailable entries never run the codec.
    pub fn decode(&self, text: &str) -> Result<Vec<u8>, CodecError> {
        if !self.available {
            return Err(CodecError::Unavailable {
                codec: self.name().to_string(),
            });
        }
        self.kind.decode(text)
    }
}

static STANDARD: Lazy<CodecRegistry> =
    Lazy::new(|| CodecRegistry::with_capabilities(Capabilities::detect()));

/// Immutable, ordered list of codecs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecRegistry {
    codecs: Vec<CodecDescriptor>,
}

impl CodecRegistry {
    /// The process-wide registry: all five codecs, availability detected once.
    pub fn standard() -> &'static CodecRegistry {
        &STANDARD
    }

    /// All five codecs with explicitly supplied availability.
    pub fn with_capabilities(capabilities: Capabilities) -> Self {
        let codecs = CodecKind::ALL
            .iter()
            .map(|&kind| CodecDescriptor {
                kind,
                available: capabilities.supports(kind),
            })
            .collect();
        Self { codecs }
    }

    /// A sub-registry holding only `kinds`, still in registry order.
    /// Duplicates in `kinds` are ignored.
    pub fn select(&self, kinds: &[CodecKind]) -> CodecRegistry {
        let codecs = self
            .codecs
            .iter()
            .filter(|d| kinds.contains(&d.kind))
            .copied()
            .collect();
        CodecRegistry { codecs }
    }

    pub fn iter(&self) -> impl Iterator<Item = &CodecDescriptor> {
        self.codecs.iter()
    }

    pub fn get(&self, kind: CodecKind) -> Option<&CodecDescriptor> {
        self.codecs.iter().find(|d| d.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }
}
