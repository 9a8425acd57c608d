//! Standard base64 via the `base64` crate.

use crate::error::CodecError;
use base64::{
    alphabet,
    engine::{GeneralPurpose, GeneralPurposeConfig},
    DecodeError, Engine as _,
};

/// Standard alphabet, canonical `=` padding required. Non-zero unused bits in
/// the final symbol are tolerated, as most encoders in the wild emit them.
const ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

pub(super) fn decode(text: &str) -> Result<Vec<u8>, CodecError> {
    ENGINE.decode(text).map_err(|e| match e {
        DecodeError::InvalidByte(offset, _) => CodecError::invalid_char(text, offset),
        DecodeError::InvalidLength(_) => CodecError::InvalidLength { len: text.len() },
        DecodeError::InvalidLastSymbol(offset, _) => CodecError::MalformedGroup {
            offset,
            detail: "final symbol encodes unused bits".into(),
        },
        DecodeError::InvalidPadding => CodecError::InvalidPadding,
    })
}
