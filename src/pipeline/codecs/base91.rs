//! basE91 (Joachim Henke's variable-width 13/14-bit encoding).
//!
//! Compiled only with the `base91` feature; without it the registry keeps the
//! codec but reports it as skipped.

use crate::error::CodecError;

const ALPHABET: &[u8; 91] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz\
0123456789!#$%&()*+,./:;<=>?@[]^_`{|}~\"";
const INVALID: u8 = 0xFF;

const DECODE: [u8; 256] = {
    let mut table = [INVALID; 256];
    let mut i = 0;
    while i < ALPHABET.len() {
        table[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table
};

/// Decode basE91 text. Characters outside the alphabet are rejected, and so
/// is a final lone symbol holding more bits than the byte it completes.
pub(super) fn decode(text: &str) -> Result<Vec<u8>, CodecError> {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len() * 13 / 16 + 1);
    let mut queue: u32 = 0;
    let mut bits: u32 = 0;
    let mut pending: Option<u32> = None;

    for (offset, &b) in bytes.iter().enumerate() {
        let digit = DECODE[b as usize];
        if digit == INVALID {
            return Err(CodecError::invalid_char(text, offset));
        }
        let digit = u32::from(digit);
        match pending.take() {
            None => pending = Some(digit),
            Some(low) => {
                let value = low + digit * 91;
                queue |= value << bits;
                bits += if value & 8191 > 88 { 13 } else { 14 };
                while bits > 7 {
                    out.push(queue as u8);
                    queue >>= 8;
                    bits -= 8;
                }
            }
        }
    }

    if let Some(low) = pending {
        let last = queue | low << bits;
        let Ok(last) = u8::try_from(last) else {
            return Err(CodecError::MalformedGroup {
                offset: bytes.len() - 1,
                detail: format!("trailing symbol overflows the final byte ({last})"),
            });
        };
        out.push(last);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_overflowing_trailing_symbol() {
        // "AA" leaves 6 bits pending; '~' (89) cannot fit in the last 2
        assert!(matches!(
            decode("AA~"),
            Err(CodecError::MalformedGroup { offset: 2, .. })
        ));
        assert_eq!(decode("~").unwrap(), [89]);
    }

    #[test]
    fn alphabet_is_91_unique_symbols() {
        let mut seen = [false; 256];
        for &b in ALPHABET {
            assert!(!seen[b as usize], "duplicate {:?}", b as char);
            seen[b as usize] = true;
        }
    }

    #[test]
    fn decodes_known_text() {
        assert_eq!(decode("fPNKd").unwrap(), b"test");
        assert_eq!(decode(">OwJh>Io0Tv!8PE").unwrap(), b"Hello World!");
    }

    #[test]
    fn rejects_characters_outside_alphabet() {
        assert_eq!(
            decode("fP-Kd"),
            Err(CodecError::InvalidCharacter { ch: '-', offset: 2 })
        );
        assert_eq!(
            decode("fP'"),
            Err(CodecError::InvalidCharacter { ch: '\'', offset: 2 })
        );
    }
}
