//! Ascii85 (the btoa / PostScript variant, without `<~ ~>` framing).

use crate::error::CodecError;

/// Digit value of `u`, used to complete a short final group.
const PAD_DIGIT: u8 = b'u' - b'!';

/// Decode Ascii85 text.
///
/// Digits are `!`..`u`; a lone `z` between groups stands for four zero bytes.
/// A short final group of `n` digits (2..=4) yields `n - 1` bytes. A single
/// trailing digit carries no complete byte and is rejected.
pub(super) fn decode(text: &str) -> Result<Vec<u8>, CodecError> {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len() / 5 * 4 + 4);
    let mut group = [0u8; 5];
    let mut filled = 0;
    let mut group_start = 0;

    for (offset, &b) in bytes.iter().enumerate() {
        match b {
            b'!'..=b'u' => {
                if filled == 0 {
                    group_start = offset;
                }
                group[filled] = b - b'!';
                filled += 1;
                if filled == 5 {
                    out.extend_from_slice(&decode_group(&group, group_start)?);
                    filled = 0;
                }
            }
            b'z' if filled == 0 => out.extend_from_slice(&[0; 4]),
            b'z' => {
                return Err(CodecError::MalformedGroup {
                    offset,
                    detail: "'z' inside a 5-digit group".into(),
                })
            }
            _ => return Err(CodecError::invalid_char(text, offset)),
        }
    }

    match filled {
        0 => {}
        1 => {
            return Err(CodecError::MalformedGroup {
                offset: group_start,
                detail: "final group has a single digit".into(),
            })
        }
        n => {
            group[n..].fill(PAD_DIGIT);
            let word = decode_group(&group, group_start)?;
            out.extend_from_slice(&word[..n - 1]);
        }
    }
    Ok(out)
}

fn decode_group(group: &[u8; 5], offset: usize) -> Result<[u8; 4], CodecError> {
    let value = group
        .iter()
        .fold(0u64, |acc, &digit| acc * 85 + u64::from(digit));
    u32::try_from(value)
        .map(u32::to_be_bytes)
        .map_err(|_| CodecError::MalformedGroup {
            offset,
            detail: "group value exceeds 32 bits".into(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_known_text() {
        assert_eq!(decode("87cURD]i,\"Ebo7").unwrap(), b"Hello World");
    }

    #[test]
    fn z_shorthand() {
        assert_eq!(decode("z").unwrap(), vec![0; 4]);
        assert_eq!(decode("zz").unwrap(), vec![0; 8]);
    }

    #[test]
    fn z_inside_group_is_malformed() {
        assert!(matches!(
            decode("87z"),
            Err(CodecError::MalformedGroup { offset: 2, .. })
        ));
    }

    #[test]
    fn partial_final_group() {
        // "h" -> "BE"
        assert_eq!(decode("BE").unwrap(), b"h");
        assert!(matches!(
            decode("87cURB"),
            Err(CodecError::MalformedGroup { offset: 5, .. })
        ));
    }

    #[test]
    fn overflow_is_malformed() {
        assert!(matches!(
            decode("uuuuu"),
            Err(CodecError::MalformedGroup { offset: 0, .. })
        ));
    }

    #[test]
    fn rejects_out_of_range() {
        assert_eq!(
            decode("87cU~"),
            Err(CodecError::InvalidCharacter { ch: '~', offset: 4 })
        );
    }
}
