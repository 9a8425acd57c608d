//! RFC 4648 base32, case-insensitive, padding required.

use crate::error::CodecError;

const ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";
const INVALID: u8 = 0xFF;

const DECODE: [u8; 256] = {
    let mut table = [INVALID; 256];
    let mut i = 0;
    while i < ALPHABET.len() {
        table[ALPHABET[i] as usize] = i as u8;
        table[ALPHABET[i].to_ascii_lowercase() as usize] = i as u8;
        i += 1;
    }
    table
};

/// Decode base32 text whose length is a multiple of 8.
///
/// Only the padding runs RFC 4648 can produce (0, 1, 3, 4 or 6 `=`) are
/// accepted. Unused low bits of the last symbol are ignored.
pub(super) fn decode(text: &str) -> Result<Vec<u8>, CodecError> {
    let bytes = text.as_bytes();
    if bytes.len() % 8 != 0 {
        return Err(CodecError::InvalidLength { len: bytes.len() });
    }

    let body_len = bytes
        .iter()
        .rposition(|&b| b != b'=')
        .map_or(0, |i| i + 1);
    if !matches!(bytes.len() - body_len, 0 | 1 | 3 | 4 | 6) {
        return Err(CodecError::InvalidPadding);
    }

    let mut out = Vec::with_capacity(body_len * 5 / 8);
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    for (offset, &b) in bytes[..body_len].iter().enumerate() {
        let value = DECODE[b as usize];
        if value == INVALID {
            return Err(CodecError::invalid_char(text, offset));
        }
        acc = (acc << 5) | u32::from(value);
        bits += 5;
        if bits >= 8 {
            bits -= 8;
            out.push((acc >> bits) as u8);
            acc &= (1 << bits) - 1;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rfc4648_vectors() {
        assert_eq!(decode("MY======").unwrap(), b"f");
        assert_eq!(decode("MZXQ====").unwrap(), b"fo");
        assert_eq!(decode("MZXW6===").unwrap(), b"foo");
        assert_eq!(decode("MZXW6YQ=").unwrap(), b"foob");
        assert_eq!(decode("MZXW6YTB").unwrap(), b"fooba");
        assert_eq!(decode("MZXW6YTBOI======").unwrap(), b"foobar");
    }

    #[test]
    fn case_folds() {
        assert_eq!(decode("mzxw6ytboi======").unwrap(), b"foobar");
        assert_eq!(decode("MzXw6YtBoI======").unwrap(), b"foobar");
    }

    #[test]
    fn rejects_bad_length() {
        assert_eq!(decode("MZXW6"), Err(CodecError::InvalidLength { len: 5 }));
    }

    #[test]
    fn rejects_impossible_padding() {
        assert_eq!(decode("MZXWYQ=="), Err(CodecError::InvalidPadding));
        assert_eq!(decode("========"), Err(CodecError::InvalidPadding));
    }

    #[test]
    fn rejects_out_of_alphabet() {
        assert_eq!(
            decode("MZXW6YT1"),
            Err(CodecError::InvalidCharacter { ch: '1', offset: 7 })
        );
        // padding in the middle is just another invalid character
        assert_eq!(
            decode("MZ=W6YTB"),
            Err(CodecError::InvalidCharacter { ch: '=', offset: 2 })
        );
    }
}
