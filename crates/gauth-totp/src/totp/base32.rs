//! Base-32 codec for shared secrets.
//!
//! Built on a small fixed-bit notation: input bits are packed `bits_per_char`
//! at a time into characters of an alphabet. [`BASE32`] is the RFC 4648
//! alphabet (`A-Z2-7`), case-insensitive on decode, with the final group
//! zero-filled on encode. No `=` padding is emitted; trailing `=` is accepted.

use crate::totp::types::TotpError;

const RFC4648_ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";
const PAD_CHAR: char = '=';

/// A fixed-width bit-to-character notation.
#[derive(Debug, Clone, Copy)]
pub struct BitNotation {
    bits_per_char: u32,
    alphabet: &'static [u8],
    case_insensitive: bool,
    pad_final_bits: bool,
}

/// The configured Base-32 notation.
pub const BASE32: BitNotation = BitNotation {
    bits_per_char: 5,
    alphabet: RFC4648_ALPHABET,
    case_insensitive: true,
    pad_final_bits: true,
};

impl BitNotation {
    /// Number of characters `encode` produces for `byte_len` input bytes.
    pub fn encoded_len(&self, byte_len: usize) -> usize {
        let bits = byte_len * 8;
        let per = self.bits_per_char as usize;
        if self.pad_final_bits {
            (bits + per - 1) / per
        } else {
            bits / per
        }
    }

    pub fn encode(&self, bytes: &[u8]) -> String {
        let mask = (1u32 << self.bits_per_char) - 1;
        let mut out = String::with_capacity(self.encoded_len(bytes.len()));
        let mut buffer: u32 = 0;
        let mut bits: u32 = 0;

        for &byte in bytes {
            buffer = (buffer << 8) | byte as u32;
            bits += 8;
            while bits >= self.bits_per_char {
                bits -= self.bits_per_char;
                out.push(self.alphabet[((buffer >> bits) & mask) as usize] as char);
            }
            buffer &= (1 << bits) - 1;
        }

        if bits > 0 && self.pad_final_bits {
            let index = (buffer << (self.bits_per_char - bits)) & mask;
            out.push(self.alphabet[index as usize] as char);
        }
        out
    }

    /// Decode `text`, ignoring trailing padding. Bits left over after the last
    /// full byte are discarded.
    pub fn decode(&self, text: &str) -> Result<Vec<u8>, TotpError> {
        let trimmed = text.trim_end_matches(PAD_CHAR);
        let mut out = Vec::with_capacity(trimmed.len() * self.bits_per_char as usize / 8);
        let mut buffer: u32 = 0;
        let mut bits: u32 = 0;

        for (position, character) in trimmed.chars().enumerate() {
            let value = self
                .index_of(character)
                .ok_or(TotpError::InvalidEncoding {
                    character,
                    position,
                })?;
            buffer = (buffer << self.bits_per_char) | value;
            bits += self.bits_per_char;
            if bits >= 8 {
                bits -= 8;
                out.push((buffer >> bits) as u8);
                buffer &= (1 << bits) - 1;
            }
        }
        Ok(out)
    }

    fn index_of(&self, c: char) -> Option<u32> {
        if !c.is_ascii() {
            return None;
        }
        let c = if self.case_insensitive {
            c.to_ascii_uppercase()
        } else {
            c
        };
        self.alphabet
            .iter()
            .position(|&a| a == c as u8)
            .map(|i| i as u32)
    }
}

/// Encode raw bytes to Base-32 (uppercase, unpadded).
pub fn encode(bytes: &[u8]) -> String {
    BASE32.encode(bytes)
}

/// Decode Base-32 text (case-insensitive, trailing `=` allowed).
pub fn decode(text: &str) -> Result<Vec<u8>, TotpError> {
    BASE32.decode(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    // RFC 4648 §10 vectors, unpadded.
    const RFC4648_VECTORS: &[(&str, &str)] = &[
        ("", ""),
        ("f", "MY"),
        ("fo", "MZXQ"),
        ("foo", "MZXW6"),
        ("foob", "MZXW6YQ"),
        ("fooba", "MZXW6YTB"),
        ("foobar", "MZXW6YTBOI"),
    ];

    #[test]
    fn encode_rfc4648_vectors() {
        for (plain, encoded) in RFC4648_VECTORS {
            assert_eq!(encode(plain.as_bytes()), *encoded, "encoding {:?}", plain);
        }
    }

    #[test]
    fn decode_rfc4648_vectors() {
        for (plain, encoded) in RFC4648_VECTORS {
            assert_eq!(decode(encoded).unwrap(), plain.as_bytes(), "decoding {:?}", encoded);
        }
    }

    #[test]
    fn decode_accepts_padding() {
        assert_eq!(decode("MZXW6===").unwrap(), b"foo");
        assert_eq!(decode("MY======").unwrap(), b"f");
    }

    #[test]
    fn decode_case_insensitive() {
        let upper = decode("JBSWY3DPEHPK3PXP").unwrap();
        let lower = decode("jbswy3dpehpk3pxp").unwrap();
        assert_eq!(upper, lower);
        assert_eq!(upper, b"Hello!\xde\xad\xbe\xef");
    }

    #[test]
    fn decode_rejects_characters_outside_alphabet() {
        assert_eq!(
            decode("MZX1"),
            Err(TotpError::InvalidEncoding {
                character: '1',
                position: 3
            })
        );
        assert!(decode("!!!").is_err());
        assert!(decode("AB CD").is_err());
        assert!(decode("ÄBCD").is_err());
    }

    #[test]
    fn decode_rejects_inner_padding() {
        assert!(decode("MZ=XW6").is_err());
    }

    #[test]
    fn decode_discards_trailing_partial_bits() {
        // 18 chars = 90 bits → 11 full bytes
        let bytes = decode("3DHTQX4GCRKHGS55CJ").unwrap();
        assert_eq!(bytes.len(), 11);
    }

    #[test]
    fn roundtrip_all_lengths() {
        let data: Vec<u8> = (0u8..=255).collect();
        for len in 0..64 {
            let slice = &data[..len];
            assert_eq!(decode(&encode(slice)).unwrap(), slice);
        }
    }

    #[test]
    fn encoded_len_matches_output() {
        for len in 0..40 {
            let bytes = vec![0xA5u8; len];
            assert_eq!(encode(&bytes).len(), BASE32.encoded_len(len));
        }
        assert_eq!(BASE32.encoded_len(10), 16);
    }

    #[test]
    fn agrees_with_base32_crate() {
        let samples: [&[u8]; 4] = [b"12345678901234567890", b"\x00\xff\x10", b"a", b"secret-key!"];
        for sample in samples {
            let ours = encode(sample);
            let theirs = base32::encode(base32::Alphabet::Rfc4648 { padding: false }, sample);
            assert_eq!(ours, theirs);
            assert_eq!(
                decode(&theirs).unwrap(),
                base32::decode(base32::Alphabet::Rfc4648 { padding: false }, &theirs).unwrap()
            );
        }
    }
}
