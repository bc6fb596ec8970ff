//! Encoding and decoding of the (16, 8, 5) shortened cyclic code described by P25, which
//! protects the low speed data bytes of an LDU.
//!
//! The key information that this code is shortened from a (17, 8, 5) code came from
//! "Standard APCO25 Physical Layer of the Radio Transmission Chain", Simon, 2014.

use crate::bits::BitVector;
use crate::error::Result;

/// Number of bits in a codeword.
pub const WORD_BITS: usize = 16;

/// Encode the given 8 data bits into a 16-bit codeword.
pub fn encode(data: u8) -> u16 {
    cai_cyclic::encode(data as u16) as u16
}

/// Try to decode the given 16-bit word to the nearest codeword, correcting up to 2
/// errors.
///
/// If decoding was successful, return `Some((data, err))`, where `data` is the 8 data
/// bits and `err` is the number of corrected bits. Otherwise, return `None` to indicate
/// an unrecoverable error.
pub fn decode(word: u16) -> Option<(u8, usize)> {
    cai_cyclic::decode(word as u32).and_then(|(word, err)| if word >> 8 == 0 {
        Some((word as u8, err))
    } else {
        None
    })
}

/// Decode the codeword starting at `offset` and write any corrections back into the
/// vector, so they're counted as corrected bits.
///
/// Return `Some((data, err))` as `decode` does, or `None` if the word is unrecoverable.
pub fn correct_at(bits: &mut BitVector, offset: usize) -> Result<Option<(u8, usize)>> {
    let word = bits.uint(offset, WORD_BITS)? as u16;

    let (data, err) = match decode(word) {
        Some(d) => d,
        None => return Ok(None),
    };

    let diff = word ^ encode(data);

    for i in 0..WORD_BITS {
        if diff >> (WORD_BITS - 1 - i) & 1 == 1 {
            bits.flip(offset + i)?;
        }
    }

    Ok(Some((data, err)))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_decode() {
        let w = 0b10101011;
        let e = encode(w);
        assert_eq!(e, 0b10101011_01111011);

        assert_eq!(Some((w, 0)), decode(e^0b0000000000000000));
        assert_eq!(Some((w, 2)), decode(e^0b1000000000000001));
        assert_eq!(Some((w, 1)), decode(e^0b0001000000000000));
        assert_eq!(Some((w, 2)), decode(e^0b0011000000000000));
        assert_eq!(Some((w, 2)), decode(e^0b0000100000000100));
        assert_eq!(Some((w, 1)), decode(e^0b0000000000000001));

        for w in 0..=(!0u8) {
            assert_eq!(decode(encode(w)), Some((w, 0)));
        }
    }

    #[test]
    fn test_correct_at() {
        let mut bits = BitVector::new(40);
        bits.load(8, WORD_BITS, encode(0x5A) as u64).unwrap();
        let good = bits.clone();

        assert_eq!(correct_at(&mut bits, 8).unwrap(), Some((0x5A, 0)));

        bits.set(9, !bits.get(9).unwrap()).unwrap();
        bits.set(20, !bits.get(20).unwrap()).unwrap();

        assert_eq!(correct_at(&mut bits, 8).unwrap(), Some((0x5A, 2)));
        assert_eq!(bits.as_bitslice(), good.as_bitslice());
        assert_eq!(bits.corrected_bit_count(), 2);

        assert!(correct_at(&mut bits, 30).is_err());
    }
}
