//! Encoding and decoding of the (10, 6, 3) shortened Hamming code described by P25, and
//! in-place correction of such codewords embedded in a `BitVector`.
//!
//! The code can correct up to 1 error. These algorithms are sourced from *Coding Theory
//! and Cryptography: The Essentials*, Hankerson, Hoffman, et al, 2000.

use binfield_matrix::{matrix_mul, matrix_mul_systematic};
use tracing::debug;

use crate::bits::BitVector;
use crate::error::{Error, Result};

/// Number of bits in a codeword.
pub const WORD_BITS: usize = 10;

/// Number of data bits in a codeword, which form its first transmitted bits.
pub const DATA_BITS: usize = 6;

/// Generator matrix from the standard, without identity part.
const GEN: &[u8] = &[
    0b111001,
    0b110101,
    0b101110,
    0b011110,
];

/// Parity-check matrix derived from generator using standard method.
const PAR: &[u16] = &[
    0b1110011000,
    0b1101010100,
    0b1011100010,
    0b0111100001,
];

/// Maps 4-bit syndrome values to bit error locations. Syndromes without a
/// single-bit pattern map to 0.
const LOCATIONS: &[u16] = &[
    0,
    0b0000000000000001,
    0b0000000000000010,
    0b0000000000100000,
    0b0000000000000100,
    0,
    0,
    0b0000000001000000,
    0b0000000000001000,
    0,
    0,
    0b0000000010000000,
    0b0000000000010000,
    0b0000000100000000,
    0b0000001000000000,
    0,
];

/// Encode the given 6 data bits into a 10-bit codeword.
pub fn encode(data: u8) -> u16 {
    assert!(data >> 6 == 0);
    matrix_mul_systematic(data, GEN)
}

/// Try to decode the given 10-bit word to the nearest codeword, correcting up to 1
/// error.
///
/// If decoding was successful, return `Some((data, err))`, where `data` is the 6 data
/// bits and `err` is the number of corrected bits. Otherwise, return `None` to indicate
/// an unrecoverable error.
pub fn decode(word: u16) -> Option<(u8, usize)> {
    fix(word).map(|(w, n)| ((w >> 4) as u8, n))
}

/// Find the nearest codeword to the given word, returned with the number of flipped bits.
fn fix(word: u16) -> Option<(u16, usize)> {
    assert!(word >> 10 == 0);

    let s: usize = matrix_mul(word, PAR);

    if s == 0 {
        return Some((word, 0));
    }

    LOCATIONS.get(s).and_then(|&loc| if loc == 0 {
        None
    } else {
        Some((word ^ loc, 1))
    })
}

/// Correct the codeword whose first bit is at `offset` in place, flipping the bit in
/// error through the vector so the correction is counted.
///
/// Return the number of corrected bits, or `HammingUncorrectable` (with the vector left
/// untouched) if the syndrome doesn't match a single-bit error.
pub fn correct_at(bits: &mut BitVector, offset: usize) -> Result<usize> {
    let word = bits.uint(offset, WORD_BITS)? as u16;

    let (fixed, err) = fix(word).ok_or(Error::HammingUncorrectable { offset })?;

    if err > 0 {
        // Codeword bits are numbered from the LSB, so bit j is transmitted at 9 - j.
        let pos = (word ^ fixed).trailing_zeros() as usize;
        bits.flip(offset + WORD_BITS - 1 - pos)?;
    }

    Ok(err)
}

/// Summary of correcting a set of codewords.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Corrections {
    /// Number of codewords examined.
    pub words: usize,
    /// Number of bits flipped.
    pub fixed: usize,
    /// Offsets of codewords that couldn't be corrected.
    pub uncorrectable: Vec<usize>,
}

/// Correct the codewords at each of the given offsets.
///
/// Uncorrectable codewords are recorded and left as received, and correction continues
/// with the remaining codewords. Only range errors are returned as `Err`.
pub fn correct_words(bits: &mut BitVector, offsets: &[usize]) -> Result<Corrections> {
    let mut out = Corrections::default();

    for &offset in offsets {
        out.words += 1;

        match correct_at(bits, offset) {
            Ok(n) => out.fixed += n,
            Err(Error::HammingUncorrectable { offset }) => {
                debug!(offset, "uncorrectable hamming word");
                out.uncorrectable.push(offset);
            },
            Err(e) => return Err(e),
        }
    }

    Ok(out)
}
