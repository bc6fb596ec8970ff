//! CRC calculation and single-bit correction for CRC-protected blocks.
//!
//! The calculator uses the typical long division and takes advantage of the short
//! lengths to use only a 64-bit word as a buffer, allowing simple bitwise operations.

use tracing::trace;

use crate::bits::BitVector;
use crate::error::Result;

/// 16-bit CCITT CRC calculator, as carried by Fleetsync blocks.
pub type Crc16 = Crc<Crc16Params>;

pub trait CrcParams {
    /// Generator polynomial, with the MSB being the coefficient of highest degree.
    fn gen() -> u64;

    /// Inversion polynomial, with the MSB being the coefficient of highest degree.
    fn inv() -> u64;

    /// Amount to left-shift the message (multiply by x^i) before division.
    fn shift() -> usize;

    /// Number of check bits.
    fn width() -> usize { degree(Self::gen()) as usize }

    /// Verify the parameters are well-formed.
    fn validate() {
        // Prevent division by zero.
        assert!(Self::gen() != 0);
        // Ensure the generator can be left-shifted by up to a byte (since that's the
        // maximum number of bits that will be fed in per long division step.)
        assert!(degree(Self::gen()) < 64 - 8);
    }
}

/// Params for the 16-bit CRC: x<sup>16</sup> + x<sup>12</sup> + x<sup>5</sup> + 1, with
/// the output inverted.
#[derive(Copy, Clone, Debug)]
pub struct Crc16Params;

impl CrcParams for Crc16Params {
    fn gen() -> u64 { 0b10001000000100001 }
    fn inv() -> u64 { 0b1111111111111111 }
    fn shift() -> usize { 16 }
}

/// CRC calculator using long division.
pub struct Crc<P: CrcParams> {
    params: std::marker::PhantomData<P>,
    /// Current output of the calculator.
    word: u64,
}

impl<P: CrcParams> Crc<P> {
    /// Construct a new `Crc` with empty output.
    pub fn new() -> Crc<P> {
        Crc {
            params: std::marker::PhantomData,
            word: 0,
        }
    }

    /// Feed in `num` LSBs of the given byte.
    pub fn feed_bits(&mut self, bits: u8, num: usize) -> &mut Self {
        assert!(num <= 8);
        // Verify there are no stray MSBs.
        assert!((bits as u16) >> num == 0);

        self.word <<= num;
        self.word |= bits as u64;

        self.div();
        self
    }

    /// Feed in the given byte stream.
    pub fn feed_bytes<T: IntoIterator<Item = u8>>(&mut self, bytes: T) -> &mut Self {
        for byte in bytes {
            self.feed_bits(byte, 8);
        }

        self
    }

    /// Feed in the given bit values, first bit first.
    pub fn feed_bools<T: IntoIterator<Item = bool>>(&mut self, bits: T) -> &mut Self {
        for bit in bits {
            self.feed_bits(bit as u8, 1);
        }

        self
    }

    /// Finish the CRC calculation and return the resulting CRC.
    pub fn finish(&mut self) -> u64 {
        self.flush();
        self.word ^ P::inv()
    }

    /// Reduce the current word by dividing by the generator.
    fn div(&mut self) {
        while self.word != 0 {
            let diff = degree(self.word) as i32 - degree(P::gen()) as i32;

            // If the divisor (generator) has higher degree than the dividend (word), then
            // no more division can be done.
            if diff < 0 {
                break;
            }

            // Bring the generator up to the same degree and knock off at least one of the
            // word's MSBs.
            self.word ^= P::gen() << diff;
        }
    }

    /// Perform the final shift and division of the word.
    fn flush(&mut self) {
        for _ in 0..P::shift() {
            self.word <<= 1;
            self.div();
        }
    }
}

impl<P: CrcParams> Default for Crc<P> {
    fn default() -> Self { Crc::new() }
}

// Calculate the degree of the polynomial represented by x, where x > 0.
fn degree(x: u64) -> u32 {
    64 - 1 - x.leading_zeros()
}

/// Outcome of checking one protected block.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "ser", derive(serde::Serialize, serde::Deserialize))]
pub enum CrcResult {
    /// Block matched its CRC.
    Passed,
    /// A single bit error was found and flipped.
    Corrected,
    /// Block didn't match its CRC and no single bit flip repairs it.
    FailedParity,
    /// Block couldn't be checked because it runs past the end of the vector.
    FailedUnrecoverable,
}

impl CrcResult {
    /// Whether the block's contents can be trusted after the check.
    pub fn passes(&self) -> bool {
        matches!(*self, CrcResult::Passed | CrcResult::Corrected)
    }
}

/// Validates blocks made of `data_bits` message bits followed by the CRC, correcting
/// single bit errors anywhere in the block.
#[derive(Clone, Debug)]
pub struct CrcValidator<P: CrcParams> {
    params: std::marker::PhantomData<P>,
    data_bits: usize,
    /// Syndrome caused by an error at each block position.
    syndromes: Vec<u64>,
}

impl<P: CrcParams> CrcValidator<P> {
    /// Construct a new `CrcValidator` for blocks with the given number of message bits.
    pub fn new(data_bits: usize) -> Self {
        P::validate();

        // With the inversion cancelling out, a data error at position i has the syndrome
        // x^(data_bits - 1 - i) * x^shift mod g(x). A CRC error shows up as itself.
        let syndromes = (0..data_bits)
            .map(|i| {
                let mut crc = Crc::<P>::new();
                crc.feed_bits(1, 1);
                crc.feed_bools(std::iter::repeat(false).take(data_bits - 1 - i));
                crc.finish() ^ P::inv()
            })
            .chain((0..P::width()).map(|j| 1 << (P::width() - 1 - j)))
            .collect();

        CrcValidator {
            params: std::marker::PhantomData,
            data_bits,
            syndromes,
        }
    }

    /// Number of bits in a block, including the CRC.
    pub fn block_len(&self) -> usize { self.data_bits + P::width() }

    /// Compute the CRC over the message bits of the block starting at `start` and return
    /// it along with the received CRC.
    fn compute(&self, bits: &BitVector, start: usize) -> (u64, u64) {
        let block = &bits.as_bitslice()[start..start + self.block_len()];
        let (data, sent) = block.split_at(self.data_bits);

        let calc = Crc::<P>::new().feed_bools(data.iter().by_vals()).finish();
        let recv = sent.iter().by_vals().fold(0, |acc, bit| acc << 1 | bit as u64);

        (calc, recv)
    }

    /// Check the block starting at `start`, flipping the offending bit if exactly one
    /// bit is in error.
    pub fn check(&self, bits: &mut BitVector, start: usize) -> CrcResult {
        if start + self.block_len() > bits.len() {
            return CrcResult::FailedUnrecoverable;
        }

        let (calc, recv) = self.compute(bits, start);
        let syndrome = calc ^ recv;

        if syndrome == 0 {
            return CrcResult::Passed;
        }

        match self.syndromes.iter().position(|&s| s == syndrome) {
            Some(pos) => match bits.flip(start + pos) {
                Ok(()) => {
                    trace!(start, pos, "corrected crc block");
                    CrcResult::Corrected
                },
                Err(_) => CrcResult::FailedUnrecoverable,
            },
            None => CrcResult::FailedParity,
        }
    }

    /// Compute the CRC over the message bits of the block starting at `start` and
    /// overwrite the block's CRC field with it.
    pub fn generate(&self, bits: &mut BitVector, start: usize) -> Result<()> {
        // Surface a range error before slicing.
        bits.get(start + self.block_len() - 1)?;

        let (calc, _) = self.compute(bits, start);
        bits.load(start + self.data_bits, P::width(), calc)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    struct CrcTest;

    impl CrcParams for CrcTest {
        fn gen() -> u64 { 0b100011011 }
        fn inv() -> u64 { 0b111 }
        fn shift() -> usize { 0 }
    }

    struct CrcTestShifted;

    impl CrcParams for CrcTestShifted {
        fn gen() -> u64 { 0b10001101100 }
        fn inv() -> u64 { 0b111 }
        fn shift() -> usize { 2 }
    }

    #[test]
    fn validate_params() {
        Crc16Params::validate();
        assert_eq!(Crc16Params::width(), 16);
    }

    #[test]
    fn test_calc() {
        let mut c = Crc::<CrcTest>::new();
        c.feed_bytes([
            0b00111111,
            0b01111110,
        ].iter().cloned());
        assert_eq!(c.finish(), 0b110);
    }

    #[test]
    fn test_shift() {
        assert_eq!(Crc::<CrcTestShifted>::new().feed_bytes([
            0b00111111,
            0b01111110,
        ].iter().cloned()).finish(), 0b011);
    }

    #[test]
    fn test_crc16() {
        assert_eq!(Crc16::new().feed_bytes(b"123456789".iter().cloned()).finish(), 0xCE3C);

        let bools = b"123456789".iter()
            .flat_map(|&b| (0..8).rev().map(move |i| b >> i & 1 == 1));
        assert_eq!(Crc16::new().feed_bools(bools).finish(), 0xCE3C);
    }

    fn block() -> BitVector {
        let mut bits = BitVector::from_bytes(&[0xA5, 0x3C, 0x0F, 0xF0, 0x12, 0x34, 0, 0],
                                             64).unwrap();
        CrcValidator::<Crc16Params>::new(48).generate(&mut bits, 0).unwrap();
        bits
    }

    #[test]
    fn test_passed() {
        let v = CrcValidator::<Crc16Params>::new(48);
        let mut bits = block();

        assert_eq!(v.block_len(), 64);
        assert_eq!(v.check(&mut bits, 0), CrcResult::Passed);
        assert_eq!(bits.corrected_bit_count(), 0);
    }

    #[test]
    fn test_syndromes_unique() {
        let v = CrcValidator::<Crc16Params>::new(48);

        for (i, a) in v.syndromes.iter().enumerate() {
            assert!(*a != 0);

            for b in v.syndromes[i + 1..].iter() {
                assert!(a != b);
            }
        }
    }

    #[test]
    fn test_single_flip() {
        let v = CrcValidator::<Crc16Params>::new(48);
        let good = block();

        for pos in 0..64 {
            let mut bits = good.clone();
            bits.set(pos, !good.get(pos).unwrap()).unwrap();

            assert_eq!(v.check(&mut bits, 0), CrcResult::Corrected);
            assert_eq!(bits.as_bitslice(), good.as_bitslice());
            assert_eq!(bits.corrected_bit_count(), 1);
        }
    }

    #[test]
    fn test_offset_block() {
        let v = CrcValidator::<Crc16Params>::new(48);
        let mut bits = BitVector::new(21 + 64);

        bits.load(21, 48, 0x1234_5678_9ABC).unwrap();
        v.generate(&mut bits, 21).unwrap();
        assert_eq!(v.check(&mut bits, 21), CrcResult::Passed);

        // Double errors are always detected and never miscorrected.
        bits.set(30, !bits.get(30).unwrap()).unwrap();
        bits.set(77, !bits.get(77).unwrap()).unwrap();
        assert_eq!(v.check(&mut bits, 21), CrcResult::FailedParity);
        assert_eq!(bits.corrected_bit_count(), 0);

        assert_eq!(v.check(&mut bits, 22), CrcResult::FailedUnrecoverable);
        assert!(v.generate(&mut bits, 22).is_err());
    }
}
