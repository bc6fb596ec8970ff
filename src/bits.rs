//! Bit-addressable message buffer that tracks how many bits FEC stages have repaired.

use std::fmt;

use bitvec::prelude::*;

use crate::error::{Error, Result};

/// Fixed-length sequence of bits, MSB-first, with a running count of corrected bits.
///
/// The length is fixed at construction. Every correcting stage in the pipeline either
/// flips bits through `flip()` or reports repairs made elsewhere through
/// `record_corrected()`, so the counter always equals the number of bit errors fixed
/// for the frame the vector holds.
#[derive(Clone, PartialEq, Eq)]
pub struct BitVector {
    bits: BitVec<u8, Msb0>,
    corrected: usize,
}

impl BitVector {
    /// Construct a new all-zero `BitVector` with the given number of bits.
    pub fn new(len: usize) -> BitVector {
        BitVector {
            bits: BitVec::repeat(false, len),
            corrected: 0,
        }
    }

    /// Construct a new `BitVector` from the first `len` bits of the given bytes, taking
    /// each byte MSB first.
    pub fn from_bytes(bytes: &[u8], len: usize) -> Result<BitVector> {
        let mut bits = BitVec::<u8, Msb0>::from_slice(bytes);

        if len > bits.len() {
            return Err(Error::BitIndexOutOfRange {
                index: len - 1,
                len: bits.len(),
            });
        }

        bits.truncate(len);

        Ok(BitVector {
            bits,
            corrected: 0,
        })
    }

    /// Construct a new `BitVector` from a sequence of bit values.
    pub fn from_bools<T: IntoIterator<Item = bool>>(bits: T) -> BitVector {
        BitVector {
            bits: bits.into_iter().collect(),
            corrected: 0,
        }
    }

    /// Number of bits in the vector.
    pub fn len(&self) -> usize { self.bits.len() }

    /// Whether the vector holds zero bits.
    pub fn is_empty(&self) -> bool { self.bits.is_empty() }

    /// Number of bits that have been corrected since construction.
    pub fn corrected_bit_count(&self) -> usize { self.corrected }

    /// Add the given number of bits to the corrected count without touching the buffer.
    ///
    /// Used when a stage repairs a copy of the bits, such as the Reed-Solomon symbols
    /// assembled from the frame.
    pub fn record_corrected(&mut self, bits: usize) {
        self.corrected += bits;
    }

    /// Retrieve the bit at the given index.
    pub fn get(&self, index: usize) -> Result<bool> {
        self.check(index)?;
        Ok(self.bits[index])
    }

    /// Overwrite the bit at the given index. This isn't counted as a correction.
    pub fn set(&mut self, index: usize, value: bool) -> Result<()> {
        self.check(index)?;
        self.bits.set(index, value);
        Ok(())
    }

    /// Toggle the bit at the given index and count it as one corrected bit.
    pub fn flip(&mut self, index: usize) -> Result<()> {
        self.check(index)?;

        let bit = self.bits[index];
        self.bits.set(index, !bit);
        self.corrected += 1;

        Ok(())
    }

    /// Read `width` contiguous bits starting at `start` as an unsigned integer, with the
    /// first bit as the MSB.
    pub fn uint(&self, start: usize, width: usize) -> Result<u64> {
        assert!(width <= 64);

        if width == 0 {
            return Ok(0);
        }

        self.check(start + width - 1)?;

        Ok(self.bits[start..start + width]
            .iter()
            .by_vals()
            .fold(0, |acc, bit| acc << 1 | bit as u64))
    }

    /// Write `value` into the `width` bits starting at `start`, MSB first. Fails if the
    /// value has significant bits beyond `width`.
    pub fn load(&mut self, start: usize, width: usize, value: u64) -> Result<()> {
        assert!(width <= 64);

        check_fits(value, width)?;

        if width == 0 {
            return Ok(());
        }

        self.check(start + width - 1)?;

        for i in 0..width {
            self.bits.set(start + i, value >> (width - 1 - i) & 1 == 1);
        }

        Ok(())
    }

    /// Copy the bits in `[start, end)` into a new vector with a zero corrected count.
    pub fn slice(&self, start: usize, end: usize) -> Result<BitVector> {
        if start > end || end > self.len() {
            return Err(Error::BitIndexOutOfRange {
                index: end,
                len: self.len(),
            });
        }

        Ok(BitVector {
            bits: self.bits[start..end].to_bitvec(),
            corrected: 0,
        })
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> usize { self.bits.count_ones() }

    /// Borrow the underlying bits.
    pub fn as_bitslice(&self) -> &BitSlice<u8, Msb0> { &self.bits }

    fn check(&self, index: usize) -> Result<()> {
        if index < self.len() {
            Ok(())
        } else {
            Err(Error::BitIndexOutOfRange {
                index,
                len: self.len(),
            })
        }
    }
}

impl From<BitVec<u8, Msb0>> for BitVector {
    fn from(bits: BitVec<u8, Msb0>) -> Self {
        BitVector {
            bits,
            corrected: 0,
        }
    }
}

/// Formats as a string of `0` and `1` characters.
impl fmt::Display for BitVector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for bit in self.bits.iter().by_vals() {
            f.write_str(if bit { "1" } else { "0" })?;
        }

        Ok(())
    }
}

/// Verify `value` can be represented in `width` bits.
pub(crate) fn check_fits(value: u64, width: usize) -> Result<()> {
    if width < 64 && value >> width != 0 {
        Err(Error::ValueOverflow { value, width })
    } else {
        Ok(())
    }
}

impl fmt::Debug for BitVector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "BitVector({}, corrected={})", self, self.corrected)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_from_bytes() {
        let b = BitVector::from_bytes(&[0b10110000, 0xFF], 12).unwrap();

        assert_eq!(b.len(), 12);
        assert_eq!(b.to_string(), "101100001111");
        assert_eq!(b.corrected_bit_count(), 0);

        assert_eq!(BitVector::from_bytes(&[0], 9), Err(Error::BitIndexOutOfRange {
            index: 8,
            len: 8,
        }));
    }

    #[test]
    fn test_uint_load() {
        let mut b = BitVector::new(80);

        b.load(3, 6, 0b101101).unwrap();
        assert_eq!(b.uint(3, 6).unwrap(), 0b101101);
        assert_eq!(b.uint(0, 10).unwrap(), 0b0001011010);

        b.load(10, 64, 0xDEADBEEF_CAFEF00D).unwrap();
        assert_eq!(b.uint(10, 64).unwrap(), 0xDEADBEEF_CAFEF00D);
        assert_eq!(b.uint(0, 0).unwrap(), 0);

        assert!(b.uint(75, 6).is_err());
        assert!(b.load(79, 2, 0).is_err());
        assert_eq!(b.corrected_bit_count(), 0);
    }

    #[test]
    fn test_load_overflow() {
        let mut b = BitVector::new(16);
        b.load(0, 16, 0xFFFF).unwrap();

        assert_eq!(b.load(2, 10, 1234), Err(Error::ValueOverflow {
            value: 1234,
            width: 10,
        }));
        assert_eq!(b.load(0, 0, 1), Err(Error::ValueOverflow { value: 1, width: 0 }));

        // Left untouched.
        assert_eq!(b.uint(0, 16).unwrap(), 0xFFFF);

        b.load(2, 10, 1023).unwrap();
        assert_eq!(b.uint(2, 10).unwrap(), 1023);
    }

    #[test]
    fn test_flip() {
        let mut b = BitVector::new(8);

        b.flip(0).unwrap();
        b.flip(7).unwrap();
        b.flip(7).unwrap();

        assert_eq!(b.to_string(), "10000000");
        assert_eq!(b.corrected_bit_count(), 3);

        assert_eq!(b.flip(8), Err(Error::BitIndexOutOfRange { index: 8, len: 8 }));
        assert_eq!(b.corrected_bit_count(), 3);

        b.record_corrected(4);
        assert_eq!(b.corrected_bit_count(), 7);
    }

    #[test]
    fn test_get_set() {
        let mut b = BitVector::new(4);

        b.set(2, true).unwrap();
        assert_eq!(b.get(2), Ok(true));
        assert_eq!(b.get(1), Ok(false));
        assert!(b.get(4).is_err());
        assert!(b.set(4, true).is_err());
        assert_eq!(b.count_ones(), 1);
        assert_eq!(b.corrected_bit_count(), 0);
    }

    #[test]
    fn test_slice() {
        let mut b = BitVector::from_bools([true, false, true, true, false, false]);
        b.flip(5).unwrap();

        let s = b.slice(1, 4).unwrap();
        assert_eq!(s.to_string(), "011");
        assert_eq!(s.corrected_bit_count(), 0);

        assert!(b.slice(0, 6).is_ok());
        assert!(b.slice(0, 7).is_err());
        assert!(b.slice(4, 3).is_err());
        assert!(b.slice(6, 6).unwrap().is_empty());
    }
}
