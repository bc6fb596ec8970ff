//! Named bit fields and their extraction from a `BitVector`.
//!
//! Message layouts are declared as `const` tables of `FieldSpec`s next to the message
//! type that uses them. Each spec is checked once when the constant is evaluated, and
//! extraction only verifies that the spec fits the vector.

use std::fmt::Write;

use crate::bits::{check_fits, BitVector};
use crate::error::Result;

/// How the bits of a field are interpreted.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "ser", derive(serde::Serialize, serde::Deserialize))]
pub enum Decode {
    /// Unsigned integer, first bit as MSB.
    Unsigned,
    /// Single flag bit.
    Bool,
    /// Uppercase hex string, zero-padded to whole nibbles. May be wider than 64 bits.
    Hex,
    /// Sign bit followed by magnitude, where a set sign bit means positive.
    SignedOffset,
}

/// Value produced by extracting a field.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FieldValue {
    Unsigned(u64),
    Bool(bool),
    Hex(String),
    Signed(i64),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Layout {
    /// Contiguous bits `[start, start + len)`.
    Range { start: usize, len: usize },
    /// Bits at arbitrary positions, MSB first.
    Scattered(&'static [usize]),
}

/// Ordered set of bit positions that make up one field, plus its decode mode.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct FieldSpec {
    layout: Layout,
    decode: Decode,
}

impl FieldSpec {
    /// Field covering `len` contiguous bits starting at `start`.
    pub const fn range(start: usize, len: usize, decode: Decode) -> FieldSpec {
        let spec = FieldSpec {
            layout: Layout::Range { start, len },
            decode,
        };

        spec.validate();
        spec
    }

    /// Field assembled from the given bit positions, the first position being the MSB.
    pub const fn scattered(bits: &'static [usize], decode: Decode) -> FieldSpec {
        let spec = FieldSpec {
            layout: Layout::Scattered(bits),
            decode,
        };

        spec.validate();
        spec
    }

    /// Shorthand for an unsigned contiguous field.
    pub const fn uint(start: usize, len: usize) -> FieldSpec {
        FieldSpec::range(start, len, Decode::Unsigned)
    }

    /// Shorthand for a single flag bit.
    pub const fn flag(bit: usize) -> FieldSpec {
        FieldSpec::range(bit, 1, Decode::Bool)
    }

    /// Number of bits in the field.
    pub const fn width(&self) -> usize {
        match self.layout {
            Layout::Range { len, .. } => len,
            Layout::Scattered(bits) => bits.len(),
        }
    }

    /// Decode mode of the field.
    pub const fn decode(&self) -> Decode { self.decode }

    /// Absolute position of the field's `i`th bit, counting from the MSB.
    pub const fn position(&self, i: usize) -> usize {
        match self.layout {
            Layout::Range { start, .. } => start + i,
            Layout::Scattered(bits) => bits[i],
        }
    }

    /// One past the highest bit position the field touches.
    pub const fn end(&self) -> usize {
        let mut end = 0;
        let mut i = 0;

        while i < self.width() {
            if self.position(i) + 1 > end {
                end = self.position(i) + 1;
            }

            i += 1;
        }

        end
    }

    const fn validate(&self) {
        assert!(self.width() > 0, "empty field");

        match self.decode {
            Decode::Hex => {},
            Decode::Bool => assert!(self.width() == 1, "flag must be one bit"),
            Decode::Unsigned => assert!(self.width() <= 64, "field too wide"),
            Decode::SignedOffset => {
                assert!(self.width() >= 2 && self.width() <= 64, "bad signed field")
            },
        }
    }
}

/// Field extraction.
impl BitVector {
    /// Extract the given field according to its decode mode.
    pub fn field(&self, spec: &FieldSpec) -> Result<FieldValue> {
        Ok(match spec.decode() {
            Decode::Unsigned => FieldValue::Unsigned(self.raw(spec)?),
            Decode::Bool => FieldValue::Bool(self.raw(spec)? == 1),
            Decode::Hex => FieldValue::Hex(self.get_hex(spec)?),
            Decode::SignedOffset => FieldValue::Signed(self.get_signed(spec)?),
        })
    }

    /// Extract the field as an unsigned integer, regardless of its decode mode. The
    /// field must be at most 64 bits wide.
    pub fn get_uint(&self, spec: &FieldSpec) -> Result<u64> {
        assert!(spec.width() <= 64);
        self.raw(spec)
    }

    /// Extract the field as a flag, which is set if any of its bits are set.
    pub fn get_bool(&self, spec: &FieldSpec) -> Result<bool> {
        for i in 0..spec.width() {
            if self.get(spec.position(i))? {
                return Ok(true);
            }
        }

        Ok(false)
    }

    /// Extract the field as a sign bit and magnitude.
    pub fn get_signed(&self, spec: &FieldSpec) -> Result<i64> {
        assert!(spec.width() >= 2 && spec.width() <= 64);

        let raw = self.raw(spec)?;
        let mag_bits = spec.width() - 1;
        let mag = (raw & (u64::MAX >> (64 - mag_bits))) as i64;

        Ok(if raw >> mag_bits == 1 { mag } else { -mag })
    }

    /// Extract the field as an uppercase hex string. Fields that aren't a whole number
    /// of nibbles are zero-padded on the left.
    pub fn get_hex(&self, spec: &FieldSpec) -> Result<String> {
        let width = spec.width();
        let pad = (4 - width % 4) % 4;
        let mut hex = String::with_capacity((width + pad) / 4);
        let mut nibble = 0u8;

        for i in 0..width {
            nibble = nibble << 1 | self.get(spec.position(i))? as u8;

            if (pad + i + 1) % 4 == 0 {
                // Infallible for String.
                let _ = write!(hex, "{:X}", nibble);
                nibble = 0;
            }
        }

        Ok(hex)
    }

    /// Write an unsigned value into the field's bits, MSB first. Fails if the value
    /// doesn't fit the field.
    pub fn put_uint(&mut self, spec: &FieldSpec, value: u64) -> Result<()> {
        assert!(spec.width() <= 64);

        check_fits(value, spec.width())?;
        self.get(spec.end().saturating_sub(1))?;

        let width = spec.width();

        for i in 0..width {
            self.set(spec.position(i), value >> (width - 1 - i) & 1 == 1)?;
        }

        Ok(())
    }

    fn raw(&self, spec: &FieldSpec) -> Result<u64> {
        let mut value = 0;

        for i in 0..spec.width() {
            value = value << 1 | self.get(spec.position(i))? as u64;
        }

        Ok(value)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::Error;

    const SCATTERED: FieldSpec = FieldSpec::scattered(&[7, 0, 3], Decode::Unsigned);

    #[test]
    fn test_spec() {
        let f = FieldSpec::uint(4, 6);
        assert_eq!(f.width(), 6);
        assert_eq!(f.position(0), 4);
        assert_eq!(f.position(5), 9);
        assert_eq!(f.end(), 10);

        assert_eq!(SCATTERED.width(), 3);
        assert_eq!(SCATTERED.position(0), 7);
        assert_eq!(SCATTERED.end(), 8);
    }

    #[test]
    fn test_uint() {
        let b = BitVector::from_bytes(&[0b10010001], 8).unwrap();

        assert_eq!(b.get_uint(&FieldSpec::uint(0, 4)).unwrap(), 0b1001);
        assert_eq!(b.get_uint(&SCATTERED).unwrap(), 0b111);
        assert_eq!(b.field(&SCATTERED).unwrap(), FieldValue::Unsigned(0b111));

        let rev = FieldSpec::scattered(&[3, 2, 1, 0], Decode::Unsigned);
        assert_eq!(b.get_uint(&rev).unwrap(), 0b1001);

        let rev = FieldSpec::scattered(&[4, 5, 6, 7], Decode::Unsigned);
        assert_eq!(b.get_uint(&rev).unwrap(), 0b0001);

        assert_eq!(b.get_uint(&FieldSpec::uint(6, 3)), Err(Error::BitIndexOutOfRange {
            index: 8,
            len: 8,
        }));
    }

    #[test]
    fn test_put_uint() {
        let mut b = BitVector::new(8);

        b.put_uint(&SCATTERED, 0b101).unwrap();
        assert_eq!(b.to_string(), "00010001");
        assert_eq!(b.get_uint(&SCATTERED).unwrap(), 0b101);

        assert_eq!(b.put_uint(&SCATTERED, 8), Err(Error::ValueOverflow {
            value: 8,
            width: 3,
        }));
        assert!(b.put_uint(&FieldSpec::uint(6, 3), 0).is_err());
        assert_eq!(b.to_string(), "00010001");
    }

    #[test]
    fn test_bool() {
        let b = BitVector::from_bytes(&[0b01000000], 8).unwrap();

        assert_eq!(b.get_bool(&FieldSpec::flag(0)), Ok(false));
        assert_eq!(b.get_bool(&FieldSpec::flag(1)), Ok(true));
        assert_eq!(b.field(&FieldSpec::flag(1)), Ok(FieldValue::Bool(true)));
        assert!(b.get_bool(&FieldSpec::flag(8)).is_err());
    }

    #[test]
    fn test_hex() {
        let b = BitVector::from_bytes(&[0xDE, 0xAD, 0xBE, 0xEF, 0x01], 40).unwrap();

        assert_eq!(b.get_hex(&FieldSpec::range(0, 32, Decode::Hex)).unwrap(), "DEADBEEF");
        assert_eq!(b.get_hex(&FieldSpec::range(0, 40, Decode::Hex)).unwrap(), "DEADBEEF01");
        // 0b11_0111_1010 -> 37A
        assert_eq!(b.get_hex(&FieldSpec::range(0, 10, Decode::Hex)).unwrap(), "37A");

        let wide = BitVector::new(72);
        assert_eq!(wide.get_hex(&FieldSpec::range(0, 72, Decode::Hex)).unwrap(),
                   "000000000000000000");
    }

    #[test]
    fn test_signed() {
        let b = BitVector::from_bytes(&[0b10000101, 0b00000101], 16).unwrap();
        let pos = FieldSpec::range(0, 8, Decode::SignedOffset);
        let neg = FieldSpec::range(8, 8, Decode::SignedOffset);

        assert_eq!(b.get_signed(&pos).unwrap(), 5);
        assert_eq!(b.get_signed(&neg).unwrap(), -5);
        assert_eq!(b.field(&neg).unwrap(), FieldValue::Signed(-5));
    }
}
