//! GPS fix carried by a Fleetsync location report.
//!
//! The fix is a 91-bit stream packed into the data bits of the second and third blocks,
//! so its fields are laid out as scattered bit lists that skip over the first CRC.

use crate::bits::BitVector;
use crate::error::Result;
use crate::field::{Decode, FieldSpec};

use super::{BLOCK_BITS, BLOCK_DATA_BITS, BLOCK_START};

/// Bits in the GPS stream.
pub const STREAM_BITS: usize = 91;

/// First bit of the second block, where the stream begins.
const STREAM_START: usize = BLOCK_START + BLOCK_BITS;

/// Map `N` consecutive stream bits starting at `start` to their frame positions.
const fn stream<const N: usize>(start: usize) -> [usize; N] {
    let mut out = [0; N];
    let mut i = 0;

    while i < N {
        let s = start + i;
        out[i] = STREAM_START + s / BLOCK_DATA_BITS * BLOCK_BITS + s % BLOCK_DATA_BITS;
        i += 1;
    }

    out
}

const LAT_NORTH_BITS: [usize; 1] = stream(0);
const LAT_DEGREES_BITS: [usize; 7] = stream(1);
const LAT_MINUTES_BITS: [usize; 6] = stream(8);
const LAT_FRACTION_BITS: [usize; 14] = stream(14);
const LON_EAST_BITS: [usize; 1] = stream(28);
const LON_DEGREES_BITS: [usize; 8] = stream(29);
const LON_MINUTES_BITS: [usize; 6] = stream(37);
const LON_FRACTION_BITS: [usize; 14] = stream(43);
const SPEED_BITS: [usize; 8] = stream(57);
const HEADING_BITS: [usize; 9] = stream(65);
const HOUR_BITS: [usize; 5] = stream(74);
const MINUTE_BITS: [usize; 6] = stream(79);
const SECOND_BITS: [usize; 6] = stream(85);

const LAT_NORTH: FieldSpec = FieldSpec::scattered(&LAT_NORTH_BITS, Decode::Bool);
const LAT_DEGREES: FieldSpec = FieldSpec::scattered(&LAT_DEGREES_BITS, Decode::Unsigned);
const LAT_MINUTES: FieldSpec = FieldSpec::scattered(&LAT_MINUTES_BITS, Decode::Unsigned);
const LAT_FRACTION: FieldSpec = FieldSpec::scattered(&LAT_FRACTION_BITS, Decode::Unsigned);
const LON_EAST: FieldSpec = FieldSpec::scattered(&LON_EAST_BITS, Decode::Bool);
const LON_DEGREES: FieldSpec = FieldSpec::scattered(&LON_DEGREES_BITS, Decode::Unsigned);
const LON_MINUTES: FieldSpec = FieldSpec::scattered(&LON_MINUTES_BITS, Decode::Unsigned);
const LON_FRACTION: FieldSpec = FieldSpec::scattered(&LON_FRACTION_BITS, Decode::Unsigned);
const SPEED: FieldSpec = FieldSpec::scattered(&SPEED_BITS, Decode::Unsigned);
const HEADING: FieldSpec = FieldSpec::scattered(&HEADING_BITS, Decode::Unsigned);
const HOUR: FieldSpec = FieldSpec::scattered(&HOUR_BITS, Decode::Unsigned);
const MINUTE: FieldSpec = FieldSpec::scattered(&MINUTE_BITS, Decode::Unsigned);
const SECOND: FieldSpec = FieldSpec::scattered(&SECOND_BITS, Decode::Unsigned);

/// One coordinate as sent: whole degrees, whole minutes, and ten-thousandths of a minute.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "ser", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinate {
    /// North for latitude, east for longitude.
    pub positive: bool,
    pub degrees: u16,
    pub minutes: u8,
    pub fraction: u16,
}

impl Coordinate {
    fn decode(bits: &BitVector, hemi: &FieldSpec, deg: &FieldSpec, min: &FieldSpec,
              frac: &FieldSpec)
        -> Result<Self>
    {
        Ok(Coordinate {
            positive: bits.get_bool(hemi)?,
            degrees: bits.get_uint(deg)? as u16,
            minutes: bits.get_uint(min)? as u8,
            fraction: bits.get_uint(frac)? as u16,
        })
    }

    /// Signed decimal degrees.
    pub fn decimal(&self) -> f64 {
        let mag = self.degrees as f64
            + (self.minutes as f64 + self.fraction as f64 / 10_000.0) / 60.0;

        if self.positive { mag } else { -mag }
    }
}

/// Position, motion, and UTC time of a fix.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "ser", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    pub latitude: Coordinate,
    pub longitude: Coordinate,
    pub speed: u8,
    /// Heading in degrees.
    pub heading: u16,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl Location {
    /// Read the fix from a frame holding at least three blocks.
    pub fn decode(bits: &BitVector) -> Result<Self> {
        Ok(Location {
            latitude: Coordinate::decode(bits, &LAT_NORTH, &LAT_DEGREES, &LAT_MINUTES,
                                         &LAT_FRACTION)?,
            longitude: Coordinate::decode(bits, &LON_EAST, &LON_DEGREES, &LON_MINUTES,
                                          &LON_FRACTION)?,
            speed: bits.get_uint(&SPEED)? as u8,
            heading: bits.get_uint(&HEADING)? as u16,
            hour: bits.get_uint(&HOUR)? as u8,
            minute: bits.get_uint(&MINUTE)? as u8,
            second: bits.get_uint(&SECOND)? as u8,
        })
    }

    /// Write the fix into the given frame.
    pub fn write(&self, bits: &mut BitVector) -> Result<()> {
        let fields: [(&FieldSpec, u64); 13] = [
            (&LAT_NORTH, self.latitude.positive as u64),
            (&LAT_DEGREES, self.latitude.degrees as u64),
            (&LAT_MINUTES, self.latitude.minutes as u64),
            (&LAT_FRACTION, self.latitude.fraction as u64),
            (&LON_EAST, self.longitude.positive as u64),
            (&LON_DEGREES, self.longitude.degrees as u64),
            (&LON_MINUTES, self.longitude.minutes as u64),
            (&LON_FRACTION, self.longitude.fraction as u64),
            (&SPEED, self.speed as u64),
            (&HEADING, self.heading as u64),
            (&HOUR, self.hour as u64),
            (&MINUTE, self.minute as u64),
            (&SECOND, self.second as u64),
        ];

        for (spec, value) in fields {
            bits.put_uint(spec, value)?;
        }

        Ok(())
    }
}
