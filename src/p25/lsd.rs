//! Low speed data carried at the end of each LDU.

use tracing::debug;

use crate::bits::BitVector;
use crate::coding::cyclic;
use crate::error::{Error, Result};
use crate::stats::Stats;

/// Two bytes of low speed data, each `None` if its codeword was unrecoverable.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "ser", derive(serde::Serialize, serde::Deserialize))]
pub struct LowSpeedData([Option<u8>; 2]);

impl LowSpeedData {
    /// Correct the two consecutive codewords starting at `offset` and record the results
    /// into `stats`.
    pub fn decode(bits: &mut BitVector, offset: usize, stats: &mut Stats) -> Result<Self> {
        let mut data = [None; 2];

        for (i, byte) in data.iter_mut().enumerate() {
            let start = offset + i * cyclic::WORD_BITS;

            match cyclic::correct_at(bits, start)? {
                Some((d, err)) => {
                    stats.cyclic.record_fixes(err);
                    *byte = Some(d);
                },
                None => {
                    debug!(offset = start, "unrecoverable low speed data");
                    stats.record_err(&Error::CyclicUnrecoverable { offset: start });
                },
            }
        }

        Ok(LowSpeedData(data))
    }

    pub fn bytes(&self) -> [Option<u8>; 2] { self.0 }

    /// Whether both bytes were recovered.
    pub fn is_valid(&self) -> bool { self.0.iter().all(Option::is_some) }
}
