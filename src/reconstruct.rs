//! Rebuilds a Reed-Solomon protected payload from Hamming-protected hexbits interleaved
//! through a frame.
//!
//! Each frame passes through three stages:
//!
//! 1. Every (10, 6, 3) Hamming codeword is corrected in place. Uncorrectable codewords
//!    are left as received and their data bits flow into the next stage anyway.
//! 2. The 6 data bits of each codeword become one GF(2<sup>6</sup>) symbol, with the
//!    first transmitted codeword as the highest-degree symbol of a shortened (63, 47,
//!    17) word.
//! 3. The word is decoded with the caller's t, and the data symbols are written in
//!    transmission order into a new payload vector. A correction that lands above the
//!    transmitted symbols makes the word irrecoverable. Bits changed by the decoder are
//!    added to the frame's corrected count.
//!
//! A word that can't be decoded still produces a payload, built from the received
//! symbols, so the message can be constructed and flagged invalid.

use tracing::{debug, trace};

use crate::bits::BitVector;
use crate::coding::hamming;
use crate::coding::reed_solomon::{ReedSolomonDecoder, FULL_LENGTH};
use crate::error::{Error, Result};
use crate::stats::Stats;

/// Bits per Reed-Solomon symbol.
pub const HEXBIT_BITS: usize = 6;

/// Payload recovered from a frame.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Reconstructed {
    /// Data symbols in transmission order, 6 bits each.
    pub payload: BitVector,
    /// Whether the Reed-Solomon word decoded.
    pub valid: bool,
}

/// Runs the Hamming, Reed-Solomon, and payload stages for a frame.
#[derive(Copy, Clone, Debug)]
pub struct MessageReconstructor {
    rs: ReedSolomonDecoder,
}

impl MessageReconstructor {
    /// Construct a new `MessageReconstructor` around the (63, 47, 17) decoder.
    pub fn new() -> Result<Self> {
        Ok(MessageReconstructor {
            rs: ReedSolomonDecoder::new(63, 47, 17)?,
        })
    }

    /// Underlying Reed-Solomon decoder.
    pub fn decoder(&self) -> &ReedSolomonDecoder { &self.rs }

    /// Correct the codewords at the given offsets (in transmission order) and recover the
    /// first `data_words` symbols, correcting up to `t` symbol errors.
    ///
    /// Per-code results are recorded into `stats`. Only range errors and a `t` beyond the
    /// decoder's capability are returned as `Err`.
    pub fn reconstruct(&self, frame: &mut BitVector, words: &[usize], data_words: usize,
                       t: usize, stats: &mut Stats)
        -> Result<Reconstructed>
    {
        assert!(words.len() <= FULL_LENGTH && data_words <= words.len());

        if t > self.rs.max_errors() {
            return Err(Error::InvalidConfig(format!("t = {} exceeds decoder capability", t)));
        }

        let ham = hamming::correct_words(frame, words)?;

        for _ in 0..ham.fixed {
            stats.hamming.record_fixes(1);
        }

        for &offset in ham.uncorrectable.iter() {
            stats.record_err(&Error::HammingUncorrectable { offset });
        }

        for _ in 0..ham.words - ham.fixed - ham.uncorrectable.len() {
            stats.hamming.record_fixes(0);
        }

        let input = assemble(frame, words)?;
        let dec = self.rs.decode_shortened(&input, t, words.len());

        if dec.irrecoverable {
            debug!(t, uncorrectable_hamming = ham.uncorrectable.len(),
                   "irrecoverable reed-solomon word");
            stats.record_err(&Error::ReedSolomonIrrecoverable);
        } else {
            stats.reed_solomon.record_fixes(dec.errors);
        }

        let fixed_bits: usize = input[..words.len()].iter()
            .zip(dec.symbols[..words.len()].iter())
            .map(|(&a, &b)| (a ^ b).count_ones() as usize)
            .sum();

        frame.record_corrected(fixed_bits);

        let mut payload = BitVector::new(data_words * HEXBIT_BITS);

        for i in 0..data_words {
            let sym = dec.symbols[words.len() - 1 - i];
            payload.load(i * HEXBIT_BITS, HEXBIT_BITS, sym as u64)?;
        }

        trace!(hamming_fixed = ham.fixed, rs_symbols = dec.errors, rs_bits = fixed_bits,
               valid = !dec.irrecoverable, "reconstructed payload");

        Ok(Reconstructed {
            payload,
            valid: !dec.irrecoverable,
        })
    }
}

/// Read the hexbit at each offset into a symbol array, first offset at the highest
/// index.
fn assemble(frame: &BitVector, words: &[usize]) -> Result<[u8; FULL_LENGTH]> {
    let mut input = [0; FULL_LENGTH];

    for (i, &offset) in words.iter().enumerate() {
        input[words.len() - 1 - i] = frame.uint(offset, HEXBIT_BITS)? as u8;
    }

    Ok(input)
}
