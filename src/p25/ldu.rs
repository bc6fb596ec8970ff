//! Logical link data units (LDUs), the two halves of a P25 voice superframe.
//!
//! Both LDUs share one 1488-bit layout: the NID, eight IMBE voice frames of vocoder
//! bits, 24 Hamming protected hexbits spread between the voice frames, and two
//! low speed data codewords. The hexbits form a shortened Reed-Solomon word whose data
//! symbols are the link control word (LDU1) or the encryption sync word (LDU2).

use tracing::trace;

use crate::bits::BitVector;
use crate::coding::{cyclic, hamming, reed_solomon::ReedSolomonDecoder};
use crate::error::{Error, Result};
use crate::reconstruct::{MessageReconstructor, HEXBIT_BITS};
use crate::stats::{HasStats, Stats};

use super::control::{LinkControlWord, LINK_CONTROL_BITS};
use super::crypto::{EncryptionSync, ENCRYPTION_SYNC_BITS};
use super::lsd::LowSpeedData;
use super::nid::{DataUnit, NetworkAccessCode, NetworkId};

/// Number of bits in an LDU frame.
pub const FRAME_BITS: usize = 1488;

/// Number of bits in an IMBE voice frame.
pub const VOICE_FRAME_BITS: usize = 144;

/// Start of each IMBE voice frame.
pub const VOICE_FRAMES: [usize; 8] = [64, 208, 392, 576, 760, 944, 1128, 1312];

/// Start of each Hamming protected hexbit, in transmission order.
pub const HEXBIT_WORDS: [usize; 24] = [
    352, 362, 372, 382,
    536, 546, 556, 566,
    720, 730, 740, 750,
    904, 914, 924, 934,
    1088, 1098, 1108, 1118,
    1272, 1282, 1292, 1302,
];

/// Start of the low speed data codewords.
pub const LSD_OFFSET: usize = 1456;

/// Hexbits of the link control word.
const LDU1_DATA_WORDS: usize = LINK_CONTROL_BITS / HEXBIT_BITS;
/// Hexbits of the encryption sync word.
const LDU2_DATA_WORDS: usize = ENCRYPTION_SYNC_BITS / HEXBIT_BITS;

/// State shared by both LDUs.
#[derive(Clone, Debug, Eq, PartialEq)]
struct LduFrame {
    bits: BitVector,
    nid: NetworkId,
    lsd: LowSpeedData,
    valid: bool,
    stats: Stats,
}

impl LduFrame {
    /// Correct the given frame and return it along with the recovered payload.
    fn decode(mut bits: BitVector, data_words: usize, t: usize, rec: &MessageReconstructor)
        -> Result<(LduFrame, BitVector)>
    {
        if bits.len() < FRAME_BITS {
            return Err(Error::FrameLength {
                expected: FRAME_BITS,
                actual: bits.len(),
            });
        }

        let mut stats = Stats::default();
        let nid = NetworkId::new(&bits)?;
        let rs = rec.reconstruct(&mut bits, &HEXBIT_WORDS, data_words, t, &mut stats)?;
        let lsd = LowSpeedData::decode(&mut bits, LSD_OFFSET, &mut stats)?;

        stats.record_message(rs.valid);

        trace!(nac = nid.access_code().to_bits(), duid = nid.duid(), valid = rs.valid,
               corrected = bits.corrected_bit_count(), "decoded ldu");

        Ok((LduFrame {
            bits,
            nid,
            lsd,
            valid: rs.valid,
            stats,
        }, rs.payload))
    }

    fn voice_frame(&self, idx: usize) -> Option<BitVector> {
        let start = *VOICE_FRAMES.get(idx)?;

        // The frame length was checked on construction.
        Some(BitVector::from(
            self.bits.as_bitslice()[start..start + VOICE_FRAME_BITS].to_bitvec()))
    }
}

/// Accessors common to both LDUs.
macro_rules! ldu_accessors {
    () => {
        /// The corrected frame.
        pub fn bits(&self) -> &BitVector { &self.frame.bits }

        /// NAC and DUID, read without correction.
        pub fn nid(&self) -> NetworkId { self.frame.nid }

        /// Whether the Reed-Solomon protected payload decoded.
        ///
        /// Uncorrectable Hamming codewords and low speed data don't affect validity.
        pub fn is_valid(&self) -> bool { self.frame.valid }

        /// Number of bits changed by all correction stages.
        pub fn corrected_bit_count(&self) -> usize { self.frame.bits.corrected_bit_count() }

        /// Raw bits of the IMBE voice frame with the given index, or `None` if the index
        /// is 8 or more.
        pub fn voice_frame(&self, idx: usize) -> Option<BitVector> {
            self.frame.voice_frame(idx)
        }

        /// Low speed data carried by the frame.
        pub fn low_speed_data(&self) -> LowSpeedData { self.frame.lsd }
    };
}

/// First half of a voice superframe, carrying a link control word.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Ldu1 {
    frame: LduFrame,
    link_control: LinkControlWord,
}

impl Ldu1 {
    /// Correct and decode the given frame, using up to `t` Reed-Solomon corrections.
    pub fn decode(bits: BitVector, t: usize, rec: &MessageReconstructor) -> Result<Ldu1> {
        let (frame, payload) = LduFrame::decode(bits, LDU1_DATA_WORDS, t, rec)?;

        Ok(Ldu1 {
            frame,
            link_control: LinkControlWord::new(payload)?,
        })
    }

    /// Build a clean frame carrying the given link control word.
    pub fn synthesize(access_code: NetworkAccessCode, lc: &BitVector, lsd: [u8; 2])
        -> Result<BitVector>
    {
        synthesize(access_code, DataUnit::VoiceLCFrameGroup, lc, LDU1_DATA_WORDS, lsd)
    }

    ldu_accessors!();

    pub fn link_control(&self) -> &LinkControlWord { &self.link_control }
}

impl HasStats for Ldu1 {
    fn stats(&self) -> &Stats { &self.frame.stats }
}

/// Second half of a voice superframe, carrying the encryption sync word.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Ldu2 {
    frame: LduFrame,
    encryption: EncryptionSync,
}

impl Ldu2 {
    /// Correct and decode the given frame, using up to `t` Reed-Solomon corrections.
    pub fn decode(bits: BitVector, t: usize, rec: &MessageReconstructor) -> Result<Ldu2> {
        let (frame, payload) = LduFrame::decode(bits, LDU2_DATA_WORDS, t, rec)?;

        Ok(Ldu2 {
            frame,
            encryption: EncryptionSync::new(&payload)?,
        })
    }

    /// Build a clean frame carrying the given encryption sync word.
    pub fn synthesize(access_code: NetworkAccessCode, es: &BitVector, lsd: [u8; 2])
        -> Result<BitVector>
    {
        synthesize(access_code, DataUnit::VoiceCCFrameGroup, es, LDU2_DATA_WORDS, lsd)
    }

    ldu_accessors!();

    pub fn encryption_sync(&self) -> &EncryptionSync { &self.encryption }

    pub fn algorithm_id(&self) -> u8 { self.encryption.algorithm_id() }
    pub fn key_id(&self) -> u16 { self.encryption.key_id() }
    pub fn is_encrypted_audio(&self) -> bool { self.encryption.is_encrypted_audio() }
}

impl HasStats for Ldu2 {
    fn stats(&self) -> &Stats { &self.frame.stats }
}

/// Lay out an error-free frame with zeroed voice frames.
fn synthesize(access_code: NetworkAccessCode, data_unit: DataUnit, payload: &BitVector,
              data_words: usize, lsd: [u8; 2])
    -> Result<BitVector>
{
    if payload.len() != data_words * HEXBIT_BITS {
        return Err(Error::FrameLength {
            expected: data_words * HEXBIT_BITS,
            actual: payload.len(),
        });
    }

    let n = HEXBIT_WORDS.len();
    let parity = n - data_words;
    let enc = ReedSolomonDecoder::new(n, data_words, parity + 1)?;

    let data = (0..data_words)
        .map(|i| payload.uint(i * HEXBIT_BITS, HEXBIT_BITS).map(|s| s as u8))
        .collect::<Result<Vec<u8>>>()?;

    let word = enc.encode(&data);
    let mut bits = BitVector::new(FRAME_BITS);

    NetworkId::write(access_code, data_unit, &mut bits)?;

    for (i, &offset) in HEXBIT_WORDS.iter().enumerate() {
        bits.load(offset, hamming::WORD_BITS, hamming::encode(word[n - 1 - i]) as u64)?;
    }

    for (i, &byte) in lsd.iter().enumerate() {
        bits.load(LSD_OFFSET + i * cyclic::WORD_BITS, cyclic::WORD_BITS,
                  cyclic::encode(byte) as u64)?;
    }

    Ok(bits)
}
