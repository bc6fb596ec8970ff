//! Fleetsync II message decoding.
//!
//! A message follows a 21-bit preamble and sync word and is made of one or more 64-bit
//! blocks, each 48 data bits followed by a CRC-16. The lead block carries the message
//! type and the addressing, and location reports append two more blocks holding a GPS
//! fix.

pub mod gps;

use tracing::{debug, trace};

use crate::bits::BitVector;
use crate::coding::crc::{Crc16Params, CrcResult, CrcValidator};
use crate::config::BlockValidity;
use crate::error::{Error, Result};
use crate::field::FieldSpec;
use crate::stats::{HasStats, Stats};

pub use self::gps::{Coordinate, Location};

/// First bit of the lead block.
pub const BLOCK_START: usize = 21;

/// Bits per block, including the CRC.
pub const BLOCK_BITS: usize = 64;

/// Data bits per block.
pub const BLOCK_DATA_BITS: usize = 48;

/// Shortest frame that holds the lead block.
pub const MIN_FRAME_BITS: usize = 85;

/// CRC checker for Fleetsync blocks.
pub type BlockValidator = CrcValidator<Crc16Params>;

const MESSAGE_TYPE: FieldSpec = FieldSpec::uint(21, 5);
const EMERGENCY: FieldSpec = FieldSpec::flag(26);
const STATUS: FieldSpec = FieldSpec::uint(27, 7);
const FROM_FLEET: FieldSpec = FieldSpec::uint(34, 7);
const FROM_IDENT: FieldSpec = FieldSpec::uint(41, 10);
const TO_FLEET: FieldSpec = FieldSpec::uint(51, 7);
const TO_IDENT: FieldSpec = FieldSpec::uint(58, 10);
const ACK_REQUESTED: FieldSpec = FieldSpec::flag(68);

/// Start of the block with the given index.
pub const fn block_start(block: usize) -> usize {
    BLOCK_START + block * BLOCK_BITS
}

/// Type of a Fleetsync message, from the lead block.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "ser", derive(serde::Serialize, serde::Deserialize))]
pub enum MessageType {
    /// Automatic number identification sent at push-to-talk.
    Ani,
    Status,
    Acknowledge,
    LocationReport,
    Unknown(u8),
}

impl MessageType {
    /// Parse a message type from the given 5 bits.
    pub fn from_bits(bits: u8) -> MessageType {
        use self::MessageType::*;

        assert!(bits >> 5 == 0);

        match bits {
            0b00001 => Ani,
            0b00010 => Status,
            0b00110 => Acknowledge,
            0b01000 => LocationReport,
            _ => Unknown(bits),
        }
    }

    pub fn to_bits(self) -> u8 {
        use self::MessageType::*;

        match self {
            Ani => 0b00001,
            Status => 0b00010,
            Acknowledge => 0b00110,
            LocationReport => 0b01000,
            Unknown(bits) => bits,
        }
    }

    /// Number of blocks that make up the message.
    pub fn blocks(self) -> usize {
        match self {
            MessageType::LocationReport => 3,
            _ => 1,
        }
    }
}

/// Fleet and unit ID of a radio.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "ser", derive(serde::Serialize, serde::Deserialize))]
pub struct Address {
    /// 7-bit fleet number.
    pub fleet: u8,
    /// 10-bit unit ident within the fleet.
    pub ident: u16,
}

impl Address {
    fn decode(bits: &BitVector, fleet: &FieldSpec, ident: &FieldSpec) -> Result<Self> {
        Ok(Address {
            fleet: bits.get_uint(fleet)? as u8,
            ident: bits.get_uint(ident)? as u16,
        })
    }
}

/// Decoded Fleetsync message.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FleetsyncMessage {
    bits: BitVector,
    message_type: MessageType,
    emergency: bool,
    status: u8,
    from: Address,
    to: Address,
    ack_requested: bool,
    location: Option<Location>,
    blocks: Vec<CrcResult>,
    valid: bool,
    stats: Stats,
}

impl FleetsyncMessage {
    /// Check and correct each block of the given frame and decode its fields.
    ///
    /// Blocks the message type calls for but the frame doesn't hold are reported as
    /// `FailedUnrecoverable`.
    pub fn decode(mut bits: BitVector, validity: BlockValidity, crc: &BlockValidator)
        -> Result<Self>
    {
        if bits.len() < MIN_FRAME_BITS {
            return Err(Error::FrameLength {
                expected: MIN_FRAME_BITS,
                actual: bits.len(),
            });
        }

        let mut stats = Stats::default();
        let mut blocks = vec![check_block(&mut bits, 0, crc, &mut stats)];

        let message_type = MessageType::from_bits(bits.get_uint(&MESSAGE_TYPE)? as u8);

        for block in 1..message_type.blocks() {
            blocks.push(check_block(&mut bits, block, crc, &mut stats));
        }

        let location = match message_type {
            MessageType::LocationReport if bits.len() >= block_start(3) =>
                Some(Location::decode(&bits)?),
            _ => None,
        };

        let valid = match validity {
            BlockValidity::LeadBlock => blocks[0].passes(),
            BlockValidity::AllBlocks => blocks.iter().all(CrcResult::passes),
        };

        stats.record_message(valid);

        trace!(?message_type, valid, corrected = bits.corrected_bit_count(),
               "decoded fleetsync message");

        Ok(FleetsyncMessage {
            message_type,
            emergency: bits.get_bool(&EMERGENCY)?,
            status: bits.get_uint(&STATUS)? as u8,
            from: Address::decode(&bits, &FROM_FLEET, &FROM_IDENT)?,
            to: Address::decode(&bits, &TO_FLEET, &TO_IDENT)?,
            ack_requested: bits.get_bool(&ACK_REQUESTED)?,
            location,
            blocks,
            valid,
            stats,
            bits,
        })
    }

    /// Write the CRC of every whole block in the given frame.
    pub fn seal(bits: &mut BitVector, crc: &BlockValidator) -> Result<()> {
        let mut block = 0;

        while block_start(block + 1) <= bits.len() {
            crc.generate(bits, block_start(block))?;
            block += 1;
        }

        Ok(())
    }

    pub fn bits(&self) -> &BitVector { &self.bits }
    pub fn message_type(&self) -> MessageType { self.message_type }
    pub fn emergency(&self) -> bool { self.emergency }
    /// Status number, meaningful for status messages.
    pub fn status(&self) -> u8 { self.status }
    pub fn from(&self) -> Address { self.from }
    pub fn to(&self) -> Address { self.to }
    pub fn ack_requested(&self) -> bool { self.ack_requested }
    /// GPS fix of a location report.
    pub fn location(&self) -> Option<&Location> { self.location.as_ref() }
    /// CRC outcome of each block, lead block first.
    pub fn block_results(&self) -> &[CrcResult] { &self.blocks }
    /// Whether the blocks that gate validity passed their CRC.
    pub fn is_valid(&self) -> bool { self.valid }
    pub fn corrected_bit_count(&self) -> usize { self.bits.corrected_bit_count() }
}

impl HasStats for FleetsyncMessage {
    fn stats(&self) -> &Stats { &self.stats }
}

fn check_block(bits: &mut BitVector, block: usize, crc: &BlockValidator, stats: &mut Stats)
    -> CrcResult
{
    let res = crc.check(bits, block_start(block));

    match res {
        CrcResult::Passed => stats.crc.record_fixes(0),
        CrcResult::Corrected => stats.crc.record_fixes(1),
        CrcResult::FailedParity | CrcResult::FailedUnrecoverable => {
            debug!(block, ?res, "fleetsync block failed crc");
            stats.record_err(&Error::CrcFailedParity { block });
        },
    }

    res
}

#[cfg(test)]
mod test {
    use super::*;

    fn status_frame(status: u8) -> BitVector {
        let mut bits = BitVector::new(block_start(1));

        bits.load(21, 5, MessageType::Status.to_bits() as u64).unwrap();
        bits.load(27, 7, status as u64).unwrap();
        bits.load(34, 7, 100).unwrap();
        bits.load(41, 10, 901).unwrap();
        bits.load(51, 7, 100).unwrap();
        bits.load(58, 10, 1000).unwrap();
        bits.set(68, true).unwrap();

        FleetsyncMessage::seal(&mut bits, &BlockValidator::new(BLOCK_DATA_BITS)).unwrap();

        bits
    }

    #[test]
    fn test_types() {
        assert_eq!(MessageType::from_bits(0b00001), MessageType::Ani);
        assert_eq!(MessageType::from_bits(0b00110), MessageType::Acknowledge);
        assert_eq!(MessageType::from_bits(0b11111), MessageType::Unknown(0b11111));
        assert_eq!(MessageType::LocationReport.blocks(), 3);
        assert_eq!(MessageType::Status.blocks(), 1);
        assert_eq!(MessageType::Unknown(7).to_bits(), 7);
    }

    #[test]
    fn test_status() {
        let crc = BlockValidator::new(BLOCK_DATA_BITS);
        let m = FleetsyncMessage::decode(status_frame(42), BlockValidity::LeadBlock, &crc)
            .unwrap();

        assert_eq!(m.message_type(), MessageType::Status);
        assert_eq!(m.status(), 42);
        assert!(!m.emergency());
        assert!(m.ack_requested());
        assert_eq!(m.from(), Address { fleet: 100, ident: 901 });
        assert_eq!(m.to(), Address { fleet: 100, ident: 1000 });
        assert_eq!(m.block_results(), &[CrcResult::Passed]);
        assert!(m.is_valid());
        assert_eq!(m.location(), None);
        assert_eq!(m.stats().crc.words(), 1);
        assert_eq!(m.stats().messages, 1);
    }

    #[test]
    fn test_corrected() {
        let crc = BlockValidator::new(BLOCK_DATA_BITS);
        let mut bits = status_frame(42);
        bits.set(30, !bits.get(30).unwrap()).unwrap();

        let m = FleetsyncMessage::decode(bits, BlockValidity::LeadBlock, &crc).unwrap();

        assert_eq!(m.status(), 42);
        assert_eq!(m.block_results(), &[CrcResult::Corrected]);
        assert_eq!(m.corrected_bit_count(), 1);
        assert_eq!(m.stats().crc.fixed(), 1);
        assert!(m.is_valid());
    }

    #[test]
    fn test_failed() {
        let crc = BlockValidator::new(BLOCK_DATA_BITS);
        let mut bits = status_frame(42);
        bits.set(30, !bits.get(30).unwrap()).unwrap();
        bits.set(77, !bits.get(77).unwrap()).unwrap();

        let m = FleetsyncMessage::decode(bits, BlockValidity::LeadBlock, &crc).unwrap();

        assert_eq!(m.block_results(), &[CrcResult::FailedParity]);
        assert!(!m.is_valid());
        assert_eq!(m.stats().crc.err(), 1);
        assert_eq!(m.stats().invalid, 1);
    }

    #[test]
    fn test_missing_blocks() {
        let crc = BlockValidator::new(BLOCK_DATA_BITS);
        let mut bits = status_frame(0);
        bits.load(21, 5, MessageType::LocationReport.to_bits() as u64).unwrap();
        FleetsyncMessage::seal(&mut bits, &crc).unwrap();

        let m = FleetsyncMessage::decode(bits.clone(), BlockValidity::LeadBlock, &crc)
            .unwrap();

        assert_eq!(m.block_results(), &[
            CrcResult::Passed,
            CrcResult::FailedUnrecoverable,
            CrcResult::FailedUnrecoverable,
        ]);
        assert!(m.is_valid());
        assert_eq!(m.location(), None);

        let m = FleetsyncMessage::decode(bits, BlockValidity::AllBlocks, &crc).unwrap();
        assert!(!m.is_valid());
    }

    #[test]
    fn test_short() {
        let crc = BlockValidator::new(BLOCK_DATA_BITS);

        assert_eq!(
            FleetsyncMessage::decode(BitVector::new(84), BlockValidity::LeadBlock, &crc),
            Err(Error::FrameLength { expected: 85, actual: 84 })
        );
    }
}
