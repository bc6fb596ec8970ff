//! Decode the encryption sync word carried by LDU2 frames.

use crate::bits::BitVector;
use crate::error::Result;
use crate::field::{Decode, FieldSpec};

/// Number of bits in an encryption sync word.
pub const ENCRYPTION_SYNC_BITS: usize = 96;

/// Algorithm ID sent when audio isn't encrypted.
pub const UNENCRYPTED_ALGID: u8 = 0x80;

const MESSAGE_INDICATOR: FieldSpec = FieldSpec::range(0, 72, Decode::Hex);
const ALGORITHM: FieldSpec = FieldSpec::uint(72, 8);
const KEY: FieldSpec = FieldSpec::uint(80, 16);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "ser", derive(serde::Serialize, serde::Deserialize))]
pub enum CryptoAlgorithm {
    Accordion,
    BatonEven,
    Firefly,
    Mayfly,
    Saville,
    BatonOdd,
    Unencrypted,
    DES,
    TripleDES,
    AES,
}

impl CryptoAlgorithm {
    pub fn from_bits(bits: u8) -> Option<CryptoAlgorithm> {
        use self::CryptoAlgorithm::*;

        match bits {
            0x00 => Some(Accordion),
            0x01 => Some(BatonEven),
            0x02 => Some(Firefly),
            0x03 => Some(Mayfly),
            0x04 => Some(Saville),
            0x41 => Some(BatonOdd),
            0x80 => Some(Unencrypted),
            0x81 => Some(DES),
            0x83 => Some(TripleDES),
            0x84 => Some(AES),
            _ => None,
        }
    }
}

/// Encryption parameters for the voice frames of the current superframe.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "ser", derive(serde::Serialize, serde::Deserialize))]
pub struct EncryptionSync {
    /// 72-bit message indicator as uppercase hex.
    message_indicator: String,
    algorithm_id: u8,
    key_id: u16,
}

impl EncryptionSync {
    /// Interpret the given 96 bits as an encryption sync word.
    pub fn new(bits: &BitVector) -> Result<Self> {
        Ok(EncryptionSync {
            message_indicator: bits.get_hex(&MESSAGE_INDICATOR)?,
            algorithm_id: bits.get_uint(&ALGORITHM)? as u8,
            key_id: bits.get_uint(&KEY)? as u16,
        })
    }

    /// Initialization vector for the cipher.
    pub fn message_indicator(&self) -> &str { &self.message_indicator }

    /// Raw algorithm ID.
    pub fn algorithm_id(&self) -> u8 { self.algorithm_id }

    /// Named algorithm, if the ID is a known one.
    pub fn algorithm(&self) -> Option<CryptoAlgorithm> {
        CryptoAlgorithm::from_bits(self.algorithm_id)
    }

    pub fn key_id(&self) -> u16 { self.key_id }

    /// Whether the voice frames are encrypted.
    pub fn is_encrypted_audio(&self) -> bool {
        self.algorithm_id != UNENCRYPTED_ALGID
    }
}
