//! Decoder configuration.

use typed_builder::TypedBuilder;

use crate::error::{Error, Result};

/// Reed-Solomon correction capability of the LDU1 link control word, a (24, 12, 13)
/// code.
pub const LDU1_MAX_ERRORS: usize = 6;

/// Reed-Solomon correction capability of the LDU2 encryption sync word, a (24, 16, 9)
/// code.
pub const LDU2_MAX_ERRORS: usize = 4;

/// Which CRC-protected blocks decide whether a multi-block message is valid.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "ser", derive(serde::Serialize, serde::Deserialize))]
pub enum BlockValidity {
    /// Only the first block, which carries the message type and addresses.
    #[default]
    LeadBlock,
    /// Every block of the message.
    AllBlocks,
}

/// Options controlling how frames are corrected and judged.
///
/// ```
/// use lmr_decode::config::{BlockValidity, DecoderConfig};
///
/// let config = DecoderConfig::builder()
///     .ldu1_errors(5)
///     .fleetsync_validity(BlockValidity::AllBlocks)
///     .build();
///
/// assert_eq!(config.ldu2_errors(), 4);
/// assert!(config.validate().is_ok());
/// ```
#[derive(TypedBuilder, Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "ser", derive(serde::Serialize, serde::Deserialize))]
pub struct DecoderConfig {
    /// Number of symbol errors to correct in the LDU1 link control word.
    #[builder(default = LDU1_MAX_ERRORS)]
    ldu1_errors: usize,
    /// Number of symbol errors to correct in the LDU2 encryption sync word.
    #[builder(default = LDU2_MAX_ERRORS)]
    ldu2_errors: usize,
    /// Blocks that gate the validity of Fleetsync messages.
    #[builder(default)]
    fleetsync_validity: BlockValidity,
}

impl DecoderConfig {
    pub fn ldu1_errors(&self) -> usize { self.ldu1_errors }
    pub fn ldu2_errors(&self) -> usize { self.ldu2_errors }
    pub fn fleetsync_validity(&self) -> BlockValidity { self.fleetsync_validity }

    /// Verify each option is within what the protocol codes support.
    pub fn validate(&self) -> Result<()> {
        if self.ldu1_errors > LDU1_MAX_ERRORS {
            return Err(Error::InvalidConfig(format!(
                "ldu1_errors {} exceeds {}", self.ldu1_errors, LDU1_MAX_ERRORS)));
        }

        if self.ldu2_errors > LDU2_MAX_ERRORS {
            return Err(Error::InvalidConfig(format!(
                "ldu2_errors {} exceeds {}", self.ldu2_errors, LDU2_MAX_ERRORS)));
        }

        Ok(())
    }
}

impl Default for DecoderConfig {
    fn default() -> Self {
        DecoderConfig::builder().build()
    }
}
