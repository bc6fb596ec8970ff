//! Standard errors that may occur when reconstructing messages.

/// Decoder runtime errors.
///
/// Only `BitIndexOutOfRange`, `ValueOverflow`, `FrameLength`, `InvalidCode`, and `InvalidConfig` escape
/// the decoding pipeline. The FEC variants are reported per codeword or block and
/// folded into a message's validity flag.
#[derive(thiserror::Error, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// A bit index fell outside of the vector.
    #[error("bit index {index} out of range for {len}-bit vector")]
    BitIndexOutOfRange { index: usize, len: usize },
    /// A value had more significant bits than the field it was written to.
    #[error("value {value:#x} doesn't fit in {width} bits")]
    ValueOverflow { value: u64, width: usize },
    /// A frame handed to the decoder had the wrong number of bits.
    #[error("frame has {actual} bits, expected at least {expected}")]
    FrameLength { expected: usize, actual: usize },
    /// Too many errors were detected when attempting a Hamming decode.
    #[error("uncorrectable hamming word at bit {offset}")]
    HammingUncorrectable { offset: usize },
    /// Too many errors were detected when attempting a RS decode.
    #[error("reed-solomon word is irrecoverable")]
    ReedSolomonIrrecoverable,
    /// A CRC-protected block failed its check and couldn't be repaired.
    #[error("crc failed for block {block}")]
    CrcFailedParity { block: usize },
    /// Too many errors were detected when attempting a cyclic code decode.
    #[error("unrecoverable cyclic word at bit {offset}")]
    CyclicUnrecoverable { offset: usize },
    /// Reed-Solomon code parameters are inconsistent.
    #[error("invalid RS({n},{k},{d}) code")]
    InvalidCode { n: usize, k: usize, d: usize },
    /// Decoder configuration is outside what the protocol codes can support.
    #[error("invalid decoder config: {0}")]
    InvalidConfig(String),
}

/// Standard result using `Error`.
pub type Result<T> = std::result::Result<T, Error>;
