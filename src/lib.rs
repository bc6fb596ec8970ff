//! Forward error correction and message reconstruction for land mobile radio
//! bitstreams.
//!
//! Frames arrive already demodulated and aligned to their sync pattern. Each is run
//! through the codes protecting it, then turned into a typed message that records
//! whether it decoded cleanly and how many bits were repaired along the way.
//!
//! ```
//! use lmr_decode::{BitVector, Decoder, DecoderConfig, MessageKind, ProtocolMessage};
//! use lmr_decode::p25::{Ldu2, NetworkAccessCode};
//! use lmr_decode::stats::HasStats;
//!
//! let mut es = BitVector::new(96);
//! es.load(72, 8, 0x84).unwrap();
//! es.load(80, 16, 0x1234).unwrap();
//!
//! let frame = Ldu2::synthesize(NetworkAccessCode::Default, &es, [0, 0]).unwrap();
//!
//! let mut dec = Decoder::new(DecoderConfig::default(), |msg: ProtocolMessage| {
//!     if let ProtocolMessage::Ldu2(ldu) = msg {
//!         assert_eq!(ldu.key_id(), 0x1234);
//!     }
//! }).unwrap();
//!
//! dec.receive(MessageKind::P25Ldu2, frame).unwrap();
//! assert_eq!(dec.stats().messages, 1);
//! ```

pub mod bits;
pub mod coding;
pub mod config;
pub mod error;
pub mod field;
pub mod fleetsync;
pub mod message;
pub mod p25;
pub mod reconstruct;
pub mod stats;

pub use crate::bits::BitVector;
pub use crate::config::{BlockValidity, DecoderConfig};
pub use crate::error::{Error, Result};
pub use crate::field::{Decode, FieldSpec, FieldValue};
pub use crate::message::{
    Decoder,
    Message,
    MessageFactory,
    MessageKind,
    MessageListener,
    ProtocolMessage,
};
