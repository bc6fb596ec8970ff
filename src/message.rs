//! Construction of typed messages from raw frames and their delivery to listeners.

use tracing::debug;

use crate::bits::BitVector;
use crate::config::DecoderConfig;
use crate::error::Result;
use crate::fleetsync::{BlockValidator, FleetsyncMessage, BLOCK_DATA_BITS};
use crate::p25::{Ldu1, Ldu2};
use crate::reconstruct::MessageReconstructor;
use crate::stats::{HasStats, Stats};

/// Kind of frame handed over by the frame synchronizer.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "ser", derive(serde::Serialize, serde::Deserialize))]
pub enum MessageKind {
    P25Ldu1,
    P25Ldu2,
    Fleetsync,
}

/// Message decoded from one frame. Invalid messages are still delivered.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ProtocolMessage {
    Ldu1(Ldu1),
    Ldu2(Ldu2),
    Fleetsync(FleetsyncMessage),
}

/// Behavior common to all decoded messages.
pub trait Message: HasStats {
    /// The frame after correction.
    fn bits(&self) -> &BitVector;

    /// Whether the protecting codes judged the message intact.
    fn is_valid(&self) -> bool;

    /// Number of bits changed by all correction stages.
    fn corrected_bit_count(&self) -> usize { self.bits().corrected_bit_count() }
}

impl Message for Ldu1 {
    fn bits(&self) -> &BitVector { Ldu1::bits(self) }
    fn is_valid(&self) -> bool { Ldu1::is_valid(self) }
}

impl Message for Ldu2 {
    fn bits(&self) -> &BitVector { Ldu2::bits(self) }
    fn is_valid(&self) -> bool { Ldu2::is_valid(self) }
}

impl Message for FleetsyncMessage {
    fn bits(&self) -> &BitVector { FleetsyncMessage::bits(self) }
    fn is_valid(&self) -> bool { FleetsyncMessage::is_valid(self) }
}

impl ProtocolMessage {
    pub fn kind(&self) -> MessageKind {
        match *self {
            ProtocolMessage::Ldu1(_) => MessageKind::P25Ldu1,
            ProtocolMessage::Ldu2(_) => MessageKind::P25Ldu2,
            ProtocolMessage::Fleetsync(_) => MessageKind::Fleetsync,
        }
    }

    fn inner(&self) -> &dyn Message {
        match *self {
            ProtocolMessage::Ldu1(ref m) => m,
            ProtocolMessage::Ldu2(ref m) => m,
            ProtocolMessage::Fleetsync(ref m) => m,
        }
    }
}

impl HasStats for ProtocolMessage {
    fn stats(&self) -> &Stats { self.inner().stats() }
}

impl Message for ProtocolMessage {
    fn bits(&self) -> &BitVector { self.inner().bits() }
    fn is_valid(&self) -> bool { self.inner().is_valid() }
    fn corrected_bit_count(&self) -> usize { self.inner().corrected_bit_count() }
}

/// Builds typed messages from raw frames according to a configuration.
///
/// The factory holds no per-frame state, so one instance can serve any number of
/// channels.
#[derive(Clone, Debug)]
pub struct MessageFactory {
    config: DecoderConfig,
    reconstructor: MessageReconstructor,
    crc: BlockValidator,
}

impl MessageFactory {
    /// Create a new `MessageFactory`, failing if the configuration asks for more than the
    /// protocol codes can correct.
    pub fn new(config: DecoderConfig) -> Result<Self> {
        config.validate()?;

        Ok(MessageFactory {
            config,
            reconstructor: MessageReconstructor::new()?,
            crc: BlockValidator::new(BLOCK_DATA_BITS),
        })
    }

    pub fn config(&self) -> &DecoderConfig { &self.config }

    /// Correct the given frame and construct the message it carries.
    ///
    /// Only structural problems, such as a frame too short for its kind, are returned
    /// as `Err`. Frames that fail correction produce messages marked invalid.
    pub fn create(&self, kind: MessageKind, bits: BitVector) -> Result<ProtocolMessage> {
        Ok(match kind {
            MessageKind::P25Ldu1 => ProtocolMessage::Ldu1(
                Ldu1::decode(bits, self.config.ldu1_errors(), &self.reconstructor)?),
            MessageKind::P25Ldu2 => ProtocolMessage::Ldu2(
                Ldu2::decode(bits, self.config.ldu2_errors(), &self.reconstructor)?),
            MessageKind::Fleetsync => ProtocolMessage::Fleetsync(
                FleetsyncMessage::decode(bits, self.config.fleetsync_validity(), &self.crc)?),
        })
    }
}

// One factory may be shared by decoders running on several threads.
const _: fn() = || {
    fn shared<T: Send + Sync>() {}
    shared::<MessageFactory>();
};

/// Receives every message the decoder constructs.
pub trait MessageListener {
    fn on_message(&mut self, msg: ProtocolMessage);
}

impl<F: FnMut(ProtocolMessage)> MessageListener for F {
    fn on_message(&mut self, msg: ProtocolMessage) { self(msg) }
}

/// Decodes frames for one channel, pushing messages to a listener and keeping running
/// statistics.
pub struct Decoder<L: MessageListener> {
    factory: MessageFactory,
    listener: L,
    stats: Stats,
}

impl<L: MessageListener> Decoder<L> {
    /// Create a new `Decoder` with the given configuration and listener.
    pub fn new(config: DecoderConfig, listener: L) -> Result<Self> {
        Ok(Decoder {
            factory: MessageFactory::new(config)?,
            listener,
            stats: Stats::default(),
        })
    }

    /// Decode the given frame and deliver the resulting message.
    pub fn receive(&mut self, kind: MessageKind, bits: BitVector) -> Result<()> {
        let msg = match self.factory.create(kind, bits) {
            Ok(msg) => msg,
            Err(e) => {
                debug!(?kind, %e, "dropped frame");
                return Err(e);
            },
        };

        self.stats.merge(&msg);
        self.listener.on_message(msg);

        Ok(())
    }

    pub fn listener(&self) -> &L { &self.listener }

    /// Consume the decoder and return its listener.
    pub fn into_listener(self) -> L { self.listener }
}

impl<L: MessageListener> HasStats for Decoder<L> {
    fn stats(&self) -> &Stats { &self.stats }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::BlockValidity;
    use crate::error::Error;
    use crate::p25::NetworkAccessCode;

    #[test]
    fn test_factory() {
        let f = MessageFactory::new(DecoderConfig::default()).unwrap();

        let bits = Ldu1::synthesize(NetworkAccessCode::Default, &BitVector::new(72), [0, 0])
            .unwrap();
        let msg = f.create(MessageKind::P25Ldu1, bits).unwrap();

        assert_eq!(msg.kind(), MessageKind::P25Ldu1);
        assert!(msg.is_valid());
        assert_eq!(msg.corrected_bit_count(), 0);
        assert_eq!(msg.bits().len(), 1488);
        assert_eq!(msg.stats().messages, 1);

        assert!(f.create(MessageKind::P25Ldu2, BitVector::new(100)).is_err());
    }

    #[test]
    fn test_bad_config() {
        let c = DecoderConfig::builder().ldu2_errors(5).build();

        assert!(matches!(MessageFactory::new(c), Err(Error::InvalidConfig(_))));
        assert!(Decoder::new(c, |_: ProtocolMessage| {}).is_err());
    }

    #[test]
    fn test_decoder() {
        let mut kinds = vec![];
        let config = DecoderConfig::builder()
            .fleetsync_validity(BlockValidity::AllBlocks)
            .build();

        let mut dec = Decoder::new(config, |m: ProtocolMessage| kinds.push(m.kind()))
            .unwrap();

        let bits = Ldu2::synthesize(NetworkAccessCode::Default, &BitVector::new(96), [0, 0])
            .unwrap();

        dec.receive(MessageKind::P25Ldu2, bits.clone()).unwrap();
        dec.receive(MessageKind::P25Ldu2, bits).unwrap();
        assert!(dec.receive(MessageKind::Fleetsync, BitVector::new(10)).is_err());

        assert_eq!(dec.stats().messages, 2);
        assert_eq!(dec.stats().invalid, 0);
        assert_eq!(dec.stats().hamming.words(), 48);

        drop(dec);
        assert_eq!(kinds, [MessageKind::P25Ldu2, MessageKind::P25Ldu2]);
    }
}
