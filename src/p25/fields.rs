//! Identifiers and parameters shared by link control words.

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "ser", derive(serde::Serialize, serde::Deserialize))]
pub struct ServiceOptions(u8);

impl ServiceOptions {
    pub fn new(opts: u8) -> ServiceOptions { ServiceOptions(opts) }

    pub fn emergency(&self) -> bool { self.0 >> 7 == 1 }
    pub fn protected(&self) -> bool { self.0 >> 6 & 1 == 1 }
    pub fn duplex(&self) -> bool { self.0 >> 5 & 1 == 1 }
    pub fn packet_switched(&self) -> bool { self.0 >> 4 & 1 == 1 }
    pub fn prio(&self) -> u8 { self.0 & 0x7 }
}

/// Uniquely identifies a channel within a site.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "ser", derive(serde::Serialize, serde::Deserialize))]
pub struct Channel(u16);

impl Channel {
    /// Create a new `Channel` from the given 16 bits.
    pub fn new(bits: u16) -> Channel { Channel(bits) }

    /// Channel ID whose parameters to use.
    pub fn id(&self) -> u8 { (self.0 >> 12) as u8 }
    /// Individual channel number within the channel.
    pub fn number(&self) -> u16 { self.0 & 0xFFF }
}

/// Identifies which group a message belongs to.
///
/// Users set their radios to receive one or more talkgroups, and the radio will only
/// unsquelch if one of those talkgroups is seen.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "ser", derive(serde::Serialize, serde::Deserialize))]
pub enum TalkGroup {
    /// Includes nobody.
    Nobody,
    /// Default talkgroup when no other is selected.
    Default,
    /// Includes everybody.
    Everbody,
    /// Specific group of users.
    Other(u16),
}

impl TalkGroup {
    /// Parse a talkgroup from the given 16 bits.
    pub fn from_bits(bits: u16) -> TalkGroup {
        use self::TalkGroup::*;

        match bits {
            0x0000 => Nobody,
            0x0001 => Default,
            0xFFFF => Everbody,
            _ => Other(bits),
        }
    }

    /// Convert the talkgroup back to its 16-bit ID.
    pub fn to_bits(self) -> u16 {
        use self::TalkGroup::*;

        match self {
            Nobody => 0x0000,
            Default => 0x0001,
            Everbody => 0xFFFF,
            Other(bits) => bits,
        }
    }
}

/// Computes TX/RX frequencies and bandwidth for channel numbers within a site.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "ser", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelParams {
    /// Base frequency in Hz.
    base: u64,
    /// Channel spacing in Hz.
    spacing: u64,
    /// Transmit frequency offset in Hz.
    offset: i64,
    /// Channel bandwidth in Hz.
    pub bandwidth: u32,
}

impl ChannelParams {
    /// Create a new `ChannelParams` from the given base frequency (5Hz steps), bandwidth
    /// (125Hz steps), signed TX offset (250kHz steps), and inter-channel spacing (125Hz
    /// steps.)
    pub fn new(base: u32, bandwidth: u16, offset: i64, spacing: u16) -> ChannelParams {
        ChannelParams {
            base: base as u64 * 5,
            spacing: spacing as u64 * 125,
            offset: offset * 250_000,
            bandwidth: bandwidth as u32 * 125,
        }
    }

    /// Base frequency in Hz.
    pub fn base(&self) -> u64 { self.base }

    /// Transmit frequency offset in Hz.
    pub fn offset(&self) -> i64 { self.offset }

    /// Receive frequency for the given channel number in Hz.
    pub fn rx_freq(&self, ch: u16) -> u64 {
        self.base + self.spacing * ch as u64
    }

    /// Transmit frequency for the given channel number in Hz.
    pub fn tx_freq(&self, ch: u16) -> u64 {
        (self.rx_freq(ch) as i64 + self.offset) as u64
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_channel_params() {
        // Example from the standard.
        let p = ChannelParams::new(170201250, 0x64, -180, 0x32);
        assert_eq!(p.base(), 851_006_250);
        assert_eq!(p.spacing, 6_250);
        assert_eq!(p.offset(), -45_000_000);
        assert_eq!(p.bandwidth, 12_500);
        assert_eq!(p.rx_freq(0b1001), 851_062_500);
        assert_eq!(p.tx_freq(0b1001), 806_062_500);
    }

    #[test]
    fn test_talkgroup() {
        assert_eq!(TalkGroup::from_bits(0), TalkGroup::Nobody);
        assert_eq!(TalkGroup::from_bits(1), TalkGroup::Default);
        assert_eq!(TalkGroup::from_bits(0xFFFF), TalkGroup::Everbody);
        assert_eq!(TalkGroup::from_bits(0x1234), TalkGroup::Other(0x1234));
        assert_eq!(TalkGroup::Other(0x1234).to_bits(), 0x1234);
        assert_eq!(TalkGroup::Everbody.to_bits(), 0xFFFF);
    }

    #[test]
    fn test_channel() {
        let c = Channel::new(0b1000_100001110111);
        assert_eq!(c.id(), 0b1000);
        assert_eq!(c.number(), 0b100001110111);
    }

    #[test]
    fn test_opts() {
        let o = ServiceOptions::new(0b1100_0101);
        assert!(o.emergency());
        assert!(o.protected());
        assert!(!o.duplex());
        assert!(!o.packet_switched());
        assert_eq!(o.prio(), 0b101);
    }
}
