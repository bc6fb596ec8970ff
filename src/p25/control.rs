//! Decode the link control (LC) word carried by LDU1 frames.

use crate::bits::BitVector;
use crate::error::Result;
use crate::field::{Decode, FieldSpec};

use super::fields::{Channel, ChannelParams, ServiceOptions, TalkGroup};

/// Number of bits in a link control word.
pub const LINK_CONTROL_BITS: usize = 72;

const PROTECTED: FieldSpec = FieldSpec::flag(0);
const STANDARD_FORMAT: FieldSpec = FieldSpec::flag(1);
const OPCODE: FieldSpec = FieldSpec::uint(2, 6);
const MFID: FieldSpec = FieldSpec::uint(8, 8);
const OPTS: FieldSpec = FieldSpec::uint(16, 8);
const CALL_TERMINATION_ADDRESS: FieldSpec = FieldSpec::uint(48, 24);

/// Type of a link control payload.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "ser", derive(serde::Serialize, serde::Deserialize))]
pub enum LinkControlOpcode {
    GroupVoiceChannelUser,
    GroupVoiceChannelUpdate,
    UnitToUnitVoiceChannelUser,
    TelephoneInterconnectVoiceChannelUser,
    CallTermination,
    UnitRegistrationCommand,
    UnitAuthenticationCommand,
    ChannelIdentifierUpdate,
}

impl LinkControlOpcode {
    /// Try to parse an opcode from the given 6 bits.
    pub fn from_bits(bits: u8) -> Option<LinkControlOpcode> {
        use self::LinkControlOpcode::*;

        assert!(bits >> 6 == 0);

        match bits {
            0b000000 => Some(GroupVoiceChannelUser),
            0b000010 => Some(GroupVoiceChannelUpdate),
            0b000011 => Some(UnitToUnitVoiceChannelUser),
            0b000110 => Some(TelephoneInterconnectVoiceChannelUser),
            0b001111 => Some(CallTermination),
            0b010001 => Some(UnitRegistrationCommand),
            0b010010 => Some(UnitAuthenticationCommand),
            0b011000 => Some(ChannelIdentifierUpdate),
            _ => None,
        }
    }

    pub fn to_bits(self) -> u8 {
        use self::LinkControlOpcode::*;

        match self {
            GroupVoiceChannelUser => 0b000000,
            GroupVoiceChannelUpdate => 0b000010,
            UnitToUnitVoiceChannelUser => 0b000011,
            TelephoneInterconnectVoiceChannelUser => 0b000110,
            CallTermination => 0b001111,
            UnitRegistrationCommand => 0b010001,
            UnitAuthenticationCommand => 0b010010,
            ChannelIdentifierUpdate => 0b011000,
        }
    }
}

/// Identity of unit transmitting on the current talkgroup traffic channel.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "ser", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupVoiceChannelUser {
    /// Service options provided by current traffic channel.
    pub opts: ServiceOptions,
    /// Current resident talkgroup of traffic channel.
    pub talkgroup: TalkGroup,
    /// Address of user currently transmitting.
    pub src_unit: u32,
}

impl GroupVoiceChannelUser {
    const TALKGROUP: FieldSpec = FieldSpec::uint(32, 16);
    const SOURCE: FieldSpec = FieldSpec::uint(48, 24);

    fn decode(bits: &BitVector) -> Result<Self> {
        Ok(GroupVoiceChannelUser {
            opts: ServiceOptions::new(bits.get_uint(&OPTS)? as u8),
            talkgroup: TalkGroup::from_bits(bits.get_uint(&Self::TALKGROUP)? as u16),
            src_unit: bits.get_uint(&Self::SOURCE)? as u32,
        })
    }
}

/// Two channels and the talkgroups currently active on them.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "ser", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupVoiceChannelUpdate {
    pub updates: [(Channel, TalkGroup); 2],
}

impl GroupVoiceChannelUpdate {
    const CHANNEL_A: FieldSpec = FieldSpec::uint(8, 16);
    const GROUP_A: FieldSpec = FieldSpec::uint(24, 16);
    const CHANNEL_B: FieldSpec = FieldSpec::uint(40, 16);
    const GROUP_B: FieldSpec = FieldSpec::uint(56, 16);

    fn decode(bits: &BitVector) -> Result<Self> {
        let pair = |ch: &FieldSpec, tg: &FieldSpec| -> Result<(Channel, TalkGroup)> {
            Ok((
                Channel::new(bits.get_uint(ch)? as u16),
                TalkGroup::from_bits(bits.get_uint(tg)? as u16),
            ))
        };

        Ok(GroupVoiceChannelUpdate {
            updates: [
                pair(&Self::CHANNEL_A, &Self::GROUP_A)?,
                pair(&Self::CHANNEL_B, &Self::GROUP_B)?,
            ],
        })
    }
}

/// Identity of units transmitting on current unit-to-unit traffic channel.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "ser", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitToUnitVoiceChannelUser {
    pub opts: ServiceOptions,
    /// Destination user address for current transmission.
    pub dest_unit: u32,
    /// Source user address for current transmission.
    pub src_unit: u32,
}

impl UnitToUnitVoiceChannelUser {
    const TARGET: FieldSpec = FieldSpec::uint(24, 24);
    const SOURCE: FieldSpec = FieldSpec::uint(48, 24);

    fn decode(bits: &BitVector) -> Result<Self> {
        Ok(UnitToUnitVoiceChannelUser {
            opts: ServiceOptions::new(bits.get_uint(&OPTS)? as u8),
            dest_unit: bits.get_uint(&Self::TARGET)? as u32,
            src_unit: bits.get_uint(&Self::SOURCE)? as u32,
        })
    }
}

/// Identity of unit participating in current phone call.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "ser", derive(serde::Serialize, serde::Deserialize))]
pub struct TelephoneInterconnectVoiceChannelUser {
    pub opts: ServiceOptions,
    /// Maximum amount of time (in units of 100ms) that the phone call can occupy the
    /// traffic channel.
    pub call_timer: u16,
    /// Unit participating in call.
    pub unit: u32,
}

impl TelephoneInterconnectVoiceChannelUser {
    const CALL_TIMER: FieldSpec = FieldSpec::uint(32, 16);
    const ADDRESS: FieldSpec = FieldSpec::uint(48, 24);

    fn decode(bits: &BitVector) -> Result<Self> {
        Ok(TelephoneInterconnectVoiceChannelUser {
            opts: ServiceOptions::new(bits.get_uint(&OPTS)? as u8),
            call_timer: bits.get_uint(&Self::CALL_TIMER)? as u16,
            unit: bits.get_uint(&Self::ADDRESS)? as u32,
        })
    }
}

/// Addressing carried by the unit registration and authentication commands.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "ser", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitCommand {
    /// Wide area communications network ID.
    pub wacn: u32,
    /// System ID within the WACN.
    pub system: u16,
    /// Unit the command is directed to.
    pub dest_unit: u32,
}

impl UnitCommand {
    const WACN: FieldSpec = FieldSpec::uint(8, 20);
    const SYSTEM: FieldSpec = FieldSpec::uint(28, 12);
    const TARGET: FieldSpec = FieldSpec::uint(40, 24);

    fn decode(bits: &BitVector) -> Result<Self> {
        Ok(UnitCommand {
            wacn: bits.get_uint(&Self::WACN)? as u32,
            system: bits.get_uint(&Self::SYSTEM)? as u16,
            dest_unit: bits.get_uint(&Self::TARGET)? as u32,
        })
    }
}

/// Advertisement of parameters used to calculate TX/RX frequencies for the given
/// associated channel ID.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "ser", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelIdentifierUpdate {
    /// Channel ID to associate the parameters with.
    pub id: u8,
    pub params: ChannelParams,
}

impl ChannelIdentifierUpdate {
    const ID: FieldSpec = FieldSpec::uint(8, 4);
    const BANDWIDTH: FieldSpec = FieldSpec::uint(12, 9);
    const OFFSET: FieldSpec = FieldSpec::range(21, 9, Decode::SignedOffset);
    const SPACING: FieldSpec = FieldSpec::uint(30, 10);
    const BASE: FieldSpec = FieldSpec::uint(40, 32);

    fn decode(bits: &BitVector) -> Result<Self> {
        Ok(ChannelIdentifierUpdate {
            id: bits.get_uint(&Self::ID)? as u8,
            params: ChannelParams::new(
                bits.get_uint(&Self::BASE)? as u32,
                bits.get_uint(&Self::BANDWIDTH)? as u16,
                bits.get_signed(&Self::OFFSET)?,
                bits.get_uint(&Self::SPACING)? as u16,
            ),
        })
    }
}

/// Decoded payload of a link control word.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "ser", derive(serde::Serialize, serde::Deserialize))]
pub enum LinkControl {
    GroupVoiceChannelUser(GroupVoiceChannelUser),
    GroupVoiceChannelUpdate(GroupVoiceChannelUpdate),
    UnitToUnitVoiceChannelUser(UnitToUnitVoiceChannelUser),
    TelephoneInterconnectVoiceChannelUser(TelephoneInterconnectVoiceChannelUser),
    /// Address of the unit whose call is ending.
    CallTermination { unit: u32 },
    UnitRegistrationCommand(UnitCommand),
    UnitAuthenticationCommand(UnitCommand),
    ChannelIdentifierUpdate(ChannelIdentifierUpdate),
    /// Payload is encrypted and can't be interpreted.
    Encrypted,
    /// Opcode isn't one this decoder interprets.
    Unknown(u8),
}

/// Link control word with its common header and decoded payload.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LinkControlWord {
    bits: BitVector,
    protected: bool,
    standard_format: bool,
    opcode: u8,
    mfid: u8,
    payload: LinkControl,
}

impl LinkControlWord {
    /// Interpret the given 72 bits as a link control word.
    pub fn new(bits: BitVector) -> Result<Self> {
        let protected = bits.get_bool(&PROTECTED)?;
        let opcode = bits.get_uint(&OPCODE)? as u8;

        let payload = if protected {
            LinkControl::Encrypted
        } else {
            Self::decode_payload(&bits, opcode)?
        };

        Ok(LinkControlWord {
            protected,
            standard_format: bits.get_bool(&STANDARD_FORMAT)?,
            opcode,
            mfid: bits.get_uint(&MFID)? as u8,
            payload,
            bits,
        })
    }

    fn decode_payload(bits: &BitVector, opcode: u8) -> Result<LinkControl> {
        use self::LinkControlOpcode as Op;

        let opcode = match LinkControlOpcode::from_bits(opcode) {
            Some(op) => op,
            None => return Ok(LinkControl::Unknown(opcode)),
        };

        Ok(match opcode {
            Op::GroupVoiceChannelUser =>
                LinkControl::GroupVoiceChannelUser(GroupVoiceChannelUser::decode(bits)?),
            Op::GroupVoiceChannelUpdate =>
                LinkControl::GroupVoiceChannelUpdate(GroupVoiceChannelUpdate::decode(bits)?),
            Op::UnitToUnitVoiceChannelUser =>
                LinkControl::UnitToUnitVoiceChannelUser(UnitToUnitVoiceChannelUser::decode(bits)?),
            Op::TelephoneInterconnectVoiceChannelUser =>
                LinkControl::TelephoneInterconnectVoiceChannelUser(
                    TelephoneInterconnectVoiceChannelUser::decode(bits)?),
            Op::CallTermination => LinkControl::CallTermination {
                unit: bits.get_uint(&CALL_TERMINATION_ADDRESS)? as u32,
            },
            Op::UnitRegistrationCommand =>
                LinkControl::UnitRegistrationCommand(UnitCommand::decode(bits)?),
            Op::UnitAuthenticationCommand =>
                LinkControl::UnitAuthenticationCommand(UnitCommand::decode(bits)?),
            Op::ChannelIdentifierUpdate =>
                LinkControl::ChannelIdentifierUpdate(ChannelIdentifierUpdate::decode(bits)?),
        })
    }

    /// Whether the payload is encrypted.
    pub fn protected(&self) -> bool { self.protected }
    /// Whether the word uses the standard (rather than explicit) format.
    pub fn standard_format(&self) -> bool { self.standard_format }
    /// Raw 6-bit opcode.
    pub fn opcode(&self) -> u8 { self.opcode }
    /// Manufacturer ID, meaningful only for words that carry one.
    pub fn mfid(&self) -> u8 { self.mfid }
    pub fn payload(&self) -> &LinkControl { &self.payload }
    /// The 72 bits the word was decoded from.
    pub fn bits(&self) -> &BitVector { &self.bits }

    /// Talkgroup addressed by the word, if any.
    pub fn talkgroup(&self) -> Option<TalkGroup> {
        match self.payload {
            LinkControl::GroupVoiceChannelUser(ref g) => Some(g.talkgroup),
            _ => None,
        }
    }

    /// Unit originating the current transmission, if the word identifies one.
    pub fn src_unit(&self) -> Option<u32> {
        match self.payload {
            LinkControl::GroupVoiceChannelUser(ref g) => Some(g.src_unit),
            LinkControl::UnitToUnitVoiceChannelUser(ref u) => Some(u.src_unit),
            _ => None,
        }
    }
}
