//! Network ID (NID) fields at the start of every P25 frame.
//!
//! The NID is BCH protected on the air, but the frame synchronizer hands over the bits
//! as received, so the fields here are read without correction.

use crate::bits::BitVector;
use crate::error::Result;
use crate::field::FieldSpec;

/// Number of bits in the NID, including its parity.
pub const NID_BITS: usize = 64;

const NAC: FieldSpec = FieldSpec::uint(0, 12);
const DUID: FieldSpec = FieldSpec::uint(12, 4);

/// Identifies the system a frame belongs to.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "ser", derive(serde::Serialize, serde::Deserialize))]
pub enum NetworkAccessCode {
    Default,
    ReceiveAny,
    RepeatAny,
    Other(u16),
}

impl NetworkAccessCode {
    pub fn from_bits(bits: u16) -> NetworkAccessCode {
        use self::NetworkAccessCode::*;

        assert!(bits >> 12 == 0);

        match bits {
            0x293 => Default,
            0xF7E => ReceiveAny,
            0xF7F => RepeatAny,
            _ => Other(bits),
        }
    }

    pub fn to_bits(&self) -> u16 {
        use self::NetworkAccessCode::*;

        match *self {
            Default => 0x293,
            ReceiveAny => 0xF7E,
            RepeatAny => 0xF7F,
            Other(bits) => bits,
        }
    }
}

/// Type of data unit that follows the NID.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "ser", derive(serde::Serialize, serde::Deserialize))]
pub enum DataUnit {
    VoiceHeader,
    VoiceSimpleTerminator,
    VoiceLCTerminator,
    VoiceLCFrameGroup,
    VoiceCCFrameGroup,
    DataPacket,
    TrunkingSignaling,
}

impl DataUnit {
    pub fn from_bits(bits: u8) -> Option<DataUnit> {
        use self::DataUnit::*;

        assert!(bits >> 4 == 0);

        match bits {
            0b0000 => Some(VoiceHeader),
            0b0011 => Some(VoiceSimpleTerminator),
            0b1111 => Some(VoiceLCTerminator),
            0b0101 => Some(VoiceLCFrameGroup),
            0b1010 => Some(VoiceCCFrameGroup),
            0b1100 => Some(DataPacket),
            0b0111 => Some(TrunkingSignaling),
            _ => None,
        }
    }

    pub fn to_bits(&self) -> u8 {
        use self::DataUnit::*;

        match *self {
            VoiceHeader => 0b0000,
            VoiceSimpleTerminator => 0b0011,
            VoiceLCTerminator => 0b1111,
            VoiceLCFrameGroup => 0b0101,
            VoiceCCFrameGroup => 0b1010,
            DataPacket => 0b1100,
            TrunkingSignaling => 0b0111,
        }
    }
}

/// NAC and data unit ID read from a frame.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "ser", derive(serde::Serialize, serde::Deserialize))]
pub struct NetworkId {
    access_code: NetworkAccessCode,
    /// Raw 4-bit data unit ID.
    duid: u8,
}

impl NetworkId {
    /// Read the NID from the start of the given frame.
    pub fn new(bits: &BitVector) -> Result<NetworkId> {
        Ok(NetworkId {
            access_code: NetworkAccessCode::from_bits(bits.get_uint(&NAC)? as u16),
            duid: bits.get_uint(&DUID)? as u8,
        })
    }

    pub fn access_code(&self) -> NetworkAccessCode { self.access_code }
    pub fn duid(&self) -> u8 { self.duid }

    /// Data unit named by the DUID, if it's a known one.
    pub fn data_unit(&self) -> Option<DataUnit> { DataUnit::from_bits(self.duid) }

    /// Write the NAC and DUID into the start of the given frame.
    pub fn write(access_code: NetworkAccessCode, data_unit: DataUnit, bits: &mut BitVector)
        -> Result<()>
    {
        bits.load(0, 12, access_code.to_bits() as u64)?;
        bits.load(12, 4, data_unit.to_bits() as u64)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_nid() {
        let mut bits = BitVector::new(NID_BITS);
        NetworkId::write(NetworkAccessCode::Other(0x123), DataUnit::VoiceLCFrameGroup,
                         &mut bits).unwrap();

        assert_eq!(bits.uint(0, 16).unwrap(), 0x1235);

        let n = NetworkId::new(&bits).unwrap();
        assert_eq!(n.access_code(), NetworkAccessCode::Other(0x123));
        assert_eq!(n.duid(), 0b0101);
        assert_eq!(n.data_unit(), Some(DataUnit::VoiceLCFrameGroup));

        bits.load(0, 16, 0x2931).unwrap();
        let n = NetworkId::new(&bits).unwrap();
        assert_eq!(n.access_code(), NetworkAccessCode::Default);
        assert_eq!(n.data_unit(), None);
    }

    #[test]
    fn test_codes() {
        for nac in [0x293, 0xF7E, 0xF7F, 0x001] {
            assert_eq!(NetworkAccessCode::from_bits(nac).to_bits(), nac);
        }

        for duid in 0..16 {
            if let Some(du) = DataUnit::from_bits(duid) {
                assert_eq!(du.to_bits(), duid);
            }
        }
    }
}
