//! P25 voice superframe decoding.

pub mod control;
pub mod crypto;
pub mod fields;
pub mod ldu;
pub mod lsd;
pub mod nid;

pub use self::control::{LinkControl, LinkControlWord};
pub use self::crypto::{CryptoAlgorithm, EncryptionSync};
pub use self::ldu::{Ldu1, Ldu2};
pub use self::nid::{DataUnit, NetworkAccessCode, NetworkId};
