//! Encoding and decoding for the error correction and detection codes carried by P25 and
//! Fleetsync frames.

mod bmcf;

pub mod crc;
pub mod cyclic;
pub mod galois;
pub mod hamming;
pub mod reed_solomon;
