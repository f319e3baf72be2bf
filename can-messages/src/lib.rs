//! Wire definitions for the supercapacitor controller bus.
#![no_std]

use core::mem::size_of;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use static_assertions::const_assert_eq;
use zerocopy::byteorder::little_endian::F32;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

pub mod prelude {
    pub use super::CanMessage;
    pub use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};
}

pub const BITRATE: u32 = 1_000_000;

#[repr(u16)]
#[derive(Debug, TryFromPrimitive, IntoPrimitive, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CanId {
    SUPERCAP = 0b_000_0101_0001,
}

/// Message with a fixed standard identifier and a byte-exact payload layout.
pub trait CanMessage: Sized + FromBytes + IntoBytes + Immutable + KnownLayout + Unaligned {
    const ID: CanId;

    /// Reads the message from the start of `payload`. Trailing bytes are ignored.
    fn try_decode(payload: &[u8]) -> Option<Self> {
        Self::read_from_prefix(payload).ok().map(|(msg, _)| msg)
    }
}

/// Supercapacitor controller report.
///
/// Byte 0 is controller-private, bytes 1..5 carry the chassis power as a
/// little-endian IEEE-754 single.
#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
pub struct SuperCapData {
    pub header: u8,
    pub chassis_power: F32,
}

const_assert_eq!(size_of::<SuperCapData>(), 5);

impl SuperCapData {
    pub fn new(chassis_power: f32) -> Self {
        Self {
            header: 0,
            chassis_power: F32::new(chassis_power),
        }
    }
}

impl CanMessage for SuperCapData {
    const ID: CanId = CanId::SUPERCAP;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supercap_id_is_0x51() {
        assert_eq!(u16::from(CanId::SUPERCAP), 0x51);
        assert!(matches!(CanId::try_from(0x51u16), Ok(CanId::SUPERCAP)));
        assert!(CanId::try_from(0x52u16).is_err());
    }

    #[test]
    fn chassis_power_sits_at_offset_one() {
        let msg = SuperCapData::new(1.0);
        let bytes = msg.as_bytes();
        assert_eq!(bytes[0], 0);
        assert_eq!(&bytes[1..5], &1.0f32.to_le_bytes());
    }

    #[test]
    fn decode_ignores_trailing_bytes() {
        let mut payload = [0xAAu8; 8];
        payload[1..5].copy_from_slice(&(-3.25f32).to_le_bytes());
        let msg = SuperCapData::try_decode(&payload).unwrap();
        assert_eq!(msg.header, 0xAA);
        assert_eq!(msg.chassis_power.get(), -3.25);
    }

    #[test]
    fn decode_rejects_short_payload() {
        assert!(SuperCapData::try_decode(&[0, 1, 2, 3]).is_none());
        assert!(SuperCapData::try_decode(&[]).is_none());
    }
}
