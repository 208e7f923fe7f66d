//! Captured RF signal descriptor.
//!
//! A signal is what the RF front-end hands back after a capture and what
//! it needs to replay a transmission: protocol id, bit length and the raw
//! code value. The all-zero signal is the "empty slot" sentinel.
//!
//! Storage layout (8 bytes, little-endian):
//! ```text
//! Byte 0..2: protocol id
//! Byte 2..6: code value
//! Byte 6..8: bit length
//! ```

/// Serialized signal size in bytes.
pub const SIGNAL_SIZE: usize = 8;

/// Lowest protocol id understood by the RF front-end.
pub const PROTOCOL_MIN: u16 = 1;

/// Highest protocol id understood by the RF front-end.
pub const PROTOCOL_MAX: u16 = 12;

#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Signal {
    pub protocol: u16,
    pub bit_length: u16,
    pub value: u32,
}

impl Signal {
    /// Empty / invalid sentinel.
    pub const INVALID: Signal = Signal {
        protocol: 0,
        bit_length: 0,
        value: 0,
    };

    pub const fn new(protocol: u16, bit_length: u16, value: u32) -> Self {
        Self {
            protocol,
            bit_length,
            value,
        }
    }

    /// True unless this is the empty sentinel.
    pub fn is_valid(&self) -> bool {
        *self != Self::INVALID
    }

    /// True if the protocol id is one the RF front-end can replay.
    pub fn has_known_protocol(&self) -> bool {
        (PROTOCOL_MIN..=PROTOCOL_MAX).contains(&self.protocol)
    }

    /// Serialise into a byte slice. Returns the number of bytes written,
    /// or 0 if the buffer is too small.
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        if buf.len() < SIGNAL_SIZE {
            return 0;
        }
        buf[0..2].copy_from_slice(&self.protocol.to_le_bytes());
        buf[2..6].copy_from_slice(&self.value.to_le_bytes());
        buf[6..8].copy_from_slice(&self.bit_length.to_le_bytes());
        SIGNAL_SIZE
    }

    /// Parse from stored bytes.
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < SIGNAL_SIZE {
            return None;
        }
        Some(Self {
            protocol: u16::from_le_bytes([data[0], data[1]]),
            value: u32::from_le_bytes([data[2], data[3], data[4], data[5]]),
            bit_length: u16::from_le_bytes([data[6], data[7]]),
        })
    }
}
