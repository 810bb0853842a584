//! Princeton (PT2262 style) 25 bit line code
//!
//! Every logical bit takes four physical bits: `1110` for 1, `1000` for 0. A frame
//! carries 24 address and data bits, MSB first, followed by a 0 sync bit. On air
//! the sync bit is stretched to eight physical bits, `1` followed by seven `0`.

use alloc::vec::Vec;

use crate::configurator::{Configurator, ModulationFormat, PacketFormat};
use crate::protocol::Protocol;
use crate::Error;

use super::pack_bits;

/// Physical pattern of a logical 1
pub const HIGH_PATTERN: [u8; 4] = [1, 1, 1, 0];
/// Physical pattern of a logical 0
pub const LOW_PATTERN: [u8; 4] = [1, 0, 0, 0];
/// Pattern closing a frame
pub const SYNC_PATTERN: [u8; 8] = [1, 0, 0, 0, 0, 0, 0, 0];

/// Logical bits in a frame, sync bit included
pub const FRAME_BITS: usize = 25;
/// Address and data bits in a frame
pub const PAYLOAD_BITS: u32 = 24;

/// Decoded frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    pub address: u32,
    pub data: u32,
}

/// Codec for one address/data split of the 24 payload bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Princeton25Bit {
    address_bits: u32,
    data_bits: u32,
}

impl Princeton25Bit {
    /// Common PT2262 layout, 12 address and 8 data bits
    pub const PT2262: Self = Self {
        address_bits: 12,
        data_bits: 8,
    };

    /// # Errors
    /// * `Error::OutOfRange` - the widths add up to more than 24 bits
    pub fn new(address_bits: u32, data_bits: u32) -> Result<Self, Error> {
        let total = address_bits.saturating_add(data_bits);
        if total > PAYLOAD_BITS {
            return Err(Error::OutOfRange {
                field: "Princeton address and data bits",
                value: total,
            });
        }
        Ok(Self {
            address_bits,
            data_bits,
        })
    }

    pub fn address_bits(&self) -> u32 {
        self.address_bits
    }

    pub fn data_bits(&self) -> u32 {
        self.data_bits
    }

    /// Radio settings the code is transmitted with
    pub fn protocol(&self) -> Protocol {
        Protocol {
            base_frequency_hz: 433_920_000,
            data_rate_baud: 2780,
            modulation_format: ModulationFormat::AskOok,
        }
    }

    /// Selects synchronous serial mode and applies [`protocol`](Self::protocol)
    pub fn configure(&self, configurator: &mut Configurator) -> Result<(), Error> {
        configurator.set_packet_format(PacketFormat::SyncSerial)?;
        self.protocol().configure(configurator)
    }

    /// Decodes physical bits.
    ///
    /// Decoding starts at the first high or low pattern. Groups matching neither
    /// pattern are skipped.
    ///
    /// The address takes every payload bit above the data field, so a frame from
    /// a transmitter with a wider address than `address_bits` still decodes.
    ///
    /// # Returns
    /// `None` unless exactly 25 logical bits ending in a 0 were found
    pub fn decode(&self, physical: &[u8]) -> Option<Frame> {
        let start = physical
            .windows(4)
            .position(|w| w == HIGH_PATTERN || w == LOW_PATTERN)?;

        let logical: Vec<u8> = physical[start..]
            .chunks_exact(4)
            .filter_map(|group| {
                if group == HIGH_PATTERN {
                    Some(1)
                } else if group == LOW_PATTERN {
                    Some(0)
                } else {
                    None
                }
            })
            .collect();

        if logical.len() != FRAME_BITS || logical[FRAME_BITS - 1] != 0 {
            log::debug!("Princeton decode failed, {} logical bits", logical.len());
            return None;
        }

        let value = logical[..FRAME_BITS - 1]
            .iter()
            .fold(0u32, |acc, &bit| (acc << 1) | bit as u32);
        Some(Frame {
            address: value >> self.data_bits,
            data: value & mask(self.data_bits),
        })
    }

    /// Encodes `frame` into 104 physical bits, sync pattern included.
    ///
    /// # Errors
    /// * `Error::OutOfRange` - address or data wider than their configured width
    pub fn encode(&self, frame: Frame) -> Result<Vec<u8>, Error> {
        if frame.address > mask(self.address_bits) {
            return Err(Error::OutOfRange {
                field: "Princeton address",
                value: frame.address,
            });
        }
        if frame.data > mask(self.data_bits) {
            return Err(Error::OutOfRange {
                field: "Princeton data",
                value: frame.data,
            });
        }

        let value = (frame.address << self.data_bits) | frame.data;
        let mut physical = Vec::with_capacity(4 * PAYLOAD_BITS as usize + SYNC_PATTERN.len());
        for i in (0..PAYLOAD_BITS).rev() {
            let pattern = if (value >> i) & 1 == 1 {
                HIGH_PATTERN
            } else {
                LOW_PATTERN
            };
            physical.extend_from_slice(&pattern);
        }
        physical.extend_from_slice(&SYNC_PATTERN);
        Ok(physical)
    }

    /// [`encode`](Self::encode) packed MSB first into 13 bytes, ready for a
    /// synchronous serial transmit
    pub fn encode_bytes(&self, frame: Frame) -> Result<Vec<u8>, Error> {
        Ok(pack_bits(&self.encode(frame)?))
    }
}

const fn mask(bits: u32) -> u32 {
    if bits >= u32::BITS {
        u32::MAX
    } else {
        (1 << bits) - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths_are_checked() {
        assert!(Princeton25Bit::new(12, 8).is_ok());
        assert!(Princeton25Bit::new(16, 8).is_ok());
        assert_eq!(
            Princeton25Bit::new(20, 8),
            Err(Error::OutOfRange {
                field: "Princeton address and data bits",
                value: 28
            })
        );
    }

    #[test]
    fn encoded_layout() {
        let codec = Princeton25Bit::new(16, 8).unwrap();
        let bytes = codec
            .encode_bytes(Frame {
                address: 0x8001,
                data: 0xFF,
            })
            .unwrap();
        assert_eq!(bytes.len(), 13);
        // 1 -> 1110, 0 -> 1000
        assert_eq!(bytes[0], 0xE8);
        assert_eq!(bytes[12], 0x80);
    }

    #[test]
    fn decode_skips_leading_noise() {
        let codec = Princeton25Bit::PT2262;
        let frame = Frame {
            address: 0xABC,
            data: 0x5D,
        };
        let mut physical = vec![0, 0, 0, 0, 0, 0];
        physical.extend(codec.encode(frame).unwrap());
        physical.extend([0; 16]);
        assert_eq!(codec.decode(&physical), Some(frame));
    }

    #[test]
    fn wrong_bit_count_is_rejected() {
        let codec = Princeton25Bit::PT2262;
        let physical = codec
            .encode(Frame {
                address: 1,
                data: 2,
            })
            .unwrap();
        // drop the sync pattern, 24 logical bits remain
        assert_eq!(codec.decode(&physical[..96]), None);
        // a second frame back to back yields 50 bits
        let mut doubled = physical.clone();
        doubled.extend(&physical);
        assert_eq!(codec.decode(&doubled), None);
        assert_eq!(codec.decode(&[0; 40]), None);
    }

    #[test]
    fn sync_bit_must_be_zero() {
        let codec = Princeton25Bit::PT2262;
        let mut physical = codec.encode(Frame { address: 0, data: 0 }).unwrap();
        physical.truncate(96);
        physical.extend(HIGH_PATTERN);
        assert_eq!(codec.decode(&physical), None);
    }

    #[test]
    fn wide_address_decodes_in_full() {
        let frame = Frame {
            address: 0xF123,
            data: 0x45,
        };
        let physical = Princeton25Bit::new(16, 8).unwrap().encode(frame).unwrap();
        assert_eq!(Princeton25Bit::PT2262.decode(&physical), Some(frame));

        // the split only moves the boundary between address and data
        let narrow = Princeton25Bit::new(12, 4).unwrap();
        assert_eq!(
            narrow.decode(&physical),
            Some(Frame {
                address: 0xF1234,
                data: 0x5,
            })
        );
    }

    #[test]
    fn oversized_fields_are_rejected() {
        let codec = Princeton25Bit::PT2262;
        assert!(codec
            .encode(Frame {
                address: 0x1000,
                data: 0
            })
            .is_err());
        assert!(codec
            .encode(Frame {
                address: 0,
                data: 0x100
            })
            .is_err());
    }

    #[test]
    fn configures_sync_serial_ook() {
        let mut configurator = Configurator::default();
        Princeton25Bit::PT2262.configure(&mut configurator).unwrap();
        assert_eq!(configurator.packet_format(), PacketFormat::SyncSerial);
        assert_eq!(
            configurator.modulation_format(),
            Ok(ModulationFormat::AskOok)
        );
        assert!(configurator.data_rate_baud().abs_diff(2780) < 5);
        assert!(configurator.base_frequency_hz().abs_diff(433_920_000) < 400);
    }
}
