//! Packet handling configuration
//!
//! Data whitening (datasheet 15.1), packet format (15.2), RX packet filtering
//! (15.3), FEC (18.1) and the PKTCTRL0.PKT_FORMAT selection (27).

use crate::registers::config::{
    ADDR, ADR_CHK, APPEND_STATUS, CRC_AUTOFLUSH, CRC_EN, FEC_EN, LENGTH_CONFIG, NUM_PREAMBLE,
    PKTLEN, PKT_FORMAT, WHITE_DATA,
};
use crate::Error;

use super::gdo::{
    Gdo, GDO_ASYNC_SERIAL_DATA, GDO_CARRIER_SENSE, GDO_SERIAL_CLOCK, GDO_SYNC_SERIAL_DATA,
    GDO_SYNC_WORD,
};
use super::Configurator;

/// Preamble lengths selectable through MDMCFG1.NUM_PREAMBLE, in bytes
pub const PREAMBLE_LENGTHS: [u8; 8] = [2, 3, 4, 6, 8, 12, 16, 24];

/// Format of RX and TX data (PKTCTRL0.PKT_FORMAT)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PacketFormat {
    /// FIFOs for RX and TX
    Normal = 0,
    /// Synchronous serial mode, data in on GDO0 and out on GDO0, clock on GDO2
    SyncSerial = 1,
    /// Random TX mode, PN9 generator
    Random = 2,
    /// Asynchronous serial mode, data in on GDO0 and out on GDOx
    AsyncSerial = 3,
}

impl From<u8> for PacketFormat {
    fn from(value: u8) -> Self {
        match value & 0x03 {
            0 => Self::Normal,
            1 => Self::SyncSerial,
            2 => Self::Random,
            _ => Self::AsyncSerial,
        }
    }
}

/// Packet length configuration (PKTCTRL0.LENGTH_CONFIG)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PacketLengthMode {
    /// Length configured in PKTLEN
    Fixed = 0,
    /// Length given by the first byte after the sync word, PKTLEN is the maximum
    Variable = 1,
    /// Infinite packet length
    Infinite = 2,
}

impl TryFrom<u8> for PacketLengthMode {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Fixed),
            1 => Ok(Self::Variable),
            2 => Ok(Self::Infinite),
            other => Err(Error::ReservedValue {
                field: LENGTH_CONFIG.name,
                value: other,
            }),
        }
    }
}

/// Address check configuration (PKTCTRL1.ADR_CHK)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AddressCheck {
    Disabled = 0,
    /// Address check, no broadcast
    Exact = 1,
    /// Address check, 0x00 is broadcast
    Broadcast = 2,
    /// Address check, 0x00 and 0xFF are broadcast
    BroadcastBoth = 3,
}

impl From<u8> for AddressCheck {
    fn from(value: u8) -> Self {
        match value & 0x03 {
            0 => Self::Disabled,
            1 => Self::Exact,
            2 => Self::Broadcast,
            _ => Self::BroadcastBoth,
        }
    }
}

impl Configurator {
    pub fn packet_format(&self) -> PacketFormat {
        PacketFormat::from(self.bank().field(PKT_FORMAT))
    }

    /// Selects the packet format and routes the GDO pins it needs:
    ///
    /// | Format      | GDO0                    | GDO2                     |
    /// |-------------|-------------------------|--------------------------|
    /// | Normal      | sync word (0x06)        | unchanged                |
    /// | SyncSerial  | serial data (0x0C)      | serial clock (0x0B)      |
    /// | Random      | unchanged               | unchanged                |
    /// | AsyncSerial | carrier sense (0x0E)    | serial data (0x0D)       |
    pub fn set_packet_format(&mut self, format: PacketFormat) -> Result<(), Error> {
        match format {
            PacketFormat::Normal => {
                self.set_gdo_config(Gdo::Gdo0, GDO_SYNC_WORD)?;
            }
            PacketFormat::SyncSerial => {
                self.set_gdo_config(Gdo::Gdo0, GDO_SYNC_SERIAL_DATA)?;
                self.set_gdo_config(Gdo::Gdo2, GDO_SERIAL_CLOCK)?;
            }
            PacketFormat::Random => {}
            PacketFormat::AsyncSerial => {
                self.set_gdo_config(Gdo::Gdo0, GDO_CARRIER_SENSE)?;
                self.set_gdo_config(Gdo::Gdo2, GDO_ASYNC_SERIAL_DATA)?;
            }
        }
        self.bank_mut().set_field(PKT_FORMAT, format as u8)
    }

    /// # Errors
    /// * `Error::ReservedValue` - LENGTH_CONFIG holds 3
    pub fn packet_length_mode(&self) -> Result<PacketLengthMode, Error> {
        PacketLengthMode::try_from(self.bank().field(LENGTH_CONFIG))
    }

    pub fn set_packet_length_mode(&mut self, mode: PacketLengthMode) -> Result<(), Error> {
        self.bank_mut().set_field(LENGTH_CONFIG, mode as u8)
    }

    /// Fixed packet length, or maximum length in variable mode
    pub fn packet_length(&self) -> u8 {
        self.bank().get(PKTLEN).unwrap_or_default()
    }

    pub fn set_packet_length(&mut self, length: u8) {
        self.bank_mut().modify(PKTLEN, |_| length);
    }

    pub fn preamble_length_bytes(&self) -> u8 {
        PREAMBLE_LENGTHS[self.bank().field(NUM_PREAMBLE) as usize]
    }

    /// # Errors
    /// * `Error::OutOfRange` - `length` is not one of [`PREAMBLE_LENGTHS`]
    pub fn set_preamble_length_bytes(&mut self, length: u8) -> Result<(), Error> {
        let index = PREAMBLE_LENGTHS
            .iter()
            .position(|&candidate| candidate == length)
            .ok_or(Error::OutOfRange {
                field: "preamble length",
                value: length as u32,
            })?;
        self.bank_mut().set_field(NUM_PREAMBLE, index as u8)
    }

    pub fn data_whitening_enabled(&self) -> bool {
        self.bank().flag(WHITE_DATA)
    }

    pub fn set_data_whitening_enabled(&mut self, enable: bool) {
        self.bank_mut().set_flag(WHITE_DATA, enable);
    }

    pub fn crc_enabled(&self) -> bool {
        self.bank().flag(CRC_EN)
    }

    pub fn set_crc_enabled(&mut self, enable: bool) {
        self.bank_mut().set_flag(CRC_EN, enable);
    }

    pub fn address_check_mode(&self) -> AddressCheck {
        AddressCheck::from(self.bank().field(ADR_CHK))
    }

    pub fn set_address_check_mode(&mut self, mode: AddressCheck) -> Result<(), Error> {
        self.bank_mut().set_field(ADR_CHK, mode as u8)
    }

    /// Address used for packet filtration
    pub fn device_address(&self) -> u8 {
        self.bank().get(ADDR).unwrap_or_default()
    }

    pub fn set_device_address(&mut self, address: u8) {
        self.bank_mut().modify(ADDR, |_| address);
    }

    /// Flush the RX FIFO automatically when the CRC is not OK
    pub fn crc_auto_flush(&self) -> bool {
        self.bank().flag(CRC_AUTOFLUSH)
    }

    pub fn set_crc_auto_flush(&mut self, enable: bool) {
        self.bank_mut().set_flag(CRC_AUTOFLUSH, enable);
    }

    /// Append RSSI and LQI/CRC status bytes to received payloads
    pub fn append_status_enabled(&self) -> bool {
        self.bank().flag(APPEND_STATUS)
    }

    pub fn set_append_status_enabled(&mut self, enable: bool) {
        self.bank_mut().set_flag(APPEND_STATUS, enable);
    }

    /// Forward error correction with interleaving, fixed length mode only
    pub fn fec_enabled(&self) -> bool {
        self.bank().flag(FEC_EN)
    }

    pub fn set_fec_enabled(&mut self, enable: bool) {
        self.bank_mut().set_flag(FEC_EN, enable);
    }
}
