//! Physical unit view of the register bank
//!
//! The [`Configurator`] owns a [`RegisterBank`] and converts between physical
//! quantities (Hz, baud, bytes) and the exponent/mantissa encodings of the
//! datasheet. Every accessor is a pure function of the bank: nothing here touches
//! the SPI bus, [`Cc1101`](crate::Cc1101) pushes the bank to the chip.
//!
//! Accessors are grouped by datasheet chapter:
//! - [`modem`]: data rate, RX bandwidth, deviation, modulation, sync word, FOC
//! - [`frequency`]: base frequency, channel spacing and number
//! - [`packet`]: packet format and packet handling options
//! - [`gdo`]: GDOx pin functions
//! - [`agc`]: automatic gain control and the PATABLE
//!
//! All rate and frequency math is done in 64 bit fixed point; results are rounded
//! to the nearest integer the same way the datasheet formulas are.
//!
//! # Important Notes
//! - Setters reject values that do not fit the target field and leave the bank
//!   untouched in that case
//! - Setting ASK/OOK modulation also programs FREND0 for PA ramping
//! - Setting the packet format also programs the GDO pins the format relies on

pub mod agc;
pub mod frequency;
pub mod gdo;
pub mod modem;
pub mod packet;

pub use agc::*;
pub use gdo::*;
pub use modem::*;
pub use packet::*;

use crate::presets::{self, Preset};
use crate::registers::{RegisterBank, PATABLE_SIZE};

/// Crystal frequency of most CC1101 modules
pub const DEFAULT_FOSC_HZ: u32 = 26_000_000;

/// Register bank with physical unit accessors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configurator {
    bank: RegisterBank,
    fosc_hz: u32,
}

impl Configurator {
    /// Creates a configurator holding a copy of `preset`.
    ///
    /// # Arguments
    /// * `preset` - Initial register snapshot
    /// * `fosc_hz` - Crystal frequency in Hz, a zero value is treated as 1 Hz
    pub fn new(preset: &Preset, fosc_hz: u32) -> Self {
        Self {
            bank: RegisterBank::from_preset(preset),
            fosc_hz,
        }
    }

    pub fn from_bank(bank: RegisterBank, fosc_hz: u32) -> Self {
        Self { bank, fosc_hz }
    }

    pub fn bank(&self) -> &RegisterBank {
        &self.bank
    }

    pub fn bank_mut(&mut self) -> &mut RegisterBank {
        &mut self.bank
    }

    pub fn fosc_hz(&self) -> u32 {
        self.fosc_hz
    }

    /// Replaces the whole bank with `preset`
    pub fn load_preset(&mut self, preset: &Preset) {
        self.bank.load(preset);
    }

    /// Dumps the raw register bank at debug level
    pub fn log_registers(&self) {
        for (address, value) in self.bank.registers().iter().enumerate() {
            log::debug!("{:02X}: {:02X}", address, value);
        }
        log::debug!("PATABLE: {:02X?}", self.bank.patable());
    }

    /// Logs every decoded setting at info level
    pub fn describe(&self) {
        log::info!("Data rate: {} baud", self.data_rate_baud());
        log::info!("Receiver bandwidth: {} Hz", self.receiver_bandwidth_hz());
        log::info!(
            "Frequency offset compensation: {:?}",
            self.frequency_offset_compensation()
        );
        log::info!("Sync mode: {:?}", self.sync_mode());
        log::info!("Sync word: {:04X}", self.sync_word());
        log::info!("Data whitening: {}", self.data_whitening_enabled());
        log::info!("Preamble length: {} bytes", self.preamble_length_bytes());
        log::info!("Packet length mode: {:?}", self.packet_length_mode());
        log::info!("Packet length: {} bytes", self.packet_length());
        log::info!("CRC enabled: {}", self.crc_enabled());
        log::info!("Address check mode: {:?}", self.address_check_mode());
        log::info!("Address: 0x{:02X}", self.device_address());
        log::info!("CRC auto flush: {}", self.crc_auto_flush());
        log::info!("Append status: {}", self.append_status_enabled());
        log::info!("FEC enabled: {}", self.fec_enabled());
        for pin in Gdo::ALL {
            log::info!(
                "{:?} configuration: 0x{:02X}, inverted: {}",
                pin,
                self.gdo_config(pin),
                self.gdo_inverted(pin)
            );
        }
        log::info!("Modulation format: {:?}", self.modulation_format());
        log::info!("Manchester encoding: {}", self.manchester_enabled());
        log::info!("Frequency deviation: {} Hz", self.deviation_hz());
        log::info!("Base frequency: {} Hz", self.base_frequency_hz());
        log::info!("Channel spacing: {} Hz", self.channel_spacing_hz());
        log::info!("Channel number: {}", self.channel_number());
        log::info!("Packet format: {:?}", self.packet_format());
        log::info!("AGC: {:?}", self.agc_settings());
        log::info!("PATABLE: {:02X?}", self.patable());
    }

    /// Crystal frequency for the codec math, never zero
    pub(crate) fn fosc(&self) -> u64 {
        self.fosc_hz.max(1) as u64
    }

    /// Current PATABLE contents
    pub fn patable(&self) -> &[u8; PATABLE_SIZE] {
        self.bank.patable()
    }

    /// Replaces the PATABLE.
    ///
    /// Entries past the supplied ones are zeroed.
    ///
    /// # Errors
    /// * `Error::InvalidPatable` - `table` is empty or longer than 8 entries
    pub fn set_patable(&mut self, table: &[u8]) -> Result<(), crate::Error> {
        if table.is_empty() || table.len() > PATABLE_SIZE {
            return Err(crate::Error::InvalidPatable(table.len()));
        }
        let patable = self.bank.patable_mut();
        patable.fill(0);
        patable[..table.len()].copy_from_slice(table);
        Ok(())
    }
}

impl Default for Configurator {
    fn default() -> Self {
        Self::new(&presets::DEFAULT, DEFAULT_FOSC_HZ)
    }
}

/// Integer division rounding half away from zero
pub(crate) const fn div_round(numerator: u64, denominator: u64) -> u64 {
    (numerator + denominator / 2) / denominator
}

/// `floor(log2(value))`, `None` for zero
pub(crate) fn floor_log2(value: u64) -> Option<u32> {
    value.checked_ilog2()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patable_tail_is_zeroed() {
        let mut config = Configurator::default();
        config.set_patable(&[0x00, 0x60]).unwrap();
        assert_eq!(config.patable(), &[0x00, 0x60, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn patable_length_is_checked() {
        let mut config = Configurator::default();
        assert_eq!(
            config.set_patable(&[]),
            Err(crate::Error::InvalidPatable(0))
        );
        assert_eq!(
            config.set_patable(&[0; 9]),
            Err(crate::Error::InvalidPatable(9))
        );
        assert_eq!(config.patable(), &presets::DEFAULT.patable);
    }

    #[test]
    fn rounding_helpers() {
        assert_eq!(div_round(5, 2), 3);
        assert_eq!(div_round(4, 3), 1);
        assert_eq!(floor_log2(0), None);
        assert_eq!(floor_log2(1), Some(0));
        assert_eq!(floor_log2(1023), Some(9));
    }
}
