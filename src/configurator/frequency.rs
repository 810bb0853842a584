//! Frequency programming (datasheet chapter 21)
//!
//! The carrier is `base + CHANNR * spacing`, where the base frequency is a 24 bit
//! word in units of fosc / 2^16.

use crate::registers::config::{CHANNR, CHANSPC_E, CHANSPC_M, FREQ2};
use crate::Error;

use super::{div_round, floor_log2, Configurator};

impl Configurator {
    /// Base frequency in Hz
    pub fn base_frequency_hz(&self) -> u64 {
        let word = match self.bank().range(FREQ2, 3) {
            Some(&[freq2, freq1, freq0]) => u32::from_be_bytes([0, freq2, freq1, freq0]),
            _ => 0,
        };
        div_round(word as u64 * self.fosc(), 1 << 16)
    }

    /// Programs the base frequency.
    ///
    /// # Errors
    /// * `Error::OutOfRange` - the frequency does not fit FREQ2..FREQ0
    pub fn set_base_frequency_hz(&mut self, frequency_hz: u64) -> Result<(), Error> {
        let word = frequency_hz
            .checked_mul(1 << 16)
            .map(|scaled| div_round(scaled, self.fosc()))
            .filter(|word| *word <= 0x00FF_FFFF)
            .ok_or(Error::OutOfRange {
                field: "base frequency",
                value: u32::try_from(frequency_hz).unwrap_or(u32::MAX),
            })?;

        let bytes = (word as u32).to_be_bytes();
        self.bank_mut().set_range(FREQ2, &bytes[1..])
    }

    /// Channel spacing in Hz
    pub fn channel_spacing_hz(&self) -> u32 {
        let exponent = self.bank().field(CHANSPC_E) as u32;
        let mantissa = self.bank().field(CHANSPC_M) as u64;
        div_round(((256 + mantissa) * self.fosc()) << exponent, 1 << 18) as u32
    }

    /// Programs the channel spacing, 25 kHz to 405 kHz at 26 MHz.
    ///
    /// # Errors
    /// * `Error::OutOfRange` - the spacing needs an exponent outside 0..=3
    pub fn set_channel_spacing_hz(&mut self, spacing_hz: u32) -> Result<(), Error> {
        let out_of_range = Error::OutOfRange {
            field: "channel spacing",
            value: spacing_hz,
        };
        let spacing = spacing_hz as u64;
        let fosc = self.fosc();

        let mut exponent = floor_log2((spacing << 10) / fosc).ok_or(out_of_range)?;
        if exponent > 3 {
            return Err(out_of_range);
        }
        let mut mantissa = div_round(spacing << 18, fosc << exponent) - 256;
        if mantissa == 256 {
            exponent += 1;
            mantissa = 0;
        }
        if exponent > 3 {
            return Err(out_of_range);
        }

        self.bank_mut().set_field(CHANSPC_E, exponent as u8)?;
        self.bank_mut().set_field(CHANSPC_M, mantissa as u8)
    }

    pub fn channel_number(&self) -> u8 {
        self.bank().get(CHANNR).unwrap_or_default()
    }

    pub fn set_channel_number(&mut self, channel: u8) {
        self.bank_mut().modify(CHANNR, |_| channel);
    }
}
