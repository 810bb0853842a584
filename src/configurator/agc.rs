//! Automatic gain control (AGCCTRL2..AGCCTRL0)
//!
//! Values are the raw register encodings; see the AGCCTRLx register descriptions
//! in the datasheet for their meaning.

use crate::registers::config::{
    Field, AGC_FREEZE, AGC_LNA_PRIORITY, CARRIER_SENSE_ABS_THR, CARRIER_SENSE_REL_THR,
    FILTER_LENGTH, HYST_LEVEL, MAGN_TARGET, MAX_DVGA_GAIN, MAX_LNA_GAIN, WAIT_TIME,
};
use crate::Error;

use super::Configurator;

/// Snapshot of every AGC field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AgcSettings {
    pub filter_length: u8,
    pub freeze: u8,
    pub wait_time: u8,
    pub hysteresis_level: u8,
    pub carrier_sense_absolute_threshold: u8,
    pub carrier_sense_relative_threshold: u8,
    pub lna_priority: bool,
    pub magnitude_target: u8,
    pub max_lna_gain: u8,
    pub max_dvga_gain: u8,
}

impl Configurator {
    pub fn agc_settings(&self) -> AgcSettings {
        AgcSettings {
            filter_length: self.agc_filter_length(),
            freeze: self.agc_freeze(),
            wait_time: self.agc_wait_time(),
            hysteresis_level: self.agc_hysteresis_level(),
            carrier_sense_absolute_threshold: self.carrier_sense_absolute_threshold(),
            carrier_sense_relative_threshold: self.carrier_sense_relative_threshold(),
            lna_priority: self.agc_lna_priority(),
            magnitude_target: self.agc_magnitude_target(),
            max_lna_gain: self.agc_max_lna_gain(),
            max_dvga_gain: self.agc_max_dvga_gain(),
        }
    }

    /// Applies every field of `settings`, the bank is left untouched if any field is
    /// out of range.
    pub fn set_agc_settings(&mut self, settings: AgcSettings) -> Result<(), Error> {
        let fields = [
            (FILTER_LENGTH, settings.filter_length),
            (AGC_FREEZE, settings.freeze),
            (WAIT_TIME, settings.wait_time),
            (HYST_LEVEL, settings.hysteresis_level),
            (CARRIER_SENSE_ABS_THR, settings.carrier_sense_absolute_threshold),
            (CARRIER_SENSE_REL_THR, settings.carrier_sense_relative_threshold),
            (MAGN_TARGET, settings.magnitude_target),
            (MAX_LNA_GAIN, settings.max_lna_gain),
            (MAX_DVGA_GAIN, settings.max_dvga_gain),
        ];
        for (field, value) in fields {
            super::modem::check_width(field.name, value, field.max())?;
        }
        for (field, value) in fields {
            self.bank_mut().set_field(field, value)?;
        }
        self.set_agc_lna_priority(settings.lna_priority);
        Ok(())
    }

    /// Channel filter samples (FSK) or OOK/ASK decision boundary, 0..=3
    pub fn agc_filter_length(&self) -> u8 {
        self.bank().field(FILTER_LENGTH)
    }

    pub fn set_agc_filter_length(&mut self, value: u8) -> Result<(), Error> {
        self.set_agc_field(FILTER_LENGTH, value)
    }

    /// When to freeze the AGC gain, 0..=3
    pub fn agc_freeze(&self) -> u8 {
        self.bank().field(AGC_FREEZE)
    }

    pub fn set_agc_freeze(&mut self, value: u8) -> Result<(), Error> {
        self.set_agc_field(AGC_FREEZE, value)
    }

    /// Samples to wait after a gain change, 0..=3
    pub fn agc_wait_time(&self) -> u8 {
        self.bank().field(WAIT_TIME)
    }

    pub fn set_agc_wait_time(&mut self, value: u8) -> Result<(), Error> {
        self.set_agc_field(WAIT_TIME, value)
    }

    /// Hysteresis of the magnitude deviation, 0..=3
    pub fn agc_hysteresis_level(&self) -> u8 {
        self.bank().field(HYST_LEVEL)
    }

    pub fn set_agc_hysteresis_level(&mut self, value: u8) -> Result<(), Error> {
        self.set_agc_field(HYST_LEVEL, value)
    }

    /// Absolute RSSI threshold for carrier sense, 0..=15 (two's complement, 1 dB steps)
    pub fn carrier_sense_absolute_threshold(&self) -> u8 {
        self.bank().field(CARRIER_SENSE_ABS_THR)
    }

    pub fn set_carrier_sense_absolute_threshold(&mut self, value: u8) -> Result<(), Error> {
        self.set_agc_field(CARRIER_SENSE_ABS_THR, value)
    }

    /// Relative RSSI increase for carrier sense, 0..=3
    pub fn carrier_sense_relative_threshold(&self) -> u8 {
        self.bank().field(CARRIER_SENSE_REL_THR)
    }

    pub fn set_carrier_sense_relative_threshold(&mut self, value: u8) -> Result<(), Error> {
        self.set_agc_field(CARRIER_SENSE_REL_THR, value)
    }

    /// Decrease the LNA gain before the DVGA gain
    pub fn agc_lna_priority(&self) -> bool {
        self.bank().flag(AGC_LNA_PRIORITY)
    }

    pub fn set_agc_lna_priority(&mut self, enable: bool) {
        self.bank_mut().set_flag(AGC_LNA_PRIORITY, enable);
    }

    /// Target amplitude from the channel filter, 0..=7 (24 dB to 42 dB)
    pub fn agc_magnitude_target(&self) -> u8 {
        self.bank().field(MAGN_TARGET)
    }

    pub fn set_agc_magnitude_target(&mut self, value: u8) -> Result<(), Error> {
        self.set_agc_field(MAGN_TARGET, value)
    }

    /// Maximum LNA gain reduction, 0..=7
    pub fn agc_max_lna_gain(&self) -> u8 {
        self.bank().field(MAX_LNA_GAIN)
    }

    pub fn set_agc_max_lna_gain(&mut self, value: u8) -> Result<(), Error> {
        self.set_agc_field(MAX_LNA_GAIN, value)
    }

    /// Highest DVGA gain settings excluded, 0..=3
    pub fn agc_max_dvga_gain(&self) -> u8 {
        self.bank().field(MAX_DVGA_GAIN)
    }

    pub fn set_agc_max_dvga_gain(&mut self, value: u8) -> Result<(), Error> {
        self.set_agc_field(MAX_DVGA_GAIN, value)
    }

    fn set_agc_field(&mut self, field: Field, value: u8) -> Result<(), Error> {
        self.bank_mut().set_field(field, value)
    }
}
