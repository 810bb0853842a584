//! Modem configuration
//!
//! Data rate (datasheet chapter 12), RX filter bandwidth (13), frequency offset
//! compensation (14.1), byte synchronization (14.3) and modulation (16).

use crate::registers::config::{
    CHANBW_E, CHANBW_M, DEVIATION_E, DEVIATION_M, DRATE_E, DRATE_M, FOC_BS_CS_GATE, FOC_LIMIT,
    FOC_POST_K, FOC_PRE_K, FREND0, MANCHESTER_EN, MOD_FORMAT, SYNC1, SYNC_MODE,
};
use crate::Error;

use super::{div_round, floor_log2, Configurator};

/// Modulation format (MDMCFG2.MOD_FORMAT)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModulationFormat {
    Fsk2 = 0,
    Gfsk = 1,
    AskOok = 3,
    Fsk4 = 4,
    Msk = 7,
}

impl TryFrom<u8> for ModulationFormat {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => Self::Fsk2,
            1 => Self::Gfsk,
            3 => Self::AskOok,
            4 => Self::Fsk4,
            7 => Self::Msk,
            other => {
                return Err(Error::ReservedValue {
                    field: MOD_FORMAT.name,
                    value: other,
                })
            }
        })
    }
}

/// Sync word qualifier mode (MDMCFG2.SYNC_MODE)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncMode {
    /// No preamble/sync
    None = 0,
    /// 15 of 16 sync word bits detected
    Bits15Of16 = 1,
    /// 16 of 16 sync word bits detected
    Bits16Of16 = 2,
    /// 30 of 32 sync word bits detected
    Bits30Of32 = 3,
    /// No preamble/sync, carrier sense above threshold
    CarrierSense = 4,
    /// 15 of 16 plus carrier sense above threshold
    Bits15Of16CarrierSense = 5,
    /// 16 of 16 plus carrier sense above threshold
    Bits16Of16CarrierSense = 6,
    /// 30 of 32 plus carrier sense above threshold
    Bits30Of32CarrierSense = 7,
}

impl TryFrom<u8> for SyncMode {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => Self::None,
            1 => Self::Bits15Of16,
            2 => Self::Bits16Of16,
            3 => Self::Bits30Of32,
            4 => Self::CarrierSense,
            5 => Self::Bits15Of16CarrierSense,
            6 => Self::Bits16Of16CarrierSense,
            7 => Self::Bits30Of32CarrierSense,
            other => {
                return Err(Error::OutOfRange {
                    field: SYNC_MODE.name,
                    value: other as u32,
                })
            }
        })
    }
}

/// Frequency offset compensation settings (FOCCFG)
///
/// # Important Notes
/// - `limit` must be 0 for ASK/OOK modulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrequencyOffsetCompensation {
    /// Freeze compensation until carrier sense is asserted
    pub bs_cs_gate: bool,
    /// Loop gain before sync word detection, (value + 1) * K
    pub pre_k: u8,
    /// Halve the loop gain after sync word detection
    pub post_k: bool,
    /// Saturation point: 0 (off), BW/8, BW/4, BW/2
    pub limit: u8,
}

impl Configurator {
    /// Data rate in baud
    pub fn data_rate_baud(&self) -> u32 {
        let exponent = self.bank().field(DRATE_E) as u32;
        let mantissa = self.bank().field(DRATE_M) as u64;
        (((((256 + mantissa) * self.fosc()) << exponent) + (1 << 27)) >> 28) as u32
    }

    /// Programs the data rate.
    ///
    /// # Errors
    /// * `Error::OutOfRange` - the rate needs an exponent outside 0..=15
    pub fn set_data_rate_baud(&mut self, baud: u32) -> Result<(), Error> {
        let out_of_range = Error::OutOfRange {
            field: "data rate",
            value: baud,
        };
        let baud = baud as u64;
        let fosc = self.fosc();

        let mut exponent = floor_log2((baud << 20) / fosc).ok_or(out_of_range)?;
        if exponent > 15 {
            return Err(out_of_range);
        }
        let mut mantissa = div_round(baud << (28 - exponent), fosc) - 256;
        if mantissa == 256 {
            exponent += 1;
            mantissa = 0;
        }
        if exponent > 15 {
            return Err(out_of_range);
        }

        self.bank_mut().set_field(DRATE_E, exponent as u8)?;
        self.bank_mut().set_field(DRATE_M, mantissa as u8)
    }

    /// RX channel filter bandwidth in Hz
    pub fn receiver_bandwidth_hz(&self) -> u32 {
        let exponent = self.bank().field(CHANBW_E) as u32;
        let mantissa = self.bank().field(CHANBW_M) as u64;
        div_round(self.fosc(), (8 * (4 + mantissa)) << exponent) as u32
    }

    /// Programs the RX channel filter bandwidth, 58 kHz to 812 kHz at 26 MHz.
    ///
    /// # Errors
    /// * `Error::OutOfRange` - no exponent/mantissa pair in 0..=3 matches
    pub fn set_receiver_bandwidth_hz(&mut self, bandwidth_hz: u32) -> Result<(), Error> {
        let out_of_range = Error::OutOfRange {
            field: "receiver bandwidth",
            value: bandwidth_hz,
        };
        if bandwidth_hz == 0 {
            return Err(out_of_range);
        }
        let divisor = 8 * bandwidth_hz as u64;
        let fosc = self.fosc();

        let mut exponent = floor_log2(fosc / divisor)
            .and_then(|log| log.checked_sub(2))
            .ok_or(out_of_range)?;
        if exponent > 3 {
            return Err(out_of_range);
        }
        let mut mantissa = div_round(fosc, divisor << exponent) - 4;
        if mantissa == 4 {
            exponent += 1;
            mantissa = 0;
        }
        if exponent > 3 || mantissa > 3 {
            return Err(out_of_range);
        }

        self.bank_mut().set_field(CHANBW_E, exponent as u8)?;
        self.bank_mut().set_field(CHANBW_M, mantissa as u8)
    }

    /// Frequency deviation in Hz, only meaningful for the FSK formats
    pub fn deviation_hz(&self) -> u32 {
        let exponent = self.bank().field(DEVIATION_E) as u32;
        let mantissa = self.bank().field(DEVIATION_M) as u64;
        div_round(((8 + mantissa) * self.fosc()) << exponent, 1 << 17) as u32
    }

    /// Programs the frequency deviation, 1.6 kHz to 380 kHz at 26 MHz.
    ///
    /// # Errors
    /// * `Error::OutOfRange` - the deviation needs an exponent outside 0..=7
    pub fn set_deviation_hz(&mut self, deviation_hz: u32) -> Result<(), Error> {
        let out_of_range = Error::OutOfRange {
            field: "deviation",
            value: deviation_hz,
        };
        let deviation = deviation_hz as u64;
        let fosc = self.fosc();

        let mut exponent = floor_log2((deviation << 14) / fosc).ok_or(out_of_range)?;
        if exponent > 7 {
            return Err(out_of_range);
        }
        let mut mantissa = div_round(deviation << 17, fosc << exponent) - 8;
        if mantissa == 8 {
            exponent += 1;
            mantissa = 0;
        }
        if exponent > 7 {
            return Err(out_of_range);
        }

        self.bank_mut().set_field(DEVIATION_E, exponent as u8)?;
        self.bank_mut().set_field(DEVIATION_M, mantissa as u8)
    }

    pub fn frequency_offset_compensation(&self) -> FrequencyOffsetCompensation {
        FrequencyOffsetCompensation {
            bs_cs_gate: self.bank().flag(FOC_BS_CS_GATE),
            pre_k: self.bank().field(FOC_PRE_K),
            post_k: self.bank().flag(FOC_POST_K),
            limit: self.bank().field(FOC_LIMIT),
        }
    }

    /// # Errors
    /// * `Error::OutOfRange` - `pre_k` or `limit` is above 3
    pub fn set_frequency_offset_compensation(
        &mut self,
        settings: FrequencyOffsetCompensation,
    ) -> Result<(), Error> {
        check_width(FOC_PRE_K.name, settings.pre_k, FOC_PRE_K.max())?;
        check_width(FOC_LIMIT.name, settings.limit, FOC_LIMIT.max())?;

        let bank = self.bank_mut();
        bank.set_flag(FOC_BS_CS_GATE, settings.bs_cs_gate);
        bank.set_field(FOC_PRE_K, settings.pre_k)?;
        bank.set_flag(FOC_POST_K, settings.post_k);
        bank.set_field(FOC_LIMIT, settings.limit)
    }

    pub fn sync_mode(&self) -> SyncMode {
        match self.bank().field(SYNC_MODE) {
            0 => SyncMode::None,
            1 => SyncMode::Bits15Of16,
            2 => SyncMode::Bits16Of16,
            3 => SyncMode::Bits30Of32,
            4 => SyncMode::CarrierSense,
            5 => SyncMode::Bits15Of16CarrierSense,
            6 => SyncMode::Bits16Of16CarrierSense,
            _ => SyncMode::Bits30Of32CarrierSense,
        }
    }

    pub fn set_sync_mode(&mut self, mode: SyncMode) {
        self.bank_mut().modify(SYNC_MODE.address, |v| {
            (v & !(SYNC_MODE.mask << SYNC_MODE.shift)) | mode as u8
        });
    }

    /// 16 bit sync word, SYNC1 in the high byte
    pub fn sync_word(&self) -> u16 {
        match self.bank().range(SYNC1, 2) {
            Some(&[high, low]) => u16::from_be_bytes([high, low]),
            _ => 0,
        }
    }

    pub fn set_sync_word(&mut self, word: u16) -> Result<(), Error> {
        self.bank_mut().set_range(SYNC1, &word.to_be_bytes())
    }

    /// # Errors
    /// * `Error::ReservedValue` - MOD_FORMAT holds 2, 5 or 6
    pub fn modulation_format(&self) -> Result<ModulationFormat, Error> {
        ModulationFormat::try_from(self.bank().field(MOD_FORMAT))
    }

    /// Sets the modulation format.
    ///
    /// ASK/OOK transmits by switching between PATABLE entries 0 and 1, so FREND0
    /// is pointed at index 1 for ASK/OOK and back at index 0 for every other format.
    pub fn set_modulation_format(&mut self, format: ModulationFormat) {
        let bank = self.bank_mut();
        bank.modify(MOD_FORMAT.address, |v| {
            (v & !(MOD_FORMAT.mask << MOD_FORMAT.shift)) | ((format as u8) << MOD_FORMAT.shift)
        });
        bank.modify(FREND0, |v| match format {
            ModulationFormat::AskOok => (v & !0x09) | 0x01,
            _ => v & !0x09,
        });
    }

    pub fn manchester_enabled(&self) -> bool {
        self.bank().flag(MANCHESTER_EN)
    }

    pub fn set_manchester_enabled(&mut self, enable: bool) {
        self.bank_mut().set_flag(MANCHESTER_EN, enable);
    }
}

pub(super) fn check_width(field: &'static str, value: u8, max: u8) -> Result<(), Error> {
    if value > max {
        return Err(Error::OutOfRange {
            field,
            value: value as u32,
        });
    }
    Ok(())
}
