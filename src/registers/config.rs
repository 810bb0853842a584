//! Configuration registers
//!
//! The CC1101 exposes 47 configuration registers at SPI addresses 0x00 (IOCFG2)
//! through 0x2E (TEST0), followed by the 8 byte PATABLE at its own address. The
//! driver keeps a byte-for-byte mirror of that map in a [`RegisterBank`] and moves
//! it to and from the chip in two burst transfers.
//!
//! Bitfields inside the registers are described by [`Field`] constants so every
//! accessor addresses exactly one masked sub-range of one register.

use crate::presets::Preset;
use crate::Error;

/// Number of configuration registers (IOCFG2..=TEST0)
pub const CONFIG_REGISTER_COUNT: usize = 47;
/// Number of PATABLE entries
pub const PATABLE_SIZE: usize = 8;

pub const IOCFG2: u8 = 0x00;
pub const IOCFG1: u8 = 0x01;
pub const IOCFG0: u8 = 0x02;
pub const FIFOTHR: u8 = 0x03;
pub const SYNC1: u8 = 0x04;
pub const SYNC0: u8 = 0x05;
pub const PKTLEN: u8 = 0x06;
pub const PKTCTRL1: u8 = 0x07;
pub const PKTCTRL0: u8 = 0x08;
pub const ADDR: u8 = 0x09;
pub const CHANNR: u8 = 0x0A;
pub const FSCTRL1: u8 = 0x0B;
pub const FSCTRL0: u8 = 0x0C;
pub const FREQ2: u8 = 0x0D;
pub const FREQ1: u8 = 0x0E;
pub const FREQ0: u8 = 0x0F;
pub const MDMCFG4: u8 = 0x10;
pub const MDMCFG3: u8 = 0x11;
pub const MDMCFG2: u8 = 0x12;
pub const MDMCFG1: u8 = 0x13;
pub const MDMCFG0: u8 = 0x14;
pub const DEVIATN: u8 = 0x15;
pub const MCSM2: u8 = 0x16;
pub const MCSM1: u8 = 0x17;
pub const MCSM0: u8 = 0x18;
pub const FOCCFG: u8 = 0x19;
pub const BSCFG: u8 = 0x1A;
pub const AGCCTRL2: u8 = 0x1B;
pub const AGCCTRL1: u8 = 0x1C;
pub const AGCCTRL0: u8 = 0x1D;
pub const WOREVT1: u8 = 0x1E;
pub const WOREVT0: u8 = 0x1F;
pub const WORCTRL: u8 = 0x20;
pub const FREND1: u8 = 0x21;
pub const FREND0: u8 = 0x22;
pub const FSCAL3: u8 = 0x23;
pub const FSCAL2: u8 = 0x24;
pub const FSCAL1: u8 = 0x25;
pub const FSCAL0: u8 = 0x26;
pub const RCCTRL1: u8 = 0x27;
pub const RCCTRL0: u8 = 0x28;
pub const FSTEST: u8 = 0x29;
pub const PTEST: u8 = 0x2A;
pub const AGCTEST: u8 = 0x2B;
pub const TEST2: u8 = 0x2C;
pub const TEST1: u8 = 0x2D;
pub const TEST0: u8 = 0x2E;

/// PATABLE access address
pub const PATABLE: u8 = 0x3E;
/// TX FIFO (write) / RX FIFO (read) access address
pub const FIFO: u8 = 0x3F;
/// Capacity of each of the TX and RX FIFOs in bytes
pub const FIFO_SIZE: usize = 64;

/// A masked sub-range of a single configuration register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Field {
    /// Register address
    pub address: u8,
    /// Width mask, right aligned
    pub mask: u8,
    /// Bit position of the least significant field bit
    pub shift: u8,
    /// Datasheet name, used in error reports
    pub name: &'static str,
}

impl Field {
    pub const fn new(address: u8, mask: u8, shift: u8, name: &'static str) -> Self {
        Self {
            address,
            mask,
            shift,
            name,
        }
    }

    /// Largest value the field can hold
    pub const fn max(&self) -> u8 {
        self.mask
    }
}

pub const GDO2_CFG: Field = Field::new(IOCFG2, 0x3F, 0, "GDO2_CFG");
pub const GDO1_CFG: Field = Field::new(IOCFG1, 0x3F, 0, "GDO1_CFG");
pub const GDO0_CFG: Field = Field::new(IOCFG0, 0x3F, 0, "GDO0_CFG");
pub const GDO2_INV: Field = Field::new(IOCFG2, 0x01, 6, "GDO2_INV");
pub const GDO1_INV: Field = Field::new(IOCFG1, 0x01, 6, "GDO1_INV");
pub const GDO0_INV: Field = Field::new(IOCFG0, 0x01, 6, "GDO0_INV");

pub const ADR_CHK: Field = Field::new(PKTCTRL1, 0x03, 0, "ADR_CHK");
pub const APPEND_STATUS: Field = Field::new(PKTCTRL1, 0x01, 2, "APPEND_STATUS");
pub const CRC_AUTOFLUSH: Field = Field::new(PKTCTRL1, 0x01, 3, "CRC_AUTOFLUSH");

pub const LENGTH_CONFIG: Field = Field::new(PKTCTRL0, 0x03, 0, "LENGTH_CONFIG");
pub const CRC_EN: Field = Field::new(PKTCTRL0, 0x01, 2, "CRC_EN");
pub const PKT_FORMAT: Field = Field::new(PKTCTRL0, 0x03, 4, "PKT_FORMAT");
pub const WHITE_DATA: Field = Field::new(PKTCTRL0, 0x01, 6, "WHITE_DATA");

pub const DRATE_E: Field = Field::new(MDMCFG4, 0x0F, 0, "DRATE_E");
pub const CHANBW_M: Field = Field::new(MDMCFG4, 0x03, 4, "CHANBW_M");
pub const CHANBW_E: Field = Field::new(MDMCFG4, 0x03, 6, "CHANBW_E");
pub const DRATE_M: Field = Field::new(MDMCFG3, 0xFF, 0, "DRATE_M");

pub const SYNC_MODE: Field = Field::new(MDMCFG2, 0x07, 0, "SYNC_MODE");
pub const MANCHESTER_EN: Field = Field::new(MDMCFG2, 0x01, 3, "MANCHESTER_EN");
pub const MOD_FORMAT: Field = Field::new(MDMCFG2, 0x07, 4, "MOD_FORMAT");

pub const CHANSPC_E: Field = Field::new(MDMCFG1, 0x03, 0, "CHANSPC_E");
pub const NUM_PREAMBLE: Field = Field::new(MDMCFG1, 0x07, 4, "NUM_PREAMBLE");
pub const FEC_EN: Field = Field::new(MDMCFG1, 0x01, 7, "FEC_EN");
pub const CHANSPC_M: Field = Field::new(MDMCFG0, 0xFF, 0, "CHANSPC_M");

pub const DEVIATION_M: Field = Field::new(DEVIATN, 0x07, 0, "DEVIATION_M");
pub const DEVIATION_E: Field = Field::new(DEVIATN, 0x07, 4, "DEVIATION_E");

pub const FOC_LIMIT: Field = Field::new(FOCCFG, 0x03, 0, "FOC_LIMIT");
pub const FOC_POST_K: Field = Field::new(FOCCFG, 0x01, 2, "FOC_POST_K");
pub const FOC_PRE_K: Field = Field::new(FOCCFG, 0x03, 3, "FOC_PRE_K");
pub const FOC_BS_CS_GATE: Field = Field::new(FOCCFG, 0x01, 5, "FOC_BS_CS_GATE");

pub const MAGN_TARGET: Field = Field::new(AGCCTRL2, 0x07, 0, "MAGN_TARGET");
pub const MAX_LNA_GAIN: Field = Field::new(AGCCTRL2, 0x07, 3, "MAX_LNA_GAIN");
pub const MAX_DVGA_GAIN: Field = Field::new(AGCCTRL2, 0x03, 6, "MAX_DVGA_GAIN");

pub const CARRIER_SENSE_ABS_THR: Field = Field::new(AGCCTRL1, 0x0F, 0, "CARRIER_SENSE_ABS_THR");
pub const CARRIER_SENSE_REL_THR: Field = Field::new(AGCCTRL1, 0x03, 4, "CARRIER_SENSE_REL_THR");
pub const AGC_LNA_PRIORITY: Field = Field::new(AGCCTRL1, 0x01, 6, "AGC_LNA_PRIORITY");

pub const FILTER_LENGTH: Field = Field::new(AGCCTRL0, 0x03, 0, "FILTER_LENGTH");
pub const AGC_FREEZE: Field = Field::new(AGCCTRL0, 0x03, 2, "AGC_FREEZE");
pub const WAIT_TIME: Field = Field::new(AGCCTRL0, 0x03, 4, "WAIT_TIME");
pub const HYST_LEVEL: Field = Field::new(AGCCTRL0, 0x03, 6, "HYST_LEVEL");

/// In-memory mirror of the configuration registers and the PATABLE
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterBank {
    registers: [u8; CONFIG_REGISTER_COUNT],
    patable: [u8; PATABLE_SIZE],
}

impl RegisterBank {
    pub const fn new(
        registers: [u8; CONFIG_REGISTER_COUNT],
        patable: [u8; PATABLE_SIZE],
    ) -> Self {
        Self {
            registers,
            patable,
        }
    }

    /// Snapshot of a preset; presets are always taken over wholesale.
    pub const fn from_preset(preset: &Preset) -> Self {
        Self::new(preset.registers, preset.patable)
    }

    /// Replaces the complete bank with a preset snapshot
    pub fn load(&mut self, preset: &Preset) {
        self.registers = preset.registers;
        self.patable = preset.patable;
    }

    pub fn registers(&self) -> &[u8; CONFIG_REGISTER_COUNT] {
        &self.registers
    }

    pub fn registers_mut(&mut self) -> &mut [u8; CONFIG_REGISTER_COUNT] {
        &mut self.registers
    }

    pub fn patable(&self) -> &[u8; PATABLE_SIZE] {
        &self.patable
    }

    pub fn patable_mut(&mut self) -> &mut [u8; PATABLE_SIZE] {
        &mut self.patable
    }

    /// Raw register byte, `None` for addresses past TEST0
    pub fn get(&self, address: u8) -> Option<u8> {
        self.registers.get(address as usize).copied()
    }

    /// Writes a whole register byte
    pub fn set(&mut self, address: u8, value: u8) -> Result<(), Error> {
        let slot = self
            .registers
            .get_mut(address as usize)
            .ok_or(Error::OutOfRange {
                field: "register address",
                value: address as u32,
            })?;
        *slot = value;
        Ok(())
    }

    /// Applies `f` to a register byte in place.
    ///
    /// Addresses past TEST0 are ignored.
    pub fn modify<F>(&mut self, address: u8, f: F)
    where
        F: FnOnce(u8) -> u8,
    {
        if let Some(slot) = self.registers.get_mut(address as usize) {
            *slot = f(*slot);
        }
    }

    /// Contiguous run of registers starting at `address`
    pub fn range(&self, address: u8, len: usize) -> Option<&[u8]> {
        let start = address as usize;
        self.registers.get(start..start.checked_add(len)?)
    }

    /// Overwrites a contiguous run of registers starting at `address`
    pub fn set_range(&mut self, address: u8, values: &[u8]) -> Result<(), Error> {
        let start = address as usize;
        let slots = self
            .registers
            .get_mut(start..start + values.len())
            .ok_or(Error::OutOfRange {
                field: "register address",
                value: (start + values.len()) as u32,
            })?;
        slots.copy_from_slice(values);
        Ok(())
    }

    /// Reads a bitfield
    pub fn field(&self, field: Field) -> u8 {
        (self.registers[field.address as usize] >> field.shift) & field.mask
    }

    /// Writes a bitfield, leaving the other bits of the register untouched.
    ///
    /// # Errors
    /// * `Error::OutOfRange` - `value` does not fit the field width
    pub fn set_field(&mut self, field: Field, value: u8) -> Result<(), Error> {
        if value > field.mask {
            return Err(Error::OutOfRange {
                field: field.name,
                value: value as u32,
            });
        }
        let reg = &mut self.registers[field.address as usize];
        *reg = (*reg & !(field.mask << field.shift)) | (value << field.shift);
        Ok(())
    }

    /// Reads a single bit field as a flag
    pub fn flag(&self, field: Field) -> bool {
        self.field(field) != 0
    }

    /// Sets or clears a single bit field
    pub fn set_flag(&mut self, field: Field, enable: bool) {
        let reg = &mut self.registers[field.address as usize];
        if enable {
            *reg |= field.mask << field.shift;
        } else {
            *reg &= !(field.mask << field.shift);
        }
    }
}

impl Default for RegisterBank {
    fn default() -> Self {
        Self::from_preset(&crate::presets::DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_write_preserves_neighbours() {
        let mut bank = RegisterBank::new([0; CONFIG_REGISTER_COUNT], [0; PATABLE_SIZE]);
        bank.set(MDMCFG4, 0xA0).unwrap();
        bank.set_field(DRATE_E, 0x0C).unwrap();
        assert_eq!(bank.get(MDMCFG4), Some(0xAC));
        assert_eq!(bank.field(CHANBW_E), 0x02);
        assert_eq!(bank.field(CHANBW_M), 0x02);
    }

    #[test]
    fn field_write_rejects_wide_values() {
        let mut bank = RegisterBank::default();
        let before = bank.clone();
        assert_eq!(
            bank.set_field(SYNC_MODE, 8),
            Err(Error::OutOfRange {
                field: "SYNC_MODE",
                value: 8
            })
        );
        assert_eq!(bank, before);
    }

    #[test]
    fn flags_toggle_single_bit() {
        let mut bank = RegisterBank::new([0xFF; CONFIG_REGISTER_COUNT], [0; PATABLE_SIZE]);
        bank.set_flag(FEC_EN, false);
        assert_eq!(bank.get(MDMCFG1), Some(0x7F));
        assert!(!bank.flag(FEC_EN));
        bank.set_flag(FEC_EN, true);
        assert_eq!(bank.get(MDMCFG1), Some(0xFF));
    }

    #[test]
    fn ranges_are_bounded_by_the_register_map() {
        let mut bank = RegisterBank::default();
        assert!(bank.range(FREQ2, 3).is_some());
        assert!(bank.range(TEST0, 2).is_none());
        assert!(bank.set_range(TEST1, &[0, 0, 0]).is_err());
        assert!(bank.set(0x2F, 0).is_err());
        assert_eq!(bank.get(0x2F), None);
    }
}
