//! General purpose digital output pins (datasheet chapter 26)

use crate::registers::config::{Field, GDO0_CFG, GDO0_INV, GDO1_CFG, GDO1_INV, GDO2_CFG, GDO2_INV};
use crate::Error;

use super::Configurator;

/// Asserts when a sync word has been sent or received, de-asserts at the end of
/// the packet
pub const GDO_SYNC_WORD: u8 = 0x06;
/// Serial clock, synchronous to the data in synchronous serial mode
pub const GDO_SERIAL_CLOCK: u8 = 0x0B;
/// Serial synchronous data output
pub const GDO_SYNC_SERIAL_DATA: u8 = 0x0C;
/// Serial data output, used in asynchronous serial mode
pub const GDO_ASYNC_SERIAL_DATA: u8 = 0x0D;
/// Carrier sense, high if RSSI is above threshold
pub const GDO_CARRIER_SENSE: u8 = 0x0E;

/// GDO pin identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gdo {
    Gdo0 = 0,
    Gdo1 = 1,
    Gdo2 = 2,
}

impl Gdo {
    pub const ALL: [Gdo; 3] = [Gdo::Gdo0, Gdo::Gdo1, Gdo::Gdo2];

    /// IOCFGx register address, IOCFG2 comes first in the map
    pub const fn register(self) -> u8 {
        2 - self as u8
    }

    const fn config_field(self) -> Field {
        match self {
            Gdo::Gdo0 => GDO0_CFG,
            Gdo::Gdo1 => GDO1_CFG,
            Gdo::Gdo2 => GDO2_CFG,
        }
    }

    const fn invert_field(self) -> Field {
        match self {
            Gdo::Gdo0 => GDO0_INV,
            Gdo::Gdo1 => GDO1_INV,
            Gdo::Gdo2 => GDO2_INV,
        }
    }
}

impl TryFrom<u8> for Gdo {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Gdo::Gdo0),
            1 => Ok(Gdo::Gdo1),
            2 => Ok(Gdo::Gdo2),
            other => Err(Error::OutOfRange {
                field: "GDO pin",
                value: other as u32,
            }),
        }
    }
}

impl Configurator {
    /// Signal selection of `pin` (IOCFGx.GDOx_CFG)
    pub fn gdo_config(&self, pin: Gdo) -> u8 {
        self.bank().field(pin.config_field())
    }

    /// Selects the signal driven on `pin`; the inversion and drive strength bits
    /// of the register are preserved.
    ///
    /// # Errors
    /// * `Error::OutOfRange` - `config` is wider than 6 bits
    pub fn set_gdo_config(&mut self, pin: Gdo, config: u8) -> Result<(), Error> {
        self.bank_mut().set_field(pin.config_field(), config)
    }

    pub fn gdo_inverted(&self, pin: Gdo) -> bool {
        self.bank().flag(pin.invert_field())
    }

    pub fn set_gdo_inverted(&mut self, pin: Gdo, inverted: bool) {
        self.bank_mut().set_flag(pin.invert_field(), inverted);
    }
}
