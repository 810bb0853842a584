//! Protocol profiles
//!
//! A profile bundles the settings a link partner dictates (carrier, baud rate,
//! modulation and, for FIFO based links, the packet layout) and writes them into
//! a [`Configurator`] in one step. Settings outside the profile are left alone.

use crate::configurator::{
    AddressCheck, Configurator, ModulationFormat, PacketFormat, PacketLengthMode,
};
use crate::Error;

/// Physical layer settings shared by every profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Protocol {
    pub base_frequency_hz: u64,
    pub data_rate_baud: u32,
    pub modulation_format: ModulationFormat,
}

impl Default for Protocol {
    fn default() -> Self {
        Self {
            base_frequency_hz: 433_920_000,
            data_rate_baud: 1000,
            modulation_format: ModulationFormat::Fsk2,
        }
    }
}

impl Protocol {
    /// # Errors
    /// * `Error::OutOfRange` - frequency or baud rate cannot be encoded
    pub fn configure(&self, configurator: &mut Configurator) -> Result<(), Error> {
        configurator.set_base_frequency_hz(self.base_frequency_hz)?;
        configurator.set_data_rate_baud(self.data_rate_baud)?;
        configurator.set_modulation_format(self.modulation_format);
        Ok(())
    }
}

/// Profile of a FIFO based packet link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PacketProtocol {
    pub physical: Protocol,
    pub length_mode: PacketLengthMode,
    /// Fixed length, or maximum length in variable mode
    pub packet_length: u8,
    pub address_check: AddressCheck,
    pub device_address: u8,
}

impl Default for PacketProtocol {
    fn default() -> Self {
        Self {
            physical: Protocol::default(),
            length_mode: PacketLengthMode::Fixed,
            packet_length: 0,
            address_check: AddressCheck::Disabled,
            device_address: 0,
        }
    }
}

impl PacketProtocol {
    /// Applies the physical settings and selects the normal (FIFO) packet format
    pub fn configure(&self, configurator: &mut Configurator) -> Result<(), Error> {
        self.physical.configure(configurator)?;
        configurator.set_packet_format(PacketFormat::Normal)?;
        configurator.set_packet_length_mode(self.length_mode)?;
        configurator.set_packet_length(self.packet_length);
        configurator.set_address_check_mode(self.address_check)?;
        configurator.set_device_address(self.device_address);
        Ok(())
    }
}
