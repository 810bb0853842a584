//! CC1101 SPI Device Interface
//!
//! This module provides the low-level interface for talking to a CC1101 over SPI.
//! It supports both synchronous and asynchronous operations.
//!
//! Every access starts with a header byte made of a 6 bit address and the
//! [`Header`] flags:
//! - Configuration registers are read or written one at a time or in bursts
//! - Status registers are read with both flags set
//! - Command strobes are sent without either flag
//! - The PATABLE and FIFOs are accessed through their own addresses
//!
//! # Example
//! ```ignore
//! use cc1101::{registers::MarcState, Device};
//!
//! // Create device with SPI interface
//! let spi = // ... SPI implementation
//! let mut device = Device::new(spi);
//!
//! // Read a status register
//! let state: MarcState = device.read_register()?;
//!
//! // Fill the TX FIFO
//! device.write_burst(cc1101::registers::FIFO, &[0x01, 0x02, 0x03])?;
//! ```

use bitflags::bitflags;
use embedded_hal::spi::Operation;

use crate::commands::Strobe;
use crate::registers::{ChipStatus, StatusRegister};
use crate::Error;

bitflags! {
    /// Access flags of the SPI header byte
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Header: u8 {
        /// Read access
        const READ = 0x80;
        /// Burst access, also selects status registers over strobes
        const BURST = 0x40;
    }
}

impl Header {
    /// Builds the header byte for an access to `address`
    pub const fn byte(self, address: u8) -> u8 {
        (address & 0x3F) | self.bits()
    }
}

/// Low-level SPI interface of the CC1101.
///
/// This struct wraps an SPI device and frames register, FIFO and strobe accesses.
/// It supports synchronous operations through the embedded-hal traits and
/// asynchronous operations through embedded-hal-async.
pub struct Device<SPI> {
    spi: SPI,
}

impl<SPI> Device<SPI> {
    /// Creates a new Device instance wrapping the provided SPI interface.
    ///
    /// # Arguments
    /// * `spi` - An SPI device implementing the required embedded-hal traits
    pub fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Releases the underlying SPI device.
    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI> Device<SPI>
where
    SPI: embedded_hal::spi::SpiDevice,
{
    /// Reads a status register.
    ///
    /// # Type Parameters
    /// * `R` - Status register type
    ///
    /// # Errors
    /// * `Error::Spi` - SPI communication failed
    /// * Any error of `R::from_byte`, e.g. `Error::UnknownState` for MARCSTATE
    pub fn read_register<R>(&mut self) -> Result<R, Error>
    where
        R: StatusRegister,
    {
        let header = [(Header::READ | Header::BURST).byte(R::ADDRESS)];
        let mut value = [0u8];

        self.spi
            .transaction(&mut [Operation::Write(&header), Operation::Read(&mut value)])
            .map_err(Error::spi)?;

        R::from_byte(value[0])
    }

    /// Reads a single configuration register.
    pub fn read_config(&mut self, address: u8) -> Result<u8, Error> {
        let header = [Header::READ.byte(address)];
        let mut value = [0u8];

        self.spi
            .transaction(&mut [Operation::Write(&header), Operation::Read(&mut value)])
            .map_err(Error::spi)?;

        Ok(value[0])
    }

    /// Writes a single configuration register.
    pub fn write_config(&mut self, address: u8, value: u8) -> Result<(), Error> {
        self.spi
            .write(&[Header::empty().byte(address), value])
            .map_err(Error::spi)
    }

    /// Reads consecutive bytes starting at `address`.
    ///
    /// Bursts from configuration registers auto-increment the address, bursts from
    /// the FIFO or PATABLE address stay on it.
    ///
    /// # Errors
    /// * `Error::Spi` - SPI communication failed
    pub fn read_burst(&mut self, address: u8, bytes: &mut [u8]) -> Result<(), Error> {
        let header = [(Header::READ | Header::BURST).byte(address)];

        self.spi
            .transaction(&mut [Operation::Write(&header), Operation::Read(bytes)])
            .map_err(Error::spi)
    }

    /// Writes consecutive bytes starting at `address`.
    ///
    /// # Errors
    /// * `Error::Spi` - SPI communication failed
    pub fn write_burst(&mut self, address: u8, bytes: &[u8]) -> Result<(), Error> {
        let header = [Header::BURST.byte(address)];

        self.spi
            .transaction(&mut [Operation::Write(&header), Operation::Write(bytes)])
            .map_err(Error::spi)
    }

    /// Sends a command strobe.
    ///
    /// # Returns
    /// The chip status byte clocked out while the strobe was sent
    pub fn strobe(&mut self, strobe: Strobe) -> Result<ChipStatus, Error> {
        let mut buf = [strobe.address()];

        self.spi
            .transaction(&mut [Operation::TransferInPlace(&mut buf)])
            .map_err(Error::spi)?;

        Ok(ChipStatus::from(buf[0]))
    }
}

impl<SPI> Device<SPI>
where
    SPI: embedded_hal_async::spi::SpiDevice,
{
    /// Asynchronously reads a status register.
    ///
    /// This is the async version of [`read_register`](Device::read_register).
    pub async fn read_register_async<R>(&mut self) -> Result<R, Error>
    where
        R: StatusRegister,
    {
        let header = [(Header::READ | Header::BURST).byte(R::ADDRESS)];
        let mut value = [0u8];

        self.spi
            .transaction(&mut [Operation::Write(&header), Operation::Read(&mut value)])
            .await
            .map_err(Error::spi)?;

        R::from_byte(value[0])
    }

    /// Asynchronously reads consecutive bytes starting at `address`.
    ///
    /// This is the async version of [`read_burst`](Device::read_burst).
    pub async fn read_burst_async(&mut self, address: u8, bytes: &mut [u8]) -> Result<(), Error> {
        let header = [(Header::READ | Header::BURST).byte(address)];

        self.spi
            .transaction(&mut [Operation::Write(&header), Operation::Read(bytes)])
            .await
            .map_err(Error::spi)
    }

    /// Asynchronously writes consecutive bytes starting at `address`.
    ///
    /// This is the async version of [`write_burst`](Device::write_burst).
    pub async fn write_burst_async(&mut self, address: u8, bytes: &[u8]) -> Result<(), Error> {
        let header = [Header::BURST.byte(address)];

        self.spi
            .transaction(&mut [Operation::Write(&header), Operation::Write(bytes)])
            .await
            .map_err(Error::spi)
    }

    /// Asynchronously sends a command strobe.
    ///
    /// This is the async version of [`strobe`](Device::strobe).
    pub async fn strobe_async(&mut self, strobe: Strobe) -> Result<ChipStatus, Error> {
        let mut buf = [strobe.address()];

        self.spi
            .transaction(&mut [Operation::TransferInPlace(&mut buf)])
            .await
            .map_err(Error::spi)?;

        Ok(ChipStatus::from(buf[0]))
    }
}
