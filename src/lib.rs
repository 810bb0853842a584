#![cfg_attr(not(test), no_std)]
//! CC1101 Radio Driver
//!
//! This crate provides a type-safe interface for the Texas Instruments CC1101
//! sub-GHz transceiver. The CC1101 is a low cost, low power radio for the 315,
//! 433, 868 and 915 MHz ISM/SRD bands with a packet handler, 64 byte FIFOs and
//! three general purpose digital output pins.
//!
//! # Features
//! - Frequency bands: 300-348 MHz, 387-464 MHz, 779-928 MHz
//! - Modulation support: 2-FSK, GFSK, 4-FSK, MSK, ASK/OOK
//! - Data rates: 0.6-600 kBaud
//! - Packet formats: FIFO (fixed, variable, infinite length), synchronous serial,
//!   asynchronous serial, random TX
//! - Decoding of raw OOK captures (Manchester, Princeton 25 bit)
//!
//! # Architecture
//! The driver is organized into several modules:
//!
//! - [`device`]: SPI framing of register, burst and strobe accesses
//! - [`registers`]: Register map and status register definitions
//!   - [`registers::config`]: Configuration register bank and bit fields
//! - [`commands`]: Command strobes
//! - [`configurator`]: Physical unit view of the configuration registers
//! - [`presets`]: Complete register snapshots for common setups
//! - [`radio`]: The [`Cc1101`] controller, state handling and status reads
//! - [`packet`]: Packet transmission and reception on top of [`Cc1101`]
//! - [`pins`]: Host side of the GDO pins
//! - [`signal`]: Bitstream reconstruction and line code decoding
//! - [`protocol`]: Bundles of settings dictated by a link partner
//!
//! # Usage
//! The [`Configurator`] mirrors the chip's configuration registers. Settings are
//! changed on the mirror and written to the chip in one burst:
//!
//! 1. Create a [`Cc1101`] with an SPI device, the GDO pins and a delay source;
//!    this resets the chip and reads its configuration
//! 2. Load a preset or adjust the configurator
//! 3. Push the configuration
//! 4. Transmit or receive
//!
//! # Important Notes
//! - Transmit and receive both leave the chip in IDLE
//! - Transmit requires IDLE, receive requires IDLE or RX
//! - A receive that times out returns `Ok(None)`
//! - Configuration changes are not visible to the chip until pushed
//!
//! # Example
//! ```ignore
//! use cc1101::{presets, Cc1101, ReceivedPacket};
//!
//! let mut radio = Cc1101::new(spi, pins, delay)?;
//! radio.load_preset(&presets::DR5K7_DEV5K2_2FSK_RXBW58K)?;
//!
//! if let Some(ReceivedPacket::Normal(packet)) = radio.receive(5000)? {
//!     log::info!("payload: {:02x?}", packet.payload);
//! }
//! ```

extern crate alloc;

pub mod commands;
pub mod configurator;
pub mod device;
mod error;
pub mod packet;
pub mod pins;
pub mod presets;
pub mod protocol;
pub mod radio;
pub mod registers;
pub mod signal;

pub use commands::Strobe;
pub use configurator::{Configurator, Gdo};
pub use device::Device;
pub use error::Error;
pub use packet::{LinkStatus, NormalPacket, RawPacket, ReceivedPacket, SyncPacket};
pub use pins::{Capture, Edge, Level, NoPins, RadioPins, Trigger};
pub use presets::Preset;
pub use protocol::{PacketProtocol, Protocol};
pub use radio::{Cc1101, DriverConfig};
pub use registers::MarcState;
