//! CC1101 device controller
//!
//! [`Cc1101`] ties the SPI [`Device`], the GDO pins and a delay source to a
//! [`Configurator`] holding the register mirror. It moves the mirror to and from
//! the chip, issues the state strobes and reads the status registers. Packet
//! transmission and reception live in [`crate::packet`].
//!
//! # Example
//! ```ignore
//! use cc1101::{presets, Cc1101};
//!
//! let mut radio = Cc1101::new(spi, pins, delay)?;
//! radio.load_preset(&presets::DR5K7_DEV5K2_2FSK_RXBW58K)?;
//! radio.configurator_mut().set_base_frequency_hz(868_300_000)?;
//! radio.push_configuration()?;
//! radio.transmit(b"hello", true)?;
//! ```

use embedded_hal::delay::DelayNs;
use log::{debug, info, warn};

use crate::commands::Strobe;
use crate::configurator::{Configurator, DEFAULT_FOSC_HZ};
use crate::device::Device;
use crate::pins::RadioPins;
use crate::presets::{self, Preset};
use crate::registers::{
    config::IOCFG2, MarcState, PacketStatus, PartNum, Rssi, RxBytes, TxBytes, Version,
    CONFIG_REGISTER_COUNT, PATABLE, PATABLE_SIZE,
};
use crate::Error;

/// Timing and flow control parameters of the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DriverConfig {
    /// Crystal frequency in Hz
    pub fosc_hz: u32,
    /// Bytes written to the TX FIFO per burst
    pub chunk_size: usize,
    /// Pause between FIFO status polls in milliseconds
    pub fifo_poll_interval_ms: u32,
    /// Upper bound of the RX drain backoff in milliseconds
    pub max_poll_interval_ms: u32,
    /// Wait after SRX/STX before the new state is assumed active
    pub settle_ms: u32,
    /// Timeout of the end-of-transmission edge in blocking transmits
    pub end_of_transmission_timeout_ms: u32,
    /// Time budget for the TX FIFO to drain below the chunk threshold
    pub tx_fifo_timeout_ms: u32,
    /// Longest a received packet may keep GDO0 asserted once it has started
    pub rx_drain_timeout_ms: u32,
    /// Wait after SRX before sampling in synchronous serial mode
    pub sync_serial_settle_ms: u32,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            fosc_hz: DEFAULT_FOSC_HZ,
            chunk_size: 32,
            fifo_poll_interval_ms: 1,
            max_poll_interval_ms: 4,
            settle_ms: 10,
            end_of_transmission_timeout_ms: 1000,
            tx_fifo_timeout_ms: 1000,
            rx_drain_timeout_ms: 5000,
            sync_serial_settle_ms: 100,
        }
    }
}

/// CC1101 radio controller.
///
/// # Important Notes
/// - One instance per physical chip; the controller is not meant to be shared
///   between threads
/// - Configuration changes only reach the chip with
///   [`push_configuration`](Cc1101::push_configuration)
pub struct Cc1101<SPI, PINS, DELAY> {
    pub(crate) device: Device<SPI>,
    pub(crate) pins: PINS,
    pub(crate) delay: DELAY,
    pub(crate) configurator: Configurator,
    pub(crate) config: DriverConfig,
    synchronized: bool,
}

impl<SPI, PINS, DELAY> Cc1101<SPI, PINS, DELAY> {
    /// Assembles a controller without talking to the chip.
    ///
    /// The configurator is assumed to mirror the chip already; use
    /// [`Cc1101::new`] to reset and read the chip instead.
    pub fn from_parts(
        spi: SPI,
        pins: PINS,
        delay: DELAY,
        configurator: Configurator,
        config: DriverConfig,
    ) -> Self {
        Self {
            device: Device::new(spi),
            pins,
            delay,
            configurator,
            config,
            synchronized: true,
        }
    }

    pub fn configurator(&self) -> &Configurator {
        &self.configurator
    }

    /// Mutable access to the register mirror, push the changes afterwards
    pub fn configurator_mut(&mut self) -> &mut Configurator {
        &mut self.configurator
    }

    pub fn driver_config(&self) -> &DriverConfig {
        &self.config
    }

    pub fn pins_mut(&mut self) -> &mut PINS {
        &mut self.pins
    }

    /// Whether the register mirror matches the chip as far as the driver knows.
    ///
    /// Cleared by [`reset`](Cc1101::reset), set again by pulling or pushing the
    /// configuration.
    pub fn is_synchronized(&self) -> bool {
        self.synchronized
    }

    /// Releases the SPI device, pins and delay
    pub fn release(self) -> (SPI, PINS, DELAY) {
        (self.device.release(), self.pins, self.delay)
    }
}

impl<SPI, PINS, DELAY> Cc1101<SPI, PINS, DELAY>
where
    SPI: embedded_hal::spi::SpiDevice,
    PINS: RadioPins,
    DELAY: DelayNs,
{
    /// Resets the chip, checks its identity and reads its configuration.
    pub fn new(spi: SPI, pins: PINS, delay: DELAY) -> Result<Self, Error> {
        Self::with_config(spi, pins, delay, DriverConfig::default())
    }

    /// Same as [`new`](Cc1101::new) with explicit driver parameters.
    ///
    /// # Errors
    /// * `Error::Spi` - SPI communication failed
    pub fn with_config(
        spi: SPI,
        pins: PINS,
        delay: DELAY,
        config: DriverConfig,
    ) -> Result<Self, Error> {
        info!("Initializing CC1101 device");
        let configurator = Configurator::new(&presets::DEFAULT, config.fosc_hz);
        let mut radio = Self::from_parts(spi, pins, delay, configurator, config);
        radio.reset()?;
        radio.chip_identity()?;
        radio.pull_configuration()?;
        Ok(radio)
    }

    /// Sends SRES. Every register returns to its power-on value, so the register
    /// mirror is out of date until the next pull or push.
    pub fn reset(&mut self) -> Result<(), Error> {
        debug!("Resetting CC1101 device");
        self.device.strobe(Strobe::Reset)?;
        self.synchronized = false;
        Ok(())
    }

    /// Reads PARTNUM and VERSION.
    ///
    /// Unknown values are logged and otherwise accepted.
    pub fn chip_identity(&mut self) -> Result<(PartNum, Version), Error> {
        let partnum: PartNum = self.device.read_register()?;
        debug!("Chip partnum: 0x{:02X}", partnum.0);
        if partnum != PartNum::CC1101 {
            warn!("Unexpected chip partnum: 0x{:02X}", partnum.0);
        }

        let version: Version = self.device.read_register()?;
        debug!("Chip version: 0x{:02X}", version.0);
        if !version.is_known() {
            warn!("Unexpected chip version: 0x{:02X}", version.0);
        }

        Ok((partnum, version))
    }

    /// Reads all configuration registers and the PATABLE into the mirror
    pub fn pull_configuration(&mut self) -> Result<(), Error> {
        debug!("Reading configuration from device");
        let mut registers = [0u8; CONFIG_REGISTER_COUNT];
        let mut patable = [0u8; PATABLE_SIZE];
        self.device.read_burst(IOCFG2, &mut registers)?;
        self.device.read_burst(PATABLE, &mut patable)?;

        let bank = self.configurator.bank_mut();
        *bank.registers_mut() = registers;
        *bank.patable_mut() = patable;
        self.synchronized = true;
        Ok(())
    }

    /// Writes the mirror to all configuration registers and the PATABLE
    pub fn push_configuration(&mut self) -> Result<(), Error> {
        debug!("Writing configuration to device");
        let bank = self.configurator.bank();
        self.device.write_burst(IOCFG2, bank.registers())?;
        self.device.write_burst(PATABLE, bank.patable())?;
        self.synchronized = true;
        Ok(())
    }

    /// Replaces the mirror with `preset` and pushes it
    pub fn load_preset(&mut self, preset: &Preset) -> Result<(), Error> {
        debug!("Loading preset {}", preset.name);
        self.configurator.load_preset(preset);
        self.push_configuration()
    }

    /// Current MARC state
    pub fn device_state(&mut self) -> Result<MarcState, Error> {
        self.device.read_register()
    }

    pub fn set_idle(&mut self) -> Result<(), Error> {
        info!("Setting device to IDLE state");
        self.device.strobe(Strobe::Idle)?;
        Ok(())
    }

    /// Enables RX and waits for the receiver to settle
    pub fn set_receive(&mut self) -> Result<(), Error> {
        info!("Setting device to receive mode");
        self.device.strobe(Strobe::Receive)?;
        self.delay.delay_ms(self.config.settle_ms);
        Ok(())
    }

    /// Enables TX and waits for the transmitter to settle
    pub fn set_transmit(&mut self) -> Result<(), Error> {
        info!("Setting device to transmit mode");
        self.device.strobe(Strobe::Transmit)?;
        self.delay.delay_ms(self.config.settle_ms);
        Ok(())
    }

    pub fn flush_rx_fifo(&mut self) -> Result<(), Error> {
        debug!("Flushing RX FIFO");
        self.device.strobe(Strobe::FlushRx)?;
        Ok(())
    }

    pub fn flush_tx_fifo(&mut self) -> Result<(), Error> {
        debug!("Flushing TX FIFO");
        self.device.strobe(Strobe::FlushTx)?;
        Ok(())
    }

    pub fn rx_bytes(&mut self) -> Result<RxBytes, Error> {
        self.device.read_register()
    }

    pub fn tx_bytes(&mut self) -> Result<TxBytes, Error> {
        self.device.read_register()
    }

    /// Raw RSSI reading.
    ///
    /// # Errors
    /// * `Error::InvalidState` - the chip is not in RX or RX_END
    pub fn rssi_raw(&mut self) -> Result<Rssi, Error> {
        const REQUIRED: &[MarcState] = &[MarcState::Rx, MarcState::RxEnd];

        let state = self.device_state()?;
        if !REQUIRED.contains(&state) {
            return Err(Error::InvalidState {
                required: REQUIRED,
                actual: state,
            });
        }
        self.device.read_register()
    }

    /// RSSI in dBm, see [`rssi_raw`](Cc1101::rssi_raw)
    pub fn rssi_dbm(&mut self) -> Result<f32, Error> {
        Ok(self.rssi_raw()?.dbm())
    }

    pub fn packet_status(&mut self) -> Result<PacketStatus, Error> {
        self.device.read_register()
    }

    /// Fails with `Error::InvalidState` unless the chip is in one of `required`
    pub(crate) fn expect_state(
        &mut self,
        required: &'static [MarcState],
    ) -> Result<MarcState, Error> {
        let state = self.device_state()?;
        if !required.contains(&state) {
            warn!("Device must be in state {:?}, current state: {:?}", required, state);
            return Err(Error::InvalidState {
                required,
                actual: state,
            });
        }
        Ok(state)
    }
}

impl<SPI, PINS, DELAY> Cc1101<SPI, PINS, DELAY>
where
    SPI: embedded_hal_async::spi::SpiDevice,
{
    /// Asynchronously reads the current MARC state.
    ///
    /// This is the async version of [`device_state`](Cc1101::device_state).
    pub async fn device_state_async(&mut self) -> Result<MarcState, Error> {
        self.device.read_register_async().await
    }

    /// Asynchronously reads the configuration into the mirror.
    ///
    /// This is the async version of [`pull_configuration`](Cc1101::pull_configuration).
    pub async fn pull_configuration_async(&mut self) -> Result<(), Error> {
        let mut registers = [0u8; CONFIG_REGISTER_COUNT];
        let mut patable = [0u8; PATABLE_SIZE];
        self.device.read_burst_async(IOCFG2, &mut registers).await?;
        self.device.read_burst_async(PATABLE, &mut patable).await?;

        let bank = self.configurator.bank_mut();
        *bank.registers_mut() = registers;
        *bank.patable_mut() = patable;
        self.synchronized = true;
        Ok(())
    }

    /// Asynchronously writes the mirror to the chip.
    ///
    /// This is the async version of [`push_configuration`](Cc1101::push_configuration).
    pub async fn push_configuration_async(&mut self) -> Result<(), Error> {
        let bank = self.configurator.bank();
        self.device.write_burst_async(IOCFG2, bank.registers()).await?;
        self.device.write_burst_async(PATABLE, bank.patable()).await?;
        self.synchronized = true;
        Ok(())
    }

    /// Asynchronously sends SIDLE.
    ///
    /// This is the async version of [`set_idle`](Cc1101::set_idle).
    pub async fn set_idle_async(&mut self) -> Result<(), Error> {
        info!("Setting device to IDLE state");
        self.device.strobe_async(Strobe::Idle).await?;
        Ok(())
    }
}
