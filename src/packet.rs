//! Packet transmission and reception
//!
//! A transmit or receive call walks the chip through
//! IDLE → flush → TX/RX → IDLE and is not resumable. The packet format selected in
//! PKTCTRL0 decides the data path:
//!
//! | Format      | Transmit                          | Receive                              |
//! |-------------|-----------------------------------|--------------------------------------|
//! | Normal      | TX FIFO, chunked with flow control| RX FIFO, drained while GDO0 is high  |
//! | SyncSerial  | clocked serial write              | clocked serial read                  |
//! | Random      | nothing                           | nothing                              |
//! | AsyncSerial | asynchronous serial write         | edge capture on the data line        |
//!
//! A receive that sees no packet start within its timeout returns `Ok(None)`.

use alloc::vec::Vec;

use embedded_hal::delay::DelayNs;
use log::{debug, info, warn};

use crate::configurator::{
    Gdo, PacketFormat, PacketLengthMode, GDO_ASYNC_SERIAL_DATA, GDO_CARRIER_SENSE, GDO_SYNC_WORD,
};
use crate::pins::{Edge, Level, RadioPins, Trigger};
use crate::radio::Cc1101;
use crate::registers::{rssi_to_dbm, MarcState, FIFO, FIFO_SIZE};
use crate::signal;
use crate::Error;

/// Status bytes appended to a received packet when PKTCTRL1.APPEND_STATUS is set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkStatus {
    /// Raw RSSI byte
    pub rssi: u8,
    /// Link quality indicator (7 bits)
    pub lqi: u8,
    /// CRC of the packet matched
    pub crc_ok: bool,
}

impl LinkStatus {
    pub fn rssi_dbm(&self) -> f32 {
        rssi_to_dbm(self.rssi)
    }
}

/// Packet received through the RX FIFO
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalPacket {
    pub payload: Vec<u8>,
    /// Declared length: the length byte in variable mode, the byte count otherwise.
    /// Reduced by two when status bytes were appended, in both modes.
    pub length: usize,
    pub status: Option<LinkStatus>,
}

/// Bits sampled in synchronous serial mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncPacket {
    /// One entry per bit, 0 or 1
    pub bits: Vec<u8>,
}

/// Edges captured in asynchronous serial mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPacket {
    /// Start of the capture in microseconds, on the pin implementation's clock
    pub start: u64,
    /// Length of the capture window in microseconds
    pub duration: u64,
    /// Captured edges, timestamps relative to `start`
    pub edges: Vec<Edge>,
}

impl RawPacket {
    /// Bitstream using a bit period estimated from the pulses themselves
    ///
    /// # Errors
    /// * `Error::InsufficientData` - fewer than 21 edges were captured
    pub fn bitstream(&self) -> Result<Vec<u8>, Error> {
        let period = signal::estimate_bit_period(&self.edges)?;
        Ok(signal::reconstruct(&self.edges, &period))
    }

    /// Bitstream using the nominal bit period of `baud`.
    ///
    /// Yields an empty stream for a zero baud rate.
    pub fn bitstream_at(&self, baud: u32) -> Vec<u8> {
        if baud == 0 {
            return Vec::new();
        }
        let period = signal::BitPeriod::uniform(1_000_000, baud as u64);
        signal::reconstruct(&self.edges, &period)
    }
}

/// Result of a successful receive, one variant per packet format
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceivedPacket {
    Normal(NormalPacket),
    SyncSerial(SyncPacket),
    Raw(RawPacket),
}

impl<SPI, PINS, DELAY> Cc1101<SPI, PINS, DELAY>
where
    SPI: embedded_hal::spi::SpiDevice,
    PINS: RadioPins,
    DELAY: DelayNs,
{
    /// Transmits `data` in the configured packet format.
    ///
    /// In variable length mode the length byte is prepended here. With `blocking`
    /// set and GDO0 connected, waits for the end-of-transmission edge in normal
    /// mode. The chip is back in IDLE when this returns, unless the state check
    /// failed.
    ///
    /// # Errors
    /// * `Error::LengthMismatch` - fixed length mode and `data` is not PKTLEN long
    /// * `Error::LengthExceeded` - variable length mode and `data` is longer than PKTLEN
    /// * `Error::InvalidState` - the chip is not in IDLE
    /// * `Error::PinUnavailable` - a serial format needs a GDO pin that is not connected
    /// * `Error::TxFifoStalled` - the TX FIFO did not drain in time
    pub fn transmit(&mut self, data: &[u8], blocking: bool) -> Result<(), Error> {
        info!("Transmitting {} bytes", data.len());
        let format = self.configurator.packet_format();
        let frame = self.frame(data)?;

        self.expect_state(&[MarcState::Idle])?;

        let baud = self.configurator.data_rate_baud();
        match format {
            PacketFormat::Random => {
                debug!("Random packet format, nothing to transmit");
                return Ok(());
            }
            PacketFormat::SyncSerial => {
                self.require_connected(Gdo::Gdo2)?;
                self.require_connected(Gdo::Gdo0)?;
            }
            PacketFormat::AsyncSerial => self.require_connected(Gdo::Gdo0)?,
            PacketFormat::Normal => {}
        }

        self.flush_tx_fifo()?;
        self.set_transmit()?;

        let result = match format {
            PacketFormat::Normal => self.transmit_fifo(&frame, blocking),
            PacketFormat::SyncSerial => self
                .pins
                .synchronous_serial_write(Gdo::Gdo2, Gdo::Gdo0, &frame, baud)
                .map_err(Error::pin),
            PacketFormat::AsyncSerial => self
                .pins
                .asynchronous_serial_write(Gdo::Gdo0, baud, &frame)
                .map_err(Error::pin),
            PacketFormat::Random => Ok(()),
        };

        let idle = self.set_idle();
        result?;
        idle
    }

    /// Receives one packet in the configured packet format.
    ///
    /// # Returns
    /// `None` when no packet started within `timeout_ms`
    ///
    /// # Errors
    /// * `Error::InvalidState` - the chip is neither in IDLE nor in RX; nothing
    ///   else is touched in that case
    /// * `Error::PinNotConfigured` - the GDO functions do not match the format
    /// * `Error::PinUnavailable` - a required GDO pin is not connected
    /// * `Error::RxDrainTimeout` - GDO0 stayed asserted for longer than
    ///   `rx_drain_timeout_ms` after the packet started
    pub fn receive(&mut self, timeout_ms: u32) -> Result<Option<ReceivedPacket>, Error> {
        info!("Receiving data");
        let state = self.expect_state(&[MarcState::Idle, MarcState::Rx])?;
        let format = self.configurator.packet_format();

        match format {
            PacketFormat::Normal => {
                self.require_gdo_config(Gdo::Gdo0, GDO_SYNC_WORD)?;
                self.require_connected(Gdo::Gdo0)?;
            }
            PacketFormat::SyncSerial => {
                self.require_connected(Gdo::Gdo2)?;
                self.require_connected(Gdo::Gdo0)?;
            }
            PacketFormat::AsyncSerial => {
                self.require_gdo_config(Gdo::Gdo0, GDO_CARRIER_SENSE)?;
                self.require_gdo_config(Gdo::Gdo2, GDO_ASYNC_SERIAL_DATA)?;
                self.require_connected(Gdo::Gdo0)?;
                self.require_connected(Gdo::Gdo2)?;
            }
            PacketFormat::Random => {}
        }

        self.flush_rx_fifo()?;
        if state != MarcState::Rx {
            self.set_receive()?;
        }

        let result = match format {
            PacketFormat::Normal => self.receive_fifo(timeout_ms),
            PacketFormat::SyncSerial => self.receive_sync_serial(timeout_ms),
            PacketFormat::AsyncSerial => self.receive_async_serial(timeout_ms),
            PacketFormat::Random => Ok(None),
        };

        let idle = self.set_idle();
        let packet = result?;
        idle?;
        Ok(packet)
    }

    /// Checks `data` against the length configuration and prepends the length
    /// byte in variable mode
    fn frame(&self, data: &[u8]) -> Result<Vec<u8>, Error> {
        let max = self.configurator.packet_length() as usize;
        match self.configurator.packet_length_mode()? {
            PacketLengthMode::Fixed => {
                if data.len() != max {
                    return Err(Error::LengthMismatch {
                        expected: max,
                        actual: data.len(),
                    });
                }
                Ok(data.to_vec())
            }
            PacketLengthMode::Variable => {
                if data.len() > max {
                    return Err(Error::LengthExceeded {
                        max,
                        actual: data.len(),
                    });
                }
                let mut frame = Vec::with_capacity(data.len() + 1);
                frame.push(data.len() as u8);
                frame.extend_from_slice(data);
                Ok(frame)
            }
            PacketLengthMode::Infinite => Ok(data.to_vec()),
        }
    }

    fn transmit_fifo(&mut self, frame: &[u8], blocking: bool) -> Result<(), Error> {
        let chunk_size = self.config.chunk_size.clamp(1, FIFO_SIZE - 1);
        for chunk in frame.chunks(chunk_size) {
            self.wait_for_tx_space(FIFO_SIZE - chunk_size)?;
            self.device.write_burst(FIFO, chunk)?;
        }

        if blocking && self.pins.is_connected(Gdo::Gdo0) {
            self.pins.set_input(Gdo::Gdo0).map_err(Error::pin)?;
            let edge = self.pins.wait_for_edge(
                Gdo::Gdo0,
                Trigger::Falling,
                self.config.end_of_transmission_timeout_ms,
            );
            let released = self.pins.release(Gdo::Gdo0);
            if edge.map_err(Error::pin)?.is_none() {
                warn!("Timeout waiting for end of transmission");
            }
            released.map_err(Error::pin)?;
        }
        Ok(())
    }

    /// Polls TXBYTES until fewer than `threshold` bytes are queued
    fn wait_for_tx_space(&mut self, threshold: usize) -> Result<(), Error> {
        let interval = self.config.fifo_poll_interval_ms.max(1);
        let mut waited = 0;
        loop {
            if (self.tx_bytes()?.count as usize) < threshold {
                return Ok(());
            }
            if waited >= self.config.tx_fifo_timeout_ms {
                return Err(Error::TxFifoStalled);
            }
            self.delay.delay_ms(interval);
            waited += interval;
        }
    }

    fn receive_fifo(&mut self, timeout_ms: u32) -> Result<Option<ReceivedPacket>, Error> {
        self.pins.set_input(Gdo::Gdo0).map_err(Error::pin)?;
        let data = self.capture_fifo(timeout_ms);
        let released = self.pins.release(Gdo::Gdo0);

        let data = data?;
        released.map_err(Error::pin)?;
        match data {
            Some(data) => self.parse_fifo_data(data),
            None => Ok(None),
        }
    }

    /// Waits for the sync word and drains the packet, GDO0 must already be an input
    fn capture_fifo(&mut self, timeout_ms: u32) -> Result<Option<Vec<u8>>, Error> {
        let started = self
            .pins
            .wait_for_edge(Gdo::Gdo0, Trigger::Rising, timeout_ms)
            .map_err(Error::pin)?;
        if started.is_none() {
            warn!("Timeout waiting for start of reception");
            return Ok(None);
        }
        self.drain_rx_fifo().map(Some)
    }

    /// Reads the RX FIFO while GDO0 stays asserted, leaving one byte behind per
    /// read as the datasheet requires, then reads the remainder.
    ///
    /// The pause between reads doubles while the FIFO stays empty, up to
    /// `max_poll_interval_ms`. A packet still running after `rx_drain_timeout_ms`
    /// is abandoned with `Error::RxDrainTimeout` rather than returned cut short.
    fn drain_rx_fifo(&mut self) -> Result<Vec<u8>, Error> {
        let base = self.config.fifo_poll_interval_ms.max(1);
        let ceiling = self.config.max_poll_interval_ms.max(base);
        let budget = self.config.rx_drain_timeout_ms;
        let mut interval = base;
        let mut elapsed = 0u32;
        let mut data = Vec::new();

        loop {
            let edge = self
                .pins
                .wait_for_edge(Gdo::Gdo0, Trigger::Falling, interval)
                .map_err(Error::pin)?;
            if edge.is_some() || self.pins.level(Gdo::Gdo0).map_err(Error::pin)? == Level::Low {
                break;
            }
            elapsed = elapsed.saturating_add(interval);

            let available = self.rx_bytes()?.count as usize;
            if available > 1 {
                self.read_fifo(available - 1, &mut data)?;
                interval = base;
            } else {
                interval = (interval * 2).min(ceiling);
            }

            if elapsed > budget {
                warn!(
                    "Packet did not end within {} ms, {} bytes read",
                    budget,
                    data.len()
                );
                return Err(Error::RxDrainTimeout);
            }
        }

        let remaining = self.rx_bytes()?.count as usize;
        self.read_fifo(remaining, &mut data)?;
        Ok(data)
    }

    fn read_fifo(&mut self, count: usize, data: &mut Vec<u8>) -> Result<(), Error> {
        if count == 0 {
            return Ok(());
        }
        let start = data.len();
        data.resize(start + count, 0);
        self.device.read_burst(FIFO, &mut data[start..])
    }

    fn parse_fifo_data(&self, mut data: Vec<u8>) -> Result<Option<ReceivedPacket>, Error> {
        let mode = self.configurator.packet_length_mode()?;
        let mut length = match mode {
            PacketLengthMode::Variable => {
                if data.is_empty() {
                    warn!("Received an empty packet");
                    return Ok(None);
                }
                data.remove(0) as usize
            }
            _ => data.len(),
        };

        let mut status = None;
        let status_appended = self.configurator.append_status_enabled()
            && matches!(mode, PacketLengthMode::Fixed | PacketLengthMode::Variable);
        if status_appended && data.len() >= 2 {
            let lqi = data[data.len() - 1];
            let rssi = data[data.len() - 2];
            data.truncate(data.len() - 2);
            length = length.saturating_sub(2);
            status = Some(LinkStatus {
                rssi,
                lqi: lqi & 0x7F,
                crc_ok: lqi & 0x80 != 0,
            });
        }

        debug!("Received {} bytes, status {:?}", data.len(), status);
        Ok(Some(ReceivedPacket::Normal(NormalPacket {
            payload: data,
            length,
            status,
        })))
    }

    fn receive_sync_serial(&mut self, timeout_ms: u32) -> Result<Option<ReceivedPacket>, Error> {
        self.delay.delay_ms(self.config.sync_serial_settle_ms);
        let bits = self
            .pins
            .synchronous_serial_read(Gdo::Gdo2, Gdo::Gdo0, timeout_ms)
            .map_err(Error::pin)?;
        if bits.is_empty() {
            warn!("Timeout waiting for synchronous serial data");
            return Ok(None);
        }
        Ok(Some(ReceivedPacket::SyncSerial(SyncPacket { bits })))
    }

    fn receive_async_serial(&mut self, timeout_ms: u32) -> Result<Option<ReceivedPacket>, Error> {
        let capture = self
            .pins
            .asynchronous_serial_read(Gdo::Gdo0, Gdo::Gdo2, timeout_ms)
            .map_err(Error::pin)?;
        let Some(capture) = capture else {
            warn!("Timeout waiting for carrier");
            return Ok(None);
        };

        let edges = capture
            .edges
            .iter()
            .map(|edge| Edge::new(edge.level, edge.timestamp.saturating_sub(capture.start)))
            .collect();
        Ok(Some(ReceivedPacket::Raw(RawPacket {
            start: capture.start,
            duration: capture.end.saturating_sub(capture.start),
            edges,
        })))
    }

    fn require_connected(&self, pin: Gdo) -> Result<(), Error> {
        if !self.pins.is_connected(pin) {
            return Err(Error::PinUnavailable(pin));
        }
        Ok(())
    }

    fn require_gdo_config(&self, pin: Gdo, required: u8) -> Result<(), Error> {
        let actual = self.configurator.gdo_config(pin);
        if actual != required {
            return Err(Error::PinNotConfigured {
                pin,
                required,
                actual,
            });
        }
        Ok(())
    }
}
