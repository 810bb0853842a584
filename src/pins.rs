//! GDO pin and serial transport
//!
//! Besides the SPI bus, the CC1101 talks to the host through up to three general
//! digital output pins (GDO0..GDO2). Depending on the packet format they carry
//! sync word detection, carrier sense, or a serial clock and data signal.
//!
//! [`RadioPins`] is the host side of those lines: edge waits with a timeout,
//! level reads, and the bit-banged serial primitives used by the synchronous and
//! asynchronous serial packet formats. Its error type follows the embedded-hal
//! digital conventions.

use alloc::vec::Vec;
use core::convert::Infallible;

use crate::configurator::Gdo;

/// Logic level of a GDO line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Low = 0,
    High = 1,
}

impl Level {
    /// Level as a bit value (0 or 1)
    pub const fn bit(self) -> u8 {
        self as u8
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Self::High
        } else {
            Self::Low
        }
    }
}

impl core::ops::Not for Level {
    type Output = Self;

    fn not(self) -> Self {
        match self {
            Self::Low => Self::High,
            Self::High => Self::Low,
        }
    }
}

/// Edge direction to wait for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Trigger {
    Rising,
    Falling,
}

/// A single transition captured on a data line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Edge {
    /// Level after the transition
    pub level: Level,
    /// Time of the transition in microseconds
    pub timestamp: u64,
}

impl Edge {
    pub const fn new(level: Level, timestamp: u64) -> Self {
        Self { level, timestamp }
    }
}

/// Result of an asynchronous serial capture
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Capture {
    /// Start of the capture window in microseconds
    pub start: u64,
    /// End of the capture window in microseconds
    pub end: u64,
    /// Transitions seen on the data line, chronologically ordered
    pub edges: Vec<Edge>,
}

/// Host side of the GDO lines.
///
/// Timeouts are in milliseconds, edge timestamps in microseconds on a clock of the
/// implementation's choosing.
///
/// # Important Notes
/// - A pin that is not wired to the host must report `false` from
///   [`is_connected`](RadioPins::is_connected); the packet engine checks this before
///   it touches the radio
/// - The serial primitives must honour the configured baud rate, the chip samples
///   the data line on its own clock in asynchronous mode
pub trait RadioPins: embedded_hal::digital::ErrorType {
    /// Whether `pin` is wired to the host
    fn is_connected(&self, pin: Gdo) -> bool;

    /// Configures `pin` as an input
    fn set_input(&mut self, pin: Gdo) -> Result<(), Self::Error>;

    /// Releases any resources held for `pin` (edge detection, direction)
    fn release(&mut self, pin: Gdo) -> Result<(), Self::Error>;

    /// Current level of `pin`
    fn level(&mut self, pin: Gdo) -> Result<Level, Self::Error>;

    /// Blocks until `trigger` is seen on `pin` or `timeout_ms` elapses.
    ///
    /// # Returns
    /// The level after the edge, or `None` on timeout
    fn wait_for_edge(
        &mut self,
        pin: Gdo,
        trigger: Trigger,
        timeout_ms: u32,
    ) -> Result<Option<Level>, Self::Error>;

    /// Shifts `bytes` out MSB first on `data`, clocked by the chip on `clock`
    fn synchronous_serial_write(
        &mut self,
        clock: Gdo,
        data: Gdo,
        bytes: &[u8],
        baud: u32,
    ) -> Result<(), Self::Error>;

    /// Samples `data` on every `clock` edge until `timeout_ms` elapses.
    ///
    /// # Returns
    /// One entry per sampled bit, each 0 or 1
    fn synchronous_serial_read(
        &mut self,
        clock: Gdo,
        data: Gdo,
        timeout_ms: u32,
    ) -> Result<Vec<u8>, Self::Error>;

    /// Drives `data` with `bytes` MSB first at `baud`
    fn asynchronous_serial_write(
        &mut self,
        data: Gdo,
        baud: u32,
        bytes: &[u8],
    ) -> Result<(), Self::Error>;

    /// Records transitions on `data` while `threshold` (carrier sense) is asserted.
    ///
    /// # Returns
    /// The capture, or `None` when no carrier showed up before `timeout_ms`
    fn asynchronous_serial_read(
        &mut self,
        threshold: Gdo,
        data: Gdo,
        timeout_ms: u32,
    ) -> Result<Option<Capture>, Self::Error>;
}

/// Pin set for boards that only wire up the SPI bus.
///
/// Every pin reports as unconnected, so only FIFO transmissions without the
/// blocking end-of-transmission wait are possible.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPins;

impl embedded_hal::digital::ErrorType for NoPins {
    type Error = Infallible;
}

impl RadioPins for NoPins {
    fn is_connected(&self, _pin: Gdo) -> bool {
        false
    }

    fn set_input(&mut self, _pin: Gdo) -> Result<(), Self::Error> {
        Ok(())
    }

    fn release(&mut self, _pin: Gdo) -> Result<(), Self::Error> {
        Ok(())
    }

    fn level(&mut self, _pin: Gdo) -> Result<Level, Self::Error> {
        Ok(Level::Low)
    }

    fn wait_for_edge(
        &mut self,
        _pin: Gdo,
        _trigger: Trigger,
        _timeout_ms: u32,
    ) -> Result<Option<Level>, Self::Error> {
        Ok(None)
    }

    fn synchronous_serial_write(
        &mut self,
        _clock: Gdo,
        _data: Gdo,
        _bytes: &[u8],
        _baud: u32,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    fn synchronous_serial_read(
        &mut self,
        _clock: Gdo,
        _data: Gdo,
        _timeout_ms: u32,
    ) -> Result<Vec<u8>, Self::Error> {
        Ok(Vec::new())
    }

    fn asynchronous_serial_write(
        &mut self,
        _data: Gdo,
        _baud: u32,
        _bytes: &[u8],
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    fn asynchronous_serial_read(
        &mut self,
        _threshold: Gdo,
        _data: Gdo,
        _timeout_ms: u32,
    ) -> Result<Option<Capture>, Self::Error> {
        Ok(None)
    }
}
