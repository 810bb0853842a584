//! Driver error type
//!
//! Every fallible operation in the crate returns [`Error`]. Transport failures are
//! reduced to their embedded-hal error kind so the error stays independent of the
//! SPI and GPIO implementations in use.
//!
//! Two outcomes are deliberately *not* errors:
//! - a receive that times out before a packet starts returns `Ok(None)`
//! - a line-code decode that cannot frame its input returns `None`

use crate::configurator::Gdo;
use crate::registers::MarcState;

/// Errors reported by the CC1101 driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The SPI transaction with the radio failed
    #[error("SPI transfer failed: {0}")]
    Spi(embedded_hal::spi::ErrorKind),

    /// A GPIO or serial pin primitive failed
    #[error("pin access failed: {0}")]
    Pin(embedded_hal::digital::ErrorKind),

    /// The radio is not in a state that allows the requested operation
    #[error("device must be in state {required:?}, but is in {actual:?}")]
    InvalidState {
        /// States in which the operation is allowed
        required: &'static [MarcState],
        /// State reported by the MARCSTATE register
        actual: MarcState,
    },

    /// A value does not fit the register field it is destined for
    #[error("value {value} is out of range for {field}")]
    OutOfRange {
        /// Name of the register field
        field: &'static str,
        /// Rejected value
        value: u32,
    },

    /// A register field holds a value the datasheet marks as reserved
    #[error("{field} holds reserved value {value}")]
    ReservedValue {
        /// Name of the register field
        field: &'static str,
        /// Raw field value
        value: u8,
    },

    /// Fixed length mode requires the payload to match PKTLEN exactly
    #[error("payload length {actual} does not match fixed packet length {expected}")]
    LengthMismatch {
        /// Configured packet length
        expected: usize,
        /// Length of the supplied payload
        actual: usize,
    },

    /// Variable length mode requires the payload to fit PKTLEN
    #[error("payload length {actual} exceeds maximum packet length {max}")]
    LengthExceeded {
        /// Configured maximum packet length
        max: usize,
        /// Length of the supplied payload
        actual: usize,
    },

    /// The PATABLE accepts between one and eight entries
    #[error("PATABLE must hold 1 to 8 entries, got {0}")]
    InvalidPatable(usize),

    /// A GDO pin is not configured for the function the packet format needs
    #[error("{pin:?} must be configured as 0x{required:02X}, found 0x{actual:02X}")]
    PinNotConfigured {
        /// Pin whose configuration was checked
        pin: Gdo,
        /// Required IOCFGx signal selection
        required: u8,
        /// Current IOCFGx signal selection
        actual: u8,
    },

    /// The packet format needs a GDO pin that is not wired to the host
    #[error("{0:?} is not connected to the host")]
    PinUnavailable(Gdo),

    /// MARCSTATE returned a value outside the documented state list
    #[error("unknown MARC state 0x{0:02X}")]
    UnknownState(u8),

    /// Not enough edges to estimate a bit period
    #[error("need at least {needed} edges, got {got}")]
    InsufficientData {
        /// Minimum number of edges required
        needed: usize,
        /// Number of edges supplied
        got: usize,
    },

    /// The TX FIFO did not drain below the chunk threshold in time
    #[error("TX FIFO did not drain in time")]
    TxFifoStalled,

    /// GDO0 stayed asserted past the RX drain budget, the packet was discarded
    #[error("packet did not end in time")]
    RxDrainTimeout,
}

impl Error {
    pub(crate) fn spi<E: embedded_hal::spi::Error>(err: E) -> Self {
        Self::Spi(err.kind())
    }

    pub(crate) fn pin<E: embedded_hal::digital::Error>(err: E) -> Self {
        Self::Pin(err.kind())
    }
}
