//! Status registers
//!
//! Read-only registers at addresses 0x30..=0x3D. They share their addresses with
//! the command strobes and are only reachable with the burst bit set, which the
//! device layer takes care of.
//!
//! Every register here implements [`StatusRegister`] so it can be fetched with
//! [`Device::read_register`](crate::Device::read_register).

use bitflags::bitflags;

use crate::Error;

/// A typed read-only status register
pub trait StatusRegister: Sized {
    /// Register address (0x30..=0x3D)
    const ADDRESS: u8;

    /// Decodes the raw register byte
    fn from_byte(byte: u8) -> Result<Self, Error>;
}

pub const PARTNUM: u8 = 0x30;
pub const VERSION: u8 = 0x31;
pub const FREQEST: u8 = 0x32;
pub const LQI: u8 = 0x33;
pub const RSSI: u8 = 0x34;
pub const MARCSTATE: u8 = 0x35;
pub const WORTIME1: u8 = 0x36;
pub const WORTIME0: u8 = 0x37;
pub const PKTSTATUS: u8 = 0x38;
pub const VCO_VC_DAC: u8 = 0x39;
pub const TXBYTES: u8 = 0x3A;
pub const RXBYTES: u8 = 0x3B;
pub const RCCTRL1_STATUS: u8 = 0x3C;
pub const RCCTRL0_STATUS: u8 = 0x3D;

/// Main radio control state machine state (address: 0x35)
///
/// See table 32 of the datasheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MarcState {
    Sleep = 0x00,
    Idle = 0x01,
    Xoff = 0x02,
    VcoonMc = 0x03,
    RegonMc = 0x04,
    Mancal = 0x05,
    Vcoon = 0x06,
    Regon = 0x07,
    Startcal = 0x08,
    Bwboost = 0x09,
    FsLock = 0x0A,
    Ifadcon = 0x0B,
    Endcal = 0x0C,
    Rx = 0x0D,
    RxEnd = 0x0E,
    RxRst = 0x0F,
    TxrxSwitch = 0x10,
    RxfifoOverflow = 0x11,
    Fstxon = 0x12,
    Tx = 0x13,
    TxEnd = 0x14,
    RxtxSwitch = 0x15,
    TxfifoUnderflow = 0x16,
}

impl TryFrom<u8> for MarcState {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value & 0x1F {
            0x00 => Self::Sleep,
            0x01 => Self::Idle,
            0x02 => Self::Xoff,
            0x03 => Self::VcoonMc,
            0x04 => Self::RegonMc,
            0x05 => Self::Mancal,
            0x06 => Self::Vcoon,
            0x07 => Self::Regon,
            0x08 => Self::Startcal,
            0x09 => Self::Bwboost,
            0x0A => Self::FsLock,
            0x0B => Self::Ifadcon,
            0x0C => Self::Endcal,
            0x0D => Self::Rx,
            0x0E => Self::RxEnd,
            0x0F => Self::RxRst,
            0x10 => Self::TxrxSwitch,
            0x11 => Self::RxfifoOverflow,
            0x12 => Self::Fstxon,
            0x13 => Self::Tx,
            0x14 => Self::TxEnd,
            0x15 => Self::RxtxSwitch,
            0x16 => Self::TxfifoUnderflow,
            other => return Err(Error::UnknownState(other)),
        })
    }
}

impl StatusRegister for MarcState {
    const ADDRESS: u8 = MARCSTATE;

    fn from_byte(byte: u8) -> Result<Self, Error> {
        Self::try_from(byte)
    }
}

/// Chip part number (address: 0x30)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PartNum(pub u8);

impl PartNum {
    /// Part number reported by every CC1101
    pub const CC1101: Self = Self(0x00);
}

impl StatusRegister for PartNum {
    const ADDRESS: u8 = PARTNUM;

    fn from_byte(byte: u8) -> Result<Self, Error> {
        Ok(Self(byte))
    }
}

/// Chip version number (address: 0x31)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Version(pub u8);

impl Version {
    /// Silicon revisions known to ship as CC1101
    pub const KNOWN: [u8; 2] = [0x04, 0x14];

    pub fn is_known(&self) -> bool {
        Self::KNOWN.contains(&self.0)
    }
}

impl StatusRegister for Version {
    const ADDRESS: u8 = VERSION;

    fn from_byte(byte: u8) -> Result<Self, Error> {
        Ok(Self(byte))
    }
}

/// Received signal strength indicator (address: 0x34)
///
/// # Important Notes
/// - Only meaningful while the receiver is running
/// - The raw value is a two's complement number in half-dB steps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rssi(pub u8);

impl Rssi {
    /// RSSI offset for the default data rates, see table 31 of the datasheet
    pub const OFFSET_DB: f32 = 74.0;

    /// Converts the raw reading to dBm
    pub fn dbm(&self) -> f32 {
        rssi_to_dbm(self.0)
    }
}

impl StatusRegister for Rssi {
    const ADDRESS: u8 = RSSI;

    fn from_byte(byte: u8) -> Result<Self, Error> {
        Ok(Self(byte))
    }
}

/// Converts a raw RSSI byte (status register or appended status) to dBm
pub fn rssi_to_dbm(raw: u8) -> f32 {
    (raw as i8) as f32 / 2.0 - Rssi::OFFSET_DB
}

/// Link quality indicator and CRC result of the last packet (address: 0x33)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Lqi {
    pub crc_ok: bool,
    pub lqi: u8,
}

impl StatusRegister for Lqi {
    const ADDRESS: u8 = LQI;

    fn from_byte(byte: u8) -> Result<Self, Error> {
        Ok(Self {
            crc_ok: byte & 0x80 != 0,
            lqi: byte & 0x7F,
        })
    }
}

bitflags! {
    /// Current GDOx status and packet status (address: 0x38)
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PacketStatus: u8 {
        /// Last CRC comparison matched
        const CRC_OK = 1 << 7;
        /// Carrier sense
        const CS = 1 << 6;
        /// Preamble quality reached
        const PQT_REACHED = 1 << 5;
        /// Channel is clear
        const CCA = 1 << 4;
        /// Start of frame delimiter found
        const SFD = 1 << 3;
        /// Current GDO2 value
        const GDO2 = 1 << 2;
        /// Current GDO0 value
        const GDO0 = 1 << 0;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for PacketStatus {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "PacketStatus({=u8:#x})", self.bits())
    }
}

impl StatusRegister for PacketStatus {
    const ADDRESS: u8 = PKTSTATUS;

    fn from_byte(byte: u8) -> Result<Self, Error> {
        Ok(Self::from_bits_retain(byte))
    }
}

/// Number of bytes in the TX FIFO (address: 0x3A)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TxBytes {
    pub underflow: bool,
    pub count: u8,
}

impl StatusRegister for TxBytes {
    const ADDRESS: u8 = TXBYTES;

    fn from_byte(byte: u8) -> Result<Self, Error> {
        Ok(Self {
            underflow: byte & 0x80 != 0,
            count: byte & 0x7F,
        })
    }
}

/// Number of bytes in the RX FIFO (address: 0x3B)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RxBytes {
    pub overflow: bool,
    pub count: u8,
}

impl StatusRegister for RxBytes {
    const ADDRESS: u8 = RXBYTES;

    fn from_byte(byte: u8) -> Result<Self, Error> {
        Ok(Self {
            overflow: byte & 0x80 != 0,
            count: byte & 0x7F,
        })
    }
}

/// Chip state reported in the status byte returned by every strobe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChipState {
    Idle = 0,
    Rx = 1,
    Tx = 2,
    Fstxon = 3,
    Calibrate = 4,
    Settling = 5,
    RxFifoOverflow = 6,
    TxFifoUnderflow = 7,
}

/// Status byte clocked out on MISO during the header byte
///
/// See section 10.1 of the datasheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChipStatus {
    /// Crystal is running and the chip accepts commands
    pub ready: bool,
    pub state: ChipState,
    /// Free TX FIFO bytes (writes) or available RX FIFO bytes (reads), saturating at 15
    pub fifo_bytes: u8,
}

impl From<u8> for ChipStatus {
    fn from(byte: u8) -> Self {
        let state = match (byte >> 4) & 0x07 {
            0 => ChipState::Idle,
            1 => ChipState::Rx,
            2 => ChipState::Tx,
            3 => ChipState::Fstxon,
            4 => ChipState::Calibrate,
            5 => ChipState::Settling,
            6 => ChipState::RxFifoOverflow,
            _ => ChipState::TxFifoUnderflow,
        };
        Self {
            ready: byte & 0x80 == 0,
            state,
            fifo_bytes: byte & 0x0F,
        }
    }
}
