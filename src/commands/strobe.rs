/// Command strobe addresses
///
/// See table 42 of the datasheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Strobe {
    /// SRES: reset the chip
    Reset = 0x30,
    /// SFSTXON: enable and calibrate the frequency synthesizer
    FrequencySynthesizerOn = 0x31,
    /// SXOFF: turn off the crystal oscillator
    CrystalOff = 0x32,
    /// SCAL: calibrate the frequency synthesizer and turn it off
    Calibrate = 0x33,
    /// SRX: enable RX
    Receive = 0x34,
    /// STX: enable TX
    Transmit = 0x35,
    /// SIDLE: exit RX/TX and turn off the frequency synthesizer
    Idle = 0x36,
    /// SWOR: start automatic RX polling sequence (Wake-on-Radio)
    WakeOnRadio = 0x38,
    /// SPWD: enter power down mode when CSn goes high
    PowerDown = 0x39,
    /// SFRX: flush the RX FIFO
    FlushRx = 0x3A,
    /// SFTX: flush the TX FIFO
    FlushTx = 0x3B,
    /// SWORRST: reset the real time clock to Event1
    ResetWakeOnRadioTimer = 0x3C,
    /// SNOP: no operation, returns the status byte
    NoOperation = 0x3D,
}

impl Strobe {
    pub const fn address(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Strobe {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0x30 => Self::Reset,
            0x31 => Self::FrequencySynthesizerOn,
            0x32 => Self::CrystalOff,
            0x33 => Self::Calibrate,
            0x34 => Self::Receive,
            0x35 => Self::Transmit,
            0x36 => Self::Idle,
            0x38 => Self::WakeOnRadio,
            0x39 => Self::PowerDown,
            0x3A => Self::FlushRx,
            0x3B => Self::FlushTx,
            0x3C => Self::ResetWakeOnRadioTimer,
            0x3D => Self::NoOperation,
            other => return Err(other),
        })
    }
}
