//! Register presets
//!
//! A preset is a complete snapshot of the configuration registers and the PATABLE,
//! exported from SmartRF Studio or hand tuned for a specific link. Presets are
//! always loaded wholesale, see [`Cc1101::load_preset`](crate::Cc1101::load_preset).
//!
//! Register order is IOCFG2..=TEST0:
//!
//! ```text
//! IOCFG2   IOCFG1   IOCFG0   FIFOTHR  SYNC1    SYNC0    PKTLEN   PKTCTRL1
//! PKTCTRL0 ADDR     CHANNR   FSCTRL1  FSCTRL0  FREQ2    FREQ1    FREQ0
//! MDMCFG4  MDMCFG3  MDMCFG2  MDMCFG1  MDMCFG0  DEVIATN  MCSM2    MCSM1
//! MCSM0    FOCCFG   BSCFG    AGCCTRL2 AGCCTRL1 AGCCTRL0 WOREVT1  WOREVT0
//! WORCTRL  FREND1   FREND0   FSCAL3   FSCAL2   FSCAL1   FSCAL0   RCCTRL1
//! RCCTRL0  FSTEST   PTEST    AGCTEST  TEST2    TEST1    TEST0
//! ```

use crate::registers::{CONFIG_REGISTER_COUNT, PATABLE_SIZE};

/// Named register snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Preset {
    pub name: &'static str,
    pub registers: [u8; CONFIG_REGISTER_COUNT],
    pub patable: [u8; PATABLE_SIZE],
}

/// 2-FSK, 1.2 kBaud, 5.2 kHz deviation, 58 kHz RX bandwidth, optimized for sensitivity
pub const DR1K2_DEV5K2_2FSK_RXBW58K_SENS: Preset = Preset {
    name: "2FSK, DataRate 1.2kBaud, RXBW 58k, Sensitivity",
    registers: [
        0x29, 0x2E, 0x06, 0x07, 0xD3, 0x91, 0xFF, 0x04,
        0x05, 0x00, 0x00, 0x06, 0x00, 0x10, 0xB0, 0x71,
        0xF5, 0x83, 0x03, 0x22, 0xF8, 0x15, 0x07, 0x30,
        0x18, 0x16, 0x6C, 0x03, 0x40, 0x91, 0x87, 0x6B,
        0xF8, 0x56, 0x10, 0xE9, 0x2A, 0x00, 0x1F, 0x41,
        0x00, 0x59, 0x7F, 0x3F, 0x81, 0x35, 0x09,
    ],
    patable: [0x8E, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
};

/// Same as [`DR1K2_DEV5K2_2FSK_RXBW58K_SENS`] but tuned to 868 MHz
pub const SAMPLE_1: Preset = Preset {
    name: "Sample 1, for Testing",
    registers: [
        0x29, 0x2E, 0x06, 0x07, 0xD3, 0x91, 0xFF, 0x04,
        0x05, 0x00, 0x00, 0x06, 0x00, 0x21, 0x62, 0x76,
        0xF5, 0x83, 0x03, 0x22, 0xF8, 0x15, 0x07, 0x30,
        0x18, 0x16, 0x6C, 0x03, 0x40, 0x91, 0x87, 0x6B,
        0xF8, 0x56, 0x10, 0xE9, 0x2A, 0x00, 0x1F, 0x41,
        0x00, 0x59, 0x7F, 0x3F, 0x81, 0x35, 0x09,
    ],
    patable: [0x8E, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
};

/// 2-FSK, 5.7 kBaud, 58 kHz RX bandwidth, variable packet length
pub const DR5K7_DEV5K2_2FSK_RXBW58K: Preset = Preset {
    name: "2FSK, DataRate 5.7kBaud, RXBW 58k",
    registers: [
        0x29, 0x2E, 0x06, 0x07, 0xD3, 0x4B, 0xFF, 0x04,
        0x01, 0x00, 0x00, 0x06, 0x00, 0x10, 0xB0, 0x71,
        0xF7, 0xCC, 0x05, 0x02, 0xF8, 0x42, 0x07, 0x30,
        0x18, 0x36, 0x6C, 0x03, 0x40, 0x91, 0x87, 0x6B,
        0xF8, 0x56, 0x10, 0xE9, 0x2A, 0x00, 0x1F, 0x41,
        0x00, 0x59, 0x7F, 0x3F, 0x81, 0x35, 0x09,
    ],
    patable: [0x8E, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
};

/// Fixed length 136 byte packets at 5.7 kBaud, 101 kHz RX bandwidth
pub const KIA_EV6_KEY_FOB: Preset = Preset {
    name: "KIA EV6 Key Fob",
    registers: [
        0x29, 0x2E, 0x06, 0x07, 0xD3, 0x4B, 0x88, 0x04,
        0x00, 0x00, 0x00, 0x06, 0x00, 0x10, 0xB0, 0x71,
        0xC7, 0xCC, 0x05, 0x02, 0xF8, 0x42, 0x07, 0x30,
        0x18, 0x36, 0x6C, 0x03, 0x40, 0x91, 0x87, 0x6B,
        0xF8, 0x56, 0x10, 0xE9, 0x2A, 0x00, 0x1F, 0x41,
        0x00, 0x59, 0x7F, 0x3F, 0x81, 0x35, 0x09,
    ],
    patable: [0x8E, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
};

/// ASK/OOK in serial mode with an infinite packet length
pub const ASYNC_ASK_OOK: Preset = Preset {
    name: "ASK/OOK",
    registers: [
        0x0B, 0x2E, 0x0C, 0x47, 0xD3, 0x91, 0xFF, 0x04,
        0x32, 0x00, 0x00, 0x06, 0x00, 0x10, 0xB0, 0x71,
        0xF5, 0x83, 0x30, 0x00, 0xF8, 0x15, 0x07, 0x30,
        0x18, 0x14, 0x6C, 0x03, 0x40, 0x91, 0x87, 0x6B,
        0xFB, 0x56, 0x11, 0xE9, 0x2A, 0x00, 0x1F, 0x41,
        0x00, 0x59, 0x7F, 0x3F, 0x81, 0x35, 0x09,
    ],
    patable: [0x00, 0x60, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
};

/// Preset used when none is given
pub const DEFAULT: Preset = DR1K2_DEV5K2_2FSK_RXBW58K_SENS;

/// Every built-in preset
pub const ALL: [&Preset; 5] = [
    &DR1K2_DEV5K2_2FSK_RXBW58K_SENS,
    &SAMPLE_1,
    &DR5K7_DEV5K2_2FSK_RXBW58K,
    &KIA_EV6_KEY_FOB,
    &ASYNC_ASK_OOK,
];

/// Looks up a built-in preset by its name
pub fn by_name(name: &str) -> Option<&'static Preset> {
    ALL.into_iter().find(|preset| preset.name == name)
}
