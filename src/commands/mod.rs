//! Command strobes
//!
//! The CC1101 is driven through single byte command strobes. A strobe is a header
//! byte addressed at 0x30..=0x3D with neither the read nor the burst bit set; the
//! chip answers with its [`ChipStatus`](crate::registers::ChipStatus) byte.
//!
//! # Important Notes
//! - Strobes share addresses with the status registers, the burst bit decides
//!   which of the two is accessed
//! - SRES resets every configuration register to its power-on value
//! - SRX, STX and SFSTXON calibrate first when MCSM0.FS_AUTOCAL asks for it
//! - SFRX and SFTX are only valid in IDLE or the respective FIFO error state

mod strobe;

pub use strobe::*;
