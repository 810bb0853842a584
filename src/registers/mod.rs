//! Register definitions for the CC1101 radio
//! Taken from the CC1101 datasheet (SWRS061I)

pub mod config;
mod status;

pub use config::{Field, RegisterBank, CONFIG_REGISTER_COUNT, FIFO, FIFO_SIZE, PATABLE, PATABLE_SIZE};
pub use status::*;
