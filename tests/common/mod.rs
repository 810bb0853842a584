//! Emulated CC1101 for driving `Cc1101` without hardware.
//!
//! The chip model keeps a register file, both FIFOs and the MARC state, and
//! reacts to strobes the way the datasheet describes. While in TX, every TXBYTES
//! poll moves up to `tx_drain_per_poll` bytes from the TX FIFO "on air".

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;

use cc1101::pins::{Capture, Level, RadioPins, Trigger};
use cc1101::presets::Preset;
use cc1101::registers::{
    MarcState, CONFIG_REGISTER_COUNT, FIFO, FIFO_SIZE, MARCSTATE, PARTNUM, PATABLE, PATABLE_SIZE,
    PKTSTATUS, RSSI, RXBYTES, TXBYTES, VERSION,
};
use cc1101::{Cc1101, DriverConfig, Gdo, Strobe};
use embedded_hal::delay::DelayNs;
use embedded_hal::spi::{ErrorType, Operation};

pub struct Chip {
    pub registers: [u8; CONFIG_REGISTER_COUNT],
    pub patable: [u8; PATABLE_SIZE],
    pub power_on: [u8; CONFIG_REGISTER_COUNT],
    pub state: MarcState,
    pub tx_fifo: VecDeque<u8>,
    pub rx_fifo: VecDeque<u8>,
    /// Bytes the chip has sent
    pub air: Vec<u8>,
    pub tx_drain_per_poll: usize,
    pub max_tx_fill: usize,
    pub strobes: Vec<Strobe>,
    pub fifo_accesses: usize,
    pub rssi: u8,
    pub version: u8,
}

impl Chip {
    pub fn new(preset: &Preset) -> Self {
        Self {
            registers: preset.registers,
            patable: preset.patable,
            power_on: preset.registers,
            state: MarcState::Idle,
            tx_fifo: VecDeque::new(),
            rx_fifo: VecDeque::new(),
            air: Vec::new(),
            tx_drain_per_poll: 16,
            max_tx_fill: 0,
            strobes: Vec::new(),
            fifo_accesses: 0,
            rssi: 0xD0,
            version: 0x14,
        }
    }

    fn strobe(&mut self, address: u8) -> u8 {
        let Ok(strobe) = Strobe::try_from(address) else {
            panic!("unexpected strobe 0x{address:02X}");
        };
        self.strobes.push(strobe);
        match strobe {
            Strobe::Reset => {
                self.registers = self.power_on;
                self.state = MarcState::Idle;
                self.tx_fifo.clear();
                self.rx_fifo.clear();
            }
            Strobe::Idle => {
                if self.state == MarcState::Tx {
                    self.air.extend(self.tx_fifo.drain(..));
                }
                self.state = MarcState::Idle;
            }
            Strobe::Receive => self.state = MarcState::Rx,
            Strobe::Transmit => self.state = MarcState::Tx,
            Strobe::FlushRx => self.rx_fifo.clear(),
            Strobe::FlushTx => self.tx_fifo.clear(),
            _ => {}
        }
        0x0F
    }

    fn status(&mut self, address: u8) -> u8 {
        match address {
            PARTNUM => 0x00,
            VERSION => self.version,
            MARCSTATE => self.state as u8,
            RSSI => self.rssi,
            PKTSTATUS => 0x80,
            TXBYTES => {
                if self.state == MarcState::Tx {
                    let n = self.tx_drain_per_poll.min(self.tx_fifo.len());
                    self.air.extend(self.tx_fifo.drain(..n));
                }
                self.tx_fifo.len() as u8
            }
            RXBYTES => self.rx_fifo.len() as u8,
            _ => 0,
        }
    }

    fn read(&mut self, header: u8, buf: &mut [u8]) {
        let address = header & 0x3F;
        let burst = header & 0x40 != 0;
        match address {
            FIFO => {
                self.fifo_accesses += 1;
                for byte in buf.iter_mut() {
                    *byte = self.rx_fifo.pop_front().expect("RX FIFO underflow");
                }
            }
            PATABLE => buf.copy_from_slice(&self.patable[..buf.len()]),
            0x30..=0x3D if burst => buf[0] = self.status(address),
            _ => {
                let start = address as usize;
                buf.copy_from_slice(&self.registers[start..start + buf.len()]);
            }
        }
    }

    fn write(&mut self, header: u8, data: &[u8]) {
        let address = header & 0x3F;
        match address {
            FIFO => {
                self.fifo_accesses += 1;
                self.tx_fifo.extend(data);
                assert!(self.tx_fifo.len() <= FIFO_SIZE, "TX FIFO overflow");
                self.max_tx_fill = self.max_tx_fill.max(self.tx_fifo.len());
            }
            PATABLE => self.patable[..data.len()].copy_from_slice(data),
            _ => {
                let start = address as usize;
                self.registers[start..start + data.len()].copy_from_slice(data);
            }
        }
    }

    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) {
        match operations {
            [Operation::TransferInPlace(buf)] => buf[0] = self.strobe(buf[0] & 0x3F),
            [Operation::Write(header), Operation::Read(buf)] => self.read(header[0], buf),
            [Operation::Write(header), Operation::Write(data)] => self.write(header[0], data),
            [Operation::Write(bytes)] => self.write(bytes[0], &bytes[1..]),
            _ => panic!("unexpected SPI transaction"),
        }
    }
}

pub type SharedChip = Rc<RefCell<Chip>>;

pub struct FakeSpi(pub SharedChip);

impl ErrorType for FakeSpi {
    type Error = Infallible;
}

impl embedded_hal::spi::SpiDevice for FakeSpi {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Self::Error> {
        self.0.borrow_mut().transaction(operations);
        Ok(())
    }
}

impl embedded_hal_async::spi::SpiDevice for FakeSpi {
    async fn transaction(
        &mut self,
        operations: &mut [Operation<'_, u8>],
    ) -> Result<(), Self::Error> {
        self.0.borrow_mut().transaction(operations);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SerialWrite {
    Sync {
        clock: Gdo,
        data: Gdo,
        bytes: Vec<u8>,
        baud: u32,
    },
    Async {
        data: Gdo,
        bytes: Vec<u8>,
        baud: u32,
    },
}

pub struct FakePins {
    chip: SharedChip,
    pub connected: [bool; 3],
    /// Bytes of the next packet, not yet demodulated
    pub incoming: VecDeque<u8>,
    /// Bytes moved into the RX FIFO per poll interval
    pub rx_per_poll: usize,
    pub end_of_transmission: bool,
    pub level: Level,
    pub sync_bits: Vec<u8>,
    pub capture: Option<Capture>,
    pub written: Vec<SerialWrite>,
    pub waits: Vec<(Gdo, Trigger)>,
    pub inputs: Vec<Gdo>,
    pub released: Vec<Gdo>,
}

impl FakePins {
    pub fn new(chip: SharedChip) -> Self {
        Self {
            chip,
            connected: [true, false, true],
            incoming: VecDeque::new(),
            rx_per_poll: 16,
            end_of_transmission: true,
            level: Level::Low,
            sync_bits: Vec::new(),
            capture: None,
            written: Vec::new(),
            waits: Vec::new(),
            inputs: Vec::new(),
            released: Vec::new(),
        }
    }

    pub fn disconnect(&mut self, pin: Gdo) {
        self.connected[pin as usize] = false;
    }
}

impl embedded_hal::digital::ErrorType for FakePins {
    type Error = Infallible;
}

impl RadioPins for FakePins {
    fn is_connected(&self, pin: Gdo) -> bool {
        self.connected[pin as usize]
    }

    fn set_input(&mut self, pin: Gdo) -> Result<(), Self::Error> {
        self.inputs.push(pin);
        Ok(())
    }

    fn release(&mut self, pin: Gdo) -> Result<(), Self::Error> {
        self.released.push(pin);
        Ok(())
    }

    fn level(&mut self, _pin: Gdo) -> Result<Level, Self::Error> {
        Ok(self.level)
    }

    fn wait_for_edge(
        &mut self,
        pin: Gdo,
        trigger: Trigger,
        _timeout_ms: u32,
    ) -> Result<Option<Level>, Self::Error> {
        self.waits.push((pin, trigger));
        let mut chip = self.chip.borrow_mut();
        match (chip.state, trigger) {
            (MarcState::Rx, Trigger::Rising) if !self.incoming.is_empty() => {
                self.level = Level::High;
                Ok(Some(Level::High))
            }
            (MarcState::Rx, Trigger::Falling) => {
                let n = self.rx_per_poll.min(self.incoming.len());
                let bytes: Vec<u8> = self.incoming.drain(..n).collect();
                chip.rx_fifo.extend(bytes);
                if self.incoming.is_empty() {
                    self.level = Level::Low;
                    Ok(Some(Level::Low))
                } else {
                    Ok(None)
                }
            }
            (MarcState::Tx, Trigger::Falling) if self.end_of_transmission => {
                Ok(Some(Level::Low))
            }
            _ => Ok(None),
        }
    }

    fn synchronous_serial_write(
        &mut self,
        clock: Gdo,
        data: Gdo,
        bytes: &[u8],
        baud: u32,
    ) -> Result<(), Self::Error> {
        self.written.push(SerialWrite::Sync {
            clock,
            data,
            bytes: bytes.to_vec(),
            baud,
        });
        Ok(())
    }

    fn synchronous_serial_read(
        &mut self,
        _clock: Gdo,
        _data: Gdo,
        _timeout_ms: u32,
    ) -> Result<Vec<u8>, Self::Error> {
        Ok(std::mem::take(&mut self.sync_bits))
    }

    fn asynchronous_serial_write(
        &mut self,
        data: Gdo,
        baud: u32,
        bytes: &[u8],
    ) -> Result<(), Self::Error> {
        self.written.push(SerialWrite::Async {
            data,
            bytes: bytes.to_vec(),
            baud,
        });
        Ok(())
    }

    fn asynchronous_serial_read(
        &mut self,
        _threshold: Gdo,
        _data: Gdo,
        _timeout_ms: u32,
    ) -> Result<Option<Capture>, Self::Error> {
        Ok(self.capture.take())
    }
}

#[derive(Debug, Default)]
pub struct FakeDelay {
    pub total_ns: u64,
}

impl DelayNs for FakeDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += ns as u64;
    }
}

pub type Radio = Cc1101<FakeSpi, FakePins, FakeDelay>;

/// Radio on an emulated chip powered up with `preset`
pub fn radio(preset: &Preset) -> (Radio, SharedChip) {
    radio_with_config(preset, DriverConfig::default())
}

pub fn radio_with_config(preset: &Preset, config: DriverConfig) -> (Radio, SharedChip) {
    let chip = Rc::new(RefCell::new(Chip::new(preset)));
    let pins = FakePins::new(chip.clone());
    let radio = Cc1101::with_config(FakeSpi(chip.clone()), pins, FakeDelay::default(), config)
        .expect("emulated chip never fails");
    chip.borrow_mut().strobes.clear();
    (radio, chip)
}
