mod common;

use cc1101::configurator::{ModulationFormat, PacketFormat};
use cc1101::registers::config::{CHANNR, FREND0, FREQ2, IOCFG0, MDMCFG1};
use cc1101::registers::MarcState;
use cc1101::{presets, Device, Error, Gdo, Strobe};
use common::{radio, Chip, FakeSpi};
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn startup_resets_and_pulls() {
    let (radio, chip) = radio(&presets::KIA_EV6_KEY_FOB);
    assert!(radio.is_synchronized());
    assert_eq!(
        radio.configurator().bank().registers(),
        &chip.borrow().registers
    );
    assert_eq!(radio.configurator().packet_length(), 136);

    radio.configurator().describe();
    radio.configurator().log_registers();
}

#[test]
fn preset_data_rate() {
    let (mut radio, chip) = radio(&presets::DEFAULT);
    radio
        .load_preset(&presets::DR5K7_DEV5K2_2FSK_RXBW58K)
        .unwrap();

    assert_eq!(radio.configurator().data_rate_baud(), 5703);
    assert_eq!(
        chip.borrow().registers,
        presets::DR5K7_DEV5K2_2FSK_RXBW58K.registers
    );
    assert_eq!(
        chip.borrow().patable,
        presets::DR5K7_DEV5K2_2FSK_RXBW58K.patable
    );
}

#[test]
fn changes_reach_the_chip_on_push() {
    let (mut radio, chip) = radio(&presets::DEFAULT);
    let config = radio.configurator_mut();
    config.set_base_frequency_hz(868_300_000).unwrap();
    config.set_modulation_format(ModulationFormat::AskOok);
    config.set_fec_enabled(true);
    config.set_gdo_config(Gdo::Gdo0, 0x0E).unwrap();
    config.set_patable(&[0x00, 0xC0]).unwrap();

    // nothing is written before the push
    assert_eq!(chip.borrow().registers, presets::DEFAULT.registers);

    radio.push_configuration().unwrap();
    let chip = chip.borrow();
    let freq = &chip.registers[FREQ2 as usize..FREQ2 as usize + 3];
    assert_eq!(freq, &[0x21, 0x65, 0x6A]);
    assert_eq!(chip.registers[FREND0 as usize], 0x11);
    assert_eq!(chip.registers[MDMCFG1 as usize], 0xA2);
    assert_eq!(chip.registers[IOCFG0 as usize], 0x0E);
    assert_eq!(chip.patable, [0x00, 0xC0, 0, 0, 0, 0, 0, 0]);
}

#[test]
fn gdo_configuration_survives_a_pull() {
    let (mut radio, _chip) = radio(&presets::DEFAULT);
    radio
        .configurator_mut()
        .set_packet_format(PacketFormat::AsyncSerial)
        .unwrap();
    radio.push_configuration().unwrap();

    radio.configurator_mut().load_preset(&presets::DEFAULT);
    radio.pull_configuration().unwrap();
    assert_eq!(radio.configurator().gdo_config(Gdo::Gdo0), 0x0E);
    assert_eq!(radio.configurator().gdo_config(Gdo::Gdo2), 0x0D);
    assert_eq!(
        radio.configurator().packet_format(),
        PacketFormat::AsyncSerial
    );
}

#[test]
fn reset_invalidates_the_mirror() {
    let (mut radio, chip) = radio(&presets::DEFAULT);
    radio.reset().unwrap();
    assert!(!radio.is_synchronized());
    assert_eq!(chip.borrow().strobes, [Strobe::Reset]);

    radio.pull_configuration().unwrap();
    assert!(radio.is_synchronized());
}

#[test]
fn rssi_needs_the_receiver() {
    let (mut radio, chip) = radio(&presets::DEFAULT);
    assert_eq!(
        radio.rssi_raw(),
        Err(Error::InvalidState {
            required: &[MarcState::Rx, MarcState::RxEnd],
            actual: MarcState::Idle,
        })
    );

    radio.set_receive().unwrap();
    assert_eq!(radio.device_state().unwrap(), MarcState::Rx);
    chip.borrow_mut().rssi = 0xD0;
    // 0xD0 is -48 / 2 - 74
    assert_eq!(radio.rssi_dbm().unwrap(), -98.0);
}

#[test]
fn chip_identity() {
    let (mut radio, chip) = radio(&presets::DEFAULT);
    chip.borrow_mut().version = 0x99;
    let (partnum, version) = radio.chip_identity().unwrap();
    assert_eq!(partnum.0, 0x00);
    assert!(!version.is_known());
}

#[test]
fn async_configuration_access() {
    let (mut radio, chip) = radio(&presets::DEFAULT);
    radio.configurator_mut().set_channel_number(7);

    embassy_futures::block_on(async {
        radio.push_configuration_async().await.unwrap();
        assert_eq!(
            radio.device_state_async().await.unwrap(),
            MarcState::Idle
        );
        radio.set_idle_async().await.unwrap();
        radio.pull_configuration_async().await.unwrap();
    });

    assert_eq!(chip.borrow().registers[0x0A], 7);
    assert_eq!(radio.configurator().channel_number(), 7);
    assert_eq!(chip.borrow().strobes, [Strobe::Idle]);
}

#[test]
fn single_register_access() {
    let chip = Rc::new(RefCell::new(Chip::new(&presets::DEFAULT)));
    let mut device = Device::new(FakeSpi(chip.clone()));

    device.write_config(CHANNR, 9).unwrap();
    assert_eq!(chip.borrow().registers[CHANNR as usize], 9);
    assert_eq!(device.read_config(CHANNR), Ok(9));
    assert_eq!(
        device.read_config(IOCFG0),
        Ok(presets::DEFAULT.registers[IOCFG0 as usize])
    );
}
