// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

use proptest::prelude::*;
use test_strategy::proptest;

use cf_hal::register::RX_FIFO_LEVEL;
use cf_hal::sim::SimBus;
use cf_hal::{Bus, Instance, PeripheralKind, Spi};
use cf_sys::pinout::integration;
use cf_sys::progress::{spi_done, uart_done, CONFIGURED, DONE, FAILURE};
use cf_sys::{GpioMode, Sequence, SequenceConfig, SequenceError, SimManagement};

fn uart(index: u8) -> Instance {
    Instance::new(PeripheralKind::Uart, index).unwrap()
}

fn spi(index: u8) -> Instance {
    Instance::new(PeripheralKind::Spi, index).unwrap()
}

/// UART 0 to 3 and SPI 2 to 5, the instances whose queue registers are not
/// covered by another instance's core registers.
fn unshadowed() -> (SimBus, SequenceConfig) {
    let config = SequenceConfig::default()
        .with_uart_instances(0..4)
        .with_spi_instances(2..6);
    let bus = SimBus::with_instances(
        config
            .uart_instances
            .clone()
            .map(uart)
            .chain(config.spi_instances.clone().map(spi)),
    );
    (bus, config)
}

/// Forwards to a [`SimBus`], but reads of `address` return `value`.
struct Stuck<'a> {
    bus: &'a SimBus,
    address: u32,
    value: u32,
}

impl Bus for Stuck<'_> {
    fn read_word(&self, address: u32) -> u32 {
        let actual = self.bus.read_word(address);
        if address == self.address {
            self.value
        } else {
            actual
        }
    }

    fn write_word(&self, address: u32, value: u32) {
        self.bus.write_word(address, value)
    }
}

/// Run `sequence` on SPI2 only, with reads of `address` stuck at `value`.
fn run_stuck(sequence: Sequence, address: u32, value: u32) -> (Result<(), SequenceError>, SimManagement) {
    let config = SequenceConfig::default()
        .with_uart_instances(0..0)
        .with_spi_instances(2..3);
    let bus = SimBus::with_instances([spi(2)]);
    let stuck = Stuck {
        bus: &bus,
        address,
        value,
    };
    let mut mgmt = SimManagement::new();
    let result = sequence.run(&stuck, &mut mgmt, &config);
    (result, mgmt)
}

fn run(sequence: Sequence) -> (Result<(), SequenceError>, SimManagement, SimBus) {
    let (bus, config) = unshadowed();
    let mut mgmt = SimManagement::new();
    let result = sequence.run(&bus, &mut mgmt, &config);
    (result, mgmt, bus)
}

#[test]
fn spi_test_passes() {
    let (result, mgmt, bus) = run(Sequence::SpiTest);
    assert_eq!(result, Ok(()));
    assert_eq!(mgmt.history.as_slice(), [0, CONFIGURED, 11, 12, 13, 14, DONE]);
    assert_eq!(mgmt.housekeeping_spi, Some(false));
    assert!(mgmt.user_interface);
    assert_eq!(bus.unmapped_accesses(), 0);
}

#[test]
fn spi_test_transmits_in_the_background() {
    let (_, _, bus) = run(Sequence::SpiTest);
    bus.run(1000);
    assert_eq!(bus.take_transmitted(spi(2)).as_slice(), b"C");
    assert_eq!(bus.take_transmitted(spi(5)).as_slice(), b"F");
}

#[test]
fn uart_test_passes_and_drains() {
    let (result, mgmt, bus) = run(Sequence::UartTest);
    assert_eq!(result, Ok(()));
    assert_eq!(mgmt.history.as_slice(), [0, CONFIGURED, CONFIGURED]);
    assert_eq!(mgmt.mode(1), Some(GpioMode::UserOutputMonitored));
    assert_eq!(mgmt.mode(2), None);
    for (index, expected) in [b"A", b"B", b"C", b"D"].into_iter().enumerate() {
        assert_eq!(bus.take_transmitted(uart(index as u8)).as_slice(), expected);
    }
}

#[test]
fn uart_test_times_out() {
    let (bus, config) = unshadowed();
    let config = config.with_poll_limit(10);
    let mut mgmt = SimManagement::new();

    let result = Sequence::UartTest.run(&bus, &mut mgmt, &config);

    assert!(matches!(
        result,
        Err(SequenceError::TransmitTimeout { instance, level: 1 }) if instance == uart(0)
    ));
    assert_eq!(mgmt.last(), Some(FAILURE));
}

#[test]
fn register_test_passes() {
    let (result, mgmt, bus) = run(Sequence::RegisterTest);
    assert_eq!(result, Ok(()));
    assert_eq!(
        mgmt.history.as_slice(),
        [0, CONFIGURED, 2, 3, 4, 5, 11, 12, 13, 14, DONE]
    );
    // The probe address is the RX level register of SPI2.
    assert_eq!(bus.unmapped_accesses(), 0);
    assert_eq!(bus.peek(SequenceConfig::default().probe_address), 0);
    assert_eq!(bus.peek(spi(4).address(cf_hal::spi::CTRL)), 0x7 + 4);
}

#[test]
fn wishbone_test_programs_every_instance() {
    let (result, mgmt, bus) = run(Sequence::WishboneTest);
    assert_eq!(result, Ok(()));
    assert_eq!(
        mgmt.history.as_slice(),
        [0, CONFIGURED, 2, 3, 4, 5, 11, 12, 13, 14, DONE]
    );
    assert_eq!(bus.peek(uart(3).address(cf_hal::uart::CFG)), 0x70);
    assert_eq!(bus.peek(uart(3).address(cf_hal::uart::PR)), 0x1);
    assert_eq!(bus.peek(spi(2).address(cf_hal::spi::PR)), 0x2);
}

#[test]
fn io_test_enables_every_instance() {
    let (result, mgmt, bus) = run(Sequence::IoTest);
    assert_eq!(result, Ok(()));
    assert_eq!(mgmt.last(), Some(DONE));
    for instance in [uart(0), uart(3), spi(2), spi(5)] {
        assert_eq!(bus.peek(instance.address(0x0C)), 0x7);
    }
}

#[test]
fn integration_bring_up() {
    let (result, mgmt, bus) = run(Sequence::IntegrationBringUp);
    assert_eq!(result, Ok(()));
    assert_eq!(mgmt.history.as_slice(), [0, CONFIGURED, DONE]);
    assert_eq!(mgmt.mode(integration::UART_RX), Some(GpioMode::UserInputNoPull));
    assert_eq!(mgmt.mode(34), Some(GpioMode::UserOutputMonitored));
    assert!(!mgmt.user_interface);
    assert_eq!(bus.cycles(), 0);
}

#[test]
fn interrupt_bring_up_drives_enables() {
    let (result, mgmt, _) = run(Sequence::InterruptBringUp);
    assert_eq!(result, Ok(()));
    assert_eq!(mgmt.history.as_slice(), [0, CONFIGURED, DONE]);
    assert_eq!(
        mgmt.gpio_low,
        1 << integration::SPI_EN | 1 << integration::UART_EN
    );
}

#[test]
fn spi_test_fails_on_shadowed_instance() {
    let bus = SimBus::full();
    let mut mgmt = SimManagement::new();

    let result = Sequence::SpiTest.run(&bus, &mut mgmt, &SequenceConfig::default());

    // SPI0 TX level reads SPI4 CTRL, which is still 0.
    assert_eq!(
        result,
        Err(SequenceError::TxLevel {
            instance: spi(0),
            expected: 1,
            actual: 0
        })
    );
    assert_eq!(mgmt.history.as_slice(), [0, CONFIGURED, FAILURE]);
}

#[test]
fn out_of_range_instances_fail() {
    let bus = SimBus::full();
    let mut mgmt = SimManagement::new();
    let config = SequenceConfig::default().with_spi_instances(5..7);

    let result = Sequence::WishboneTest.run(&bus, &mut mgmt, &config);

    assert!(matches!(result, Err(SequenceError::OutOfRange(_))));
    assert_eq!(mgmt.last(), Some(FAILURE));
}

#[test]
fn control_mismatch_is_reported() {
    // A bus where nothing answers reads back 0 for CTRL.
    let bus = SimBus::new();
    let mut mgmt = SimManagement::new();
    let config = SequenceConfig::default().with_spi_instances(0..1);

    let result = Sequence::SpiTest.run(&bus, &mut mgmt, &config);

    assert_eq!(
        result,
        Err(SequenceError::ControlMismatch {
            instance: spi(0),
            expected: 0x7,
            actual: 0
        })
    );
    let spi0 = Spi::new(&bus, 0).unwrap();
    assert_eq!(spi0.control(), 0);
}

#[proptest]
fn progress_follows_the_instance_ranges(
    #[strategy(0u8..4)] uart_start: u8,
    #[strategy(#uart_start..=4)] uart_end: u8,
    #[strategy(2u8..6)] spi_start: u8,
    #[strategy(#spi_start..=6)] spi_end: u8,
) {
    let config = SequenceConfig::default()
        .with_uart_instances(uart_start..uart_end)
        .with_spi_instances(spi_start..spi_end);
    let bus = SimBus::with_instances((uart_start..uart_end).map(uart).chain((spi_start..spi_end).map(spi)));
    let mut mgmt = SimManagement::new();

    prop_assert_eq!(Sequence::WishboneTest.run(&bus, &mut mgmt, &config), Ok(()));

    let expected: Vec<u32> = [0, CONFIGURED]
        .into_iter()
        .chain((uart_start..uart_end).map(uart_done))
        .chain((spi_start..spi_end).map(spi_done))
        .chain([DONE])
        .collect();
    prop_assert_eq!(mgmt.history.as_slice(), expected.as_slice());
}

#[test]
fn config_mismatch_is_reported() {
    let (result, mgmt) = run_stuck(Sequence::SpiTest, spi(2).address(cf_hal::spi::CFG), 0x5);
    assert_eq!(
        result,
        Err(SequenceError::ConfigMismatch {
            instance: spi(2),
            expected: 0,
            actual: 0x5
        })
    );
    assert_eq!(mgmt.history.as_slice(), [0, CONFIGURED, FAILURE]);
}

#[test]
fn missing_tx_pending_is_reported() {
    let (result, mgmt) = run_stuck(Sequence::SpiTest, spi(2).address(cf_hal::spi::STATUS), 0);
    assert_eq!(
        result,
        Err(SequenceError::StatusMissing {
            instance: spi(2),
            status: 0
        })
    );
    assert_eq!(mgmt.last(), Some(FAILURE));
}

#[test]
fn register_test_reports_config_mismatch() {
    let (result, mgmt) = run_stuck(
        Sequence::RegisterTest,
        spi(2).address(cf_hal::spi::CFG),
        0xFFFF_FFFF,
    );
    assert_eq!(
        result,
        Err(SequenceError::ConfigMismatch {
            instance: spi(2),
            expected: 0,
            actual: 0xFFFF_FFFF
        })
    );
    assert_eq!(mgmt.history.as_slice(), [0, CONFIGURED, FAILURE]);
}

#[test]
fn register_test_reports_pending_rx_data() {
    let (result, mgmt) = run_stuck(Sequence::RegisterTest, spi(2).address(RX_FIFO_LEVEL), 3);
    assert_eq!(
        result,
        Err(SequenceError::RxLevel {
            instance: spi(2),
            expected: 0,
            actual: 3
        })
    );
    // Phase 2 passed, the queue check failed.
    assert_eq!(mgmt.history.as_slice(), [0, CONFIGURED, spi_done(2), FAILURE]);
}

#[test]
fn register_test_reports_missing_instance() {
    // UART1 is not attached, its control register does not hold the value.
    let bus = SimBus::with_instances([uart(0)]);
    let config = SequenceConfig::default()
        .with_uart_instances(0..2)
        .with_spi_instances(2..2);
    let mut mgmt = SimManagement::new();

    let result = Sequence::RegisterTest.run(&bus, &mut mgmt, &config);

    assert_eq!(
        result,
        Err(SequenceError::ReadbackMismatch {
            address: uart(1).address(cf_hal::uart::CTRL),
            expected: 0x1234_5679,
            actual: 0
        })
    );
    assert_eq!(mgmt.history.as_slice(), [0, CONFIGURED, uart_done(0), FAILURE]);
    assert_eq!(bus.unmapped_accesses(), 2);
}
