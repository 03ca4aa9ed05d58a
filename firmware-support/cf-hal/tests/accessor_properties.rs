// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

use proptest::prelude::*;
use test_strategy::proptest;

use cf_hal::register::{registers, FIFO_DEPTH};
use cf_hal::sim::SimBus;
use cf_hal::spi::STATUS_TX_PENDING;
use cf_hal::{address, Instance, Layout, OutOfRange, Peripheral, PeripheralKind};
use cf_hal::{Spi, SpiLayout, UartLayout};

fn any_kind() -> impl Strategy<Value = PeripheralKind> {
    prop_oneof![Just(PeripheralKind::Spi), Just(PeripheralKind::Uart)]
}

fn any_instance() -> impl Strategy<Value = Instance> {
    any_kind().prop_flat_map(|kind| {
        (0..kind.instance_count()).prop_map(move |index| Instance::new(kind, index).unwrap())
    })
}

fn any_offset() -> impl Strategy<Value = u32> {
    any_kind().prop_flat_map(|kind| {
        let offsets: Vec<u32> = registers(kind).map(|(_, offset)| offset).collect();
        proptest::sample::select(offsets)
    })
}

/// Run `f` with an accessor for `instance` on a bus that models only it.
fn with_accessor<R>(
    instance: Instance,
    f_spi: impl FnOnce(Peripheral<'_, SimBus, SpiLayout>) -> R,
    f_uart: impl FnOnce(Peripheral<'_, SimBus, UartLayout>) -> R,
) -> R {
    let bus = SimBus::with_instances([instance]);
    match instance.kind() {
        PeripheralKind::Spi => f_spi(Peripheral::new(&bus, instance.index()).unwrap()),
        PeripheralKind::Uart => f_uart(Peripheral::new(&bus, instance.index()).unwrap()),
    }
}

#[proptest]
fn addresses_are_injective(
    #[strategy(any_instance())] a: Instance,
    #[strategy(any_instance())] b: Instance,
    #[strategy(any_offset())] offset: u32,
) {
    let addr_a = address(a.kind(), a.index(), offset).unwrap();
    let addr_b = address(b.kind(), b.index(), offset).unwrap();
    prop_assert_eq!(a == b, addr_a == addr_b);
    prop_assert_eq!(addr_a, a.base() + offset);
}

#[proptest]
fn enable_is_idempotent(#[strategy(any_instance())] instance: Instance, before: u32) {
    fn enable_twice<L: Layout>(p: Peripheral<'_, SimBus, L>, before: u32) -> (u32, u32) {
        p.set_control(before);
        p.enable();
        let once = p.control();
        p.enable();
        (once, p.control())
    }

    let (once, twice) = with_accessor(
        instance,
        |spi| enable_twice(spi, before),
        |uart| enable_twice(uart, before),
    );
    prop_assert_eq!(once, 0x7);
    prop_assert_eq!(once, twice);
}

#[proptest]
fn enable_tx_preserves_other_bits(#[strategy(any_instance())] instance: Instance, before: u32) {
    fn set<L: Layout>(p: Peripheral<'_, SimBus, L>, before: u32) -> (u32, u32) {
        p.set_control(before);
        p.enable_tx();
        let tx = p.control();
        p.set_control(before);
        p.enable_rx();
        (tx, p.control())
    }

    let (tx, rx) = with_accessor(
        instance,
        |spi| set(spi, before),
        |uart| set(uart, before),
    );
    let (tx_bit, rx_bit) = match instance.kind() {
        PeripheralKind::Spi => (SpiLayout::TX_ENABLE, SpiLayout::RX_ENABLE),
        PeripheralKind::Uart => (UartLayout::TX_ENABLE, UartLayout::RX_ENABLE),
    };
    prop_assert_eq!(tx, before | tx_bit);
    prop_assert_eq!(rx, before | rx_bit);
}

#[proptest]
fn send_on_empty_queue_gives_level_one(
    #[strategy(any_instance())] instance: Instance,
    data: u8,
    #[strategy(0u32..8)] prescale: u32,
) {
    fn send<L: Layout>(p: Peripheral<'_, SimBus, L>, data: u8, prescale: u32) -> u32 {
        p.set_prescale(prescale);
        p.enable();
        p.flush_tx();
        p.send(data);
        p.tx_level()
    }

    let level = with_accessor(
        instance,
        |spi| send(spi, data, prescale),
        |uart| send(uart, data, prescale),
    );
    prop_assert_eq!(level, 1);
}

#[proptest]
fn flush_empties_the_queue(
    #[strategy(any_instance())] instance: Instance,
    #[strategy(proptest::collection::vec(any::<u8>(), 0..=FIFO_DEPTH as usize))] data: Vec<u8>,
) {
    fn fill<L: Layout>(p: Peripheral<'_, SimBus, L>, data: &[u8]) -> (u32, u32) {
        for byte in data {
            p.send(*byte);
        }
        let filled = p.tx_level();
        p.flush_tx();
        (filled, p.tx_level())
    }

    let (filled, flushed) = with_accessor(
        instance,
        |spi| fill(spi, &data),
        |uart| fill(uart, &data),
    );
    prop_assert_eq!(filled, data.len() as u32);
    prop_assert_eq!(flushed, 0);
}

#[test]
fn spi2_transmit_scenario() {
    let bus = SimBus::full();
    let spi = Spi::new(&bus, 2).unwrap();

    spi.configure(0);
    spi.set_prescale(2);
    spi.enable();
    spi.set_tx_threshold(3);
    spi.enable_tx();
    spi.send(0x43);

    assert_eq!(spi.tx_level(), 1);
    assert_ne!(spi.status() & STATUS_TX_PENDING, 0);
    assert!(spi.read_status().tx_pending());
}

#[test]
fn spi6_is_out_of_range() {
    let bus = SimBus::new();
    assert_eq!(
        Spi::new(&bus, 6).err(),
        Some(OutOfRange {
            kind: PeripheralKind::Spi,
            index: 6
        })
    );
    assert_eq!(bus.cycles(), 0);
}
