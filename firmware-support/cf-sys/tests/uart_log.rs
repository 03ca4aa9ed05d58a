// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

use cf_hal::sim::SimBus;
use cf_hal::{Instance, PeripheralKind, Uart};
use cf_sys::uart_log::UartLogger;
use log::{Level, LevelFilter, Log, Record};

fn logger_on_uart(index: u8) -> (&'static SimBus, Instance, UartLogger<SimBus>) {
    let instance = Instance::new(PeripheralKind::Uart, index).unwrap();
    let bus: &'static SimBus = Box::leak(Box::new(SimBus::with_instances([instance])));
    let uart = Uart::new(bus, index).unwrap();
    uart.set_prescale(0);
    uart.enable();

    let mut logger = UartLogger::new();
    unsafe { logger.set_uart(uart) };
    (bus, instance, logger)
}

fn drain(bus: &SimBus, instance: Instance) -> String {
    let uart = Uart::new(bus, instance.index()).unwrap();
    while uart.tx_level() != 0 {}
    String::from_utf8(bus.take_transmitted(instance).to_vec()).unwrap()
}

#[test]
fn record_with_level_and_source() {
    let (bus, instance, logger) = logger_on_uart(1);

    logger.log(
        &Record::builder()
            .args(format_args!("hello"))
            .level(Level::Info)
            .file(Some("x.rs"))
            .line(Some(3))
            .build(),
    );

    assert_eq!(drain(bus, instance), "INFO | x.rs:3 - hello\n");
}

#[test]
fn prefixes_follow_their_filters() {
    let (bus, instance, mut logger) = logger_on_uart(2);
    logger.display_level = LevelFilter::Error;
    logger.display_source = LevelFilter::Off;

    logger.log(
        &Record::builder()
            .args(format_args!("{} of {}", 1, 2))
            .level(Level::Warn)
            .file(Some("x.rs"))
            .line(Some(3))
            .build(),
    );
    logger.log(
        &Record::builder()
            .args(format_args!("bad"))
            .level(Level::Error)
            .build(),
    );

    assert_eq!(drain(bus, instance), "1 of 2\nERROR | bad\n");
}

#[test]
fn records_above_level_are_dropped() {
    let (bus, instance, logger) = logger_on_uart(3);
    assert!(!logger.enabled(&log::Metadata::builder().level(Level::Debug).build()));

    logger.log(
        &Record::builder()
            .args(format_args!("noise"))
            .level(Level::Debug)
            .build(),
    );

    assert_eq!(drain(bus, instance), "");
}

#[test]
fn no_uart_no_output() {
    let logger = UartLogger::<SimBus>::new();
    logger.log(
        &Record::builder()
            .args(format_args!("lost"))
            .level(Level::Error)
            .build(),
    );
}
