// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

//! Register level sequences: read-back, address decoding and queue reset
//! values.

use cf_hal::spi::CTRL as SPI_CTRL;
use cf_hal::uart::CTRL as UART_CTRL;
use cf_hal::{Bus, Layout, Peripheral, Spi, SpiLayout, Uart, UartLayout};
use log::{debug, info};

use super::{bring_up, write_read_back, SequenceError};
use crate::config::SequenceConfig;
use crate::management::Management;
use crate::pinout::{spi_cs_pin, spi_mosi_pin, spi_sclk_pin, uart_tx_pin, PinPlan};
use crate::progress::{spi_done, uart_done, DONE};

/// Control read-back, configuration, address decoding, queue levels and an
/// access to an unmapped address.
pub fn register_test<B, M>(bus: &B, mgmt: &mut M, config: &SequenceConfig) -> Result<(), SequenceError>
where
    B: Bus + ?Sized,
    M: Management + ?Sized,
{
    bring_up(mgmt, &PinPlan::ALL_OUTPUTS);

    let settings = config.uart;
    for index in config.uart_instances.clone() {
        let uart = Uart::new(bus, index)?;
        write_read_back(
            bus,
            uart.instance().address(UART_CTRL),
            0x1234_5678 + index as u32,
        )?;

        uart.configure(settings.config);
        uart.set_prescale(settings.prescale);
        uart.enable();
        uart.set_tx_threshold(settings.tx_threshold);
        uart.enable_tx();

        let cfg = uart.config();
        if cfg != settings.config {
            return Err(SequenceError::ConfigMismatch {
                instance: uart.instance(),
                expected: settings.config,
                actual: cfg,
            });
        }

        uart.flush_tx();
        uart.flush_rx();
        mgmt.gpio_write(uart_done(index));
    }

    let settings = config.spi;
    for index in config.spi_instances.clone() {
        let spi = Spi::new(bus, index)?;
        write_read_back(
            bus,
            spi.instance().address(SPI_CTRL),
            0x8765_4321 + index as u32,
        )?;

        spi.configure(settings.config);
        spi.set_prescale(settings.prescale);
        spi.enable();
        spi.set_tx_threshold(settings.tx_threshold);
        spi.enable_tx();

        let cfg = spi.config();
        if cfg != settings.config {
            return Err(SequenceError::ConfigMismatch {
                instance: spi.instance(),
                expected: settings.config,
                actual: cfg,
            });
        }

        spi.flush_tx();
        spi.flush_rx();
        mgmt.gpio_write(spi_done(index));
    }
    info!("register access ok");

    // Every instance answers at its own address only.
    for index in config.uart_instances.clone() {
        let uart = Uart::new(bus, index)?;
        write_read_back(bus, uart.instance().address(UART_CTRL), 0x7 + index as u32)?;
    }
    for index in config.spi_instances.clone() {
        let spi = Spi::new(bus, index)?;
        write_read_back(bus, spi.instance().address(SPI_CTRL), 0x7 + index as u32)?;
    }
    info!("address decoding ok");

    for index in config.uart_instances.clone() {
        expect_empty(Uart::new(bus, index)?)?;
    }
    for index in config.spi_instances.clone() {
        expect_empty(Spi::new(bus, index)?)?;
    }
    info!("queue levels ok");

    // Nothing answers here. The access must merely complete.
    bus.write_word(config.probe_address, 0x1234_5678);
    let probe = bus.read_word(config.probe_address);
    debug!("probe {:#010x} read {probe:#010x}", config.probe_address);

    mgmt.gpio_write(DONE);
    Ok(())
}

fn expect_empty<B: Bus + ?Sized, L: Layout>(
    peripheral: Peripheral<'_, B, L>,
) -> Result<(), SequenceError> {
    let instance = peripheral.instance();
    let tx = peripheral.tx_level();
    if tx != 0 {
        return Err(SequenceError::TxLevel {
            instance,
            expected: 0,
            actual: tx,
        });
    }
    let rx = peripheral.rx_level();
    if rx != 0 {
        return Err(SequenceError::RxLevel {
            instance,
            expected: 0,
            actual: rx,
        });
    }
    Ok(())
}

/// Program every instance over the bus and log the read-back without checking
/// it.
pub fn wishbone_test<B, M>(bus: &B, mgmt: &mut M, config: &SequenceConfig) -> Result<(), SequenceError>
where
    B: Bus + ?Sized,
    M: Management + ?Sized,
{
    bring_up(mgmt, &PinPlan::ALL_OUTPUTS);

    for index in config.uart_instances.clone() {
        let uart = Uart::new(bus, index)?;
        uart.set_control(UartLayout::ENABLE);
        uart.configure(config.uart.config);
        uart.set_prescale(config.uart.prescale);
        debug!(
            "{}: CTRL {:#x} CFG {:#x}",
            uart.instance(),
            uart.control(),
            uart.config()
        );
        mgmt.gpio_write(uart_done(index));
    }

    for index in config.spi_instances.clone() {
        let spi = Spi::new(bus, index)?;
        spi.set_control(SpiLayout::ENABLE);
        spi.configure(config.spi.config);
        spi.set_prescale(config.spi.prescale);
        debug!(
            "{}: CTRL {:#x} CFG {:#x}",
            spi.instance(),
            spi.control(),
            spi.config()
        );
        mgmt.gpio_write(spi_done(index));
    }

    mgmt.gpio_write(DONE);
    Ok(())
}

/// Enable every instance so the harness can watch its pads.
pub fn io_test<B, M>(bus: &B, mgmt: &mut M, config: &SequenceConfig) -> Result<(), SequenceError>
where
    B: Bus + ?Sized,
    M: Management + ?Sized,
{
    bring_up(mgmt, &PinPlan::ALL_OUTPUTS);

    for index in config.uart_instances.clone() {
        let uart = Uart::new(bus, index)?;
        uart.set_control(UartLayout::ENABLE);
        info!("{}: TX on pad {}", uart.instance(), uart_tx_pin(index));
        mgmt.gpio_write(uart_done(index));
    }

    for index in config.spi_instances.clone() {
        let spi = Spi::new(bus, index)?;
        spi.set_control(SpiLayout::ENABLE);
        info!(
            "{}: MOSI/SCLK/CS on pads {}/{}/{}",
            spi.instance(),
            spi_mosi_pin(index),
            spi_sclk_pin(index),
            spi_cs_pin(index)
        );
        mgmt.gpio_write(spi_done(index));
    }

    mgmt.gpio_write(DONE);
    Ok(())
}
