// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

use cf_hal::{Bus, Layout, Uart, UartLayout};
use log::{debug, info};

use super::{bring_up, spin, SequenceError};
use crate::config::SequenceConfig;
use crate::management::Management;
use crate::pinout::PinPlan;
use crate::progress::CONFIGURED;

/// Configure every UART, transmit one byte and wait for it to leave the
/// queue.
pub fn uart_test<B, M>(bus: &B, mgmt: &mut M, config: &SequenceConfig) -> Result<(), SequenceError>
where
    B: Bus + ?Sized,
    M: Management + ?Sized,
{
    bring_up(mgmt, &PinPlan::UART_TX);

    let settings = config.uart;
    for index in config.uart_instances.clone() {
        let uart = Uart::new(bus, index)?;
        let instance = uart.instance();

        uart.configure(settings.config);
        uart.set_prescale(settings.prescale);
        uart.enable();
        uart.set_tx_threshold(settings.tx_threshold);
        uart.enable_tx();
        uart.flush_tx();
        uart.flush_rx();

        let control = uart.control();
        let cfg = uart.config();
        debug!("{instance}: CTRL {control:#x} CFG {cfg:#x}");
        if control != UartLayout::ENABLE {
            return Err(SequenceError::ControlMismatch {
                instance,
                expected: UartLayout::ENABLE,
                actual: control,
            });
        }
        if cfg != settings.config {
            return Err(SequenceError::ConfigMismatch {
                instance,
                expected: settings.config,
                actual: cfg,
            });
        }

        uart.send_char(b'A' + index);

        let level = uart.tx_level();
        if level != 1 {
            return Err(SequenceError::TxLevel {
                instance,
                expected: 1,
                actual: level,
            });
        }

        let mut polls = 0;
        while uart.tx_level() > 0 && polls < config.poll_limit {
            spin(config.poll_delay);
            polls += 1;
        }
        if polls >= config.poll_limit {
            return Err(SequenceError::TransmitTimeout {
                instance,
                level: uart.tx_level(),
            });
        }
        debug!("{instance}: drained after {polls} polls");

        let level = uart.tx_level();
        if level != 0 {
            return Err(SequenceError::TxLevel {
                instance,
                expected: 0,
                actual: level,
            });
        }
        info!("{instance}: ok");
    }

    // The harness of this test waits for the configured value again.
    mgmt.gpio_write(CONFIGURED);
    Ok(())
}
