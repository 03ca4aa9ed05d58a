// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

use cf_hal::spi::STATUS_TX_PENDING;
use cf_hal::{Bus, Layout, Spi, SpiLayout};
use log::{debug, info};

use super::{bring_up, SequenceError};
use crate::config::SequenceConfig;
use crate::management::Management;
use crate::pinout::PinPlan;
use crate::progress::{spi_done, DONE};

/// Configure every SPI, queue one byte and check it is pending.
pub fn spi_test<B, M>(bus: &B, mgmt: &mut M, config: &SequenceConfig) -> Result<(), SequenceError>
where
    B: Bus + ?Sized,
    M: Management + ?Sized,
{
    bring_up(mgmt, &PinPlan::ALL_OUTPUTS);

    let settings = config.spi;
    for index in config.spi_instances.clone() {
        let spi = Spi::new(bus, index)?;
        let instance = spi.instance();

        spi.configure(settings.config);
        spi.set_prescale(settings.prescale);
        spi.enable();
        spi.set_tx_threshold(settings.tx_threshold);
        spi.enable_tx();
        spi.flush_tx();
        spi.flush_rx();

        let control = spi.control();
        let cfg = spi.config();
        debug!("{instance}: CTRL {control:#x} CFG {cfg:#x}");
        if control != SpiLayout::ENABLE {
            return Err(SequenceError::ControlMismatch {
                instance,
                expected: SpiLayout::ENABLE,
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

        spi.send(b'A' + index);

        let level = spi.tx_level();
        if level != 1 {
            return Err(SequenceError::TxLevel {
                instance,
                expected: 1,
                actual: level,
            });
        }

        let status = spi.status();
        if status & STATUS_TX_PENDING == 0 {
            return Err(SequenceError::StatusMissing { instance, status });
        }

        info!("{instance}: ok");
        mgmt.gpio_write(spi_done(index));
    }

    mgmt.gpio_write(DONE);
    Ok(())
}
