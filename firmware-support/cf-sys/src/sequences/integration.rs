// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

use super::{bring_up, spin, SequenceError};
use crate::config::SequenceConfig;
use crate::management::Management;
use crate::pinout::{integration, PinPlan};
use crate::progress::DONE;

/// Configure the integration pads and let them settle. The harness drives the
/// peripherals from there.
pub fn integration_bring_up<M>(mgmt: &mut M, config: &SequenceConfig) -> Result<(), SequenceError>
where
    M: Management + ?Sized,
{
    bring_up(mgmt, &PinPlan::INTEGRATION);
    spin(config.settle_cycles);
    mgmt.gpio_write(DONE);
    Ok(())
}

/// Configure the integration pads and drive both peripheral enables high.
pub fn interrupt_bring_up<M>(mgmt: &mut M, _config: &SequenceConfig) -> Result<(), SequenceError>
where
    M: Management + ?Sized,
{
    bring_up(mgmt, &PinPlan::INTERRUPTS);
    mgmt.write_gpio_low(integration::SPI_EN, true);
    mgmt.write_gpio_low(integration::UART_EN, true);
    mgmt.gpio_write(DONE);
    Ok(())
}
