#![no_std]
#![cfg_attr(not(test), no_main)]
// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

//! Pad setup for the interrupt harness, with both enables driven.

use cf_hal::Mmio;
use cf_sys::caravel::{mgmt_gpio_write, FirmwareApi};
use cf_sys::progress::FAILURE;
use cf_sys::{Sequence, SequenceConfig};

#[cfg(not(test))]
use riscv_rt::entry;

#[cfg_attr(not(test), entry)]
fn main() -> ! {
    // SAFETY: The user project occupies the peripheral windows.
    let bus = unsafe { Mmio::new() };
    // SAFETY: The only instance.
    let mut mgmt = unsafe { FirmwareApi::new() };

    // The result is on the management GPIO already.
    let _ = Sequence::InterruptBringUp.run(&bus, &mut mgmt, &SequenceConfig::default());

    loop {
        continue;
    }
}

#[panic_handler]
fn panic_handler(_info: &core::panic::PanicInfo) -> ! {
    mgmt_gpio_write(FAILURE);
    loop {
        continue;
    }
}
