// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

//! Bindings to the firmware API of the management SoC, through the wrappers in
//! `csrc/firmware_apis_shim.c`.

use crate::management::{GpioMode, Management};

extern "C" {
    static CF_GPIO_MODE_USER_STD_OUT_MONITORED: u32;
    static CF_GPIO_MODE_USER_STD_INPUT_NOPULL: u32;

    fn cf_mgmt_gpio_output_enable();
    fn cf_mgmt_gpio_write(data: u32);
    fn cf_enable_hk_spi(enable: u32);
    fn cf_gpios_configure(pin: u32, mode: u32);
    fn cf_gpios_configure_all(mode: u32);
    fn cf_gpios_load_configs();
    fn cf_user_enable_if();
    fn cf_gpios_write_low(data: u32);
}

fn mode_bits(mode: GpioMode) -> u32 {
    // SAFETY: Plain constants defined by the shim.
    unsafe {
        match mode {
            GpioMode::UserOutputMonitored => CF_GPIO_MODE_USER_STD_OUT_MONITORED,
            GpioMode::UserInputNoPull => CF_GPIO_MODE_USER_STD_INPUT_NOPULL,
        }
    }
}

/// Drive the management GPIO. Holds no state, so it is usable from a panic
/// handler while a [`FirmwareApi`] exists.
pub fn mgmt_gpio_write(value: u32) {
    unsafe { cf_mgmt_gpio_write(value) }
}

/// The management SoC services, through its firmware API.
pub struct FirmwareApi {
    /// Last value written to the lower user GPIO word.
    gpio_low: u32,
}

impl FirmwareApi {
    /// # Safety
    ///
    /// Only one [`FirmwareApi`] may exist. It keeps a copy of the lower user
    /// GPIO word, a second instance would overwrite the pads driven by the
    /// first.
    pub const unsafe fn new() -> FirmwareApi {
        FirmwareApi { gpio_low: 0 }
    }
}

impl Management for FirmwareApi {
    fn gpio_output_enable(&mut self) {
        unsafe { cf_mgmt_gpio_output_enable() }
    }

    fn gpio_write(&mut self, value: u32) {
        mgmt_gpio_write(value);
    }

    fn enable_housekeeping_spi(&mut self, enable: bool) {
        unsafe { cf_enable_hk_spi(enable as u32) }
    }

    fn configure_gpio(&mut self, pin: u8, mode: GpioMode) {
        unsafe { cf_gpios_configure(pin as u32, mode_bits(mode)) }
    }

    fn configure_all_gpios(&mut self, mode: GpioMode) {
        unsafe { cf_gpios_configure_all(mode_bits(mode)) }
    }

    fn load_gpio_configs(&mut self) {
        unsafe { cf_gpios_load_configs() }
    }

    fn enable_user_interface(&mut self) {
        unsafe { cf_user_enable_if() }
    }

    fn write_gpio_low(&mut self, pin: u8, high: bool) {
        if pin >= 32 {
            return;
        }
        if high {
            self.gpio_low |= 1 << pin;
        } else {
            self.gpio_low &= !(1 << pin);
        }
        unsafe { cf_gpios_write_low(self.gpio_low) }
    }
}
