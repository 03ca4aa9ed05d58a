// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

//! Services of the management SoC used to set up a test and report on it.

use heapless::Vec;
use ufmt::derive::uDebug;

/// Number of user project GPIOs.
pub const GPIO_COUNT: usize = 38;

/// Pad configuration of a user project GPIO.
#[derive(uDebug, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GpioMode {
    /// Driven by the user project, visible to the management core.
    UserOutputMonitored,
    /// Input to the user project without pull resistor.
    UserInputNoPull,
}

pub trait Management {
    /// Make the management GPIO an output.
    fn gpio_output_enable(&mut self);

    /// Drive the management GPIO, observed by the test harness.
    fn gpio_write(&mut self, value: u32);

    fn enable_housekeeping_spi(&mut self, enable: bool);

    /// Stage the mode of user GPIO `pin`. Takes effect on
    /// [`Management::load_gpio_configs`].
    fn configure_gpio(&mut self, pin: u8, mode: GpioMode);

    /// Stage `mode` for every user GPIO.
    fn configure_all_gpios(&mut self, mode: GpioMode);

    /// Shift the staged GPIO configuration into the pads.
    fn load_gpio_configs(&mut self);

    /// Connect the user project to the management Wishbone bus.
    fn enable_user_interface(&mut self);

    /// Drive bit `pin` of the lower 32 user GPIOs.
    fn write_gpio_low(&mut self, pin: u8, high: bool);
}

/// Host-side management SoC that records what a sequence did.
#[derive(Debug, Clone)]
pub struct SimManagement {
    pub output_enabled: bool,
    /// Every value written to the management GPIO, oldest first.
    pub history: Vec<u32, 64>,
    pub housekeeping_spi: Option<bool>,
    staged: [Option<GpioMode>; GPIO_COUNT],
    /// Pad modes after the last load.
    pub modes: [Option<GpioMode>; GPIO_COUNT],
    pub loads: u32,
    pub user_interface: bool,
    pub gpio_low: u32,
}

impl Default for SimManagement {
    fn default() -> Self {
        SimManagement {
            output_enabled: false,
            history: Vec::new(),
            housekeeping_spi: None,
            staged: [None; GPIO_COUNT],
            modes: [None; GPIO_COUNT],
            loads: 0,
            user_interface: false,
            gpio_low: 0,
        }
    }
}

impl SimManagement {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last value written to the management GPIO.
    pub fn last(&self) -> Option<u32> {
        self.history.last().copied()
    }

    pub fn mode(&self, pin: u8) -> Option<GpioMode> {
        self.modes.get(pin as usize).copied().flatten()
    }
}

impl Management for SimManagement {
    fn gpio_output_enable(&mut self) {
        self.output_enabled = true;
    }

    fn gpio_write(&mut self, value: u32) {
        if self.history.push(value).is_err() {
            log::warn!("management GPIO history full, dropped {value:#x}");
        }
    }

    fn enable_housekeeping_spi(&mut self, enable: bool) {
        self.housekeeping_spi = Some(enable);
    }

    fn configure_gpio(&mut self, pin: u8, mode: GpioMode) {
        match self.staged.get_mut(pin as usize) {
            Some(slot) => *slot = Some(mode),
            None => log::warn!("GPIO {pin} does not exist"),
        }
    }

    fn configure_all_gpios(&mut self, mode: GpioMode) {
        self.staged = [Some(mode); GPIO_COUNT];
    }

    fn load_gpio_configs(&mut self) {
        self.modes = self.staged;
        self.loads += 1;
    }

    fn enable_user_interface(&mut self) {
        self.user_interface = true;
    }

    fn write_gpio_low(&mut self, pin: u8, high: bool) {
        if pin >= 32 {
            log::warn!("GPIO {pin} is not in the lower word");
            return;
        }
        if high {
            self.gpio_low |= 1 << pin;
        } else {
            self.gpio_low &= !(1 << pin);
        }
    }
}
