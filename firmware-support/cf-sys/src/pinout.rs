// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

//! User GPIO assignment of the peripheral signals and the pad configurations
//! the sequences load.

use crate::management::{GpioMode, Management};

use GpioMode::{UserInputNoPull as In, UserOutputMonitored as Out};

/// TX pad of UART `index`.
pub const fn uart_tx_pin(index: u8) -> u8 {
    2 * index + 1
}

pub const fn spi_mosi_pin(index: u8) -> u8 {
    15 + 4 * index
}

pub const fn spi_sclk_pin(index: u8) -> u8 {
    16 + 4 * index
}

pub const fn spi_cs_pin(index: u8) -> u8 {
    17 + 4 * index
}

/// Pads of the integration test harness.
pub mod integration {
    pub const SPI_MOSI: u8 = 5;
    pub const SPI_MISO: u8 = 6;
    pub const SPI_SCLK: u8 = 7;
    pub const SPI_CSB: u8 = 8;
    pub const UART_TX: u8 = 9;
    pub const UART_RX: u8 = 10;
    pub const SPI_LED: u8 = 11;
    pub const UART_LED: u8 = 12;
    pub const SPI_EN: u8 = 13;
    pub const UART_EN: u8 = 14;
}

/// A pad configuration: an optional mode for every pad, then per-pad
/// overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinPlan {
    pub all: Option<GpioMode>,
    pub pins: &'static [(u8, GpioMode)],
    /// Connect the user project to the Wishbone bus.
    pub user_interface: bool,
}

impl PinPlan {
    /// Every pad an output, for register level tests.
    pub const ALL_OUTPUTS: PinPlan = PinPlan {
        all: Some(Out),
        pins: &[],
        user_interface: true,
    };

    /// Only the UART TX pads.
    pub const UART_TX: PinPlan = PinPlan {
        all: None,
        pins: &[
            (uart_tx_pin(0), Out),
            (uart_tx_pin(1), Out),
            (uart_tx_pin(2), Out),
            (uart_tx_pin(3), Out),
            (uart_tx_pin(4), Out),
            (uart_tx_pin(5), Out),
            (uart_tx_pin(6), Out),
        ],
        user_interface: true,
    };

    /// Signals of the integration harness.
    pub const INTEGRATION: PinPlan = PinPlan {
        all: Some(Out),
        pins: &[
            (integration::SPI_MOSI, Out),
            (integration::SPI_MISO, In),
            (integration::SPI_SCLK, Out),
            (integration::SPI_CSB, Out),
            (integration::UART_TX, Out),
            (integration::UART_RX, In),
            (integration::SPI_LED, Out),
            (integration::UART_LED, Out),
            (integration::SPI_EN, In),
            (integration::UART_EN, In),
            (32, Out),
            (33, Out),
            (34, Out),
            (35, Out),
            (36, Out),
            (37, Out),
        ],
        user_interface: false,
    };

    /// The integration signals without the monitor pads.
    pub const INTERRUPTS: PinPlan = PinPlan {
        all: Some(Out),
        pins: &[
            (integration::SPI_MOSI, Out),
            (integration::SPI_MISO, In),
            (integration::SPI_SCLK, Out),
            (integration::SPI_CSB, Out),
            (integration::UART_TX, Out),
            (integration::UART_RX, In),
            (integration::SPI_LED, Out),
            (integration::UART_LED, Out),
            (integration::SPI_EN, In),
            (integration::UART_EN, In),
        ],
        user_interface: false,
    };

    /// Stage and load this plan. Does not enable the user interface.
    pub fn apply<M: Management + ?Sized>(&self, mgmt: &mut M) {
        if let Some(mode) = self.all {
            mgmt.configure_all_gpios(mode);
        }
        for &(pin, mode) in self.pins {
            mgmt.configure_gpio(pin, mode);
        }
        mgmt.load_gpio_configs();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::management::SimManagement;

    #[test]
    fn spi_pins_do_not_overlap_uart_pins() {
        let uart: Vec<u8> = (0..7).map(uart_tx_pin).collect();
        assert_eq!(uart, [1, 3, 5, 7, 9, 11, 13]);
        for spi in 0..6 {
            for pin in [spi_mosi_pin(spi), spi_sclk_pin(spi), spi_cs_pin(spi)] {
                assert!(!uart.contains(&pin));
                assert!(pin < 38);
            }
        }
        assert_eq!(spi_cs_pin(5), 37);
    }

    #[test]
    fn integration_plan() {
        let mut mgmt = SimManagement::new();
        PinPlan::INTEGRATION.apply(&mut mgmt);
        assert_eq!(mgmt.mode(integration::SPI_MISO), Some(In));
        assert_eq!(mgmt.mode(integration::UART_EN), Some(In));
        assert_eq!(mgmt.mode(integration::UART_TX), Some(Out));
        assert_eq!(mgmt.mode(0), Some(Out));
        assert!(!mgmt.user_interface);
    }

    #[test]
    fn uart_plan_leaves_other_pads_alone() {
        let mut mgmt = SimManagement::new();
        PinPlan::UART_TX.apply(&mut mgmt);
        assert_eq!(mgmt.mode(13), Some(Out));
        assert_eq!(mgmt.mode(2), None);
    }
}
