// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

/*! Verification sequences run by the firmware images.

Each sequence brings up the management SoC, walks the configured peripheral
instances and reports through the management GPIO:

| Value       | Meaning                                  |
|-------------|------------------------------------------|
| `1`         | GPIO configuration loaded                |
| `2 + i`     | UART `i` passed                          |
| `9 + i`     | SPI `i` passed                           |
| `0`         | all checks passed                        |
| `0xFF`      | a check failed, nothing else is written  |

The UART transmit test ends with `1` instead of `0`.
*/

mod integration;
mod registers;
mod spi;
mod uart;

use core::fmt;

use cf_hal::{Bus, Instance, OutOfRange};
use log::{error, info};
use ufmt::derive::uDebug;

use crate::config::SequenceConfig;
use crate::management::Management;
use crate::pinout::PinPlan;
use crate::progress::{CONFIGURED, FAILURE};

pub use integration::{integration_bring_up, interrupt_bring_up};
pub use registers::{io_test, register_test, wishbone_test};
pub use spi::spi_test;
pub use uart::uart_test;

#[derive(uDebug, Debug, Copy, Clone, PartialEq, Eq)]
pub enum SequenceError {
    OutOfRange(OutOfRange),
    ControlMismatch {
        instance: Instance,
        expected: u32,
        actual: u32,
    },
    ConfigMismatch {
        instance: Instance,
        expected: u32,
        actual: u32,
    },
    ReadbackMismatch {
        address: u32,
        expected: u32,
        actual: u32,
    },
    TxLevel {
        instance: Instance,
        expected: u32,
        actual: u32,
    },
    RxLevel {
        instance: Instance,
        expected: u32,
        actual: u32,
    },
    StatusMissing {
        instance: Instance,
        status: u32,
    },
    TransmitTimeout {
        instance: Instance,
        level: u32,
    },
}

impl From<OutOfRange> for SequenceError {
    fn from(e: OutOfRange) -> Self {
        SequenceError::OutOfRange(e)
    }
}

impl fmt::Display for SequenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SequenceError::OutOfRange(e) => write!(f, "{e}"),
            SequenceError::ControlMismatch {
                instance,
                expected,
                actual,
            } => write!(f, "{instance}: CTRL is {actual:#x}, expected {expected:#x}"),
            SequenceError::ConfigMismatch {
                instance,
                expected,
                actual,
            } => write!(f, "{instance}: CFG is {actual:#x}, expected {expected:#x}"),
            SequenceError::ReadbackMismatch {
                address,
                expected,
                actual,
            } => write!(
                f,
                "read {actual:#010x} from {address:#010x}, wrote {expected:#010x}"
            ),
            SequenceError::TxLevel {
                instance,
                expected,
                actual,
            } => write!(f, "{instance}: TX level is {actual}, expected {expected}"),
            SequenceError::RxLevel {
                instance,
                expected,
                actual,
            } => write!(f, "{instance}: RX level is {actual}, expected {expected}"),
            SequenceError::StatusMissing { instance, status } => {
                write!(f, "{instance}: TX pending not set in status {status:#x}")
            }
            SequenceError::TransmitTimeout { instance, level } => {
                write!(f, "{instance}: transmission stuck at TX level {level}")
            }
        }
    }
}

/// The verification programs, one per firmware image.
#[derive(uDebug, Debug, Copy, Clone, PartialEq, Eq)]
pub enum Sequence {
    SpiTest,
    UartTest,
    RegisterTest,
    WishboneTest,
    IoTest,
    IntegrationBringUp,
    InterruptBringUp,
}

impl Sequence {
    pub const ALL: [Sequence; 7] = [
        Sequence::SpiTest,
        Sequence::UartTest,
        Sequence::RegisterTest,
        Sequence::WishboneTest,
        Sequence::IoTest,
        Sequence::IntegrationBringUp,
        Sequence::InterruptBringUp,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Sequence::SpiTest => "spi_test",
            Sequence::UartTest => "uart_test",
            Sequence::RegisterTest => "uart_spi_comprehensive_test",
            Sequence::WishboneTest => "uart_spi_wb_test",
            Sequence::IoTest => "uart_spi_io_test",
            Sequence::IntegrationBringUp => "spi_uart_wishbone",
            Sequence::InterruptBringUp => "spi_uart_interrupts",
        }
    }

    /// Run the sequence. On failure the error is logged and [`FAILURE`] is
    /// written to the management GPIO.
    pub fn run<B, M>(self, bus: &B, mgmt: &mut M, config: &SequenceConfig) -> Result<(), SequenceError>
    where
        B: Bus + ?Sized,
        M: Management + ?Sized,
    {
        info!("{}: start", self.name());
        let result = match self {
            Sequence::SpiTest => spi_test(bus, mgmt, config),
            Sequence::UartTest => uart_test(bus, mgmt, config),
            Sequence::RegisterTest => register_test(bus, mgmt, config),
            Sequence::WishboneTest => wishbone_test(bus, mgmt, config),
            Sequence::IoTest => io_test(bus, mgmt, config),
            Sequence::IntegrationBringUp => integration_bring_up(mgmt, config),
            Sequence::InterruptBringUp => interrupt_bring_up(mgmt, config),
        };
        match result {
            Ok(()) => info!("{}: passed", self.name()),
            Err(e) => {
                error!("{}: {e}", self.name());
                mgmt.gpio_write(FAILURE);
            }
        }
        result
    }
}

/// Prepare the management SoC for a test and report [`CONFIGURED`].
pub fn bring_up<M: Management + ?Sized>(mgmt: &mut M, plan: &PinPlan) {
    mgmt.gpio_output_enable();
    mgmt.gpio_write(0);
    mgmt.enable_housekeeping_spi(false);
    plan.apply(mgmt);
    if plan.user_interface {
        mgmt.enable_user_interface();
    }
    mgmt.gpio_write(CONFIGURED);
}

/// Busy wait for roughly `n` iterations.
pub fn spin(n: u32) {
    for _ in 0..n {
        core::hint::spin_loop();
    }
}

/// Write `value` to `address` and read it back.
fn write_read_back<B: Bus + ?Sized>(bus: &B, address: u32, value: u32) -> Result<(), SequenceError> {
    bus.write_word(address, value);
    let actual = bus.read_word(address);
    if actual == value {
        Ok(())
    } else {
        Err(SequenceError::ReadbackMismatch {
            address,
            expected: value,
            actual,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cf_hal::PeripheralKind;

    #[test]
    fn display_names_the_instance() {
        let e = SequenceError::ControlMismatch {
            instance: Instance::new(PeripheralKind::Spi, 3).unwrap(),
            expected: 0x7,
            actual: 0x5,
        };
        assert_eq!(e.to_string(), "SPI3: CTRL is 0x5, expected 0x7");
    }

    #[test]
    fn out_of_range_converts() {
        let e: SequenceError = Instance::new(PeripheralKind::Uart, 9).unwrap_err().into();
        assert!(matches!(e, SequenceError::OutOfRange(OutOfRange { index: 9, .. })));
    }

    #[test]
    fn sequence_names_are_unique() {
        for (i, a) in Sequence::ALL.iter().enumerate() {
            for b in &Sequence::ALL[i + 1..] {
                assert_ne!(a.name(), b.name());
            }
        }
    }
}
