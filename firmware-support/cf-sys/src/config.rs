// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

use core::ops::Range;

use cf_hal::PeripheralKind;
use ufmt::derive::uDebug;

/// Values a sequence programs into every instance of a kind.
#[derive(uDebug, Debug, Copy, Clone, PartialEq, Eq)]
pub struct PeripheralSettings {
    pub config: u32,
    pub prescale: u32,
    pub tx_threshold: u32,
}

impl PeripheralSettings {
    /// SPI mode 0 (CPOL = 0, CPHA = 0).
    pub const SPI: PeripheralSettings = PeripheralSettings {
        config: 0x0,
        prescale: 0x2,
        tx_threshold: 3,
    };

    /// 8 data bits, 1 stop bit, no parity.
    pub const UART: PeripheralSettings = PeripheralSettings {
        config: 0x70,
        prescale: 0x1,
        tx_threshold: 3,
    };
}

/// Parameters of the verification sequences.
///
/// [`SequenceConfig::default`] gives the values the harness expects. The
/// instance ranges can be narrowed to run against a subset of the peripherals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceConfig {
    pub spi: PeripheralSettings,
    pub uart: PeripheralSettings,
    /// SPI instances to exercise.
    pub spi_instances: Range<u8>,
    /// UART instances to exercise.
    pub uart_instances: Range<u8>,
    /// Polls of the TX queue level before a transmission counts as stuck.
    pub poll_limit: u32,
    /// Spins between two polls.
    pub poll_delay: u32,
    /// Spins after the GPIO configuration is loaded.
    pub settle_cycles: u32,
    /// Address without a peripheral behind it.
    pub probe_address: u32,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        SequenceConfig {
            spi: PeripheralSettings::SPI,
            uart: PeripheralSettings::UART,
            spi_instances: 0..PeripheralKind::Spi.instance_count(),
            uart_instances: 0..PeripheralKind::Uart.instance_count(),
            poll_limit: 10_000,
            poll_delay: 100,
            settle_cycles: 1000,
            probe_address: 0x3000_D000,
        }
    }
}

impl SequenceConfig {
    pub fn with_spi_instances(mut self, instances: Range<u8>) -> Self {
        self.spi_instances = instances;
        self
    }

    pub fn with_uart_instances(mut self, instances: Range<u8>) -> Self {
        self.uart_instances = instances;
        self
    }

    pub fn with_poll_limit(mut self, poll_limit: u32) -> Self {
        self.poll_limit = poll_limit;
        self
    }

    pub fn with_poll_delay(mut self, poll_delay: u32) -> Self {
        self.poll_delay = poll_delay;
        self
    }

    pub fn with_settle_cycles(mut self, settle_cycles: u32) -> Self {
        self.settle_cycles = settle_cycles;
        self
    }

    pub fn settings(&self, kind: PeripheralKind) -> PeripheralSettings {
        match kind {
            PeripheralKind::Spi => self.spi,
            PeripheralKind::Uart => self.uart,
        }
    }
}
