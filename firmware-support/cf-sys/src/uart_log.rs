// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

// Records are formatted with core::fmt, log::Record carries fmt::Arguments
// which ufmt cannot render.
use core::fmt::Write;

use cf_hal::{Bus, Uart};
use log::LevelFilter;

/// A `log` backend writing to one of the user project UARTs.
///
/// Create it in a `static mut`, hand it a UART with [`UartLogger::set_uart`]
/// and register it with `log::set_logger`.
///
/// # Safety
///
/// Using this logger is only safe if there is only one thread of execution.
/// Even though `UartLogger` is `Send` and `Sync`, the underlying bus usually is
/// not.
pub struct UartLogger<B: Bus + 'static> {
    uart: Option<Uart<'static, B>>,
    /// Records up to this level are written.
    pub level: LevelFilter,
    /// Records up to this level are prefixed with their level.
    pub display_level: LevelFilter,
    /// Records up to this level are prefixed with `file:line`.
    pub display_source: LevelFilter,
}

impl<B: Bus + 'static> UartLogger<B> {
    pub const fn new() -> Self {
        UartLogger {
            uart: None,
            level: LevelFilter::Info,
            display_level: LevelFilter::Trace,
            display_source: LevelFilter::Trace,
        }
    }

    /// Send records to `uart`.
    ///
    /// # Safety
    ///
    /// Only safe with a single thread of execution, see [`UartLogger`].
    pub unsafe fn set_uart(&mut self, uart: Uart<'static, B>) {
        self.uart = Some(uart);
    }
}

impl<B: Bus + 'static> Default for UartLogger<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Bus + 'static> log::Log for UartLogger<B> {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        // Nothing to do before a UART is set.
        let Some(mut uart) = self.uart else { return };

        // Writing to a UART cannot fail.
        if record.level() <= self.display_level {
            let _ = write!(uart, "{} | ", record.level());
        }
        if record.level() <= self.display_source {
            let _ = write!(
                uart,
                "{}:{} - ",
                record.file().unwrap_or("?"),
                record.line().unwrap_or(0)
            );
        }
        let _ = writeln!(uart, "{}", record.args());
    }

    fn flush(&self) {}
}

unsafe impl<B: Bus + 'static> core::marker::Send for UartLogger<B> {}
unsafe impl<B: Bus + 'static> core::marker::Sync for UartLogger<B> {}
