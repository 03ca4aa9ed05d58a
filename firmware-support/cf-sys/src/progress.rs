// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

//! Values written to the management GPIO for the external test harness.

/// Bring-up finished, peripheral checks follow.
pub const CONFIGURED: u32 = 1;
/// Every check passed.
pub const DONE: u32 = 0;
/// A check failed. No further values are written.
pub const FAILURE: u32 = 0xFF;

/// UART instance `index` passed its checks.
pub const fn uart_done(index: u8) -> u32 {
    index as u32 + 2
}

/// SPI instance `index` passed its checks.
pub const fn spi_done(index: u8) -> u32 {
    index as u32 + 9
}
