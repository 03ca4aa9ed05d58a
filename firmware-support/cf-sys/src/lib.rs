// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

//! Verification sequences for the user project SPI and UART blocks, and the
//! management SoC services they rely on.

#![cfg_attr(not(test), no_std)]

#[cfg(feature = "caravel")]
pub mod caravel;
pub mod config;
pub mod management;
pub mod pinout;
pub mod progress;
pub mod sequences;
pub mod uart_log;

pub use config::{PeripheralSettings, SequenceConfig};
pub use management::{GpioMode, Management, SimManagement};
pub use sequences::{Sequence, SequenceError};
