// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

//! Register access for the SPI and UART blocks of the user project.
//!
//! - [`memory_map`] resolves a peripheral instance and a register offset to a
//!   bus address, without touching the bus.
//! - [`Bus`] is the word read/write primitive every access goes through.
//! - [`Peripheral`] is the accessor shared by both kinds, specialised as
//!   [`Spi`] and [`Uart`].
//! - [`sim`] contains a transaction-level model of the user project for host
//!   side testing.

#![cfg_attr(not(test), no_std)]

pub mod bus;
pub mod memory_map;
pub mod peripheral;
pub mod register;
pub mod sim;
pub mod spi;
pub mod uart;

pub use bus::{Bus, Mmio};
pub use memory_map::{address, Instance, OutOfRange, PeripheralKind};
pub use peripheral::{Layout, Peripheral};
pub use register::Register;
pub use spi::{Spi, SpiLayout};
pub use uart::{Uart, UartLayout};
