// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

//! SPI master block.

use ufmt::derive::uDebug;

use crate::bus::Bus;
use crate::memory_map::PeripheralKind;
use crate::peripheral::{Layout, Peripheral};

pub const RXDATA: u32 = 0x00;
pub const TXDATA: u32 = 0x04;
pub const CFG: u32 = 0x08;
pub const CTRL: u32 = 0x0C;
pub const PR: u32 = 0x10;
pub const STATUS: u32 = 0x14;

/// Control bit 0: core enable.
pub const CTRL_ENABLE: u32 = 0x1;
/// Control bit 1: transmit enable.
pub const CTRL_TX_ENABLE: u32 = 0x2;
/// Control bit 2: receive enable.
pub const CTRL_RX_ENABLE: u32 = 0x4;

/// Shifter active.
pub const STATUS_BUSY: u32 = 1 << 0;
/// TX queue not empty.
pub const STATUS_TX_PENDING: u32 = 1 << 1;
/// RX queue not empty.
pub const STATUS_RX_AVAILABLE: u32 = 1 << 2;
pub const STATUS_TX_FULL: u32 = 1 << 3;
pub const STATUS_RX_FULL: u32 = 1 << 4;

pub struct SpiLayout;

impl Layout for SpiLayout {
    const KIND: PeripheralKind = PeripheralKind::Spi;

    const RX_DATA: u32 = RXDATA;
    const TX_DATA: u32 = TXDATA;
    const CONFIG: u32 = CFG;
    const CONTROL: u32 = CTRL;
    const PRESCALE: u32 = PR;

    const ENABLE: u32 = CTRL_ENABLE | CTRL_TX_ENABLE | CTRL_RX_ENABLE;
    const TX_ENABLE: u32 = CTRL_TX_ENABLE;
    const RX_ENABLE: u32 = CTRL_RX_ENABLE;
}

pub type Spi<'a, B> = Peripheral<'a, B, SpiLayout>;

/// Decoded view of the SPI status register.
#[derive(uDebug, Debug, Copy, Clone, PartialEq, Eq)]
pub struct SpiStatus(pub u32);

impl SpiStatus {
    pub const fn busy(self) -> bool {
        self.0 & STATUS_BUSY != 0
    }

    pub const fn tx_pending(self) -> bool {
        self.0 & STATUS_TX_PENDING != 0
    }

    pub const fn rx_available(self) -> bool {
        self.0 & STATUS_RX_AVAILABLE != 0
    }

    pub const fn tx_full(self) -> bool {
        self.0 & STATUS_TX_FULL != 0
    }

    pub const fn rx_full(self) -> bool {
        self.0 & STATUS_RX_FULL != 0
    }
}

impl<B: Bus + ?Sized> Peripheral<'_, B, SpiLayout> {
    /// Raw status bits.
    pub fn status(&self) -> u32 {
        self.read(STATUS)
    }

    pub fn read_status(&self) -> SpiStatus {
        SpiStatus(self.status())
    }
}
