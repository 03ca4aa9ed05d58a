// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

//! UART block.

use ufmt::derive::uDebug;

use crate::bus::Bus;
use crate::memory_map::PeripheralKind;
use crate::peripheral::{Layout, Peripheral};
use crate::register::FIFO_DEPTH;

pub const RXDATA: u32 = 0x00;
pub const TXDATA: u32 = 0x04;
pub const PR: u32 = 0x08;
pub const CTRL: u32 = 0x0C;
pub const CFG: u32 = 0x10;
pub const MATCH: u32 = 0x18;

/// Control bit 0: transmit enable.
pub const CTRL_TX_ENABLE: u32 = 0x1;
/// Control bit 1: receive enable.
pub const CTRL_RX_ENABLE: u32 = 0x2;
pub const CTRL_ENABLE: u32 = 0x4;

pub struct UartLayout;

impl Layout for UartLayout {
    const KIND: PeripheralKind = PeripheralKind::Uart;

    const RX_DATA: u32 = RXDATA;
    const TX_DATA: u32 = TXDATA;
    const CONFIG: u32 = CFG;
    const CONTROL: u32 = CTRL;
    const PRESCALE: u32 = PR;

    const ENABLE: u32 = CTRL_ENABLE | CTRL_TX_ENABLE | CTRL_RX_ENABLE;
    const TX_ENABLE: u32 = CTRL_TX_ENABLE;
    const RX_ENABLE: u32 = CTRL_RX_ENABLE;
}

pub type Uart<'a, B> = Peripheral<'a, B, UartLayout>;

#[derive(uDebug, Debug, Copy, Clone, PartialEq, Eq)]
pub struct TransmitQueueFull;

#[derive(uDebug, Debug, Copy, Clone, PartialEq, Eq)]
pub struct ReceiveQueueEmpty;

impl<B: Bus + ?Sized> Peripheral<'_, B, UartLayout> {
    pub fn set_match(&self, value: u32) {
        self.write(MATCH, value);
    }

    pub fn match_value(&self) -> u32 {
        self.read(MATCH)
    }

    pub fn send_char(&self, c: u8) {
        self.send(c);
    }

    pub fn read_char(&self) -> u8 {
        self.receive()
    }

    /// Queue `data` for transmission unless the TX queue is full.
    pub fn try_send(&self, data: u8) -> Result<(), TransmitQueueFull> {
        if self.tx_level() >= FIFO_DEPTH {
            Err(TransmitQueueFull)
        } else {
            self.send(data);
            Ok(())
        }
    }

    /// Queue `data` for transmission, waiting for room in the TX queue.
    ///
    /// Never returns if transmission is disabled while the queue is full.
    pub fn send_blocking(&self, data: u8) {
        while self.try_send(data).is_err() {
            core::hint::spin_loop();
        }
    }

    /// Pop a byte from the RX queue if there is one.
    pub fn try_receive(&self) -> Result<u8, ReceiveQueueEmpty> {
        if self.rx_level() == 0 {
            Err(ReceiveQueueEmpty)
        } else {
            Ok(self.receive())
        }
    }
}

impl<B: Bus + ?Sized> ufmt::uWrite for Peripheral<'_, B, UartLayout> {
    type Error = ();

    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        for b in s.bytes() {
            self.send_blocking(b);
        }
        Ok(())
    }
}

impl<B: Bus + ?Sized> core::fmt::Write for Peripheral<'_, B, UartLayout> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        for b in s.bytes() {
            self.send_blocking(b);
        }
        Ok(())
    }
}
