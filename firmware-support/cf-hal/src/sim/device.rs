// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

use heapless::{Deque, Vec};

use crate::memory_map::{Instance, PeripheralKind};
use crate::peripheral::Layout;
use crate::register::Register;
use crate::spi::{
    SpiLayout, STATUS_BUSY, STATUS_RX_AVAILABLE, STATUS_RX_FULL, STATUS_TX_FULL,
    STATUS_TX_PENDING,
};
use crate::uart::UartLayout;

use super::Event;

/// Entries in each modelled queue.
pub const QUEUE_DEPTH: usize = 16;
/// Bytes of line output kept per device, older bytes are discarded first.
pub const LINE_CAPACITY: usize = 256;

/// Behavioural model of one peripheral instance.
pub(super) struct Device {
    pub(super) instance: Instance,
    control: u32,
    config: u32,
    prescale: u32,
    match_value: u32,
    rx_threshold: u32,
    tx_threshold: u32,
    interrupt_mask: u32,
    raw_interrupts: u32,
    tx: Deque<u8, QUEUE_DEPTH>,
    rx: Deque<u8, QUEUE_DEPTH>,
    /// Cycles left on the byte at the head of `tx`, 0 when idle.
    shifting: u32,
    pub(super) loopback: bool,
    line: Deque<u8, LINE_CAPACITY>,
}

impl Device {
    pub(super) fn new(instance: Instance) -> Device {
        Device {
            instance,
            control: 0,
            config: 0,
            prescale: 0,
            match_value: 0,
            rx_threshold: 0,
            tx_threshold: 0,
            interrupt_mask: 0,
            raw_interrupts: 0,
            tx: Deque::new(),
            rx: Deque::new(),
            shifting: 0,
            loopback: false,
            line: Deque::new(),
        }
    }

    fn kind(&self) -> PeripheralKind {
        self.instance.kind()
    }

    fn tx_enabled(&self) -> bool {
        let bit = match self.kind() {
            PeripheralKind::Spi => SpiLayout::TX_ENABLE,
            PeripheralKind::Uart => UartLayout::TX_ENABLE,
        };
        self.control & bit != 0
    }

    fn rx_enabled(&self) -> bool {
        let bit = match self.kind() {
            PeripheralKind::Spi => SpiLayout::RX_ENABLE,
            PeripheralKind::Uart => UartLayout::RX_ENABLE,
        };
        self.control & bit != 0
    }

    /// Cycles needed to shift out one byte at the current prescale.
    pub(super) fn frame_cycles(&self) -> u32 {
        let divided = self.prescale.saturating_add(1);
        match self.kind() {
            // 16x oversampling, start + 8 data + stop bits.
            PeripheralKind::Uart => divided.saturating_mul(16 * 10),
            // Two edges per bit.
            PeripheralKind::Spi => divided.saturating_mul(2 * 8),
        }
    }

    fn status(&self) -> u32 {
        let mut status = 0;
        if self.shifting != 0 {
            status |= STATUS_BUSY;
        }
        if !self.tx.is_empty() {
            status |= STATUS_TX_PENDING;
        }
        if !self.rx.is_empty() {
            status |= STATUS_RX_AVAILABLE;
        }
        if self.tx.is_full() {
            status |= STATUS_TX_FULL;
        }
        if self.rx.is_full() {
            status |= STATUS_RX_FULL;
        }
        status
    }

    /// Register value without read side effects.
    pub(super) fn peek(&self, register: Register) -> u32 {
        match register {
            Register::RxData => self.rx.front().copied().unwrap_or(0) as u32,
            Register::TxData => 0,
            Register::Config => self.config,
            Register::Control => self.control,
            Register::Prescale => self.prescale,
            Register::Status => self.status(),
            Register::Match => self.match_value,
            Register::RxLevel => self.rx.len() as u32,
            Register::RxThreshold => self.rx_threshold,
            Register::RxFlush => 0,
            Register::TxLevel => self.tx.len() as u32,
            Register::TxThreshold => self.tx_threshold,
            Register::TxFlush => 0,
            Register::InterruptMask => self.interrupt_mask,
            Register::MaskedInterruptStatus => self.raw_interrupts & self.interrupt_mask,
            Register::RawInterruptStatus => self.raw_interrupts,
            Register::InterruptClear => 0,
        }
    }

    pub(super) fn read(&mut self, register: Register) -> u32 {
        match register {
            Register::RxData => self.rx.pop_front().unwrap_or(0) as u32,
            _ => self.peek(register),
        }
    }

    pub(super) fn write(&mut self, register: Register, value: u32) -> Option<Event> {
        match register {
            Register::TxData => {
                if self.tx.push_back(value as u8).is_err() {
                    return Some(Event::TxDropped {
                        instance: self.instance,
                        data: value as u8,
                    });
                }
            }
            Register::Config => self.config = value,
            Register::Control => self.control = value,
            Register::Prescale => self.prescale = value,
            Register::Match => self.match_value = value,
            Register::RxThreshold => self.rx_threshold = value,
            Register::TxThreshold => self.tx_threshold = value,
            Register::RxFlush if value != 0 => self.rx.clear(),
            Register::TxFlush if value != 0 => {
                self.tx.clear();
                self.shifting = 0;
            }
            Register::InterruptMask => self.interrupt_mask = value,
            Register::InterruptClear => self.raw_interrupts &= !value,
            Register::RxData
            | Register::Status
            | Register::RxLevel
            | Register::RxFlush
            | Register::TxLevel
            | Register::TxFlush
            | Register::MaskedInterruptStatus
            | Register::RawInterruptStatus => {}
        }
        None
    }

    pub(super) fn raise(&mut self, bits: u32) {
        self.raw_interrupts |= bits;
    }

    /// Advance the shifter by one cycle.
    pub(super) fn tick(&mut self) -> Option<Event> {
        if !self.tx_enabled() || self.tx.is_empty() {
            return None;
        }
        if self.shifting == 0 {
            self.shifting = self.frame_cycles();
        }
        self.shifting -= 1;
        if self.shifting != 0 {
            return None;
        }
        let byte = self.tx.pop_front()?;
        self.transmitted(byte)
    }

    /// Put `byte` on the line and, with RX enabled, receive the answer.
    fn transmitted(&mut self, byte: u8) -> Option<Event> {
        if self.line.is_full() {
            self.line.pop_front();
        }
        // Cannot fail, there is room after the pop above.
        let _ = self.line.push_back(byte);

        if !self.rx_enabled() {
            return None;
        }
        let received = match (self.loopback, self.kind()) {
            (true, _) => Some(byte),
            (false, PeripheralKind::Spi) => Some(0xFF),
            (false, PeripheralKind::Uart) => None,
        };
        self.rx.push_back(received?).err().map(|_| Event::RxOverrun {
            instance: self.instance,
        })
    }

    pub(super) fn take_line(&mut self) -> Vec<u8, LINE_CAPACITY> {
        let mut out = Vec::new();
        while let Some(byte) = self.line.pop_front() {
            // Same capacity as `line`.
            let _ = out.push(byte);
        }
        out
    }
}
