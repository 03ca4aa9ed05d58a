// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

//! Register layouts of both peripheral kinds.
//!
//! The core registers differ per kind (see [`crate::spi`] and [`crate::uart`]),
//! the queue and interrupt registers are shared.

use ufmt::derive::uDebug;

use crate::memory_map::{PeripheralKind, QUEUE_OFFSET};
use crate::{spi, uart};

pub const RX_FIFO_LEVEL: u32 = QUEUE_OFFSET;
pub const RX_FIFO_THRESHOLD: u32 = 0x4004;
pub const RX_FIFO_FLUSH: u32 = 0x4008;
pub const TX_FIFO_LEVEL: u32 = 0x400C;
pub const TX_FIFO_THRESHOLD: u32 = 0x4010;
pub const TX_FIFO_FLUSH: u32 = 0x4014;
/// Interrupt mask.
pub const IM: u32 = 0x4040;
/// Masked interrupt status.
pub const MIS: u32 = 0x4044;
/// Raw interrupt status.
pub const RIS: u32 = 0x4048;
/// Interrupt clear.
pub const IC: u32 = 0x404C;

/// Value written to a flush register to empty its queue.
pub const FLUSH: u32 = 0x1;
/// Number of entries in each queue.
pub const FIFO_DEPTH: u32 = 16;

#[derive(uDebug, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Register {
    RxData,
    TxData,
    Config,
    Control,
    Prescale,
    /// SPI only.
    Status,
    /// UART only.
    Match,
    RxLevel,
    RxThreshold,
    RxFlush,
    TxLevel,
    TxThreshold,
    TxFlush,
    InterruptMask,
    MaskedInterruptStatus,
    RawInterruptStatus,
    InterruptClear,
}

const SPI_LAYOUT: [(Register, u32); 16] = [
    (Register::RxData, spi::RXDATA),
    (Register::TxData, spi::TXDATA),
    (Register::Config, spi::CFG),
    (Register::Control, spi::CTRL),
    (Register::Prescale, spi::PR),
    (Register::Status, spi::STATUS),
    (Register::RxLevel, RX_FIFO_LEVEL),
    (Register::RxThreshold, RX_FIFO_THRESHOLD),
    (Register::RxFlush, RX_FIFO_FLUSH),
    (Register::TxLevel, TX_FIFO_LEVEL),
    (Register::TxThreshold, TX_FIFO_THRESHOLD),
    (Register::TxFlush, TX_FIFO_FLUSH),
    (Register::InterruptMask, IM),
    (Register::MaskedInterruptStatus, MIS),
    (Register::RawInterruptStatus, RIS),
    (Register::InterruptClear, IC),
];

const UART_LAYOUT: [(Register, u32); 16] = [
    (Register::RxData, uart::RXDATA),
    (Register::TxData, uart::TXDATA),
    (Register::Prescale, uart::PR),
    (Register::Control, uart::CTRL),
    (Register::Config, uart::CFG),
    (Register::Match, uart::MATCH),
    (Register::RxLevel, RX_FIFO_LEVEL),
    (Register::RxThreshold, RX_FIFO_THRESHOLD),
    (Register::RxFlush, RX_FIFO_FLUSH),
    (Register::TxLevel, TX_FIFO_LEVEL),
    (Register::TxThreshold, TX_FIFO_THRESHOLD),
    (Register::TxFlush, TX_FIFO_FLUSH),
    (Register::InterruptMask, IM),
    (Register::MaskedInterruptStatus, MIS),
    (Register::RawInterruptStatus, RIS),
    (Register::InterruptClear, IC),
];

/// The registers of `kind` with their offsets, in offset order.
pub const fn layout(kind: PeripheralKind) -> &'static [(Register, u32)] {
    match kind {
        PeripheralKind::Spi => &SPI_LAYOUT,
        PeripheralKind::Uart => &UART_LAYOUT,
    }
}

/// Iterate the registers of `kind` with their offsets.
pub fn registers(kind: PeripheralKind) -> impl Iterator<Item = (Register, u32)> {
    layout(kind).iter().copied()
}

impl Register {
    /// Offset of this register for `kind`, `None` if `kind` lacks it.
    pub fn offset(self, kind: PeripheralKind) -> Option<u32> {
        registers(kind)
            .find(|(register, _)| *register == self)
            .map(|(_, offset)| offset)
    }

    /// The register of `kind` at `offset`, if any.
    pub fn from_offset(kind: PeripheralKind, offset: u32) -> Option<Register> {
        registers(kind)
            .find(|(_, o)| *o == offset)
            .map(|(register, _)| register)
    }

    /// Whether this is one of the queue/interrupt registers above
    /// [`QUEUE_OFFSET`].
    pub const fn is_queue(self) -> bool {
        !matches!(
            self,
            Register::RxData
                | Register::TxData
                | Register::Config
                | Register::Control
                | Register::Prescale
                | Register::Status
                | Register::Match
        )
    }

    /// Short register name as used in the peripheral register descriptions.
    pub const fn name(self) -> &'static str {
        match self {
            Register::RxData => "RXDATA",
            Register::TxData => "TXDATA",
            Register::Config => "CFG",
            Register::Control => "CTRL",
            Register::Prescale => "PR",
            Register::Status => "STATUS",
            Register::Match => "MATCH",
            Register::RxLevel => "RX_FIFO_LEVEL",
            Register::RxThreshold => "RX_FIFO_THRESHOLD",
            Register::RxFlush => "RX_FIFO_FLUSH",
            Register::TxLevel => "TX_FIFO_LEVEL",
            Register::TxThreshold => "TX_FIFO_THRESHOLD",
            Register::TxFlush => "TX_FIFO_FLUSH",
            Register::InterruptMask => "IM",
            Register::MaskedInterruptStatus => "MIS",
            Register::RawInterruptStatus => "RIS",
            Register::InterruptClear => "IC",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Register::RxData => "Receive data",
            Register::TxData => "Transmit data",
            Register::Config => "Configuration",
            Register::Control => "Control",
            Register::Prescale => "Prescale",
            Register::Status => "Status",
            Register::Match => "Match",
            Register::RxLevel => "RX queue level",
            Register::RxThreshold => "RX queue threshold",
            Register::RxFlush => "RX queue flush",
            Register::TxLevel => "TX queue level",
            Register::TxThreshold => "TX queue threshold",
            Register::TxFlush => "TX queue flush",
            Register::InterruptMask => "Interrupt mask",
            Register::MaskedInterruptStatus => "Masked interrupt status",
            Register::RawInterruptStatus => "Raw interrupt status",
            Register::InterruptClear => "Interrupt clear",
        }
    }
}
