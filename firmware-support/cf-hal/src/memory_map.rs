// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

/*! Address resolution for the user project peripherals.

Every peripheral kind occupies a contiguous run of 4 KiB instance windows:

| Kind | Instances | Base of instance `i`          |
|------|-----------|-------------------------------|
| UART | 7         | `0x3000_0000 + i * 0x1000`    |
| SPI  | 6         | `0x3000_7000 + i * 0x1000`    |

A register lives at `base + offset`. Resolution is pure arithmetic, so it can
be used without a bus.
*/

use core::fmt;
use core::ops::Range;

use ufmt::derive::uDebug;
use ufmt::{uDisplay, uWrite, uwrite};

/// Base address of UART instance 0.
pub const UART_BASE: u32 = 0x3000_0000;
/// Base address of SPI instance 0.
pub const SPI_BASE: u32 = 0x3000_7000;
/// Distance between the bases of two consecutive instances of a kind.
pub const INSTANCE_STRIDE: u32 = 0x1000;
/// Offsets at or above this value address the queue registers.
pub const QUEUE_OFFSET: u32 = 0x4000;

#[derive(uDebug, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PeripheralKind {
    Spi,
    Uart,
}

impl PeripheralKind {
    /// All kinds, in address order.
    pub const ALL: [PeripheralKind; 2] = [PeripheralKind::Uart, PeripheralKind::Spi];

    /// Base address of instance 0.
    pub const fn base(self) -> u32 {
        match self {
            PeripheralKind::Spi => SPI_BASE,
            PeripheralKind::Uart => UART_BASE,
        }
    }

    /// Number of instances of this kind in the user project.
    pub const fn instance_count(self) -> u8 {
        match self {
            PeripheralKind::Spi => 6,
            PeripheralKind::Uart => 7,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            PeripheralKind::Spi => "SPI",
            PeripheralKind::Uart => "UART",
        }
    }
}

impl fmt::Display for PeripheralKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl uDisplay for PeripheralKind {
    fn fmt<W>(&self, f: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        f.write_str(self.name())
    }
}

/// An instance index that does not exist for its kind.
#[derive(uDebug, Debug, Copy, Clone, PartialEq, Eq)]
pub struct OutOfRange {
    pub kind: PeripheralKind,
    pub index: u8,
}

impl fmt::Display for OutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} index {} out of range, there are {} instances",
            self.kind,
            self.index,
            self.kind.instance_count()
        )
    }
}

/// One physical copy of a peripheral kind.
#[derive(uDebug, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Instance {
    kind: PeripheralKind,
    index: u8,
}

impl Instance {
    /// Select instance `index` of `kind`.
    pub const fn new(kind: PeripheralKind, index: u8) -> Result<Instance, OutOfRange> {
        if index < kind.instance_count() {
            Ok(Instance { kind, index })
        } else {
            Err(OutOfRange { kind, index })
        }
    }

    pub const fn kind(self) -> PeripheralKind {
        self.kind
    }

    pub const fn index(self) -> u8 {
        self.index
    }

    /// Base address of this instance.
    pub const fn base(self) -> u32 {
        self.kind.base() + self.index as u32 * INSTANCE_STRIDE
    }

    /// Address of the register at `offset`.
    ///
    /// Wraps around the 32-bit address space for offsets no register uses.
    pub const fn address(self, offset: u32) -> u32 {
        self.base().wrapping_add(offset)
    }

    /// The 4 KiB window starting at the base of this instance.
    pub const fn window(self) -> Range<u32> {
        self.base()..self.base() + INSTANCE_STRIDE
    }

    /// Find the instance whose window contains `address`, together with the
    /// offset of `address` within that window.
    pub fn containing(address: u32) -> Option<(Instance, u32)> {
        all_instances()
            .find(|instance| instance.window().contains(&address))
            .map(|instance| (instance, address - instance.base()))
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind, self.index)
    }
}

impl uDisplay for Instance {
    fn fmt<W>(&self, f: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        uwrite!(f, "{}{}", self.kind, self.index)
    }
}

/// Resolve register `offset` of instance `index` of `kind` to a bus address.
pub fn address(kind: PeripheralKind, index: u8, offset: u32) -> Result<u32, OutOfRange> {
    Ok(Instance::new(kind, index)?.address(offset))
}

/// Every instance of `kind`, in index order.
pub fn instances(kind: PeripheralKind) -> impl Iterator<Item = Instance> {
    (0..kind.instance_count()).map(move |index| Instance { kind, index })
}

/// Every instance of every kind, in address order.
pub fn all_instances() -> impl Iterator<Item = Instance> {
    PeripheralKind::ALL.into_iter().flat_map(instances)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_bases() {
        let uart_bases: Vec<u32> = instances(PeripheralKind::Uart)
            .map(Instance::base)
            .collect();
        assert_eq!(
            uart_bases,
            [
                0x3000_0000,
                0x3000_1000,
                0x3000_2000,
                0x3000_3000,
                0x3000_4000,
                0x3000_5000,
                0x3000_6000
            ]
        );

        let spi_bases: Vec<u32> = instances(PeripheralKind::Spi)
            .map(Instance::base)
            .collect();
        assert_eq!(
            spi_bases,
            [
                0x3000_7000,
                0x3000_8000,
                0x3000_9000,
                0x3000_A000,
                0x3000_B000,
                0x3000_C000
            ]
        );
    }

    #[test]
    fn out_of_range_index() {
        assert_eq!(
            address(PeripheralKind::Spi, 6, 0x0C),
            Err(OutOfRange {
                kind: PeripheralKind::Spi,
                index: 6
            })
        );
        assert!(address(PeripheralKind::Uart, 7, 0).is_err());
        assert_eq!(address(PeripheralKind::Uart, 6, 0x0C), Ok(0x3000_600C));
    }

    #[test]
    fn windows_do_not_overlap() {
        let all: Vec<Instance> = all_instances().collect();
        assert_eq!(all.len(), 13);
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert!(a.window().end <= b.window().start);
            }
        }
    }

    #[test]
    fn containing_finds_window() {
        let spi3 = Instance::new(PeripheralKind::Spi, 3).unwrap();
        assert_eq!(Instance::containing(0x3000_A014), Some((spi3, 0x14)));
        assert_eq!(Instance::containing(0x3000_D000), None);
        assert_eq!(Instance::containing(0x2FFF_FFFC), None);
    }

    #[test]
    fn display() {
        let uart4 = Instance::new(PeripheralKind::Uart, 4).unwrap();
        assert_eq!(format!("{uart4}"), "UART4");

        let mut s = heapless::String::<16>::new();
        uwrite!(s, "{}", uart4).unwrap();
        assert_eq!(s, "UART4");
    }
}
