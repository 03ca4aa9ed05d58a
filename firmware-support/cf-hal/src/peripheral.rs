// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

use core::marker::PhantomData;

use crate::bus::Bus;
use crate::memory_map::{instances, Instance, OutOfRange, PeripheralKind};
use crate::register::{
    FLUSH, IC, IM, MIS, RIS, RX_FIFO_FLUSH, RX_FIFO_LEVEL, RX_FIFO_THRESHOLD, TX_FIFO_FLUSH,
    TX_FIFO_LEVEL, TX_FIFO_THRESHOLD,
};

/// Core register offsets and control bits of a peripheral kind.
pub trait Layout {
    const KIND: PeripheralKind;

    const RX_DATA: u32;
    const TX_DATA: u32;
    const CONFIG: u32;
    const CONTROL: u32;
    const PRESCALE: u32;

    /// Control value written by [`Peripheral::enable`].
    const ENABLE: u32;
    /// Control bit set by [`Peripheral::enable_tx`].
    const TX_ENABLE: u32;
    /// Control bit set by [`Peripheral::enable_rx`].
    const RX_ENABLE: u32;

    /// `control` with the transmit enable bit set.
    fn with_tx_enabled(control: u32) -> u32 {
        control | Self::TX_ENABLE
    }

    /// `control` with the receive enable bit set.
    fn with_rx_enabled(control: u32) -> u32 {
        control | Self::RX_ENABLE
    }
}

/// Accessor for one instance of a peripheral kind.
///
/// Every operation is a single bus transaction, except the read-modify-write
/// bit sets which read and then write the control register. Nothing is cached,
/// so several accessors for the same instance may coexist.
pub struct Peripheral<'a, B: ?Sized, L> {
    bus: &'a B,
    instance: Instance,
    _layout: PhantomData<L>,
}

impl<B: ?Sized, L> Clone for Peripheral<'_, B, L> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<B: ?Sized, L> Copy for Peripheral<'_, B, L> {}

impl<'a, B: Bus + ?Sized, L: Layout> Peripheral<'a, B, L> {
    /// Select instance `index` on `bus`.
    pub fn new(bus: &'a B, index: u8) -> Result<Self, OutOfRange> {
        let instance = Instance::new(L::KIND, index)?;
        Ok(Peripheral {
            bus,
            instance,
            _layout: PhantomData,
        })
    }

    /// Accessors for every instance of this kind, in index order.
    pub fn all(bus: &'a B) -> impl Iterator<Item = Self> + 'a
    where
        L: 'a,
    {
        instances(L::KIND).map(move |instance| Peripheral {
            bus,
            instance,
            _layout: PhantomData,
        })
    }

    pub fn instance(&self) -> Instance {
        self.instance
    }

    pub fn index(&self) -> u8 {
        self.instance.index()
    }

    pub fn base(&self) -> u32 {
        self.instance.base()
    }

    pub(crate) fn read(&self, offset: u32) -> u32 {
        self.bus.read_word(self.instance.address(offset))
    }

    pub(crate) fn write(&self, offset: u32, value: u32) {
        self.bus.write_word(self.instance.address(offset), value)
    }

    /// Enable the core function, transmit and receive (or chip select).
    pub fn enable(&self) {
        self.write(L::CONTROL, L::ENABLE);
    }

    /// Set the transmit enable bit, leaving the other control bits as they are.
    pub fn enable_tx(&self) {
        let control = self.read(L::CONTROL);
        self.write(L::CONTROL, L::with_tx_enabled(control));
    }

    /// Set the receive enable bit, leaving the other control bits as they are.
    pub fn enable_rx(&self) {
        let control = self.read(L::CONTROL);
        self.write(L::CONTROL, L::with_rx_enabled(control));
    }

    pub fn control(&self) -> u32 {
        self.read(L::CONTROL)
    }

    pub fn set_control(&self, value: u32) {
        self.write(L::CONTROL, value);
    }

    /// Write the configuration register. The value is peripheral specific and
    /// written verbatim.
    pub fn configure(&self, config: u32) {
        self.write(L::CONFIG, config);
    }

    pub fn config(&self) -> u32 {
        self.read(L::CONFIG)
    }

    /// Write the clock divider register verbatim.
    pub fn set_prescale(&self, prescale: u32) {
        self.write(L::PRESCALE, prescale);
    }

    pub fn prescale(&self) -> u32 {
        self.read(L::PRESCALE)
    }

    /// Set the TX queue threshold. The hardware expects 0 to 15, this is not
    /// checked.
    pub fn set_tx_threshold(&self, threshold: u32) {
        self.write(TX_FIFO_THRESHOLD, threshold);
    }

    pub fn tx_threshold(&self) -> u32 {
        self.read(TX_FIFO_THRESHOLD)
    }

    pub fn set_rx_threshold(&self, threshold: u32) {
        self.write(RX_FIFO_THRESHOLD, threshold);
    }

    pub fn rx_threshold(&self) -> u32 {
        self.read(RX_FIFO_THRESHOLD)
    }

    /// Push one data unit into the transmit queue.
    pub fn send(&self, data: u8) {
        self.write(L::TX_DATA, data as u32);
    }

    /// Pop one data unit from the receive queue.
    pub fn receive(&self) -> u8 {
        self.read(L::RX_DATA) as u8
    }

    pub fn flush_tx(&self) {
        self.write(TX_FIFO_FLUSH, FLUSH);
    }

    pub fn flush_rx(&self) {
        self.write(RX_FIFO_FLUSH, FLUSH);
    }

    /// Number of entries in the transmit queue.
    pub fn tx_level(&self) -> u32 {
        self.read(TX_FIFO_LEVEL)
    }

    /// Number of entries in the receive queue.
    pub fn rx_level(&self) -> u32 {
        self.read(RX_FIFO_LEVEL)
    }

    pub fn interrupt_mask(&self) -> u32 {
        self.read(IM)
    }

    pub fn set_interrupt_mask(&self, mask: u32) {
        self.write(IM, mask);
    }

    pub fn masked_interrupt_status(&self) -> u32 {
        self.read(MIS)
    }

    pub fn raw_interrupt_status(&self) -> u32 {
        self.read(RIS)
    }

    pub fn clear_interrupts(&self, mask: u32) {
        self.write(IC, mask);
    }
}

#[cfg(test)]
mod tests {
    use core::cell::RefCell;

    use super::*;
    use crate::spi::{Spi, SpiLayout};
    use crate::uart::{Uart, UartLayout};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Access {
        Read(u32),
        Write(u32, u32),
    }

    /// Records every transaction and answers reads with `read_value`.
    struct RecordingBus {
        accesses: RefCell<Vec<Access>>,
        read_value: u32,
    }

    impl RecordingBus {
        fn new(read_value: u32) -> Self {
            RecordingBus {
                accesses: RefCell::new(Vec::new()),
                read_value,
            }
        }

        fn take(&self) -> Vec<Access> {
            self.accesses.take()
        }
    }

    impl Bus for RecordingBus {
        fn read_word(&self, address: u32) -> u32 {
            self.accesses.borrow_mut().push(Access::Read(address));
            self.read_value
        }

        fn write_word(&self, address: u32, value: u32) {
            self.accesses
                .borrow_mut()
                .push(Access::Write(address, value));
        }
    }

    #[test]
    fn single_transaction_operations() {
        let bus = RecordingBus::new(0x1234_5678);
        let spi = Spi::new(&bus, 1).unwrap();

        spi.enable();
        assert_eq!(bus.take(), [Access::Write(0x3000_800C, 0x7)]);
        spi.configure(0xA5);
        assert_eq!(bus.take(), [Access::Write(0x3000_8008, 0xA5)]);
        spi.set_prescale(2);
        assert_eq!(bus.take(), [Access::Write(0x3000_8010, 2)]);
        spi.set_tx_threshold(3);
        assert_eq!(bus.take(), [Access::Write(0x3000_C010, 3)]);
        spi.send(0x41);
        assert_eq!(bus.take(), [Access::Write(0x3000_8004, 0x41)]);
        spi.flush_tx();
        assert_eq!(bus.take(), [Access::Write(0x3000_C014, 1)]);
        spi.flush_rx();
        assert_eq!(bus.take(), [Access::Write(0x3000_C008, 1)]);

        assert_eq!(spi.tx_level(), 0x1234_5678);
        assert_eq!(bus.take(), [Access::Read(0x3000_C00C)]);
        assert_eq!(spi.rx_level(), 0x1234_5678);
        assert_eq!(bus.take(), [Access::Read(0x3000_C000)]);
        assert_eq!(spi.status(), 0x1234_5678);
        assert_eq!(bus.take(), [Access::Read(0x3000_8014)]);
    }

    #[test]
    fn receive_truncates_to_a_byte() {
        let bus = RecordingBus::new(0xFFFF_FF41);
        let uart = Uart::new(&bus, 0).unwrap();
        assert_eq!(uart.receive(), 0x41);
        assert_eq!(bus.take(), [Access::Read(0x3000_0000)]);
    }

    #[test]
    fn uart_layout_swaps_config_and_prescale() {
        let bus = RecordingBus::new(0);
        let uart = Uart::new(&bus, 6).unwrap();
        uart.configure(0x70);
        uart.set_prescale(1);
        uart.set_match(0x55);
        assert_eq!(
            bus.take(),
            [
                Access::Write(0x3000_6010, 0x70),
                Access::Write(0x3000_6008, 1),
                Access::Write(0x3000_6018, 0x55),
            ]
        );
    }

    #[test]
    fn enable_tx_is_read_modify_write() {
        let bus = RecordingBus::new(0x8000_0010);
        let uart = Uart::new(&bus, 2).unwrap();
        uart.enable_tx();
        assert_eq!(
            bus.take(),
            [
                Access::Read(0x3000_200C),
                Access::Write(0x3000_200C, 0x8000_0011)
            ]
        );

        let spi = Spi::new(&bus, 0).unwrap();
        spi.enable_rx();
        assert_eq!(
            bus.take(),
            [
                Access::Read(0x3000_700C),
                Access::Write(0x3000_700C, 0x8000_0014)
            ]
        );
    }

    #[test]
    fn bit_set_functions() {
        assert_eq!(SpiLayout::with_tx_enabled(0x5), 0x7);
        assert_eq!(SpiLayout::with_rx_enabled(0x0), 0x4);
        assert_eq!(UartLayout::with_tx_enabled(0x6), 0x7);
        assert_eq!(UartLayout::with_rx_enabled(0x1), 0x3);
    }

    #[test]
    fn interrupt_registers_are_plain() {
        let bus = RecordingBus::new(0);
        let uart = Uart::new(&bus, 0).unwrap();
        uart.set_interrupt_mask(0x3);
        uart.clear_interrupts(0x1);
        uart.masked_interrupt_status();
        uart.raw_interrupt_status();
        assert_eq!(
            bus.take(),
            [
                Access::Write(0x3000_4040, 0x3),
                Access::Write(0x3000_404C, 0x1),
                Access::Read(0x3000_4044),
                Access::Read(0x3000_4048),
            ]
        );
    }

    #[test]
    fn out_of_range_instances() {
        let bus = RecordingBus::new(0);
        assert!(Spi::new(&bus, 6).is_err());
        assert!(Uart::new(&bus, 7).is_err());
        assert_eq!(Spi::all(&bus).count(), 6);
        assert_eq!(Uart::all(&bus).map(|uart| uart.index()).max(), Some(6));
        assert!(bus.take().is_empty());
    }
}
