// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

/*! Transaction-level model of the user project bus.

[`SimBus`] stands in for [`crate::Mmio`] in host tests. Every bus transaction
advances every attached device by one cycle, so polling loops make progress
the same way they do against the real peripherals.

Address decoding follows the register map. Because the queue registers sit
`0x4000` above the instance base while instances are only `0x1000` apart, the
queue registers of some instances fall in the window of another instance. Core
registers of attached instances take precedence; see [`SimBus::is_shadowed`].

The model logs through `log`, but only after it released its state. A logger
writing to a UART of the same bus is fine.
*/

mod device;

use core::cell::RefCell;

use heapless::Vec;
use log::{debug, trace, warn};

use crate::bus::Bus;
use crate::memory_map::{all_instances, Instance, QUEUE_OFFSET};
use crate::register::{registers, Register};

use device::Device;
pub use device::{LINE_CAPACITY, QUEUE_DEPTH};

const MAX_DEVICES: usize = 13;

/// Something the model has to say about one step.
#[derive(Debug, Clone, Copy)]
enum Event {
    Read {
        instance: Instance,
        register: Register,
        value: u32,
    },
    Write {
        instance: Instance,
        register: Register,
        value: u32,
    },
    UnmappedRead {
        address: u32,
    },
    UnmappedWrite {
        address: u32,
        value: u32,
    },
    TxDropped {
        instance: Instance,
        data: u8,
    },
    RxOverrun {
        instance: Instance,
    },
    NoRoom {
        instance: Instance,
    },
    Shadowed {
        instance: Instance,
    },
    ShadowedBy {
        victim: Instance,
        by: Instance,
    },
}

impl Event {
    fn log(self) {
        match self {
            Event::Read {
                instance,
                register,
                value,
            } => trace!("{instance} {} read {value:#010x}", register.name()),
            Event::Write {
                instance,
                register,
                value,
            } => trace!("{instance} {} write {value:#010x}", register.name()),
            Event::UnmappedRead { address } => warn!("unmapped read at {address:#010x}"),
            Event::UnmappedWrite { address, value } => {
                warn!("unmapped write of {value:#010x} at {address:#010x}")
            }
            Event::TxDropped { instance, data } => {
                debug!("{instance}: TX queue full, dropped {data:#04x}")
            }
            Event::RxOverrun { instance } => debug!("{instance}: RX queue overrun"),
            Event::NoRoom { instance } => warn!("{instance}: no room to attach"),
            Event::Shadowed { instance } => {
                warn!("{instance}: queue registers shadowed by another instance")
            }
            Event::ShadowedBy { victim, by } => {
                warn!("{victim}: queue registers shadowed by {by}")
            }
        }
    }
}

/// Events of one step: the transaction itself, a dropped write and an
/// overrun per device at most.
type Events = Vec<Event, { MAX_DEVICES + 2 }>;

fn note(events: &mut Events, event: Event) {
    // Sized for the worst case of a single step.
    let _ = events.push(event);
}

fn report(events: &Events) {
    for event in events {
        event.log();
    }
}

struct State {
    devices: Vec<Device, MAX_DEVICES>,
    cycles: u64,
    unmapped: u32,
}

impl State {
    fn position(&self, instance: Instance) -> Option<usize> {
        self.devices.iter().position(|d| d.instance == instance)
    }

    fn device_mut(&mut self, instance: Instance) -> Option<&mut Device> {
        self.devices.iter_mut().find(|d| d.instance == instance)
    }

    /// The attached core register at `address`, if any.
    fn decode_core(&self, address: u32) -> Option<(usize, Register)> {
        self.devices.iter().enumerate().find_map(|(i, device)| {
            let instance = device.instance;
            if !instance.window().contains(&address) {
                return None;
            }
            Register::from_offset(instance.kind(), address - instance.base())
                .filter(|register| !register.is_queue())
                .map(|register| (i, register))
        })
    }

    fn decode(&self, address: u32) -> Option<(usize, Register)> {
        self.decode_core(address).or_else(|| {
            self.devices.iter().enumerate().find_map(|(i, device)| {
                let instance = device.instance;
                let offset = address.checked_sub(instance.base())?;
                if offset < QUEUE_OFFSET {
                    return None;
                }
                Register::from_offset(instance.kind(), offset).map(|register| (i, register))
            })
        })
    }

    fn shadowed(&self, instance: Instance) -> bool {
        self.devices
            .iter()
            .any(|d| d.instance != instance && shadows(d.instance, instance))
    }

    fn attach(&mut self, instance: Instance, events: &mut Events) {
        if self.position(instance).is_some() {
            return;
        }
        if self.devices.push(Device::new(instance)).is_err() {
            note(events, Event::NoRoom { instance });
            return;
        }

        if self.shadowed(instance) {
            note(events, Event::Shadowed { instance });
        }
        for other in self.devices.iter().map(|d| d.instance) {
            if other != instance && shadows(instance, other) {
                note(
                    events,
                    Event::ShadowedBy {
                        victim: other,
                        by: instance,
                    },
                );
            }
        }
    }

    fn read(&mut self, address: u32, events: &mut Events) -> u32 {
        let value = match self.decode(address) {
            Some((i, register)) => {
                let device = &mut self.devices[i];
                let value = device.read(register);
                note(
                    events,
                    Event::Read {
                        instance: device.instance,
                        register,
                        value,
                    },
                );
                value
            }
            None => {
                self.unmapped += 1;
                note(events, Event::UnmappedRead { address });
                0
            }
        };
        self.tick(events);
        value
    }

    fn write(&mut self, address: u32, value: u32, events: &mut Events) {
        match self.decode(address) {
            Some((i, register)) => {
                let device = &mut self.devices[i];
                note(
                    events,
                    Event::Write {
                        instance: device.instance,
                        register,
                        value,
                    },
                );
                if let Some(event) = device.write(register, value) {
                    note(events, event);
                }
            }
            None => {
                self.unmapped += 1;
                note(events, Event::UnmappedWrite { address, value });
            }
        }
        self.tick(events);
    }

    fn tick(&mut self, events: &mut Events) {
        self.cycles += 1;
        for device in self.devices.iter_mut() {
            if let Some(event) = device.tick() {
                note(events, event);
            }
        }
    }
}

/// Whether a queue register of `victim` lands on a core register of `by`.
fn shadows(by: Instance, victim: Instance) -> bool {
    registers(victim.kind())
        .filter(|(register, _)| register.is_queue())
        .map(|(_, offset)| victim.address(offset))
        .filter(|address| by.window().contains(address))
        .any(|address| {
            Register::from_offset(by.kind(), address - by.base())
                .is_some_and(|register| !register.is_queue())
        })
}

pub struct SimBus {
    state: RefCell<State>,
}

impl Default for SimBus {
    fn default() -> Self {
        SimBus::new()
    }
}

impl SimBus {
    /// A bus with nothing attached. Every access is unmapped.
    pub fn new() -> SimBus {
        SimBus {
            state: RefCell::new(State {
                devices: Vec::new(),
                cycles: 0,
                unmapped: 0,
            }),
        }
    }

    /// A bus with every instance of every kind attached.
    pub fn full() -> SimBus {
        SimBus::with_instances(all_instances())
    }

    pub fn with_instances(instances: impl IntoIterator<Item = Instance>) -> SimBus {
        let bus = SimBus::new();
        for instance in instances {
            bus.attach(instance);
        }
        bus
    }

    /// Attach a model of `instance`. Attaching twice has no effect.
    pub fn attach(&self, instance: Instance) {
        let mut events = Events::new();
        self.state.borrow_mut().attach(instance, &mut events);
        report(&events);
    }

    pub fn is_attached(&self, instance: Instance) -> bool {
        self.state.borrow().position(instance).is_some()
    }

    /// Whether a queue register of `instance` decodes to a core register of
    /// another attached instance, making it unreachable.
    pub fn is_shadowed(&self, instance: Instance) -> bool {
        self.state.borrow().shadowed(instance)
    }

    /// Feed transmitted bytes of `instance` back into its RX queue.
    pub fn set_loopback(&self, instance: Instance, loopback: bool) {
        if let Some(device) = self.state.borrow_mut().device_mut(instance) {
            device.loopback = loopback;
        }
    }

    /// Set raw interrupt status bits of `instance`.
    pub fn raise_interrupt(&self, instance: Instance, bits: u32) {
        if let Some(device) = self.state.borrow_mut().device_mut(instance) {
            device.raise(bits);
        }
    }

    /// Drain the bytes `instance` has shifted out so far.
    pub fn take_transmitted(&self, instance: Instance) -> Vec<u8, LINE_CAPACITY> {
        self.state
            .borrow_mut()
            .device_mut(instance)
            .map(Device::take_line)
            .unwrap_or_default()
    }

    /// Advance every device by `cycles` without a bus transaction.
    pub fn run(&self, cycles: u32) {
        for _ in 0..cycles {
            let mut events = Events::new();
            self.state.borrow_mut().tick(&mut events);
            report(&events);
        }
    }

    /// Cycles elapsed since the bus was created.
    pub fn cycles(&self) -> u64 {
        self.state.borrow().cycles
    }

    /// Number of accesses that did not decode to an attached register.
    pub fn unmapped_accesses(&self) -> u32 {
        self.state.borrow().unmapped
    }

    /// Read `address` without side effects and without advancing time.
    pub fn peek(&self, address: u32) -> u32 {
        let state = self.state.borrow();
        match state.decode(address) {
            Some((i, register)) => state.devices[i].peek(register),
            None => 0,
        }
    }
}

impl Bus for SimBus {
    fn read_word(&self, address: u32) -> u32 {
        let mut events = Events::new();
        let value = self.state.borrow_mut().read(address, &mut events);
        report(&events);
        value
    }

    fn write_word(&self, address: u32, value: u32) {
        let mut events = Events::new();
        self.state.borrow_mut().write(address, value, &mut events);
        report(&events);
    }
}
