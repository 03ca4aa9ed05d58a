// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

/// The word access primitive of the user project's Wishbone bus.
///
/// Transactions are synchronous and always complete. Bus errors and timeouts
/// are not reported; callers that care read the register back.
pub trait Bus {
    /// Read the 32-bit word at `address`.
    fn read_word(&self, address: u32) -> u32;

    /// Write `value` to the 32-bit word at `address`.
    fn write_word(&self, address: u32, value: u32);
}

impl<B: Bus + ?Sized> Bus for &B {
    fn read_word(&self, address: u32) -> u32 {
        (**self).read_word(address)
    }

    fn write_word(&self, address: u32, value: u32) {
        (**self).write_word(address, value)
    }
}

/// Direct memory mapped access, as seen from the management core.
#[derive(Clone, Copy)]
pub struct Mmio {
    _private: (),
}

impl Mmio {
    /// Create a new [`Mmio`] bus.
    ///
    /// # Safety
    ///
    /// Every address used with this bus MUST be backed by a memory mapped
    /// register (or by memory that tolerates volatile word accesses).
    pub const unsafe fn new() -> Mmio {
        Mmio { _private: () }
    }
}

impl Bus for Mmio {
    fn read_word(&self, address: u32) -> u32 {
        // SAFETY: This is safe since an `Mmio` can only be constructed for a
        // mapped address space.
        unsafe { (address as usize as *const u32).read_volatile() }
    }

    fn write_word(&self, address: u32, value: u32) {
        // SAFETY: This is safe since an `Mmio` can only be constructed for a
        // mapped address space.
        unsafe { (address as usize as *mut u32).write_volatile(value) }
    }
}
