use super::Bus;

/// The real memory-mapped hardware.
///
/// Every access is a single volatile load or store, issued in program order.
#[derive(Debug)]
pub struct Mmio {
    _private: (),
}

impl Mmio {
    /// # Safety
    ///
    /// Only sound when running on the console itself, where the display hardware is mapped
    /// at the addresses in [`crate::hardware::map`]. Execution must be single threaded; the
    /// registers have no atomic update semantics.
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl Bus for Mmio {
    #[inline(always)]
    fn read_byte(&self, address: u32) -> u8 {
        unsafe { core::ptr::read_volatile(address as usize as *const u8) }
    }

    #[inline(always)]
    fn read_halfword(&self, address: u32) -> u16 {
        unsafe { core::ptr::read_volatile(address as usize as *const u16) }
    }

    #[inline(always)]
    fn write_byte(&mut self, address: u32, data: u8) {
        unsafe { core::ptr::write_volatile(address as usize as *mut u8, data) }
    }

    #[inline(always)]
    fn write_halfword(&mut self, address: u32, data: u16) {
        unsafe { core::ptr::write_volatile(address as usize as *mut u16, data) }
    }
}
