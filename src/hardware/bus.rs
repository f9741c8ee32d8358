mod memory;
mod mmio;

pub use memory::Memory;
pub use mmio::Mmio;

/// Loads and stores against absolute hardware addresses.
///
/// Half-words are little-endian. Implementations do no validation of their own; an access
/// outside the mapped hardware is the caller's problem.
pub trait Bus {
    fn read_byte(&self, address: u32) -> u8;
    fn read_halfword(&self, address: u32) -> u16;
    fn write_byte(&mut self, address: u32, data: u8);
    fn write_halfword(&mut self, address: u32, data: u16);
}

impl<B: Bus + ?Sized> Bus for &mut B {
    fn read_byte(&self, address: u32) -> u8 {
        (**self).read_byte(address)
    }

    fn read_halfword(&self, address: u32) -> u16 {
        (**self).read_halfword(address)
    }

    fn write_byte(&mut self, address: u32, data: u8) {
        (**self).write_byte(address, data)
    }

    fn write_halfword(&mut self, address: u32, data: u16) {
        (**self).write_halfword(address, data)
    }
}
