use super::Bus;
use crate::hardware::map::{self, Keys, MemoryRegion, IO, KEY_ANY, OAM, PALETTE, VRAM};

/// Host-side stand-in for the display hardware.
///
/// Each named region is backed by its own zeroed buffer. Accesses that fall outside every
/// region read as zero and drop writes, the way open bus would.
#[derive(Debug)]
pub struct Memory {
    io: Box<[u8]>,
    palette: Box<[u8]>,
    vram: Box<[u8]>,
    oam: Box<[u8]>,
}

impl Memory {
    #[tracing::instrument]
    pub fn new() -> Self {
        let mut memory = Self {
            io: vec![0; IO.len() as usize].into_boxed_slice(),
            palette: vec![0; PALETTE.len() as usize].into_boxed_slice(),
            vram: vec![0; VRAM.len() as usize].into_boxed_slice(),
            oam: vec![0; OAM.len() as usize].into_boxed_slice(),
        };
        // No keys held
        memory.write_halfword(map::KEY_INPUT.address, KEY_ANY);
        memory
    }

    /// Backing bytes of a named region.
    pub fn region(&self, region: &MemoryRegion) -> &[u8] {
        match region.base_address {
            a if a == IO.base_address => &self.io[..],
            a if a == PALETTE.base_address => &self.palette[..],
            a if a == VRAM.base_address => &self.vram[..],
            a if a == OAM.base_address => &self.oam[..],
            // Sub-regions such as the object palette
            _ => self.slice(region.base_address, region.end_address()),
        }
    }

    /// Bytes in `start_address..end_address`, which must not span two regions.
    pub fn slice(&self, start_address: u32, end_address: u32) -> &[u8] {
        match self.locate(start_address) {
            Some((buffer, offset)) => {
                let end = (offset + end_address.saturating_sub(start_address) as usize)
                    .min(buffer.len());
                &buffer[offset..end]
            }
            None => &[],
        }
    }

    /// Simulate the player holding exactly `keys`.
    pub fn set_keys_held(&mut self, keys: Keys) {
        self.write_halfword(map::KEY_INPUT.address, !keys.bits() & KEY_ANY);
    }

    /// Simulate the display reaching `scanline`.
    pub fn set_scanline(&mut self, scanline: u16) {
        self.write_halfword(map::SCANLINE_COUNT.address, scanline);
    }

    #[tracing::instrument(skip(self, data))]
    pub fn load(&mut self, start_address: u32, data: &[u8]) {
        let mut address = start_address;
        for byte in data {
            self.write_byte(address, *byte);
            address += 1;
        }
    }

    fn locate(&self, address: u32) -> Option<(&[u8], usize)> {
        let region = map::region_of(address)?;
        let offset = (address - region.base_address) as usize;
        let buffer: &[u8] = match region.name {
            "io" => &self.io[..],
            "palette" => &self.palette[..],
            "vram" => &self.vram[..],
            _ => &self.oam[..],
        };
        Some((buffer, offset))
    }

    fn locate_mut(&mut self, address: u32) -> Option<(&mut [u8], usize)> {
        let region = map::region_of(address)?;
        let offset = (address - region.base_address) as usize;
        let buffer: &mut [u8] = match region.name {
            "io" => &mut self.io[..],
            "palette" => &mut self.palette[..],
            "vram" => &mut self.vram[..],
            _ => &mut self.oam[..],
        };
        Some((buffer, offset))
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus for Memory {
    fn read_byte(&self, address: u32) -> u8 {
        match self.locate(address) {
            Some((buffer, offset)) => buffer[offset],
            None => {
                tracing::warn!("read from unmapped address {:#010x}", address);
                0
            }
        }
    }

    fn read_halfword(&self, address: u32) -> u16 {
        u16::from_le_bytes([
            self.read_byte(address),
            self.read_byte(address.wrapping_add(1)),
        ])
    }

    fn write_byte(&mut self, address: u32, data: u8) {
        match self.locate_mut(address) {
            Some((buffer, offset)) => {
                tracing::trace!("{:#010x} <- {:#04x}", address, data);
                buffer[offset] = data;
            }
            None => tracing::warn!("write of {:#04x} to unmapped address {:#010x}", data, address),
        }
    }

    fn write_halfword(&mut self, address: u32, data: u16) {
        let [lo, hi] = data.to_le_bytes();
        self.write_byte(address, lo);
        self.write_byte(address.wrapping_add(1), hi);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::map::OBJECT_PALETTE;

    use pretty_assertions::assert_eq;

    #[test]
    fn test_halfword_is_little_endian() {
        let mut memory = Memory::new();
        memory.write_halfword(0x0600_0000, 0x7C1F);
        assert_eq!(memory.read_byte(0x0600_0000), 0x1F);
        assert_eq!(memory.read_byte(0x0600_0001), 0x7C);
        assert_eq!(memory.read_halfword(0x0600_0000), 0x7C1F);
    }

    #[test]
    fn test_unmapped_access() {
        let mut memory = Memory::new();
        memory.write_halfword(0x0800_0000, 0xBEEF);
        assert_eq!(memory.read_halfword(0x0800_0000), 0);
        memory.write_byte(VRAM.end_address(), 0xAA);
        assert_eq!(memory.read_byte(VRAM.end_address()), 0);
    }

    #[test]
    fn test_keys_idle_released() {
        let mut memory = Memory::new();
        assert_eq!(memory.read_halfword(map::KEY_INPUT.address), 0x03FF);

        memory.set_keys_held(Keys::UP | Keys::A);
        assert_eq!(memory.read_halfword(map::KEY_INPUT.address), 0x03BE);
    }

    #[test]
    fn test_region_views() {
        let mut memory = Memory::new();
        memory.load(OBJECT_PALETTE.base_address, &[0xFF, 0x7F]);

        assert_eq!(memory.region(&VRAM).len(), 0x18000);
        assert_eq!(memory.region(&OBJECT_PALETTE).len(), 0x200);
        assert_eq!(&memory.region(&OBJECT_PALETTE)[..2], &[0xFF, 0x7F]);
        assert_eq!(memory.region(&PALETTE)[0x200], 0xFF);
        assert_eq!(memory.slice(0x0700_0000, 0x0700_0010).len(), 0x10);
    }
}
