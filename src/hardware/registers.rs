use super::{
    bus::Bus,
    codec::{compose_color, merge_position_field, Color},
    map::{
        self, DisplayControl, Keys, Readable, Register, Writable, KEY_ANY, OAM, OBJECT_ATTR0_Y_MASK,
        OBJECT_ATTR1_X_MASK, OBJECT_PALETTE, SCREEN_WIDTH, TILE_HALFWORDS, VRAM,
    },
};

/// One record of object attribute memory.
///
/// Only the Y position in `attr0` and the X position in `attr1` are interpreted here; every
/// other bit belongs to the caller. `pad` is shared with the affine parameters and is never
/// written by the accessors.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ObjectAttributes {
    pub attr0: u16,
    pub attr1: u16,
    pub attr2: u16,
    pub pad: u16,
}

impl ObjectAttributes {
    pub fn y(&self) -> u16 {
        self.attr0 & OBJECT_ATTR0_Y_MASK
    }

    pub fn x(&self) -> u16 {
        self.attr1 & OBJECT_ATTR1_X_MASK
    }
}

/// Typed access to the display hardware.
///
/// This is the only code that loads from or stores to the bus. None of the accessors check
/// their indices: an index past the end of its table lands in whatever hardware follows it,
/// exactly as a raw store would. Range checks belong to the caller.
#[derive(Debug)]
pub struct Registers<B: Bus> {
    bus: B,
}

impl<B: Bus> Registers<B> {
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    fn read<A: Readable>(&self, register: Register<A>) -> u16 {
        self.bus.read_halfword(register.address)
    }

    fn write<A: Writable>(&mut self, register: Register<A>, value: u16) {
        self.bus.write_halfword(register.address, value)
    }

    /// Select the video mode and the enabled layers with two byte stores into the display
    /// control register.
    #[tracing::instrument(skip(self))]
    pub fn set_video_mode_and_layers(&mut self, mode: u8, layer_mask: u8) {
        let address = map::DISPLAY_CONTROL.address;
        self.bus.write_byte(address, mode);
        self.bus.write_byte(address + 1, layer_mask);
    }

    /// Store one pixel of the mode 3 framebuffer.
    ///
    /// Only meaningful while a bitmap mode is active. The current mode is not checked.
    #[tracing::instrument(skip(self))]
    pub fn write_pixel(&mut self, x: u32, y: u32, color: Color) {
        let offset = y.wrapping_mul(SCREEN_WIDTH).wrapping_add(x);
        self.bus
            .write_halfword(VRAM.element_address(offset), color.bits());
    }

    /// Fill `tile_count` tiles starting at `tile_index` in tile block `tile_block_index` with
    /// `fill_value`, one half-word at a time.
    #[tracing::instrument(skip(self))]
    pub fn fill_tile_run(
        &mut self,
        tile_block_index: u32,
        tile_index: u32,
        tile_count: u32,
        fill_value: u16,
    ) {
        let start = map::tile_address(tile_block_index, tile_index);
        for halfword in 0..tile_count.wrapping_mul(TILE_HALFWORDS) {
            self.bus
                .write_halfword(start.wrapping_add(halfword.wrapping_mul(2)), fill_value);
        }
    }

    #[tracing::instrument(skip(self))]
    pub fn set_object_palette_entry(&mut self, index: u32, r: u16, g: u16, b: u16) {
        let color = compose_color(r, g, b);
        self.bus
            .write_halfword(OBJECT_PALETTE.element_address(index), color.bits());
    }

    /// Overwrite `attr0`, `attr1` and `attr2` of object `index`.
    #[tracing::instrument(skip(self))]
    pub fn set_object_attributes(&mut self, index: u32, attr0: u16, attr1: u16, attr2: u16) {
        let base = OAM.element_address(index);
        self.bus.write_halfword(base, attr0);
        self.bus.write_halfword(base + 2, attr1);
        self.bus.write_halfword(base + 4, attr2);
    }

    pub fn object_attributes(&self, index: u32) -> ObjectAttributes {
        let base = OAM.element_address(index);
        ObjectAttributes {
            attr0: self.bus.read_halfword(base),
            attr1: self.bus.read_halfword(base + 2),
            attr2: self.bus.read_halfword(base + 4),
            pad: self.bus.read_halfword(base + 6),
        }
    }

    /// Move object `index` to `(x, y)`, keeping every other bit of `attr0` and `attr1`.
    #[tracing::instrument(skip(self))]
    pub fn set_object_position(&mut self, index: u32, x: u16, y: u16) {
        let base = OAM.element_address(index);

        let attr0 = self.bus.read_halfword(base);
        self.bus
            .write_halfword(base, merge_position_field(attr0, y, OBJECT_ATTR0_Y_MASK));

        let attr1 = self.bus.read_halfword(base + 2);
        self.bus
            .write_halfword(base + 2, merge_position_field(attr1, x, OBJECT_ATTR1_X_MASK));
    }

    #[tracing::instrument(skip(self))]
    pub fn set_display_register(&mut self, value: u16) {
        self.write(map::DISPLAY_CONTROL, value);
    }

    pub fn display_register(&self) -> u16 {
        self.read(map::DISPLAY_CONTROL)
    }

    pub fn display_control(&self) -> DisplayControl {
        DisplayControl::from_bits_retain(self.display_register())
    }

    /// Held keys, one bit per key. The hardware reports a held key as a cleared bit.
    pub fn read_key_state(&self) -> u16 {
        !self.read(map::KEY_INPUT) & KEY_ANY
    }

    pub fn pressed_keys(&self) -> Keys {
        Keys::from_bits_truncate(self.read_key_state())
    }

    pub fn read_scanline_counter(&self) -> u16 {
        self.read(map::SCANLINE_COUNT)
    }

    /// Unchecked access to arbitrary addresses.
    pub fn raw(&mut self) -> RawAccess<'_, B> {
        RawAccess { bus: &mut self.bus }
    }

    /// Switch to mode 3 with background 2 and plot a red, a green and a blue pixel.
    #[tracing::instrument(skip(self))]
    pub fn draw_demo_pixels(&mut self) {
        self.set_video_mode_and_layers(0x03, 0x04);
        self.write_pixel(115, 80, Color::RED);
        self.write_pixel(120, 60, Color::GREEN);
        self.write_pixel(145, 80, Color::BLUE);
    }
}

/// Stores to an arbitrary base address plus an element index.
///
/// Nothing ties these to a named region. They exist for scripts that poke hardware the
/// bridge has no typed accessor for.
pub struct RawAccess<'a, B: Bus> {
    bus: &'a mut B,
}

impl<B: Bus> RawAccess<'_, B> {
    #[tracing::instrument(skip(self))]
    pub fn write_halfword(&mut self, address: u32, index: u32, value: u16) {
        self.bus
            .write_halfword(address.wrapping_add(index.wrapping_mul(2)), value);
    }

    #[tracing::instrument(skip(self))]
    pub fn write_byte(&mut self, address: u32, index: u32, value: u8) {
        self.bus.write_byte(address.wrapping_add(index), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::{
        bus::Memory,
        map::{SPRITE_TILE_BLOCK, TILE_SIZE},
    };

    use pretty_assertions::assert_eq;

    fn registers() -> Registers<Memory> {
        Registers::new(Memory::new())
    }

    #[test]
    fn test_video_mode_and_pixel() {
        let mut registers = registers();
        registers.set_video_mode_and_layers(3, 4);
        registers.write_pixel(115, 80, compose_color(31, 0, 0));

        let dispcnt = registers.display_control();
        assert_eq!(dispcnt.mode(), 3);
        assert!(dispcnt.contains(DisplayControl::BG2));
        assert_eq!(
            registers
                .bus()
                .read_halfword(VRAM.base_address + (80 * 240 + 115) * 2),
            0x001F
        );
    }

    #[test]
    fn test_fill_tile_run_bounds() {
        let tests = vec![(1, 4), (5, 1), (0, 0), (508, 4)];
        for (tile_index, tile_count) in tests {
            let mut registers = registers();
            registers.fill_tile_run(SPRITE_TILE_BLOCK, tile_index, tile_count, 0x1111);

            let block = map::tile_address(SPRITE_TILE_BLOCK, 0);
            let first = map::tile_address(SPRITE_TILE_BLOCK, tile_index);
            let last = first + tile_count * TILE_SIZE;
            let mut written = 0;
            for address in (block - 0x40..block + 0x4000 + 0x40).step_by(2) {
                let halfword = registers.bus().read_halfword(address);
                if (first..last).contains(&address) {
                    assert_eq!(halfword, 0x1111, "{:#010x}", address);
                    written += 1;
                } else {
                    assert_eq!(halfword, 0, "{:#010x}", address);
                }
            }
            assert_eq!(written, tile_count * 16);
        }
    }

    #[test]
    fn test_object_palette_entry() {
        let mut registers = registers();
        registers.set_object_palette_entry(1, 0x1F, 0x1F, 0x1F);
        registers.set_object_palette_entry(2, 0x1F, 0x00, 0x1F);

        assert_eq!(registers.bus().read_halfword(0x0500_0202), 0x7FFF);
        assert_eq!(registers.bus().read_halfword(0x0500_0204), 0x7C1F);
        assert_eq!(registers.bus().read_halfword(0x0500_0000), 0);
    }

    #[test]
    fn test_set_object_attributes_replaces_record() {
        let mut registers = registers();
        registers.set_object_attributes(3, 0xFFFF, 0xFFFF, 0xFFFF);
        registers.set_object_attributes(3, 0x8000, 0x4000, 1);

        assert_eq!(
            registers.object_attributes(3),
            ObjectAttributes {
                attr0: 0x8000,
                attr1: 0x4000,
                attr2: 1,
                pad: 0,
            }
        );
        assert_eq!(registers.object_attributes(2), ObjectAttributes::default());
        assert_eq!(registers.object_attributes(4), ObjectAttributes::default());
    }

    #[test]
    fn test_set_object_position_preserves_flags() {
        let tests = vec![
            ((0x8000, 0x4000, 1), (5, 96), (0x8060, 0x4005)),
            ((0xFFFF, 0xFFFF, 5), (0, 0), (0xFF00, 0xFE00)),
            ((0x2000, 0xC000, 7), (0x1FF, 0xFF), (0x20FF, 0xC1FF)),
            // Out of range positions wrap inside their field
            ((0x0000, 0x0000, 0), (0x3FF, 0x1FF), (0x00FF, 0x01FF)),
        ];
        for ((attr0, attr1, attr2), (x, y), (expected0, expected1)) in tests {
            let mut registers = registers();
            registers.set_object_attributes(0, attr0, attr1, attr2);
            registers.set_object_position(0, x, y);

            let attrs = registers.object_attributes(0);
            assert_eq!((attrs.attr0, attrs.attr1, attrs.attr2), (expected0, expected1, attr2));
            assert_eq!(attrs.y(), y & OBJECT_ATTR0_Y_MASK);
            assert_eq!(attrs.x(), x & OBJECT_ATTR1_X_MASK);
        }
    }

    #[test]
    fn test_read_key_state() {
        let tests = vec![0xFFFF, 0x03FF, 0x0000, 0x03BF, 0x033F, 0xFC00];
        for raw in tests {
            let mut registers = registers();
            registers.bus_mut().write_halfword(map::KEY_INPUT.address, raw);
            assert_eq!(registers.read_key_state(), !raw & 0x03FF);
        }
    }

    #[test]
    fn test_pressed_keys() {
        let mut registers = registers();
        assert_eq!(registers.pressed_keys(), Keys::empty());

        registers.bus_mut().set_keys_held(Keys::DOWN | Keys::L);
        assert_eq!(registers.pressed_keys(), Keys::DOWN | Keys::L);
        assert_eq!(registers.read_key_state(), 0x0280);
    }

    #[test]
    fn test_scanline_and_display_register() {
        let mut registers = registers();
        registers.bus_mut().set_scanline(160);
        assert_eq!(registers.read_scanline_counter(), 160);

        registers.set_display_register(0x1040);
        assert_eq!(registers.display_register(), 0x1040);
        // The neighbouring register is untouched
        assert_eq!(registers.bus().read_halfword(0x0400_0002), 0);
    }

    #[test]
    fn test_raw_access() {
        let mut registers = registers();
        registers.raw().write_byte(map::IO.base_address, 1, 0x04);
        registers.raw().write_halfword(VRAM.base_address, 3, 0xBEEF);

        assert_eq!(registers.bus().read_byte(0x0400_0001), 0x04);
        assert_eq!(registers.bus().read_halfword(0x0600_0006), 0xBEEF);
    }

    #[test]
    fn test_pixel_offset_wraps() {
        let mut registers = registers();
        // Wraps to 0x05FF_FE20, below video RAM
        registers.write_pixel(0, u32::MAX, Color::RED);
        assert!(registers.bus().region(&VRAM).iter().all(|byte| *byte == 0));

        // One row down and one pixel back
        registers.write_pixel(u32::MAX, 1, Color::GREEN);
        assert_eq!(
            registers
                .bus()
                .read_halfword(VRAM.element_address(SCREEN_WIDTH - 1)),
            0x03E0
        );
    }

    #[test]
    fn test_draw_demo_pixels() {
        let mut registers = registers();
        registers.draw_demo_pixels();

        let tests = vec![((115, 80), 0x001F), ((120, 60), 0x03E0), ((145, 80), 0x7C00)];
        for ((x, y), expected) in tests {
            let address = VRAM.element_address(y * SCREEN_WIDTH + x);
            assert_eq!(registers.bus().read_halfword(address), expected);
        }
        assert_eq!(registers.display_register(), 0x0403);

        let control = registers.display_control();
        assert_eq!(control.mode(), 3);
        assert!(control.is_bitmap_mode());
        assert!(control.contains(DisplayControl::BG2));
        assert!(!control.contains(DisplayControl::OBJECTS));
    }
}
