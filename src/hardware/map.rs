//! Fixed memory layout of the display hardware.
//!
//! Every address the bridge touches is derived from the constants in this module. The
//! regions never move and never overlap, so all of this is plain `const` data.

use std::{fmt, marker::PhantomData};

pub const SCREEN_WIDTH: u32 = 240;
pub const SCREEN_HEIGHT: u32 = 160;

/// A contiguous block of memory-mapped hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryRegion {
    pub name: &'static str,
    pub base_address: u32,
    /// Size in bytes of one addressable element.
    pub element_stride: u32,
    pub element_count: u32,
}

impl MemoryRegion {
    pub const fn new(
        name: &'static str,
        base_address: u32,
        element_stride: u32,
        element_count: u32,
    ) -> Self {
        Self {
            name,
            base_address,
            element_stride,
            element_count,
        }
    }

    /// Size of the region in bytes.
    pub const fn len(&self) -> u32 {
        self.element_stride * self.element_count
    }

    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// One past the last byte of the region.
    pub const fn end_address(&self) -> u32 {
        self.base_address + self.len()
    }

    pub const fn contains(&self, address: u32) -> bool {
        address >= self.base_address && address < self.end_address()
    }

    /// Address of the element at `index`. Not bounds checked; wraps at the end of the address
    /// space.
    pub const fn element_address(&self, index: u32) -> u32 {
        self.base_address
            .wrapping_add(index.wrapping_mul(self.element_stride))
    }
}

impl fmt::Display for MemoryRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{:#010x}..{:#010x})",
            self.name,
            self.base_address,
            self.end_address()
        )
    }
}

/// I/O registers, addressed as 16-bit cells.
pub const IO: MemoryRegion = MemoryRegion::new("io", 0x0400_0000, 2, 0x200);
/// Background and object palettes, 512 colors.
pub const PALETTE: MemoryRegion = MemoryRegion::new("palette", 0x0500_0000, 2, 0x200);
/// Video RAM, 96 KiB addressed as half-words.
pub const VRAM: MemoryRegion = MemoryRegion::new("vram", 0x0600_0000, 2, 0xC000);
/// Object attribute memory, 128 records of [`OBJECT_ATTRIBUTES_SIZE`] bytes.
pub const OAM: MemoryRegion = MemoryRegion::new("oam", 0x0700_0000, OBJECT_ATTRIBUTES_SIZE, 128);

pub static REGIONS: [MemoryRegion; 4] = [IO, PALETTE, VRAM, OAM];

/// The named region containing `address`, if any.
pub fn region_of(address: u32) -> Option<&'static MemoryRegion> {
    REGIONS.iter().find(|region| region.contains(address))
}

/// Look a region up by its name, e.g. `"vram"`.
pub fn region_by_name(name: &str) -> Option<&'static MemoryRegion> {
    REGIONS
        .iter()
        .find(|region| region.name.eq_ignore_ascii_case(name))
}

// Objects

/// attr0, attr1, attr2 and the padding half-word.
pub const OBJECT_ATTRIBUTES_SIZE: u32 = 8;
pub const OBJECT_COUNT: u32 = OAM.element_count;
pub const OBJECT_ATTR0_Y_MASK: u16 = 0x0FF;
pub const OBJECT_ATTR1_X_MASK: u16 = 0x1FF;

/// The object palette lives in the upper half of palette memory.
pub const OBJECT_PALETTE: MemoryRegion = MemoryRegion::new("object palette", 0x0500_0200, 2, 256);

// Tiles

/// 8x8 pixels at 4 bits per pixel: eight 32-bit words.
pub const TILE_SIZE: u32 = 8 * 4;
pub const TILE_HALFWORDS: u32 = TILE_SIZE / 2;
pub const TILES_PER_BLOCK: u32 = 512;
pub const TILE_BLOCK_SIZE: u32 = TILE_SIZE * TILES_PER_BLOCK;
pub const TILE_BLOCK_COUNT: u32 = VRAM.len() / TILE_BLOCK_SIZE;
/// First tile block used for object tiles.
pub const SPRITE_TILE_BLOCK: u32 = 4;

/// Address of tile `tile_index` inside tile block `block_index`. Not bounds checked.
pub const fn tile_address(block_index: u32, tile_index: u32) -> u32 {
    VRAM.base_address
        .wrapping_add(block_index.wrapping_mul(TILE_BLOCK_SIZE))
        .wrapping_add(tile_index.wrapping_mul(TILE_SIZE))
}

// Scalar registers

pub enum ReadOnly {}
pub enum WriteOnly {}
pub enum ReadWrite {}

pub trait Readable {}
pub trait Writable {}

impl Readable for ReadOnly {}
impl Readable for ReadWrite {}
impl Writable for WriteOnly {}
impl Writable for ReadWrite {}

/// A single 16-bit register at a fixed address. `A` fixes its direction.
pub struct Register<A> {
    pub address: u32,
    access: PhantomData<A>,
}

impl<A> Register<A> {
    pub const fn at(offset: u32) -> Self {
        Self {
            address: IO.base_address + offset,
            access: PhantomData,
        }
    }
}

impl<A> Clone for Register<A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<A> Copy for Register<A> {}

impl<A> fmt::Debug for Register<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Register({:#010x})", self.address)
    }
}

/// DISPCNT
pub const DISPLAY_CONTROL: Register<ReadWrite> = Register::at(0x0000);
/// VCOUNT, the scanline currently being drawn.
pub const SCANLINE_COUNT: Register<ReadOnly> = Register::at(0x0006);
/// KEYINPUT, a cleared bit means the key is held.
pub const KEY_INPUT: Register<ReadOnly> = Register::at(0x0130);

/// Valid bits of [`KEY_INPUT`].
pub const KEY_ANY: u16 = 0x03FF;

bitflags::bitflags! {
    /// Display control flags at `0x04000000`.
    ///
    /// The low three bits hold the video mode, see [`DisplayControl::mode`].
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct DisplayControl: u16 {
        const MODE_MASK           = 0b0000_0000_0000_0111;
        /// Bitmap frame select for modes 4 and 5.
        const FRAME_SELECT        = 0b0000_0000_0001_0000;
        /// Object tiles are laid out one after another instead of in a 32x32 grid.
        const OBJECT_MAPPING_1D   = 0b0000_0000_0100_0000;
        const FORCED_BLANK        = 0b0000_0000_1000_0000;
        const BG0                 = 0b0000_0001_0000_0000;
        const BG1                 = 0b0000_0010_0000_0000;
        const BG2                 = 0b0000_0100_0000_0000;
        const BG3                 = 0b0000_1000_0000_0000;
        const OBJECTS             = 0b0001_0000_0000_0000;
    }

    /// Keys as reported by [`KEY_INPUT`] once inverted, so a set bit means held.
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct Keys: u16 {
        const A      = 1 << 0;
        const B      = 1 << 1;
        const SELECT = 1 << 2;
        const START  = 1 << 3;
        const RIGHT  = 1 << 4;
        const LEFT   = 1 << 5;
        const UP     = 1 << 6;
        const DOWN   = 1 << 7;
        const R      = 1 << 8;
        const L      = 1 << 9;
    }
}

impl DisplayControl {
    /// Video mode in the low three bits.
    pub fn mode(&self) -> u8 {
        use bit_field::BitField;
        self.bits().get_bits(0..3) as u8
    }

    /// Modes 3 to 5 treat video RAM as a linear framebuffer.
    pub fn is_bitmap_mode(&self) -> bool {
        (3..=5).contains(&self.mode())
    }
}
