use std::fmt;

use bit_field::BitField;

/// A 15-bit BGR color as stored in palette memory and bitmap video RAM.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub u16);

impl Color {
    pub const RED: Color = Color(0x001F);
    pub const GREEN: Color = Color(0x03E0);
    pub const BLUE: Color = Color(0x7C00);

    pub const fn bits(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (r, g, b) = decompose_color(*self);
        write!(f, "rgb({}, {}, {})", r, g, b)
    }
}

/// Compose a color from three 5-bit channels.
///
/// Channels are used as given. A channel above 31 spills into the next channel up, so
/// callers clamp to `0..=31` first.
pub const fn compose_color(r: u16, g: u16, b: u16) -> Color {
    Color(r | (g << 5) | (b << 10))
}

/// Split a color back into its `(r, g, b)` channels.
pub fn decompose_color(color: Color) -> (u16, u16, u16) {
    let bits = color.0;
    (bits.get_bits(0..5), bits.get_bits(5..10), bits.get_bits(10..15))
}

/// Replace the bits of `current` selected by `mask` with those of `new_value`.
///
/// Every bit outside `mask` keeps its value from `current`.
pub const fn merge_position_field(current: u16, new_value: u16, mask: u16) -> u16 {
    (current & !mask) | (new_value & mask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::map::{OBJECT_ATTR0_Y_MASK, OBJECT_ATTR1_X_MASK};

    use pretty_assertions::assert_eq;

    #[test]
    fn test_compose_color() {
        let tests = vec![
            ((31, 0, 0), 0x001F),
            ((0, 31, 0), 0x03E0),
            ((0, 0, 31), 0x7C00),
            ((31, 31, 31), 0x7FFF),
            ((31, 0, 31), 0x7C1F),
            ((0, 0, 0), 0x0000),
        ];
        for ((r, g, b), expected) in tests {
            assert_eq!(compose_color(r, g, b), Color(expected));
        }
    }

    #[test]
    fn test_decompose_every_channel_value() {
        for r in 0..32 {
            for g in 0..32 {
                for b in 0..32 {
                    let color = compose_color(r, g, b);
                    assert_eq!(color.0, r | (g << 5) | (b << 10));
                    assert_eq!(decompose_color(color), (r, g, b));
                }
            }
        }
    }

    #[test]
    fn test_out_of_range_channel_bleeds() {
        // 32 in red carries into the lowest green bit
        assert_eq!(compose_color(32, 0, 0), compose_color(0, 1, 0));
    }

    #[test]
    fn test_merge_position_field() {
        let tests = vec![
            ((0x8000, 96, OBJECT_ATTR0_Y_MASK), 0x8060),
            ((0x80FF, 0, OBJECT_ATTR0_Y_MASK), 0x8000),
            ((0x4000, 5, OBJECT_ATTR1_X_MASK), 0x4005),
            ((0xFFFF, 0x0300, OBJECT_ATTR1_X_MASK), 0xFF00),
            ((0x0000, 0xFFFF, OBJECT_ATTR0_Y_MASK), 0x00FF),
        ];
        for ((current, new_value, mask), expected) in tests {
            assert_eq!(merge_position_field(current, new_value, mask), expected);
        }
    }

    #[test]
    fn test_merge_keeps_bits_outside_mask() {
        for mask in [OBJECT_ATTR0_Y_MASK, OBJECT_ATTR1_X_MASK] {
            for current in (0..=u16::MAX).step_by(251) {
                for new_value in [0x0000, 0x0155, 0x01FF, 0xFFFF] {
                    let merged = merge_position_field(current, new_value, mask);
                    assert_eq!(merged & !mask, current & !mask);
                    assert_eq!(merged & mask, new_value & mask);
                }
            }
        }
    }
}
