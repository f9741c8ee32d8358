//! The hardware side of the bridge.
//!
//! - [`map`] holds the addresses and layouts of the display hardware.
//! - [`codec`] packs and unpacks register bit fields.
//! - [`registers`] performs the actual loads and stores through a [`bus::Bus`].
//!
//! Execution is single threaded. None of the regions support atomic updates, so a port
//! that adds a second execution context has to serialize every access itself.

pub mod bus;
pub mod codec;
pub mod map;
pub mod registers;

pub use bus::{Bus, Memory, Mmio};
pub use codec::{compose_color, decompose_color, merge_position_field, Color};
pub use registers::{ObjectAttributes, RawAccess, Registers};
