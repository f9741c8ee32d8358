//! The call surface handed to the script runtime.
//!
//! A call arrives as a name plus positional [`Value`]s. It is resolved to an [`Operation`],
//! its arguments are checked and converted, and only then is a single accessor on
//! [`Registers`] invoked. A call that fails any check returns a [`CallError`] before
//! anything is stored, so a rejected call leaves the hardware as it was.
//!
//! Checks done here:
//! - arity and integer type of every argument
//! - object index below 128 and object palette index below 256
//! - the tile run stays inside the 512 tiles of the object tile block
//! - raw store addresses fit in 32 bits, half-word stores land on an even address
//!
//! Not checked: the active video mode, color channels above 31 (they spill into the
//! next channel), and which hardware a raw store lands on. Register values are truncated to the width of the store.

use std::str::FromStr;

use thiserror::Error;

use crate::hardware::{
    bus::{Bus, Memory},
    map::{self, OBJECT_COUNT, OBJECT_PALETTE, SPRITE_TILE_BLOCK, TILES_PER_BLOCK},
    registers::Registers,
};

mod boot;
mod operation;
mod value;

pub use boot::{Boot, HeadlessBoot};
pub use operation::Operation;
pub use value::Value;

/// Name of the class the operations and constants are registered under.
pub const CLASS_NAME: &str = "GBA";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CallError {
    #[error("Undefined operation: {0}")]
    UnknownOperation(String),
    #[error("Wrong number of arguments for {operation}: expected {expected}, got {got}")]
    ArityMismatch {
        operation: Operation,
        expected: usize,
        got: usize,
    },
    #[error("Argument {position} of {operation}: expected {expected}, got {got}")]
    TypeMismatch {
        operation: Operation,
        position: usize,
        expected: &'static str,
        got: &'static str,
    },
    #[error("{operation}: {argument} = {value} is out of range (limit {limit})")]
    OutOfRange {
        operation: Operation,
        argument: &'static str,
        value: i64,
        limit: i64,
    },
    #[error("{operation}: {address:#x} is not a 32-bit address")]
    InvalidAddress { operation: Operation, address: i64 },
    #[error("{operation}: half-word store to odd address {address:#010x}")]
    Misaligned { operation: Operation, address: u32 },
}

/// What a script runtime sees of the bridge.
pub trait CallSurface {
    /// Invoke the operation registered as `name`.
    fn call(&mut self, name: &str, args: &[Value]) -> Result<Value, CallError>;

    /// Look up a constant registered on the class.
    fn constant(&self, name: &str) -> Option<Value>;
}

/// Constants registered on the class, in registration order.
pub fn constants() -> Vec<(&'static str, Value)> {
    vec![
        ("NDEBUG", Value::Bool(!cfg!(debug_assertions))),
        ("SCREEN_HEIGHT", map::SCREEN_HEIGHT.into()),
        ("SCREEN_WIDTH", map::SCREEN_WIDTH.into()),
        ("MEM_IO", map::IO.base_address.into()),
        ("MEM_VRAM", map::VRAM.base_address.into()),
    ]
}

/// Positional arguments of one call, already checked for arity.
struct Args<'a> {
    operation: Operation,
    values: &'a [Value],
}

impl<'a> Args<'a> {
    fn new(operation: Operation, values: &'a [Value]) -> Result<Self, CallError> {
        if values.len() != operation.arity() {
            return Err(CallError::ArityMismatch {
                operation,
                expected: operation.arity(),
                got: values.len(),
            });
        }
        Ok(Self { operation, values })
    }

    fn integer(&self, position: usize) -> Result<i64, CallError> {
        let value = &self.values[position];
        value.as_integer().ok_or(CallError::TypeMismatch {
            operation: self.operation,
            position,
            expected: "integer",
            got: value.type_name(),
        })
    }

    /// Every argument as an integer.
    fn integers<const N: usize>(&self) -> Result<[i64; N], CallError> {
        let mut integers = [0; N];
        for (position, integer) in integers.iter_mut().enumerate() {
            *integer = self.integer(position)?;
        }
        Ok(integers)
    }

    fn out_of_range(&self, argument: &'static str, value: i64, limit: i64) -> CallError {
        CallError::OutOfRange {
            operation: self.operation,
            argument,
            value,
            limit,
        }
    }

    /// An index that must lie in `0..limit`.
    fn index(&self, argument: &'static str, value: i64, limit: u32) -> Result<u32, CallError> {
        if (0..limit as i64).contains(&value) {
            Ok(value as u32)
        } else {
            Err(self.out_of_range(argument, value, limit as i64))
        }
    }

    /// The address `address + index * width`. Any 32-bit address is accepted; only half-word
    /// stores have to be aligned.
    fn raw_target(&self, address: i64, index: i64, width: i64) -> Result<u32, CallError> {
        let target = index
            .checked_mul(width)
            .and_then(|offset| address.checked_add(offset))
            .and_then(|target| u32::try_from(target).ok());

        match target {
            Some(target) if width == 2 && target % 2 != 0 => Err(CallError::Misaligned {
                operation: self.operation,
                address: target,
            }),
            Some(target) => Ok(target),
            None => Err(CallError::InvalidAddress {
                operation: self.operation,
                address: address.saturating_add(index.saturating_mul(width)),
            }),
        }
    }
}

/// The bridge between script calls and the display hardware.
#[derive(Debug)]
pub struct HostCalls<B: Bus, C: Boot> {
    registers: Registers<B>,
    boot: C,
}

impl HostCalls<Memory, HeadlessBoot> {
    /// A bridge over simulated hardware.
    pub fn simulated() -> Self {
        Self::new(Registers::new(Memory::new()), HeadlessBoot::default())
    }
}

impl<B: Bus, C: Boot> HostCalls<B, C> {
    pub fn new(registers: Registers<B>, boot: C) -> Self {
        Self { registers, boot }
    }

    pub fn registers(&self) -> &Registers<B> {
        &self.registers
    }

    pub fn registers_mut(&mut self) -> &mut Registers<B> {
        &mut self.registers
    }

    pub fn boot(&self) -> &C {
        &self.boot
    }

    /// Check `args` against `operation` and run it.
    #[tracing::instrument(skip(self))]
    pub fn dispatch(&mut self, operation: Operation, args: &[Value]) -> Result<Value, CallError> {
        let args = Args::new(operation, args)?;

        let result = match operation {
            Operation::RunDemo => {
                self.registers.draw_demo_pixels();
                Value::Nil
            }
            Operation::SetShortMemory => {
                let [address, index, value] = args.integers::<3>()?;
                let target = args.raw_target(address, index, 2)?;
                self.registers.raw().write_halfword(target, 0, value as u16);
                Value::Nil
            }
            Operation::SetCharMemory => {
                let [address, index, value] = args.integers::<3>()?;
                let target = args.raw_target(address, index, 1)?;
                self.registers.raw().write_byte(target, 0, value as u8);
                Value::Nil
            }
            Operation::SetTileMemory => {
                let [tile_index, tile_count, fill_value] = args.integers::<3>()?;
                let tile_index = match u32::try_from(tile_index) {
                    Ok(index) if index <= TILES_PER_BLOCK => index,
                    _ => {
                        return Err(args.out_of_range(
                            "tile_index",
                            tile_index,
                            TILES_PER_BLOCK as i64,
                        ))
                    }
                };
                let tile_count = match u32::try_from(tile_count) {
                    Ok(count) if count <= TILES_PER_BLOCK - tile_index => count,
                    _ => {
                        return Err(args.out_of_range(
                            "tile_index + tile_count",
                            (tile_index as i64).saturating_add(tile_count),
                            TILES_PER_BLOCK as i64,
                        ))
                    }
                };
                self.registers.fill_tile_run(
                    SPRITE_TILE_BLOCK,
                    tile_index,
                    tile_count,
                    fill_value as u16,
                );
                Value::Nil
            }
            Operation::SetObjectPaletteMemory => {
                let [index, r, g, b] = args.integers::<4>()?;
                let index = args.index("index", index, OBJECT_PALETTE.element_count)?;
                self.registers
                    .set_object_palette_entry(index, r as u16, g as u16, b as u16);
                Value::Nil
            }
            Operation::SetObjAttrs => {
                let [index, attr0, attr1, attr2] = args.integers::<4>()?;
                let index = args.index("index", index, OBJECT_COUNT)?;
                self.registers
                    .set_object_attributes(index, attr0 as u16, attr1 as u16, attr2 as u16);
                Value::Nil
            }
            Operation::SetObjectPosition => {
                let [index, x, y] = args.integers::<3>()?;
                let index = args.index("index", index, OBJECT_COUNT)?;
                self.registers
                    .set_object_position(index, x as u16, y as u16);
                Value::Nil
            }
            Operation::DisplayRegister => {
                let [value] = args.integers::<1>()?;
                self.registers.set_display_register(value as u16);
                Value::Nil
            }
            Operation::EnableConsole => {
                self.boot.enable_vblank_interrupt();
                self.boot.init_text_console();
                Value::Nil
            }
            Operation::KeyStates => self.registers.read_key_state().into(),
            Operation::DisplayVcount => self.registers.read_scanline_counter().into(),
        };

        tracing::debug!("{} -> {}", operation, result);
        Ok(result)
    }
}

impl<B: Bus, C: Boot> CallSurface for HostCalls<B, C> {
    fn call(&mut self, name: &str, args: &[Value]) -> Result<Value, CallError> {
        let operation = Operation::from_str(name)
            .map_err(|_| CallError::UnknownOperation(name.to_owned()))?;
        self.dispatch(operation, args)
    }

    fn constant(&self, name: &str) -> Option<Value> {
        constants()
            .into_iter()
            .find(|(constant, _)| *constant == name)
            .map(|(_, value)| value)
    }
}
