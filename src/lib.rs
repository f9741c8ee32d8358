/// Display hardware of the GBA: memory map, bit-field codec and register accessors.
pub mod hardware;

/// The call surface a script runtime drives the hardware through.
///
/// The steps of a call are:
/// 1. **Resolving** - turning the called name into an [`host::Operation`]
/// 2. **Validating** - checking arity, argument types and ranges
/// 3. **Dispatching** - invoking exactly one register accessor
pub mod host;

/// Reference call-script runtime for driving the bridge on a host machine.
///
/// Scripts are lexed into tokens, parsed into statements and evaluated in order against a
/// [`host::CallSurface`].
pub mod runtime;

/// Command line entry points
pub mod cli;

/// Hexdump utility
pub mod hexdump;

pub mod instrumentation;
