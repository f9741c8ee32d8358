/// Every call a script can make into the bridge.
///
/// The string forms are the names scripts use. `reg_display=` and `reg_display_vcount` are
/// older spellings that are still accepted.
#[derive(
    Debug,
    Hash,
    Eq,
    PartialEq,
    Clone,
    Copy,
    strum_macros::EnumString,
    strum_macros::Display,
    strum_macros::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum Operation {
    RunDemo,
    SetShortMemory,
    SetCharMemory,
    SetTileMemory,
    SetObjectPaletteMemory,
    SetObjAttrs,
    SetObjectPosition,
    #[strum(to_string = "display_register=", serialize = "reg_display=")]
    DisplayRegister,
    EnableConsole,
    KeyStates,
    #[strum(to_string = "display_vcount", serialize = "reg_display_vcount")]
    DisplayVcount,
}

impl Operation {
    /// Number of positional arguments the operation takes.
    pub fn arity(&self) -> usize {
        match self {
            Operation::RunDemo
            | Operation::EnableConsole
            | Operation::KeyStates
            | Operation::DisplayVcount => 0,
            Operation::DisplayRegister => 1,
            Operation::SetShortMemory
            | Operation::SetCharMemory
            | Operation::SetTileMemory
            | Operation::SetObjectPosition => 3,
            Operation::SetObjectPaletteMemory | Operation::SetObjAttrs => 4,
        }
    }

    /// Whether the operation hands an integer back to the script.
    pub fn returns_value(&self) -> bool {
        matches!(self, Operation::KeyStates | Operation::DisplayVcount)
    }

    /// Argument names, for listings and error messages.
    pub fn parameters(&self) -> &'static [&'static str] {
        match self {
            Operation::RunDemo
            | Operation::EnableConsole
            | Operation::KeyStates
            | Operation::DisplayVcount => &[],
            Operation::DisplayRegister => &["value"],
            Operation::SetShortMemory | Operation::SetCharMemory => &["address", "index", "value"],
            Operation::SetTileMemory => &["tile_index", "tile_count", "fill_value"],
            Operation::SetObjectPaletteMemory => &["index", "r", "g", "b"],
            Operation::SetObjAttrs => &["index", "attr0", "attr1", "attr2"],
            Operation::SetObjectPosition => &["index", "x", "y"],
        }
    }
}
