/// One of the seven encodings an instruction can have.
///
/// Every format starts with a 16-bit header word. Except for [`Format::F5`] the opcode occupies the
/// top six bits of that word.
#[derive(Debug, Hash, Eq, PartialEq, Clone, Copy, strum_macros::Display)]
pub enum Format {
    /// `reg, reg`
    F0,
    /// `reg, [imm]` or `reg, [label]`, followed by a 32-bit address
    F1,
    /// `imm` or `label`, conditional, followed by a 1, 2 or 4 byte value
    F2,
    /// `reg, imm` or `reg, label`, followed by a 1, 2 or 4 byte value
    F3,
    /// `reg`
    F4,
    /// No operands
    F5,
    /// `reg, [reg]`
    F6,
}

/// A concrete encoding of a mnemonic.
#[derive(Debug, Hash, Eq, PartialEq, Clone, Copy)]
pub struct InstructionSpec {
    /// 6-bit opcode
    pub opcode: u8,
    pub format: Format,
}

impl InstructionSpec {
    pub const fn new(opcode: u8, format: Format) -> InstructionSpec {
        InstructionSpec { opcode, format }
    }
}
