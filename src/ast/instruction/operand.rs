use std::fmt;

use super::Register;

/// An operand of an [`instruction`][super::Instruction] together with its value.
///
/// The variant is the addressing mode of the operand, available without the value as
/// [`OperandKind`].
#[derive(Debug, Hash, Eq, PartialEq, Clone, strum_macros::EnumDiscriminants)]
#[strum_discriminants(name(OperandKind), derive(Hash))]
pub enum Operand {
    /// `r3`
    Register(Register),
    /// `42` or `0x2a`
    Immediate(u64),
    /// `[r3]`
    RegisterIndirect(Register),
    /// `[0x2a]`
    ImmediateIndirect(u64),
    /// `label`, replaced by the label offset during relocation
    Label(String),
    /// `[label]`, replaced by the label offset during relocation
    LabelIndirect(String),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Register(register) => write!(f, "{}", register),
            Operand::Immediate(value) => write!(f, "{:#x}", value),
            Operand::RegisterIndirect(register) => write!(f, "[{}]", register),
            Operand::ImmediateIndirect(address) => write!(f, "[{:#x}]", address),
            Operand::Label(label) => write!(f, "{}", label),
            Operand::LabelIndirect(label) => write!(f, "[{}]", label),
        }
    }
}
