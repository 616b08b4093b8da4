pub mod condition;
pub mod format;
pub mod mnemonic;
pub mod operand;
pub mod register;
pub mod size;

use std::fmt;

pub use condition::Condition;
pub use format::{Format, InstructionSpec};
pub use mnemonic::Mnemonic;
pub use operand::{Operand, OperandKind};
pub use register::Register;
pub use size::Size;

/// A CPU instruction with its classified operands.
///
/// `size` is the explicit `.b`/`.w`/`.d` suffix of the source line (double word when absent) and
/// `condition` the optional condition prefix. Whether either ends up in the encoding depends on the
/// [`Format`] the instruction resolves to.
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct Instruction {
    pub mnemonic: Mnemonic,
    pub condition: Condition,
    pub size: Size,
    pub operands: Vec<Operand>,
}

impl Instruction {
    pub fn new(
        mnemonic: Mnemonic,
        condition: Condition,
        size: Size,
        operands: Vec<Operand>,
    ) -> Instruction {
        Instruction {
            mnemonic,
            condition,
            size,
            operands,
        }
    }

    /// Addressing mode classification of each operand, in source order.
    pub fn operand_kinds(&self) -> Vec<OperandKind> {
        self.operands.iter().map(OperandKind::from).collect()
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.condition != Condition::Always {
            write!(f, "{} ", self.condition)?;
        }
        write!(f, "{}", self.mnemonic)?;
        if self.size != Size::default() {
            write!(f, ".{}", self.size)?;
        }
        let operands = self
            .operands
            .iter()
            .map(|operand| operand.to_string())
            .collect::<Vec<String>>();
        if !operands.is_empty() {
            write!(f, " {}", operands.join(", "))?;
        }
        Ok(())
    }
}
