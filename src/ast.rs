pub mod directive;
pub mod instruction;

pub use directive::Directive;
pub use instruction::{
    Condition, Format, Instruction, InstructionSpec, Mnemonic, Operand, OperandKind, Register, Size,
};
