use crate::ast::{Condition, Mnemonic, Size};

/// Token is the lexical unit of the assembler: one source line.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Token {
    /// `name:`
    LabelDef(String),
    /// `[cond ]mnemonic[.size] [operand1[, operand2]]`
    Instruction(InstructionToken),
    /// Any line starting with `.`, kept verbatim for the directive parser.
    Directive(String),
    /// Empty or whitespace-only line
    Blank,
}

/// An instruction line whose operands are not classified yet.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct InstructionToken {
    pub mnemonic: Mnemonic,
    /// Raw operand texts, at most two
    pub operands: Vec<String>,
    pub size: Size,
    pub condition: Condition,
}

impl InstructionToken {
    pub fn new(mnemonic: Mnemonic, operands: &[&str]) -> Self {
        Self {
            mnemonic,
            operands: operands.iter().map(|operand| operand.to_string()).collect(),
            size: Size::default(),
            condition: Condition::default(),
        }
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = condition;
        self
    }
}
