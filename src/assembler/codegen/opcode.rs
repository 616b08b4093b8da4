use lazy_static::lazy_static;
use std::collections::HashMap;

use super::CodeGenError;
use crate::ast::{Format, InstructionSpec, Mnemonic, OperandKind};

/// A mapper between mnemonics and the encodings they support.
#[derive(Debug)]
pub struct InstructionTable {
    variants: HashMap<Mnemonic, Vec<InstructionSpec>>,
}

impl InstructionTable {
    /// All encodings of a mnemonic, in table order.
    #[tracing::instrument]
    pub fn variants(&self, mnemonic: Mnemonic) -> &[InstructionSpec] {
        self.variants
            .get(&mnemonic)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Find the encoding of a mnemonic with the given format.
    #[tracing::instrument]
    pub fn find_spec(&self, mnemonic: Mnemonic, format: Format) -> Option<InstructionSpec> {
        self.variants(mnemonic)
            .iter()
            .find(|spec| spec.format == format)
            .copied()
    }

    #[tracing::instrument]
    fn new() -> Self {
        use Format::*;

        let mappings = vec![
            (Mnemonic::Nop, 0, F5),
            (Mnemonic::Add, 1, F0),
            (Mnemonic::Add, 2, F3),
            (Mnemonic::Sub, 3, F0),
            (Mnemonic::Sub, 4, F3),
            (Mnemonic::Mul, 5, F0),
            (Mnemonic::Mul, 6, F3),
            (Mnemonic::Div, 7, F0),
            (Mnemonic::Div, 8, F3),
            (Mnemonic::Cpy, 9, F0),
            (Mnemonic::Xchg, 10, F0),
            (Mnemonic::And, 11, F0),
            (Mnemonic::And, 12, F3),
            (Mnemonic::Or, 13, F0),
            (Mnemonic::Or, 14, F3),
            (Mnemonic::Not, 15, F4),
            (Mnemonic::Xor, 16, F0),
            (Mnemonic::Xor, 17, F3),
            (Mnemonic::Inc, 18, F4),
            (Mnemonic::Dec, 19, F4),
            (Mnemonic::Push, 20, F4),
            (Mnemonic::Push, 21, F2),
            (Mnemonic::Pop, 22, F4),
            (Mnemonic::Jmp, 23, F2),
            (Mnemonic::Call, 24, F2),
            (Mnemonic::Int, 25, F2),
            (Mnemonic::Ld, 26, F1),
            (Mnemonic::Ld, 27, F3),
            (Mnemonic::Ld, 28, F6),
            (Mnemonic::St, 29, F1),
            (Mnemonic::St, 30, F6),
            (Mnemonic::Cmp, 31, F0),
            (Mnemonic::Cmp, 32, F3),
            (Mnemonic::Ret, 33, F5),
            (Mnemonic::Iret, 34, F5),
            (Mnemonic::Hlt, 35, F5),
        ];

        let mut variants: HashMap<Mnemonic, Vec<InstructionSpec>> = HashMap::new();
        for (mnemonic, opcode, format) in mappings {
            variants
                .entry(mnemonic)
                .or_default()
                .push(InstructionSpec::new(opcode, format));
        }

        InstructionTable { variants }
    }
}

lazy_static! {
    pub static ref INSTRUCTION_TABLE: InstructionTable = InstructionTable::new();
}

/// The format implied by the addressing modes of the operands.
fn format_for_operands(kinds: &[OperandKind]) -> Option<Format> {
    use OperandKind::*;

    match kinds {
        [] => Some(Format::F5),
        [Immediate | Label] => Some(Format::F2),
        [Register] => Some(Format::F4),
        [Register, Register] => Some(Format::F0),
        [Register, ImmediateIndirect | LabelIndirect] => Some(Format::F1),
        [Register, Immediate | Label] => Some(Format::F3),
        [Register, RegisterIndirect] => Some(Format::F6),
        _ => None,
    }
}

/// Select the encoding of a mnemonic from the addressing modes of its operands.
#[tracing::instrument]
pub fn resolve(mnemonic: Mnemonic, kinds: &[OperandKind]) -> Result<InstructionSpec, CodeGenError> {
    let format = format_for_operands(kinds).ok_or_else(|| CodeGenError::UnsupportedOperands {
        mnemonic,
        operands: kinds.to_vec(),
    })?;

    match INSTRUCTION_TABLE.find_spec(mnemonic, format) {
        Some(spec) => Ok(spec),
        None if kinds.is_empty() => Err(CodeGenError::NoSuchVariant(mnemonic)),
        None => Err(CodeGenError::UnsupportedOperands {
            mnemonic,
            operands: kinds.to_vec(),
        }),
    }
}
