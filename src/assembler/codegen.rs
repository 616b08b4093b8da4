use thiserror::Error;

use crate::{
    assembler::symbols::Relocation,
    ast::{Directive, Format, Instruction, InstructionSpec, Mnemonic, Operand, OperandKind, Size},
};

/// Mapping from mnemonics to opcodes and formats.
pub mod opcode;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CodeGenError {
    #[error("Unsupported operands for {mnemonic}: {operands:?}")]
    UnsupportedOperands {
        mnemonic: Mnemonic,
        operands: Vec<OperandKind>,
    },
    #[error("{0} requires operands")]
    NoSuchVariant(Mnemonic),
}

/// Problems that do not stop the assembly.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    #[error("line {line}: overflow: {value:#x} does not fit in 32 bits and was truncated")]
    Overflow { line: usize, value: u64 },
}

/// Emits machine code into the output buffer.
///
/// Besides the buffer the code generator tracks the logical offset used for label definitions.
/// The two only differ after an `.org` directive, which moves the offset without touching the
/// buffer.
#[derive(Debug, Default)]
pub struct CodeGen {
    bytes: Vec<u8>,
    relocations: Vec<Relocation>,
    warnings: Vec<Warning>,
    current_offset: u32,
}

impl CodeGen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Logical offset of the next emitted byte.
    pub fn current_offset(&self) -> u32 {
        self.current_offset
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn relocations(&self) -> &[Relocation] {
        &self.relocations
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Output buffer, pending relocations and collected warnings.
    pub fn finish(self) -> (Vec<u8>, Vec<Relocation>, Vec<Warning>) {
        (self.bytes, self.relocations, self.warnings)
    }

    fn advance(&mut self, len: usize) {
        self.current_offset = self.current_offset.wrapping_add(len as u32);
    }

    fn push_word(&mut self, word: u16) {
        self.bytes.extend_from_slice(&word.to_le_bytes());
    }

    /// Little-endian value cut to `size`.
    fn push_value(&mut self, value: u64, size: Size) {
        let bytes = (value as u32).to_le_bytes();
        self.bytes.extend_from_slice(&bytes[..size.width()]);
    }

    /// Reserve a 32-bit address to be patched once the label is known.
    fn push_placeholder(&mut self, label: &str) {
        self.relocations.push(Relocation {
            offset: self.bytes.len() as u32,
            label: label.to_owned(),
        });
        self.push_value(0, Size::Dword);
    }

    /// Warn about a literal that will be truncated to 32 bits.
    fn check_overflow(&mut self, line: usize, value: u64) {
        if !Size::Dword.fits(value) {
            let warning = Warning::Overflow { line, value };
            tracing::warn!("{}", warning);
            self.warnings.push(warning);
        }
    }

    /// Size of the value following an F2 or F3 header.
    ///
    /// Immediates get the smallest size that holds them, labels always reserve a double word.
    fn value_size(&mut self, line: usize, operand: &Operand) -> Size {
        match operand {
            Operand::Immediate(value) => {
                self.check_overflow(line, *value);
                Size::for_value(*value)
            }
            _ => Size::Dword,
        }
    }

    /// Emit the value or the label placeholder following a header.
    fn push_operand(&mut self, operand: &Operand, size: Size) {
        match operand {
            Operand::Immediate(value) | Operand::ImmediateIndirect(value) => {
                self.push_value(*value, size)
            }
            Operand::Label(label) | Operand::LabelIndirect(label) => self.push_placeholder(label),
            Operand::Register(_) | Operand::RegisterIndirect(_) => {}
        }
    }

    /// Encode a single instruction with an already resolved encoding.
    ///
    /// Returns the number of emitted bytes.
    #[tracing::instrument(skip(self))]
    pub fn emit_instruction(
        &mut self,
        line: usize,
        ins: &Instruction,
        spec: InstructionSpec,
    ) -> Result<usize, CodeGenError> {
        let start = self.bytes.len();
        let opcode = (spec.opcode as u16 & 0x3f) << 10;

        match (spec.format, ins.operands.as_slice()) {
            (Format::F0, [Operand::Register(reg1), Operand::Register(reg2)]) => {
                self.push_word(opcode | reg1.code() << 6 | reg2.code() << 2);
            }
            (
                Format::F1,
                [Operand::Register(reg), address @ (Operand::ImmediateIndirect(_) | Operand::LabelIndirect(_))],
            ) => {
                if let Operand::ImmediateIndirect(value) = address {
                    self.check_overflow(line, *value);
                }
                self.push_word(opcode | ins.size.code() << 8 | reg.code() << 4);
                // The address is a double word whatever the access size
                self.push_operand(address, Size::Dword);
            }
            (Format::F2, [value @ (Operand::Immediate(_) | Operand::Label(_))]) => {
                let size = self.value_size(line, value);
                self.push_word(opcode | size.code() << 8 | ins.condition.code() << 5);
                self.push_operand(value, size);
            }
            (
                Format::F3,
                [Operand::Register(reg), value @ (Operand::Immediate(_) | Operand::Label(_))],
            ) => {
                let size = self.value_size(line, value);
                self.push_word(opcode | size.code() << 8 | reg.code() << 4);
                self.push_operand(value, size);
            }
            (Format::F4, [Operand::Register(reg)]) => {
                self.push_word(opcode | reg.code() << 6);
            }
            (Format::F5, []) => {
                // The only format written high byte first
                let word = (spec.opcode as u16 & 0x3f) << 2;
                self.bytes.extend_from_slice(&word.to_be_bytes());
            }
            (Format::F6, [Operand::Register(reg1), Operand::RegisterIndirect(reg2)]) => {
                self.push_word(opcode | reg1.code() << 6 | reg2.code() << 2 | ins.size.code());
            }
            _ => {
                return Err(CodeGenError::UnsupportedOperands {
                    mnemonic: ins.mnemonic,
                    operands: ins.operand_kinds(),
                })
            }
        }

        let len = self.bytes.len() - start;
        self.advance(len);
        Ok(len)
    }

    /// Emit the bytes of a data directive or move the logical offset for `.org`.
    #[tracing::instrument(skip(self))]
    pub fn emit_directive(&mut self, directive: &Directive) {
        match directive {
            Directive::Byte(bytes) => self.bytes.extend_from_slice(bytes),
            Directive::String(text) => self.bytes.extend_from_slice(text.as_bytes()),
            Directive::StringZ(text) => {
                self.bytes.extend_from_slice(text.as_bytes());
                self.bytes.push(0x00);
            }
            Directive::Origin(offset) => {
                self.current_offset = *offset;
                return;
            }
        }
        self.advance(directive.size());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Condition, Register};

    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;

    fn reg(register: Register) -> Operand {
        Operand::Register(register)
    }

    fn label(name: &str) -> Operand {
        Operand::Label(name.to_string())
    }

    fn encode(ins: Instruction, spec: InstructionSpec) -> CodeGen {
        let mut codegen = CodeGen::new();
        codegen.emit_instruction(1, &ins, spec).unwrap();
        codegen
    }

    fn ins(mnemonic: Mnemonic, operands: Vec<Operand>) -> Instruction {
        Instruction::new(mnemonic, Condition::Always, Size::Dword, operands)
    }

    #[test]
    fn test_instruction_to_bytes() {
        let tests = vec![
            // opcode 1 << 10 | r1 << 6 | r2 << 2 = 0x0448
            (
                ins(Mnemonic::Add, vec![reg(Register::R1), reg(Register::R2)]),
                InstructionSpec::new(1, Format::F0),
                vec![0x48, 0x04],
            ),
            (
                ins(Mnemonic::Xchg, vec![reg(Register::R15), reg(Register::R15)]),
                InstructionSpec::new(10, Format::F0),
                vec![0xfc, 0x2b],
            ),
            (
                Instruction::new(
                    Mnemonic::Ld,
                    Condition::Always,
                    Size::Word,
                    vec![reg(Register::R2), Operand::ImmediateIndirect(0x2000)],
                ),
                InstructionSpec::new(26, Format::F1),
                vec![0x20, 0x69, 0x00, 0x20, 0x00, 0x00],
            ),
            (
                ins(Mnemonic::Push, vec![Operand::Immediate(0x12)]),
                InstructionSpec::new(21, Format::F2),
                vec![0x00, 0x54, 0x12],
            ),
            (
                ins(Mnemonic::Push, vec![Operand::Immediate(0x1234)]),
                InstructionSpec::new(21, Format::F2),
                vec![0x00, 0x55, 0x34, 0x12],
            ),
            (
                ins(Mnemonic::Push, vec![Operand::Immediate(0x12345678)]),
                InstructionSpec::new(21, Format::F2),
                vec![0x00, 0x56, 0x78, 0x56, 0x34, 0x12],
            ),
            (
                Instruction::new(
                    Mnemonic::Jmp,
                    Condition::Greater,
                    Size::Byte,
                    vec![Operand::Immediate(0x10)],
                ),
                InstructionSpec::new(23, Format::F2),
                vec![0x60, 0x5c, 0x10],
            ),
            (
                ins(Mnemonic::Add, vec![reg(Register::R1), Operand::Immediate(0x12345)]),
                InstructionSpec::new(2, Format::F3),
                vec![0x10, 0x0a, 0x45, 0x23, 0x01, 0x00],
            ),
            (
                // The size suffix does not apply to F3
                Instruction::new(
                    Mnemonic::Ld,
                    Condition::Always,
                    Size::Byte,
                    vec![reg(Register::R1), Operand::Immediate(0x100)],
                ),
                InstructionSpec::new(27, Format::F3),
                vec![0x10, 0x6d, 0x00, 0x01],
            ),
            (
                ins(Mnemonic::Dec, vec![reg(Register::R1)]),
                InstructionSpec::new(19, Format::F4),
                vec![0x40, 0x4c],
            ),
            (
                ins(Mnemonic::Nop, vec![]),
                InstructionSpec::new(0, Format::F5),
                vec![0x00, 0x00],
            ),
            (
                ins(Mnemonic::Hlt, vec![]),
                InstructionSpec::new(35, Format::F5),
                vec![0x00, 0x8c],
            ),
            (
                Instruction::new(
                    Mnemonic::Ld,
                    Condition::Always,
                    Size::Byte,
                    vec![reg(Register::R4), Operand::RegisterIndirect(Register::R5)],
                ),
                InstructionSpec::new(28, Format::F6),
                vec![0x14, 0x71],
            ),
            (
                ins(
                    Mnemonic::St,
                    vec![reg(Register::R6), Operand::RegisterIndirect(Register::R7)],
                ),
                InstructionSpec::new(30, Format::F6),
                vec![0x9e, 0x79],
            ),
        ];

        for (ins, spec, expected) in tests {
            let codegen = encode(ins.clone(), spec);
            assert_eq!(codegen.bytes(), expected.as_slice(), "{}", ins);
            assert_eq!(codegen.current_offset() as usize, expected.len(), "{}", ins);
            assert!(codegen.relocations().is_empty());
            assert!(codegen.warnings().is_empty());
        }
    }

    #[test]
    fn test_register_fields() {
        for register in Register::iter() {
            let codegen = encode(
                ins(Mnemonic::Not, vec![reg(register)]),
                InstructionSpec::new(15, Format::F4),
            );
            let word = u16::from_le_bytes([codegen.bytes()[0], codegen.bytes()[1]]);
            assert_eq!((word >> 6) & 0xf, register.code());
            assert_eq!(word >> 10, 15);
        }
    }

    #[test]
    fn test_label_placeholders() {
        let mut codegen = CodeGen::new();
        codegen
            .emit_instruction(
                1,
                &ins(Mnemonic::Nop, vec![]),
                InstructionSpec::new(0, Format::F5),
            )
            .unwrap();
        // Labels force a double word even for F2 and F3
        codegen
            .emit_instruction(
                2,
                &ins(Mnemonic::Jmp, vec![label("start")]),
                InstructionSpec::new(23, Format::F2),
            )
            .unwrap();
        codegen
            .emit_instruction(
                3,
                &ins(Mnemonic::Ld, vec![reg(Register::R1), label("table")]),
                InstructionSpec::new(27, Format::F3),
            )
            .unwrap();
        codegen
            .emit_instruction(
                4,
                &Instruction::new(
                    Mnemonic::St,
                    Condition::Always,
                    Size::Byte,
                    vec![reg(Register::R2), Operand::LabelIndirect("data".to_string())],
                ),
                InstructionSpec::new(29, Format::F1),
            )
            .unwrap();

        assert_eq!(
            codegen.bytes(),
            &[
                /* nop */ 0x00, 0x00, /* jmp */ 0x00, 0x5e, 0x00, 0x00, 0x00, 0x00,
                /* ld */ 0x10, 0x6e, 0x00, 0x00, 0x00, 0x00, /* st */ 0x20, 0x74, 0x00,
                0x00, 0x00, 0x00,
            ]
        );
        assert_eq!(
            codegen.relocations(),
            &[
                Relocation {
                    offset: 4,
                    label: "start".to_string()
                },
                Relocation {
                    offset: 10,
                    label: "table".to_string()
                },
                Relocation {
                    offset: 16,
                    label: "data".to_string()
                },
            ]
        );
        assert_eq!(codegen.current_offset(), 20);
    }

    #[test]
    fn test_overflow_warning() {
        let codegen = encode(
            ins(Mnemonic::Push, vec![Operand::Immediate(0x1_2345_6789)]),
            InstructionSpec::new(21, Format::F2),
        );
        assert_eq!(codegen.bytes(), &[0x00, 0x56, 0x89, 0x67, 0x45, 0x23]);
        assert_eq!(
            codegen.warnings(),
            &[Warning::Overflow {
                line: 1,
                value: 0x1_2345_6789
            }]
        );

        let codegen = encode(
            ins(Mnemonic::Push, vec![Operand::Immediate(0xffff_ffff)]),
            InstructionSpec::new(21, Format::F2),
        );
        assert!(codegen.warnings().is_empty());

        let codegen = encode(
            ins(
                Mnemonic::Ld,
                vec![reg(Register::R1), Operand::ImmediateIndirect(0x1_0000_0010)],
            ),
            InstructionSpec::new(26, Format::F1),
        );
        assert_eq!(codegen.bytes(), &[0x10, 0x6a, 0x10, 0x00, 0x00, 0x00]);
        assert_eq!(
            codegen.warnings(),
            &[Warning::Overflow {
                line: 1,
                value: 0x1_0000_0010
            }]
        );
    }

    #[test]
    fn test_mismatched_operands() {
        let mut codegen = CodeGen::new();
        let ins = ins(Mnemonic::Add, vec![reg(Register::R1)]);
        assert_eq!(
            codegen.emit_instruction(1, &ins, InstructionSpec::new(1, Format::F0)),
            Err(CodeGenError::UnsupportedOperands {
                mnemonic: Mnemonic::Add,
                operands: vec![OperandKind::Register],
            })
        );
        assert!(codegen.bytes().is_empty());
        assert_eq!(codegen.current_offset(), 0);
    }

    #[test]
    fn test_directives() {
        let mut codegen = CodeGen::new();
        codegen.emit_directive(&Directive::String("AB".to_string()));
        assert_eq!(codegen.bytes(), &[0x41, 0x42]);
        assert_eq!(codegen.current_offset(), 2);

        codegen.emit_directive(&Directive::StringZ("AB".to_string()));
        assert_eq!(codegen.bytes(), &[0x41, 0x42, 0x41, 0x42, 0x00]);
        assert_eq!(codegen.current_offset(), 5);

        codegen.emit_directive(&Directive::Byte(vec![0x01, 0xff]));
        assert_eq!(codegen.current_offset(), 7);

        // .org only moves the logical offset
        codegen.emit_directive(&Directive::Origin(0x100));
        assert_eq!(codegen.current_offset(), 0x100);
        assert_eq!(codegen.bytes().len(), 7);

        codegen.emit_directive(&Directive::Byte(vec![0x02]));
        assert_eq!(codegen.current_offset(), 0x101);
        assert_eq!(
            codegen.bytes(),
            &[0x41, 0x42, 0x41, 0x42, 0x00, 0x01, 0xff, 0x02]
        );
    }

    #[test]
    fn test_offset_wraps() {
        let mut codegen = CodeGen::new();
        codegen.emit_directive(&Directive::Origin(0xffff_ffff));
        codegen.emit_directive(&Directive::Byte(vec![0x00, 0x00]));
        assert_eq!(codegen.current_offset(), 1);
    }
}
