/// Mnemonic of an instruction.
///
/// This represents the operation that is performed by the instruction. Which encodings a mnemonic
/// supports is defined by the instruction table in
/// [`codegen::opcode`][crate::assembler::codegen::opcode].
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
#[strum(serialize_all = "lowercase")]
pub enum Mnemonic {
    Nop,
    Add,
    Sub,
    Mul,
    Div,
    Cpy,
    Xchg,
    And,
    Or,
    Not,
    Xor,
    Inc,
    Dec,
    Push,
    Pop,
    Jmp,
    Call,
    Int,
    Ld,
    St,
    Cmp,
    Ret,
    Iret,
    Hlt,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_parse_mnemonic() {
        let tests = vec![
            ("nop", Mnemonic::Nop),
            ("xchg", Mnemonic::Xchg),
            ("ld", Mnemonic::Ld),
            ("iret", Mnemonic::Iret),
        ];
        for (input, expected) in tests {
            assert_eq!(Mnemonic::from_str(input), Ok(expected));
            assert_eq!(expected.to_string(), input);
        }
        assert!(Mnemonic::from_str("NOP").is_err());
        assert!(Mnemonic::from_str("mov").is_err());
    }
}
