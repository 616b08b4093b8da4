use std::str::FromStr;

use thiserror::Error;

use crate::{
    assembler::lexer::{is_identifier, InstructionToken},
    ast::{Directive, Instruction, Operand, Register},
};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid operand: {0}")]
    InvalidOperand(String),
    #[error("Invalid value: {0}")]
    InvalidValue(String),
    #[error("Unknown directive: {0}")]
    UnknownDirective(String),
    #[error("Invalid directive: {0}")]
    InvalidDirective(String),
}

/// `0x` followed by nothing but hexadecimal digits
fn is_hex(text: &str) -> bool {
    text.strip_prefix("0x")
        .is_some_and(|digits| !digits.is_empty() && digits.chars().all(|ch| ch.is_ascii_hexdigit()))
}

fn is_decimal(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|ch| ch.is_ascii_digit())
}

/// Accumulate digits in wrapping arithmetic, which keeps the low bits exact.
///
/// A number too large for 64 bits keeps its low 32 bits and gets every higher bit set, so it is
/// still out of range for a double word.
fn fold_digits(digits: &str, radix: u32) -> u64 {
    let mut value: u64 = 0;
    let mut overflow = false;
    for digit in digits.chars().filter_map(|ch| ch.to_digit(radix)) {
        let (shifted, mul_overflow) = value.overflowing_mul(radix as u64);
        let (sum, add_overflow) = shifted.overflowing_add(digit as u64);
        overflow |= mul_overflow || add_overflow;
        value = sum;
    }

    if overflow {
        value | !0xffff_ffff
    } else {
        value
    }
}

/// Decimal or `0x` prefixed hexadecimal number of any length.
pub fn parse_immediate(text: &str) -> Result<u64, ParseError> {
    if is_decimal(text) {
        Ok(fold_digits(text, 10))
    } else if is_hex(text) {
        Ok(fold_digits(&text[2..], 16))
    } else {
        Err(ParseError::InvalidValue(text.to_owned()))
    }
}

/// Directive values additionally accept hexadecimal with an `h` suffix, e.g. `0ffh`.
fn parse_directive_value(text: &str) -> Result<u64, ParseError> {
    match text.strip_suffix('h') {
        Some(digits) if !digits.is_empty() && digits.chars().all(|ch| ch.is_ascii_hexdigit()) => {
            Ok(fold_digits(digits, 16))
        }
        _ => parse_immediate(text),
    }
}

/// Classify the text of a single operand into its addressing mode.
///
/// Rules are tried in order and the first match wins:
///
/// 1. register name: `r3`
/// 2. hexadecimal: `0x2a`
/// 3. decimal: `42`
/// 4. label: `loop_1`
/// 5. bracketed register, hexadecimal or label: `[r3]`, `[0x2a]`, `[buffer]`
#[tracing::instrument]
pub fn classify(text: &str) -> Result<Operand, ParseError> {
    let invalid = || ParseError::InvalidOperand(text.to_owned());

    if let Ok(register) = Register::from_str(text) {
        return Ok(Operand::Register(register));
    }
    if let Ok(value) = parse_immediate(text) {
        return Ok(Operand::Immediate(value));
    }
    if is_identifier(text) {
        return Ok(Operand::Label(text.to_owned()));
    }

    let inner = text
        .strip_prefix('[')
        .and_then(|text| text.strip_suffix(']'))
        .ok_or_else(invalid)?;

    if let Ok(register) = Register::from_str(inner) {
        Ok(Operand::RegisterIndirect(register))
    } else if is_hex(inner) {
        parse_immediate(inner)
            .map(Operand::ImmediateIndirect)
            .map_err(|_| invalid())
    } else if is_identifier(inner) {
        Ok(Operand::LabelIndirect(inner.to_owned()))
    } else {
        Err(invalid())
    }
}

/// Classify the operands of an instruction line.
#[tracing::instrument]
pub fn parse_instruction(token: &InstructionToken) -> Result<Instruction, ParseError> {
    let operands = token
        .operands
        .iter()
        .map(|operand| classify(operand))
        .collect::<Result<Vec<Operand>, ParseError>>()?;

    Ok(Instruction::new(
        token.mnemonic,
        token.condition,
        token.size,
        operands,
    ))
}

/// The text between the surrounding double quotes of a directive argument.
fn parse_quoted(directive: &str, args: &str) -> Result<String, ParseError> {
    args.trim()
        .strip_prefix('"')
        .and_then(|args| args.strip_suffix('"'))
        .map(str::to_owned)
        .ok_or_else(|| ParseError::InvalidDirective(directive.to_owned()))
}

/// Parse a directive line such as `.byte 1, 2, 3`, `.stringz "text"` or `.org 0x100`.
#[tracing::instrument]
pub fn parse_directive(text: &str) -> Result<Directive, ParseError> {
    let text = text.trim();
    let (keyword, args) = text
        .split_once(char::is_whitespace)
        .unwrap_or((text, ""));

    match keyword {
        ".byte" => {
            let bytes = args
                .split(|ch: char| ch == ',' || ch.is_whitespace())
                .filter(|value| !value.is_empty())
                // Only the low byte is kept
                .map(|value| parse_directive_value(value).map(|value| value as u8))
                .collect::<Result<Vec<u8>, ParseError>>()?;
            Ok(Directive::Byte(bytes))
        }
        ".string" => Ok(Directive::String(parse_quoted(text, args)?)),
        ".stringz" => Ok(Directive::StringZ(parse_quoted(text, args)?)),
        ".org" => {
            let values = args.split_whitespace().collect::<Vec<&str>>();
            match values.as_slice() {
                [value] => Ok(Directive::Origin(parse_directive_value(value)? as u32)),
                _ => Err(ParseError::InvalidDirective(text.to_owned())),
            }
        }
        _ => Err(ParseError::UnknownDirective(keyword.to_owned())),
    }
}
