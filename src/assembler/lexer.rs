use std::str::FromStr;

use thiserror::Error;

use crate::ast::{Condition, Mnemonic, Size};

/// Lexical units of the assembler.
pub mod token;

pub use token::{InstructionToken, Token};

// Line forms:
//
// start:
//     ld r1, 10
// loop:
//     dec r1
//     neq jmp loop
//     st.b r1, [r2]
// .org 0x100
// .stringz "done"

/// Maximum number of operands of an instruction
const MAX_OPERANDS: usize = 2;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LexError {
    #[error("Cannot parse line: `{0}`")]
    Syntax(String),
    #[error("Unknown mnemonic: {0}")]
    UnknownMnemonic(String),
}

/// Label names and label operands: letters, digits and underscores.
pub fn is_identifier(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

/// Characters an operand may consist of, optionally wrapped in brackets.
fn is_operand(text: &str) -> bool {
    let body = text.strip_prefix('[').unwrap_or(text);
    let body = body.strip_suffix(']').unwrap_or(body);
    !body.is_empty()
        && body
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '#' | '-' | '_' | '.'))
}

/// Reads an instruction line character by character.
struct Lexer<'a> {
    input: &'a str,       // Trimmed instruction line
    position: usize,      // Current position in input (points to current char)
    read_position: usize, // Current reading position in input (after current char)
    ch: Option<char>,     // Current char under examination
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        let mut lexer = Self {
            input,
            position: 0,
            read_position: 0,
            ch: None,
        };
        lexer.read_char();
        lexer
    }

    fn read_char(&mut self) {
        self.position = self.read_position;
        self.ch = self.input[self.read_position..].chars().next();
        if let Some(ch) = self.ch {
            self.read_position += ch.len_utf8();
        }
    }

    fn is_whitespace(&self) -> bool {
        matches!(self.ch, Some(ch) if ch.is_whitespace())
    }

    /// End of a word: whitespace or end of line.
    fn at_separator(&self) -> bool {
        self.ch.is_none() || self.is_whitespace()
    }

    fn skip_whitespace(&mut self) {
        while self.is_whitespace() {
            self.read_char();
        }
    }

    fn read_while(&mut self, predicate: impl Fn(char) -> bool) -> &'a str {
        let position = self.position;
        while matches!(self.ch, Some(ch) if predicate(ch)) {
            self.read_char();
        }
        &self.input[position..self.position]
    }

    fn syntax_error(&self) -> LexError {
        LexError::Syntax(self.input.to_owned())
    }

    fn read_operands(&mut self) -> Result<Vec<String>, LexError> {
        let mut operands = Vec::new();

        self.skip_whitespace();
        if self.ch.is_none() {
            return Ok(operands);
        }

        loop {
            let operand = self.read_while(|ch| !ch.is_whitespace() && ch != ',');
            if !is_operand(operand) || operands.len() == MAX_OPERANDS {
                return Err(self.syntax_error());
            }
            operands.push(operand.to_owned());

            self.skip_whitespace();
            match self.ch {
                None => return Ok(operands),
                Some(',') => {
                    self.read_char();
                    self.skip_whitespace();
                }
                Some(_) => return Err(self.syntax_error()),
            }
        }
    }

    fn read_instruction(&mut self) -> Result<InstructionToken, LexError> {
        let first = self.read_while(|ch| ch.is_ascii_lowercase());

        // A condition keyword is only a prefix when a mnemonic follows it
        let (condition, mnemonic) = match Condition::from_str(first) {
            Ok(condition) if !first.is_empty() && self.is_whitespace() => {
                self.skip_whitespace();
                (condition, self.read_while(|ch| ch.is_ascii_lowercase()))
            }
            _ => (Condition::Always, first),
        };
        if mnemonic.is_empty() {
            return Err(self.syntax_error());
        }

        let size = if self.ch == Some('.') {
            self.read_char();
            let suffix = self.read_while(|ch| ch.is_ascii_alphanumeric());
            Size::from_str(suffix).map_err(|_| self.syntax_error())?
        } else {
            Size::default()
        };

        if !self.at_separator() {
            return Err(self.syntax_error());
        }

        let operands = self.read_operands()?;

        let mnemonic = Mnemonic::from_str(mnemonic)
            .map_err(|_| LexError::UnknownMnemonic(mnemonic.to_owned()))?;

        Ok(InstructionToken {
            mnemonic,
            operands,
            size,
            condition,
        })
    }
}

/// Convert a single source line into a token.
#[tracing::instrument]
pub fn lex(line: &str) -> Result<Token, LexError> {
    let text = line.trim();

    if text.is_empty() {
        return Ok(Token::Blank);
    }

    if let Some(label) = text.strip_suffix(':') {
        if is_identifier(label) {
            return Ok(Token::LabelDef(label.to_owned()));
        }
    }

    if text.starts_with('.') {
        return Ok(Token::Directive(text.to_owned()));
    }

    Lexer::new(text).read_instruction().map(Token::Instruction)
}
