use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::hexdump::hexdump;

/// Splits source lines into tokens.
///
/// Every line is one token. For example the line `neq jmp.d loop` becomes
///
/// ```text
/// Token::Instruction(InstructionToken {
///     mnemonic: Mnemonic::Jmp,
///     operands: ["loop"],
///     size: Size::Dword,
///     condition: Condition::NotEqual,
/// })
/// ```
pub mod lexer;

/// Classifies operands and parses directives.
pub mod parser;

/// Generates machine code from instructions and directives.
pub mod codegen;

/// Labels and the relocations referring to them.
pub mod symbols;

/// Runs the passes over a lexed program.
pub mod compiler;

pub use codegen::{CodeGenError, Warning};
pub use lexer::LexError;
pub use parser::ParseError;
pub use symbols::{SymbolError, SymbolTable};

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum AssemblerError {
    #[error("Line {line}: {source}")]
    Lex { line: usize, source: LexError },
    #[error("Line {line}: {source}")]
    Parse { line: usize, source: ParseError },
    #[error("Line {line}: {source}")]
    CodeGen { line: usize, source: CodeGenError },
    #[error(transparent)]
    Symbol(#[from] SymbolError),
}

/// A successfully assembled program.
#[derive(Debug, PartialEq, Eq)]
pub struct Assembly {
    /// The flat binary image
    pub bytes: Vec<u8>,
    /// Final offset of every label
    pub symbols: SymbolTable,
    /// Non-fatal diagnostics in source order
    pub warnings: Vec<Warning>,
}

/// Assemble a program given as source lines.
///
/// Every line is lexed before anything is emitted, so a syntax error anywhere stops the assembly
/// before code generation starts. Line numbers in errors and warnings are 1-based.
#[tracing::instrument(skip(lines))]
pub fn assemble_lines<S: AsRef<str>>(lines: &[S]) -> Result<Assembly, AssemblerError> {
    let mut tokens = Vec::with_capacity(lines.len());
    for (index, line) in lines.iter().enumerate() {
        let line_number = index + 1;
        let token = lexer::lex(line.as_ref()).map_err(|source| AssemblerError::Lex {
            line: line_number,
            source,
        })?;
        if token != lexer::Token::Blank {
            tokens.push((line_number, token));
        }
    }

    compiler::Compiler::new().compile(tokens)
}

/// Utility function for generating machine code from an assembly program.
#[tracing::instrument]
pub fn compile_code(input: &str) -> Result<Vec<u8>, AssemblerError> {
    let lines = input.lines().collect::<Vec<&str>>();
    Ok(assemble_lines(&lines)?.bytes)
}

#[derive(clap::Args, Debug)]
pub struct AssemblyArgs {
    #[clap(help = "Assembly source file")]
    pub input: PathBuf,
    #[clap(short, long, default_value = "out.bin")]
    #[clap(help = "Output binary file")]
    pub output: PathBuf,
    #[clap(long)]
    #[clap(help = "Print a hexdump of the assembled program")]
    pub hexdump: bool,
    #[clap(long)]
    #[clap(help = "Print the symbol table")]
    pub symbols: bool,
}

/// Assemble the input file and write the binary.
///
/// Nothing is written unless the whole program assembles.
#[tracing::instrument]
pub fn assemble(args: &AssemblyArgs) -> Result<()> {
    let source = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Unable to read file: {}", args.input.display()))?;
    let lines = source.lines().collect::<Vec<&str>>();

    let assembly = assemble_lines(&lines)
        .with_context(|| format!("Assembly of {} failed", args.input.display()))?;

    std::fs::write(&args.output, &assembly.bytes)
        .with_context(|| format!("Unable to write file: {}", args.output.display()))?;
    eprintln!(
        "Wrote {} bytes to {}",
        assembly.bytes.len(),
        args.output.display()
    );

    if args.symbols {
        print!("{}", assembly.symbols);
    }
    if args.hexdump {
        println!("{}", hexdump(&assembly.bytes, 16));
    }

    Ok(())
}
