use super::{
    codegen::{opcode, CodeGen},
    lexer::Token,
    parser,
    symbols::{apply_relocations, SymbolTable},
    Assembly, AssemblerError,
};

/// Drives the two passes over the lexed program.
#[derive(Debug, Default)]
pub struct Compiler {
    symbol_table: SymbolTable,
    codegen: CodeGen,
}

impl Compiler {
    pub fn new() -> Compiler {
        Compiler::default()
    }

    /// Route a single token to the symbol table, the encoder or the directive processor.
    fn compile_token(&mut self, line: usize, token: Token) -> Result<(), AssemblerError> {
        match token {
            Token::LabelDef(name) => {
                let offset = self.codegen.current_offset();
                if let Some(previous) = self.symbol_table.define(&name, offset) {
                    tracing::debug!(line, %name, previous, offset, "label redefined");
                }
            }
            Token::Instruction(token) => {
                let ins = parser::parse_instruction(&token)
                    .map_err(|source| AssemblerError::Parse { line, source })?;
                let spec = opcode::resolve(ins.mnemonic, &ins.operand_kinds())
                    .map_err(|source| AssemblerError::CodeGen { line, source })?;
                self.codegen
                    .emit_instruction(line, &ins, spec)
                    .map_err(|source| AssemblerError::CodeGen { line, source })?;
            }
            Token::Directive(text) => {
                let directive = parser::parse_directive(&text)
                    .map_err(|source| AssemblerError::Parse { line, source })?;
                self.codegen.emit_directive(&directive);
            }
            Token::Blank => {}
        }
        Ok(())
    }

    /// Pass 1 of the compiler.
    ///
    /// Labels are bound to the logical offset and every instruction and directive is emitted.
    /// References to labels are left as zeroed placeholders.
    fn pass_1(&mut self, tokens: Vec<(usize, Token)>) -> Result<(), AssemblerError> {
        for (line, token) in tokens {
            self.compile_token(line, token)?;
        }
        Ok(())
    }

    /// Pass 2 of the compiler.
    ///
    /// Patches the placeholders with the offsets from the symbol table.
    fn pass_2(self) -> Result<Assembly, AssemblerError> {
        let Compiler {
            symbol_table,
            codegen,
        } = self;
        let (mut bytes, relocations, warnings) = codegen.finish();
        apply_relocations(&mut bytes, &relocations, &symbol_table)?;

        Ok(Assembly {
            bytes,
            symbols: symbol_table,
            warnings,
        })
    }

    /// Compile lexed tokens paired with their 1-based line numbers.
    #[tracing::instrument(skip(self, tokens))]
    pub fn compile(mut self, tokens: Vec<(usize, Token)>) -> Result<Assembly, AssemblerError> {
        self.pass_1(tokens)?;
        self.pass_2()
    }
}
