use std::{collections::HashMap, fmt};

use thiserror::Error;

pub use self::resolve::{apply_relocations, Relocation};

/// Patching of label placeholders once every label is known.
mod resolve;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SymbolError {
    #[error("Undefined label(s): {}", .0.join(", "))]
    UndefinedLabels(Vec<String>),
}

/// The symbol table maps label names to logical offsets.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SymbolTable {
    symbols: HashMap<String, u32>,
}

impl SymbolTable {
    #[tracing::instrument]
    pub fn new() -> SymbolTable {
        SymbolTable::default()
    }

    #[tracing::instrument]
    pub fn find_symbol(&self, name: &str) -> Option<u32> {
        self.symbols.get(name).copied()
    }

    /// Define a label at `offset`.
    ///
    /// A label defined twice keeps its last offset. The previous offset is returned.
    #[tracing::instrument]
    pub fn define(&mut self, name: &str, offset: u32) -> Option<u32> {
        self.symbols.insert(name.to_owned(), offset)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Symbols sorted by offset, then by name.
    pub fn sorted(&self) -> Vec<(&str, u32)> {
        let mut symbols = self
            .symbols
            .iter()
            .map(|(name, offset)| (name.as_str(), *offset))
            .collect::<Vec<_>>();
        symbols.sort_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(b.0)));
        symbols
    }
}

impl fmt::Display for SymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, offset) in self.sorted() {
            writeln!(f, "{:08x} {}", offset, name)?;
        }
        Ok(())
    }
}
