use super::{SymbolError, SymbolTable};

/// A 32-bit placeholder in the output that receives the offset of a label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relocation {
    /// Position of the first placeholder byte in the output buffer
    pub offset: u32,
    pub label: String,
}

/// Write the offset of each referenced label into its placeholder, little-endian.
///
/// Every undefined label is reported, each name once in order of first use. Nothing is patched
/// when a label is missing. Relocations must lie inside `bytes`, as recorded by
/// [`CodeGen`][crate::assembler::codegen::CodeGen].
#[tracing::instrument(skip(bytes))]
pub fn apply_relocations(
    bytes: &mut [u8],
    relocations: &[Relocation],
    symbol_table: &SymbolTable,
) -> Result<(), SymbolError> {
    let mut undefined: Vec<String> = Vec::new();
    for relocation in relocations {
        if symbol_table.find_symbol(&relocation.label).is_none()
            && !undefined.contains(&relocation.label)
        {
            undefined.push(relocation.label.clone());
        }
    }
    if !undefined.is_empty() {
        return Err(SymbolError::UndefinedLabels(undefined));
    }

    for relocation in relocations {
        let Some(address) = symbol_table.find_symbol(&relocation.label) else {
            continue;
        };
        // The encoder writes all 4 placeholder bytes when it records a relocation
        let start = relocation.offset as usize;
        bytes[start..start + 4].copy_from_slice(&address.to_le_bytes());
        tracing::debug!(label = %relocation.label, address, "patched relocation");
    }

    Ok(())
}
