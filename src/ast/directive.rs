use std::fmt;

/// Commands to the assembler that are not instructions.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Directive {
    /// Raw bytes, e.g. `.byte 1, 0x2, 0ffh`. Values are already truncated to 8 bits.
    Byte(Vec<u8>),
    /// Characters of a quoted string without a terminator, e.g. `.string "Hi"`.
    String(String),
    /// Characters of a quoted string followed by a zero byte, e.g. `.stringz "Hi"`.
    StringZ(String),
    /// Moves the logical offset used for labels, e.g. `.org 0x100`.
    ///
    /// The output buffer is neither padded nor truncated, so after an `.org` the label offsets
    /// and the physical positions in the output may differ.
    Origin(u32),
}

impl Directive {
    /// Number of bytes the directive adds to the output.
    pub fn size(&self) -> usize {
        match self {
            Directive::Byte(bytes) => bytes.len(),
            Directive::String(text) => text.len(),
            Directive::StringZ(text) => text.len() + 1,
            Directive::Origin(_) => 0,
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Directive::Byte(bytes) => {
                let values = bytes
                    .iter()
                    .map(|byte| format!("{:#04x}", byte))
                    .collect::<Vec<String>>()
                    .join(", ");
                write!(f, ".byte {}", values)
            }
            Directive::String(text) => write!(f, ".string \"{}\"", text),
            Directive::StringZ(text) => write!(f, ".stringz \"{}\"", text),
            Directive::Origin(offset) => write!(f, ".org {:#x}", offset),
        }
    }
}
