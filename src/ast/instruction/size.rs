/// Width of an immediate, address or memory access.
///
/// The discriminant is the 2-bit size field found in the encodings.
#[derive(
    Debug, Default, Hash, Eq, PartialEq, Clone, Copy, strum_macros::EnumString, strum_macros::Display,
)]
pub enum Size {
    #[strum(serialize = "b")]
    Byte = 0,
    #[strum(serialize = "w")]
    Word = 1,
    #[default]
    #[strum(serialize = "d")]
    Dword = 2,
}

impl Size {
    /// Smallest size that holds `value`.
    ///
    /// Anything above a word is a double word, including values that do not fit in 32 bits.
    /// Callers are responsible for reporting those, see [`Size::fits`].
    pub fn for_value(value: u64) -> Size {
        if value <= 0xff {
            Size::Byte
        } else if value <= 0xffff {
            Size::Word
        } else {
            Size::Dword
        }
    }

    /// Whether `value` can be stored in this size without truncation.
    pub fn fits(self, value: u64) -> bool {
        value <= self.max_value()
    }

    pub fn max_value(self) -> u64 {
        match self {
            Size::Byte => 0xff,
            Size::Word => 0xffff,
            Size::Dword => 0xffff_ffff,
        }
    }

    /// Number of bytes occupied by a value of this size.
    pub fn width(self) -> usize {
        1 << (self as usize)
    }

    pub fn code(self) -> u16 {
        self as u16
    }
}
