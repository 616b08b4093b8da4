/// Condition prefix of an instruction line, e.g. `eq` in `eq jmp done`.
///
/// Only [`Format::F2`][super::Format#variant.F2] carries the condition in its encoding.
#[derive(
    Debug, Default, Hash, Eq, PartialEq, Clone, Copy, strum_macros::EnumString, strum_macros::Display,
)]
pub enum Condition {
    /// No prefix.
    #[default]
    #[strum(serialize = "")]
    Always = 0,
    #[strum(serialize = "eq")]
    Equal = 1,
    #[strum(serialize = "neq")]
    NotEqual = 2,
    #[strum(serialize = "gr")]
    Greater = 3,
    #[strum(serialize = "l")]
    Less = 4,
}

impl Condition {
    /// 3-bit condition code.
    pub fn code(self) -> u16 {
        self as u16
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_condition_codes() {
        let tests = vec![
            ("eq", Condition::Equal, 1),
            ("neq", Condition::NotEqual, 2),
            ("gr", Condition::Greater, 3),
            ("l", Condition::Less, 4),
        ];
        for (input, expected, code) in tests {
            let condition = Condition::from_str(input).unwrap();
            assert_eq!(condition, expected);
            assert_eq!(condition.code(), code);
        }
        assert_eq!(Condition::default().code(), 0);
        assert_eq!(Condition::from_str(""), Ok(Condition::Always));
        assert!(Condition::from_str("ne").is_err());
    }
}
