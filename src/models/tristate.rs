use std::fmt;

/// 三态结果
///
/// `Unknown` 表示"无法判断"（例如等待超时），与"已确认为否"区分开。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tristate {
    #[default]
    Unknown,
    True,
    False,
}

impl Tristate {
    pub fn is_true(self) -> bool {
        self == Tristate::True
    }

    pub fn is_unknown(self) -> bool {
        self == Tristate::Unknown
    }
}

impl From<bool> for Tristate {
    fn from(value: bool) -> Self {
        if value {
            Tristate::True
        } else {
            Tristate::False
        }
    }
}

impl fmt::Display for Tristate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Tristate::Unknown => "Unknown",
            Tristate::True => "True",
            Tristate::False => "False",
        };
        f.write_str(s)
    }
}
