use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// 目录分桶：26 个小写字母加一个符号桶
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectoryLetter {
    Letter(char),
    Symbol,
}

impl DirectoryLetter {
    /// 符号桶在 URL 中的写法
    pub const SYMBOL: &'static str = "#";

    /// 完整的字母表：a-z，然后是符号桶
    pub fn all() -> Vec<DirectoryLetter> {
        ('a'..='z')
            .map(DirectoryLetter::Letter)
            .chain(std::iter::once(DirectoryLetter::Symbol))
            .collect()
    }

    /// 用于拼接目录 URL 的路径片段
    pub fn as_path(&self) -> String {
        match self {
            DirectoryLetter::Letter(c) => c.to_string(),
            DirectoryLetter::Symbol => Self::SYMBOL.to_string(),
        }
    }

    /// 解析一组字母，例如 `["a", "x", "#"]`
    pub fn parse_list<S: AsRef<str>>(items: &[S]) -> Result<Vec<DirectoryLetter>, ConfigError> {
        items.iter().map(|s| s.as_ref().parse()).collect()
    }
}

impl FromStr for DirectoryLetter {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed == Self::SYMBOL {
            return Ok(DirectoryLetter::Symbol);
        }

        let mut chars = trimmed.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphabetic() => {
                Ok(DirectoryLetter::Letter(c.to_ascii_lowercase()))
            }
            _ => Err(ConfigError::InvalidLetter(s.to_string())),
        }
    }
}

impl fmt::Display for DirectoryLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectoryLetter::Letter(c) => write!(f, "{}", c.to_ascii_uppercase()),
            DirectoryLetter::Symbol => f.write_str(Self::SYMBOL),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_has_27_buckets() {
        let all = DirectoryLetter::all();
        assert_eq!(all.len(), 27);
        assert_eq!(all[0], DirectoryLetter::Letter('a'));
        assert_eq!(all[25], DirectoryLetter::Letter('z'));
        assert_eq!(all[26], DirectoryLetter::Symbol);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("X".parse::<DirectoryLetter>().unwrap(), DirectoryLetter::Letter('x'));
        assert_eq!(" # ".parse::<DirectoryLetter>().unwrap(), DirectoryLetter::Symbol);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("ab".parse::<DirectoryLetter>().is_err());
        assert!("1".parse::<DirectoryLetter>().is_err());
        assert!("".parse::<DirectoryLetter>().is_err());
        assert!(DirectoryLetter::parse_list(&["a", "??"]).is_err());
    }

    #[test]
    fn test_display_and_path() {
        let x = DirectoryLetter::Letter('x');
        assert_eq!(x.to_string(), "X");
        assert_eq!(x.as_path(), "x");
        assert_eq!(DirectoryLetter::Symbol.as_path(), "#");
    }
}
