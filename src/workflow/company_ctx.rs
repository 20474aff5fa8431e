//! 公司处理上下文
//!
//! 封装"我正在处理哪个字母下的第几家公司"这一信息

use std::fmt::Display;

use crate::models::DirectoryLetter;

/// 公司处理上下文
#[derive(Debug, Clone)]
pub struct CompanyCtx {
    pub letter: DirectoryLetter,

    /// 公司在本字母中的序号（从1开始，仅用于日志显示）
    pub index: usize,

    /// 本字母的公司总数
    pub total: usize,

    pub url: String,
}

impl CompanyCtx {
    pub fn new(letter: DirectoryLetter, index: usize, total: usize, url: impl Into<String>) -> Self {
        Self {
            letter,
            index,
            total,
            url: url.into(),
        }
    }
}

impl Display for CompanyCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[字母 {} 公司 {}/{}]", self.letter, self.index, self.total)
    }
}
