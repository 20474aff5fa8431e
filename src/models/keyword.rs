//! 岗位关键词分类
//!
//! 四个固定关键词，每个关键词对应一组触发子串。匹配前文本统一转小写。

/// 关键词
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Data,
    Devops,
    Sre,
    Analytics,
}

impl Keyword {
    /// 报表列的顺序
    pub const ALL: [Keyword; 4] = [
        Keyword::Data,
        Keyword::Devops,
        Keyword::Sre,
        Keyword::Analytics,
    ];

    /// 报表中的列名
    pub fn name(&self) -> &'static str {
        match self {
            Keyword::Data => "Data",
            Keyword::Devops => "Devops",
            Keyword::Sre => "SRE",
            Keyword::Analytics => "Analytics",
        }
    }

    fn index(&self) -> usize {
        match self {
            Keyword::Data => 0,
            Keyword::Devops => 1,
            Keyword::Sre => 2,
            Keyword::Analytics => 3,
        }
    }
}

/// 每家公司一份的关键词标记
///
/// 只能置为 true，不能复位。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JobKeywordFlags {
    flags: [bool; 4],
}

impl JobKeywordFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark(&mut self, keyword: Keyword) {
        self.flags[keyword.index()] = true;
    }

    pub fn get(&self, keyword: Keyword) -> bool {
        self.flags[keyword.index()]
    }

    pub fn any(&self) -> bool {
        self.flags.iter().any(|f| *f)
    }
}

/// 关键词匹配器
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    triggers: Vec<(Keyword, Vec<&'static str>)>,
}

impl KeywordMatcher {
    /// 基础触发词
    pub fn baseline() -> Self {
        Self {
            triggers: vec![
                (Keyword::Data, vec!["data"]),
                (Keyword::Devops, vec!["devops"]),
                (Keyword::Sre, vec!["sre", "site reliability"]),
                (Keyword::Analytics, vec!["analytics"]),
            ],
        }
    }

    /// 基础触发词 + 法语 "données"
    pub fn with_localized() -> Self {
        let mut matcher = Self::baseline();
        for (keyword, words) in matcher.triggers.iter_mut() {
            if *keyword == Keyword::Data {
                words.push("données");
            }
        }
        matcher
    }

    pub fn new(localized: bool) -> Self {
        if localized {
            Self::with_localized()
        } else {
            Self::baseline()
        }
    }

    /// 扫描一条岗位文本，把命中的关键词写入 `flags`
    pub fn scan(&self, text: &str, flags: &mut JobKeywordFlags) {
        let lowered = text.to_lowercase();
        for (keyword, words) in &self.triggers {
            if words.iter().any(|w| lowered.contains(w)) {
                flags.mark(*keyword);
            }
        }
    }
}
