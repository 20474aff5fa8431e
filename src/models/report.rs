use crate::models::{JobKeywordFlags, Keyword, Tristate};

/// 一条符合地点过滤的岗位
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobPosting {
    pub location: String,
    pub contract_type: String,
}

/// 单家公司的检查结果
#[derive(Debug, Clone, PartialEq)]
pub struct CompanyResult {
    pub url: String,
    pub status: Tristate,
    /// `None` 表示岗位列表无法读取
    pub keywords: Option<JobKeywordFlags>,
    pub postings: Vec<JobPosting>,
}

impl CompanyResult {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: Tristate::Unknown,
            keywords: None,
            postings: Vec::new(),
        }
    }

    /// 已确认失效的公司：所有关键词为 false
    pub fn inactive(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: Tristate::False,
            keywords: Some(JobKeywordFlags::new()),
            postings: Vec::new(),
        }
    }

    pub fn any_keyword(&self) -> bool {
        self.keywords.map(|k| k.any()).unwrap_or(false)
    }

    /// 汇总行（不展开地点）
    pub fn summary_row(&self) -> ReportRow {
        ReportRow {
            company_url: self.url.clone(),
            status: self.status,
            keywords: self.keywords,
            location: None,
            contract_type: None,
        }
    }

    /// 每个 (地点, 合同类型) 一行
    pub fn posting_rows(&self) -> Vec<ReportRow> {
        self.postings
            .iter()
            .map(|p| ReportRow {
                company_url: self.url.clone(),
                status: self.status,
                keywords: self.keywords,
                location: Some(p.location.clone()),
                contract_type: Some(p.contract_type.clone()),
            })
            .collect()
    }
}

/// 报表中的一行
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub company_url: String,
    pub status: Tristate,
    pub keywords: Option<JobKeywordFlags>,
    pub location: Option<String>,
    pub contract_type: Option<String>,
}

impl ReportRow {
    /// 某个关键词列的取值
    pub fn keyword(&self, keyword: Keyword) -> Tristate {
        match self.keywords {
            Some(flags) => Tristate::from(flags.get(keyword)),
            None => Tristate::Unknown,
        }
    }

    /// 渲染为 CSV 记录
    pub fn to_record(&self, with_locations: bool) -> Vec<String> {
        let mut record = Vec::with_capacity(8);
        record.push(self.company_url.clone());
        record.push(self.status.to_string());
        for keyword in Keyword::ALL {
            record.push(self.keyword(keyword).to_string());
        }
        if with_locations {
            record.push(self.location.clone().unwrap_or_default());
            record.push(self.contract_type.clone().unwrap_or_default());
        }
        record
    }
}

/// 全部字母汇总后的报表
///
/// 抓取期间只追加，结束时一次性导出。
#[derive(Debug, Clone, Default)]
pub struct ResultTable {
    rows: Vec<ReportRow>,
    with_locations: bool,
}

impl ResultTable {
    pub fn new(with_locations: bool) -> Self {
        Self {
            rows: Vec::new(),
            with_locations,
        }
    }

    pub fn extend(&mut self, rows: impl IntoIterator<Item = ReportRow>) {
        self.rows.extend(rows);
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 表头
    pub fn headers(&self) -> Vec<&'static str> {
        let mut headers = vec!["Company URL", "Status"];
        headers.extend(Keyword::ALL.iter().map(|k| k.name()));
        if self.with_locations {
            headers.push("Location");
            headers.push("Contract Type");
        }
        headers
    }

    pub fn records(&self) -> impl Iterator<Item = Vec<String>> + '_ {
        self.rows.iter().map(|r| r.to_record(self.with_locations))
    }
}
