use serde::Deserialize;

use crate::models::DirectoryLetter;

/// 目标站点的 URL 和 DOM 选择器
///
/// 站点 DOM 没有版本号，改版后这里的选择器需要同步调整。
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteProfile {
    /// 公司目录根地址，字母直接拼接在后面
    pub base_url: String,
    /// 目录页渲染完成的标记
    pub directory_marker: String,
    /// 公司详情链接
    pub company_link: String,
    /// 目录分页链接
    pub pagination_link: String,
    /// 公司页上的岗位卡片
    pub job_tile: String,
    /// 岗位卡片内的文本字段（第一个是地点，第二个是合同类型）
    pub job_tile_field: String,
    /// 公司岗位列表的"下一页"按钮
    pub next_page: String,
    /// 岗位总数角标
    pub posting_count_badge: String,
    /// 标题中出现即视为公司页已失效
    pub not_found_marker: String,
    /// 公司岗位列表每页条数
    pub page_size: usize,
}

impl Default for SiteProfile {
    fn default() -> Self {
        Self {
            base_url: "https://join.com/companies/".to_string(),
            directory_marker: "#pcd_top_title".to_string(),
            company_link: "a.pcd_list_company_link".to_string(),
            pagination_link: "a.pcd_pagination_link".to_string(),
            job_tile: ".JobTile___StyledJobLink-sc-989ef686-0".to_string(),
            job_tile_field: ".JobTile-elements___StyledText-sc-e7e7aa1d-4".to_string(),
            next_page: r#"[aria-label="Next page"]"#.to_string(),
            posting_count_badge: r#"div[data-testid="TabBadge"]"#.to_string(),
            not_found_marker: "Page not found (404)".to_string(),
            page_size: 5,
        }
    }
}

impl SiteProfile {
    /// 某个字母的第一页目录
    pub fn letter_url(&self, letter: DirectoryLetter) -> String {
        format!("{}{}", self.base_url, letter.as_path())
    }

    /// 某个字母的第 N 页目录（N >= 2）
    pub fn letter_page_url(&self, letter: DirectoryLetter, page: usize) -> String {
        format!("{}{}/page/{}", self.base_url, letter.as_path(), page)
    }

    /// 公司岗位列表的第 N 页
    pub fn company_page_url(&self, company_url: &str, page: usize) -> String {
        format!("{}?page={}", company_url, page)
    }

    /// 岗位数对应的页数，至少一页
    pub fn pages_for(&self, postings: usize) -> usize {
        postings.div_ceil(self.page_size.max(1)).max(1)
    }
}
