//! 公司页检查 - 业务能力层
//!
//! 只负责判断单家公司是否存活、岗位里有哪些关键词，不关心报表怎么出行

use std::sync::OnceLock;
use std::time::Duration;

use anyhow::Result;
use regex::Regex;
use tracing::{debug, warn};

use crate::config::Config;
use crate::infrastructure::PageDriver;
use crate::models::{
    CompanyResult, JobKeywordFlags, JobPosting, KeywordMatcher, SiteProfile, Tristate,
};
use crate::utils::logging::truncate_text;

/// 合同类型缺失时的占位
const UNKNOWN_CONTRACT: &str = "Unknown";

/// 公司页检查服务
///
/// 每个方法只做一次检查，不重试；重试由流程层决定。
pub struct CompanyChecker {
    site: SiteProfile,
    matcher: KeywordMatcher,
    title_timeout: Duration,
    listing_timeout: Duration,
    location_filter: String,
    early_exit: bool,
    max_company_pages: usize,
}

impl CompanyChecker {
    pub fn new(config: &Config) -> Self {
        Self {
            site: config.site.clone(),
            matcher: KeywordMatcher::new(config.localized_triggers),
            title_timeout: config.title_timeout(),
            listing_timeout: config.listing_timeout(),
            location_filter: config.location_filter.clone(),
            early_exit: config.early_exit,
            max_company_pages: config.max_company_pages,
        }
    }

    /// 判断公司页是否存活
    ///
    /// 标题等待超时返回 `Unknown`。
    pub async fn check_company_status<P: PageDriver>(&self, page: &P, url: &str) -> Result<Tristate> {
        page.goto(url).await?;
        let status = self.current_liveness(page).await?;
        if status.is_unknown() {
            warn!("⚠️ 等待页面标题超时: {}", url);
        }
        Ok(status)
    }

    /// 扫描公司页上的岗位关键词
    ///
    /// 没有岗位时全部为 false；页面本身打不开时返回 `None`。
    pub async fn get_job_keywords<P: PageDriver>(
        &self,
        page: &P,
        url: &str,
    ) -> Result<Option<JobKeywordFlags>> {
        page.goto(url).await?;

        if !page.wait_for("title", self.title_timeout).await? {
            warn!("⚠️ 访问 {} 时超时", url);
            return Ok(None);
        }

        let mut flags = JobKeywordFlags::new();
        self.scan_listings(page, &mut flags).await?;
        Ok(Some(flags))
    }

    /// 翻页扫描，只统计地点命中的岗位
    ///
    /// 依次访问 `url?page=N`，直到没有"下一页"按钮或超出页数上限。
    pub async fn check_status_and_extract_keywords<P: PageDriver>(
        &self,
        page: &P,
        url: &str,
    ) -> Result<CompanyResult> {
        let mut result = CompanyResult::new(url);
        let mut flags = JobKeywordFlags::new();

        for page_num in 1..=self.max_company_pages {
            let current_page_url = self.site.company_page_url(url, page_num);
            page.goto(&current_page_url).await?;

            match self.current_liveness(page).await? {
                Tristate::Unknown => {
                    warn!("⚠️ 访问 {} 时超时", current_page_url);
                    break;
                }
                Tristate::False => {
                    result.status = Tristate::False;
                    break;
                }
                Tristate::True => result.status = Tristate::True,
            }

            if page.wait_for(&self.site.job_tile, self.listing_timeout).await? {
                let tiles = page
                    .tiles(&self.site.job_tile, &self.site.job_tile_field)
                    .await?;
                for tile in tiles {
                    let Some(location) = tile.fields.first().map(|f| f.trim().to_string()) else {
                        continue;
                    };
                    if !location.contains(&self.location_filter) {
                        continue;
                    }
                    let contract_type = tile
                        .fields
                        .get(1)
                        .map(|f| f.trim().to_string())
                        .unwrap_or_else(|| UNKNOWN_CONTRACT.to_string());
                    debug!(
                        "命中地点 {} | {} | {}",
                        location,
                        contract_type,
                        truncate_text(&tile.text, 40)
                    );

                    result.postings.push(JobPosting {
                        location,
                        contract_type,
                    });
                    self.matcher.scan(&tile.text, &mut flags);
                }
            }

            if page.count(&self.site.next_page).await? == 0 {
                break;
            }
            if page_num == self.max_company_pages {
                warn!(
                    "⚠️ {} 超过 {} 页，停止翻页",
                    url, self.max_company_pages
                );
            }
        }

        if !result.status.is_unknown() {
            result.keywords = Some(flags);
        }
        Ok(result)
    }

    /// 按岗位总数计算页数后扫描
    ///
    /// 每页 `page_size` 条，至少一页。开启 `early_exit` 时命中任一关键词就停止，
    /// 此时地点和剩余关键词可能不完整。
    pub async fn check_by_posting_count<P: PageDriver>(
        &self,
        page: &P,
        url: &str,
    ) -> Result<CompanyResult> {
        let mut result = CompanyResult::new(url);

        let first_page_url = self.site.company_page_url(url, 1);
        page.goto(&first_page_url).await?;

        result.status = self.current_liveness(page).await?;
        match result.status {
            Tristate::Unknown => {
                warn!("⚠️ 访问 {} 时超时", first_page_url);
                return Ok(result);
            }
            Tristate::False => return Ok(CompanyResult::inactive(url)),
            Tristate::True => {}
        }

        let total_pages = match self.read_posting_count(page).await? {
            Some(count) => self.site.pages_for(count),
            None => {
                warn!("⚠️ 未读取到岗位总数，按一页处理: {}", url);
                1
            }
        }
        .min(self.max_company_pages);
        debug!("{} 共 {} 页岗位", url, total_pages);

        let mut flags = JobKeywordFlags::new();
        for page_num in 1..=total_pages {
            if page_num > 1 {
                let current_page_url = self.site.company_page_url(url, page_num);
                page.goto(&current_page_url).await?;
                match self.current_liveness(page).await? {
                    Tristate::True => {}
                    Tristate::Unknown => {
                        warn!("⚠️ 访问 {} 时超时", current_page_url);
                        break;
                    }
                    Tristate::False => {
                        warn!("⚠️ {} 已失效，停止翻页", current_page_url);
                        break;
                    }
                }
            }

            self.scan_listings(page, &mut flags).await?;

            if self.early_exit && flags.any() {
                break;
            }
        }

        result.keywords = Some(flags);
        Ok(result)
    }

    /// 当前页是否存活
    async fn current_liveness<P: PageDriver>(&self, page: &P) -> Result<Tristate> {
        if !page.wait_for("title", self.title_timeout).await? {
            return Ok(Tristate::Unknown);
        }
        let title = page.title().await?.unwrap_or_default();
        Ok(Tristate::from(!title.contains(&self.site.not_found_marker)))
    }

    /// 扫描当前页的所有岗位卡片
    async fn scan_listings<P: PageDriver>(&self, page: &P, flags: &mut JobKeywordFlags) -> Result<()> {
        if !page.wait_for(&self.site.job_tile, self.listing_timeout).await? {
            debug!("当前页没有岗位");
            return Ok(());
        }
        for text in page.texts(&self.site.job_tile).await? {
            self.matcher.scan(&text, flags);
        }
        Ok(())
    }

    /// 读取岗位总数角标
    async fn read_posting_count<P: PageDriver>(&self, page: &P) -> Result<Option<usize>> {
        if !page
            .wait_for(&self.site.posting_count_badge, self.listing_timeout)
            .await?
        {
            return Ok(None);
        }
        let texts = page.texts(&self.site.posting_count_badge).await?;
        Ok(texts.first().and_then(|t| parse_posting_count(t)))
    }
}

/// 从角标文本中取出第一个整数，例如 "12" 或 "12 Jobs"
pub fn parse_posting_count(text: &str) -> Option<usize> {
    static NUMBER: OnceLock<Option<Regex>> = OnceLock::new();
    let re = NUMBER.get_or_init(|| Regex::new(r"\d+").ok()).as_ref()?;
    re.find(text)?.as_str().parse().ok()
}
