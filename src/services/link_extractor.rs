//! 公司链接提取 - 业务能力层
//!
//! 只负责"从目录页拿到公司链接"，不关心公司页的内容

use std::collections::HashSet;
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::infrastructure::PageDriver;
use crate::models::{DirectoryLetter, SiteProfile};

/// 目录链接提取服务
pub struct LinkExtractor {
    site: SiteProfile,
    directory_timeout: Duration,
    pagination_timeout: Duration,
}

impl LinkExtractor {
    pub fn new(config: &Config) -> Self {
        Self {
            site: config.site.clone(),
            directory_timeout: config.directory_timeout(),
            pagination_timeout: config.pagination_timeout(),
        }
    }

    /// 提取单个目录页上的所有公司链接
    ///
    /// 目录标记超时视为本页没有公司，返回空列表。
    pub async fn extract_company_links<P: PageDriver>(
        &self,
        page: &P,
        page_url: &str,
    ) -> Result<Vec<String>> {
        page.goto(page_url).await?;

        if !page
            .wait_for(&self.site.directory_marker, self.directory_timeout)
            .await?
        {
            warn!("⚠️ 等待公司目录超时: {}", page_url);
            return Ok(Vec::new());
        }

        let urls = page
            .attribute_values(&self.site.company_link, "href")
            .await?;
        debug!("{} 上找到 {} 个公司链接", page_url, urls.len());
        Ok(urls)
    }

    /// 提取某个字母下所有分页的公司链接
    ///
    /// 分页查找超时时，已经拿到的链接原样返回。重复链接只保留第一次出现。
    pub async fn navigate_and_extract<P: PageDriver>(
        &self,
        page: &P,
        letter: DirectoryLetter,
    ) -> Result<Vec<String>> {
        let initial_page = self.site.letter_url(letter);
        let mut urls = self.extract_company_links(page, &initial_page).await?;

        if page
            .wait_for(&self.site.pagination_link, self.pagination_timeout)
            .await?
        {
            let num_pages = page.count(&self.site.pagination_link).await?;
            debug!("字母 {} 共 {} 页", letter, num_pages);

            for page_num in 2..=num_pages {
                let page_url = self.site.letter_page_url(letter, page_num);
                urls.extend(self.extract_company_links(page, &page_url).await?);
            }
        } else {
            info!("字母 {} 未找到分页，继续", letter);
        }

        Ok(dedup_preserving_order(urls))
    }
}

fn dedup_preserving_order(urls: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    urls.into_iter()
        .filter(|u| seen.insert(u.clone()))
        .collect()
}
