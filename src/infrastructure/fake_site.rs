//! 内存中的假站点，供单元测试使用
//!
//! 每个 URL 对应一个固定的 `FakePage`。等待不会真的睡眠：选择器要么存在，要么立即"超时"。

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{bail, Result};

use crate::infrastructure::page_driver::{BrowserSession, JobTile, PageDriver};

#[derive(Debug, Clone, Default)]
pub struct FakeElement {
    pub text: String,
    pub attributes: HashMap<String, String>,
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct FakePage {
    title: Option<String>,
    elements: HashMap<String, Vec<FakeElement>>,
}

impl FakePage {
    /// 有标题的页面
    pub fn titled(title: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            elements: HashMap::new(),
        }
    }

    /// 标题迟迟不出现的页面
    pub fn untitled() -> Self {
        Self::default()
    }

    pub fn with(mut self, selector: &str, elements: Vec<FakeElement>) -> Self {
        self.elements
            .entry(selector.to_string())
            .or_default()
            .extend(elements);
        self
    }

    pub fn with_links(self, selector: &str, hrefs: &[&str]) -> Self {
        let elements = hrefs
            .iter()
            .map(|href| FakeElement {
                attributes: HashMap::from([("href".to_string(), href.to_string())]),
                ..Default::default()
            })
            .collect();
        self.with(selector, elements)
    }

    pub fn with_texts(self, selector: &str, texts: &[&str]) -> Self {
        let elements = texts
            .iter()
            .map(|text| FakeElement {
                text: text.to_string(),
                ..Default::default()
            })
            .collect();
        self.with(selector, elements)
    }

    pub fn with_tiles(self, selector: &str, tiles: &[(&str, &[&str])]) -> Self {
        let elements = tiles
            .iter()
            .map(|(text, fields)| FakeElement {
                text: text.to_string(),
                fields: fields.iter().map(|f| f.to_string()).collect(),
                ..Default::default()
            })
            .collect();
        self.with(selector, elements)
    }

    fn has(&self, selector: &str) -> bool {
        if selector == "title" {
            return self.title.is_some();
        }
        self.elements.get(selector).is_some_and(|e| !e.is_empty())
    }

    fn elements(&self, selector: &str) -> &[FakeElement] {
        self.elements.get(selector).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[derive(Default)]
struct Inner {
    pages: HashMap<String, FakePage>,
    broken_urls: HashSet<String>,
    slow_urls: HashMap<String, Duration>,
    /// 最多能打开的标签页数，超出时 `open_page` 返回错误
    tab_limit: Option<usize>,
    visits: Mutex<Vec<String>>,
    opened: AtomicUsize,
    closed: AtomicUsize,
}

/// 假站点，同时也是一个浏览器会话
#[derive(Clone, Default)]
pub struct FakeSite {
    inner: Arc<Inner>,
}

impl FakeSite {
    pub fn builder() -> FakeSiteBuilder {
        FakeSiteBuilder::default()
    }

    /// 按访问顺序记录的 URL
    pub fn visits(&self) -> Vec<String> {
        self.inner
            .visits
            .lock()
            .map(|v| v.clone())
            .unwrap_or_default()
    }

    pub fn visit_count(&self, url: &str) -> usize {
        self.visits().iter().filter(|v| v.as_str() == url).count()
    }

    /// 以 `prefix` 开头的访问次数
    pub fn visits_with_prefix(&self, prefix: &str) -> usize {
        self.visits().iter().filter(|v| v.starts_with(prefix)).count()
    }

    pub fn opened_pages(&self) -> usize {
        self.inner.opened.load(Ordering::SeqCst)
    }

    pub fn closed_pages(&self) -> usize {
        self.inner.closed.load(Ordering::SeqCst)
    }

    pub fn tab(&self) -> FakeTab {
        self.inner.opened.fetch_add(1, Ordering::SeqCst);
        FakeTab {
            inner: self.inner.clone(),
            current: Mutex::new(None),
        }
    }
}

#[derive(Default)]
pub struct FakeSiteBuilder {
    inner: Inner,
}

impl FakeSiteBuilder {
    pub fn page(mut self, url: &str, page: FakePage) -> Self {
        self.inner.pages.insert(url.to_string(), page);
        self
    }

    /// 导航到该 URL 会返回错误
    pub fn broken(mut self, url: &str) -> Self {
        self.inner.broken_urls.insert(url.to_string());
        self
    }

    /// 导航到该 URL 前先等待 `delay`
    pub fn slow(mut self, url: &str, delay: Duration) -> Self {
        self.inner.slow_urls.insert(url.to_string(), delay);
        self
    }

    pub fn tab_limit(mut self, limit: usize) -> Self {
        self.inner.tab_limit = Some(limit);
        self
    }

    pub fn build(self) -> FakeSite {
        FakeSite {
            inner: Arc::new(self.inner),
        }
    }
}

impl BrowserSession for FakeSite {
    type Page = FakeTab;

    async fn open_page(&self) -> Result<FakeTab> {
        if let Some(limit) = self.inner.tab_limit {
            if self.opened_pages() >= limit {
                bail!("无法打开更多标签页 (上限 {})", limit);
            }
        }
        Ok(self.tab())
    }
}

/// 假站点上的一个标签页
pub struct FakeTab {
    inner: Arc<Inner>,
    current: Mutex<Option<String>>,
}

impl FakeTab {
    fn current_page(&self) -> FakePage {
        let current = self.current.lock().ok().and_then(|c| c.clone());
        current
            .and_then(|url| self.inner.pages.get(&url).cloned())
            .unwrap_or_default()
    }
}

impl PageDriver for FakeTab {
    async fn goto(&self, url: &str) -> Result<()> {
        if let Ok(mut visits) = self.inner.visits.lock() {
            visits.push(url.to_string());
        }
        if let Some(delay) = self.inner.slow_urls.get(url) {
            tokio::time::sleep(*delay).await;
        }
        if self.inner.broken_urls.contains(url) {
            bail!("导航到 {} 失败: connection reset", url);
        }
        if let Ok(mut current) = self.current.lock() {
            *current = Some(url.to_string());
        }
        Ok(())
    }

    async fn wait_for(&self, selector: &str, _timeout: Duration) -> Result<bool> {
        Ok(self.current_page().has(selector))
    }

    async fn title(&self) -> Result<Option<String>> {
        Ok(self.current_page().title)
    }

    async fn attribute_values(&self, selector: &str, attribute: &str) -> Result<Vec<String>> {
        Ok(self
            .current_page()
            .elements(selector)
            .iter()
            .filter_map(|e| e.attributes.get(attribute).cloned())
            .collect())
    }

    async fn texts(&self, selector: &str) -> Result<Vec<String>> {
        Ok(self
            .current_page()
            .elements(selector)
            .iter()
            .map(|e| e.text.clone())
            .collect())
    }

    async fn count(&self, selector: &str) -> Result<usize> {
        Ok(self.current_page().elements(selector).len())
    }

    async fn tiles(&self, tile_selector: &str, _field_selector: &str) -> Result<Vec<JobTile>> {
        Ok(self
            .current_page()
            .elements(tile_selector)
            .iter()
            .map(|e| JobTile {
                text: e.text.clone(),
                fields: e.fields.clone(),
            })
            .collect())
    }

    async fn close(self) -> Result<()> {
        self.inner.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
