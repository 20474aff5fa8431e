//! Chrome 标签页 - 基础设施层
//!
//! 持有一个 `chromiumoxide::Page`，所有读取都通过执行 JS 完成

use std::time::Duration;

use anyhow::Result;
use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tokio::time::{sleep, timeout};
use tracing::debug;

use crate::error::CrawlError;
use crate::infrastructure::page_driver::{JobTile, PageDriver};

/// 轮询选择器的间隔
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Chrome 标签页
///
/// 职责：
/// - 独占一个 Page，不与其他工作任务共享
/// - 暴露 eval() 能力
/// - 不认识公司 / 关键词
pub struct ChromePage {
    page: Page,
}

impl ChromePage {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// 执行 JS 代码并返回 JSON 结果
    pub async fn eval(&self, js_code: impl Into<String>) -> Result<JsonValue> {
        let js_code: String = js_code.into();
        let result = self.page.evaluate(js_code).await.map_err(CrawlError::from)?;
        let json_value = result.into_value()?;
        Ok(json_value)
    }

    /// 执行 JS 代码并反序列化为指定类型
    pub async fn eval_as<T: DeserializeOwned>(&self, js_code: impl Into<String>) -> Result<T> {
        let json_value = self.eval(js_code).await?;
        let typed_value = serde_json::from_value(json_value)?;
        Ok(typed_value)
    }
}

/// 把字符串转成 JS 字面量
fn js_str(value: &str) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

impl PageDriver for ChromePage {
    async fn goto(&self, url: &str) -> Result<()> {
        debug!("导航到: {}", url);
        self.page
            .goto(url)
            .await
            .map_err(|e| CrawlError::navigation_failed(url, e))?;
        Ok(())
    }

    async fn wait_for(&self, selector: &str, wait: Duration) -> Result<bool> {
        let probe = format!("document.querySelector({}) !== null", js_str(selector)?);

        let poll = async {
            loop {
                if self.eval_as::<bool>(probe.as_str()).await? {
                    return Ok::<bool, anyhow::Error>(true);
                }
                sleep(POLL_INTERVAL).await;
            }
        };

        match timeout(wait, poll).await {
            Ok(found) => found,
            Err(_) => {
                debug!("等待 {} 超时 ({:?})", selector, wait);
                Ok(false)
            }
        }
    }

    async fn title(&self) -> Result<Option<String>> {
        Ok(self.page.get_title().await.map_err(CrawlError::from)?)
    }

    async fn attribute_values(&self, selector: &str, attribute: &str) -> Result<Vec<String>> {
        let js_code = format!(
            r#"Array.from(document.querySelectorAll({sel}))
                .map(e => String(e[{attr}] ?? e.getAttribute({attr}) ?? ''))
                .filter(v => v.length > 0)"#,
            sel = js_str(selector)?,
            attr = js_str(attribute)?,
        );
        self.eval_as(js_code).await
    }

    async fn texts(&self, selector: &str) -> Result<Vec<String>> {
        let js_code = format!(
            r#"Array.from(document.querySelectorAll({}))
                .map(e => (e.innerText || e.textContent || '').trim())"#,
            js_str(selector)?,
        );
        self.eval_as(js_code).await
    }

    async fn count(&self, selector: &str) -> Result<usize> {
        let js_code = format!("document.querySelectorAll({}).length", js_str(selector)?);
        self.eval_as(js_code).await
    }

    async fn tiles(&self, tile_selector: &str, field_selector: &str) -> Result<Vec<JobTile>> {
        let js_code = format!(
            r#"Array.from(document.querySelectorAll({tile})).map(t => ({{
                text: (t.innerText || t.textContent || '').trim(),
                fields: Array.from(t.querySelectorAll({field}))
                    .map(f => (f.innerText || f.textContent || '').trim())
            }}))"#,
            tile = js_str(tile_selector)?,
            field = js_str(field_selector)?,
        );
        self.eval_as(js_code).await
    }

    async fn close(self) -> Result<()> {
        self.page.close().await.map_err(CrawlError::from)?;
        Ok(())
    }
}
