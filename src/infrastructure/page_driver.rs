//! 页面能力接口
//!
//! 服务层只依赖这里的两个 trait：
//! - `PageDriver`：一个标签页能做的事
//! - `BrowserSession`：为每个工作任务开一个独立的标签页

use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use serde::Deserialize;

/// 一张岗位卡片
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct JobTile {
    /// 卡片的可见文本
    pub text: String,
    /// 卡片内字段文本，按页面顺序
    pub fields: Vec<String>,
}

/// 单个标签页
///
/// 导航失败是硬错误（返回 `Err`）；等待超时不是错误，`wait_for` 返回 `false`。
pub trait PageDriver: Send + Sync {
    /// 导航到 `url`
    fn goto(&self, url: &str) -> impl Future<Output = Result<()>> + Send;

    /// 在 `timeout` 内等待 `selector` 出现
    fn wait_for(&self, selector: &str, timeout: Duration)
        -> impl Future<Output = Result<bool>> + Send;

    /// 当前页标题
    fn title(&self) -> impl Future<Output = Result<Option<String>>> + Send;

    /// 所有匹配元素的某个属性（例如 `href`），按页面顺序
    fn attribute_values(
        &self,
        selector: &str,
        attribute: &str,
    ) -> impl Future<Output = Result<Vec<String>>> + Send;

    /// 所有匹配元素的可见文本，按页面顺序
    fn texts(&self, selector: &str) -> impl Future<Output = Result<Vec<String>>> + Send;

    /// 匹配元素的个数
    fn count(&self, selector: &str) -> impl Future<Output = Result<usize>> + Send;

    /// 所有卡片，以及每张卡片内 `field_selector` 匹配到的字段
    fn tiles(
        &self,
        tile_selector: &str,
        field_selector: &str,
    ) -> impl Future<Output = Result<Vec<JobTile>>> + Send;

    /// 关闭标签页
    fn close(self) -> impl Future<Output = Result<()>> + Send
    where
        Self: Sized;
}

/// 浏览器会话
pub trait BrowserSession: Send + Sync + 'static {
    type Page: PageDriver + 'static;

    /// 打开一个新的独立标签页
    fn open_page(&self) -> impl Future<Output = Result<Self::Page>> + Send;
}
