use anyhow::Result;
use chromiumoxide::Browser;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::BrowserError;
use crate::infrastructure::{BrowserSession, ChromePage};

/// Chrome 浏览器会话
///
/// 每次 `open_page` 都会新开一个标签页，由调用方独占。
pub struct ChromeSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
    /// 是否由本程序启动（决定退出时是否关闭浏览器）
    owned: bool,
}

impl ChromeSession {
    pub fn new(browser: Browser, handler_task: JoinHandle<()>, owned: bool) -> Self {
        Self {
            browser,
            handler_task,
            owned,
        }
    }

    /// 按配置启动或连接浏览器
    pub async fn from_config(config: &Config) -> Result<Self> {
        match config.browser_debug_port {
            Some(port) => crate::browser::connect_to_browser(port).await,
            None => crate::browser::launch_browser(config).await,
        }
    }

    /// 关闭浏览器（仅限自己启动的）
    pub async fn shutdown(mut self) -> Result<()> {
        if self.owned {
            debug!("正在关闭浏览器");
            if let Err(e) = self.browser.close().await {
                warn!("关闭浏览器失败: {}", e);
            }
            if let Err(e) = self.browser.wait().await {
                warn!("等待浏览器退出失败: {}", e);
            }
        }
        self.handler_task.abort();
        Ok(())
    }
}

impl BrowserSession for ChromeSession {
    type Page = ChromePage;

    async fn open_page(&self) -> Result<ChromePage> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::PageCreationFailed { source: e })?;
        Ok(ChromePage::new(page))
    }
}
