//! 基础设施层
//!
//! 持有浏览器标签页，只暴露"导航 / 等待 / 读取"的能力，不认识公司和关键词。

pub mod chrome_page;
#[cfg(test)]
pub mod fake_site;
pub mod page_driver;

pub use chrome_page::ChromePage;
pub use page_driver::{BrowserSession, JobTile, PageDriver};
