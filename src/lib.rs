//! # Company Job Scanner
//!
//! 遍历 join.com 公司目录，检查每家公司是否存活，并扫描其岗位中的
//! Data / Devops / SRE / Analytics 关键词，最后导出为 CSV。
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Page），只暴露能力
//! - `PageDriver` - 单个标签页的能力（导航、等待、读取元素）
//! - `BrowserSession` - 打开相互隔离的标签页
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `LinkExtractor` - 目录翻页与公司链接提取
//! - `CompanyChecker` - 存活判断与关键词扫描
//! - `ReportWriter` - 写 CSV
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一家公司"的完整处理流程
//! - `CompanyCtx` - 上下文封装（字母 + 序号）
//! - `CompanyFlow` - 流程编排（检查 → 重试 → 展开为行）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 全量字母处理器，管理资源和并发
//! - `orchestrator/letter_processor` - 单个字母处理器，工作池处理公司
//!
//! ## 模块结构

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use browser::ChromeSession;
pub use config::{Config, ScanMode};
pub use error::{BrowserError, ConfigError, CrawlError, CrawlResult};
pub use infrastructure::{BrowserSession, ChromePage, PageDriver};
pub use models::{DirectoryLetter, ReportRow, ResultTable, Tristate};
pub use orchestrator::{process_letter, App};
pub use workflow::{CompanyCtx, CompanyFlow};
