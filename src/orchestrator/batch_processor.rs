//! 全量字母处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责所有字母的调度和资源管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：启动或连接浏览器
//! 2. **并发控制**：使用 Semaphore 限制同时处理的字母数
//! 3. **结果汇总**：按完成顺序把各字母的行追加到同一张表
//! 4. **一次导出**：全部完成后写出 CSV，中途失败则不写
//!
//! ## 设计特点
//!
//! - **顶层编排**：不处理单家公司的细节
//! - **资源所有者**：唯一持有浏览器会话的模块
//! - **向下委托**：委托 letter_processor 处理单个字母

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use tracing::{error, warn};

use crate::browser::ChromeSession;
use crate::config::Config;
use crate::error::CrawlError;
use crate::infrastructure::BrowserSession;
use crate::models::{DirectoryLetter, ReportRow, ResultTable};
use crate::orchestrator::letter_processor;
use crate::services::ReportWriter;
use crate::utils::logging::{log_export, log_startup, print_final_stats, CrawlStats};

/// 应用主结构
pub struct App<S: BrowserSession = ChromeSession> {
    config: Arc<Config>,
    session: Arc<S>,
}

impl App<ChromeSession> {
    /// 初始化应用：按配置启动或连接浏览器
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);
        let session = ChromeSession::from_config(&config).await?;
        Ok(Self::with_session(config, session))
    }

    /// 关闭浏览器
    pub async fn shutdown(self) -> Result<()> {
        match Arc::try_unwrap(self.session) {
            Ok(session) => session.shutdown().await,
            Err(_) => {
                warn!("⚠️ 浏览器会话仍被占用，跳过关闭");
                Ok(())
            }
        }
    }
}

impl<S: BrowserSession> App<S> {
    pub fn with_session(config: Config, session: S) -> Self {
        Self {
            config: Arc::new(config),
            session: Arc::new(session),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// 运行应用主逻辑：抓取 + 导出
    pub async fn run(&self) -> Result<ResultTable> {
        let table = self.crawl().await?;
        if table.is_empty() {
            warn!("⚠️ 没有任何输出行，仍然写出表头");
        }

        let writer = ReportWriter::new(&self.config.output_file);
        writer.write(&table)?;
        log_export(table.len(), writer.path());

        Ok(table)
    }

    /// 抓取所有字母，返回汇总后的表
    pub async fn crawl(&self) -> Result<ResultTable> {
        let letters = self.config.letters().map_err(CrawlError::Config)?;
        let mut stats = CrawlStats {
            letters: letters.len(),
            ..Default::default()
        };
        let table = self.process_all_letters(letters).await?;

        stats.rows = table.len();
        stats.unknown = table
            .rows()
            .iter()
            .filter(|r| r.status.is_unknown())
            .count();
        print_final_stats(&stats);

        Ok(table)
    }

    /// 处理所有字母
    ///
    /// 任一字母失败后不再派发新的字母；已经在跑的字母照常结束并关闭标签页，
    /// 然后返回第一个错误。
    async fn process_all_letters(&self, letters: Vec<DirectoryLetter>) -> Result<ResultTable> {
        let semaphore = Arc::new(Semaphore::new(self.config.letter_workers));
        let mut tasks = JoinSet::new();
        let mut table = ResultTable::new(self.config.scan_mode.with_locations());
        let mut first_error: Option<anyhow::Error> = None;

        let mut pending = letters.into_iter();
        let mut next = pending.next();
        while let Some(letter) = next {
            tokio::select! {
                biased;

                Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                    if let Err(e) = harvest(&mut table, joined) {
                        warn!("⚠️ 字母处理失败，停止派发剩余字母");
                        first_error = Some(e);
                        break;
                    }
                }
                permit = semaphore.clone().acquire_owned() => {
                    let permit = permit?;
                    let session = self.session.clone();
                    let config = self.config.clone();

                    tasks.spawn(async move {
                        let _permit = permit;
                        let result = letter_processor::process_letter(session, letter, config).await;
                        if let Err(e) = &result {
                            error!("[字母 {}] ❌ 处理过程中发生错误: {:#}", letter, e);
                        }
                        result
                    });
                    next = pending.next();
                }
            }
        }

        // 按完成顺序汇总
        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = harvest(&mut table, joined) {
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(table),
        }
    }
}

/// 把一个字母任务的结果追加到表中
fn harvest(
    table: &mut ResultTable,
    joined: std::result::Result<Result<Vec<ReportRow>>, JoinError>,
) -> Result<()> {
    let rows = joined.map_err(CrawlError::Worker)??;
    table.extend(rows);
    Ok(())
}
