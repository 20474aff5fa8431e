//! 公司处理流程 - 流程层
//!
//! 核心职责：定义"一家公司"的完整处理流程
//!
//! 流程顺序：
//! 1. 按扫描模式检查公司页
//! 2. 状态无法判断时有限次重试
//! 3. 把检查结果展开为报表行（可能为零行）

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::config::{Config, ScanMode};
use crate::infrastructure::PageDriver;
use crate::models::{CompanyResult, ReportRow, Tristate};
use crate::services::CompanyChecker;
use crate::workflow::company_ctx::CompanyCtx;

/// 公司处理流程
///
/// - 决定用哪种方式检查、何时重试、出几行
/// - 不持有任何资源（page 由调用方传入）
pub struct CompanyFlow {
    checker: CompanyChecker,
    mode: ScanMode,
    max_retries: usize,
}

impl CompanyFlow {
    pub fn new(config: &Config) -> Self {
        Self {
            checker: CompanyChecker::new(config),
            mode: config.scan_mode,
            max_retries: config.max_retries,
        }
    }

    /// 处理一家公司，返回零到多行
    pub async fn run<P: PageDriver>(&self, page: &P, ctx: &CompanyCtx) -> Result<Vec<ReportRow>> {
        let mut attempt = 0;
        let result = loop {
            let result = self.check(page, &ctx.url).await?;
            if !result.status.is_unknown() || attempt >= self.max_retries {
                break result;
            }
            attempt += 1;
            warn!(
                "{} ⚠️ 状态无法判断，重试 ({}/{}): {}",
                ctx, attempt, self.max_retries, ctx.url
            );
        };

        let rows = expand_rows(self.mode, &result);
        info!(
            "{} 状态: {} | 关键词命中: {} | 输出 {} 行",
            ctx,
            result.status,
            result.any_keyword(),
            rows.len()
        );
        Ok(rows)
    }

    async fn check<P: PageDriver>(&self, page: &P, url: &str) -> Result<CompanyResult> {
        match self.mode {
            ScanMode::Summary => self.summary_check(page, url).await,
            ScanMode::Location => {
                self.checker
                    .check_status_and_extract_keywords(page, url)
                    .await
            }
            ScanMode::Count => self.checker.check_by_posting_count(page, url).await,
        }
    }

    /// 先判断存活，存活才扫描关键词
    async fn summary_check<P: PageDriver>(&self, page: &P, url: &str) -> Result<CompanyResult> {
        match self.checker.check_company_status(page, url).await? {
            Tristate::False => Ok(CompanyResult::inactive(url)),
            Tristate::Unknown => Ok(CompanyResult::new(url)),
            Tristate::True => {
                let mut result = CompanyResult::new(url);
                result.status = Tristate::True;
                result.keywords = self.checker.get_job_keywords(page, url).await?;
                debug!("{} 关键词: {:?}", url, result.keywords);
                Ok(result)
            }
        }
    }
}

/// 按扫描模式把检查结果展开为报表行
///
/// - `Summary`：每家公司一行，失效或无法判断的公司也出行
/// - `Location`：存活且命中关键词时，每个 (地点, 合同) 一行
/// - `Count`：存活且命中关键词时一行
pub fn expand_rows(mode: ScanMode, result: &CompanyResult) -> Vec<ReportRow> {
    let matched = result.status.is_true() && result.any_keyword();
    match mode {
        ScanMode::Summary => vec![result.summary_row()],
        ScanMode::Location if matched => result.posting_rows(),
        ScanMode::Count if matched => vec![result.summary_row()],
        ScanMode::Location | ScanMode::Count => Vec::new(),
    }
}
