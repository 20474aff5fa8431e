//! 单个字母处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块负责处理一个目录字母下的所有公司，是字母级别的编排器。
//!
//! ## 核心功能
//!
//! 1. **提取链接**：用一个独立标签页翻完本字母的目录
//! 2. **固定工作池**：开 N 个工作任务，每个独占一个标签页
//! 3. **共享队列**：工作任务从队列中取公司 URL
//! 4. **完成顺序收集**：谁先做完先收谁的结果

use std::collections::VecDeque;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::CrawlError;
use crate::infrastructure::{BrowserSession, PageDriver};
use crate::models::{DirectoryLetter, ReportRow};
use crate::services::LinkExtractor;
use crate::utils::logging::{log_letter_complete, log_letter_start};
use crate::workflow::{CompanyCtx, CompanyFlow};

type CompanyQueue = Arc<Mutex<VecDeque<CompanyCtx>>>;

/// 处理单个字母
///
/// 没有公司时直接返回空列表，不会打开工作标签页。
/// 任一公司出现不可恢复的错误时，清空队列不再派发，等所有工作任务关闭各自的
/// 标签页后再返回第一个错误。
pub async fn process_letter<S: BrowserSession>(
    session: Arc<S>,
    letter: DirectoryLetter,
    config: Arc<Config>,
) -> Result<Vec<ReportRow>> {
    log_letter_start(letter);

    // ========== 提取链接 ==========
    let listing_page = session.open_page().await?;
    let extracted = LinkExtractor::new(&config)
        .navigate_and_extract(&listing_page, letter)
        .await;
    listing_page.close().await?;
    let company_urls = extracted?;

    let total = company_urls.len();
    if total == 0 {
        info!("字母 {} 没有找到公司", letter);
        log_letter_complete(letter, 0, 0);
        return Ok(Vec::new());
    }

    // ========== 分发给工作池 ==========
    let queue: CompanyQueue = Arc::new(Mutex::new(
        company_urls
            .into_iter()
            .enumerate()
            .map(|(idx, url)| CompanyCtx::new(letter, idx + 1, total, url))
            .collect(),
    ));
    let flow = Arc::new(CompanyFlow::new(&config));
    let (tx, mut rx) = mpsc::unbounded_channel::<Result<Vec<ReportRow>>>();

    let worker_count = config.company_workers.min(total);
    debug!("字母 {} 启动 {} 个工作任务", letter, worker_count);

    let mut first_error: Option<anyhow::Error> = None;
    let mut workers = JoinSet::new();
    for _ in 0..worker_count {
        match session.open_page().await {
            Ok(page) => {
                workers.spawn(run_worker(page, queue.clone(), flow.clone(), tx.clone()));
            }
            Err(e) => {
                warn!("[字母 {}] ⚠️ 打开工作标签页失败，停止派发: {:#}", letter, e);
                queue.lock().await.clear();
                first_error = Some(e);
                break;
            }
        }
    }
    drop(tx);

    // ========== 按完成顺序收集 ==========
    let mut rows = Vec::new();
    while let Some(result) = rx.recv().await {
        match result {
            Ok(company_rows) => rows.extend(company_rows),
            Err(e) => {
                if first_error.is_none() {
                    warn!("[字母 {}] ⚠️ 公司处理失败，停止派发", letter);
                    queue.lock().await.clear();
                    first_error = Some(e);
                }
            }
        }
    }

    // 等所有工作任务关闭标签页
    while let Some(joined) = workers.join_next().await {
        let outcome = joined
            .map_err(|e| anyhow::Error::from(CrawlError::Worker(e)))
            .and_then(|r| r);
        if let Err(e) = outcome {
            first_error.get_or_insert(e);
        }
    }

    if let Some(e) = first_error {
        return Err(e);
    }

    log_letter_complete(letter, total, rows.len());
    Ok(rows)
}

/// 工作任务：独占一个标签页，直到队列为空
async fn run_worker<P: PageDriver + 'static>(
    page: P,
    queue: CompanyQueue,
    flow: Arc<CompanyFlow>,
    tx: mpsc::UnboundedSender<Result<Vec<ReportRow>>>,
) -> Result<()> {
    loop {
        let Some(ctx) = queue.lock().await.pop_front() else {
            break;
        };

        let result = flow.run(&page, &ctx).await;
        let failed = result.is_err();
        if tx.send(result).is_err() || failed {
            break;
        }
    }
    page.close().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::config::ScanMode;
    use crate::infrastructure::fake_site::{FakePage, FakeSite, FakeSiteBuilder};
    use crate::models::{Keyword, SiteProfile, Tristate};

    fn url(path: &str) -> String {
        format!("https://join.com/companies/{}", path)
    }

    fn with_directory(builder: FakeSiteBuilder, letter: &str, companies: &[String]) -> FakeSiteBuilder {
        let site = SiteProfile::default();
        let links: Vec<&str> = companies.iter().map(String::as_str).collect();
        builder.page(
            &url(letter),
            FakePage::titled("Companies")
                .with_texts(&site.directory_marker, &["Companies"])
                .with_links(&site.company_link, &links),
        )
    }

    /// x 字母：一家失效、一家招 DevOps、一家没有岗位
    fn letter_x_site() -> FakeSite {
        let site = SiteProfile::default();
        let companies = [url("gone"), url("devops-co"), url("quiet-co")];
        with_directory(FakeSite::builder(), "x", &companies)
            .page(&url("gone"), FakePage::titled("Page not found (404)"))
            .page(
                &url("devops-co"),
                FakePage::titled("DevOps Co").with_texts(&site.job_tile, &["Senior DevOps Engineer"]),
            )
            .page(&url("quiet-co"), FakePage::titled("Quiet Co"))
            .build()
    }

    #[tokio::test]
    async fn test_letter_x_scenario() {
        let fake = letter_x_site();
        let config = Arc::new(Config::default());

        let mut rows = process_letter(Arc::new(fake.clone()), DirectoryLetter::Letter('x'), config)
            .await
            .unwrap();
        rows.sort_by(|a, b| a.company_url.cmp(&b.company_url));

        assert_eq!(rows.len(), 3);

        let devops = &rows[0];
        assert_eq!(devops.company_url, url("devops-co"));
        assert_eq!(devops.status, Tristate::True);
        assert_eq!(devops.keyword(Keyword::Devops), Tristate::True);
        assert_eq!(devops.keyword(Keyword::Data), Tristate::False);
        assert_eq!(devops.keyword(Keyword::Sre), Tristate::False);
        assert_eq!(devops.keyword(Keyword::Analytics), Tristate::False);

        let gone = &rows[1];
        assert_eq!(gone.company_url, url("gone"));
        assert_eq!(gone.status, Tristate::False);
        assert!(Keyword::ALL.iter().all(|k| gone.keyword(*k) == Tristate::False));

        let quiet = &rows[2];
        assert_eq!(quiet.status, Tristate::True);
        assert!(Keyword::ALL.iter().all(|k| quiet.keyword(*k) == Tristate::False));
    }

    #[tokio::test]
    async fn test_each_worker_owns_a_page() {
        let fake = letter_x_site();
        let config = Arc::new(Config {
            company_workers: 2,
            ..Config::default()
        });

        process_letter(Arc::new(fake.clone()), DirectoryLetter::Letter('x'), config)
            .await
            .unwrap();

        // 目录页一个 + 两个工作任务
        assert_eq!(fake.opened_pages(), 3);
        assert_eq!(fake.closed_pages(), 3);
    }

    #[tokio::test]
    async fn test_empty_letter_returns_no_rows() {
        let fake = with_directory(FakeSite::builder(), "q", &[]).build();

        let rows = process_letter(
            Arc::new(fake.clone()),
            DirectoryLetter::Letter('q'),
            Arc::new(Config::default()),
        )
        .await
        .unwrap();

        assert!(rows.is_empty());
        assert_eq!(fake.opened_pages(), 1);
    }

    #[tokio::test]
    async fn test_count_mode_keeps_only_matching_companies() {
        let site = SiteProfile::default();
        let companies = [url("gone"), url("devops-co"), url("quiet-co")];
        let fake = with_directory(FakeSite::builder(), "x", &companies)
            .page(&format!("{}?page=1", url("gone")), FakePage::titled("Page not found (404)"))
            .page(
                &format!("{}?page=1", url("devops-co")),
                FakePage::titled("DevOps Co")
                    .with_texts(&site.posting_count_badge, &["1"])
                    .with_texts(&site.job_tile, &["Senior DevOps Engineer"]),
            )
            .page(
                &format!("{}?page=1", url("quiet-co")),
                FakePage::titled("Quiet Co").with_texts(&site.posting_count_badge, &["0"]),
            )
            .build();
        let config = Arc::new(Config {
            scan_mode: ScanMode::Count,
            ..Config::default()
        });

        let rows = process_letter(Arc::new(fake), DirectoryLetter::Letter('x'), config)
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].company_url, url("devops-co"));
        assert_eq!(rows[0].keyword(Keyword::Devops), Tristate::True);
    }

    #[tokio::test]
    async fn test_broken_company_aborts_letter() {
        let fake = with_directory(FakeSite::builder(), "b", &[url("ok"), url("broken")])
            .page(&url("ok"), FakePage::titled("Ok"))
            .broken(&url("broken"))
            .build();

        let result = process_letter(
            Arc::new(fake),
            DirectoryLetter::Letter('b'),
            Arc::new(Config::default()),
        )
        .await;
        tokio_test::assert_err!(result);
    }

    #[tokio::test]
    async fn test_failed_letter_closes_every_tab() {
        let delay = Duration::from_millis(200);
        let companies = [url("slow1"), url("broken"), url("slow2")];
        let fake = with_directory(FakeSite::builder(), "s", &companies)
            .page(&url("slow1"), FakePage::titled("Slow 1"))
            .page(&url("slow2"), FakePage::titled("Slow 2"))
            .slow(&url("slow1"), delay)
            .slow(&url("slow2"), delay)
            .broken(&url("broken"))
            .build();
        let config = Arc::new(Config {
            company_workers: 3,
            ..Config::default()
        });

        let result =
            process_letter(Arc::new(fake.clone()), DirectoryLetter::Letter('s'), config).await;

        tokio_test::assert_err!(result);
        assert_eq!(fake.opened_pages(), 4);
        assert_eq!(fake.closed_pages(), fake.opened_pages());
    }

    #[tokio::test]
    async fn test_failure_stops_handing_out_companies() {
        let companies = [url("broken"), url("slow"), url("later1"), url("later2")];
        let fake = with_directory(FakeSite::builder(), "s", &companies)
            .page(&url("slow"), FakePage::titled("Slow"))
            .slow(&url("slow"), Duration::from_millis(200))
            .broken(&url("broken"))
            .build();
        let config = Arc::new(Config {
            company_workers: 2,
            ..Config::default()
        });

        let result =
            process_letter(Arc::new(fake.clone()), DirectoryLetter::Letter('s'), config).await;

        tokio_test::assert_err!(result);
        assert_eq!(fake.visit_count(&url("later1")), 0);
        assert_eq!(fake.visit_count(&url("later2")), 0);
        assert_eq!(fake.closed_pages(), fake.opened_pages());
    }

    #[tokio::test]
    async fn test_open_page_failure_closes_opened_tabs() {
        let companies = [url("a1"), url("a2"), url("a3")];
        let fake = with_directory(FakeSite::builder(), "a", &companies)
            .tab_limit(2)
            .build();
        let config = Arc::new(Config {
            company_workers: 3,
            ..Config::default()
        });

        let result =
            process_letter(Arc::new(fake.clone()), DirectoryLetter::Letter('a'), config).await;

        tokio_test::assert_err!(result);
        // 目录页一个 + 成功打开的一个工作标签页
        assert_eq!(fake.opened_pages(), 2);
        assert_eq!(fake.closed_pages(), 2);
    }
}
