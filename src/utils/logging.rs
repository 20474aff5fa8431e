/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use tracing::info;

use crate::config::Config;
use crate::models::DirectoryLetter;

/// 全部抓取完成后的统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// 处理的字母数
    pub letters: usize,
    /// 输出的行数
    pub rows: usize,
    /// 状态无法判断的行数
    pub unknown: usize,
}

/// 记录程序启动信息
///
/// # 参数
/// - `config`: 运行配置
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 公司岗位关键词扫描");
    info!("🔍 扫描模式: {:?}", config.scan_mode);
    info!(
        "📊 并发: 字母 {} 个 / 每个字母 {} 个工作任务",
        config.letter_workers, config.company_workers
    );
    info!("📄 输出文件: {}", config.output_file);
    info!("{}", "=".repeat(60));
}

/// 记录字母开始信息
pub fn log_letter_start(letter: DirectoryLetter) {
    info!("\n{}", "─".repeat(60));
    info!("📦 开始处理字母 {}", letter);
    info!("{}", "─".repeat(60));
}

/// 记录字母完成信息
///
/// # 参数
/// - `letter`: 目录字母
/// - `companies`: 公司数量
/// - `rows`: 输出行数
pub fn log_letter_complete(letter: DirectoryLetter, companies: usize, rows: usize) {
    info!(
        "✓ 字母 {} 完成: {} 家公司, 输出 {} 行",
        letter, companies, rows
    );
}

/// 记录导出信息
pub fn log_export(rows: usize, path: &str) {
    info!("💾 已写出 {} 行到 {}", rows, path);
}

/// 打印最终统计信息
pub fn print_final_stats(stats: &CrawlStats) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("🔤 字母: {}", stats.letters);
    info!("✅ 输出行数: {}", stats.rows);
    info!("❓ 状态未知: {}", stats.unknown);
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
