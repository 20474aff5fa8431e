//! 日志初始化
//!
//! 设置了 `RUST_LOG` 时以环境变量为准，否则使用配置中的级别；
//! `quiet_targets` 中的模块一律关闭（浏览器协议层的日志量很大）。

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// 构建过滤器
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    let base = std::env::var("RUST_LOG").unwrap_or_else(|_| config.level.clone());
    filter_from(&base, &config.quiet_targets)
}

fn filter_from(base: &str, quiet_targets: &[String]) -> Result<EnvFilter> {
    let mut filter = EnvFilter::try_new(base)?;
    for target in quiet_targets {
        filter = filter.add_directive(format!("{}=off", target).parse()?);
    }
    Ok(filter)
}

/// 初始化全局日志
///
/// 重复调用会返回错误（全局 subscriber 只能设置一次）。
pub fn init(config: &LoggingConfig) -> Result<()> {
    tracing_subscriber::registry()
        .with(build_filter(config)?)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init()?;
    Ok(())
}
