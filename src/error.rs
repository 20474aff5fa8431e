use thiserror::Error;

/// 爬虫错误类型
///
/// 等待超时不属于错误：它们在各自的服务内部被降级为默认结果。
/// 这里只收录会中止整次运行的错误。
#[derive(Debug, Error)]
pub enum CrawlError {
    /// 浏览器相关错误
    #[error("浏览器错误: {0}")]
    Browser(#[from] BrowserError),

    /// 导出报表失败
    #[error("导出报表失败 ({path}): {source}")]
    Export {
        path: String,
        #[source]
        source: csv::Error,
    },

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    /// 工作任务异常退出
    #[error("工作任务异常退出: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// 浏览器相关错误
#[derive(Debug, Error)]
pub enum BrowserError {
    /// 启动浏览器失败
    #[error("启动浏览器失败: {source}")]
    LaunchFailed {
        #[source]
        source: chromiumoxide::error::CdpError,
    },

    /// 连接浏览器失败
    #[error("无法连接到浏览器 (端口: {port}): {source}")]
    ConnectionFailed {
        port: u16,
        #[source]
        source: chromiumoxide::error::CdpError,
    },

    /// 浏览器配置失败
    #[error("浏览器配置失败: {0}")]
    ConfigurationFailed(String),

    /// 创建页面失败
    #[error("创建页面失败: {source}")]
    PageCreationFailed {
        #[source]
        source: chromiumoxide::error::CdpError,
    },

    /// 导航失败
    #[error("导航到 {url} 失败: {source}")]
    NavigationFailed {
        url: String,
        #[source]
        source: chromiumoxide::error::CdpError,
    },

    /// 执行脚本失败
    #[error("执行脚本失败: {source}")]
    ScriptExecutionFailed {
        #[source]
        source: chromiumoxide::error::CdpError,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },

    /// 配置文件读取失败
    #[error("读取配置文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// 配置文件解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// 非法的目录字母
    #[error("非法的目录字母: '{0}'")]
    InvalidLetter(String),

    /// 非法的扫描模式
    #[error("非法的扫描模式: '{0}' (可选: summary / location / count)")]
    InvalidScanMode(String),

    /// 非法的取值
    #[error("配置项 {key} 非法: {reason}")]
    InvalidValue { key: String, reason: String },
}

impl From<chromiumoxide::error::CdpError> for CrawlError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        CrawlError::Browser(BrowserError::ScriptExecutionFailed { source: err })
    }
}

// ========== 便捷构造函数 ==========

impl CrawlError {
    /// 创建导航失败错误
    pub fn navigation_failed(
        url: impl Into<String>,
        source: chromiumoxide::error::CdpError,
    ) -> Self {
        CrawlError::Browser(BrowserError::NavigationFailed {
            url: url.into(),
            source,
        })
    }

    /// 创建导出失败错误
    pub fn export_failed(path: impl Into<String>, source: csv::Error) -> Self {
        CrawlError::Export {
            path: path.into(),
            source,
        }
    }
}

/// 爬虫结果类型
pub type CrawlResult<T> = Result<T, CrawlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_message_names_the_key() {
        let err = CrawlError::from(ConfigError::InvalidValue {
            key: "company_workers".to_string(),
            reason: "必须大于 0".to_string(),
        });
        let msg = err.to_string();
        assert!(msg.contains("company_workers"));
        assert!(msg.starts_with("配置错误"));
    }

    #[test]
    fn test_invalid_letter_message() {
        let err = ConfigError::InvalidLetter("ab".to_string());
        assert_eq!(err.to_string(), "非法的目录字母: 'ab'");
    }
}
