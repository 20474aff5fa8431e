use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::models::{DirectoryLetter, SiteProfile};

/// 默认配置文件
pub const DEFAULT_CONFIG_FILE: &str = "crawler.toml";

/// 公司页的扫描方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    /// 每家公司一行：状态 + 关键词
    #[default]
    Summary,
    /// 翻页扫描，只保留地点命中的岗位，每个 (地点, 合同) 一行
    Location,
    /// 按岗位总数计算页数，命中任一关键词即停止
    Count,
}

impl ScanMode {
    /// 报表是否带地点/合同列
    pub fn with_locations(&self) -> bool {
        matches!(self, ScanMode::Location)
    }
}

impl FromStr for ScanMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "summary" => Ok(ScanMode::Summary),
            "location" => Ok(ScanMode::Location),
            "count" => Ok(ScanMode::Count),
            _ => Err(ConfigError::InvalidScanMode(s.to_string())),
        }
    }
}

/// 日志配置
///
/// 显式传给 `logger::init`，不在运行期修改。
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 默认日志级别，也可以是完整的 EnvFilter 指令
    pub level: String,
    /// 需要静音的 target（例如浏览器连接层的噪声）
    pub quiet_targets: Vec<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            quiet_targets: vec![
                "chromiumoxide::conn".to_string(),
                "chromiumoxide::handler".to_string(),
            ],
        }
    }
}

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 是否无头模式
    pub headless: bool,
    /// 浏览器可执行文件，不填则自动查找
    pub chrome_executable: Option<String>,
    /// 填写后连接已打开的浏览器，而不是启动新的
    pub browser_debug_port: Option<u16>,
    /// 每个字母内并发检查的公司数
    pub company_workers: usize,
    /// 同时处理的字母数
    pub letter_workers: usize,
    /// 要处理的字母，不填则为 a-z 加 #
    pub letters: Option<Vec<String>>,
    pub scan_mode: ScanMode,
    /// Data 关键词是否包含 "données"
    pub localized_triggers: bool,
    /// 地点模式下岗位地点必须包含的子串
    pub location_filter: String,
    /// 计数模式下命中后是否停止翻页
    pub early_exit: bool,
    /// 单家公司最多翻几页
    pub max_company_pages: usize,
    pub directory_timeout_secs: u64,
    pub pagination_timeout_secs: u64,
    pub title_timeout_secs: u64,
    pub listing_timeout_secs: u64,
    /// 状态无法判断时的重试次数
    pub max_retries: usize,
    /// 输出 CSV
    pub output_file: String,
    pub site: SiteProfile,
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            headless: true,
            chrome_executable: None,
            browser_debug_port: None,
            company_workers: 16,
            letter_workers: 4,
            letters: None,
            scan_mode: ScanMode::Summary,
            localized_triggers: true,
            location_filter: "Suisse".to_string(),
            early_exit: true,
            max_company_pages: 50,
            directory_timeout_secs: 30,
            pagination_timeout_secs: 5,
            title_timeout_secs: 10,
            listing_timeout_secs: 10,
            max_retries: 1,
            output_file: "company_status_with_keywords.csv".to_string(),
            site: SiteProfile::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// 加载配置：配置文件（`CRAWLER_CONFIG` 或 `crawler.toml`，可选）+ 环境变量覆盖
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(|key| std::env::var(key).ok(), Path::new(DEFAULT_CONFIG_FILE))
    }

    /// 从 `lookup` 读取变量加载配置
    ///
    /// 指定了 `CRAWLER_CONFIG` 时该文件必须存在；否则 `default_file` 存在才读取。
    pub fn load_with<F>(lookup: F, default_file: &Path) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup("CRAWLER_CONFIG") {
            Some(path) => Self::from_toml_file(Path::new(&path))?,
            None if default_file.exists() => Self::from_toml_file(default_file)?,
            None => Self::default(),
        };
        config.apply_overrides(&lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// 只用默认值 + 环境变量
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// 用 `lookup` 提供的变量覆盖配置
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("HEADLESS") {
            self.headless = parse_var("HEADLESS", &v, "bool")?;
        }
        if let Some(v) = lookup("CHROME_EXECUTABLE") {
            self.chrome_executable = Some(v);
        }
        if let Some(v) = lookup("BROWSER_DEBUG_PORT") {
            self.browser_debug_port = Some(parse_var("BROWSER_DEBUG_PORT", &v, "u16")?);
        }
        if let Some(v) = lookup("COMPANY_WORKERS") {
            self.company_workers = parse_var("COMPANY_WORKERS", &v, "usize")?;
        }
        if let Some(v) = lookup("LETTER_WORKERS") {
            self.letter_workers = parse_var("LETTER_WORKERS", &v, "usize")?;
        }
        if let Some(v) = lookup("LETTERS") {
            let letters: Vec<String> = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            self.letters = Some(letters);
        }
        if let Some(v) = lookup("SCAN_MODE") {
            self.scan_mode = v.parse()?;
        }
        if let Some(v) = lookup("MAX_RETRIES") {
            self.max_retries = parse_var("MAX_RETRIES", &v, "usize")?;
        }
        if let Some(v) = lookup("OUTPUT_FILE") {
            self.output_file = v;
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            self.logging.level = v;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.company_workers == 0 {
            return Err(invalid("company_workers", "必须大于 0"));
        }
        if self.letter_workers == 0 {
            return Err(invalid("letter_workers", "必须大于 0"));
        }
        if self.site.page_size == 0 {
            return Err(invalid("site.page_size", "必须大于 0"));
        }
        if self.max_company_pages == 0 {
            return Err(invalid("max_company_pages", "必须大于 0"));
        }
        self.letters()?;
        Ok(())
    }

    /// 要处理的字母
    pub fn letters(&self) -> Result<Vec<DirectoryLetter>, ConfigError> {
        match &self.letters {
            Some(list) if !list.is_empty() => DirectoryLetter::parse_list(list),
            _ => Ok(DirectoryLetter::all()),
        }
    }

    pub fn directory_timeout(&self) -> Duration {
        Duration::from_secs(self.directory_timeout_secs)
    }

    pub fn pagination_timeout(&self) -> Duration {
        Duration::from_secs(self.pagination_timeout_secs)
    }

    pub fn title_timeout(&self) -> Duration {
        Duration::from_secs(self.title_timeout_secs)
    }

    pub fn listing_timeout(&self) -> Duration {
        Duration::from_secs(self.listing_timeout_secs)
    }
}

fn parse_var<T: FromStr>(var_name: &str, value: &str, expected_type: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::EnvVarParseFailed {
            var_name: var_name.to_string(),
            value: value.to_string(),
            expected_type: expected_type.to_string(),
        })
}

fn invalid(key: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
