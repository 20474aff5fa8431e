//! 报表导出服务 - 业务能力层
//!
//! 只负责"把整张表写成 CSV"，在抓取结束后调用一次

use anyhow::Result;
use tracing::debug;

use crate::error::CrawlError;
use crate::models::ResultTable;

/// 报表导出服务
///
/// 目标文件已存在时直接覆盖。
pub struct ReportWriter {
    output_path: String,
}

impl ReportWriter {
    pub fn new(output_path: impl Into<String>) -> Self {
        Self {
            output_path: output_path.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.output_path
    }

    /// 写出整张表
    pub fn write(&self, table: &ResultTable) -> Result<()> {
        debug!("写出 {} 行到 {}", table.len(), self.output_path);

        let export_err = |e: csv::Error| CrawlError::export_failed(&self.output_path, e);

        let mut writer = csv::Writer::from_path(&self.output_path).map_err(export_err)?;
        writer.write_record(table.headers()).map_err(export_err)?;
        for record in table.records() {
            writer.write_record(&record).map_err(export_err)?;
        }
        writer
            .flush()
            .map_err(|e| export_err(csv::Error::from(e)))?;

        Ok(())
    }
}
