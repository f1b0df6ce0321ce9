//! CSV 导出器实现 (同步版本)

use super::SyncExporter;
use crate::error::Result;
use crate::exporter::ExportStats;
use crate::slowlog::types::{SlowlogRecord, header};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// 同步 CSV 导出器
///
/// 首行为固定顺序的列名表头，之后每条记录一行。
pub struct SyncCsvExporter<W: Write = BufWriter<File>> {
    writer: W,
    stats: ExportStats,
    header_written: bool,
}

impl SyncCsvExporter {
    /// 创建新的同步 CSV 导出器（覆盖已有文件）
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::from_writer(BufWriter::new(file)))
    }
}

impl<W: Write> SyncCsvExporter<W> {
    /// 基于任意写入器创建导出器
    pub fn from_writer(writer: W) -> Self {
        Self { writer, stats: ExportStats::new(), header_written: false }
    }

    /// 取回内部写入器
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// 写入 CSV 头部
    fn write_header(&mut self) -> Result<()> {
        let line = Self::join_row(header());
        self.writer.write_all(line.as_bytes())?;
        self.header_written = true;
        Ok(())
    }

    /// 转义 CSV 字段
    fn escape_csv_field(field: &str) -> String {
        if field.contains(',')
            || field.contains('"')
            || field.contains('\n')
            || field.contains('\r')
            || field.starts_with(' ')
            || field.starts_with('\t')
        {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    fn join_row<'a>(fields: impl Iterator<Item = &'a str>) -> String {
        let mut row =
            fields.map(Self::escape_csv_field).collect::<Vec<_>>().join(",");
        row.push('\n');
        row
    }

    /// 格式化记录为 CSV 行
    fn format_record(record: &SlowlogRecord) -> String {
        Self::join_row(record.values())
    }
}

impl<W: Write + Send + Sync> SyncExporter for SyncCsvExporter<W> {
    fn name(&self) -> &str {
        "CSV"
    }

    fn export_record(&mut self, record: &SlowlogRecord) -> Result<()> {
        if !self.header_written {
            self.write_header()?;
        }

        let csv_line = Self::format_record(record);
        self.writer.write_all(csv_line.as_bytes())?;
        self.stats.exported_records += 1;

        Ok(())
    }

    fn export_batch(&mut self, records: &[SlowlogRecord]) -> Result<()> {
        for record in records {
            self.export_record(record)?;
        }

        #[cfg(feature = "logging")]
        tracing::debug!("CSV批量导出: {} 条记录", records.len());

        Ok(())
    }

    fn finalize(&mut self) -> Result<()> {
        // 没有任何记录时仍需要写入头部
        if !self.header_written {
            self.write_header()?;
        }

        self.writer.flush()?;
        self.stats.finish();

        #[cfg(feature = "logging")]
        tracing::info!("CSV导出完成: {}", self.stats);

        Ok(())
    }

    fn get_stats(&self) -> ExportStats {
        self.stats.clone()
    }
}
