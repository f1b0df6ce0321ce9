use crate::error::Result;
use crate::slowlog::accumulator::RecordAccumulator;
use crate::slowlog::decoder::PlanDecoder;
use crate::slowlog::types::SlowlogRecord;
use crate::slowlog::utils::{line_bytes_to_str, strip_line_ending};
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

/// 读取缓冲区初始大小，单行长度不受此限制
const READ_BUFFER_CAPACITY: usize = 64 * 1024;

/// 解析统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ParseSummary {
    /// 读取的总行数
    pub lines: usize,
    /// 输出的记录数
    pub records: usize,
}

/// 同步慢日志文件解析器
pub struct SyncSlowlogParser;

impl SyncSlowlogParser {
    /// 流式解析文件，使用回调函数处理分块数据
    ///
    /// # 参数
    /// - `path`: 要解析的日志文件路径
    /// - `chunk_size`: 每次回调处理的记录数量，0 表示全部解析完再回调一次
    /// - `decoder`: 执行计划解码器
    /// - `hook`: 回调函数，接收一批按输入顺序排列的记录，返回错误时终止解析
    pub fn parse_with_hooks<P, D, F>(
        path: P,
        chunk_size: usize,
        decoder: D,
        hook: F,
    ) -> Result<ParseSummary>
    where
        P: AsRef<Path>,
        D: PlanDecoder,
        F: FnMut(&[SlowlogRecord]) -> Result<()>,
    {
        let path_ref = path.as_ref();
        #[cfg(feature = "logging")]
        tracing::debug!(
            "开始流式解析文件: {}, chunk_size = {}",
            path_ref.display(),
            chunk_size
        );

        let file = File::open(path_ref)?;
        let reader = BufReader::with_capacity(READ_BUFFER_CAPACITY, file);
        let summary = Self::parse_reader(reader, chunk_size, decoder, hook)?;

        #[cfg(feature = "logging")]
        tracing::info!(
            "流式解析文件完成: {}, 总处理行数: {}, 记录数: {}",
            path_ref.display(),
            summary.lines,
            summary.records
        );
        Ok(summary)
    }

    /// 从任意 `BufRead` 流式解析
    ///
    /// 读取错误立即返回，已经交给回调的记录保持不变，
    /// 尚未达到分块阈值的记录不会再被回调。
    pub fn parse_reader<R, D, F>(
        mut reader: R,
        chunk_size: usize,
        decoder: D,
        mut hook: F,
    ) -> Result<ParseSummary>
    where
        R: BufRead,
        D: PlanDecoder,
        F: FnMut(&[SlowlogRecord]) -> Result<()>,
    {
        let mut accumulator = RecordAccumulator::new(decoder);
        let mut records = Vec::new();
        let mut summary = ParseSummary::default();
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            summary.lines += 1;

            let line = line_bytes_to_str(strip_line_ending(&buf), summary.lines);
            if let Some(record) = accumulator.feed_line(&line) {
                records.push(record);
            }

            if chunk_size > 0 && records.len() >= chunk_size {
                #[cfg(feature = "logging")]
                tracing::trace!(
                    "触发分块处理: {} 条记录 >= {} (chunk_size)",
                    records.len(),
                    chunk_size
                );
                summary.records += records.len();
                hook(records.as_slice())?;
                records.clear();
            }
        }

        // 输入结束，输出最后一条记录
        records.extend(accumulator.finish());

        if !records.is_empty() {
            #[cfg(feature = "logging")]
            tracing::trace!("处理剩余数据: {} 条记录", records.len());
            summary.records += records.len();
            hook(records.as_slice())?;
        }

        Ok(summary)
    }

    /// 解析内存中的文本，返回全部记录
    pub fn parse_str<D: PlanDecoder>(
        content: &str,
        decoder: D,
    ) -> Vec<SlowlogRecord> {
        crate::slowlog::accumulator::parse_lines(content.lines(), decoder)
    }
}
