use crate::error::Result;
use crate::exporter::{SyncCsvExporter, SyncExporter};
use crate::slowlog::{ParseSummary, PlanDecoder, SyncSlowlogParser};
use std::{path::Path, time, time::Instant};

/// 一次完整处理的统计
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessSummary {
    /// 解析统计
    pub parse: ParseSummary,
    /// 写入 CSV 的记录数
    pub exported: usize,
    /// 总耗时
    pub elapsed: time::Duration,
}

/// 解析一个慢日志文件并写出 CSV。
///
/// # 参数
/// * `input` - 慢日志文件路径
/// * `output` - CSV 输出路径（已存在则覆盖）
/// * `chunk_size` - 每批写出的记录数
/// * `decoder` - 执行计划解码器
///
/// # Errors
/// 输入文件无法读取、输出文件无法写入时返回错误，处理立即停止；
/// 之前已写出的批次保留在输出文件中。
///
/// # 行为说明
/// - 无论是否解析到记录，输出文件都会包含表头
/// - 执行计划解码失败不会中断处理
pub fn process_slowlog_file<P, Q, D>(
    input: P,
    output: Q,
    chunk_size: usize,
    decoder: D,
) -> Result<ProcessSummary>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    D: PlanDecoder,
{
    let start = Instant::now();
    let mut exporter = SyncCsvExporter::new(output.as_ref())?;

    let parse = SyncSlowlogParser::parse_with_hooks(
        input.as_ref(),
        chunk_size,
        decoder,
        |records| exporter.export_batch(records),
    );
    // 读取失败时也把已写出的批次刷到磁盘
    let finalized = exporter.finalize();
    let parse = parse?;
    finalized?;

    let exported = exporter.get_stats().exported_records;
    let elapsed = start.elapsed();

    #[cfg(feature = "logging")]
    tracing::info!(
        "处理完成({}): {} -> {}，共 {} 行，输出 {} 条记录，总耗时: {:.2?}",
        exporter.name(),
        input.as_ref().display(),
        output.as_ref().display(),
        parse.lines,
        exported,
        elapsed
    );

    Ok(ProcessSummary { parse, exported, elapsed })
}
