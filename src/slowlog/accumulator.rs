//! 记录累加器 - 多行条目拼装
//!
//! 累加器独占当前正在拼装的记录，逐行调用分类器并把提取到的字段写入记录：
//!
//! ```text
//! 输入行 → classify_line() → 边界？ ──是──→ 输出上一条（若已起始）→ 新建记录 → 写入起始字段
//!                              │
//!                              否
//!                              ↓
//!                      逐字段覆盖写入当前记录（执行计划先经解码器）
//! ```
//!
//! 输入结束后调用 [`RecordAccumulator::finish`] 输出最后一条记录。
//! 只有填充了 `LogTime` 的记录才会被输出，第一个边界之前的内容被丢弃。

use crate::slowlog::classifier::{AnnotationLine, classify_line};
use crate::slowlog::decoder::PlanDecoder;
use crate::slowlog::types::{Field, SlowlogRecord};

/// 单条记录的累加器
pub struct RecordAccumulator<D> {
    current: SlowlogRecord,
    decoder: D,
}

impl<D: PlanDecoder> RecordAccumulator<D> {
    /// 使用给定的执行计划解码器创建累加器
    pub fn new(decoder: D) -> Self {
        Self { current: SlowlogRecord::default(), decoder }
    }

    /// 当前正在拼装的记录
    pub fn current(&self) -> &SlowlogRecord {
        &self.current
    }

    /// 处理一行输入；遇到新条目边界时返回上一条已完成的记录
    pub fn feed_line(&mut self, line: &str) -> Option<SlowlogRecord> {
        let annotation = classify_line(line);

        if annotation.is_boundary() {
            let finished = std::mem::take(&mut self.current);
            self.apply(&annotation);
            return finished.is_started().then_some(finished);
        }

        self.apply(&annotation);
        None
    }

    /// 输入结束：若还有已起始的记录则输出
    pub fn finish(self) -> Option<SlowlogRecord> {
        self.current.is_started().then_some(self.current)
    }

    fn apply(&mut self, annotation: &AnnotationLine<'_>) {
        match annotation {
            AnnotationLine::Plan { payload } => {
                let plan = self.decode_plan(payload);
                self.current.set(Field::Plan, plan);
            }
            AnnotationLine::KeyValue { key, field: None, .. } => {
                #[cfg(feature = "logging")]
                tracing::trace!(key = *key, "忽略未知注释键");
                #[cfg(not(feature = "logging"))]
                let _ = key;
            }
            other => {
                for (field, value) in other.fields() {
                    self.current.set(field, value);
                }
            }
        }
    }

    fn decode_plan(&mut self, payload: &str) -> String {
        match self.decoder.decode(payload) {
            Ok(plan) => plan,
            Err(e) => {
                #[cfg(feature = "logging")]
                tracing::warn!(
                    log_time = %self.current.log_time,
                    "执行计划解码失败，计划字段留空: {}",
                    e
                );
                #[cfg(not(feature = "logging"))]
                let _ = e;
                String::new()
            }
        }
    }
}

/// 将一组行解析为记录列表（便捷函数）
pub fn parse_lines<'a, I, D>(lines: I, decoder: D) -> Vec<SlowlogRecord>
where
    I: IntoIterator<Item = &'a str>,
    D: PlanDecoder,
{
    let mut accumulator = RecordAccumulator::new(decoder);
    let mut records: Vec<SlowlogRecord> =
        lines.into_iter().filter_map(|line| accumulator.feed_line(line)).collect();
    records.extend(accumulator.finish());
    records
}
