//! TiDB 慢日志解析模块
//!
//! 提供慢日志的行分类、记录拼装、执行计划解码和文件解析

pub mod accumulator;
pub mod classifier;
pub mod decoder;
pub mod sync_parser;
pub mod types;
pub mod utils;

// 重新导出核心类型和函数
pub use accumulator::{RecordAccumulator, parse_lines};
pub use classifier::{AnnotationLine, CopFamily, classify_line};
#[cfg(feature = "plan-decode")]
pub use decoder::MysqlPlanDecoder;
pub use decoder::{NoopPlanDecoder, PlanDecoder};
pub use sync_parser::{ParseSummary, SyncSlowlogParser};
pub use types::{FIELD_COUNT, Field, SlowlogRecord};
