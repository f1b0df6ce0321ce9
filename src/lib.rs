//! TiDB 慢查询日志解析库
//!
//! 将多行的慢日志条目拼装为结构化记录，并以固定列顺序导出为 CSV。

pub mod config;
pub mod error;
pub mod exporter;
pub mod slowlog;

#[cfg(feature = "logging")]
pub mod logging;

#[cfg(feature = "exporter-csv")]
pub mod process;

pub use error::{Result, SlowlogError};
pub use slowlog::{Field, SlowlogRecord};
