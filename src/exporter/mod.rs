//! 数据导出模块
//!
//! 提供统一的数据导出接口，目前支持 CSV 表格输出

pub mod stats;
pub use stats::ExportStats;

// 同步实现子模块
pub mod sync_impl;

pub use sync_impl::SyncExporter;
#[cfg(feature = "exporter-csv")]
pub use sync_impl::SyncCsvExporter;
