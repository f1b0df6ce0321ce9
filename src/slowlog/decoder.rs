//! 执行计划解码
//!
//! 慢日志中的 `# Plan: tidb_decode_plan('...')` 只携带编码后的计划，
//! 需要交给一个正在运行的 TiDB 实例执行 `tidb_decode_plan` 才能得到可读文本。
//! 解析器通过 [`PlanDecoder`] 注入这一能力，测试中可以替换为假实现。

use crate::error::Result;

/// 执行计划解码能力：payload → 单行文本
pub trait PlanDecoder {
    /// 解码一个执行计划 payload
    ///
    /// 失败时返回错误，由调用方记录日志并将计划字段留空。
    fn decode(&mut self, payload: &str) -> Result<String>;
}

impl<D: PlanDecoder + ?Sized> PlanDecoder for &mut D {
    fn decode(&mut self, payload: &str) -> Result<String> {
        (**self).decode(payload)
    }
}

impl<D: PlanDecoder + ?Sized> PlanDecoder for Box<D> {
    fn decode(&mut self, payload: &str) -> Result<String> {
        (**self).decode(payload)
    }
}

/// 不做任何解码的实现，计划字段始终为空
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPlanDecoder;

impl PlanDecoder for NoopPlanDecoder {
    fn decode(&mut self, _payload: &str) -> Result<String> {
        Ok(String::new())
    }
}

/// 将查询结果的所有行、所有列以换行拼接并去除首尾空白
pub fn join_result_cells<I, S>(cells: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut joined = String::new();
    for cell in cells {
        joined.push_str(cell.as_ref());
        joined.push('\n');
    }
    joined.trim().to_string()
}

#[cfg(feature = "plan-decode")]
pub use mysql::MysqlPlanDecoder;

#[cfg(feature = "plan-decode")]
mod mysql {
    use super::{PlanDecoder, join_result_cells};
    use crate::error::{Result, SlowlogError};
    use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
    use sqlx::{Column, Row};
    use std::time::Duration;

    const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

    /// 通过 MySQL 协议连接 TiDB，执行 `SELECT tidb_decode_plan(?)` 解码
    ///
    /// 内部持有一个单线程 tokio 运行时，每次解码阻塞等待查询完成，
    /// 保证解码结果在处理下一行之前写入当前记录。连接在首次解码时建立，
    /// 失败后下一次解码会重新尝试。
    pub struct MysqlPlanDecoder {
        dsn: String,
        runtime: tokio::runtime::Runtime,
        pool: Option<MySqlPool>,
    }

    impl MysqlPlanDecoder {
        /// 使用 DSN（如 `mysql://root@127.0.0.1:4000/`）创建解码器
        pub fn new<S: Into<String>>(dsn: S) -> Result<Self> {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            Ok(Self { dsn: dsn.into(), runtime, pool: None })
        }

        fn pool(&mut self) -> Result<MySqlPool> {
            if let Some(pool) = &self.pool {
                return Ok(pool.clone());
            }

            let options: MySqlConnectOptions =
                self.dsn.parse().map_err(|e| {
                    SlowlogError::decode_error(format!("无效的 DSN: {e}"))
                })?;
            let pool = self
                .runtime
                .block_on(
                    MySqlPoolOptions::new()
                        .max_connections(1)
                        .acquire_timeout(Duration::from_secs(
                            DEFAULT_CONNECT_TIMEOUT_SECS,
                        ))
                        .connect_with(options),
                )
                .map_err(|e| {
                    SlowlogError::decode_error(format!("连接数据库失败: {e}"))
                })?;

            #[cfg(feature = "logging")]
            tracing::debug!("执行计划解码连接已建立");

            self.pool = Some(pool.clone());
            Ok(pool)
        }
    }

    impl PlanDecoder for MysqlPlanDecoder {
        fn decode(&mut self, payload: &str) -> Result<String> {
            let pool = self.pool()?;
            let rows = self
                .runtime
                .block_on(
                    sqlx::query("SELECT tidb_decode_plan(?)")
                        .bind(payload)
                        .fetch_all(&pool),
                )
                .map_err(|e| {
                    SlowlogError::decode_error(format!("执行查询失败: {e}"))
                })?;

            let mut cells = Vec::new();
            for row in &rows {
                for column in row.columns() {
                    let cell: Option<String> =
                        row.try_get(column.ordinal()).map_err(|e| {
                            SlowlogError::decode_error(format!(
                                "读取结果失败: {e}"
                            ))
                        })?;
                    cells.push(cell.unwrap_or_default());
                }
            }

            #[cfg(feature = "logging")]
            tracing::trace!(rows = rows.len(), "执行计划解码完成");

            Ok(join_result_cells(cells))
        }
    }

    impl Drop for MysqlPlanDecoder {
        fn drop(&mut self) {
            if let Some(pool) = self.pool.take() {
                self.runtime.block_on(pool.close());
            }
        }
    }
}
