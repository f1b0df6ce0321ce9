//! 慢日志记录类型
//!
//! `SlowlogRecord` 是一条慢日志条目的完整字段集合，所有字段均为原始文本，
//! 默认空串。列顺序固定，与导出的 CSV 表头一致。

/// 定义字段枚举与记录结构体，两者共享同一份有序列清单。
macro_rules! slowlog_fields {
    ($( $(#[$doc:meta])* $variant:ident => $field:ident, )+) => {
        /// 记录中的一个命名字段（即导出表格中的一列）
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Field {
            $( $(#[$doc])* $variant, )+
        }

        impl Field {
            /// 按导出列顺序排列的全部字段
            pub const ALL: &'static [Field] = &[ $( Field::$variant, )+ ];

            /// 导出时使用的列名
            pub const fn column_name(self) -> &'static str {
                match self {
                    $( Field::$variant => stringify!($variant), )+
                }
            }
        }

        /// 单条慢日志记录，包含所有解析字段
        #[derive(Default, Debug, Clone, PartialEq, Eq)]
        pub struct SlowlogRecord {
            $( $(#[$doc])* pub $field: String, )+
        }

        impl SlowlogRecord {
            /// 读取指定字段
            pub fn get(&self, field: Field) -> &str {
                match field {
                    $( Field::$variant => &self.$field, )+
                }
            }

            fn slot_mut(&mut self, field: Field) -> &mut String {
                match field {
                    $( Field::$variant => &mut self.$field, )+
                }
            }
        }
    };
}

slowlog_fields! {
    /// 日志时间（条目起始标记）
    LogTime => log_time,
    /// 主机标识
    Hostname => hostname,
    /// TiDB 进程标识
    Tidb => tidb,
    /// 首行携带的数据库名
    Db => db,
    TxnStartTs => txn_start_ts,
    ConnID => conn_id,
    QueryTime => query_time,
    ParseTime => parse_time,
    CompileTime => compile_time,
    RewriteTime => rewrite_time,
    OptimizeTime => optimize_time,
    WaitTS => wait_ts,
    CopTime => cop_time,
    ProcessTime => process_time,
    WaitTime => wait_time,
    RequestCount => request_count,
    ProcessKeys => process_keys,
    TotalKeys => total_keys,
    GetSnapshotTime => get_snapshot_time,
    RocksdbDeleteSkippedCount => rocksdb_delete_skipped_count,
    RocksdbKeySkippedCount => rocksdb_key_skipped_count,
    RocksdbBlockCacheHitCount => rocksdb_block_cache_hit_count,
    /// `# DB:` 注释行中的数据库名
    DbName => db_name,
    IsInternal => is_internal,
    Digest => digest,
    Stats => stats,
    NumCopTasks => num_cop_tasks,
    CopProcAvg => cop_proc_avg,
    CopProcP90 => cop_proc_p90,
    CopProcMax => cop_proc_max,
    CopProcAddr => cop_proc_addr,
    CopWaitAvg => cop_wait_avg,
    CopWaitP90 => cop_wait_p90,
    CopWaitMax => cop_wait_max,
    CopWaitAddr => cop_wait_addr,
    MemMax => mem_max,
    Prepared => prepared,
    PlanFromCache => plan_from_cache,
    PlanFromBinding => plan_from_binding,
    HasMoreResults => has_more_results,
    KvTotal => kv_total,
    PdTotal => pd_total,
    BackoffTotal => backoff_total,
    WriteSqlResponseTotal => write_sql_response_total,
    ResultRows => result_rows,
    Succ => succ,
    IsExplicitTxn => is_explicit_txn,
    IsSyncStatsFailed => is_sync_stats_failed,
    PlanDigest => plan_digest,
    /// SQL 语句文本
    Sql => sql,
    /// 解码后的执行计划
    Plan => plan,
    RpcNum => rpc_num,
    RpcTime => rpc_time,
    ResultOneLine => result_one_line,
}

/// 导出表格的列数
pub const FIELD_COUNT: usize = Field::ALL.len();

impl SlowlogRecord {
    /// 覆盖写入指定字段
    pub fn set<S: Into<String>>(&mut self, field: Field, value: S) {
        *self.slot_mut(field) = value.into();
    }

    /// 记录是否有效：只有填充了起始时间的记录才会被输出
    pub fn is_started(&self) -> bool {
        !self.log_time.is_empty()
    }

    /// 按列顺序返回所有字段值
    pub fn values(&self) -> impl Iterator<Item = &str> + '_ {
        Field::ALL.iter().map(move |f| self.get(*f))
    }
}

/// 按列顺序返回表头
pub fn header() -> impl Iterator<Item = &'static str> {
    Field::ALL.iter().map(|f| f.column_name())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_order_matches_header() {
        assert_eq!(FIELD_COUNT, 54);
        let names: Vec<_> = header().collect();
        assert_eq!(names[0], "LogTime");
        assert_eq!(names[3], "Db");
        assert_eq!(names[22], "DbName");
        assert_eq!(names[49], "Sql");
        assert_eq!(names[50], "Plan");
        assert_eq!(names[53], "ResultOneLine");
    }

    #[test]
    fn test_set_and_get() {
        let mut record = SlowlogRecord::default();
        assert!(!record.is_started());

        record.set(Field::LogTime, "2024-01-01T00:00:00.000");
        record.set(Field::ConnID, "5");
        record.set(Field::ConnID, "6");

        assert!(record.is_started());
        assert_eq!(record.get(Field::ConnID), "6");
        assert_eq!(record.conn_id, "6");
        assert_eq!(record.values().count(), FIELD_COUNT);
    }
}
