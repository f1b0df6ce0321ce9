//! 集成测试公共模块

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use tidb_slowlog_analysis::Result;
use tidb_slowlog_analysis::slowlog::PlanDecoder;

/// 创建测试用的慢日志文件
#[allow(dead_code)]
pub fn create_test_slowlog(
    dir: &TempDir,
    filename: &str,
    content: &str,
) -> PathBuf {
    let file_path = dir.path().join(filename);
    fs::write(&file_path, content).expect("Failed to write test file");
    file_path
}

/// 标准测试慢日志内容（两条条目，第二条带 slowlog 前缀首行）
#[allow(dead_code)]
pub const SAMPLE_SLOWLOG_CONTENT: &str = r#"# Time: 2024-05-20T10:15:30.123456+08:00
# Txn_start_ts: 449722548107575297
# Conn_ID: 3221225478
# Query_time: 1.527627
# Parse_time: 0.000054
# Compile_time: 0.000129
# Rewrite_time: 0.000023
# Optimize_time: 0.000081
# Wait_TS: 0.000002
# Cop_time: 0.461 Process_time: 2.73 Wait_time: 0.002 Request_count: 12 Process_keys: 2016000 Total_keys: 2016012 Get_snapshot_time: 0.001 Rocksdb_delete_skipped_count: 3 Rocksdb_key_skipped_count: 2016008 Rocksdb_block_cache_hit_count: 6912
# DB: orders
# Is_internal: false
# Digest: 7e0b2c3e5c0d8a9f4b3a1e2d
# Stats: orders:449722530625196033
# Num_cop_tasks: 12
# Cop_proc_avg: 0.2275 Cop_proc_p90: 0.31 Cop_proc_max: 0.34 Cop_proc_addr: 10.0.1.12:20160
# Cop_wait_avg: 0.0001 Cop_wait_p90: 0.0002 Cop_wait_max: 0.0003 Cop_wait_addr: 10.0.1.13:20160
# Mem_max: 22317
# Prepared: false
# Plan_from_cache: false
# Plan_from_binding: false
# Has_more_results: false
# KV_total: 2.731
# PD_total: 0.00004
# Backoff_total: 0
# Write_sql_response_total: 0.000003
# Result_rows: 1
# Succ: true
# IsExplicitTxn: false
# IsSyncStatsFailed: false
# Plan: tidb_decode_plan('8gW4MAkxNF81CTAJMQlmdW5jczpjb3VudCgxKS0+Q29sdW1u')
# Plan_digest: 60e4ccf6d4a32b52bd2b2e2f3c6c5d66
use orders;
select count(*) from orders where created_at > '2024-05-01';
2024-05-20T10:16:01.000+08:00;tidb-1;4000;orders;slowlog # Time: 2024-05-20T10:16:01.000+08:00
# Conn_ID: 3221225479
# Query_time: 0.412
# Succ: true
update orders set status = 'done' where id = 7;
"#;

/// 返回固定结果、并记录收到的 payload 的假解码器
#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingDecoder {
    pub payloads: Vec<String>,
}

impl PlanDecoder for RecordingDecoder {
    fn decode(&mut self, payload: &str) -> Result<String> {
        self.payloads.push(payload.to_string());
        Ok(format!("decoded:{payload}"))
    }
}

/// 总是失败的假解码器
#[allow(dead_code)]
pub struct FailingDecoder;

impl PlanDecoder for FailingDecoder {
    fn decode(&mut self, _payload: &str) -> Result<String> {
        Err(tidb_slowlog_analysis::SlowlogError::decode_error(
            "connection refused",
        ))
    }
}
