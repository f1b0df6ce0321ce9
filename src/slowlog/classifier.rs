//! 慢日志行分类器
//!
//! 对单行文本判定其在条目中的结构角色，并提取该角色携带的字段。
//! 这是一个纯函数：没有可变状态，也不做任何 IO。
//!
//! ## 识别顺序（首个匹配生效）
//!
//! ```text
//! 1. 条目起始     [<ts>;<host>;<tidb>;<db>;slowlog ]# Time: <ts>
//! 2. 执行计划     # Plan: tidb_decode_plan('<payload>')
//! 3. Cop_time 族  # Cop_time: .. Process_time: .. Wait_time: .. ...
//! 4. Cop_proc 族  # Cop_proc_avg: .. Cop_proc_p90: .. ...
//! 5. Cop_wait 族  # Cop_wait_avg: ..
//! 6. 通用键值     # <Key>: <value>
//! 7. 语句行       其余所有行
//! ```

use crate::slowlog::types::Field;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;

/// 复合指标行所属的族
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopFamily {
    /// `# Cop_time:` 开头的行
    Time,
    /// `# Cop_proc_avg:` 开头的行
    Proc,
    /// `# Cop_wait_avg:` 开头的行
    Wait,
}

impl CopFamily {
    /// 该族的行前缀
    pub const fn prefix(self) -> &'static str {
        match self {
            CopFamily::Time => "# Cop_time:",
            CopFamily::Proc => "# Cop_proc_avg:",
            CopFamily::Wait => "# Cop_wait_avg:",
        }
    }

    fn extractors(self) -> &'static [(Regex, Field)] {
        match self {
            CopFamily::Time => COP_TIME_FIELDS.as_slice(),
            CopFamily::Proc => COP_PROC_FIELDS.as_slice(),
            CopFamily::Wait => COP_WAIT_FIELDS.as_slice(),
        }
    }
}

/// 单行分类结果，借用输入行的文本，由累加器立即消费
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationLine<'a> {
    /// 条目起始行，携带起始字段
    EntryStart(Vec<(Field, &'a str)>),
    /// 执行计划注释，payload 原样输出，不在此解码
    Plan { payload: &'a str },
    /// 复合指标行，只包含该行实际出现的子字段
    Metrics { family: CopFamily, fields: Vec<(Field, &'a str)> },
    /// 通用键值注释；未知键的 `field` 为 `None`
    KeyValue { key: &'a str, field: Option<Field>, value: &'a str },
    /// 以 `;` 结尾的 SQL 语句
    Statement(&'a str),
    /// `use <db>;` 切库语句，对记录无影响
    UseDatabase,
    /// 无法识别的行，直接丢弃
    Ignored,
}

impl<'a> AnnotationLine<'a> {
    /// 是否为条目边界
    pub fn is_boundary(&self) -> bool {
        matches!(self, AnnotationLine::EntryStart(_))
    }

    /// 该行携带的 (字段, 值) 对
    ///
    /// 执行计划行返回空：其字段值需要经过外部解码才能得到。
    pub fn fields(&self) -> Vec<(Field, &'a str)> {
        match self {
            AnnotationLine::EntryStart(fields)
            | AnnotationLine::Metrics { fields, .. } => fields.clone(),
            AnnotationLine::KeyValue { field: Some(field), value, .. } => {
                vec![(*field, *value)]
            }
            AnnotationLine::Statement(sql) => vec![(Field::Sql, *sql)],
            _ => Vec::new(),
        }
    }
}

lazy_static! {
    static ref FIRST_LINE_RE: Regex = Regex::new(
        r"^([0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}.*;slowlog[\t\n\f\r ])?# Time:[\t\n\f\r ]*(.*)"
    )
    .unwrap();
    static ref KEY_VALUE_RE: Regex = Regex::new(r"^# ([0-9A-Za-z_]+): (.*)").unwrap();
    static ref PLAN_RE: Regex =
        Regex::new(r#"^# Plan: tidb_decode_plan\(['"](.*)['"]\)"#).unwrap();

    static ref COP_TIME_FIELDS: Vec<(Regex, Field)> = label_extractors(&[
        ("Cop_time", Field::CopTime),
        ("Process_time", Field::ProcessTime),
        ("Wait_time", Field::WaitTime),
        ("Request_count", Field::RequestCount),
        ("Process_keys", Field::ProcessKeys),
        ("Total_keys", Field::TotalKeys),
        ("Get_snapshot_time", Field::GetSnapshotTime),
        ("Rocksdb_delete_skipped_count", Field::RocksdbDeleteSkippedCount),
        ("Rocksdb_key_skipped_count", Field::RocksdbKeySkippedCount),
        ("Rocksdb_block_cache_hit_count", Field::RocksdbBlockCacheHitCount),
    ]);

    static ref COP_PROC_FIELDS: Vec<(Regex, Field)> = label_extractors(&[
        ("Cop_proc_avg", Field::CopProcAvg),
        ("Cop_proc_p90", Field::CopProcP90),
        ("Cop_proc_max", Field::CopProcMax),
        ("Cop_proc_addr", Field::CopProcAddr),
    ]);

    // Cop_wait 行按 Cop_proc 标签读取，带 Cop_wait_* 标签的行不会填充任何字段。
    static ref COP_WAIT_FIELDS: Vec<(Regex, Field)> = label_extractors(&[
        ("Cop_proc_avg", Field::CopWaitAvg),
        ("Cop_proc_p90", Field::CopWaitP90),
        ("Cop_proc_max", Field::CopWaitMax),
        ("Cop_proc_addr", Field::CopWaitAddr),
    ]);

    /// `# Key: value` 注释键到记录字段的映射（精确匹配，区分大小写）
    static ref KEY_FIELDS: HashMap<&'static str, Field> = HashMap::from([
        ("Txn_start_ts", Field::TxnStartTs),
        ("Conn_ID", Field::ConnID),
        ("Query_time", Field::QueryTime),
        ("Parse_time", Field::ParseTime),
        ("Compile_time", Field::CompileTime),
        ("Rewrite_time", Field::RewriteTime),
        ("Optimize_time", Field::OptimizeTime),
        ("Wait_TS", Field::WaitTS),
        ("DB", Field::DbName),
        ("Is_internal", Field::IsInternal),
        ("Digest", Field::Digest),
        ("Stats", Field::Stats),
        ("Num_cop_tasks", Field::NumCopTasks),
        ("Mem_max", Field::MemMax),
        ("Prepared", Field::Prepared),
        ("Plan_from_cache", Field::PlanFromCache),
        ("Plan_from_binding", Field::PlanFromBinding),
        ("Has_more_results", Field::HasMoreResults),
        ("KV_total", Field::KvTotal),
        ("PD_total", Field::PdTotal),
        ("Backoff_total", Field::BackoffTotal),
        ("Write_sql_response_total", Field::WriteSqlResponseTotal),
        ("Result_rows", Field::ResultRows),
        ("Succ", Field::Succ),
        ("IsExplicitTxn", Field::IsExplicitTxn),
        ("IsSyncStatsFailed", Field::IsSyncStatsFailed),
        ("Plan_digest", Field::PlanDigest),
    ]);
}

/// 为每个标签构造 `Label: ([^ ]+)` 提取正则
fn label_extractors(labels: &[(&str, Field)]) -> Vec<(Regex, Field)> {
    labels
        .iter()
        .map(|(label, field)| {
            let pattern = format!("{}: ([^ ]+)", regex::escape(label));
            (Regex::new(&pattern).unwrap(), *field)
        })
        .collect()
}

/// 查找注释键对应的记录字段
pub fn lookup_key(key: &str) -> Option<Field> {
    KEY_FIELDS.get(key).copied()
}

/// 对单行文本进行分类并提取字段
pub fn classify_line(line: &str) -> AnnotationLine<'_> {
    if let Some(caps) = FIRST_LINE_RE.captures(line) {
        return AnnotationLine::EntryStart(entry_start_fields(line, &caps));
    }

    if let Some(caps) = PLAN_RE.captures(line) {
        let payload = caps.get(1).map_or("", |m| m.as_str());
        return AnnotationLine::Plan { payload };
    }

    for family in [CopFamily::Time, CopFamily::Proc, CopFamily::Wait] {
        if line.starts_with(family.prefix()) {
            return AnnotationLine::Metrics {
                family,
                fields: extract_labels(line, family.extractors()),
            };
        }
    }

    if let Some(caps) = KEY_VALUE_RE.captures(line) {
        let key = caps.get(1).map_or("", |m| m.as_str());
        let value = caps.get(2).map_or("", |m| m.as_str().trim());
        return AnnotationLine::KeyValue { key, field: lookup_key(key), value };
    }

    if line.starts_with("use ") {
        AnnotationLine::UseDatabase
    } else if line.ends_with(';') {
        AnnotationLine::Statement(line)
    } else {
        AnnotationLine::Ignored
    }
}

/// 起始行字段：带 slowlog 前缀时按 `;` 切分并按位置赋值，否则只取 `# Time:` 之后的时间
fn entry_start_fields<'a>(
    line: &'a str,
    caps: &regex::Captures<'a>,
) -> Vec<(Field, &'a str)> {
    if caps.get(1).is_some() {
        const POSITIONS: [Field; 4] =
            [Field::LogTime, Field::Hostname, Field::Tidb, Field::Db];
        POSITIONS
            .iter()
            .zip(line.split(';'))
            .map(|(field, part)| (*field, part.trim()))
            .collect()
    } else {
        let time = caps.get(2).map_or("", |m| m.as_str().trim());
        vec![(Field::LogTime, time)]
    }
}

fn extract_labels<'a>(
    line: &'a str,
    extractors: &[(Regex, Field)],
) -> Vec<(Field, &'a str)> {
    extractors
        .iter()
        .filter_map(|(re, field)| {
            re.captures(line)
                .and_then(|caps| caps.get(1))
                .map(|m| (*field, m.as_str().trim()))
        })
        .collect()
}
