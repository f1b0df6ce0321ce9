//! 配置管理模块
//!
//! 提供统一的配置文件读取和管理功能。配置文件为 TOML 格式，
//! 所有段和字段都可省略，缺省时使用默认值。
//!
//! ```toml
//! [log]
//! enable_stdout = true
//! log_dir = "logs"
//! level = "info"
//!
//! [slowlog]
//! input_path = "slow_log_file.log"
//! output_path = "slow_log_with_results.csv"
//! chunk_size = 1000
//!
//! [plan_decoder]
//! enabled = false
//! dsn = "mysql://root@127.0.0.1:4000/"
//! ```

use crate::error::{Result, SlowlogError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 默认配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// 主配置结构体
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 日志配置
    pub log: LogConfig,
    /// 慢日志解析配置
    pub slowlog: SlowlogConfig,
    /// 执行计划解码配置
    pub plan_decoder: PlanDecoderConfig,
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// 是否启用控制台输出
    pub enable_stdout: bool,
    /// 日志输出目录，空串表示不写文件
    pub log_dir: String,
    /// 日志级别 (trace, debug, info, warn, error)
    pub level: String,
}

/// 慢日志解析配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlowlogConfig {
    /// 慢日志文件路径
    pub input_path: String,
    /// CSV 输出路径
    pub output_path: String,
    /// 每批交给导出器的记录数
    pub chunk_size: usize,
}

/// 执行计划解码配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanDecoderConfig {
    /// 是否连接 TiDB 解码执行计划
    pub enabled: bool,
    /// TiDB 连接串
    pub dsn: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enable_stdout: true,
            log_dir: "logs".to_string(),
            level: "info".to_string(),
        }
    }
}

impl Default for SlowlogConfig {
    fn default() -> Self {
        Self {
            input_path: "slow_log_file.log".to_string(),
            output_path: "slow_log_with_results.csv".to_string(),
            chunk_size: 1000,
        }
    }
}

impl Default for PlanDecoderConfig {
    fn default() -> Self {
        Self { enabled: false, dsn: "mysql://root@127.0.0.1:4000/".to_string() }
    }
}

impl Config {
    /// 从文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// 从字符串加载配置
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// 加载当前目录下的 `config.toml`，不存在时使用默认配置
    pub fn load() -> Result<Self> {
        let path = Path::new(DEFAULT_CONFIG_FILE);
        if path.exists() { Self::from_file(path) } else { Ok(Self::default()) }
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        match self.log.level.to_ascii_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(SlowlogError::config_error(format!(
                    "无效的日志级别: {}",
                    self.log.level
                )));
            }
        }

        if self.slowlog.chunk_size == 0 {
            return Err(SlowlogError::config_error("分块大小不能为0"));
        }

        if self.slowlog.input_path.trim().is_empty() {
            return Err(SlowlogError::config_error("输入文件路径不能为空"));
        }

        if self.slowlog.output_path.trim().is_empty() {
            return Err(SlowlogError::config_error("输出文件路径不能为空"));
        }

        if self.plan_decoder.enabled && self.plan_decoder.dsn.trim().is_empty()
        {
            return Err(SlowlogError::config_error(
                "启用执行计划解码时必须配置 dsn",
            ));
        }

        Ok(())
    }

    /// 转换为日志系统配置
    #[cfg(feature = "logging")]
    pub fn logging_config(&self) -> Result<crate::logging::LogConfig> {
        let level = crate::logging::LogConfig::parse_level(&self.log.level)?;
        let log_dir =
            (!self.log.log_dir.trim().is_empty()).then(|| self.log.log_dir.clone());
        Ok(crate::logging::LogConfig::new()
            .level(level)
            .enable_stdout(self.log.enable_stdout)
            .log_dir(log_dir))
    }
}
