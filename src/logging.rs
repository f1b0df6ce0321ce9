//! 日志初始化和配置模块
//!
//! 这个模块提供了统一的日志初始化功能，使用 tracing 库。
//! 默认配置：info 级别，输出到控制台和 logs 目录，按天滚动。

use std::io;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{
    EnvFilter, Registry,
    fmt::{self, time::SystemTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// 日志配置结构体
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// 日志级别
    pub level: Level,
    /// 是否输出到控制台
    pub enable_stdout: bool,
    /// 日志文件目录，`None` 表示不写文件
    pub log_dir: Option<String>,
}

impl LogConfig {
    /// 创建新的日志配置，使用默认级别
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置日志级别
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// 设置是否输出到控制台
    pub fn enable_stdout(mut self, enable: bool) -> Self {
        self.enable_stdout = enable;
        self
    }

    /// 设置日志文件目录
    pub fn log_dir<S: Into<String>>(mut self, dir: Option<S>) -> Self {
        self.log_dir = dir.map(Into::into);
        self
    }

    /// 从文本级别解析（trace/debug/info/warn/error）
    pub fn parse_level(level: &str) -> LogResult<Level> {
        level
            .parse::<Level>()
            .map_err(|_| LogError::Config(format!("无效的日志级别: {level}")))
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            enable_stdout: true,
            log_dir: Some("logs".to_string()),
        }
    }
}

/// 自动初始化日志系统（仅初始化一次）
static INIT_LOGGER: Once = Once::new();

/// 确保日志系统已初始化
///
/// 这个函数会在首次调用时自动初始化日志系统，后续调用不会重复初始化
/// 如果初始化失败（比如已经初始化过），会安静地忽略错误
pub(crate) fn ensure_logger_initialized() {
    INIT_LOGGER.call_once(|| {
        // 忽略初始化错误，因为可能已经被其他地方初始化了
        let _ = init_logging(LogConfig::default().log_dir(None::<String>));
    });
}

#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("IO错误: {0}")]
    Io(#[from] io::Error),
    #[error("日志配置错误: {0}")]
    Config(String),
    #[error("日志初始化错误: {0}")]
    Init(String),
}

/// 日志初始化结果
pub type LogResult<T> = Result<T, LogError>;

/// 初始化日志系统
///
/// - `RUST_LOG` 环境变量优先，否则使用配置的级别
/// - 控制台输出可关闭
/// - 配置了 `log_dir` 时额外写入按天滚动的日志文件
///
/// 重复初始化不视为错误。
///
/// # Examples
///
/// ```no_run
/// use tidb_slowlog_analysis::logging::{init_logging, LogConfig};
/// use tracing::Level;
///
/// let config = LogConfig::new().level(Level::DEBUG);
/// init_logging(config).unwrap();
/// ```
pub fn init_logging(config: LogConfig) -> LogResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.to_string()));

    let console_layer = config.enable_stdout.then(|| {
        fmt::layer()
            .with_timer(SystemTime)
            .with_target(true)
            .with_thread_ids(true)
            .with_ansi(true)
    });

    let mut guard = None;
    let file_layer = match config.log_dir.as_deref() {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let file_appender = tracing_appender::rolling::daily(dir, "slowlog");
            let (non_blocking, g) = tracing_appender::non_blocking(file_appender);
            guard = Some(g);
            Some(
                fmt::layer()
                    .with_writer(non_blocking)
                    .with_timer(SystemTime)
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_ansi(false), // 文件中不使用颜色
            )
        }
        None => None,
    };

    let subscriber =
        Registry::default().with(env_filter).with(console_layer).with(file_layer);

    // 尝试初始化，如果失败说明已经初始化过了
    match subscriber.try_init() {
        Ok(_) => {
            // 存储 guard 以防止 appender 被丢弃
            if let Some(g) = guard {
                std::mem::forget(g);
            }
            tracing::info!("日志系统初始化完成 - 级别: {}", config.level);
            Ok(())
        }
        Err(_) => Ok(()),
    }
}
