//! 错误类型定义
//!
//! 这个模块定义了库中使用的所有错误类型，使用 thiserror 提供丰富的错误信息。
//!
//! 解析层面的异常（无法识别的行、未知的注释键）从不产生错误；
//! 只有输入/输出流失败、配置错误和执行计划解码失败会以 `SlowlogError` 返回。

/// 慢日志解析器的结果类型
pub type Result<T> = std::result::Result<T, SlowlogError>;

/// 慢日志解析错误类型
#[derive(Debug, thiserror::Error)]
pub enum SlowlogError {
    /// IO错误
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    /// 配置文件反序列化错误
    #[error("配置解析错误: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// 配置文件序列化错误
    #[error("配置序列化错误: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),

    /// 执行计划解码错误
    #[error("执行计划解码错误: {message}")]
    Decode { message: String },

    /// 日志错误（仅在启用 logging feature 时可用）
    #[cfg(feature = "logging")]
    #[error("日志错误: {0}")]
    Log(#[from] crate::logging::LogError),
}

impl SlowlogError {
    /// 创建一个配置错误
    pub fn config_error<S: Into<String>>(message: S) -> Self {
        let message = message.into();
        #[cfg(feature = "logging")]
        {
            crate::logging::ensure_logger_initialized();
            tracing::error!("配置错误: {}", message);
        }
        Self::Config(message)
    }

    /// 创建一个执行计划解码错误
    ///
    /// 这里不记录日志，由累加器在丢弃该错误时统一记录。
    pub fn decode_error<S: Into<String>>(message: S) -> Self {
        Self::Decode { message: message.into() }
    }

    /// 检查是否为 IO 错误
    pub fn is_io_error(&self) -> bool {
        matches!(self, SlowlogError::Io(_))
    }

    /// 检查是否为配置错误
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            SlowlogError::Config(_)
                | SlowlogError::TomlDe(_)
                | SlowlogError::TomlSer(_)
        )
    }

    /// 检查是否为执行计划解码错误
    pub fn is_decode_error(&self) -> bool {
        matches!(self, SlowlogError::Decode { .. })
    }
}
