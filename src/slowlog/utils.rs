//! 慢日志读取的工具函数

use std::{borrow::Cow, str};

/// 去除行尾的 `\n` / `\r\n`
#[must_use]
pub fn strip_line_ending(bytes: &[u8]) -> &[u8] {
    let bytes = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    bytes.strip_suffix(b"\r").unwrap_or(bytes)
}

/// 将读取到的字节转换为字符串（尽可能为 Borrowed）
///
/// 行为说明：
/// - 如果字节序列是有效的 UTF-8，则返回 `Cow::Borrowed(&str)`，避免额外分配。
/// - 若遇到无效 UTF-8，记录一条 warn 日志并返回 lossy 转换后的 owned `String`，
///   解析继续进行。
///
/// 参数：
/// - `line_bytes`：已去除换行符的行字节切片。
/// - `line_num`：当前行号（用于日志）。
pub fn line_bytes_to_str(line_bytes: &[u8], line_num: usize) -> Cow<'_, str> {
    match str::from_utf8(line_bytes) {
        Ok(s) => Cow::Borrowed(s),
        Err(e) => {
            #[cfg(feature = "logging")]
            {
                // 仅记录总长度和前缀（最多 8 字节）以避免日志膨胀
                let prefix = &line_bytes[..8usize.min(line_bytes.len())];
                tracing::warn!(
                    line = line_num,
                    len = line_bytes.len(),
                    prefix = ?prefix,
                    error = %e,
                    "发现无效 UTF-8 字节序列"
                );
            }
            #[cfg(not(feature = "logging"))]
            let _ = (e, line_num);
            String::from_utf8_lossy(line_bytes)
        }
    }
}
