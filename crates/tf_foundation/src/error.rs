// crates/tf_foundation/src/error.rs

//! 错误处理模块，定义统一错误类型
//!
//! 提供 `TfError` 枚举和 `TfResult` 类型别名。物理计算相关的错误在
//! `tf_physics` 中扩展，IO 相关错误在 `tf_io` 中扩展，二者都可转换为 `TfError`。
//!
//! # 示例
//!
//! ```
//! use tf_foundation::error::{TfError, TfResult};
//!
//! fn read_config() -> TfResult<()> {
//!     Err(TfError::invalid_input("配置文件格式错误"))
//! }
//! assert!(read_config().is_err());
//! ```

use thiserror::Error;

/// 统一结果类型
pub type TfResult<T> = Result<T, TfError>;

/// ThinFilm 错误类型
#[derive(Error, Debug)]
pub enum TfError {
    // ========================================================================
    // IO 相关错误
    // ========================================================================

    /// IO 错误
    #[error("IO错误: {message}")]
    Io {
        /// 描述性错误信息
        message: String,
        #[source]
        /// 可选的底层 IO 错误
        source: Option<std::io::Error>,
    },

    // ========================================================================
    // 数据错误
    // ========================================================================

    /// 无效输入
    #[error("无效的输入数据: {message}")]
    InvalidInput {
        /// 说明无效原因
        message: String,
    },

    /// 数组大小不匹配
    #[error("数组大小不匹配: {name} 期望{expected}, 实际{actual}")]
    SizeMismatch {
        /// 数据名称
        name: &'static str,
        /// 期望大小
        expected: usize,
        /// 实际大小
        actual: usize,
    },

    /// 序列化错误
    #[error("序列化错误: {message}")]
    Serialization {
        /// 序列化失败原因
        message: String,
    },
}

// ========================================================================
// 便捷构造方法
// ========================================================================

impl TfError {
    /// 从IO错误创建（带源）
    pub fn io_with_source(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(source),
        }
    }

    /// 无效输入
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// 数组大小不匹配
    pub fn size_mismatch(name: &'static str, expected: usize, actual: usize) -> Self {
        Self::SizeMismatch {
            name,
            expected,
            actual,
        }
    }

    /// 序列化错误
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for TfError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TfError::invalid_input("网格为空");
        assert!(err.to_string().contains("无效的输入数据"));
    }

    #[test]
    fn test_size_mismatch_display() {
        let err = TfError::size_mismatch("snapshot", 64, 63);
        let msg = err.to_string();
        assert!(msg.contains("snapshot"));
        assert!(msg.contains("64"));
        assert!(msg.contains("63"));
    }

    #[test]
    fn test_serialization_display() {
        let err = TfError::serialization("非法浮点数");
        assert!(err.to_string().contains("序列化错误"));
    }

    #[test]
    fn test_io_with_source_keeps_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "plt00000010");
        let err = TfError::io_with_source("写入快照失败", io_err);
        assert!(matches!(err, TfError::Io { source: Some(_), .. }));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "plt00000010");
        let err: TfError = io_err.into();
        assert!(matches!(err, TfError::Io { source: Some(_), .. }));
    }
}
