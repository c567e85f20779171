// crates/tf_io/src/error.rs
//! IO 错误类型定义
//!
//! 所有错误最终可转换为 TfError 以实现跨层错误传递。

use std::path::PathBuf;

use tf_foundation::TfError;
use thiserror::Error;

/// IO 模块结果类型别名
pub type IoResult<T> = Result<T, IoError>;

/// IO 错误枚举
#[derive(Error, Debug)]
pub enum IoError {
    /// 输出目录无法创建
    #[error("无法创建输出目录 {path}: {source}")]
    CreateDir {
        /// 目录
        path: PathBuf,
        /// 底层错误
        #[source]
        source: std::io::Error,
    },

    /// 文件写入失败
    #[error("写入失败 {path}: {source}")]
    Write {
        /// 文件
        path: PathBuf,
        /// 底层错误
        #[source]
        source: std::io::Error,
    },

    /// 序列化失败
    #[error("快照序列化失败 {path}: {message}")]
    Serialize {
        /// 文件
        path: PathBuf,
        /// 原因
        message: String,
    },

    /// 快照数据与形状不一致
    #[error("快照形状不一致: 期望 {expected} 个值, 实际 {actual}")]
    ShapeMismatch {
        /// 期望值个数
        expected: usize,
        /// 实际值个数
        actual: usize,
    },
}

impl From<IoError> for TfError {
    fn from(err: IoError) -> Self {
        match err {
            IoError::CreateDir { path, source } => {
                TfError::io_with_source(format!("无法创建输出目录: {}", path.display()), source)
            }
            IoError::Write { path, source } => {
                TfError::io_with_source(format!("写入失败: {}", path.display()), source)
            }
            IoError::Serialize { path, message } => {
                TfError::serialization(format!("{}: {}", path.display(), message))
            }
            IoError::ShapeMismatch { expected, actual } => {
                TfError::size_mismatch("snapshot", expected, actual)
            }
        }
    }
}
