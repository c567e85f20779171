// crates/tf_physics/src/error.rs

//! 物理层错误类型
//!
//! 数值脆弱性（高度变负导致迁移率项失去物理意义）不在此列：
//! 它不被捕获，只在求解器中以日志形式报告。

use tf_config::ConfigError;
use tf_foundation::TfError;
use thiserror::Error;

use crate::boundary::BoundaryError;

/// 物理层结果类型
pub type PhysicsResult<T> = Result<T, PhysicsError>;

/// 物理层错误
#[derive(Error, Debug)]
pub enum PhysicsError {
    /// 基础层错误（网格、IO 等）
    #[error(transparent)]
    Foundation(#[from] TfError),

    /// 配置错误
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// 边界条件错误
    #[error(transparent)]
    Boundary(#[from] BoundaryError),

    /// 已到达最大步数
    #[error("求解器已结束: 已完成 {max_step} 步")]
    Finished {
        /// 配置的最大步数
        max_step: usize,
    },
}
