// crates/tf_config/src/lib.rs

//! ThinFilm Config Layer (Layer 4)
//!
//! 配置层，提供运行配置、算法模式选择和派生物理常数。
//! 配置在启动时构造一次，之后只读，通过引用传给各个组件。
//!
//! # 模块概览
//!
//! - [`algorithm`]: AlgorithmMode 枚举（1D-x / 1D-y / 2D）与迁移率策略
//! - [`solver_config`]: ThinFilmConfig 运行配置（JSON）
//! - [`error`]: 配置错误类型
//!
//! # 层级架构
//!
//! ```text
//! Layer 5: tf_cli        ─> uses ThinFilmConfig
//! Layer 4: tf_config     ─> AlgorithmMode, ThinFilmConfig (本层)
//! Layer 3: tf_physics    ─> ThinFilmSolver::from_config
//! Layer 1: tf_foundation
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algorithm;
pub mod error;
pub mod solver_config;

/// 层级标识
pub const LAYER: u8 = 4;

// 重导出核心类型
pub use algorithm::{AlgorithmMode, MobilityPolicy};
pub use error::ConfigError;
pub use solver_config::{
    AlgorithmConfig, BoundaryConfig, DomainConfig, OutputConfig, OutputFormat, PhysicsConfig,
    RunConfig, ThinFilmConfig,
};
