// crates/tf_physics/src/lib.rs

//! 随机薄膜方程求解模块
//!
//! 在二维规则网格上用显式前向欧拉推进带热噪声的润滑方程
//! （四阶非线性退化抛物方程），同时累积高度涨落的方差和两点空间相关。
//!
//! - 网格与分解 (grid)
//! - 场存储 (field) - 单元中心场（带 halo）与面心场
//! - 边界策略 (boundary) - 周期 / 无通量 / 钉扎
//! - 通量引擎 (flux) - 面高度、梯度、拉普拉斯、通量
//! - 噪声源 (noise)
//! - 时间积分 (integrator)
//! - 统计引擎 (statistics) - 方差与相关，两种分解策略
//! - 快照接口 (output)
//! - 求解驱动 (solver)
//!
//! # 单步流程
//!
//! ```text
//! 抽取噪声 → 通量引擎 → 边界覆盖 → 高度更新 → halo 交换
//!          → 统计累积（预热期后）→ 可选快照
//! ```

pub mod boundary;
pub mod error;
pub mod field;
pub mod flux;
pub mod grid;
pub mod integrator;
pub mod noise;
pub mod output;
pub mod solver;
pub mod statistics;

// 重导出常用类型
pub use boundary::{AxisBoundary, BoundaryError, BoundaryKind, BoundaryPolicy, Side};
pub use error::{PhysicsError, PhysicsResult};
pub use field::{CellField, FaceField};
pub use flux::{FluxEngine, FluxParams};
pub use grid::{BoxArray, Grid, TileBox};
pub use integrator::{forward_euler_update, SolverState, TimeIntegrator};
pub use noise::{GaussianNoise, NoiseSource, ZeroNoise};
pub use output::{FieldSnapshot, NullSink, SnapshotKind, SnapshotSink};
pub use solver::{RunSummary, StepReport, ThinFilmSolver};
pub use statistics::{
    CorrelationEstimator, PencilEstimator, PencilLayout, ProbeReductionEstimator,
    StatisticsEngine,
};
