// crates/tf_physics/src/statistics/mod.rs

//! 系综统计引擎
//!
//! 预热期（步数 ≤ n_steps_skip）之后每步累积：
//!
//! - 方差：Σ (h - h0)²，报告 Σ / 样本数
//! - 两点相关：Σ (h* - h0)(h - h0)，h* 为探针处高度
//!
//! 相关的计算有两种分解策略，由算法模式选择，通过 [`CorrelationEstimator`] 统一接口：
//!
//! | 模式 | 策略 | 每次采样的通信 |
//! |------|------|----------------|
//! | 2D | [`ProbeReductionEstimator`] | 一次标量全局归约 |
//! | 1D-x / 1D-y | [`PencilEstimator`] | 一次整场重分区复制 |
//!
//! 首个有效步时累积量恰好清零一次，丢弃初始条件带来的瞬态偏差。

mod pencil;
mod probe;

pub use pencil::{PencilEstimator, PencilLayout};
pub use probe::ProbeReductionEstimator;

use rayon::prelude::*;
use tf_config::{AlgorithmMode, ThinFilmConfig};

use crate::field::CellField;
use crate::grid::Grid;

/// 相关贡献估计器
pub trait CorrelationEstimator: Send {
    /// 策略名称
    fn name(&self) -> &'static str;

    /// 将本次采样的 (h* - h0)(h - h0) 计入 `corr_sum`
    fn accumulate(&mut self, h: &CellField, h0: f64, grid: &Grid, corr_sum: &mut CellField);

    /// 清零估计器内部累积量
    fn reset(&mut self);
}

/// 按算法模式选择相关策略
pub fn estimator_for(mode: AlgorithmMode, probe: [usize; 2], grid: &Grid) -> Box<dyn CorrelationEstimator> {
    match mode.probed_axis() {
        Some(axis) => Box::new(PencilEstimator::new(PencilLayout::new(grid, axis), probe[axis])),
        None => Box::new(ProbeReductionEstimator::new(probe)),
    }
}

/// 统计引擎
pub struct StatisticsEngine {
    h0: f64,
    warmup: usize,
    mode: AlgorithmMode,
    sample_count: usize,
    started: bool,
    dh2_sum: CellField,
    corr_sum: CellField,
    estimator: Box<dyn CorrelationEstimator>,
}

impl StatisticsEngine {
    /// 创建统计引擎，累积量初始为零
    pub fn new(
        grid: &Grid,
        h0: f64,
        warmup: usize,
        mode: AlgorithmMode,
        probe: [usize; 2],
    ) -> Self {
        Self {
            h0,
            warmup,
            mode,
            sample_count: 0,
            started: false,
            dh2_sum: CellField::new(grid, 0),
            corr_sum: CellField::new(grid, 0),
            estimator: estimator_for(mode, probe, grid),
        }
    }

    /// 从运行配置创建
    pub fn from_config(config: &ThinFilmConfig, grid: &Grid) -> Self {
        Self::new(
            grid,
            config.physics.h0,
            config.run.n_steps_skip,
            config.algorithm.mode,
            config.algorithm.probe,
        )
    }

    /// 步 `step` 结束后更新累积量，返回本步是否被采样
    pub fn update(&mut self, step: usize, h: &CellField, grid: &Grid) -> bool {
        if step <= self.warmup {
            return false;
        }
        if !self.started {
            self.reset();
            self.started = true;
        }

        let h0 = self.h0;
        self.dh2_sum.par_update_interior(|i, j, acc| {
            let d = h0 - h.get(i, j);
            acc + d * d
        });
        self.estimator.accumulate(h, h0, grid, &mut self.corr_sum);
        self.sample_count += 1;
        true
    }

    /// 清零全部累积量
    pub fn reset(&mut self) {
        self.dh2_sum.fill(0.0);
        self.corr_sum.fill(0.0);
        self.estimator.reset();
        self.sample_count = 0;
    }

    /// 是否已开始采样
    #[inline]
    pub fn is_active(&self) -> bool {
        self.sample_count > 0
    }

    /// 样本数
    #[inline]
    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// 算法模式
    #[inline]
    pub fn mode(&self) -> AlgorithmMode {
        self.mode
    }

    /// 相关策略名称
    #[inline]
    pub fn estimator_name(&self) -> &'static str {
        self.estimator.name()
    }

    /// 运行平均方差场；未采样时为零场
    pub fn variance_average(&self) -> CellField {
        self.averaged(&self.dh2_sum)
    }

    /// 运行平均相关场；未采样时为零场
    pub fn correlation_average(&self) -> CellField {
        self.averaged(&self.corr_sum)
    }

    /// 1D 模式下对所有行（列）取平均的相关曲线；2D 模式返回 `None`
    pub fn correlation_line(&self) -> Option<Vec<f64>> {
        let axis = self.mode.probed_axis()?;
        let avg = self.correlation_average();
        let n = [avg.nx(), avg.ny()];
        let n_pencils = n[1 - axis];
        let line = (0..n[axis])
            .into_par_iter()
            .map(|k| {
                let total: f64 = (0..n_pencils)
                    .map(|p| {
                        if axis == 0 {
                            avg.get(k, p)
                        } else {
                            avg.get(p, k)
                        }
                    })
                    .sum();
                total / n_pencils as f64
            })
            .collect();
        Some(line)
    }

    fn averaged(&self, sum: &CellField) -> CellField {
        let mut out = sum.clone();
        if self.sample_count > 0 {
            let inv = 1.0 / self.sample_count as f64;
            out.par_update_interior(|_, _, v| v * inv);
        }
        out
    }
}

impl std::fmt::Debug for StatisticsEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatisticsEngine")
            .field("h0", &self.h0)
            .field("warmup", &self.warmup)
            .field("mode", &self.mode)
            .field("sample_count", &self.sample_count)
            .field("estimator", &self.estimator.name())
            .finish()
    }
}
