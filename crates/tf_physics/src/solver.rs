// crates/tf_physics/src/solver.rs

//! 随机薄膜求解驱动
//!
//! 组装网格、边界策略、通量引擎、噪声源、时钟与统计引擎，
//! 执行严格串行的外层步进循环：
//!
//! ```text
//! 抽取噪声 → 通量 → 高度更新 → halo 刷新 → 时钟推进 → 统计 → 快照
//! ```
//!
//! 第 n+1 步只在第 n 步的高度更新与 halo 刷新完成后开始。

use std::time::{Duration, Instant};

use tf_config::ThinFilmConfig;
use tracing::{debug, info, warn};

use crate::boundary::BoundaryPolicy;
use crate::error::{PhysicsError, PhysicsResult};
use crate::field::{CellField, FaceField};
use crate::flux::{FluxEngine, FluxParams};
use crate::grid::Grid;
use crate::integrator::{forward_euler_update, TimeIntegrator};
use crate::noise::{draw_face_noise, GaussianNoise, NoiseSource};
use crate::output::{FieldSnapshot, SnapshotKind, SnapshotSink};
use crate::statistics::StatisticsEngine;

/// 单步报告
#[derive(Debug, Clone, Copy)]
pub struct StepReport {
    /// 步数
    pub step: usize,
    /// 模拟时间
    pub time: f64,
    /// 本步是否计入统计
    pub sampled: bool,
    /// 内部单元最小高度
    pub min_height: f64,
    /// 本步墙钟耗时
    pub elapsed: Duration,
}

/// 运行汇总
#[derive(Debug, Clone, Copy)]
pub struct RunSummary {
    /// 完成步数
    pub steps: usize,
    /// 统计样本数
    pub samples: usize,
    /// 最终模拟时间
    pub final_time: f64,
    /// 最终总质量 Σ h
    pub total_mass: f64,
    /// 最终最小高度
    pub min_height: f64,
    /// 最终最大高度
    pub max_height: f64,
    /// 总墙钟耗时
    pub elapsed: Duration,
}

/// 随机薄膜求解器
pub struct ThinFilmSolver {
    config: ThinFilmConfig,
    grid: Grid,
    boundary: BoundaryPolicy,
    flux: FluxEngine,
    noise: Box<dyn NoiseSource>,
    noise_faces: [FaceField; 2],
    height: CellField,
    integrator: TimeIntegrator,
    statistics: StatisticsEngine,
    negative_warned: bool,
}

impl ThinFilmSolver {
    /// 从运行配置构建求解器
    ///
    /// 配置与边界组合在此验证，任何错误都在第一步之前返回。
    /// 高度场（含 halo）初始化为 h0。
    pub fn from_config(config: ThinFilmConfig) -> PhysicsResult<Self> {
        config.validate()?;
        let boundary = BoundaryPolicy::from_config(&config)?;
        let grid = Grid::from_config(&config, boundary.periodicity())?;
        let seed = config.run.resolve_seed()?;

        let params = FluxParams::from_config(&config);
        let flux = FluxEngine::new(&grid, params);
        let height = CellField::filled(&grid, 1, config.physics.h0);
        let integrator = TimeIntegrator::new(params.dt, config.run.max_step);
        let statistics = StatisticsEngine::from_config(&config, &grid);

        info!(
            "网格 {}x{}, dx = [{:.4e}, {:.4e}], 周期性 = {:?}",
            grid.nx(),
            grid.ny(),
            grid.dx()[0],
            grid.dx()[1],
            grid.periodicity()
        );
        info!(
            "dt = {:.6e}, t0 = {:.6e}, 噪声常数 = {:.6e}, 迁移率常数 = {:.6e}",
            params.dt,
            config.characteristic_time(),
            params.noise_const,
            params.mobility_const
        );
        info!(
            "算法模式 {}, 分块数 {}, 相关策略 {}, 种子 {}",
            config.algorithm.mode,
            grid.boxes().len(),
            statistics.estimator_name(),
            seed
        );

        Ok(Self {
            noise: Box::new(GaussianNoise::new(seed)),
            noise_faces: FaceField::pair(&grid),
            config,
            grid,
            boundary,
            flux,
            height,
            integrator,
            statistics,
            negative_warned: false,
        })
    }

    /// 替换噪声源
    pub fn with_noise(mut self, noise: Box<dyn NoiseSource>) -> Self {
        self.noise = noise;
        self
    }

    /// 用函数设置内部单元初始高度并刷新 halo
    pub fn set_initial_height<F>(&mut self, f: F)
    where
        F: Fn(usize, usize) -> f64 + Sync,
    {
        self.height.par_map_interior(f);
        self.height.fill_boundary(self.grid.periodicity());
    }

    /// 推进一步
    ///
    /// 到达最大步数后返回 [`crate::PhysicsError::Finished`]。
    pub fn step(&mut self) -> PhysicsResult<StepReport> {
        let start = Instant::now();
        let periodic = self.grid.periodicity();

        if self.integrator.is_finished() {
            return Err(PhysicsError::Finished {
                max_step: self.integrator.max_step(),
            });
        }

        draw_face_noise(
            self.noise.as_mut(),
            &mut self.noise_faces,
            self.config.physics.variance_coef,
            periodic,
        );
        self.flux
            .compute(&self.height, &self.noise_faces, &self.grid, &self.boundary);
        forward_euler_update(
            &mut self.height,
            self.flux.fluxes(),
            self.grid.dx(),
            self.integrator.dt(),
        );
        self.height.fill_boundary(periodic);

        let step = self.integrator.advance()?;
        let sampled = self.statistics.update(step, &self.height, &self.grid);

        let (min_height, _) = self.height.min_max_interior();
        if !self.negative_warned && (min_height < 0.0 || !self.height.all_finite()) {
            warn!(
                "步 {}: 高度场离开非负范围 (min = {:.6e})，迁移率项 h³ 可能失去物理意义",
                step, min_height
            );
            self.negative_warned = true;
        }

        let elapsed = start.elapsed();
        debug!("步 {} 完成，耗时 {:.6} 秒", step, elapsed.as_secs_f64());

        Ok(StepReport {
            step,
            time: self.integrator.time(),
            sampled,
            min_height,
            elapsed,
        })
    }

    /// 运行到最大步数
    ///
    /// `plot_int > 0` 时在第 0 步写出高度快照，此后每 `plot_int` 步写出高度，
    /// 统计已开始时同时写出方差与相关。
    pub fn run(&mut self, sink: &mut dyn SnapshotSink) -> PhysicsResult<RunSummary> {
        let start = Instant::now();
        let plot_int = self.config.run.plot_int;

        if plot_int > 0 && self.integrator.step() == 0 {
            sink.write(&self.snapshot(SnapshotKind::Height))?;
        }

        while !self.integrator.is_finished() {
            let report = self.step()?;
            if plot_int > 0 && report.step % plot_int == 0 {
                sink.write(&self.snapshot(SnapshotKind::Height))?;
                if self.statistics.is_active() {
                    sink.write(&self.snapshot(SnapshotKind::Variance))?;
                    sink.write(&self.snapshot(SnapshotKind::Correlation))?;
                }
            }
        }

        let elapsed = start.elapsed();
        debug!("运行结束: {} 步, 耗时 {:.6} s", self.integrator.step(), elapsed.as_secs_f64());

        let (min_height, max_height) = self.height.min_max_interior();
        Ok(RunSummary {
            steps: self.integrator.step(),
            samples: self.statistics.sample_count(),
            final_time: self.integrator.time(),
            total_mass: self.total_mass(),
            min_height,
            max_height,
            elapsed,
        })
    }

    /// 生成当前状态的快照
    pub fn snapshot(&self, kind: SnapshotKind) -> FieldSnapshot {
        let dx = self.grid.dx();
        let full = [self.grid.nx(), self.grid.ny()];
        let (shape, spacing, values) = match kind {
            SnapshotKind::Height => (full, dx, self.height.interior_values()),
            SnapshotKind::Variance => (
                full,
                dx,
                self.statistics.variance_average().interior_values(),
            ),
            SnapshotKind::Correlation => match self.statistics.correlation_line() {
                Some(line) => {
                    let axis = self.statistics.mode().probed_axis().unwrap_or(0);
                    ([line.len(), 1], [dx[axis], dx[1 - axis]], line)
                }
                None => (
                    full,
                    dx,
                    self.statistics.correlation_average().interior_values(),
                ),
            },
        };
        FieldSnapshot {
            kind,
            step: self.integrator.step(),
            time: self.integrator.time(),
            shape,
            spacing,
            values,
        }
    }

    /// 运行配置
    #[inline]
    pub fn config(&self) -> &ThinFilmConfig {
        &self.config
    }

    /// 网格
    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// 边界策略
    #[inline]
    pub fn boundary(&self) -> &BoundaryPolicy {
        &self.boundary
    }

    /// 通量引擎（最近一步的派生场）
    #[inline]
    pub fn flux_engine(&self) -> &FluxEngine {
        &self.flux
    }

    /// 高度场
    #[inline]
    pub fn height(&self) -> &CellField {
        &self.height
    }

    /// 统计引擎
    #[inline]
    pub fn statistics(&self) -> &StatisticsEngine {
        &self.statistics
    }

    /// 时间步长
    #[inline]
    pub fn dt(&self) -> f64 {
        self.integrator.dt()
    }

    /// 模拟时间
    #[inline]
    pub fn time(&self) -> f64 {
        self.integrator.time()
    }

    /// 已完成步数
    #[inline]
    pub fn step_count(&self) -> usize {
        self.integrator.step()
    }

    /// 是否已结束
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.integrator.is_finished()
    }

    /// 总质量 Σ h
    pub fn total_mass(&self) -> f64 {
        self.height.sum_interior()
    }

    /// 噪声源名称
    #[inline]
    pub fn noise_name(&self) -> &'static str {
        self.noise.name()
    }
}
