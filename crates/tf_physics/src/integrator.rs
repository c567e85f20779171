// crates/tf_physics/src/integrator.rs

//! 显式前向欧拉时间积分
//!
//! ## 更新公式
//!
//! ```text
//! h^{n+1} = h^n - Δt · Σ_d (F_d[hi] - F_d[lo]) / Δx_d
//! ```
//!
//! 每个面通量被相邻两个单元以相反符号计数，因此在全周期域上
//! Σ h 在浮点舍入范围内守恒。
//!
//! ## 步长
//!
//! Δt 在初始化时由稳定性界一次性给出，运行期间不变：
//!
//! ```text
//! Δt = α · (t0 / h0⁴) · Δx⁴ / 16,   t0 = 3·μ·h0/γ
//! ```
//!
//! ## 状态机
//!
//! `Running` → `Running`（每步）→ `Finished`（步数到达上限）。

use crate::error::{PhysicsError, PhysicsResult};
use crate::field::{CellField, FaceField};

/// 对内部单元执行一次前向欧拉更新
///
/// 只写内部单元，调用方负责随后刷新 halo。
pub fn forward_euler_update(h: &mut CellField, flux: &[FaceField; 2], dx: [f64; 2], dt: f64) {
    let [fx, fy] = flux;
    h.par_update_interior(|i, j, v| {
        let div = (fx.get(i + 1, j) - fx.get(i, j)) / dx[0]
            + (fy.get(i, j + 1) - fy.get(i, j)) / dx[1];
        v - dt * div
    });
}

/// 积分器状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverState {
    /// 运行中
    Running,
    /// 已到达最大步数
    Finished,
}

/// 步进时钟
///
/// 记录步数与模拟时间，并在到达最大步数时进入终止状态。
#[derive(Debug, Clone)]
pub struct TimeIntegrator {
    dt: f64,
    max_step: usize,
    step: usize,
    time: f64,
    state: SolverState,
}

impl TimeIntegrator {
    /// 创建时钟
    pub fn new(dt: f64, max_step: usize) -> Self {
        let state = if max_step == 0 {
            SolverState::Finished
        } else {
            SolverState::Running
        };
        Self {
            dt,
            max_step,
            step: 0,
            time: 0.0,
            state,
        }
    }

    /// 推进一步，返回新的步数
    pub fn advance(&mut self) -> PhysicsResult<usize> {
        if self.state == SolverState::Finished {
            return Err(PhysicsError::Finished {
                max_step: self.max_step,
            });
        }
        self.step += 1;
        self.time += self.dt;
        if self.step >= self.max_step {
            self.state = SolverState::Finished;
        }
        Ok(self.step)
    }

    /// 时间步长
    #[inline]
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// 已完成步数
    #[inline]
    pub fn step(&self) -> usize {
        self.step
    }

    /// 最大步数
    #[inline]
    pub fn max_step(&self) -> usize {
        self.max_step
    }

    /// 模拟时间
    #[inline]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// 是否已结束
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.state == SolverState::Finished
    }
}
