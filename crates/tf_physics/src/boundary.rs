// crates/tf_physics/src/boundary.rs

//! 边界条件策略
//!
//! 每个轴每一侧一个边界类型：
//!
//! | 代码 | 类型 | 边界面梯度 | 边界面通量 |
//! |------|------|------------|------------|
//! | -1 | 周期 | 不覆盖 | 不覆盖 |
//! | 0 | 无通量 | 0 | 0 |
//! | 1 | 钉扎 | 向目标高度的半单元单侧差分 | 0 |
//!
//! 钉扎边界保留驱动曲率的梯度，但阻断穿过壁面的净质量输运
//! （接触线钉扎语义，而不是源/汇）。
//!
//! 周期必须在同一轴两侧同时设置，否则在启动时报错。

use serde::{Deserialize, Serialize};
use tf_config::ThinFilmConfig;
use thiserror::Error;

use crate::field::{CellField, FaceField};
use crate::grid::Grid;

// ============================================================
// 错误
// ============================================================

/// 边界配置错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoundaryError {
    /// 未知的边界代码
    #[error("轴 {axis} {side} 侧边界代码无效: {code}")]
    InvalidCode {
        /// 轴
        axis: usize,
        /// 侧
        side: Side,
        /// 代码
        code: i32,
    },

    /// 同一轴上周期与非周期混用
    #[error("轴 {axis} 同时指定了周期与非周期边界 (lo={lo}, hi={hi})")]
    MixedPeriodicity {
        /// 轴
        axis: usize,
        /// 低侧代码
        lo: i32,
        /// 高侧代码
        hi: i32,
    },
}

// ============================================================
// 边界类型
// ============================================================

/// 边界类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryKind {
    /// 周期
    Periodic,
    /// 无通量（90° 接触角，dh/dn = 0）
    NoFlux,
    /// 钉扎（h = 目标高度）
    Pinned,
}

impl BoundaryKind {
    /// 从整数代码转换
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            -1 => Some(Self::Periodic),
            0 => Some(Self::NoFlux),
            1 => Some(Self::Pinned),
            _ => None,
        }
    }

    /// 整数代码
    #[inline]
    pub fn code(self) -> i32 {
        match self {
            Self::Periodic => -1,
            Self::NoFlux => 0,
            Self::Pinned => 1,
        }
    }

    /// 是否为壁面（阻断通量）
    #[inline]
    pub fn is_wall(self) -> bool {
        matches!(self, Self::NoFlux | Self::Pinned)
    }
}

impl std::fmt::Display for BoundaryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Periodic => "Periodic",
            Self::NoFlux => "NoFlux",
            Self::Pinned => "Pinned",
        };
        write!(f, "{}", name)
    }
}

/// 轴的一侧
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// 低侧
    Lo,
    /// 高侧
    Hi,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lo => write!(f, "lo"),
            Self::Hi => write!(f, "hi"),
        }
    }
}

/// 单个轴的边界对
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisBoundary {
    /// 低侧
    pub lo: BoundaryKind,
    /// 高侧
    pub hi: BoundaryKind,
}

impl AxisBoundary {
    /// 创建边界对
    pub const fn new(lo: BoundaryKind, hi: BoundaryKind) -> Self {
        Self { lo, hi }
    }

    /// 双侧周期
    pub const fn periodic() -> Self {
        Self::new(BoundaryKind::Periodic, BoundaryKind::Periodic)
    }

    /// 指定侧的类型
    #[inline]
    pub fn side(&self, side: Side) -> BoundaryKind {
        match side {
            Side::Lo => self.lo,
            Side::Hi => self.hi,
        }
    }

    /// 是否周期
    #[inline]
    pub fn is_periodic(&self) -> bool {
        self.lo == BoundaryKind::Periodic
    }
}

// ============================================================
// 边界策略
// ============================================================

/// 边界策略
///
/// 验证运行级边界配置，并为通量引擎提供两条覆盖规则：
/// 边界面梯度覆盖（规则 a）与边界面通量清零（规则 b）。
#[derive(Debug, Clone)]
pub struct BoundaryPolicy {
    axes: [AxisBoundary; 2],
    pinned_height: f64,
}

impl BoundaryPolicy {
    /// 创建并验证边界策略
    pub fn new(axes: [AxisBoundary; 2], pinned_height: f64) -> Result<Self, BoundaryError> {
        for (axis, b) in axes.iter().enumerate() {
            let lo_periodic = b.lo == BoundaryKind::Periodic;
            let hi_periodic = b.hi == BoundaryKind::Periodic;
            if lo_periodic != hi_periodic {
                return Err(BoundaryError::MixedPeriodicity {
                    axis,
                    lo: b.lo.code(),
                    hi: b.hi.code(),
                });
            }
        }
        Ok(Self {
            axes,
            pinned_height,
        })
    }

    /// 从整数代码创建
    pub fn from_codes(
        lo: [i32; 2],
        hi: [i32; 2],
        pinned_height: f64,
    ) -> Result<Self, BoundaryError> {
        let kind = |axis: usize, side: Side, code: i32| {
            BoundaryKind::from_code(code).ok_or(BoundaryError::InvalidCode { axis, side, code })
        };
        let axes = [
            AxisBoundary::new(kind(0, Side::Lo, lo[0])?, kind(0, Side::Hi, hi[0])?),
            AxisBoundary::new(kind(1, Side::Lo, lo[1])?, kind(1, Side::Hi, hi[1])?),
        ];
        Self::new(axes, pinned_height)
    }

    /// 从运行配置创建
    pub fn from_config(config: &ThinFilmConfig) -> Result<Self, BoundaryError> {
        Self::from_codes(
            config.boundary.lo,
            config.boundary.hi,
            config.pinned_height(),
        )
    }

    /// 全周期边界
    pub fn fully_periodic() -> Self {
        Self {
            axes: [AxisBoundary::periodic(), AxisBoundary::periodic()],
            pinned_height: 0.0,
        }
    }

    /// 各轴周期性
    pub fn periodicity(&self) -> [bool; 2] {
        [self.axes[0].is_periodic(), self.axes[1].is_periodic()]
    }

    /// 轴的边界对
    #[inline]
    pub fn axis(&self, axis: usize) -> AxisBoundary {
        self.axes[axis]
    }

    /// 指定轴指定侧的类型
    #[inline]
    pub fn kind(&self, axis: usize, side: Side) -> BoundaryKind {
        self.axes[axis].side(side)
    }

    /// 钉扎目标高度
    #[inline]
    pub fn pinned_height(&self) -> f64 {
        self.pinned_height
    }

    /// 规则 (a)：边界面梯度覆盖值
    ///
    /// `h_inside` 为紧邻该面的内部单元高度，`spacing` 为该轴网格间距。
    /// 周期边界返回 `None`（不覆盖）。
    #[inline]
    pub fn gradient_override(
        &self,
        axis: usize,
        side: Side,
        h_inside: f64,
        spacing: f64,
    ) -> Option<f64> {
        match self.kind(axis, side) {
            BoundaryKind::Periodic => None,
            BoundaryKind::NoFlux => Some(0.0),
            BoundaryKind::Pinned => {
                let half = 0.5 * spacing;
                Some(match side {
                    Side::Lo => (h_inside - self.pinned_height) / half,
                    Side::Hi => (self.pinned_height - h_inside) / half,
                })
            }
        }
    }

    /// 规则 (b)：边界面通量是否清零
    #[inline]
    pub fn blocks_flux(&self, axis: usize, side: Side) -> bool {
        self.kind(axis, side).is_wall()
    }

    /// 在面梯度场上应用规则 (a)
    pub fn apply_gradient_overrides(
        &self,
        gradh: &mut FaceField,
        h: &CellField,
        grid: &Grid,
    ) {
        let axis = gradh.axis();
        let n = grid.n_cells();
        let spacing = grid.dx()[axis];
        let across = n[1 - axis];

        for side in [Side::Lo, Side::Hi] {
            for t in 0..across {
                let (face, cell) = edge_face_and_cell(axis, side, t, n);
                if let Some(g) = self.gradient_override(axis, side, h.get(cell.0, cell.1), spacing) {
                    gradh.set(face.0, face.1, g);
                }
            }
        }
    }

    /// 在通量场上应用规则 (b)
    pub fn apply_flux_overrides(&self, flux: &mut FaceField, grid: &Grid) {
        let axis = flux.axis();
        let n = grid.n_cells();
        let across = n[1 - axis];

        for side in [Side::Lo, Side::Hi] {
            if !self.blocks_flux(axis, side) {
                continue;
            }
            for t in 0..across {
                let (face, _) = edge_face_and_cell(axis, side, t, n);
                flux.set(face.0, face.1, 0.0);
            }
        }
    }
}

/// 边界面索引及其紧邻的内部单元索引
///
/// `t` 为沿边界方向的位置。
#[inline]
fn edge_face_and_cell(
    axis: usize,
    side: Side,
    t: usize,
    n: [usize; 2],
) -> ((usize, usize), (usize, usize)) {
    let (normal_face, normal_cell) = match side {
        Side::Lo => (0, 0),
        Side::Hi => (n[axis], n[axis] - 1),
    };
    if axis == 0 {
        ((normal_face, t), (normal_cell, t))
    } else {
        ((t, normal_face), (t, normal_cell))
    }
}
