// crates/tf_config/src/algorithm.rs

//! 算法模式选择
//!
//! `AlgorithmMode` 决定降维标志（x/y 通量因子）和统计相关模式：
//!
//! | 代码 | 模式 | 通量因子 [x, y] | 相关统计 |
//! |------|------|-----------------|----------|
//! | 0 | 1D-x（每行独立试验） | [1, 0] | 沿 x 的笔形分解 |
//! | 1 | 1D-y（每列独立试验） | [0, 1] | 沿 y 的笔形分解 |
//! | 2 | 全 2D | [1, 1] | 探针全局归约 |
//!
//! 配置文件中以整数代码序列化，与外部输入约定一致。

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// 算法模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "i32", into = "i32")]
pub enum AlgorithmMode {
    /// 1D-x：每一行是独立的一维试验，y 方向通量置零
    OneDAlongX,
    /// 1D-y：每一列是独立的一维试验，x 方向通量置零
    OneDAlongY,
    /// 全 2D
    #[default]
    TwoD,
}

impl AlgorithmMode {
    /// 从整数代码转换
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::OneDAlongX),
            1 => Some(Self::OneDAlongY),
            2 => Some(Self::TwoD),
            _ => None,
        }
    }

    /// 整数代码
    #[inline]
    pub fn code(self) -> i32 {
        match self {
            Self::OneDAlongX => 0,
            Self::OneDAlongY => 1,
            Self::TwoD => 2,
        }
    }

    /// 降维标志 [x_flux_fac, y_flux_fac]
    ///
    /// 非活动轴的因子为 0，该轴的拉普拉斯贡献和通量被整体清零。
    #[inline]
    pub fn flux_factors(self) -> [f64; 2] {
        match self {
            Self::OneDAlongX => [1.0, 0.0],
            Self::OneDAlongY => [0.0, 1.0],
            Self::TwoD => [1.0, 1.0],
        }
    }

    /// 1D 模式下被探测的轴；2D 模式返回 `None`
    #[inline]
    pub fn probed_axis(self) -> Option<usize> {
        match self {
            Self::OneDAlongX => Some(0),
            Self::OneDAlongY => Some(1),
            Self::TwoD => None,
        }
    }

    /// 模式名称
    pub fn name(self) -> &'static str {
        match self {
            Self::OneDAlongX => "1d-x",
            Self::OneDAlongY => "1d-y",
            Self::TwoD => "2d",
        }
    }
}

impl std::fmt::Display for AlgorithmMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl TryFrom<i32> for AlgorithmMode {
    type Error = String;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or_else(|| format!("无效的算法模式代码: {} (期望 0, 1 或 2)", code))
    }
}

impl From<AlgorithmMode> for i32 {
    fn from(mode: AlgorithmMode) -> Self {
        mode.code()
    }
}

impl FromStr for AlgorithmMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "0" | "1d-x" | "x" => Ok(Self::OneDAlongX),
            "1" | "1d-y" | "y" => Ok(Self::OneDAlongY),
            "2" | "2d" => Ok(Self::TwoD),
            _ => Err(format!("无效的算法模式: '{}', 期望 '1d-x', '1d-y' 或 '2d'", s)),
        }
    }
}

/// 迁移率项 h³ 的处理策略
///
/// 薄膜接近去湿前沿时面高度可能为负。默认不做截断，
/// 与历史运行结果保持一致；`ClampNonNegative` 在取立方前将面高度截断到 0。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MobilityPolicy {
    /// 不截断
    #[default]
    Unclamped,
    /// 面高度截断到非负
    ClampNonNegative,
}

impl MobilityPolicy {
    /// 按策略处理面高度
    #[inline]
    pub fn apply(self, hface: f64) -> f64 {
        match self {
            Self::Unclamped => hface,
            Self::ClampNonNegative => hface.max(0.0),
        }
    }
}
