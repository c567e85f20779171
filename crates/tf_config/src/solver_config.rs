// crates/tf_config/src/solver_config.rs

//! ThinFilmConfig - 运行配置
//!
//! 一次运行所需的全部参数：网格、边界代码、物理常数、算法模式、
//! 步进控制和输出。所有字段都有默认值，可从 JSON 文件部分覆盖。
//! 派生常数（特征时间、噪声常数、迁移率常数、时间步长）以方法提供，
//! 不在配置中重复存储。

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::algorithm::{AlgorithmMode, MobilityPolicy};
use crate::error::ConfigError;

/// 边界代码：周期
pub const BC_PERIODIC: i32 = -1;
/// 边界代码：无通量（90° 接触角，dh/dn = 0）
pub const BC_NO_FLUX: i32 = 0;
/// 边界代码：钉扎（h = 目标高度）
pub const BC_PINNED: i32 = 1;

/// 运行配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ThinFilmConfig {
    /// 计算域
    #[serde(default)]
    pub domain: DomainConfig,

    /// 边界条件
    #[serde(default)]
    pub boundary: BoundaryConfig,

    /// 物理参数
    #[serde(default)]
    pub physics: PhysicsConfig,

    /// 算法模式与统计探针
    #[serde(default)]
    pub algorithm: AlgorithmConfig,

    /// 步进控制
    #[serde(default)]
    pub run: RunConfig,

    /// 输出配置
    #[serde(default)]
    pub output: OutputConfig,
}

/// 计算域配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainConfig {
    /// 空间维数（仅支持 2）
    #[serde(default = "default_dimension")]
    pub dimension: usize,

    /// 各方向单元数
    #[serde(default = "default_n_cells")]
    pub n_cells: [usize; 2],

    /// 物理域下界
    #[serde(default = "default_prob_lo")]
    pub prob_lo: [f64; 2],

    /// 物理域上界
    #[serde(default = "default_prob_hi")]
    pub prob_hi: [f64; 2],

    /// 主分解的最大分块尺寸
    #[serde(default = "default_max_grid_size")]
    pub max_grid_size: [usize; 2],
}

fn default_dimension() -> usize { 2 }
fn default_n_cells() -> [usize; 2] { [64, 64] }
fn default_prob_lo() -> [f64; 2] { [0.0, 0.0] }
fn default_prob_hi() -> [f64; 2] { [1.0, 1.0] }
fn default_max_grid_size() -> [usize; 2] { [32, 32] }

impl Default for DomainConfig {
    fn default() -> Self {
        Self {
            dimension: default_dimension(),
            n_cells: default_n_cells(),
            prob_lo: default_prob_lo(),
            prob_hi: default_prob_hi(),
            max_grid_size: default_max_grid_size(),
        }
    }
}

impl DomainConfig {
    /// 网格间距 [dx, dy]
    pub fn cell_size(&self) -> [f64; 2] {
        [
            (self.prob_hi[0] - self.prob_lo[0]) / self.n_cells[0] as f64,
            (self.prob_hi[1] - self.prob_lo[1]) / self.n_cells[1] as f64,
        ]
    }
}

/// 边界条件配置
///
/// 每个轴每一侧一个代码：`-1` 周期、`0` 无通量、`1` 钉扎。
/// 周期与非周期的混用在构造边界策略时报错。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundaryConfig {
    /// 低侧代码 [x, y]
    #[serde(default = "default_bc")]
    pub lo: [i32; 2],

    /// 高侧代码 [x, y]
    #[serde(default = "default_bc")]
    pub hi: [i32; 2],

    /// 钉扎目标高度，缺省时使用 h0
    #[serde(default)]
    pub pinned_height: Option<f64>,
}

fn default_bc() -> [i32; 2] { [BC_PERIODIC, BC_PERIODIC] }

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            lo: default_bc(),
            hi: default_bc(),
            pinned_height: None,
        }
    }
}

/// 物理参数配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsConfig {
    /// 名义平膜高度 h0
    #[serde(default = "default_h0")]
    pub h0: f64,

    /// 粘度
    #[serde(default = "default_viscosity")]
    pub viscosity: f64,

    /// 表面张力
    #[serde(default = "default_surface_tension")]
    pub surface_tension: f64,

    /// 温度
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Boltzmann 常数（cgs）
    #[serde(default = "default_k_b")]
    pub k_b: f64,

    /// 噪声方差系数
    #[serde(default = "default_variance_coef")]
    pub variance_coef: f64,

    /// 迁移率 h³ 处理策略
    #[serde(default)]
    pub mobility: MobilityPolicy,
}

fn default_h0() -> f64 { 1.0 }
fn default_viscosity() -> f64 { 1.0 }
fn default_surface_tension() -> f64 { 3.0 }
fn default_temperature() -> f64 { 300.0 }
fn default_k_b() -> f64 { 1.38064852e-16 }
fn default_variance_coef() -> f64 { 1.0 }

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            h0: default_h0(),
            viscosity: default_viscosity(),
            surface_tension: default_surface_tension(),
            temperature: default_temperature(),
            k_b: default_k_b(),
            variance_coef: default_variance_coef(),
            mobility: MobilityPolicy::default(),
        }
    }
}

/// 算法配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AlgorithmConfig {
    /// 算法模式（0 = 1D-x, 1 = 1D-y, 2 = 2D）
    #[serde(default)]
    pub mode: AlgorithmMode,

    /// 相关统计探针单元 (icorr, jcorr)
    #[serde(default)]
    pub probe: [usize; 2],
}

/// 步进控制配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// 最大步数
    #[serde(default = "default_max_step")]
    pub max_step: usize,

    /// 预热步数，此前的统计被丢弃
    #[serde(default)]
    pub n_steps_skip: usize,

    /// 快照间隔（步），0 表示不输出
    #[serde(default)]
    pub plot_int: usize,

    /// 随机种子：>0 直接使用，0 使用时钟，<0 非法
    #[serde(default = "default_seed")]
    pub seed: i64,

    /// 稳定性时间步系数
    #[serde(default = "default_dt_fraction")]
    pub dt_fraction: f64,
}

fn default_max_step() -> usize { 1000 }
fn default_seed() -> i64 { 1 }
fn default_dt_fraction() -> f64 { 0.1 }

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_step: default_max_step(),
            n_steps_skip: 0,
            plot_int: 0,
            seed: default_seed(),
            dt_fraction: default_dt_fraction(),
        }
    }
}

impl RunConfig {
    /// 解析随机种子
    ///
    /// 种子为 0 时取当前时钟的纳秒计数。
    pub fn resolve_seed(&self) -> Result<u64, ConfigError> {
        match self.seed {
            s if s > 0 => Ok(s as u64),
            0 => {
                let now = chrono::Utc::now();
                Ok(now.timestamp_nanos_opt().unwrap_or_else(|| now.timestamp()) as u64)
            }
            s => Err(ConfigError::invalid("run.seed", s, "种子不能为负")),
        }
    }
}

/// 输出配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// 是否写出快照
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// 输出目录
    #[serde(default = "default_output_dir")]
    pub directory: PathBuf,

    /// 输出格式
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_enabled() -> bool { true }
fn default_output_dir() -> PathBuf { PathBuf::from("output") }

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            directory: default_output_dir(),
            format: OutputFormat::default(),
        }
    }
}

/// 输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON 格式
    #[default]
    Json,
    /// CSV 格式
    Csv,
}

impl OutputFormat {
    /// 文件扩展名
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

// ============================================================
// 派生常数
// ============================================================

impl ThinFilmConfig {
    /// 特征时间 t0 = 3·μ·h0/γ
    pub fn characteristic_time(&self) -> f64 {
        3.0 * self.physics.viscosity * self.physics.h0 / self.physics.surface_tension
    }

    /// 噪声常数 2·k_B·T/(3·μ)
    pub fn noise_const(&self) -> f64 {
        2.0 * self.physics.k_b * self.physics.temperature / (3.0 * self.physics.viscosity)
    }

    /// 毛细迁移率常数 γ/(3·μ)
    pub fn mobility_const(&self) -> f64 {
        self.physics.surface_tension / (3.0 * self.physics.viscosity)
    }

    /// 固定时间步长
    ///
    /// dt = dt_fraction · (t0/h0⁴) · dx⁴/16，整个运行期间不变。
    pub fn time_step(&self) -> f64 {
        let dx = self.domain.cell_size()[0];
        let h0 = self.physics.h0;
        self.run.dt_fraction * (self.characteristic_time() / h0.powi(4)) * dx.powi(4) / 16.0
    }

    /// 单元体积 dx·dy
    pub fn cell_volume(&self) -> f64 {
        let dx = self.domain.cell_size();
        dx[0] * dx[1]
    }

    /// 降维标志 [x_flux_fac, y_flux_fac]
    pub fn flux_factors(&self) -> [f64; 2] {
        self.algorithm.mode.flux_factors()
    }

    /// 钉扎目标高度
    pub fn pinned_height(&self) -> f64 {
        self.boundary.pinned_height.unwrap_or(self.physics.h0)
    }

    /// 从文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;

        let config: ThinFilmConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        std::fs::write(path, content).map_err(ConfigError::Io)?;
        Ok(())
    }

    /// 验证配置有效性
    ///
    /// 周期边界的成对性由边界策略检查，这里只检查代码取值。
    pub fn validate(&self) -> Result<(), ConfigError> {
        let domain = &self.domain;
        if domain.dimension != 2 {
            return Err(ConfigError::invalid(
                "domain.dimension",
                domain.dimension,
                "仅支持二维",
            ));
        }

        for d in 0..2 {
            if domain.n_cells[d] == 0 {
                return Err(ConfigError::invalid(
                    "domain.n_cells",
                    format!("{:?}", domain.n_cells),
                    "单元数必须为正",
                ));
            }
            if domain.max_grid_size[d] == 0 {
                return Err(ConfigError::invalid(
                    "domain.max_grid_size",
                    format!("{:?}", domain.max_grid_size),
                    "分块尺寸必须为正",
                ));
            }
            if !(domain.prob_hi[d] > domain.prob_lo[d]) {
                return Err(ConfigError::invalid(
                    "domain.prob_hi",
                    format!("{:?}", domain.prob_hi),
                    "上界必须大于下界",
                ));
            }
            if self.algorithm.probe[d] >= domain.n_cells[d] {
                return Err(ConfigError::invalid(
                    "algorithm.probe",
                    format!("{:?}", self.algorithm.probe),
                    "探针单元超出计算域",
                ));
            }
        }

        for code in self.boundary.lo.iter().chain(self.boundary.hi.iter()) {
            if !matches!(*code, BC_PERIODIC | BC_NO_FLUX | BC_PINNED) {
                return Err(ConfigError::invalid(
                    "boundary",
                    code,
                    "边界代码必须为 -1（周期）、0（无通量）或 1（钉扎）",
                ));
            }
        }

        let physics = &self.physics;
        let positive = [
            ("physics.h0", physics.h0),
            ("physics.viscosity", physics.viscosity),
            ("physics.surface_tension", physics.surface_tension),
            ("run.dt_fraction", self.run.dt_fraction),
        ];
        for (key, value) in positive {
            if !(value > 0.0) || !value.is_finite() {
                return Err(ConfigError::invalid(key, value, "必须为正"));
            }
        }

        let non_negative = [
            ("physics.temperature", physics.temperature),
            ("physics.k_b", physics.k_b),
            ("physics.variance_coef", physics.variance_coef),
        ];
        for (key, value) in non_negative {
            if !(value >= 0.0) || !value.is_finite() {
                return Err(ConfigError::invalid(key, value, "不能为负"));
            }
        }

        if let Some(target) = self.boundary.pinned_height {
            if !target.is_finite() {
                return Err(ConfigError::invalid("boundary.pinned_height", target, "必须为有限值"));
            }
        }

        if self.run.seed < 0 {
            return Err(ConfigError::invalid("run.seed", self.run.seed, "种子不能为负"));
        }

        Ok(())
    }
}
