// crates/tf_physics/src/grid.rs

//! 网格描述与区域分解
//!
//! `Grid` 在启动时由配置构造一次，此后不可变：单元数、间距、各轴周期性，
//! 以及主分解（把计算域切成不超过 `max_grid_size` 的分块）。
//!
//! 分块只用于需要"跨分区"语义的操作（探针归约）；
//! 场数据本身按行并行存取，见 [`crate::field`]。

use tf_config::ThinFilmConfig;
use tf_foundation::{TfError, TfResult};

// ============================================================
// 分块
// ============================================================

/// 计算域中的一个矩形分块，半开区间 `[lo, hi)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileBox {
    /// 下角单元索引（含）
    pub lo: [usize; 2],
    /// 上角单元索引（不含）
    pub hi: [usize; 2],
}

impl TileBox {
    /// 创建分块
    pub fn new(lo: [usize; 2], hi: [usize; 2]) -> Self {
        Self { lo, hi }
    }

    /// 单元 (i, j) 是否属于本分块
    #[inline]
    pub fn contains(&self, i: usize, j: usize) -> bool {
        i >= self.lo[0] && i < self.hi[0] && j >= self.lo[1] && j < self.hi[1]
    }

    /// 分块单元数
    #[inline]
    pub fn num_cells(&self) -> usize {
        (self.hi[0] - self.lo[0]) * (self.hi[1] - self.lo[1])
    }
}

/// 分块列表
#[derive(Debug, Clone, Default)]
pub struct BoxArray {
    boxes: Vec<TileBox>,
}

impl BoxArray {
    /// 把 `n_cells` 的计算域切成每轴不超过 `max_size` 的分块
    ///
    /// 每个轴上尽量均分，块数为 ceil(n / max)。
    pub fn chop(n_cells: [usize; 2], max_size: [usize; 2]) -> Self {
        let splits: Vec<Vec<(usize, usize)>> = (0..2)
            .map(|d| split_axis(n_cells[d], max_size[d].max(1)))
            .collect();

        let mut boxes = Vec::with_capacity(splits[0].len() * splits[1].len());
        for &(jlo, jhi) in &splits[1] {
            for &(ilo, ihi) in &splits[0] {
                boxes.push(TileBox::new([ilo, jlo], [ihi, jhi]));
            }
        }
        Self { boxes }
    }

    /// 分块数
    #[inline]
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    /// 是否为空
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// 全部分块
    #[inline]
    pub fn boxes(&self) -> &[TileBox] {
        &self.boxes
    }
}

fn split_axis(n: usize, max: usize) -> Vec<(usize, usize)> {
    let chunks = n.div_ceil(max);
    let base = n / chunks;
    let extra = n % chunks;
    let mut out = Vec::with_capacity(chunks);
    let mut start = 0;
    for c in 0..chunks {
        let len = base + usize::from(c < extra);
        out.push((start, start + len));
        start += len;
    }
    out
}

// ============================================================
// 网格
// ============================================================

/// 二维规则网格
#[derive(Debug, Clone)]
pub struct Grid {
    n_cells: [usize; 2],
    prob_lo: [f64; 2],
    prob_hi: [f64; 2],
    dx: [f64; 2],
    periodic: [bool; 2],
    boxes: BoxArray,
}

impl Grid {
    /// 创建网格
    pub fn new(
        n_cells: [usize; 2],
        prob_lo: [f64; 2],
        prob_hi: [f64; 2],
        periodic: [bool; 2],
        max_grid_size: [usize; 2],
    ) -> TfResult<Self> {
        let mut dx = [0.0; 2];
        for d in 0..2 {
            if n_cells[d] == 0 {
                return Err(TfError::invalid_input(format!("轴 {} 单元数为零", d)));
            }
            dx[d] = (prob_hi[d] - prob_lo[d]) / n_cells[d] as f64;
            if !(dx[d] > 0.0) || !dx[d].is_finite() {
                return Err(TfError::invalid_input(format!(
                    "轴 {} 网格间距无效: {}",
                    d, dx[d]
                )));
            }
        }

        Ok(Self {
            n_cells,
            prob_lo,
            prob_hi,
            dx,
            periodic,
            boxes: BoxArray::chop(n_cells, max_grid_size),
        })
    }

    /// 从配置创建网格，周期性由边界策略给出
    pub fn from_config(config: &ThinFilmConfig, periodic: [bool; 2]) -> TfResult<Self> {
        let domain = &config.domain;
        Self::new(
            domain.n_cells,
            domain.prob_lo,
            domain.prob_hi,
            periodic,
            domain.max_grid_size,
        )
    }

    /// x 方向单元数
    #[inline]
    pub fn nx(&self) -> usize {
        self.n_cells[0]
    }

    /// y 方向单元数
    #[inline]
    pub fn ny(&self) -> usize {
        self.n_cells[1]
    }

    /// 各方向单元数
    #[inline]
    pub fn n_cells(&self) -> [usize; 2] {
        self.n_cells
    }

    /// 单元总数
    #[inline]
    pub fn n_total(&self) -> usize {
        self.n_cells[0] * self.n_cells[1]
    }

    /// 网格间距 [dx, dy]
    #[inline]
    pub fn dx(&self) -> [f64; 2] {
        self.dx
    }

    /// 单元体积
    #[inline]
    pub fn cell_volume(&self) -> f64 {
        self.dx[0] * self.dx[1]
    }

    /// 物理域下界
    #[inline]
    pub fn prob_lo(&self) -> [f64; 2] {
        self.prob_lo
    }

    /// 物理域上界
    #[inline]
    pub fn prob_hi(&self) -> [f64; 2] {
        self.prob_hi
    }

    /// 轴 d 是否周期
    #[inline]
    pub fn is_periodic(&self, d: usize) -> bool {
        self.periodic[d]
    }

    /// 各轴周期性
    #[inline]
    pub fn periodicity(&self) -> [bool; 2] {
        self.periodic
    }

    /// 主分解
    #[inline]
    pub fn boxes(&self) -> &BoxArray {
        &self.boxes
    }
}
