// crates/tf_physics/src/statistics/pencil.rs

//! 1D 相关：笔形重分区
//!
//! 1D 模式下每一行（列）是独立试验，相关只在行（列）内部计算。
//! 将高度场复制到一个"笔形"分区：每个笔形覆盖整个探测轴，
//! 探针单元与同一行（列）上的所有目标单元因此位于同一分区，无需归约。
//!
//! ```text
//! 主分解 (分块)            笔形分区 (1D-x)
//! ┌────┬────┐             ┌─────────┐ pencil ny-1
//! │    │    │             ├─────────┤
//! ├────┼────┤    复制 →   │   ...   │
//! │    │    │             ├─────────┤
//! └────┴────┘             └─────────┘ pencil 0
//! ```
//!
//! 笔形按工作线程数分组并行处理。

use rayon::prelude::*;

use super::CorrelationEstimator;
use crate::field::CellField;
use crate::grid::Grid;

/// 笔形分区布局
///
/// 笔形内存连续：`data[p * n_along + k]`，`p` 为笔形编号，`k` 为沿探测轴位置。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PencilLayout {
    axis: usize,
    n_along: usize,
    n_pencils: usize,
    pencils_per_group: usize,
}

impl PencilLayout {
    /// 创建沿 `axis` 的笔形布局
    pub fn new(grid: &Grid, axis: usize) -> Self {
        let n = grid.n_cells();
        let n_pencils = n[1 - axis];
        let workers = rayon::current_num_threads().max(1);
        Self {
            axis,
            n_along: n[axis],
            n_pencils,
            pencils_per_group: (n_pencils / workers).max(1),
        }
    }

    /// 探测轴
    #[inline]
    pub fn axis(&self) -> usize {
        self.axis
    }

    /// 笔形长度
    #[inline]
    pub fn n_along(&self) -> usize {
        self.n_along
    }

    /// 笔形数
    #[inline]
    pub fn n_pencils(&self) -> usize {
        self.n_pencils
    }

    /// 每组笔形数
    #[inline]
    pub fn pencils_per_group(&self) -> usize {
        self.pencils_per_group
    }

    /// 分组数
    pub fn n_groups(&self) -> usize {
        self.n_pencils.div_ceil(self.pencils_per_group)
    }

    /// 笔形 `p` 第 `k` 个单元对应的网格单元
    #[inline]
    pub fn cell(&self, p: usize, k: usize) -> (usize, usize) {
        if self.axis == 0 {
            (k, p)
        } else {
            (p, k)
        }
    }

    /// 主分解 → 笔形分区
    pub fn copy_in(&self, field: &CellField, pencils: &mut [f64]) {
        let n = self.n_along;
        pencils
            .par_chunks_mut(n)
            .enumerate()
            .for_each(|(p, pencil)| {
                for (k, v) in pencil.iter_mut().enumerate() {
                    let (i, j) = self.cell(p, k);
                    *v = field.get(i, j);
                }
            });
    }

    /// 笔形分区 → 主分解（覆盖内部单元）
    pub fn copy_out(&self, pencils: &[f64], field: &mut CellField) {
        let n = self.n_along;
        field.par_map_interior(|i, j| {
            let (p, k) = if self.axis == 0 { (j, i) } else { (i, j) };
            pencils[p * n + k]
        });
    }
}

/// 笔形相关估计器
#[derive(Debug, Clone)]
pub struct PencilEstimator {
    layout: PencilLayout,
    probe_index: usize,
    height_pencil: Vec<f64>,
    sum_pencil: Vec<f64>,
}

impl PencilEstimator {
    /// 创建估计器，`probe_index` 为探针沿探测轴的位置
    pub fn new(layout: PencilLayout, probe_index: usize) -> Self {
        let len = layout.n_pencils * layout.n_along;
        Self {
            layout,
            probe_index,
            height_pencil: vec![0.0; len],
            sum_pencil: vec![0.0; len],
        }
    }

    /// 笔形布局
    #[inline]
    pub fn layout(&self) -> &PencilLayout {
        &self.layout
    }

    /// 笔形分区上的相关和
    #[inline]
    pub fn pencil_sum(&self) -> &[f64] {
        &self.sum_pencil
    }
}

impl CorrelationEstimator for PencilEstimator {
    fn name(&self) -> &'static str {
        "pencil"
    }

    fn accumulate(&mut self, h: &CellField, h0: f64, _grid: &Grid, corr_sum: &mut CellField) {
        let layout = self.layout;
        let probe = self.probe_index;
        let n = layout.n_along;
        let group = layout.pencils_per_group * n;

        layout.copy_in(h, &mut self.height_pencil);

        self.sum_pencil
            .par_chunks_mut(group)
            .zip(self.height_pencil.par_chunks(group))
            .for_each(|(sums, heights)| {
                for (sum, height) in sums.chunks_mut(n).zip(heights.chunks(n)) {
                    let star = height[probe] - h0;
                    for (acc, v) in sum.iter_mut().zip(height) {
                        *acc += star * (v - h0);
                    }
                }
            });

        layout.copy_out(&self.sum_pencil, corr_sum);
    }

    fn reset(&mut self) {
        self.sum_pencil.par_iter_mut().for_each(|v| *v = 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Grid {
        Grid::new([5, 3], [0.0, 0.0], [1.0, 1.0], [true, true], [2, 2]).unwrap()
    }

    #[test]
    fn test_layout_round_trip() {
        let g = grid();
        let mut h = CellField::new(&g, 1);
        h.par_map_interior(|i, j| (i + 10 * j) as f64);

        for axis in 0..2 {
            let layout = PencilLayout::new(&g, axis);
            assert_eq!(layout.n_pencils() * layout.n_along(), 15);
            assert!(layout.n_groups() >= 1);

            let mut pencils = vec![0.0; 15];
            layout.copy_in(&h, &mut pencils);
            let mut back = CellField::new(&g, 0);
            layout.copy_out(&pencils, &mut back);
            assert_eq!(back.interior_values(), h.interior_values());
        }
    }

    #[test]
    fn test_pencil_spans_probed_axis() {
        let g = grid();
        let layout = PencilLayout::new(&g, 0);
        assert_eq!(layout.n_along(), 5);
        assert_eq!(layout.n_pencils(), 3);
        assert_eq!(layout.cell(2, 4), (4, 2));

        let layout = PencilLayout::new(&g, 1);
        assert_eq!(layout.n_along(), 3);
        assert_eq!(layout.cell(2, 1), (2, 1));
    }

    #[test]
    fn test_accumulate_within_rows() {
        let g = grid();
        let mut h = CellField::new(&g, 1);
        h.par_map_interior(|i, j| 1.0 + (i as f64) * (j as f64 + 1.0));
        let mut corr = CellField::new(&g, 0);
        let mut est = PencilEstimator::new(PencilLayout::new(&g, 0), 2);

        est.accumulate(&h, 1.0, &g, &mut corr);
        est.accumulate(&h, 1.0, &g, &mut corr);

        for j in 0..3 {
            let star = h.get(2, j) - 1.0;
            for i in 0..5 {
                let expected = 2.0 * star * (h.get(i, j) - 1.0);
                assert!((corr.get(i, j) - expected).abs() < 1e-12);
            }
        }

        est.reset();
        assert!(est.pencil_sum().iter().all(|v| *v == 0.0));
    }
}
