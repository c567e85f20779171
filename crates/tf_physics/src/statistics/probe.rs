// crates/tf_physics/src/statistics/probe.rs

//! 2D 相关：探针值全局归约
//!
//! 探针单元可能位于任意分块。每个分块贡献 "探针在本块内 ? δh* : 0"，
//! 再对所有分块求和，得到唯一的 δh* 标量。这是每次采样唯一的同步点。

use rayon::prelude::*;

use super::CorrelationEstimator;
use crate::field::CellField;
use crate::grid::Grid;

/// 探针归约相关估计器
#[derive(Debug, Clone)]
pub struct ProbeReductionEstimator {
    probe: [usize; 2],
}

impl ProbeReductionEstimator {
    /// 创建估计器
    pub fn new(probe: [usize; 2]) -> Self {
        Self { probe }
    }

    /// 探针单元
    #[inline]
    pub fn probe(&self) -> [usize; 2] {
        self.probe
    }

    /// 跨分块归约得到探针处的 h - h0
    pub fn probe_deviation(&self, h: &CellField, h0: f64, grid: &Grid) -> f64 {
        let [pi, pj] = self.probe;
        grid.boxes()
            .boxes()
            .par_iter()
            .map(|b| {
                if b.contains(pi, pj) {
                    h.get(pi, pj) - h0
                } else {
                    0.0
                }
            })
            .sum()
    }
}

impl CorrelationEstimator for ProbeReductionEstimator {
    fn name(&self) -> &'static str {
        "probe-reduction"
    }

    fn accumulate(&mut self, h: &CellField, h0: f64, grid: &Grid, corr_sum: &mut CellField) {
        let star = self.probe_deviation(h, h0, grid);
        corr_sum.par_update_interior(|i, j, acc| acc + star * (h.get(i, j) - h0));
    }

    fn reset(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_found_in_any_tile() {
        let g = Grid::new([8, 6], [0.0, 0.0], [1.0, 1.0], [true, true], [3, 2]).unwrap();
        assert!(g.boxes().len() > 1);
        let mut h = CellField::new(&g, 1);
        h.par_map_interior(|i, j| (10 * j + i) as f64);

        for probe in [[0, 0], [7, 5], [4, 3]] {
            let est = ProbeReductionEstimator::new(probe);
            let expected = (10 * probe[1] + probe[0]) as f64 - 1.0;
            assert_eq!(est.probe_deviation(&h, 1.0, &g), expected);
        }
    }
}
