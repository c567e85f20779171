// crates/tf_physics/src/field.rs

//! 结构化场存储
//!
//! - `CellField`: 单元中心标量场，带 `ng` 层 halo
//! - `FaceField`: 面心标量场（沿自身法向轴偏移半个单元），无 halo
//!
//! # 布局
//!
//! 行优先（j 外层，i 内层）连续存储，逐行并行：
//!
//! ```text
//! CellField (ng = 1):            FaceField (axis = 0):
//!   j = ny   [h h h ... h h]       face i 位于单元 i-1 与 i 之间
//!   j = 0..  [h|c c ... c|h]       i ∈ 0..=nx, j ∈ 0..ny
//!   j = -1   [h h h ... h h]
//! ```
//!
//! 所有写操作都是对索引范围的纯映射，每个元素恰好一个写者。

use rayon::prelude::*;
use tf_foundation::KahanSum;

use crate::grid::Grid;

// ============================================================
// 单元中心场
// ============================================================

/// 单元中心标量场
#[derive(Debug, Clone)]
pub struct CellField {
    nx: usize,
    ny: usize,
    ng: usize,
    data: Vec<f64>,
}

impl CellField {
    /// 创建全零场（含 halo）
    pub fn new(grid: &Grid, ng: usize) -> Self {
        Self::filled(grid, ng, 0.0)
    }

    /// 创建常值场（含 halo）
    pub fn filled(grid: &Grid, ng: usize, value: f64) -> Self {
        let nx = grid.nx();
        let ny = grid.ny();
        Self {
            nx,
            ny,
            ng,
            data: vec![value; (nx + 2 * ng) * (ny + 2 * ng)],
        }
    }

    /// x 方向单元数
    #[inline]
    pub fn nx(&self) -> usize {
        self.nx
    }

    /// y 方向单元数
    #[inline]
    pub fn ny(&self) -> usize {
        self.ny
    }

    #[inline]
    fn stride(&self) -> usize {
        self.nx + 2 * self.ng
    }

    #[inline]
    fn offset(&self, i: isize, j: isize) -> usize {
        let ng = self.ng as isize;
        debug_assert!(i >= -ng && i < self.nx as isize + ng);
        debug_assert!(j >= -ng && j < self.ny as isize + ng);
        (j + ng) as usize * self.stride() + (i + ng) as usize
    }

    /// 读取单元值，允许 halo 内的负索引
    #[inline]
    pub fn at(&self, i: isize, j: isize) -> f64 {
        self.data[self.offset(i, j)]
    }

    /// 读取内部单元值
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.at(i as isize, j as isize)
    }

    /// 写入单元值（允许 halo）
    #[inline]
    pub fn set_at(&mut self, i: isize, j: isize, value: f64) {
        let k = self.offset(i, j);
        self.data[k] = value;
    }

    /// 写入内部单元值
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        self.set_at(i as isize, j as isize, value);
    }

    /// 整场（含 halo）置为常值
    pub fn fill(&mut self, value: f64) {
        self.data.par_iter_mut().for_each(|v| *v = value);
    }

    /// 对内部单元并行赋值：`self(i, j) = f(i, j)`
    pub fn par_map_interior<F>(&mut self, f: F)
    where
        F: Fn(usize, usize) -> f64 + Sync,
    {
        self.par_update_interior(|i, j, _| f(i, j));
    }

    /// 对内部单元并行更新：`self(i, j) = f(i, j, self(i, j))`
    pub fn par_update_interior<F>(&mut self, f: F)
    where
        F: Fn(usize, usize, f64) -> f64 + Sync,
    {
        let (nx, ny, ng) = (self.nx, self.ny, self.ng);
        let stride = self.stride();
        self.data
            .par_chunks_mut(stride)
            .enumerate()
            .filter(|(row, _)| *row >= ng && *row < ng + ny)
            .for_each(|(row, chunk)| {
                let j = row - ng;
                for (i, v) in chunk[ng..ng + nx].iter_mut().enumerate() {
                    *v = f(i, j, *v);
                }
            });
    }

    /// 刷新 halo
    ///
    /// 周期轴从对侧内部单元回绕；非周期轴的 halo 保持原值不动。
    /// 先 x 后 y，且 y 方向复制整行（含 x halo），角点因此也被正确填充。
    pub fn fill_boundary(&mut self, periodic: [bool; 2]) {
        let ng = self.ng as isize;
        if ng == 0 {
            return;
        }
        let nx = self.nx as isize;
        let ny = self.ny as isize;

        if periodic[0] {
            for j in 0..ny {
                for g in 1..=ng {
                    let lo = self.at(nx - g, j);
                    let hi = self.at(g - 1, j);
                    self.set_at(-g, j, lo);
                    self.set_at(nx - 1 + g, j, hi);
                }
            }
        }

        if periodic[1] {
            for g in 1..=ng {
                for i in -ng..nx + ng {
                    let lo = self.at(i, ny - g);
                    let hi = self.at(i, g - 1);
                    self.set_at(i, -g, lo);
                    self.set_at(i, ny - 1 + g, hi);
                }
            }
        }
    }

    /// 内部单元之和（Kahan 补偿，逐行并行）
    pub fn sum_interior(&self) -> f64 {
        let (nx, ny, ng) = (self.nx, self.ny, self.ng);
        self.data
            .par_chunks(self.stride())
            .enumerate()
            .filter(|(row, _)| *row >= ng && *row < ng + ny)
            .map(|(_, chunk)| chunk[ng..ng + nx].iter().copied().sum::<KahanSum>())
            .reduce(KahanSum::new, KahanSum::merge)
            .value()
    }

    /// 内部单元最小值与最大值
    pub fn min_max_interior(&self) -> (f64, f64) {
        let (nx, ny, ng) = (self.nx, self.ny, self.ng);
        self.data
            .par_chunks(self.stride())
            .enumerate()
            .filter(|(row, _)| *row >= ng && *row < ng + ny)
            .map(|(_, chunk)| {
                chunk[ng..ng + nx]
                    .iter()
                    .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                        (lo.min(v), hi.max(v))
                    })
            })
            .reduce(
                || (f64::INFINITY, f64::NEG_INFINITY),
                |a, b| (a.0.min(b.0), a.1.max(b.1)),
            )
    }

    /// 内部单元是否全部有限
    pub fn all_finite(&self) -> bool {
        let (nx, ny, ng) = (self.nx, self.ny, self.ng);
        self.data
            .par_chunks(self.stride())
            .enumerate()
            .filter(|(row, _)| *row >= ng && *row < ng + ny)
            .all(|(_, chunk)| chunk[ng..ng + nx].iter().all(|v| v.is_finite()))
    }

    /// 内部单元按行优先展开（j 外层）
    pub fn interior_values(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.nx * self.ny);
        for j in 0..self.ny {
            for i in 0..self.nx {
                out.push(self.get(i, j));
            }
        }
        out
    }
}

// ============================================================
// 面心场
// ============================================================

/// 面心标量场
///
/// `axis = 0` 时形状为 (nx+1) × ny，`axis = 1` 时为 nx × (ny+1)。
#[derive(Debug, Clone)]
pub struct FaceField {
    axis: usize,
    n: [usize; 2],
    data: Vec<f64>,
}

impl FaceField {
    /// 创建全零面场
    pub fn new(grid: &Grid, axis: usize) -> Self {
        let mut n = grid.n_cells();
        n[axis] += 1;
        Self {
            axis,
            n,
            data: vec![0.0; n[0] * n[1]],
        }
    }

    /// 为两个轴各创建一个面场
    pub fn pair(grid: &Grid) -> [FaceField; 2] {
        [Self::new(grid, 0), Self::new(grid, 1)]
    }

    /// 法向轴
    #[inline]
    pub fn axis(&self) -> usize {
        self.axis
    }

    /// 面数 [沿 x, 沿 y]
    #[inline]
    pub fn shape(&self) -> [usize; 2] {
        self.n
    }

    /// 读取面值
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        debug_assert!(i < self.n[0] && j < self.n[1]);
        self.data[j * self.n[0] + i]
    }

    /// 写入面值
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        debug_assert!(i < self.n[0] && j < self.n[1]);
        self.data[j * self.n[0] + i] = value;
    }

    /// 全部置为常值
    pub fn fill(&mut self, value: f64) {
        self.data.par_iter_mut().for_each(|v| *v = value);
    }

    /// 并行赋值：`self(i, j) = f(i, j)`
    pub fn par_map<F>(&mut self, f: F)
    where
        F: Fn(usize, usize) -> f64 + Sync,
    {
        let width = self.n[0];
        self.data
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(j, row)| {
                for (i, v) in row.iter_mut().enumerate() {
                    *v = f(i, j);
                }
            });
    }

    /// 原始数据（行优先）
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// 原始数据（可变）
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(periodic: [bool; 2]) -> Grid {
        Grid::new([4, 3], [0.0, 0.0], [1.0, 0.75], periodic, [4, 4]).unwrap()
    }

    #[test]
    fn test_cell_field_map_and_sum() {
        let g = grid([true, true]);
        let mut f = CellField::new(&g, 1);
        f.par_map_interior(|i, j| (i + 10 * j) as f64);
        assert_eq!(f.get(3, 2), 23.0);
        let expected: f64 = (0..3)
            .flat_map(|j| (0..4).map(move |i| (i + 10 * j) as f64))
            .sum();
        assert_eq!(f.sum_interior(), expected);
        assert_eq!(f.min_max_interior(), (0.0, 23.0));
        assert_eq!(f.interior_values().len(), 12);
    }

    #[test]
    fn test_fill_boundary_periodic() {
        let g = grid([true, true]);
        let mut f = CellField::new(&g, 1);
        f.par_map_interior(|i, j| (i + 10 * j) as f64);
        f.fill_boundary(g.periodicity());

        assert_eq!(f.at(-1, 0), f.get(3, 0));
        assert_eq!(f.at(4, 1), f.get(0, 1));
        assert_eq!(f.at(2, -1), f.get(2, 2));
        assert_eq!(f.at(2, 3), f.get(2, 0));
        // 角点
        assert_eq!(f.at(-1, -1), f.get(3, 2));
        assert_eq!(f.at(4, 3), f.get(0, 0));
    }

    #[test]
    fn test_fill_boundary_keeps_wall_halo() {
        let g = grid([false, true]);
        let mut f = CellField::filled(&g, 1, 7.0);
        f.par_map_interior(|_, _| 1.0);
        f.fill_boundary(g.periodicity());
        assert_eq!(f.at(-1, 0), 7.0);
        assert_eq!(f.at(4, 0), 7.0);
        assert_eq!(f.at(0, -1), 1.0);
    }

    #[test]
    fn test_face_field_shape() {
        let g = grid([true, true]);
        let [fx, fy] = FaceField::pair(&g);
        assert_eq!(fx.shape(), [5, 3]);
        assert_eq!(fy.shape(), [4, 4]);

        let mut fx = fx;
        fx.par_map(|i, j| (i * j) as f64);
        assert_eq!(fx.get(4, 2), 8.0);
    }
}
