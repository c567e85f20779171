// crates/tf_physics/src/flux.rs

//! 通量引擎
//!
//! 每步按固定顺序执行六个阶段，每个阶段都是对单元/面索引范围的并行映射：
//!
//! 1. 面高度 hface = (h[i-1] + h[i]) / 2
//! 2. 面梯度 gradh = (h[i] - h[i-1]) / dx，边界面按边界策略覆盖
//! 3. 单元拉普拉斯 L = Σ_d fac_d · (gradh[i+1] - gradh[i]) / dx_d，随后刷新 L 的 halo
//! 4. 面拉普拉斯梯度 gradL = (L[i] - L[i-1]) / dx，边界面不覆盖
//! 5. 面通量 F = fac_d · [√(C_n·m³/(dt·dV))·ξ + C_m·m³·gradL]，m 为按迁移率策略处理后的 hface
//! 6. 壁面边界通量清零
//!
//! 面 i 位于单元 i-1 与 i 之间，面 0 与面 n 为域边界面。
//! 第 3、4 阶段之间的 halo 刷新是四阶算子两次二阶差分的必要屏障。

use tf_config::{MobilityPolicy, ThinFilmConfig};

use crate::boundary::BoundaryPolicy;
use crate::field::{CellField, FaceField};
use crate::grid::Grid;

/// 通量计算参数（运行期间不变）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluxParams {
    /// 噪声常数 2·k_B·T/(3·μ)
    pub noise_const: f64,
    /// 迁移率常数 γ/(3·μ)
    pub mobility_const: f64,
    /// 时间步长
    pub dt: f64,
    /// 单元体积
    pub cell_volume: f64,
    /// 降维因子 [x, y]
    pub flux_factors: [f64; 2],
    /// 迁移率策略
    pub mobility: MobilityPolicy,
}

impl FluxParams {
    /// 从运行配置派生
    pub fn from_config(config: &ThinFilmConfig) -> Self {
        Self {
            noise_const: config.noise_const(),
            mobility_const: config.mobility_const(),
            dt: config.time_step(),
            cell_volume: config.cell_volume(),
            flux_factors: config.flux_factors(),
            mobility: config.physics.mobility,
        }
    }

    /// 噪声项前因子 √(C_n·m³/(dt·dV))
    #[inline]
    fn noise_amplitude(&self, m3: f64) -> f64 {
        (self.noise_const * m3 / (self.dt * self.cell_volume)).sqrt()
    }
}

/// 通量引擎
///
/// 持有所有派生面场与拉普拉斯场。这些场每步完全重算，不携带跨步状态。
#[derive(Debug, Clone)]
pub struct FluxEngine {
    params: FluxParams,
    hface: [FaceField; 2],
    gradh: [FaceField; 2],
    laph: CellField,
    grad_laph: [FaceField; 2],
    flux: [FaceField; 2],
}

impl FluxEngine {
    /// 创建引擎并分配派生场
    ///
    /// 拉普拉斯场带一层 halo 并显式置零，非周期轴上的 halo 从不被写入。
    pub fn new(grid: &Grid, params: FluxParams) -> Self {
        Self {
            params,
            hface: FaceField::pair(grid),
            gradh: FaceField::pair(grid),
            laph: CellField::new(grid, 1),
            grad_laph: FaceField::pair(grid),
            flux: FaceField::pair(grid),
        }
    }

    /// 计算参数
    #[inline]
    pub fn params(&self) -> &FluxParams {
        &self.params
    }

    /// 由当前高度场与本步噪声计算面通量
    ///
    /// `h` 的 halo 必须已刷新。
    pub fn compute(
        &mut self,
        h: &CellField,
        noise: &[FaceField; 2],
        grid: &Grid,
        boundary: &BoundaryPolicy,
    ) {
        let Self {
            params,
            hface,
            gradh,
            laph,
            grad_laph,
            flux,
        } = self;
        let dx = grid.dx();
        let fac = params.flux_factors;

        // 1. 面高度
        for (axis, f) in hface.iter_mut().enumerate() {
            let (di, dj) = offset(axis);
            f.par_map(|i, j| {
                let (i, j) = (i as isize, j as isize);
                0.5 * (h.at(i - di, j - dj) + h.at(i, j))
            });
        }

        // 2. 面梯度 + 边界覆盖
        for (axis, f) in gradh.iter_mut().enumerate() {
            let (di, dj) = offset(axis);
            let inv = 1.0 / dx[axis];
            f.par_map(|i, j| {
                let (i, j) = (i as isize, j as isize);
                (h.at(i, j) - h.at(i - di, j - dj)) * inv
            });
            boundary.apply_gradient_overrides(f, h, grid);
        }

        // 3. 单元拉普拉斯 + halo 屏障
        {
            let [gx, gy] = &*gradh;
            laph.par_map_interior(|i, j| {
                fac[0] * (gx.get(i + 1, j) - gx.get(i, j)) / dx[0]
                    + fac[1] * (gy.get(i, j + 1) - gy.get(i, j)) / dx[1]
            });
            laph.fill_boundary(grid.periodicity());
        }

        // 4. 面拉普拉斯梯度（不覆盖）
        for (axis, f) in grad_laph.iter_mut().enumerate() {
            let (di, dj) = offset(axis);
            let inv = 1.0 / dx[axis];
            let l = &*laph;
            f.par_map(|i, j| {
                let (i, j) = (i as isize, j as isize);
                (l.at(i, j) - l.at(i - di, j - dj)) * inv
            });
        }

        // 5. 面通量
        for axis in 0..2 {
            let p = *params;
            let hf = &hface[axis];
            let gl = &grad_laph[axis];
            let xi = &noise[axis];
            let factor = fac[axis];
            flux[axis].par_map(|i, j| {
                let m = p.mobility.apply(hf.get(i, j));
                let m3 = m * m * m;
                factor * (p.noise_amplitude(m3) * xi.get(i, j) + p.mobility_const * m3 * gl.get(i, j))
            });

            // 6. 壁面通量清零
            boundary.apply_flux_overrides(&mut flux[axis], grid);
        }
    }

    /// 面高度
    #[inline]
    pub fn face_height(&self, axis: usize) -> &FaceField {
        &self.hface[axis]
    }

    /// 面梯度（已应用边界覆盖）
    #[inline]
    pub fn face_gradient(&self, axis: usize) -> &FaceField {
        &self.gradh[axis]
    }

    /// 单元拉普拉斯
    #[inline]
    pub fn laplacian(&self) -> &CellField {
        &self.laph
    }

    /// 面拉普拉斯梯度
    #[inline]
    pub fn laplacian_gradient(&self, axis: usize) -> &FaceField {
        &self.grad_laph[axis]
    }

    /// 面通量
    #[inline]
    pub fn flux(&self, axis: usize) -> &FaceField {
        &self.flux[axis]
    }

    /// 两个轴的面通量
    #[inline]
    pub fn fluxes(&self) -> &[FaceField; 2] {
        &self.flux
    }
}

/// 面法向的单元偏移：面 (i, j) 的低侧单元为 (i - di, j - dj)
#[inline]
fn offset(axis: usize) -> (isize, isize) {
    if axis == 0 {
        (1, 0)
    } else {
        (0, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(fac: [f64; 2], dt: f64, dv: f64) -> FluxParams {
        FluxParams {
            noise_const: 0.0,
            mobility_const: 1.0,
            dt,
            cell_volume: dv,
            flux_factors: fac,
            mobility: MobilityPolicy::Unclamped,
        }
    }

    fn periodic_grid() -> Grid {
        Grid::new([6, 4], [0.0, 0.0], [0.6, 0.4], [true, true], [8, 8]).unwrap()
    }

    #[test]
    fn test_flat_film_has_zero_flux() {
        let g = periodic_grid();
        let mut h = CellField::filled(&g, 1, 1.0);
        h.fill_boundary(g.periodicity());
        let noise = FaceField::pair(&g);
        let mut engine = FluxEngine::new(&g, params([1.0, 1.0], 1e-6, 0.01));
        engine.compute(&h, &noise, &g, &BoundaryPolicy::fully_periodic());

        for axis in 0..2 {
            assert!(engine.flux(axis).as_slice().iter().all(|v| *v == 0.0));
            assert!(engine.face_height(axis).as_slice().iter().all(|v| *v == 1.0));
        }
    }

    #[test]
    fn test_face_gradient_and_laplacian() {
        let g = periodic_grid();
        let mut h = CellField::new(&g, 1);
        // h = i²（x 方向），周期回绕处不参与检查
        h.par_map_interior(|i, _| (i * i) as f64);
        h.fill_boundary(g.periodicity());
        let noise = FaceField::pair(&g);
        let mut engine = FluxEngine::new(&g, params([1.0, 1.0], 1e-6, 0.01));
        engine.compute(&h, &noise, &g, &BoundaryPolicy::fully_periodic());

        let dx = g.dx()[0];
        // 面 3 位于单元 2 与 3 之间
        let expected = (9.0 - 4.0) / dx;
        assert!((engine.face_gradient(0).get(3, 1) - expected).abs() < 1e-9);
        assert!((engine.face_height(0).get(3, 1) - 6.5).abs() < 1e-12);
        // 内部单元的二阶差分为 2/dx²
        let lap = engine.laplacian().get(2, 1);
        assert!((lap - 2.0 / (dx * dx)).abs() < 1e-6);
        // y 方向梯度为零
        assert!(engine.face_gradient(1).as_slice().iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_inactive_axis_has_zero_flux() {
        let g = periodic_grid();
        let mut h = CellField::new(&g, 1);
        h.par_map_interior(|i, j| 1.0 + 0.1 * ((i + 2 * j) as f64).sin());
        h.fill_boundary(g.periodicity());
        let mut noise = FaceField::pair(&g);
        noise[1].fill(1.0);

        let mut p = params([1.0, 0.0], 1e-6, 0.01);
        p.noise_const = 1.0;
        let mut engine = FluxEngine::new(&g, p);
        engine.compute(&h, &noise, &g, &BoundaryPolicy::fully_periodic());

        assert!(engine.flux(1).as_slice().iter().all(|v| *v == 0.0));
        assert!(engine.flux(0).as_slice().iter().any(|v| *v != 0.0));
    }

    #[test]
    fn test_negative_face_height_mobility_policy() {
        let g = periodic_grid();
        let mut h = CellField::filled(&g, 1, -0.5);
        h.fill_boundary(g.periodicity());
        let mut noise = FaceField::pair(&g);
        noise[0].fill(1.0);
        noise[1].fill(1.0);

        let mut p = params([1.0, 1.0], 1e-6, 0.01);
        p.noise_const = 1.0;
        let mut engine = FluxEngine::new(&g, p);
        engine.compute(&h, &noise, &g, &BoundaryPolicy::fully_periodic());
        for axis in 0..2 {
            assert!(engine.flux(axis).as_slice().iter().all(|v| v.is_nan()));
        }

        p.mobility = MobilityPolicy::ClampNonNegative;
        let mut engine = FluxEngine::new(&g, p);
        engine.compute(&h, &noise, &g, &BoundaryPolicy::fully_periodic());
        for axis in 0..2 {
            assert!(engine.flux(axis).as_slice().iter().all(|v| *v == 0.0));
        }
    }

    #[test]
    fn test_wall_edge_flux_zero() {
        let g = Grid::new([5, 4], [0.0, 0.0], [0.5, 0.4], [false, true], [8, 8]).unwrap();
        let boundary = BoundaryPolicy::from_codes([0, -1], [1, -1], 1.0).unwrap();
        let mut h = CellField::filled(&g, 1, 1.0);
        h.par_map_interior(|i, j| 1.0 + 0.05 * (i as f64) - 0.02 * (j as f64));
        h.fill_boundary(g.periodicity());
        let mut noise = FaceField::pair(&g);
        noise[0].fill(0.5);
        noise[1].fill(-0.5);

        let mut p = params([1.0, 1.0], 1e-6, 0.01);
        p.noise_const = 1.0;
        let mut engine = FluxEngine::new(&g, p);
        engine.compute(&h, &noise, &g, &boundary);

        for j in 0..4 {
            assert_eq!(engine.flux(0).get(0, j), 0.0);
            assert_eq!(engine.flux(0).get(5, j), 0.0);
            assert_eq!(engine.face_gradient(0).get(0, j), 0.0);
        }
        assert!(engine.flux(0).get(2, 1) != 0.0);
    }
}
