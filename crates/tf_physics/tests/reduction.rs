// crates/tf_physics/tests/reduction.rs

//! 1D-x 模式的每一行等价于独立的一维运行

use tf_config::{AlgorithmMode, ThinFilmConfig};
use tf_physics::{FaceField, NoiseSource, ThinFilmSolver};

/// 确定性噪声：取值只依赖 (调用次数, 轴, i, j + 行偏移)
struct PatternNoise {
    row_offset: usize,
    calls: usize,
}

impl PatternNoise {
    fn new(row_offset: usize) -> Self {
        Self {
            row_offset,
            calls: 0,
        }
    }
}

impl NoiseSource for PatternNoise {
    fn fill(&mut self, faces: &mut FaceField, variance: f64) {
        let [n0, n1] = faces.shape();
        let axis = faces.axis() as f64;
        let call = self.calls as f64;
        for j in 0..n1 {
            for i in 0..n0 {
                let row = (j + self.row_offset) as f64;
                let v = (0.7 * i as f64 + 1.3 * row + 0.37 * call + 2.1 * axis).sin();
                faces.set(i, j, variance.sqrt() * v);
            }
        }
        self.calls += 1;
    }

    fn name(&self) -> &'static str {
        "pattern"
    }
}

fn config(n_cells: [usize; 2]) -> ThinFilmConfig {
    let mut config = ThinFilmConfig::default();
    config.domain.n_cells = n_cells;
    config.domain.prob_hi = [0.1 * n_cells[0] as f64, 0.1 * n_cells[1] as f64];
    config.domain.max_grid_size = [4, 4];
    config.algorithm.mode = AlgorithmMode::OneDAlongX;
    config.physics.k_b = 1e-12;
    config.run.max_step = 50;
    config
}

fn initial(i: usize, row: usize) -> f64 {
    1.0 + 0.05 * (2.0 * std::f64::consts::PI * i as f64 / 8.0 + row as f64).sin()
}

#[test]
fn test_rows_match_independent_1d_runs() {
    let (nx, ny) = (8, 3);

    let mut full = ThinFilmSolver::from_config(config([nx, ny]))
        .unwrap()
        .with_noise(Box::new(PatternNoise::new(0)));
    full.set_initial_height(initial);
    while !full.is_finished() {
        full.step().unwrap();
    }

    for row in 0..ny {
        let mut line = ThinFilmSolver::from_config(config([nx, 1]))
            .unwrap()
            .with_noise(Box::new(PatternNoise::new(row)));
        assert_eq!(line.dt(), full.dt());
        line.set_initial_height(|i, _| initial(i, row));
        while !line.is_finished() {
            line.step().unwrap();
        }

        for i in 0..nx {
            let a = full.height().get(i, row);
            let b = line.height().get(i, 0);
            assert!((a - b).abs() < 1e-14, "row {} cell {}: {} vs {}", row, i, a, b);
        }
    }
}

#[test]
fn test_rows_do_not_exchange_mass() {
    let (nx, ny) = (8, 4);
    let mut solver = ThinFilmSolver::from_config(config([nx, ny]))
        .unwrap()
        .with_noise(Box::new(PatternNoise::new(0)));
    solver.set_initial_height(|i, j| 1.0 + 0.1 * j as f64 + 0.01 * i as f64);

    let row_mass = |s: &ThinFilmSolver, j: usize| -> f64 { (0..nx).map(|i| s.height().get(i, j)).sum() };
    let before: Vec<f64> = (0..ny).map(|j| row_mass(&solver, j)).collect();
    while !solver.is_finished() {
        solver.step().unwrap();
    }

    for j in 0..ny {
        assert!((row_mass(&solver, j) - before[j]).abs() < 1e-12);
    }
    assert!(solver.flux_engine().flux(1).as_slice().iter().all(|v| *v == 0.0));
}
