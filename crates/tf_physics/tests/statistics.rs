// crates/tf_physics/tests/statistics.rs

//! 方差与相关的运行平均

use tf_config::{AlgorithmMode, ThinFilmConfig};
use tf_physics::{CellField, Grid, StatisticsEngine, ThinFilmSolver};

fn noisy_config(mode: AlgorithmMode, probe: [usize; 2]) -> ThinFilmConfig {
    let mut config = ThinFilmConfig::default();
    config.domain.n_cells = [6, 5];
    config.domain.prob_hi = [0.6, 0.5];
    config.domain.max_grid_size = [3, 3];
    config.physics.k_b = 1e-10;
    config.algorithm.mode = mode;
    config.algorithm.probe = probe;
    config.run.max_step = 12;
    config.run.seed = 99;
    config
}

/// 逐步运行并记录每步之后的高度场
fn run_and_record(solver: &mut ThinFilmSolver) -> Vec<CellField> {
    let mut history = Vec::new();
    while !solver.is_finished() {
        solver.step().unwrap();
        history.push(solver.height().clone());
    }
    history
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-12 * (1.0 + a.abs().max(b.abs()))
}

#[test]
fn test_variance_is_mean_of_squared_deviation() {
    let config = noisy_config(AlgorithmMode::TwoD, [2, 3]);
    let h0 = config.physics.h0;
    let mut solver = ThinFilmSolver::from_config(config).unwrap();
    let history = run_and_record(&mut solver);
    let k = history.len() as f64;

    let var = solver.statistics().variance_average();
    let mut any_nonzero = false;
    for j in 0..5 {
        for i in 0..6 {
            let expected: f64 = history.iter().map(|h| (h0 - h.get(i, j)).powi(2)).sum::<f64>() / k;
            assert!(close(var.get(i, j), expected));
            any_nonzero |= expected > 0.0;
        }
    }
    assert!(any_nonzero);
}

#[test]
fn test_two_d_correlation_uses_global_probe() {
    let probe = [4, 1];
    let config = noisy_config(AlgorithmMode::TwoD, probe);
    let h0 = config.physics.h0;
    let mut solver = ThinFilmSolver::from_config(config).unwrap();
    let history = run_and_record(&mut solver);
    let k = history.len() as f64;

    let corr = solver.statistics().correlation_average();
    for j in 0..5 {
        for i in 0..6 {
            let expected: f64 = history
                .iter()
                .map(|h| (h.get(probe[0], probe[1]) - h0) * (h.get(i, j) - h0))
                .sum::<f64>()
                / k;
            assert!(close(corr.get(i, j), expected));
        }
    }
}

#[test]
fn test_one_d_y_correlation_stays_within_columns() {
    let probe = [0, 3];
    let config = noisy_config(AlgorithmMode::OneDAlongY, probe);
    let h0 = config.physics.h0;
    let mut solver = ThinFilmSolver::from_config(config).unwrap();
    let history = run_and_record(&mut solver);
    let k = history.len() as f64;

    let corr = solver.statistics().correlation_average();
    for i in 0..6 {
        for j in 0..5 {
            let expected: f64 = history
                .iter()
                .map(|h| (h.get(i, probe[1]) - h0) * (h.get(i, j) - h0))
                .sum::<f64>()
                / k;
            assert!(close(corr.get(i, j), expected));
        }
    }

    let line = solver.statistics().correlation_line().unwrap();
    assert_eq!(line.len(), 5);
    for (j, v) in line.iter().enumerate() {
        let mean: f64 = (0..6).map(|i| corr.get(i, j)).sum::<f64>() / 6.0;
        assert!(close(*v, mean));
    }
}

#[test]
fn test_warmup_resets_accumulators_once() {
    let grid = Grid::new([3, 2], [0.0, 0.0], [1.0, 1.0], [true, true], [2, 2]).unwrap();
    let mut stats = StatisticsEngine::new(&grid, 1.0, 2, AlgorithmMode::TwoD, [0, 0]);

    let values = [5.0, 4.0, 3.0, 2.0, 1.5];
    for (t, v) in values.iter().enumerate() {
        let h = CellField::filled(&grid, 1, *v);
        stats.update(t + 1, &h, &grid);
    }

    // 只有第 3、4、5 步被计入
    assert_eq!(stats.sample_count(), 3);
    let expected = ((3.0_f64 - 1.0).powi(2) + (2.0_f64 - 1.0).powi(2) + 0.25) / 3.0;
    assert!(close(stats.variance_average().get(2, 1), expected));
    assert!(close(stats.correlation_average().get(0, 0), expected));
}

#[test]
fn test_solver_discards_warmup_samples() {
    let mut config = noisy_config(AlgorithmMode::OneDAlongX, [1, 1]);
    config.run.n_steps_skip = 4;
    let mut solver = ThinFilmSolver::from_config(config).unwrap();
    let mut sampled = Vec::new();
    while !solver.is_finished() {
        sampled.push(solver.step().unwrap().sampled);
    }
    assert_eq!(solver.statistics().sample_count(), 8);
    assert!(sampled[..4].iter().all(|s| !s));
    assert!(sampled[4..].iter().all(|s| *s));
}
