// crates/tf_physics/tests/boundary_flux.rs

//! 壁面边界：边界通量恒为零，钉扎梯度为半单元单侧差分

use tf_config::ThinFilmConfig;
use tf_physics::{ThinFilmSolver, ZeroNoise};

fn walled_config(lo_x: i32, hi_x: i32) -> ThinFilmConfig {
    let mut config = ThinFilmConfig::default();
    config.domain.n_cells = [6, 4];
    config.domain.prob_hi = [0.6, 0.4];
    config.domain.max_grid_size = [3, 2];
    config.boundary.lo = [lo_x, -1];
    config.boundary.hi = [hi_x, -1];
    config.physics.k_b = 1e-12;
    config.run.max_step = 30;
    config.run.seed = 5;
    config
}

#[test]
fn test_wall_edge_flux_is_exactly_zero_every_step() {
    for (lo, hi) in [(0, 0), (1, 1), (0, 1)] {
        let mut solver = ThinFilmSolver::from_config(walled_config(lo, hi)).unwrap();
        solver.set_initial_height(|i, j| 1.0 + 0.1 * (i as f64) - 0.05 * (j as f64));

        while !solver.is_finished() {
            solver.step().unwrap();
            let flux = solver.flux_engine().flux(0);
            for j in 0..4 {
                assert_eq!(flux.get(0, j), 0.0);
                assert_eq!(flux.get(6, j), 0.0);
            }
            // 内部面仍有通量
            assert!(flux.get(3, 1) != 0.0);
        }
    }
}

#[test]
fn test_wall_on_y_axis_blocks_edge_flux_with_noise() {
    let mut config = walled_config(-1, -1);
    config.boundary.lo = [-1, 1];
    config.boundary.hi = [-1, 0];
    config.run.max_step = 20;
    let mut solver = ThinFilmSolver::from_config(config).unwrap();
    solver.set_initial_height(|i, j| 1.0 + 0.05 * (i as f64) + 0.1 * (j as f64));
    let initial = solver.total_mass();

    while !solver.is_finished() {
        solver.step().unwrap();
        let flux = solver.flux_engine().flux(1);
        for i in 0..6 {
            assert_eq!(flux.get(i, 0), 0.0);
            assert_eq!(flux.get(i, 4), 0.0);
        }
        assert!(flux.get(2, 2) != 0.0);
        assert!((solver.total_mass() - initial).abs() < 1e-10);
    }
}

#[test]
fn test_wall_domain_conserves_mass() {
    let mut config = walled_config(0, 1);
    config.run.max_step = 200;
    let mut solver = ThinFilmSolver::from_config(config)
        .unwrap()
        .with_noise(Box::new(ZeroNoise));
    solver.set_initial_height(|i, _| 1.0 + 0.02 * i as f64);
    let initial = solver.total_mass();

    while !solver.is_finished() {
        solver.step().unwrap();
    }

    assert!((solver.total_mass() - initial).abs() < 1e-10);
}

#[test]
fn test_pinned_gradient_low_side() {
    let mut config = walled_config(1, 1);
    config.boundary.pinned_height = Some(2.0);
    let a = 1.3;
    let mut solver = ThinFilmSolver::from_config(config)
        .unwrap()
        .with_noise(Box::new(ZeroNoise));
    solver.set_initial_height(|i, _| if i == 0 { a } else { 1.0 });
    let dx = solver.grid().dx()[0];

    solver.step().unwrap();

    let gradh = solver.flux_engine().face_gradient(0);
    for j in 0..4 {
        assert_eq!(gradh.get(0, j), (a - 2.0) / (0.5 * dx));
        // 高侧 h = 1.0
        assert_eq!(gradh.get(6, j), (2.0 - 1.0) / (0.5 * dx));
    }
}

#[test]
fn test_pinned_target_defaults_to_h0() {
    let mut config = walled_config(1, 0);
    config.physics.h0 = 1.5;
    let mut solver = ThinFilmSolver::from_config(config)
        .unwrap()
        .with_noise(Box::new(ZeroNoise));
    assert_eq!(solver.boundary().pinned_height(), 1.5);

    solver.set_initial_height(|_, _| 1.0);
    solver.step().unwrap();
    let dx = solver.grid().dx()[0];
    let gradh = solver.flux_engine().face_gradient(0);
    assert_eq!(gradh.get(0, 2), (1.0 - 1.5) / (0.5 * dx));
    assert_eq!(gradh.get(6, 2), 0.0);
}
