// apps/tf_cli/src/commands/info.rs

//! 信息显示命令
//!
//! 显示配置派生的时间步长、物理常数与分解规模。

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tf_physics::{BoundaryPolicy, Grid, PencilLayout};
use tracing::info;

use super::load_config;

/// 信息显示参数
#[derive(Args)]
pub struct InfoArgs {
    /// 配置文件路径（缺省时显示默认配置）
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 以 JSON 打印完整配置
    #[arg(long)]
    pub dump: bool,
}

/// 执行信息命令
pub fn execute(args: InfoArgs) -> Result<()> {
    info!("=== ThinFilm 信息 ===");

    let config = load_config(args.config.as_deref())?;
    let boundary = BoundaryPolicy::from_config(&config).context("边界配置无效")?;
    let grid = Grid::from_config(&config, boundary.periodicity()).context("网格配置无效")?;

    println!("=== 版本 ===");
    println!("ThinFilm CLI 版本: {}", env!("CARGO_PKG_VERSION"));
    println!("工作线程数: {}", rayon::current_num_threads());

    println!("\n=== 网格 ===");
    println!("单元数: {} x {}", grid.nx(), grid.ny());
    let (lo, hi) = (grid.prob_lo(), grid.prob_hi());
    println!("物理域: [{}, {}] x [{}, {}]", lo[0], hi[0], lo[1], hi[1]);
    println!("间距: dx = {:e}, dy = {:e}", grid.dx()[0], grid.dx()[1]);
    println!("周期性: {:?}", grid.periodicity());
    for axis in 0..2 {
        let b = boundary.axis(axis);
        println!("轴 {} 边界: lo = {}, hi = {}", axis, b.lo, b.hi);
    }
    println!("分块数: {} (最大分块 {:?})", grid.boxes().len(), config.domain.max_grid_size);

    println!("\n=== 派生常数 ===");
    println!("特征时间 t0: {:e}", config.characteristic_time());
    println!("时间步长 dt: {:e}", config.time_step());
    println!("模拟总时长: {:e}", config.time_step() * config.run.max_step as f64);
    println!("噪声常数: {:e}", config.noise_const());
    println!("迁移率常数: {:e}", config.mobility_const());
    println!("钉扎目标高度: {}", boundary.pinned_height());

    println!("\n=== 统计 ===");
    println!("算法模式: {}", config.algorithm.mode);
    println!("探针: {:?}", config.algorithm.probe);
    match config.algorithm.mode.probed_axis() {
        Some(axis) => {
            let layout = PencilLayout::new(&grid, axis);
            println!(
                "笔形分区: {} 个笔形 x {} 单元, {} 组",
                layout.n_pencils(),
                layout.n_along(),
                layout.n_groups()
            );
        }
        None => println!("相关策略: 探针全局归约"),
    }

    if args.dump {
        println!("\n=== 配置 ===");
        println!("{}", serde_json::to_string_pretty(&config)?);
    }

    Ok(())
}
