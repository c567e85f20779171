// apps/tf_cli/src/commands/run.rs

//! 运行模拟命令
//!
//! 加载配置、构建求解器并运行到最大步数，按 `plot_int` 写出快照。

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tf_io::SnapshotWriter;
use tf_physics::{NullSink, SnapshotSink, ThinFilmSolver};
use tracing::info;

use super::load_config;

/// 运行模拟参数
#[derive(Args)]
pub struct RunArgs {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 输出目录（覆盖配置）
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 最大步数（覆盖配置）
    #[arg(short = 'n', long)]
    pub steps: Option<usize>,

    /// 快照间隔（覆盖配置）
    #[arg(long)]
    pub plot_int: Option<usize>,

    /// 随机种子（覆盖配置，0 表示使用时钟）
    #[arg(long)]
    pub seed: Option<i64>,

    /// 不写出任何快照
    #[arg(long)]
    pub no_output: bool,
}

/// 执行运行命令
pub fn execute(args: RunArgs) -> Result<()> {
    info!("=== ThinFilm 模拟启动 ===");

    let mut config = load_config(args.config.as_deref())?;
    if let Some(output) = args.output {
        config.output.directory = output;
    }
    if let Some(steps) = args.steps {
        config.run.max_step = steps;
    }
    if let Some(plot_int) = args.plot_int {
        config.run.plot_int = plot_int;
    }
    if let Some(seed) = args.seed {
        config.run.seed = seed;
    }
    if args.no_output {
        config.output.enabled = false;
    }

    let write_output = config.output.enabled && config.run.plot_int > 0;
    let directory = config.output.directory.clone();
    let format = config.output.format;
    let prob_lo = config.domain.prob_lo;

    let mut solver = ThinFilmSolver::from_config(config).context("构建求解器失败")?;

    let mut writer;
    let mut null = NullSink;
    let sink: &mut dyn SnapshotSink = if write_output {
        writer = SnapshotWriter::create(&directory, format)
            .context("无法创建输出目录")?
            .with_origin(prob_lo);
        info!("快照输出目录: {}", directory.display());
        &mut writer
    } else {
        &mut null
    };

    let summary = solver.run(sink).context("模拟失败")?;

    info!("=== 模拟完成 ===");
    info!("总步数: {}, 统计样本: {}", summary.steps, summary.samples);
    info!("模拟时间: {:.6e}", summary.final_time);
    info!(
        "总质量: {:.12}, 高度范围: [{:.6}, {:.6}]",
        summary.total_mass, summary.min_height, summary.max_height
    );
    println!("Run time = {:.6} seconds", summary.elapsed.as_secs_f64());

    Ok(())
}
