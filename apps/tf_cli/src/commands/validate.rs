// apps/tf_cli/src/commands/validate.rs

//! 配置验证命令
//!
//! 检查配置文件格式、参数范围与边界组合。

use anyhow::{bail, Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use tf_config::ThinFilmConfig;
use tf_physics::BoundaryPolicy;
use tracing::{error, info, warn};

/// 验证参数
#[derive(Args)]
pub struct ValidateArgs {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 严格模式（警告也视为错误）
    #[arg(long)]
    pub strict: bool,
}

/// 验证结果
#[derive(Default)]
struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    fn is_ok_strict(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

/// 执行验证命令
pub fn execute(args: ValidateArgs) -> Result<()> {
    info!("=== ThinFilm 配置验证 ===");

    let Some(config_path) = &args.config else {
        println!("用法: tf_cli validate --config <配置文件> [--strict]");
        return Ok(());
    };

    let mut result = ValidationResult::default();
    validate_config(config_path, &mut result)?;
    print_validation_result(&result, args.strict)
}

fn validate_config(path: &Path, result: &mut ValidationResult) -> Result<()> {
    println!("\n检查配置文件: {}", path.display());

    if !path.exists() {
        result.add_error(format!("配置文件不存在: {}", path.display()));
        return Ok(());
    }

    let content = std::fs::read_to_string(path).context("无法读取配置文件")?;

    let config: ThinFilmConfig = match serde_json::from_str(&content) {
        Ok(c) => c,
        Err(e) => {
            result.add_error(format!("JSON 解析错误: {}", e));
            return Ok(());
        }
    };
    println!("  ✓ 配置文件格式有效");

    check_config(&config, result);
    Ok(())
}

fn check_config(config: &ThinFilmConfig, result: &mut ValidationResult) {
    if let Err(e) = config.validate() {
        result.add_error(e.to_string());
    }
    if let Err(e) = BoundaryPolicy::from_config(config) {
        result.add_error(e.to_string());
    }

    let run = &config.run;
    if run.n_steps_skip >= run.max_step {
        result.add_warning(format!(
            "预热步数 {} 不小于最大步数 {}，不会收集任何统计样本",
            run.n_steps_skip, run.max_step
        ));
    }
    if run.plot_int == 0 && config.output.enabled {
        result.add_warning("plot_int = 0，不会写出任何快照");
    }
    if config.physics.temperature == 0.0 || config.physics.variance_coef == 0.0 {
        result.add_warning("噪声项为零，运行是确定性的");
    }
    if run.dt_fraction > 0.5 {
        result.add_warning(format!("dt_fraction = {} 较大，显式格式可能不稳定", run.dt_fraction));
    }
}

fn print_validation_result(result: &ValidationResult, strict: bool) -> Result<()> {
    println!("\n=== 验证结果 ===");

    if !result.errors.is_empty() {
        println!("\n错误 ({}):", result.errors.len());
        for err in &result.errors {
            error!("  ✗ {}", err);
            println!("  ✗ {}", err);
        }
    }

    if !result.warnings.is_empty() {
        println!("\n警告 ({}):", result.warnings.len());
        for warning in &result.warnings {
            warn!("  ⚠ {}", warning);
            println!("  ⚠ {}", warning);
        }
    }

    let success = if strict {
        result.is_ok_strict()
    } else {
        result.is_ok()
    };

    if success {
        println!("\n✓ 验证通过");
        Ok(())
    } else {
        println!("\n✗ 验证失败");
        bail!(
            "验证失败：发现 {} 个错误，{} 个警告",
            result.errors.len(),
            result.warnings.len()
        )
    }
}
