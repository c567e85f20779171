// apps/tf_cli/src/commands/mod.rs

//! 子命令

pub mod info;
pub mod run;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use tf_config::ThinFilmConfig;

/// 加载配置；未指定路径时使用默认配置
pub fn load_config(path: Option<&Path>) -> Result<ThinFilmConfig> {
    match path {
        Some(p) => ThinFilmConfig::from_file(p)
            .with_context(|| format!("无法加载配置文件 {}", p.display())),
        None => Ok(ThinFilmConfig::default()),
    }
}
