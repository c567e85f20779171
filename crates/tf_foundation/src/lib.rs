// crates/tf_foundation/src/lib.rs

//! ThinFilm Foundation Layer
//!
//! 基础层，提供整个项目共享的最小抽象。
//!
//! # 模块概览
//!
//! - [`error`]: 统一错误类型 `TfError` / `TfResult`
//! - [`float`]: Kahan 补偿求和等数值工具
//!
//! # 示例
//!
//! ```
//! use tf_foundation::{KahanSum, TfError, TfResult};
//!
//! fn total(values: &[f64]) -> TfResult<f64> {
//!     if values.is_empty() {
//!         return Err(TfError::invalid_input("空数组"));
//!     }
//!     Ok(KahanSum::sum_iter(values.iter().copied()))
//! }
//!
//! assert_eq!(total(&[1.0, 2.0]).unwrap(), 3.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod float;

// 重导出常用类型
pub use error::{TfError, TfResult};
pub use float::KahanSum;
