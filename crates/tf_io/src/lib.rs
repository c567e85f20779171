// crates/tf_io/src/lib.rs

//! ThinFilm IO 模块
//!
//! 将物理层产生的快照写到磁盘。
//!
//! # 模块
//!
//! - [`snapshot`]: 快照写出器 (JSON / CSV)
//! - [`error`]: IO 错误类型
//!
//! # 使用示例
//!
//! ```rust,ignore
//! use tf_io::SnapshotWriter;
//! use tf_config::OutputFormat;
//!
//! let mut writer = SnapshotWriter::create("output", OutputFormat::Json)?;
//! solver.run(&mut writer)?;
//! ```

pub mod error;
pub mod snapshot;

pub use error::{IoError, IoResult};
pub use snapshot::SnapshotWriter;
