// crates/tf_io/src/snapshot.rs

//! 快照写出器
//!
//! 每个快照一个文件，文件名为 `<前缀><步数:08>.<扩展名>`：
//!
//! | 前缀 | 内容 |
//! |------|------|
//! | plt | 高度场 |
//! | var | 运行平均方差 |
//! | star | 运行平均相关 |
//!
//! # CSV 格式
//!
//! ```text
//! # kind=height step=100 time=6.25e-5 nx=8 ny=8 dx=0.1 dy=0.1
//! i,j,x,y,height
//! 0,0,0.05,0.05,1.0000001
//! ...
//! ```

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use tf_config::OutputFormat;
use tf_foundation::TfResult;
use tf_physics::{FieldSnapshot, SnapshotSink};
use tracing::debug;

use crate::error::{IoError, IoResult};

/// 快照写出器
#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    directory: PathBuf,
    format: OutputFormat,
    prob_lo: [f64; 2],
    written: usize,
}

impl SnapshotWriter {
    /// 创建写出器，必要时创建输出目录
    pub fn create(directory: impl Into<PathBuf>, format: OutputFormat) -> IoResult<Self> {
        let directory = directory.into();
        fs::create_dir_all(&directory).map_err(|source| IoError::CreateDir {
            path: directory.clone(),
            source,
        })?;
        Ok(Self {
            directory,
            format,
            prob_lo: [0.0, 0.0],
            written: 0,
        })
    }

    /// 设置物理域下界（CSV 坐标列使用）
    pub fn with_origin(mut self, prob_lo: [f64; 2]) -> Self {
        self.prob_lo = prob_lo;
        self
    }

    /// 已写出快照数
    pub fn written(&self) -> usize {
        self.written
    }

    /// 快照对应的文件路径
    pub fn path_for(&self, snapshot: &FieldSnapshot) -> PathBuf {
        self.directory
            .join(format!("{}.{}", snapshot.file_stem(), self.format.extension()))
    }

    /// 写出一次快照，返回文件路径
    pub fn write_snapshot(&mut self, snapshot: &FieldSnapshot) -> IoResult<PathBuf> {
        let expected = snapshot.shape[0] * snapshot.shape[1];
        if snapshot.values.len() != expected {
            return Err(IoError::ShapeMismatch {
                expected,
                actual: snapshot.values.len(),
            });
        }

        let path = self.path_for(snapshot);
        let file = File::create(&path).map_err(|source| IoError::Write {
            path: path.clone(),
            source,
        })?;
        let mut writer = BufWriter::new(file);

        match self.format {
            OutputFormat::Json => serde_json::to_writer(&mut writer, snapshot).map_err(|e| {
                IoError::Serialize {
                    path: path.clone(),
                    message: e.to_string(),
                }
            })?,
            OutputFormat::Csv => write_csv(&mut writer, snapshot, self.prob_lo).map_err(
                |source| IoError::Write {
                    path: path.clone(),
                    source,
                },
            )?,
        }
        writer.flush().map_err(|source| IoError::Write {
            path: path.clone(),
            source,
        })?;

        self.written += 1;
        debug!("写出快照 {}", path.display());
        Ok(path)
    }
}

impl SnapshotSink for SnapshotWriter {
    fn write(&mut self, snapshot: &FieldSnapshot) -> TfResult<()> {
        self.write_snapshot(snapshot)?;
        Ok(())
    }
}

fn write_csv<W: Write>(w: &mut W, snap: &FieldSnapshot, prob_lo: [f64; 2]) -> std::io::Result<()> {
    let [nx, ny] = snap.shape;
    let [dx, dy] = snap.spacing;
    writeln!(
        w,
        "# kind={} step={} time={:e} nx={} ny={} dx={} dy={}",
        snap.kind.variable(),
        snap.step,
        snap.time,
        nx,
        ny,
        dx,
        dy
    )?;
    writeln!(w, "i,j,x,y,{}", snap.kind.variable())?;
    for j in 0..ny {
        let y = prob_lo[1] + (j as f64 + 0.5) * dy;
        for i in 0..nx {
            let x = prob_lo[0] + (i as f64 + 0.5) * dx;
            writeln!(w, "{},{},{},{},{:e}", i, j, x, y, snap.values[j * nx + i])?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tf_physics::SnapshotKind;

    fn snapshot(kind: SnapshotKind, step: usize) -> FieldSnapshot {
        FieldSnapshot {
            kind,
            step,
            time: 0.25,
            shape: [2, 2],
            spacing: [0.5, 0.5],
            values: vec![1.0, 2.0, 3.0, 4.0],
        }
    }

    #[test]
    fn test_json_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = SnapshotWriter::create(dir.path().join("out"), OutputFormat::Json).unwrap();
        let path = writer.write_snapshot(&snapshot(SnapshotKind::Height, 40)).unwrap();

        assert_eq!(path.file_name().unwrap(), "plt00000040.json");
        let text = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["step"], 40);
        assert_eq!(value["kind"], "height");
        assert_eq!(value["values"].as_array().unwrap().len(), 4);
        assert_eq!(writer.written(), 1);
    }

    #[test]
    fn test_csv_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = SnapshotWriter::create(dir.path(), OutputFormat::Csv).unwrap();
        let path = writer.write_snapshot(&snapshot(SnapshotKind::Variance, 3)).unwrap();

        assert_eq!(path.file_name().unwrap(), "var00000003.csv");
        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2 + 4);
        assert!(lines[0].starts_with("# kind=var step=3"));
        assert_eq!(lines[1], "i,j,x,y,var");
        assert!(lines[5].starts_with("1,1,0.75,0.75,"));
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = SnapshotWriter::create(dir.path(), OutputFormat::Json).unwrap();
        let mut snap = snapshot(SnapshotKind::Correlation, 0);
        snap.values.pop();
        assert!(matches!(
            writer.write_snapshot(&snap),
            Err(IoError::ShapeMismatch { expected: 4, actual: 3 })
        ));
    }

    #[test]
    fn test_sink_interface() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = SnapshotWriter::create(dir.path(), OutputFormat::Json).unwrap();
        let sink: &mut dyn SnapshotSink = &mut writer;
        sink.write(&snapshot(SnapshotKind::Correlation, 8)).unwrap();
        assert!(dir.path().join("star00000008.json").exists());
    }
}
