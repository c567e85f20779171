// crates/tf_physics/src/output.rs

//! 快照接口
//!
//! 物理层只描述快照内容；序列化由实现 [`SnapshotSink`] 的外部写出器完成。

use serde::Serialize;
use tf_foundation::TfResult;

/// 快照类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotKind {
    /// 高度场
    Height,
    /// 运行平均方差场
    Variance,
    /// 运行平均相关（2D 为整场，1D 为曲线）
    Correlation,
}

impl SnapshotKind {
    /// 文件名前缀
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Height => "plt",
            Self::Variance => "var",
            Self::Correlation => "star",
        }
    }

    /// 变量名
    pub fn variable(self) -> &'static str {
        match self {
            Self::Height => "height",
            Self::Variance => "var",
            Self::Correlation => "star",
        }
    }
}

/// 一次快照
#[derive(Debug, Clone, Serialize)]
pub struct FieldSnapshot {
    /// 类型
    pub kind: SnapshotKind,
    /// 步数
    pub step: usize,
    /// 模拟时间
    pub time: f64,
    /// 数据形状 [nx, ny]，1D 相关曲线为 [n, 1]
    pub shape: [usize; 2],
    /// 网格间距
    pub spacing: [f64; 2],
    /// 行优先数据（j 外层）
    pub values: Vec<f64>,
}

impl FieldSnapshot {
    /// 文件名主干，如 `plt00000100`
    pub fn file_stem(&self) -> String {
        format!("{}{:08}", self.kind.prefix(), self.step)
    }
}

/// 快照写出器
pub trait SnapshotSink {
    /// 写出一次快照
    fn write(&mut self, snapshot: &FieldSnapshot) -> TfResult<()>;
}

/// 丢弃所有快照
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl SnapshotSink for NullSink {
    fn write(&mut self, _snapshot: &FieldSnapshot) -> TfResult<()> {
        Ok(())
    }
}

/// 内存中收集快照（测试与嵌入使用）
impl SnapshotSink for Vec<FieldSnapshot> {
    fn write(&mut self, snapshot: &FieldSnapshot) -> TfResult<()> {
        self.push(snapshot.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_stem() {
        let snap = FieldSnapshot {
            kind: SnapshotKind::Correlation,
            step: 120,
            time: 0.5,
            shape: [2, 1],
            spacing: [0.1, 0.1],
            values: vec![0.0, 1.0],
        };
        assert_eq!(snap.file_stem(), "star00000120");
        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"kind\":\"correlation\""));
    }
}
