// crates/tf_physics/src/noise.rs

//! 面心噪声源
//!
//! 每步为每个面抽取独立同分布的正态样本，方差由配置给定。
//! 样本在通量引擎内部再按 √(NoiseConst·h³/(dt·dV)) 缩放。
//!
//! 周期轴上，域高侧边界面与低侧边界面是同一个物理面，
//! 抽样后将低侧样本复制到高侧，保证每个面的通量被两侧单元以相反符号计数。

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::field::FaceField;

/// 面心噪声源
pub trait NoiseSource: Send {
    /// 为一个面场填充方差为 `variance` 的独立正态样本
    fn fill(&mut self, faces: &mut FaceField, variance: f64);

    /// 名称（日志用）
    fn name(&self) -> &'static str;
}

/// 高斯噪声源
///
/// 单一随机流顺序填充，保证给定种子的结果与线程数无关。
#[derive(Debug, Clone)]
pub struct GaussianNoise {
    rng: StdRng,
}

impl GaussianNoise {
    /// 以种子创建
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl NoiseSource for GaussianNoise {
    fn fill(&mut self, faces: &mut FaceField, variance: f64) {
        let scale = variance.sqrt();
        for v in faces.as_mut_slice() {
            let z: f64 = self.rng.sample(StandardNormal);
            *v = scale * z;
        }
    }

    fn name(&self) -> &'static str {
        "gaussian"
    }
}

/// 零噪声源（确定性运行）
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroNoise;

impl NoiseSource for ZeroNoise {
    fn fill(&mut self, faces: &mut FaceField, _variance: f64) {
        faces.fill(0.0);
    }

    fn name(&self) -> &'static str {
        "zero"
    }
}

/// 为两个轴的面场抽取本步噪声
pub fn draw_face_noise(
    source: &mut dyn NoiseSource,
    faces: &mut [FaceField; 2],
    variance: f64,
    periodic: [bool; 2],
) {
    for (axis, f) in faces.iter_mut().enumerate() {
        source.fill(f, variance);
        if periodic[axis] {
            sync_periodic_faces(f);
        }
    }
}

/// 周期轴上令高侧边界面样本等于低侧边界面样本
pub fn sync_periodic_faces(faces: &mut FaceField) {
    let axis = faces.axis();
    let [n0, n1] = faces.shape();
    if axis == 0 {
        for j in 0..n1 {
            let v = faces.get(0, j);
            faces.set(n0 - 1, j, v);
        }
    } else {
        for i in 0..n0 {
            let v = faces.get(i, 0);
            faces.set(i, n1 - 1, v);
        }
    }
}
