// crates/zf_physics/src/state.rs

//! 状态管理
//!
//! 每个类别一条密度场，形状 `[n_classes][nx]`。密度场只由更新循环
//! 每个时间步修改一次；每步更新后统一钳制非负。

use crate::types::{VehicleClass, VehicleRole};

/// 加权平均速度中的除零保护
pub const DENSITY_EPSILON: f64 = 1e-10;

/// 各类别密度场
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDensityState {
    /// 密度场 `[n_classes][nx]` [veh/km]
    pub rho: Vec<Vec<f64>>,
}

impl ClassDensityState {
    /// 创建全零状态
    pub fn zeros(n_classes: usize, nx: usize) -> Self {
        Self {
            rho: vec![vec![0.0; nx]; n_classes],
        }
    }

    /// 由已有密度数组创建
    pub fn from_rows(rho: Vec<Vec<f64>>) -> Self {
        Self { rho }
    }

    /// 类别数
    #[inline]
    pub fn n_classes(&self) -> usize {
        self.rho.len()
    }

    /// 单元数
    #[inline]
    pub fn nx(&self) -> usize {
        self.rho.first().map_or(0, |r| r.len())
    }

    /// 钳制单个类别的密度非负
    pub fn enforce_positivity(&mut self, class_idx: usize) {
        for r in &mut self.rho[class_idx] {
            if *r < 0.0 {
                *r = 0.0;
            }
        }
    }

    /// 逐单元总密度
    pub fn total_density(&self) -> Vec<f64> {
        let nx = self.nx();
        let mut total = vec![0.0; nx];
        for field in &self.rho {
            for (t, &r) in total.iter_mut().zip(field.iter()) {
                *t += r;
            }
        }
        total
    }

    /// 逐单元穿插类别（摩托车）密度
    ///
    /// 对所有标记为 [`VehicleRole::GapFilling`] 的类别求和。
    pub fn gap_filling_density(&self, classes: &[VehicleClass]) -> Vec<f64> {
        let nx = self.nx();
        let mut moto = vec![0.0; nx];
        for (vc, field) in classes.iter().zip(self.rho.iter()) {
            if vc.role == VehicleRole::GapFilling {
                for (m, &r) in moto.iter_mut().zip(field.iter()) {
                    *m += r;
                }
            }
        }
        moto
    }
}

/// 密度加权平均速度
///
/// $\bar v_j = \sum_i \rho_{i,j} v_{i,j} / \max(\sum_i \rho_{i,j}, \epsilon)$，
/// NaN 以 0 代替。
pub fn density_weighted_velocity(rho: &[Vec<f64>], velocity: &[Vec<f64>]) -> Vec<f64> {
    let nx = rho.first().map_or(0, |r| r.len());
    let mut avg = vec![0.0; nx];
    for j in 0..nx {
        let mut weighted = 0.0;
        let mut total = 0.0;
        for (field, vel) in rho.iter().zip(velocity.iter()) {
            weighted += field[j] * vel[j];
            total += field[j];
        }
        let v = weighted / total.max(DENSITY_EPSILON);
        avg[j] = if v.is_nan() { 0.0 } else { v };
    }
    avg
}

// ========================================================================
// 测试
// ========================================================================
