// crates/zf_physics/src/fundamental.rs

//! Greenshields 基本图
//!
//! 描述密度-速度-流量三者的基本关系：
//!
//! $$ v(\rho) = v_{max} \max(0,\, 1 - \rho/\rho_{max}) $$
//! $$ q(\rho) = \rho \, v(\rho) $$
//!
//! 流量在临界密度 $\rho_c = \rho_{max}/2$ 处取最大值（道路容量）
//! $q_{max} = v_{max} \rho_{max} / 4$。
//!
//! 运动学波速为通量导数 $q'(\rho) = v_{max}(1 - 2\rho/\rho_{max})$，
//! 其绝对值在 $\rho = 0$ 或 $\rho = \rho_{max}$ 处达到 $v_{max}$。

/// Greenshields 基本图
///
/// 单类别速度律的纯函数载体。道路质量修正通过构造一个有效
/// `v_max` 的新实例表达，而非临时改写字段（避免重入隐患）。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FundamentalDiagram {
    /// 自由流最大速度 [km/h]
    pub v_max: f64,
    /// 最大密度 [veh/km]
    pub rho_max: f64,
}

impl FundamentalDiagram {
    /// 创建基本图
    pub fn new(v_max: f64, rho_max: f64) -> Self {
        Self { v_max, rho_max }
    }

    /// 应用标量道路质量修正，返回有效速度下的新基本图
    ///
    /// 纯函数替代原始实现中"临时覆写再恢复 v_max"的共享可变模式。
    pub fn with_quality(&self, quality: f64) -> Self {
        Self {
            v_max: self.v_max * quality,
            rho_max: self.rho_max,
        }
    }

    /// 速度-密度关系 v(ρ) = v_max·max(0, 1 − ρ/ρ_max)
    #[inline]
    pub fn speed(&self, rho: f64) -> f64 {
        self.v_max * (1.0 - rho / self.rho_max).max(0.0)
    }

    /// 流量-密度关系 q(ρ) = ρ·v(ρ)
    #[inline]
    pub fn flow(&self, rho: f64) -> f64 {
        rho * self.speed(rho)
    }

    /// 临界密度 ρ_c = ρ_max / 2
    #[inline]
    pub fn critical_density(&self) -> f64 {
        self.rho_max / 2.0
    }

    /// 道路容量（最大流量）q_max = v_max·ρ_max / 4
    #[inline]
    pub fn capacity(&self) -> f64 {
        self.flow(self.critical_density())
    }

    /// 运动学波速 q'(ρ) = v_max·(1 − 2ρ/ρ_max)
    #[inline]
    pub fn wave_speed(&self, rho: f64) -> f64 {
        self.v_max * (1.0 - 2.0 * rho / self.rho_max)
    }
}

// ========================================================================
// 测试
// ========================================================================
