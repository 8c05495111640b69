// crates/zf_physics/src/modulation.rs

//! 类别调制函数库
//!
//! 纯函数集合，从摩托车密度比计算各类别的速度乘子，以及路况系数查表：
//!
//! - 穿插增速（gap-filling）: $f = 1 + \gamma \, \rho_m / \rho_{max,m}$
//! - 蛇行减速（interweaving）: $f = \max(0.1,\, 1 - \beta \, \rho_m / \rho_{max,m})$
//! - 路况系数：按路面类型查基准系数，叠加类别修正后钳制到 [0.1, 1.0]
//!
//! 0.1 下限防止极端摩托车密度把其它类别的速度压到零或负值。

use crate::types::VehicleRole;
use serde::{Deserialize, Serialize};

/// 蛇行乘子下限
pub const INTERWEAVING_FLOOR: f64 = 0.1;

/// 穿插增速乘子
///
/// # 参数
/// - `rho_moto`: 摩托车密度 [veh/km]
/// - `rho_max_moto`: 摩托车最大密度 [veh/km]
/// - `gamma`: 穿插系数，钳制到 [0, 1]
#[inline]
pub fn gap_filling_modulation(rho_moto: f64, rho_max_moto: f64, gamma: f64) -> f64 {
    let gamma = gamma.clamp(0.0, 1.0);
    1.0 + gamma * (rho_moto / rho_max_moto)
}

/// 蛇行减速乘子
///
/// # 参数
/// - `rho_moto`: 摩托车密度 [veh/km]
/// - `rho_max_moto`: 摩托车最大密度 [veh/km]
/// - `beta`: 蛇行敏感系数，钳制到 [0, 1]
#[inline]
pub fn interweaving_modulation(rho_moto: f64, rho_max_moto: f64, beta: f64) -> f64 {
    let beta = beta.clamp(0.0, 1.0);
    (1.0 - beta * (rho_moto / rho_max_moto)).max(INTERWEAVING_FLOOR)
}

/// 按角色计算调制乘子
///
/// 中性角色恒为 1。
#[inline]
pub fn role_modulation(
    role: VehicleRole,
    rho_moto: f64,
    rho_max: f64,
    eta: f64,
    beta: f64,
) -> f64 {
    match role {
        VehicleRole::GapFilling => gap_filling_modulation(rho_moto, rho_max, eta),
        VehicleRole::Interweaving => interweaving_modulation(rho_moto, rho_max, beta),
        VehicleRole::Neutral => 1.0,
    }
}

/// 类别路况缩放系数
///
/// $\lambda_i(x) = \lambda_{min} + (1 - \lambda_{min}) \cdot q(x)$
///
/// 其中 `base_quality` 为外部路况函数在 x 处的值（默认均匀 1.0）。
#[inline]
pub fn class_quality_factor(lambda_min: f64, base_quality: f64) -> f64 {
    lambda_min + (1.0 - lambda_min) * base_quality
}

// ========================================================================
// 路面类型查表
// ========================================================================

/// 路面类型
///
/// 基准系数来自贝宁实测标定，作为启动时加载的不可变配置使用。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoadType {
    /// 优质沥青路面
    BitumenGood,
    /// 铺装路面（石块/混凝土块）
    Paved,
    /// 劣化沥青路面（坑洼）
    BitumenPoor,
    /// 碎石路面
    Gravel,
    /// 土路
    Dirt,
    /// 严重损毁路面
    Damaged,
}

impl RoadType {
    /// 基准路况系数
    pub fn base_quality(&self) -> f64 {
        match self {
            Self::BitumenGood => 1.0,
            Self::Paved => 0.9,
            Self::BitumenPoor => 0.8,
            Self::Gravel => 0.7,
            Self::Dirt => 0.5,
            Self::Damaged => 0.4,
        }
    }

    /// 全部路面类型
    pub fn all() -> &'static [RoadType] {
        &[
            Self::BitumenGood,
            Self::Paved,
            Self::BitumenPoor,
            Self::Gravel,
            Self::Dirt,
            Self::Damaged,
        ]
    }

    /// 路面描述
    pub fn description(&self) -> &'static str {
        match self {
            Self::BitumenGood => "Good quality asphalt",
            Self::Paved => "Paved road (cobblestone or concrete blocks)",
            Self::BitumenPoor => "Deteriorated asphalt with potholes",
            Self::Gravel => "Gravel or crushed stone surface",
            Self::Dirt => "Dirt or earth road",
            Self::Damaged => "Severely damaged road with major potholes",
        }
    }
}

/// 路况系数查表
///
/// 按路面类型取基准系数，叠加角色修正（穿插类别受损最轻，
/// 重型车辆受损最重），最终钳制到 [0.1, 1.0]。
pub fn road_quality_coefficient(road_type: RoadType, role: VehicleRole) -> f64 {
    let base = road_type.base_quality();
    let modifier = match role {
        VehicleRole::GapFilling => 0.2,
        VehicleRole::Interweaving => 0.0,
        VehicleRole::Neutral => -0.1,
    };
    (base + modifier).clamp(0.1, 1.0)
}

// ========================================================================
// 测试
// ========================================================================
