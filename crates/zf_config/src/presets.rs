// crates/zf_config/src/presets.rs

//! 车辆类别预设表
//!
//! 贝宁城市路网实测标定的五类车辆参数，启动时构建一次，之后只读。
//! 摩托车 (zémidjan) 是唯一的穿插角色，密集交通中借车缝提速；
//! 其余类别按蛇行敏感度递增排列。

use crate::error::ConfigError;
use zf_physics::VehicleClass;

/// 内置车辆类别预设
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehiclePreset {
    /// 摩托车出租 (zémidjan)
    Moto,
    /// 私家车
    Car,
    /// 出租车
    Taxi,
    /// 公交车
    Bus,
    /// 货车
    Truck,
}

impl VehiclePreset {
    /// 全部预设
    pub fn all() -> &'static [VehiclePreset] {
        &[Self::Moto, Self::Car, Self::Taxi, Self::Bus, Self::Truck]
    }

    /// 预设名称
    pub fn name(&self) -> &'static str {
        match self {
            Self::Moto => "moto",
            Self::Car => "car",
            Self::Taxi => "taxi",
            Self::Bus => "bus",
            Self::Truck => "truck",
        }
    }

    /// 构建类别描述符
    ///
    /// 预设参数均在合法范围内，构造不会失败。
    pub fn to_class(self) -> VehicleClass {
        let vc = match self {
            Self::Moto => VehicleClass::gap_filling("moto", 90.0, 200.0, 0.3, 0.8),
            Self::Car => VehicleClass::interweaving("car", 100.0, 180.0, 0.3, 0.6),
            Self::Taxi => VehicleClass::interweaving("taxi", 95.0, 180.0, 0.4, 0.65),
            Self::Bus => VehicleClass::interweaving("bus", 85.0, 140.0, 0.5, 0.55),
            Self::Truck => VehicleClass::interweaving("truck", 80.0, 120.0, 0.6, 0.5),
        };
        vc.unwrap()
    }
}

/// 按名称查找预设
pub fn vehicle_preset(name: &str) -> Result<VehiclePreset, ConfigError> {
    VehiclePreset::all()
        .iter()
        .copied()
        .find(|p| p.name() == name)
        .ok_or_else(|| ConfigError::UnknownPreset(name.to_string()))
}

/// 默认多类别组合：摩托车 + 私家车
pub fn default_vehicle_classes() -> Vec<VehicleClass> {
    vec![VehiclePreset::Moto.to_class(), VehiclePreset::Car.to_class()]
}

// ========================================================================
// 测试
// ========================================================================
