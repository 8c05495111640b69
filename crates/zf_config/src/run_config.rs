// crates/zf_config/src/run_config.rs

//! RunConfig - 运行配置（全 f64）
//!
//! 定义一次模拟运行的全部参数，JSON 序列化，加载后立即校验。
//! 数值参数在构建求解器时转换为 `zf_physics::SimulationParams`。

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::presets::vehicle_preset;
use zf_physics::{RoadType, SimulationParams, VehicleClass};

/// 模型选择
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    /// 单类别 LWR
    Single,
    /// 多类别耦合 LWR
    #[default]
    Multiclass,
}

/// 数值参数配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericsConfig {
    /// 空间域长度 [km]
    #[serde(default = "default_domain_length")]
    pub domain_length: f64,

    /// 模拟总时长 [h]
    #[serde(default = "default_simulation_time")]
    pub simulation_time: f64,

    /// 空间步长 [km]
    #[serde(default = "default_dx")]
    pub dx: f64,

    /// 时间步长 [h]；缺省由 CFL 条件自动选择
    #[serde(default)]
    pub dt: Option<f64>,

    /// CFL 安全系数
    #[serde(default = "default_cfl_factor")]
    pub cfl_factor: f64,
}

fn default_domain_length() -> f64 {
    20.0
}
fn default_simulation_time() -> f64 {
    0.5
}
fn default_dx() -> f64 {
    0.1
}
fn default_cfl_factor() -> f64 {
    0.9
}

impl Default for NumericsConfig {
    fn default() -> Self {
        Self {
            domain_length: default_domain_length(),
            simulation_time: default_simulation_time(),
            dx: default_dx(),
            dt: None,
            cfl_factor: default_cfl_factor(),
        }
    }
}

impl NumericsConfig {
    /// 转换为求解器参数（含完整校验）
    pub fn to_params(&self) -> Result<SimulationParams, ConfigError> {
        SimulationParams::new(
            self.domain_length,
            self.simulation_time,
            self.dx,
            self.dt,
            self.cfl_factor,
        )
        .map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

/// 路况配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoadConfig {
    /// 路面类型（查表取基准系数）
    #[serde(default)]
    pub road_type: Option<RoadType>,

    /// 均匀路况覆盖值 ∈ [0, 1]；与 road_type 互斥时以此为准
    #[serde(default)]
    pub uniform_quality: Option<f64>,
}

impl RoadConfig {
    /// 基准路况值；未配置时为 1.0（理想路面）
    pub fn base_quality(&self) -> f64 {
        if let Some(q) = self.uniform_quality {
            q
        } else if let Some(rt) = self.road_type {
            rt.base_quality()
        } else {
            1.0
        }
    }
}

/// 车辆类别配置：内置预设名或完整内联描述符
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VehicleClassConfig {
    /// 预设名称（"moto", "car", "taxi", "bus", "truck"）
    Preset(String),
    /// 内联完整描述符
    Inline(VehicleClass),
}

impl VehicleClassConfig {
    /// 解析为类别描述符
    pub fn resolve(&self) -> Result<VehicleClass, ConfigError> {
        match self {
            Self::Preset(name) => Ok(vehicle_preset(name)?.to_class()),
            Self::Inline(vc) => {
                vc.validate()
                    .map_err(|e| ConfigError::Parse(e.to_string()))?;
                Ok(vc.clone())
            }
        }
    }
}

/// 运行配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// 模型选择
    #[serde(default)]
    pub model: ModelKind,

    /// 数值参数
    #[serde(default)]
    pub numerics: NumericsConfig,

    /// 路况配置
    #[serde(default)]
    pub road: RoadConfig,

    /// 车辆类别列表；缺省为摩托车 + 私家车
    #[serde(default = "default_vehicle_class_configs")]
    pub vehicle_classes: Vec<VehicleClassConfig>,
}

fn default_vehicle_class_configs() -> Vec<VehicleClassConfig> {
    vec![
        VehicleClassConfig::Preset("moto".to_string()),
        VehicleClassConfig::Preset("car".to_string()),
    ]
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            model: ModelKind::default(),
            numerics: NumericsConfig::default(),
            road: RoadConfig::default(),
            vehicle_classes: default_vehicle_class_configs(),
        }
    }
}

impl RunConfig {
    /// 从文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        let config: RunConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 数值参数校验复用求解器侧的前置条件
        self.numerics.to_params()?;

        if let Some(q) = self.road.uniform_quality {
            if !(0.0..=1.0).contains(&q) {
                return Err(ConfigError::invalid_value(
                    "road.uniform_quality",
                    q,
                    "必须落在 [0, 1]",
                ));
            }
        }

        for vc in &self.vehicle_classes {
            vc.resolve()?;
        }

        if self.model == ModelKind::Multiclass && self.vehicle_classes.is_empty() {
            return Err(ConfigError::invalid_value(
                "vehicle_classes",
                "[]",
                "多类别模型至少需要一个车辆类别",
            ));
        }

        Ok(())
    }

    /// 解析全部车辆类别
    pub fn resolve_classes(&self) -> Result<Vec<VehicleClass>, ConfigError> {
        self.vehicle_classes.iter().map(|c| c.resolve()).collect()
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        std::fs::write(path, content).map_err(ConfigError::Io)?;
        Ok(())
    }
}

// ========================================================================
// 测试
// ========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = RunConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.model, ModelKind::Multiclass);
        let classes = config.resolve_classes().unwrap();
        assert_eq!(classes.len(), 2);
    }

    #[test]
    fn test_invalid_cfl_rejected() {
        let mut config = RunConfig::default();
        config.numerics.cfl_factor = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_preset_rejected() {
        let mut config = RunConfig::default();
        config.vehicle_classes = vec![VehicleClassConfig::Preset("hovercraft".to_string())];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_serialize_deserialize() {
        let config = RunConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: RunConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.model, config.model);
        assert_eq!(parsed.numerics.dx, config.numerics.dx);
    }

    #[test]
    fn test_mixed_preset_and_inline_classes() {
        let json = r#"{
            "model": "multiclass",
            "vehicle_classes": [
                "moto",
                { "name": "minibus", "role": "interweaving",
                  "v_max": 70.0, "rho_max": 150.0, "beta": 0.45 }
            ]
        }"#;
        let config: RunConfig = serde_json::from_str(json).unwrap();
        let classes = config.resolve_classes().unwrap();
        assert_eq!(classes[0].name, "moto");
        assert_eq!(classes[1].name, "minibus");
        // 内联类别未写 lambda_min 时取默认值
        assert!((classes[1].lambda_min - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_road_config_quality_resolution() {
        let road = RoadConfig {
            road_type: Some(RoadType::Gravel),
            uniform_quality: None,
        };
        assert!((road.base_quality() - 0.7).abs() < 1e-12);
        // 均匀覆盖值优先于路面类型
        let road = RoadConfig {
            road_type: Some(RoadType::Gravel),
            uniform_quality: Some(0.25),
        };
        assert!((road.base_quality() - 0.25).abs() < 1e-12);
        assert!((RoadConfig::default().base_quality() - 1.0).abs() < 1e-12);
    }
}
