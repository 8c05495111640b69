// crates/zf_physics/src/types.rs

//! 核心类型定义
//!
//! - [`VehicleRole`]: 车辆类别的行为角色（显式标签，取代按下标约定）
//! - [`VehicleClass`]: 不可变的车辆类别描述符
//! - [`SimulationParams`]: 模拟参数，构造时立即校验

use serde::{Deserialize, Serialize};
use zf_foundation::{ZfError, ZfResult};

/// 车辆类别的行为角色
///
/// 原始模型以"下标 0 即摩托车"的隐式约定区分类别，脆弱且易错。
/// 这里改为显式角色标签，在配置阶段绑定到每个类别描述符上。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleRole {
    /// 穿插类别（摩托车）：密集交通中借车缝提速
    GapFilling,
    /// 受蛇行影响的类别：被摩托车穿插拖慢
    #[default]
    Interweaving,
    /// 中性类别：不参与调制耦合
    Neutral,
}

impl std::fmt::Display for VehicleRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GapFilling => write!(f, "gap_filling"),
            Self::Interweaving => write!(f, "interweaving"),
            Self::Neutral => write!(f, "neutral"),
        }
    }
}

/// 车辆类别描述符
///
/// 模型构造时从配置创建一次，之后不再修改。
///
/// # 字段单位
///
/// - `v_max`: km/h
/// - `rho_max`: veh/km
/// - `eta`: 穿插系数 (0-1)，仅对 [`VehicleRole::GapFilling`] 有意义
/// - `beta`: 蛇行敏感系数 (0-1)，仅对非穿插角色有意义
/// - `lambda_min`: 最差路面下的速度系数下限 (0-1)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleClass {
    /// 类别名称（如 "moto", "car", "truck"）
    pub name: String,
    /// 行为角色
    pub role: VehicleRole,
    /// 自由流最大速度 [km/h]
    pub v_max: f64,
    /// 最大密度 [veh/km]
    pub rho_max: f64,
    /// 穿插系数
    #[serde(default)]
    pub eta: f64,
    /// 蛇行敏感系数
    #[serde(default)]
    pub beta: f64,
    /// 路况系数下限
    #[serde(default = "default_lambda_min")]
    pub lambda_min: f64,
}

fn default_lambda_min() -> f64 {
    0.6
}

impl VehicleClass {
    /// 创建类别描述符并校验参数
    pub fn new(
        name: impl Into<String>,
        role: VehicleRole,
        v_max: f64,
        rho_max: f64,
        eta: f64,
        beta: f64,
        lambda_min: f64,
    ) -> ZfResult<Self> {
        let vc = Self {
            name: name.into(),
            role,
            v_max,
            rho_max,
            eta,
            beta,
            lambda_min,
        };
        vc.validate()?;
        Ok(vc)
    }

    /// 穿插类别的便捷构造（eta 生效，beta 置零）
    pub fn gap_filling(
        name: impl Into<String>,
        v_max: f64,
        rho_max: f64,
        eta: f64,
        lambda_min: f64,
    ) -> ZfResult<Self> {
        Self::new(name, VehicleRole::GapFilling, v_max, rho_max, eta, 0.0, lambda_min)
    }

    /// 受蛇行影响类别的便捷构造（beta 生效，eta 置零）
    pub fn interweaving(
        name: impl Into<String>,
        v_max: f64,
        rho_max: f64,
        beta: f64,
        lambda_min: f64,
    ) -> ZfResult<Self> {
        Self::new(name, VehicleRole::Interweaving, v_max, rho_max, 0.0, beta, lambda_min)
    }

    /// 校验类别参数
    pub fn validate(&self) -> ZfResult<()> {
        ZfError::check_positive("v_max", self.v_max)?;
        ZfError::check_positive("rho_max", self.rho_max)?;
        ZfError::check_range("eta", self.eta, 0.0, 1.0)?;
        ZfError::check_range("beta", self.beta, 0.0, 1.0)?;
        ZfError::check_range("lambda_min", self.lambda_min, 0.0, 1.0)?;
        Ok(())
    }

    /// 临界密度 ρ_c = ρ_max / 2（本类别流量最大点）
    #[inline]
    pub fn critical_density(&self) -> f64 {
        self.rho_max / 2.0
    }
}

/// 模拟参数
///
/// 所有前置条件在 [`SimulationParams::new`] 中立即校验，
/// 不合法的配置在分配任何网格之前即返回错误。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationParams {
    /// 空间域长度 [km]
    pub domain_length: f64,
    /// 模拟总时长 [h]
    pub simulation_time: f64,
    /// 空间步长 [km]
    pub dx: f64,
    /// 时间步长 [h]；None 时由 CFL 条件自动选择
    #[serde(default)]
    pub dt: Option<f64>,
    /// CFL 安全系数 (0, 1]
    #[serde(default = "default_cfl_factor")]
    pub cfl_factor: f64,
}

fn default_cfl_factor() -> f64 {
    0.9
}

impl SimulationParams {
    /// 创建并校验模拟参数
    pub fn new(
        domain_length: f64,
        simulation_time: f64,
        dx: f64,
        dt: Option<f64>,
        cfl_factor: f64,
    ) -> ZfResult<Self> {
        let params = Self {
            domain_length,
            simulation_time,
            dx,
            dt,
            cfl_factor,
        };
        params.validate()?;
        Ok(params)
    }

    /// 校验参数
    pub fn validate(&self) -> ZfResult<()> {
        ZfError::check_positive("domain_length", self.domain_length)?;
        ZfError::check_positive("simulation_time", self.simulation_time)?;
        ZfError::check_positive("dx", self.dx)?;
        if let Some(dt) = self.dt {
            ZfError::check_positive("dt", dt)?;
        }
        // cfl_factor 必须落在 (0, 1]
        if !self.cfl_factor.is_finite() || self.cfl_factor <= 0.0 || self.cfl_factor > 1.0 {
            return Err(ZfError::out_of_range(
                "cfl_factor",
                self.cfl_factor,
                f64::MIN_POSITIVE,
                1.0,
            ));
        }
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
    fn test_vehicle_class_valid() {
        let vc = VehicleClass::gap_filling("moto", 90.0, 200.0, 0.3, 0.8).unwrap();
        assert_eq!(vc.role, VehicleRole::GapFilling);
        assert!((vc.critical_density() - 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_vehicle_class_rejects_nonpositive_rho_max() {
        assert!(VehicleClass::gap_filling("moto", 90.0, 0.0, 0.3, 0.8).is_err());
        assert!(VehicleClass::gap_filling("moto", 90.0, -1.0, 0.3, 0.8).is_err());
    }

    #[test]
    fn test_vehicle_class_rejects_out_of_range_coefficients() {
        assert!(VehicleClass::gap_filling("moto", 90.0, 200.0, 1.5, 0.8).is_err());
        assert!(VehicleClass::interweaving("car", 100.0, 180.0, -0.1, 0.6).is_err());
        assert!(VehicleClass::new("x", VehicleRole::Neutral, 80.0, 120.0, 0.0, 0.0, 1.2).is_err());
    }

    #[test]
    fn test_simulation_params_valid() {
        let p = SimulationParams::new(20.0, 0.5, 0.1, None, 0.9).unwrap();
        assert_eq!(p.dt, None);
    }

    #[test]
    fn test_simulation_params_rejects_bad_cfl() {
        assert!(SimulationParams::new(20.0, 0.5, 0.1, None, 0.0).is_err());
        assert!(SimulationParams::new(20.0, 0.5, 0.1, None, 1.1).is_err());
        // 上界 1.0 本身合法
        assert!(SimulationParams::new(20.0, 0.5, 0.1, None, 1.0).is_ok());
    }

    #[test]
    fn test_simulation_params_rejects_nonpositive_steps() {
        assert!(SimulationParams::new(0.0, 0.5, 0.1, None, 0.9).is_err());
        assert!(SimulationParams::new(20.0, -0.5, 0.1, None, 0.9).is_err());
        assert!(SimulationParams::new(20.0, 0.5, 0.0, None, 0.9).is_err());
        assert!(SimulationParams::new(20.0, 0.5, 0.1, Some(0.0), 0.9).is_err());
    }

    #[test]
    fn test_role_serde_roundtrip() {
        let json = serde_json::to_string(&VehicleRole::GapFilling).unwrap();
        assert_eq!(json, "\"gap_filling\"");
        let role: VehicleRole = serde_json::from_str(&json).unwrap();
        assert_eq!(role, VehicleRole::GapFilling);
    }
}
