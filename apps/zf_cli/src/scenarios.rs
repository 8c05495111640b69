// apps/zf_cli/src/scenarios.rs

//! 内置模拟场景
//!
//! 每个场景定义一条归一化占有率剖面 occ(x) ∈ [0, 1]，由 run 命令
//! 按类别最大密度缩放为初始密度场；劣化路段场景额外自带一条
//! 逐位置路况剖面。间断、包峰与劣化区间均以域长的比例定位，
//! 不依赖具体公里数。

use anyhow::{bail, Result};

/// 劣化路段路况系数
const DEGRADED_QUALITY: f64 = 0.6;

/// 内置场景
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    /// 红灯放行：上游高密度、下游低密度 → 稀疏波
    RedLight,
    /// 拥堵形成：上游低密度、下游高密度 → 激波
    TrafficJam,
    /// 高斯密度包：局部扰动的传播与耗散
    GaussianBump,
    /// 均匀中等密度：平衡态健全性检查
    Uniform,
    /// 劣化路段：域中段路况 0.6、其余 1.0，各类别按 lambda_min 减速
    DegradedRoad,
}

impl Scenario {
    /// 全部场景
    pub fn all() -> &'static [Scenario] {
        &[
            Self::RedLight,
            Self::TrafficJam,
            Self::GaussianBump,
            Self::Uniform,
            Self::DegradedRoad,
        ]
    }

    /// 场景名称
    pub fn name(&self) -> &'static str {
        match self {
            Self::RedLight => "red-light",
            Self::TrafficJam => "traffic-jam",
            Self::GaussianBump => "gaussian-bump",
            Self::Uniform => "uniform",
            Self::DegradedRoad => "degraded-road",
        }
    }

    /// 场景描述
    pub fn description(&self) -> &'static str {
        match self {
            Self::RedLight => "Queue release at a traffic light (rarefaction wave)",
            Self::TrafficJam => "Free flow running into congestion (shock wave)",
            Self::GaussianBump => "Localized density perturbation",
            Self::Uniform => "Uniform medium density (equilibrium check)",
            Self::DegradedRoad => "Uniform traffic over a degraded mid-domain section",
        }
    }

    /// 按名称查找场景
    pub fn from_name(name: &str) -> Result<Self> {
        match Self::all().iter().find(|s| s.name() == name) {
            Some(s) => Ok(*s),
            None => {
                let names: Vec<_> = Self::all().iter().map(|s| s.name()).collect();
                bail!("未知场景 '{}'，可用: {}", name, names.join(", "))
            }
        }
    }

    /// 归一化占有率剖面
    ///
    /// # 参数
    /// - `x`: 位置 [km]
    /// - `domain_length`: 域长 [km]
    pub fn occupancy(&self, x: f64, domain_length: f64) -> f64 {
        let mid = domain_length / 2.0;
        match self {
            Self::RedLight => {
                if x < mid {
                    0.7
                } else {
                    0.1
                }
            }
            Self::TrafficJam => {
                if x < mid {
                    0.2
                } else {
                    0.8
                }
            }
            Self::GaussianBump => {
                let sigma = domain_length / 20.0;
                let d = (x - mid) / sigma;
                0.1 + 0.6 * (-0.5 * d * d).exp()
            }
            Self::Uniform => 0.4,
            // 均匀中等密度，速度差异完全来自路况剖面
            Self::DegradedRoad => 0.3,
        }
    }

    /// 场景自带的路况剖面
    ///
    /// 返回 None 的场景不定义路况，由 run 命令回退到配置中的路面设置。
    /// 劣化路段占域长的 [0.3L, 0.7L]（10 km 域即 3–7 km）。
    pub fn road_quality(&self, x: f64, domain_length: f64) -> Option<f64> {
        match self {
            Self::DegradedRoad => {
                let start = 0.3 * domain_length;
                let end = 0.7 * domain_length;
                if (start..=end).contains(&x) {
                    Some(DEGRADED_QUALITY)
                } else {
                    Some(1.0)
                }
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_name() {
        assert_eq!(Scenario::from_name("red-light").unwrap(), Scenario::RedLight);
        assert!(Scenario::from_name("wormhole").is_err());
    }

    #[test]
    fn test_occupancy_within_unit_interval() {
        for scenario in Scenario::all() {
            for j in 0..=200 {
                let x = j as f64 * 0.1;
                let occ = scenario.occupancy(x, 20.0);
                assert!((0.0..=1.0).contains(&occ), "{} at x={x}", scenario.name());
            }
        }
    }

    #[test]
    fn test_red_light_has_upstream_queue() {
        let s = Scenario::RedLight;
        assert!(s.occupancy(5.0, 20.0) > s.occupancy(15.0, 20.0));
    }

    #[test]
    fn test_degraded_road_quality_profile() {
        let s = Scenario::DegradedRoad;
        // 10 km 域：劣化区间 [3, 7] km
        assert_eq!(s.road_quality(1.0, 10.0), Some(1.0));
        assert_eq!(s.road_quality(3.0, 10.0), Some(0.6));
        assert_eq!(s.road_quality(5.0, 10.0), Some(0.6));
        assert_eq!(s.road_quality(7.0, 10.0), Some(0.6));
        assert_eq!(s.road_quality(9.0, 10.0), Some(1.0));
        // 其它场景不定义路况剖面
        assert_eq!(Scenario::RedLight.road_quality(5.0, 10.0), None);
    }
}
