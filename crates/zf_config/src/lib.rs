// crates/zf_config/src/lib.rs

//! ZemiFlow 配置层
//!
//! 提供运行配置与启动时加载的不可变预设表。
//!
//! # 模块概览
//!
//! - [`run_config`]: RunConfig 运行配置（JSON 序列化，全 f64）
//! - [`presets`]: 车辆类别预设与路面类型注册表
//! - [`error`]: 配置错误类型
//!
//! # 设计原则
//!
//! 1. **不可变预设**: 预设表在启动时构建一次，之后只读
//! 2. **全 f64 配置**: 所有数值使用 f64，便于 JSON 序列化
//! 3. **加载即校验**: 配置从文件加载后立即校验，非法配置不出本层

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod presets;
pub mod run_config;

// 重导出核心类型
pub use error::ConfigError;
pub use presets::{default_vehicle_classes, vehicle_preset, VehiclePreset};
pub use run_config::{ModelKind, NumericsConfig, RoadConfig, RunConfig, VehicleClassConfig};
