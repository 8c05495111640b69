// crates/zf_physics/src/lib.rs

//! 交通流求解器模块
//!
//! 提供一阶宏观交通流 (LWR) 守恒律方程的数值求解功能，包括：
//! - 核心类型定义 (types) - 车辆类别描述符、模拟参数
//! - 基本图 (fundamental) - Greenshields 速度-密度关系
//! - 类别调制函数 (modulation) - 穿插增速 / 蛇行减速 / 路况系数
//! - Godunov 数值通量 (godunov)
//! - CFL 时间步控制 (cfl)
//! - 网格 (grid) 与初始条件 (initial)
//! - 状态管理 (state) 与结果记录 (result)
//! - 求解器 (solver) - 单类别与多类别两条独立实现路径
//!
//! # 模型背景
//!
//! 经典 LWR 模型求解守恒律
//!
//! $$ \partial_t \rho + \partial_x q(\rho) = 0, \quad q(\rho) = \rho \, v(\rho) $$
//!
//! 多类别扩展为每个类别 i 维护一条密度场，速度律通过总密度与
//! 摩托车密度耦合：
//!
//! $$ v_i = \lambda_i(x) \cdot v_{max,i} (1 - \rho_{tot}/\rho_{max,i}) \cdot f_i(\rho_m) $$
//!
//! 其中穿插类别 (摩托车) 的 $f_i = 1 + \eta \rho_m / \rho_{max,i}$ 在高密度
//! 下反而提速，其余类别 $f_i = \max(0.1,\, 1 - \beta_i \rho_m / \rho_{max,i})$
//! 被蛇行穿插拖慢。

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cfl;
pub mod fundamental;
pub mod godunov;
pub mod grid;
pub mod initial;
pub mod modulation;
pub mod result;
pub mod solver;
pub mod state;
pub mod types;

// 重导出常用类型
pub use cfl::{multiclass_max_wave_speed, select_dt, single_class_max_wave_speed};
pub use fundamental::FundamentalDiagram;
pub use godunov::godunov_flux;
pub use grid::{SpatialGrid, TimeGrid};
pub use initial::{InitialDensity, MulticlassInitialDensity};
pub use modulation::{
    class_quality_factor, gap_filling_modulation, interweaving_modulation,
    road_quality_coefficient, role_modulation, RoadType,
};
pub use result::{EchoedParams, Field2D, MulticlassResult, SingleClassResult};
pub use solver::{LwrSolver, MulticlassLwrSolver};
pub use state::ClassDensityState;
pub use types::{SimulationParams, VehicleClass, VehicleRole};
