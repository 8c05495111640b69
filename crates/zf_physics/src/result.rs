// crates/zf_physics/src/result.rs

//! 结果记录
//!
//! 模拟结束后返回的不可变快照：时空数组（聚合与逐类别的密度/速度/流量）、
//! 网格，以及输入参数回显（保证可复现）。求解器返回后不保留任何引用，
//! 记录完全归调用者所有。

use crate::types::VehicleClass;
use serde::{Deserialize, Serialize};

/// 时空二维数组，行优先 `[nt][nx]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field2D {
    /// 时间步数
    pub nt: usize,
    /// 单元数
    pub nx: usize,
    /// 扁平存储，`data[n·nx + j]`
    pub data: Vec<f64>,
}

impl Field2D {
    /// 创建全零数组
    pub fn zeros(nt: usize, nx: usize) -> Self {
        Self {
            nt,
            nx,
            data: vec![0.0; nt * nx],
        }
    }

    /// 读取 (n, j)
    #[inline]
    pub fn get(&self, n: usize, j: usize) -> f64 {
        self.data[n * self.nx + j]
    }

    /// 第 n 个时间步的空间切片
    #[inline]
    pub fn row(&self, n: usize) -> &[f64] {
        &self.data[n * self.nx..(n + 1) * self.nx]
    }

    /// 第 n 个时间步的可变切片
    #[inline]
    pub fn row_mut(&mut self, n: usize) -> &mut [f64] {
        &mut self.data[n * self.nx..(n + 1) * self.nx]
    }

    /// 整行写入
    pub fn set_row(&mut self, n: usize, values: &[f64]) {
        self.row_mut(n).copy_from_slice(values);
    }
}

/// 输入参数回显
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EchoedParams {
    /// 空间步长 [km]
    pub dx: f64,
    /// 实际使用的时间步长 [h]
    pub dt: f64,
    /// 域长 [km]
    pub domain_length: f64,
    /// 模拟总时长 [h]
    pub simulation_time: f64,
}

/// 单类别模拟结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleClassResult {
    /// 密度 [veh/km]
    pub density: Field2D,
    /// 速度 [km/h]
    pub velocity: Field2D,
    /// 流量 [veh/h]
    pub flow: Field2D,
    /// 空间网格 [km]
    pub grid_x: Vec<f64>,
    /// 时间网格 [h]
    pub grid_t: Vec<f64>,
    /// 自由流速度（道路质量修正后的有效值）[km/h]
    pub v_max: f64,
    /// 本次运行应用的域内平均路况（无路况函数时为 1.0），
    /// 与 `v_max` 一起可还原配置的自由流速度
    pub mean_road_quality: f64,
    /// 最大密度 [veh/km]
    pub rho_max: f64,
    /// 参数回显
    pub params: EchoedParams,
}

/// 多类别模拟结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MulticlassResult {
    /// 聚合密度（各类别之和）[veh/km]
    pub density: Field2D,
    /// 密度加权平均速度 [km/h]
    pub velocity: Field2D,
    /// 聚合流量 [veh/h]
    pub flow: Field2D,
    /// 逐类别密度
    pub class_density: Vec<Field2D>,
    /// 逐类别速度
    pub class_velocity: Vec<Field2D>,
    /// 逐类别流量
    pub class_flow: Vec<Field2D>,
    /// 空间网格 [km]
    pub grid_x: Vec<f64>,
    /// 时间网格 [h]
    pub grid_t: Vec<f64>,
    /// 类别数
    pub n_classes: usize,
    /// 类别描述符回显
    pub vehicle_classes: Vec<VehicleClass>,
    /// 参数回显
    pub params: EchoedParams,
}

// ========================================================================
// 测试
// ========================================================================
