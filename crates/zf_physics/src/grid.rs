// crates/zf_physics/src/grid.rs

//! 一维空间/时间网格
//!
//! 网格在一次模拟运行中固定不变：
//!
//! - 空间: `nx = floor(L/dx) + 1` 个单元中心，均匀铺满 [0, L]
//! - 时间: `nt = floor(T/dt) + 1` 个时间戳，均匀铺满 [0, T]

/// 空间网格 [km]
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialGrid {
    /// 单元中心坐标
    pub x: Vec<f64>,
    /// 空间步长（守恒更新使用的 dx）
    pub dx: f64,
}

impl SpatialGrid {
    /// 由域长与步长构建，nx = floor(L/dx) + 1
    pub fn new(domain_length: f64, dx: f64) -> Self {
        let nx = (domain_length / dx).floor() as usize + 1;
        Self {
            x: linspace(0.0, domain_length, nx),
            dx,
        }
    }

    /// 单元数
    #[inline]
    pub fn nx(&self) -> usize {
        self.x.len()
    }
}

/// 时间网格 [h]
#[derive(Debug, Clone, PartialEq)]
pub struct TimeGrid {
    /// 时间戳
    pub t: Vec<f64>,
    /// 时间步长
    pub dt: f64,
}

impl TimeGrid {
    /// 由总时长与步长构建，nt = floor(T/dt) + 1
    pub fn new(simulation_time: f64, dt: f64) -> Self {
        let nt = (simulation_time / dt).floor() as usize + 1;
        Self {
            t: linspace(0.0, simulation_time, nt),
            dt,
        }
    }

    /// 时间步数（含初始时刻）
    #[inline]
    pub fn nt(&self) -> usize {
        self.t.len()
    }
}

/// 均匀采样 [start, stop] 共 n 点（n ≥ 2 时两端点皆含）
fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

// ========================================================================
// 测试
// ========================================================================
