// crates/zf_physics/src/solver/multiclass.rs

//! 多类别 LWR 求解器
//!
//! N 条类别密度场通过调制函数与逐类别路况缩放耦合：
//!
//! $$ v_i = \lambda_i(x) \cdot v_{max,i} \max(0,\, 1 - \rho_{tot}/\rho_{max,i})
//!    \cdot f_i(\rho_m) $$
//!
//! 逐类别 Godunov 通量沿用单类别的情形表，流量律以界面两侧各自的
//! 耦合状态（本类别密度 + 该侧摩托车密度）求值；跨峰情形取本类别
//! 未调制的临界流量。时间步由耦合系统的 CFL 扫描选出，含调制乘子
//! 对摩托车密度的链式导数项。
//!
//! # 耦合顺序
//!
//! 每步内各类别按声明顺序依次更新，后更新的类别读取的摩托车密度
//! 来自当前数组（先更新的类别已是新值）。这是原始算法的一阶算子
//! 分裂选择，按规格要求原样保留，不做静默改动。

use crate::cfl::{multiclass_max_wave_speed, select_dt};
use crate::grid::{SpatialGrid, TimeGrid};
use crate::initial::MulticlassInitialDensity;
use crate::modulation::{class_quality_factor, role_modulation};
use crate::result::{EchoedParams, Field2D, MulticlassResult};
use crate::state::{density_weighted_velocity, ClassDensityState};
use crate::types::{SimulationParams, VehicleClass};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};
use zf_foundation::{ZfError, ZfResult};

/// 多类别 LWR 求解器
///
/// 类别数在实例生命周期内固定。实例自身不可变，可安全复用。
#[derive(Debug, Clone)]
pub struct MulticlassLwrSolver {
    classes: Vec<VehicleClass>,
    cancel: Option<Arc<AtomicBool>>,
}

impl MulticlassLwrSolver {
    /// 创建求解器并校验全部类别参数
    pub fn new(classes: Vec<VehicleClass>) -> ZfResult<Self> {
        if classes.is_empty() {
            return Err(ZfError::config("至少需要一个车辆类别"));
        }
        for vc in &classes {
            vc.validate()?;
        }
        Ok(Self {
            classes,
            cancel: None,
        })
    }

    /// 挂接协作取消令牌（每个时间步检查一次）
    pub fn with_cancel_token(mut self, token: Arc<AtomicBool>) -> Self {
        self.cancel = Some(token);
        self
    }

    /// 类别描述符
    pub fn classes(&self) -> &[VehicleClass] {
        &self.classes
    }

    /// 类别数
    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    /// 类别速度律
    ///
    /// `rho` 为速度律的密度参数：通量求值时传本类别密度，
    /// 输出场重算时传总密度。
    #[inline]
    fn class_velocity(&self, i: usize, rho: f64, rho_moto: f64, base_quality: f64) -> f64 {
        let vc = &self.classes[i];
        let v_base = vc.v_max * (1.0 - rho / vc.rho_max).max(0.0);
        let lambda = class_quality_factor(vc.lambda_min, base_quality);
        let f = role_modulation(vc.role, rho_moto, vc.rho_max, vc.eta, vc.beta);
        (lambda * v_base * f).max(0.0)
    }

    /// 通量求值用的类别流量（无路况缩放，见模块文档）
    #[inline]
    fn flux_flow(&self, i: usize, rho: f64, rho_moto: f64) -> f64 {
        let vc = &self.classes[i];
        let v_base = vc.v_max * (1.0 - rho / vc.rho_max).max(0.0);
        let f = role_modulation(vc.role, rho_moto, vc.rho_max, vc.eta, vc.beta);
        rho * (v_base * f).max(0.0)
    }

    /// 类别 i 的界面 Godunov 通量
    ///
    /// 左右流量各用该侧耦合状态求值；跨峰情形取未调制的临界流量。
    #[inline]
    fn interface_flux(&self, i: usize, rho_l: f64, rho_r: f64, moto_l: f64, moto_r: f64) -> f64 {
        let vc = &self.classes[i];
        let rho_c = vc.critical_density();
        // q_i(ρ_c) = v_max·ρ_max/4
        let critical_flow = rho_c * vc.v_max * (1.0 - rho_c / vc.rho_max);

        if rho_l <= rho_r {
            if rho_l >= rho_c {
                self.flux_flow(i, rho_l, moto_l)
            } else if rho_r <= rho_c {
                self.flux_flow(i, rho_r, moto_r)
            } else {
                critical_flow
            }
        } else if rho_l <= rho_c {
            self.flux_flow(i, rho_l, moto_l)
        } else if rho_r >= rho_c {
            self.flux_flow(i, rho_r, moto_r)
        } else {
            critical_flow
        }
    }

    /// 运行模拟
    ///
    /// # 参数
    /// - `initial`: 初始密度（逐类别回调 / 标量回调 / 数组）
    /// - `params`: 模拟参数
    /// - `road_quality`: 可选路况函数 x [km] → 质量 ∈ [0,1]，默认均匀 1.0
    pub fn simulate(
        &self,
        initial: &MulticlassInitialDensity,
        params: &SimulationParams,
        road_quality: Option<&(dyn Fn(f64) -> f64 + Sync)>,
    ) -> ZfResult<MulticlassResult> {
        params.validate()?;

        let n_classes = self.n_classes();
        let grid = SpatialGrid::new(params.domain_length, params.dx);
        let nx = grid.nx();

        let mut state = ClassDensityState::from_rows(initial.build(&grid.x, n_classes)?);

        // 逐单元基准路况
        let base_quality: Vec<f64> = match road_quality {
            Some(f) => grid.x.iter().map(|&xi| f(xi)).collect(),
            None => vec![1.0; nx],
        };

        let dt = match params.dt {
            Some(dt) => dt,
            None => {
                let max_speed = multiclass_max_wave_speed(&self.classes, &state.rho);
                select_dt(params.cfl_factor, params.dx, max_speed)?
            }
        };
        let time_grid = TimeGrid::new(params.simulation_time, dt);
        let nt = time_grid.nt();

        info!(n_classes, nx, nt, dt, "开始多类别模拟");

        let mut class_density: Vec<Field2D> = (0..n_classes).map(|_| Field2D::zeros(nt, nx)).collect();
        let mut class_velocity: Vec<Field2D> = (0..n_classes).map(|_| Field2D::zeros(nt, nx)).collect();
        let mut class_flow: Vec<Field2D> = (0..n_classes).map(|_| Field2D::zeros(nt, nx)).collect();
        let mut agg_density = Field2D::zeros(nt, nx);
        let mut agg_velocity = Field2D::zeros(nt, nx);
        let mut agg_flow = Field2D::zeros(nt, nx);

        self.record_step(
            0,
            &state,
            &base_quality,
            &mut class_density,
            &mut class_velocity,
            &mut class_flow,
            &mut agg_density,
            &mut agg_velocity,
            &mut agg_flow,
        );

        let mut flux = vec![0.0; nx + 1];

        for n in 0..nt - 1 {
            if let Some(token) = &self.cancel {
                if token.load(Ordering::Relaxed) {
                    return Err(ZfError::TaskCancelled);
                }
            }

            for i in 0..n_classes {
                // 摩托车密度从当前数组读取：先更新的类别已是新值（保留的耦合顺序）
                let moto = state.gap_filling_density(&self.classes);
                let rho_i = &state.rho[i];

                for j in 1..nx {
                    flux[j] =
                        self.interface_flux(i, rho_i[j - 1], rho_i[j], moto[j - 1], moto[j]);
                }
                flux[0] = flux[1];
                flux[nx] = flux[nx - 1];

                let rho_i = &mut state.rho[i];
                for j in 0..nx {
                    rho_i[j] -= dt / params.dx * (flux[j + 1] - flux[j]);
                }
                state.enforce_positivity(i);
            }

            self.record_step(
                n + 1,
                &state,
                &base_quality,
                &mut class_density,
                &mut class_velocity,
                &mut class_flow,
                &mut agg_density,
                &mut agg_velocity,
                &mut agg_flow,
            );

            if (n + 1) % 1000 == 0 {
                debug!(step = n + 1, total = nt - 1, "模拟推进");
            }
        }

        info!(steps = nt - 1, "多类别模拟完成");

        Ok(MulticlassResult {
            density: agg_density,
            velocity: agg_velocity,
            flow: agg_flow,
            class_density,
            class_velocity,
            class_flow,
            grid_x: grid.x,
            grid_t: time_grid.t,
            n_classes,
            vehicle_classes: self.classes.clone(),
            params: EchoedParams {
                dx: params.dx,
                dt,
                domain_length: params.domain_length,
                simulation_time: params.simulation_time,
            },
        })
    }

    /// 重算并记录第 n 步的全部输出场
    ///
    /// 速度律以总密度为参数，聚合速度为密度加权平均（ε 保护 + NaN→0）。
    #[allow(clippy::too_many_arguments)]
    fn record_step(
        &self,
        n: usize,
        state: &ClassDensityState,
        base_quality: &[f64],
        class_density: &mut [Field2D],
        class_velocity: &mut [Field2D],
        class_flow: &mut [Field2D],
        agg_density: &mut Field2D,
        agg_velocity: &mut Field2D,
        agg_flow: &mut Field2D,
    ) {
        let nx = state.nx();
        let total = state.total_density();
        let moto = state.gap_filling_density(&self.classes);

        let mut velocities = vec![vec![0.0; nx]; self.n_classes()];
        for i in 0..self.n_classes() {
            for j in 0..nx {
                velocities[i][j] = self.class_velocity(i, total[j], moto[j], base_quality[j]);
            }
        }

        for i in 0..self.n_classes() {
            class_density[i].set_row(n, &state.rho[i]);
            class_velocity[i].set_row(n, &velocities[i]);
            let flow_row = class_flow[i].row_mut(n);
            for j in 0..nx {
                flow_row[j] = state.rho[i][j] * velocities[i][j];
            }
        }

        agg_density.set_row(n, &total);
        agg_velocity.set_row(n, &density_weighted_velocity(&state.rho, &velocities));
        let agg_flow_row = agg_flow.row_mut(n);
        for j in 0..nx {
            agg_flow_row[j] = (0..self.n_classes())
                .map(|i| state.rho[i][j] * velocities[i][j])
                .sum();
        }
    }
}

// ========================================================================
// 测试
// ========================================================================
