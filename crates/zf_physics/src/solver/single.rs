// crates/zf_physics/src/solver/single.rs

//! 单类别 LWR 求解器
//!
//! 经典 Greenshields 速度律 + Godunov 有限体积格式：
//!
//! 1. 逐界面计算 Godunov 通量
//! 2. 两端边界通量取最近内部界面值（零梯度 / Neumann 近似）
//! 3. 守恒更新 ρ ← ρ − (Δt/Δx)(F_{j+1/2} − F_{j-1/2})
//! 4. 钳制 ρ ≥ 0
//!
//! 道路质量以域内平均质量的单一标量修正有效 v_max（整个运行期生效）。
//! 有效速度作为显式参数构造新基本图，求解器自身字段从不被临时改写。

use crate::cfl::{select_dt, single_class_max_wave_speed};
use crate::fundamental::FundamentalDiagram;
use crate::godunov::godunov_flux;
use crate::grid::{SpatialGrid, TimeGrid};
use crate::initial::InitialDensity;
use crate::result::{EchoedParams, Field2D, SingleClassResult};
use crate::types::SimulationParams;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};
use zf_foundation::{ZfError, ZfResult};

/// 单类别 LWR 求解器
///
/// 实例自身不可变；`simulate` 不修改任何求解器字段，可安全复用。
#[derive(Debug, Clone)]
pub struct LwrSolver {
    diagram: FundamentalDiagram,
    cancel: Option<Arc<AtomicBool>>,
}

impl LwrSolver {
    /// 创建求解器
    pub fn new(v_max: f64, rho_max: f64) -> ZfResult<Self> {
        ZfError::check_positive("v_max", v_max)?;
        ZfError::check_positive("rho_max", rho_max)?;
        Ok(Self {
            diagram: FundamentalDiagram::new(v_max, rho_max),
            cancel: None,
        })
    }

    /// 挂接协作取消令牌（每个时间步检查一次）
    pub fn with_cancel_token(mut self, token: Arc<AtomicBool>) -> Self {
        self.cancel = Some(token);
        self
    }

    /// 基本图
    pub fn diagram(&self) -> &FundamentalDiagram {
        &self.diagram
    }

    /// 运行模拟
    ///
    /// # 参数
    /// - `initial`: 初始密度（回调或数组）
    /// - `params`: 模拟参数（构造时已校验，此处再次校验以防直接构造）
    /// - `road_quality`: 可选路况函数 x [km] → 质量 ∈ [0,1]
    ///
    /// # 返回
    /// 完整结果记录，或一个类型化错误；不产生部分结果。
    pub fn simulate(
        &self,
        initial: &InitialDensity,
        params: &SimulationParams,
        road_quality: Option<&(dyn Fn(f64) -> f64 + Sync)>,
    ) -> ZfResult<SingleClassResult> {
        params.validate()?;

        let grid = SpatialGrid::new(params.domain_length, params.dx);
        let nx = grid.nx();
        let mut rho = initial.build(&grid.x)?;

        // 道路质量：域内平均质量的标量修正，作为有效速度的纯函数输入
        let mean_quality = match road_quality {
            Some(quality_fn) => grid.x.iter().map(|&xi| quality_fn(xi)).sum::<f64>() / nx as f64,
            None => 1.0,
        };
        let fd = self.diagram.with_quality(mean_quality);

        let dt = match params.dt {
            Some(dt) => dt,
            None => {
                let max_speed = single_class_max_wave_speed(&fd, &rho);
                select_dt(params.cfl_factor, params.dx, max_speed)?
            }
        };
        let time_grid = TimeGrid::new(params.simulation_time, dt);
        let nt = time_grid.nt();

        info!(nx, nt, dt, v_max = fd.v_max, "开始单类别模拟");

        let mut density = Field2D::zeros(nt, nx);
        let mut velocity = Field2D::zeros(nt, nx);
        let mut flow = Field2D::zeros(nt, nx);

        density.set_row(0, &rho);
        for (j, &r) in rho.iter().enumerate() {
            velocity.row_mut(0)[j] = fd.speed(r);
            flow.row_mut(0)[j] = fd.flow(r);
        }

        let rho_c = fd.critical_density();
        let mut flux = vec![0.0; nx + 1];

        for n in 0..nt - 1 {
            if let Some(token) = &self.cancel {
                if token.load(Ordering::Relaxed) {
                    return Err(ZfError::TaskCancelled);
                }
            }

            // 内部界面通量
            for j in 1..nx {
                flux[j] = godunov_flux(rho[j - 1], rho[j], rho_c, |r| fd.flow(r));
            }
            // 零梯度边界：复制最近内部界面
            flux[0] = flux[1];
            flux[nx] = flux[nx - 1];

            // 守恒更新 + 非负钳制
            for j in 0..nx {
                rho[j] -= dt / params.dx * (flux[j + 1] - flux[j]);
                if rho[j] < 0.0 {
                    rho[j] = 0.0;
                }
            }

            density.set_row(n + 1, &rho);
            for (j, &r) in rho.iter().enumerate() {
                velocity.row_mut(n + 1)[j] = fd.speed(r);
                flow.row_mut(n + 1)[j] = fd.flow(r);
            }

            if (n + 1) % 1000 == 0 {
                debug!(step = n + 1, total = nt - 1, "模拟推进");
            }
        }

        info!(steps = nt - 1, "单类别模拟完成");

        Ok(SingleClassResult {
            density,
            velocity,
            flow,
            grid_x: grid.x,
            grid_t: time_grid.t,
            v_max: fd.v_max,
            mean_road_quality: mean_quality,
            rho_max: fd.rho_max,
            params: EchoedParams {
                dx: params.dx,
                dt,
                domain_length: params.domain_length,
                simulation_time: params.simulation_time,
            },
        })
    }
}

// ========================================================================
// 测试
// ========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn solver() -> LwrSolver {
        LwrSolver::new(100.0, 180.0).unwrap()
    }

    fn params() -> SimulationParams {
        SimulationParams::new(2.0, 0.01, 0.1, None, 0.9).unwrap()
    }

    #[test]
    fn test_empty_road_stays_free_flow() {
        // ρ=0 处处 → 速度恒为 v_max，流量恒为 0
        let result = solver()
            .simulate(&InitialDensity::profile(|_| 0.0), &params(), None)
            .unwrap();
        let nt = result.grid_t.len();
        for n in 0..nt {
            for j in 0..result.grid_x.len() {
                assert!((result.velocity.get(n, j) - 100.0).abs() < 1e-12);
                assert_eq!(result.flow.get(n, j), 0.0);
                assert_eq!(result.density.get(n, j), 0.0);
            }
        }
    }

    #[test]
    fn test_jam_road_stays_stopped() {
        // ρ=ρ_max 处处 → 速度与流量恒为 0
        let result = solver()
            .simulate(&InitialDensity::profile(|_| 180.0), &params(), None)
            .unwrap();
        let nt = result.grid_t.len();
        for n in 0..nt {
            for j in 0..result.grid_x.len() {
                assert_eq!(result.velocity.get(n, j), 0.0);
                assert_eq!(result.flow.get(n, j), 0.0);
            }
        }
    }

    #[test]
    fn test_density_always_nonnegative() {
        let init = InitialDensity::profile(|x| if x < 1.0 { 150.0 } else { 10.0 });
        let result = solver().simulate(&init, &params(), None).unwrap();
        assert!(result.density.data.iter().all(|&r| r >= 0.0));
        assert!(result.velocity.data.iter().all(|&v| v >= 0.0));
    }

    #[test]
    fn test_auto_dt_satisfies_cfl_contract() {
        let init = InitialDensity::profile(|x| if x < 1.0 { 126.0 } else { 18.0 });
        let p = params();
        let result = solver().simulate(&init, &p, None).unwrap();
        let dt = result.params.dt;
        // 初始状态下的最大波速
        let rho0: Vec<f64> = result.density.row(0).to_vec();
        let ws = single_class_max_wave_speed(solver().diagram(), &rho0);
        assert!(dt * ws / p.dx <= p.cfl_factor + 1e-12);
    }

    #[test]
    fn test_road_quality_scales_v_max_purely() {
        let s = solver();
        let result = s
            .simulate(
                &InitialDensity::profile(|_| 0.0),
                &params(),
                Some(&|_x| 0.5),
            )
            .unwrap();
        // 有效 v_max 减半，空路速度随之减半
        assert!((result.v_max - 50.0).abs() < 1e-12);
        assert!((result.velocity.get(0, 0) - 50.0).abs() < 1e-12);
        // 应用的平均路况回显，配置速度可由 v_max / mean_road_quality 还原
        assert!((result.mean_road_quality - 0.5).abs() < 1e-12);
        assert!((result.v_max / result.mean_road_quality - 100.0).abs() < 1e-9);
        // 求解器自身不受影响（无共享可变状态）
        assert!((s.diagram().v_max - 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_quality_echo_defaults_to_unity() {
        let result = solver()
            .simulate(&InitialDensity::profile(|_| 0.0), &params(), None)
            .unwrap();
        assert_eq!(result.mean_road_quality, 1.0);
        assert!((result.v_max - 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_explicit_dt_is_respected() {
        let p = SimulationParams::new(2.0, 0.01, 0.1, Some(0.0005), 0.9).unwrap();
        let result = solver()
            .simulate(&InitialDensity::profile(|_| 10.0), &p, None)
            .unwrap();
        assert!((result.params.dt - 0.0005).abs() < 1e-15);
        assert_eq!(result.grid_t.len(), (0.01f64 / 0.0005).floor() as usize + 1);
    }

    #[test]
    fn test_cancellation_token() {
        let token = Arc::new(AtomicBool::new(true));
        let s = solver().with_cancel_token(token);
        let err = s
            .simulate(&InitialDensity::profile(|_| 10.0), &params(), None)
            .unwrap_err();
        assert!(matches!(err, ZfError::TaskCancelled));
    }

    #[test]
    fn test_invalid_params_fail_before_allocation() {
        let bad = SimulationParams {
            domain_length: -1.0,
            simulation_time: 0.5,
            dx: 0.1,
            dt: None,
            cfl_factor: 0.9,
        };
        assert!(solver()
            .simulate(&InitialDensity::profile(|_| 0.0), &bad, None)
            .is_err());
    }
}
