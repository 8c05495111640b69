// crates/zf_physics/src/cfl.rs

//! CFL 时间步控制
//!
//! 显式格式的稳定性要求时间步长受最快波速约束：
//!
//! $$ \Delta t = C \cdot \frac{\Delta x}{\max |\lambda|}, \quad C \in (0, 1] $$
//!
//! 单类别时 $\lambda = q'(\rho) = v_{max}(1 - 2\rho/\rho_{max})$，逐单元扫描，
//! 并以自由流速度 $v_{max}$ 兜底。
//!
//! 多类别时类别 i 的通量还依赖摩托车密度，波速估计必须同时包含
//! 基本通量对总密度的导数与调制乘子对摩托车密度的链式导数项；
//! 遗漏后者会低估真实信号传播速度并导致失稳。

use crate::fundamental::FundamentalDiagram;
use crate::types::{VehicleClass, VehicleRole};
use zf_foundation::{ZfError, ZfResult};

/// 单类别最大波速
///
/// `max(v_max, max_j |v_max·(1 − 2ρ_j/ρ_max)|)`
pub fn single_class_max_wave_speed(fd: &FundamentalDiagram, rho: &[f64]) -> f64 {
    let mut max_speed = fd.v_max;
    for &r in rho {
        max_speed = max_speed.max(fd.wave_speed(r).abs());
    }
    max_speed
}

/// 多类别耦合系统最大波速
///
/// 逐单元、逐类别扫描。局部波速估计为
///
/// $$ \lambda_{i,j} = q_i'(\rho_{tot}) \cdot f_i(\rho_m)
///    + \rho \cdot \frac{\partial f_i}{\partial \rho_m}
///      \, v_{max,i} (1 - \rho_{tot}/\rho_{max,i}) $$
///
/// 第二项是类别 i 的通量经调制乘子对摩托车密度的链式贡献。
/// 最终以所有类别的自由流速度兜底。
///
/// # 参数
/// - `classes`: 类别描述符
/// - `rho`: 各类别密度场 `[n_classes][nx]`
pub fn multiclass_max_wave_speed(classes: &[VehicleClass], rho: &[Vec<f64>]) -> f64 {
    let nx = rho.first().map_or(0, |r| r.len());
    let mut max_speed = 0.0f64;

    for j in 0..nx {
        let rho_total: f64 = rho.iter().map(|field| field[j]).sum();
        let rho_moto: f64 = classes
            .iter()
            .zip(rho.iter())
            .filter(|(vc, _)| vc.role == VehicleRole::GapFilling)
            .map(|(_, field)| field[j])
            .sum();

        for (i, vc) in classes.iter().enumerate() {
            let base_derivative = vc.v_max * (1.0 - 2.0 * rho_total / vc.rho_max);
            let ratio = rho_moto / vc.rho_max;

            let wave_speed = match vc.role {
                VehicleRole::GapFilling => {
                    let mut ws = base_derivative * (1.0 + vc.eta * ratio);
                    if rho_total > 0.0 {
                        // 链式项: ∂f/∂ρ_m = η/ρ_max
                        let gap_derivative =
                            vc.v_max * vc.eta * (1.0 - rho_total / vc.rho_max) / vc.rho_max;
                        ws += rho_moto * gap_derivative;
                    }
                    ws
                }
                VehicleRole::Interweaving => {
                    let mut ws = base_derivative * (1.0 - vc.beta * ratio);
                    if rho_total > 0.0 {
                        // 链式项: ∂f/∂ρ_m = -β/ρ_max
                        let weave_derivative =
                            -vc.v_max * vc.beta * (1.0 - rho_total / vc.rho_max) / vc.rho_max;
                        ws += rho[i][j] * weave_derivative;
                    }
                    ws
                }
                VehicleRole::Neutral => base_derivative,
            };

            max_speed = max_speed.max(wave_speed.abs());
        }
    }

    // 自由流波速兜底
    for vc in classes {
        max_speed = max_speed.max(vc.v_max);
    }
    max_speed
}

/// 由最大波速选择时间步长
///
/// `dt = cfl_factor · dx / max_wave_speed`。
/// 波速为零或非有限会使 dt 为无穷或 NaN，必须显式报告而非静默传播。
pub fn select_dt(cfl_factor: f64, dx: f64, max_wave_speed: f64) -> ZfResult<f64> {
    if !max_wave_speed.is_finite() || max_wave_speed <= 0.0 {
        return Err(ZfError::numerical_instability(format!(
            "最大波速无效: {max_wave_speed}, 无法由 CFL 条件选择时间步长"
        )));
    }
    Ok(cfl_factor * dx / max_wave_speed)
}

// ========================================================================
// 测试
// ========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn moto() -> VehicleClass {
        VehicleClass::gap_filling("moto", 90.0, 200.0, 0.3, 0.8).unwrap()
    }

    fn car() -> VehicleClass {
        VehicleClass::interweaving("car", 100.0, 180.0, 0.3, 0.6).unwrap()
    }

    #[test]
    fn test_single_class_empty_road() {
        let fd = FundamentalDiagram::new(100.0, 180.0);
        // 空路时最大波速即自由流速度
        let ws = single_class_max_wave_speed(&fd, &[0.0; 10]);
        assert!((ws - 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_class_jam_backward_wave() {
        let fd = FundamentalDiagram::new(100.0, 180.0);
        // 满密度处 |q'| = v_max，向后传播
        let ws = single_class_max_wave_speed(&fd, &[180.0; 10]);
        assert!((ws - 100.0).abs() < 1e-12);
        // 超过 ρ_max 的密度给出更大的回传波速
        let ws = single_class_max_wave_speed(&fd, &[270.0]);
        assert!(ws > 100.0);
    }

    #[test]
    fn test_select_dt_golden() {
        // dt = 0.9·0.1/100 = 0.0009
        let dt = select_dt(0.9, 0.1, 100.0).unwrap();
        assert!((dt - 0.0009).abs() < 1e-15);
    }

    #[test]
    fn test_select_dt_rejects_zero_wave_speed() {
        assert!(select_dt(0.9, 0.1, 0.0).is_err());
        assert!(select_dt(0.9, 0.1, f64::NAN).is_err());
        assert!(select_dt(0.9, 0.1, f64::INFINITY).is_err());
    }

    #[test]
    fn test_multiclass_floor_is_fastest_free_flow() {
        let classes = vec![moto(), car()];
        let rho = vec![vec![0.0; 5], vec![0.0; 5]];
        let ws = multiclass_max_wave_speed(&classes, &rho);
        assert!((ws - 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_multiclass_coupling_term_increases_wave_speed() {
        // 摩托车密度非零时链式项使波速估计不低于无耦合情形
        let mut m = moto();
        let classes_coupled = vec![m.clone(), car()];
        m.eta = 0.0;
        let classes_plain = vec![m, car()];

        let rho = vec![vec![120.0; 5], vec![60.0; 5]];
        let ws_coupled = multiclass_max_wave_speed(&classes_coupled, &rho);
        let ws_plain = multiclass_max_wave_speed(&classes_plain, &rho);
        assert!(ws_coupled >= ws_plain);
    }

    #[test]
    fn test_multiclass_cfl_contract() {
        let classes = vec![moto(), car()];
        let rho = vec![vec![80.0; 20], vec![90.0; 20]];
        let ws = multiclass_max_wave_speed(&classes, &rho);
        let dx = 0.1;
        let cfl = 0.9;
        let dt = select_dt(cfl, dx, ws).unwrap();
        // dt·max_wave_speed/dx ≤ cfl_factor
        assert!(dt * ws / dx <= cfl + 1e-12);
    }
}
