// tests/mass_conservation.rs

//! 质量守恒验证测试
//!
//! 守恒型 Godunov 更新在波未触及边界前应逐步保持总车辆数不变
//! （零梯度边界把最近内部界面通量复制到边界，背景为零时边界
//! 通量为零）。
//!
//! # 测试覆盖
//!
//! - 单类别紧支集初值的质量守恒
//! - 多类别逐类别质量守恒
//! - 密度上界不被激波放大

use zf_physics::{
    InitialDensity, LwrSolver, MulticlassInitialDensity, MulticlassLwrSolver, SimulationParams,
    VehicleClass,
};

// ============================================================================
// 测试辅助函数
// ============================================================================

/// 紧支集密度包：域中央一段高密度，两端为零
fn bump(x: f64) -> f64 {
    if (4.0..6.0).contains(&x) {
        80.0
    } else {
        0.0
    }
}

/// 第 n 步的总车辆数（∑ρ·Δx）
fn total_mass(row: &[f64], dx: f64) -> f64 {
    row.iter().sum::<f64>() * dx
}

// ============================================================================
// 单类别
// ============================================================================

#[test]
fn test_single_class_mass_conserved() {
    let solver = LwrSolver::new(100.0, 180.0).unwrap();
    // 时长取短，保证波前不触及边界
    let params = SimulationParams::new(10.0, 0.01, 0.1, None, 0.9).unwrap();
    let result = solver
        .simulate(&InitialDensity::profile(bump), &params, None)
        .unwrap();

    let m0 = total_mass(result.density.row(0), params.dx);
    let nt = result.grid_t.len();
    for n in 0..nt {
        let m = total_mass(result.density.row(n), params.dx);
        assert!(
            (m - m0).abs() < 1e-8 * m0,
            "第 {n} 步质量漂移: {m} vs {m0}"
        );
    }
}

#[test]
fn test_single_class_density_bounded() {
    let solver = LwrSolver::new(100.0, 180.0).unwrap();
    let params = SimulationParams::new(10.0, 0.02, 0.1, None, 0.9).unwrap();
    // 高低密度间断，最大初始密度 150
    let init = InitialDensity::profile(|x| if x < 5.0 { 150.0 } else { 20.0 });
    let result = solver.simulate(&init, &params, None).unwrap();

    // 单调格式不产生超出初值范围的新极值
    for &r in &result.density.data {
        assert!((0.0..=150.0 + 1e-9).contains(&r));
    }
}

// ============================================================================
// 多类别
// ============================================================================

#[test]
fn test_multiclass_per_class_mass_conserved() {
    let classes = vec![
        VehicleClass::gap_filling("moto", 90.0, 200.0, 0.3, 0.8).unwrap(),
        VehicleClass::interweaving("car", 100.0, 180.0, 0.3, 0.6).unwrap(),
    ];
    let solver = MulticlassLwrSolver::new(classes).unwrap();
    let params = SimulationParams::new(10.0, 0.01, 0.1, None, 0.9).unwrap();
    let init = MulticlassInitialDensity::profile(|x| vec![bump(x), bump(x) * 0.5]);
    let result = solver.simulate(&init, &params, None).unwrap();

    let nt = result.grid_t.len();
    for (i, field) in result.class_density.iter().enumerate() {
        let m0 = total_mass(field.row(0), params.dx);
        for n in 0..nt {
            let m = total_mass(field.row(n), params.dx);
            assert!(
                (m - m0).abs() < 1e-8 * m0,
                "类别 {i} 第 {n} 步质量漂移: {m} vs {m0}"
            );
        }
    }
}

#[test]
fn test_multiclass_aggregate_equals_class_sum() {
    let classes = vec![
        VehicleClass::gap_filling("moto", 90.0, 200.0, 0.3, 0.8).unwrap(),
        VehicleClass::interweaving("car", 100.0, 180.0, 0.3, 0.6).unwrap(),
    ];
    let solver = MulticlassLwrSolver::new(classes).unwrap();
    let params = SimulationParams::new(5.0, 0.005, 0.1, None, 0.9).unwrap();
    let init = MulticlassInitialDensity::profile(|x| vec![30.0 + 2.0 * x, 20.0]);
    let result = solver.simulate(&init, &params, None).unwrap();

    let nt = result.grid_t.len();
    let nx = result.grid_x.len();
    for n in 0..nt {
        for j in 0..nx {
            let sum: f64 = result.class_density.iter().map(|f| f.get(n, j)).sum();
            assert!((result.density.get(n, j) - sum).abs() < 1e-9);
        }
    }
}
