// crates/zf_physics/src/godunov.rs

//! Godunov 数值通量
//!
//! 在每个单元界面求解局部黎曼问题，得到稳定且满足熵条件的数值通量。
//! Greenshields 通量为单峰凹函数，精确黎曼解退化为一张情形表：
//!
//! ```text
//! ρ_L ≤ ρ_R（稀疏波相容排序）:
//!     ρ_L ≥ ρ_c        → q(ρ_L)
//!     ρ_R ≤ ρ_c        → q(ρ_R)
//!     跨越流量峰值      → q(ρ_c)
//! ρ_L > ρ_R（激波相容排序）:
//!     ρ_L ≤ ρ_c        → q(ρ_L)
//!     ρ_R ≥ ρ_c        → q(ρ_R)
//!     其余              → q(ρ_c)
//! ```
//!
//! 此表必须逐字保持：它是凹单峰通量下满足熵条件的精确解。

/// Godunov 界面通量
///
/// 对任意凹单峰流量律求精确黎曼通量。`flow` 给出该类别在界面
/// 一侧耦合状态下的流量；`rho_crit` 为该类别的临界密度。
///
/// # 参数
/// - `rho_left` / `rho_right`: 界面左右单元密度
/// - `rho_crit`: 临界密度（流量峰值点）
/// - `flow`: 流量律 q(ρ)
#[inline]
pub fn godunov_flux(rho_left: f64, rho_right: f64, rho_crit: f64, flow: impl Fn(f64) -> f64) -> f64 {
    if rho_left <= rho_right {
        if rho_left >= rho_crit {
            flow(rho_left)
        } else if rho_right <= rho_crit {
            flow(rho_right)
        } else {
            // 左右状态跨越流量峰值
            flow(rho_crit)
        }
    } else if rho_left <= rho_crit {
        flow(rho_left)
    } else if rho_right >= rho_crit {
        flow(rho_right)
    } else {
        flow(rho_crit)
    }
}

// ========================================================================
// 测试
// ========================================================================
