// crates/zf_physics/src/initial.rs

//! 初始条件
//!
//! 初始密度由外部场景提供：位置回调（逐单元求值）或预构建数组。
//! 多类别回调返回的逐类别取值个数与 `n_classes` 不符时立即报错，
//! 不做静默丢弃或补零（可测试的显式策略）。

use zf_foundation::{ZfError, ZfResult};

/// 单类别初始密度
pub enum InitialDensity {
    /// 位置回调 x [km] → 密度 [veh/km]
    Profile(Box<dyn Fn(f64) -> f64 + Send + Sync>),
    /// 预构建数组，长度须等于 nx
    Values(Vec<f64>),
}

impl InitialDensity {
    /// 由回调创建
    pub fn profile(f: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        Self::Profile(Box::new(f))
    }

    /// 由数组创建
    pub fn values(v: Vec<f64>) -> Self {
        Self::Values(v)
    }

    /// 在空间网格上实体化初始密度场
    pub fn build(&self, x: &[f64]) -> ZfResult<Vec<f64>> {
        match self {
            Self::Profile(f) => Ok(x.iter().map(|&xi| f(xi)).collect()),
            Self::Values(v) => {
                ZfError::check_size("initial_density", x.len(), v.len())?;
                Ok(v.clone())
            }
        }
    }
}

/// 多类别初始密度
pub enum MulticlassInitialDensity {
    /// 位置回调 x → 逐类别密度序列（长度须等于 n_classes）
    Profile(Box<dyn Fn(f64) -> Vec<f64> + Send + Sync>),
    /// 标量回调：按约定只赋给下标 0 的类别，其余类别为零
    ScalarProfile(Box<dyn Fn(f64) -> f64 + Send + Sync>),
    /// 预构建数组 `[n_classes][nx]`
    Values(Vec<Vec<f64>>),
}

impl MulticlassInitialDensity {
    /// 由逐类别回调创建
    pub fn profile(f: impl Fn(f64) -> Vec<f64> + Send + Sync + 'static) -> Self {
        Self::Profile(Box::new(f))
    }

    /// 由标量回调创建
    pub fn scalar_profile(f: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        Self::ScalarProfile(Box::new(f))
    }

    /// 由数组创建
    pub fn values(v: Vec<Vec<f64>>) -> Self {
        Self::Values(v)
    }

    /// 在空间网格上实体化初始密度场 `[n_classes][nx]`
    pub fn build(&self, x: &[f64], n_classes: usize) -> ZfResult<Vec<Vec<f64>>> {
        let nx = x.len();
        match self {
            Self::Profile(f) => {
                let mut rho = vec![vec![0.0; nx]; n_classes];
                for (j, &xi) in x.iter().enumerate() {
                    let at_x = f(xi);
                    // 类别数不符：立即失败而非静默丢弃
                    ZfError::check_size("initial_density_classes", n_classes, at_x.len())?;
                    for (i, &value) in at_x.iter().enumerate() {
                        rho[i][j] = value;
                    }
                }
                Ok(rho)
            }
            Self::ScalarProfile(f) => {
                let mut rho = vec![vec![0.0; nx]; n_classes];
                for (j, &xi) in x.iter().enumerate() {
                    rho[0][j] = f(xi);
                }
                Ok(rho)
            }
            Self::Values(v) => {
                ZfError::check_size("initial_density_classes", n_classes, v.len())?;
                for field in v {
                    ZfError::check_size("initial_density", nx, field.len())?;
                }
                Ok(v.clone())
            }
        }
    }
}

// ========================================================================
// 测试
// ========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_evaluated_per_cell() {
        let init = InitialDensity::profile(|x| x * 2.0);
        let rho = init.build(&[0.0, 1.0, 2.0]).unwrap();
        assert_eq!(rho, vec![0.0, 2.0, 4.0]);
    }

    #[test]
    fn test_values_size_checked() {
        let init = InitialDensity::values(vec![1.0, 2.0]);
        assert!(init.build(&[0.0, 1.0, 2.0]).is_err());
        assert!(init.build(&[0.0, 1.0]).is_ok());
    }

    #[test]
    fn test_multiclass_profile() {
        let init = MulticlassInitialDensity::profile(|x| vec![x, 2.0 * x]);
        let rho = init.build(&[1.0, 2.0], 2).unwrap();
        assert_eq!(rho[0], vec![1.0, 2.0]);
        assert_eq!(rho[1], vec![2.0, 4.0]);
    }

    #[test]
    fn test_multiclass_profile_wrong_arity_fails_loudly() {
        // 回调返回 1 个值但模型有 2 个类别 → 立即报错
        let init = MulticlassInitialDensity::profile(|x| vec![x]);
        let err = init.build(&[0.0, 1.0], 2).unwrap_err();
        assert!(err.to_string().contains("initial_density_classes"));
    }

    #[test]
    fn test_multiclass_scalar_goes_to_class_zero() {
        let init = MulticlassInitialDensity::scalar_profile(|_| 42.0);
        let rho = init.build(&[0.0, 1.0], 3).unwrap();
        assert_eq!(rho[0], vec![42.0, 42.0]);
        assert_eq!(rho[1], vec![0.0, 0.0]);
        assert_eq!(rho[2], vec![0.0, 0.0]);
    }

    #[test]
    fn test_multiclass_values_shape_checked() {
        let init = MulticlassInitialDensity::values(vec![vec![1.0, 2.0]]);
        assert!(init.build(&[0.0, 1.0], 2).is_err());
        let init = MulticlassInitialDensity::values(vec![vec![1.0], vec![2.0]]);
        assert!(init.build(&[0.0, 1.0], 2).is_err());
    }
}
