// crates/zf_foundation/src/error.rs

//! 错误处理模块，定义统一错误类型
//!
//! 提供 `ZfError` 枚举和 `ZfResult` 类型别名，用于整个项目的错误处理。
//!
//! # 设计原则
//!
//! 1. **层次化**: 基础层只定义核心错误，求解器在调用处给出具体语境
//! 2. **易用性**: 提供便捷的构造方法
//! 3. **快速失败**: 配置/前置条件违规在分配网格之前报告给调用者
//!
//! # 示例
//!
//! ```
//! use zf_foundation::error::{ZfError, ZfResult};
//!
//! fn read_config() -> ZfResult<()> {
//!     Err(ZfError::config("cfl_factor 必须在 (0, 1] 内"))
//! }
//! ```

use thiserror::Error;

/// 统一结果类型
pub type ZfResult<T> = Result<T, ZfError>;

/// ZemiFlow 错误类型
///
/// 核心错误类型，用于整个项目。局部数值瑕疵（负密度、负速度、
/// 加权平均中的除零）由求解器钳制恢复，不经过此类型。
#[derive(Error, Debug)]
pub enum ZfError {
    /// 配置错误
    #[error("配置错误: {message}")]
    Config {
        /// 具体错误信息
        message: String,
    },

    /// 数据超出范围
    #[error("数据超出范围: {field}={value}, 期望范围=[{min}, {max}]")]
    OutOfRange {
        /// 字段名
        field: &'static str,
        /// 实际值
        value: f64,
        /// 最小允许值
        min: f64,
        /// 最大允许值
        max: f64,
    },

    /// 数组大小不匹配
    #[error("数组大小不匹配: {name} 期望{expected}, 实际{actual}")]
    SizeMismatch {
        /// 数据名称
        name: &'static str,
        /// 期望大小
        expected: usize,
        /// 实际大小
        actual: usize,
    },

    /// 数值不稳定
    #[error("数值不稳定: {message}")]
    NumericalInstability {
        /// 具体错误信息
        message: String,
    },

    /// 无效输入
    #[error("无效的输入数据: {message}")]
    InvalidInput {
        /// 说明无效原因
        message: String,
    },

    /// 任务取消
    #[error("任务取消")]
    TaskCancelled,

    /// 内部错误
    #[error("内部错误: {message}")]
    Internal {
        /// 内部错误描述
        message: String,
    },
}

// ========================================================================
// 便捷构造方法
// ========================================================================

impl ZfError {
    /// 配置错误
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// 数据超出范围
    pub fn out_of_range(field: &'static str, value: f64, min: f64, max: f64) -> Self {
        Self::OutOfRange {
            field,
            value,
            min,
            max,
        }
    }

    /// 数组大小不匹配
    pub fn size_mismatch(name: &'static str, expected: usize, actual: usize) -> Self {
        Self::SizeMismatch {
            name,
            expected,
            actual,
        }
    }

    /// 数值不稳定
    pub fn numerical_instability(message: impl Into<String>) -> Self {
        Self::NumericalInstability {
            message: message.into(),
        }
    }

    /// 无效输入
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// 内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

// ========================================================================
// 验证辅助方法
// ========================================================================

impl ZfError {
    /// 检查数组大小是否匹配
    #[inline]
    pub fn check_size(name: &'static str, expected: usize, actual: usize) -> ZfResult<()> {
        if expected != actual {
            Err(Self::size_mismatch(name, expected, actual))
        } else {
            Ok(())
        }
    }

    /// 检查值是否在范围内
    #[inline]
    pub fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> ZfResult<()> {
        if !value.is_finite() || value < min || value > max {
            Err(Self::out_of_range(field, value, min, max))
        } else {
            Ok(())
        }
    }

    /// 检查值为正且有限
    #[inline]
    pub fn check_positive(field: &'static str, value: f64) -> ZfResult<()> {
        if !value.is_finite() || value <= 0.0 {
            Err(Self::out_of_range(field, value, f64::MIN_POSITIVE, f64::MAX))
        } else {
            Ok(())
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
    fn test_error_display() {
        let err = ZfError::config("测试配置错误");
        assert!(err.to_string().contains("配置错误"));
    }

    #[test]
    fn test_out_of_range_display() {
        let err = ZfError::out_of_range("cfl_factor", 1.5, 0.0, 1.0);
        assert!(err.to_string().contains("cfl_factor"));
        assert!(err.to_string().contains("1.5"));
    }

    #[test]
    fn test_size_mismatch() {
        let err = ZfError::size_mismatch("initial_density", 3, 2);
        assert!(err.to_string().contains("initial_density"));
        assert!(err.to_string().contains("3"));
        assert!(err.to_string().contains("2"));
    }

    #[test]
    fn test_check_size() {
        assert!(ZfError::check_size("test", 10, 10).is_ok());
        assert!(ZfError::check_size("test", 10, 5).is_err());
    }

    #[test]
    fn test_check_range() {
        assert!(ZfError::check_range("value", 5.0, 0.0, 10.0).is_ok());
        assert!(ZfError::check_range("value", -1.0, 0.0, 10.0).is_err());
        assert!(ZfError::check_range("value", 11.0, 0.0, 10.0).is_err());
        assert!(ZfError::check_range("value", f64::NAN, 0.0, 10.0).is_err());
    }

    #[test]
    fn test_check_positive() {
        assert!(ZfError::check_positive("dx", 0.1).is_ok());
        assert!(ZfError::check_positive("dx", 0.0).is_err());
        assert!(ZfError::check_positive("dx", -0.1).is_err());
        assert!(ZfError::check_positive("dx", f64::INFINITY).is_err());
    }
}
