// crates/zf_foundation/src/lib.rs

//! 基础层模块
//!
//! 提供整个项目共享的基础设施：
//! - 统一错误类型 (error)
//!
//! 本层不依赖任何上层 crate，物理求解相关的语义全部在 `zf_physics` 中。

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;

pub use error::{ZfError, ZfResult};
