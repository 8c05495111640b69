// crates/zf_physics/src/solver/mod.rs

//! 求解器
//!
//! 单类别与多类别是共享同一数值设计模式的两条独立实现路径：
//! Godunov 界面通量 + 零梯度边界 + 守恒更新 + 非负钳制。
//!
//! 两个求解器均为同步、单线程的循环数组计算，不持有跨步共享
//! 可变状态；可选的协作取消令牌每个时间步检查一次。

pub mod multiclass;
pub mod single;

pub use multiclass::MulticlassLwrSolver;
pub use single::LwrSolver;
