//! # Only Ops
//!
//! `only_ops`是一个张量计算引擎的算子层：
//! 用声明式的算子描述符（`OpDescriptor`）约束每个算子的参数个数与元素类型，
//! 并在其上实现三维（体积）池化的形状推断、前向计算与反向梯度回传。
//!

pub mod errors;
pub mod ops;
pub mod shape;
pub mod tensor;
pub mod utils;
