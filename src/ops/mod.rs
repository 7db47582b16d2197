//! # 声明式算子
//!
//! 算子描述符（`OpDescriptor`）、类型约束检查、调用上下文、
//! 统一的调用流程（`DeclarableOp`）以及池化算子族。

mod context;
mod declarable;
mod descriptor;
mod registry;
mod type_check;
mod types;

pub mod pooling;

pub use self::context::OpContext;
pub use self::declarable::DeclarableOp;
pub use self::descriptor::{AllowedTypes, OpDescriptor, OpDescriptorBuilder, VARIADIC, long_hash};
pub use self::registry::OpRegistry;
pub use self::type_check::validate_data_types;
pub use self::types::{ALL_FLOATS, ALL_INDICES, ALL_INTS, DataType, InputType};

#[cfg(test)]
mod tests;
