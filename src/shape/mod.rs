/*
 * 形状描述符：形状 + 元素类型 + 内存顺序。
 *
 * 算子的形状推断只产出`ShapeDescriptor`，再经`ConstantShapeHelper`驻留（intern）
 * 成规范句柄`Arc<ShapeDescriptor>`；同一组(形状, 类型, 顺序)总是得到同一个句柄。
 */

mod constant;

pub use self::constant::ConstantShapeHelper;

use crate::errors::shape_as_string;
use crate::ops::DataType;
use serde::{Deserialize, Serialize};
use std::fmt;

#[cfg(test)]
mod tests;

/// 内存顺序：`C`为行优先，`F`为列优先
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Order {
    #[default]
    C,
    F,
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Order::C => write!(f, "c"),
            Order::F => write!(f, "f"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShapeDescriptor {
    shape: Vec<usize>,
    dtype: DataType,
    order: Order,
}

impl ShapeDescriptor {
    pub fn new(shape: &[usize], dtype: DataType, order: Order) -> Self {
        Self {
            shape: shape.to_vec(),
            dtype,
            order,
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn dtype(&self) -> DataType {
        self.dtype
    }

    pub fn order(&self) -> Order {
        self.order
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// 元素总个数
    pub fn length(&self) -> usize {
        self.shape.iter().product()
    }

    /// 只比较形状，不比较类型与顺序
    pub fn is_same_shape(&self, shape: &[usize]) -> bool {
        self.shape == shape
    }

    /// 形状相同、顺序相同，但元素类型替换为`dtype`
    pub fn with_dtype(&self, dtype: DataType) -> Self {
        Self {
            shape: self.shape.clone(),
            dtype,
            order: self.order,
        }
    }
}

impl fmt::Display for ShapeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} '{}'",
            shape_as_string(&self.shape),
            self.dtype,
            self.order
        )
    }
}
