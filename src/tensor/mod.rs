use ndarray::{Array, ArrayD, IxDyn, ShapeBuilder};

use crate::errors::TensorError;
use crate::ops::DataType;
use crate::shape::{Order, ShapeDescriptor};

mod index;
mod property;
mod shape;

#[cfg(test)]
mod tests;

/// 定义张量的结构体。其可以是标量、向量、矩阵或更高维度的数组。
/// 元素统一以`f32`存放；`dtype`是供算子做类型检查用的逻辑元素类型，
/// `order`是底层存储的内存顺序（按坐标读写时与之无关）。
#[derive(Debug, Clone)]
pub struct Tensor {
    data: ArrayD<f32>,
    dtype: DataType,
    order: Order,
}

impl Tensor {
    /// 创建一个`Float32`、行优先的张量。
    /// `data`按逻辑上的行优先顺序给出，其长度必须和`shape`中所有元素的乘积相等。
    pub fn new(data: &[f32], shape: &[usize]) -> Tensor {
        Self::new_with(data, shape, DataType::Float32, Order::C)
    }

    /// 同`new`，但指定逻辑元素类型与内存顺序。
    /// 无论`order`为何，`data`都按逻辑行优先顺序解释。
    pub fn new_with(data: &[f32], shape: &[usize], dtype: DataType, order: Order) -> Tensor {
        let expected = shape.iter().product::<usize>();
        assert!(
            data.len() == expected,
            "{}",
            TensorError::DataLenMismatch {
                data_len: data.len(),
                shape: shape.to_vec(),
                expected,
            }
        );
        let c_data = Array::from_shape_vec(IxDyn(shape), data.to_vec())
            .unwrap_or_else(|_| unreachable!("数据长度已与形状核对"));
        let data = match order {
            Order::C => c_data,
            Order::F => {
                let mut f_data = Array::zeros(IxDyn(shape).f());
                f_data.assign(&c_data);
                f_data
            }
        };
        Tensor { data, dtype, order }
    }

    /// 创建一个全零张量
    pub fn zeros(shape: &[usize], dtype: DataType, order: Order) -> Tensor {
        let data = match order {
            Order::C => Array::zeros(IxDyn(shape)),
            Order::F => Array::zeros(IxDyn(shape).f()),
        };
        Tensor { data, dtype, order }
    }

    /// 按形状描述符创建一个全零张量（算子分配输出缓冲区时使用）
    pub fn from_descriptor(desc: &ShapeDescriptor) -> Tensor {
        Self::zeros(desc.shape(), desc.dtype(), desc.order())
    }
}
