/*
 * @Author       : 老董
 * @Date         : 2026-02-12
 * @Description  : 本类仅包含一些属性方法与快照（view），除`fill`外不包含任何运算方法
 */

use super::Tensor;
use crate::errors::TensorError;
use crate::ops::DataType;
use crate::shape::{Order, ShapeDescriptor};
use ndarray::{ArrayView5, ArrayViewD, ArrayViewMut5, ArrayViewMutD, Ix5};

impl Tensor {
    /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓快照/view(_mut)↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
    pub fn view(&self) -> ArrayViewD<'_, f32> {
        self.data.view()
    }
    pub fn view_mut(&mut self) -> ArrayViewMutD<'_, f32> {
        self.data.view_mut()
    }

    /// 5阶快照，阶数不为5时报错
    pub fn view5(&self) -> Result<ArrayView5<'_, f32>, TensorError> {
        let rank = self.dimension();
        self.data
            .view()
            .into_dimensionality::<Ix5>()
            .map_err(|_| TensorError::RankMismatch {
                expected: 5,
                got: rank,
            })
    }
    pub fn view5_mut(&mut self) -> Result<ArrayViewMut5<'_, f32>, TensorError> {
        let rank = self.dimension();
        self.data
            .view_mut()
            .into_dimensionality::<Ix5>()
            .map_err(|_| TensorError::RankMismatch {
                expected: 5,
                got: rank,
            })
    }
    /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑快照/view(_mut)↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// 张量的维（dim）数、阶（rank）数
    /// 即`shape()`的元素个数--如：形状为`[]`的标量阶数为0，向量阶数为1，矩阵阶数为2，以此类推
    pub fn dimension(&self) -> usize {
        self.data.ndim()
    }

    /// 计算张量中所有元素的数量
    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn dtype(&self) -> DataType {
        self.dtype
    }

    pub fn order(&self) -> Order {
        self.order
    }

    /// 判断两个张量的形状是否严格一致。如：形状为 [1, 4]，[1, 4]和[4]是不一致的，会返回false
    pub fn is_same_shape(&self, other: &Self) -> bool {
        self.shape() == other.shape()
    }

    /// 当前张量的(形状, 类型, 顺序)描述
    pub fn shape_descriptor(&self) -> ShapeDescriptor {
        ShapeDescriptor::new(self.shape(), self.dtype, self.order)
    }

    /// 按逻辑行优先顺序导出所有元素
    pub fn to_vec(&self) -> Vec<f32> {
        self.data.iter().copied().collect()
    }

    /// 将所有元素置为`value`
    pub fn fill(&mut self, value: f32) {
        self.data.fill(value);
    }
}
