use super::Tensor;
use crate::errors::TensorError;
use ndarray::{ArrayView5, ArrayViewMut5};
use std::collections::HashSet;

impl Tensor {
    /// 交换张量的两个（以上）维度，并将其返回（不影响原张量）。
    /// 只改变步长，得到的张量与原张量各自持有一份数据。
    pub fn permute(&self, axes: &[usize]) -> Self {
        self.check_permute_axes(axes)
            .unwrap_or_else(|e| panic!("{}", e));
        Self {
            data: self.data.clone().permuted_axes(axes),
            dtype: self.dtype,
            order: self.order,
        }
    }

    /// 5阶张量按`axes`置换后的快照，不复制数据
    pub fn permuted_view5(&self, axes: [usize; 5]) -> Result<ArrayView5<'_, f32>, TensorError> {
        self.check_permute_axes(&axes)?;
        Ok(self.view5()?.permuted_axes(axes))
    }

    /// 5阶张量按`axes`置换后的可变快照，写入直接落在原张量上
    pub fn permuted_view5_mut(
        &mut self,
        axes: [usize; 5],
    ) -> Result<ArrayViewMut5<'_, f32>, TensorError> {
        self.check_permute_axes(&axes)?;
        Ok(self.view5_mut()?.permuted_axes(axes))
    }

    // 检查axes中的所有元素必须是唯一且在[0, <张量维数>)范围内，且个数与维数一致
    fn check_permute_axes(&self, axes: &[usize]) -> Result<(), TensorError> {
        if axes.len() < 2 {
            return Err(TensorError::PermuteNeedAtLeast2Dims);
        }
        let unique_axes = axes.iter().copied().collect::<HashSet<_>>();
        if unique_axes.len() != axes.len()
            || axes.len() != self.dimension()
            || !unique_axes.iter().all(|&a| a < self.dimension())
        {
            return Err(TensorError::PermuteNeedUniqueAndInRange);
        }
        Ok(())
    }
}
