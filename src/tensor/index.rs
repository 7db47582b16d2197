use super::Tensor;
use crate::errors::TensorError;
use std::ops::{Index, IndexMut};

// 按坐标读写单个元素。坐标越界时panic，与切片的行为一致
impl<const N: usize> Index<[usize; N]> for Tensor {
    type Output = f32;

    fn index(&self, index: [usize; N]) -> &Self::Output {
        &self.data[&index[..]]
    }
}

impl<const N: usize> IndexMut<[usize; N]> for Tensor {
    fn index_mut(&mut self, index: [usize; N]) -> &mut Self::Output {
        &mut self.data[&index[..]]
    }
}

impl Index<&[usize]> for Tensor {
    type Output = f32;

    fn index(&self, index: &[usize]) -> &Self::Output {
        &self.data[index]
    }
}

impl IndexMut<&[usize]> for Tensor {
    fn index_mut(&mut self, index: &[usize]) -> &mut Self::Output {
        &mut self.data[index]
    }
}

impl Tensor {
    /// 按坐标读取元素，越界时返回错误
    pub fn get(&self, index: &[usize]) -> Result<f32, TensorError> {
        self.data
            .get(index)
            .copied()
            .ok_or_else(|| self.out_of_bounds(index))
    }

    /// 按坐标写入元素，越界时返回错误
    pub fn set(&mut self, index: &[usize], value: f32) -> Result<(), TensorError> {
        if self.data.get(index).is_none() {
            return Err(self.out_of_bounds(index));
        }
        self.data[index] = value;
        Ok(())
    }

    fn out_of_bounds(&self, index: &[usize]) -> TensorError {
        TensorError::IndexOutOfBounds {
            index: index.to_vec(),
            shape: self.shape().to_vec(),
        }
    }
}
