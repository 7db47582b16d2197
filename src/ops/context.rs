/*
 * @Author       : 老董
 * @Date         : 2026-02-11
 * @Description  : 算子调用上下文：按位置存放输入张量、整数参数与标量参数
 */

use super::descriptor::{OpDescriptor, VARIADIC};
use crate::errors::{ArgumentKind, OpError};
use crate::tensor::Tensor;

/// 一次算子调用的上下文。只借用输入张量，调用结束后不保留任何引用
#[derive(Debug, Clone, Default)]
pub struct OpContext<'a> {
    inputs: Vec<&'a Tensor>,
    i_args: Vec<i64>,
    t_args: Vec<f64>,
}

impl<'a> OpContext<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_inputs(mut self, inputs: &[&'a Tensor]) -> Self {
        self.inputs = inputs.to_vec();
        self
    }

    pub fn with_i_args(mut self, i_args: &[i64]) -> Self {
        self.i_args = i_args.to_vec();
        self
    }

    pub fn with_t_args(mut self, t_args: &[f64]) -> Self {
        self.t_args = t_args.to_vec();
        self
    }

    /// 输入张量个数
    pub fn width(&self) -> usize {
        self.inputs.len()
    }

    pub fn inputs(&self) -> &[&'a Tensor] {
        &self.inputs
    }

    pub fn i_args(&self) -> &[i64] {
        &self.i_args
    }

    pub fn t_args(&self) -> &[f64] {
        &self.t_args
    }

    pub fn input(&self, op_name: &str, index: usize) -> Result<&'a Tensor, OpError> {
        self.inputs
            .get(index)
            .copied()
            .ok_or_else(|| OpError::ArgumentCount {
                op_name: op_name.to_string(),
                kind: ArgumentKind::Input,
                expected: index + 1,
                got: self.inputs.len(),
            })
    }

    pub fn int_arg(&self, op_name: &str, index: usize) -> Result<i64, OpError> {
        self.i_args
            .get(index)
            .copied()
            .ok_or_else(|| OpError::ArgumentCount {
                op_name: op_name.to_string(),
                kind: ArgumentKind::IntArg,
                expected: index + 1,
                got: self.i_args.len(),
            })
    }

    pub fn scalar_arg(&self, op_name: &str, index: usize) -> Result<f64, OpError> {
        self.t_args
            .get(index)
            .copied()
            .ok_or_else(|| OpError::ArgumentCount {
                op_name: op_name.to_string(),
                kind: ArgumentKind::ScalarArg,
                expected: index + 1,
                got: self.t_args.len(),
            })
    }

    /// 按描述符声明的下限核对输入个数、整数参数个数与标量参数个数
    pub fn validate_arity(&self, desc: &OpDescriptor) -> Result<(), OpError> {
        let checks = [
            (ArgumentKind::Input, desc.num_inputs(), self.inputs.len()),
            (ArgumentKind::IntArg, desc.num_i_args(), self.i_args.len()),
            (ArgumentKind::ScalarArg, desc.num_t_args(), self.t_args.len()),
        ];
        for (kind, required, got) in checks {
            if required == VARIADIC {
                continue;
            }
            let expected = required as usize;
            if got < expected {
                return Err(OpError::ArgumentCount {
                    op_name: desc.name().to_string(),
                    kind,
                    expected,
                    got,
                });
            }
        }
        Ok(())
    }
}
