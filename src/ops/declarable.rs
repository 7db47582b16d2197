/*
 * @Author       : 老董
 * @Date         : 2026-02-11
 * @Description  : 可声明算子（DeclarableOp）的统一调用流程
 *
 * 调用顺序：
 * 1. 按描述符核对参数个数；
 * 2. 类型约束检查（输入）；
 * 3. 形状推断，得到输出的规范形状句柄；
 * 4. 分配（或核对并清零调用方给出的）输出缓冲区，检查输出类型；
 * 5. 执行计算。
 * 任何一步失败都直接返回错误，不产出部分结果。
 */

use super::context::OpContext;
use super::descriptor::OpDescriptor;
use super::type_check::validate_data_types;
use super::types::DataType;
use crate::errors::{ArgumentKind, OpError};
use crate::shape::ShapeDescriptor;
use crate::tensor::Tensor;
use std::sync::Arc;

pub trait DeclarableOp: Send + Sync {
    fn descriptor(&self) -> &OpDescriptor;

    /// 形状推断：只读取输入的形状与参数，不触碰任何数据
    fn calculate_output_shape(
        &self,
        ctx: &OpContext<'_>,
    ) -> Result<Vec<Arc<ShapeDescriptor>>, OpError>;

    /// 实际计算。`outputs`已按推断出的形状分配好并清零
    fn validate_and_execute(
        &self,
        ctx: &OpContext<'_>,
        outputs: &mut [Tensor],
    ) -> Result<(), OpError>;

    fn name(&self) -> &str {
        self.descriptor().name()
    }

    /// 分配输出并执行
    fn execute(&self, ctx: &OpContext<'_>) -> Result<Vec<Tensor>, OpError> {
        self.validate_inputs(ctx)?;
        let shapes = self.calculate_output_shape(ctx)?;
        let mut outputs: Vec<Tensor> = shapes
            .iter()
            .map(|desc| Tensor::from_descriptor(desc))
            .collect();
        self.validate_output_types(ctx, &outputs)?;

        log::debug!("执行算子{}，输出形状{:?}", self.name(), shapes);
        self.validate_and_execute(ctx, &mut outputs)?;
        Ok(outputs)
    }

    /// 使用调用方给出的输出缓冲区执行；缓冲区会先被清零
    fn execute_into(&self, ctx: &OpContext<'_>, outputs: &mut [Tensor]) -> Result<(), OpError> {
        self.validate_inputs(ctx)?;
        let required = self.descriptor().num_outputs();
        if required > 0 && outputs.len() < required as usize {
            return Err(OpError::ArgumentCount {
                op_name: self.name().to_string(),
                kind: ArgumentKind::Output,
                expected: required as usize,
                got: outputs.len(),
            });
        }
        self.validate_output_types(ctx, outputs)?;

        outputs.iter_mut().for_each(|out| out.fill(0.0));
        log::debug!("执行算子{}（调用方提供输出）", self.name());
        self.validate_and_execute(ctx, outputs)
    }

    fn validate_inputs(&self, ctx: &OpContext<'_>) -> Result<(), OpError> {
        ctx.validate_arity(self.descriptor())?;
        let input_types: Vec<DataType> = ctx.inputs().iter().map(|t| t.dtype()).collect();
        validate_data_types(self.descriptor(), &input_types, &[])
    }

    fn validate_output_types(&self, ctx: &OpContext<'_>, outputs: &[Tensor]) -> Result<(), OpError> {
        let input_types: Vec<DataType> = ctx.inputs().iter().map(|t| t.dtype()).collect();
        let output_types: Vec<DataType> = outputs.iter().map(|t| t.dtype()).collect();
        validate_data_types(self.descriptor(), &input_types, &output_types)
    }
}
