/*
 * @Author       : 老董
 * @Date         : 2026-02-15
 * @Description  : 三维最大池化算子（前向`maxpool3dnew`与反向`maxpool3dnew_bp`）
 *
 * 输入/输出：
 * - 前向：input [bS, iC, iD, iH, iW]（NCDHW）或 [bS, iD, iH, iW, iC]（NDHWC）
 *         → output [bS, iC, oD, oH, oW] 或 [bS, oD, oH, oW, iC]
 * - 反向：input + gradO（形如前向输出）→ gradI（形如input）
 * 整数参数见`Pool3dParams`
 */

use super::executor::{PoolingMode, pool3d_backward, pool3d_forward};
use super::params::Pool3dParams;
use super::shape::{infer_pool3d_bp_shape, infer_pool3d_output_shape};
use crate::errors::OpError;
use crate::ops::context::OpContext;
use crate::ops::declarable::DeclarableOp;
use crate::ops::descriptor::OpDescriptor;
use crate::ops::types::{ALL_FLOATS, DataType};
use crate::shape::ShapeDescriptor;
use crate::tensor::Tensor;
use std::sync::Arc;

/// 三维最大池化（前向）
#[derive(Debug, Clone)]
pub struct MaxPool3d {
    descriptor: OpDescriptor,
}

impl MaxPool3d {
    pub const NAME: &'static str = "maxpool3dnew";

    pub fn new() -> Result<Self, OpError> {
        let descriptor =
            OpDescriptor::custom(Self::NAME, 1, 1, false, 0, Pool3dParams::NUM_I_ARGS as i32)
                .allowed_input_types(&[DataType::Any])
                .same_mode(true)
                .build()?;
        Ok(Self { descriptor })
    }
}

impl DeclarableOp for MaxPool3d {
    fn descriptor(&self) -> &OpDescriptor {
        &self.descriptor
    }

    fn calculate_output_shape(
        &self,
        ctx: &OpContext<'_>,
    ) -> Result<Vec<Arc<ShapeDescriptor>>, OpError> {
        let params = Pool3dParams::from_i_args(self.name(), ctx.i_args())?;
        let input = ctx.input(self.name(), 0)?;
        let output = infer_pool3d_output_shape(self.name(), &params, &input.shape_descriptor())?;
        Ok(vec![output])
    }

    fn validate_and_execute(
        &self,
        ctx: &OpContext<'_>,
        outputs: &mut [Tensor],
    ) -> Result<(), OpError> {
        let params = Pool3dParams::from_i_args(self.name(), ctx.i_args())?;
        pool3d_forward(self.name(), ctx, &params, outputs, PoolingMode::Max)
    }
}

/// 三维最大池化（反向）
#[derive(Debug, Clone)]
pub struct MaxPool3dBp {
    descriptor: OpDescriptor,
}

impl MaxPool3dBp {
    pub const NAME: &'static str = "maxpool3dnew_bp";

    pub fn new() -> Result<Self, OpError> {
        let descriptor =
            OpDescriptor::custom(Self::NAME, 2, 1, false, 0, Pool3dParams::NUM_I_ARGS as i32)
                .allowed_input_types(&[DataType::Any])
                .allowed_output_types(ALL_FLOATS)
                .build()?;
        Ok(Self { descriptor })
    }
}

impl DeclarableOp for MaxPool3dBp {
    fn descriptor(&self) -> &OpDescriptor {
        &self.descriptor
    }

    fn calculate_output_shape(
        &self,
        ctx: &OpContext<'_>,
    ) -> Result<Vec<Arc<ShapeDescriptor>>, OpError> {
        // 只为尽早拒绝非法参数（如膨胀为0）
        Pool3dParams::from_i_args(self.name(), ctx.i_args())?;
        let input = ctx.input(self.name(), 0)?;
        let grad_o = ctx.input(self.name(), 1)?;
        Ok(vec![infer_pool3d_bp_shape(
            &input.shape_descriptor(),
            grad_o.dtype(),
        )])
    }

    fn validate_and_execute(
        &self,
        ctx: &OpContext<'_>,
        outputs: &mut [Tensor],
    ) -> Result<(), OpError> {
        let params = Pool3dParams::from_i_args(self.name(), ctx.i_args())?;
        pool3d_backward(self.name(), ctx, &params, outputs, PoolingMode::Max)
    }
}
