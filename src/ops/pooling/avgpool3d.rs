/*
 * @Author       : 老董
 * @Date         : 2026-02-16
 * @Description  : 三维平均池化算子（`avgpool3dnew`与`avgpool3dnew_bp`）
 *
 * 与最大池化共用参数、形状推断与执行流程，只是归约方式不同：
 * 第14个整数参数（extraParam0）为0时只除以落在输入内的采样点个数，为1时除以整个核的体积
 */

use super::executor::{PoolingMode, pool3d_backward, pool3d_forward};
use super::params::Pool3dParams;
use super::shape::{infer_pool3d_bp_shape, infer_pool3d_output_shape};
use crate::errors::OpError;
use crate::ops::context::OpContext;
use crate::ops::declarable::DeclarableOp;
use crate::ops::descriptor::OpDescriptor;
use crate::ops::types::{ALL_FLOATS, DataType};
use crate::require;
use crate::shape::ShapeDescriptor;
use crate::tensor::Tensor;
use std::sync::Arc;

fn avg_mode(op_name: &str, params: &Pool3dParams) -> Result<PoolingMode, OpError> {
    require!(
        matches!(params.extra_param0, 0 | 1),
        op_name,
        "平均池化的附加参数须为0（不计补零）或1（计入补零），实际为{}",
        params.extra_param0
    );
    Ok(PoolingMode::Avg {
        include_padding: params.extra_param0 == 1,
    })
}

/// 三维平均池化（前向）
#[derive(Debug, Clone)]
pub struct AvgPool3d {
    descriptor: OpDescriptor,
}

impl AvgPool3d {
    pub const NAME: &'static str = "avgpool3dnew";

    pub fn new() -> Result<Self, OpError> {
        let descriptor =
            OpDescriptor::custom(Self::NAME, 1, 1, false, 0, Pool3dParams::NUM_I_ARGS as i32)
                .allowed_input_types(&[DataType::Any])
                .allowed_output_types(ALL_FLOATS)
                .build()?;
        Ok(Self { descriptor })
    }
}

impl DeclarableOp for AvgPool3d {
    fn descriptor(&self) -> &OpDescriptor {
        &self.descriptor
    }

    fn calculate_output_shape(
        &self,
        ctx: &OpContext<'_>,
    ) -> Result<Vec<Arc<ShapeDescriptor>>, OpError> {
        let params = Pool3dParams::from_i_args(self.name(), ctx.i_args())?;
        avg_mode(self.name(), &params)?;
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
        let mode = avg_mode(self.name(), &params)?;
        pool3d_forward(self.name(), ctx, &params, outputs, mode)
    }
}

/// 三维平均池化（反向）
#[derive(Debug, Clone)]
pub struct AvgPool3dBp {
    descriptor: OpDescriptor,
}

impl AvgPool3dBp {
    pub const NAME: &'static str = "avgpool3dnew_bp";

    pub fn new() -> Result<Self, OpError> {
        let descriptor =
            OpDescriptor::custom(Self::NAME, 2, 1, false, 0, Pool3dParams::NUM_I_ARGS as i32)
                .allowed_input_types(&[DataType::Any])
                .allowed_output_types(ALL_FLOATS)
                .build()?;
        Ok(Self { descriptor })
    }
}

impl DeclarableOp for AvgPool3dBp {
    fn descriptor(&self) -> &OpDescriptor {
        &self.descriptor
    }

    fn calculate_output_shape(
        &self,
        ctx: &OpContext<'_>,
    ) -> Result<Vec<Arc<ShapeDescriptor>>, OpError> {
        let params = Pool3dParams::from_i_args(self.name(), ctx.i_args())?;
        avg_mode(self.name(), &params)?;
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
        let mode = avg_mode(self.name(), &params)?;
        pool3d_backward(self.name(), ctx, &params, outputs, mode)
    }
}
