/*
 * @Author       : 老董
 * @Date         : 2026-02-13
 * @Description  : 三维池化的形状推断（含SAME/VALID补零的求解）
 *
 * 每个空间轴（输入I、核K、步长S、膨胀Di、补零P）：
 * - 有效核大小 K' = K + (K-1)(Di-1)
 * - VALID: O = floor((I + 2P - K') / S) + 1
 * - SAME : O = ceil(I / S)，总补零 max(0, (O-1)S + K' - I)，
 *          前端取 floor(总补零/2)，余下的落在末端（窗口直接越过末端即可）
 */

use super::params::{DataFormat, Pool3dParams};
use crate::errors::OpError;
use crate::ops::DataType;
use crate::require;
use crate::shape::{ConstantShapeHelper, ShapeDescriptor};
use std::sync::Arc;

const AXIS_NAMES: [&str; 3] = ["深度", "高度", "宽度"];

/// 一次池化调用解析出的几何信息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pool3dGeometry {
    pub batch: usize,
    pub channels: usize,
    pub input: [usize; 3],
    pub output: [usize; 3],
    /// 实际使用的前端补零（SAME模式下为重新计算的值）
    pub padding: [usize; 3],
}

impl Pool3dGeometry {
    pub fn output_shape(&self, format: DataFormat) -> [usize; 5] {
        format.compose_shape(self.batch, self.channels, self.output)
    }

    pub fn input_shape(&self, format: DataFormat) -> [usize; 5] {
        format.compose_shape(self.batch, self.channels, self.input)
    }
}

/// 有效核大小 K + (K-1)(Di-1)；核或膨胀为0、或结果溢出时为`None`
pub fn effective_kernel(kernel: usize, dilation: usize) -> Option<usize> {
    kernel
        .checked_sub(1)?
        .checked_mul(dilation.checked_sub(1)?)?
        .checked_add(kernel)
}

fn overflow_error(op_name: &str, axis: usize) -> OpError {
    OpError::configuration(
        op_name,
        format!("{}方向的核/膨胀/补零/步长过大，尺寸计算溢出", AXIS_NAMES[axis]),
    )
}

/// 一个窗口在某个轴上落在[0, extent)内的采样序号范围[first, last]，没有则为`None`。
/// `start`为窗口第0个采样点的坐标（可为负）
pub(crate) fn in_bounds_taps(
    start: i128,
    kernel: usize,
    dilation: usize,
    extent: usize,
) -> Option<(usize, usize)> {
    if kernel == 0 || dilation == 0 {
        return None;
    }
    let (kernel, dilation, extent) = (kernel as i128, dilation as i128, extent as i128);
    let first = if start >= 0 {
        0
    } else {
        (-start + dilation - 1) / dilation
    };
    let span = extent - 1 - start;
    if span < 0 {
        return None;
    }
    let last = (span / dilation).min(kernel - 1);
    (first <= last).then_some((first as usize, last as usize))
}

/// 第`out_idx`个窗口的起点坐标
pub(crate) fn window_start(out_idx: usize, stride: usize, padding: usize) -> i128 {
    out_idx as i128 * stride as i128 - padding as i128
}

/// 计算输出的空间尺寸[oD, oH, oW]
pub fn calc_out_size_pool3d(
    op_name: &str,
    params: &Pool3dParams,
    input: [usize; 3],
) -> Result<[usize; 3], OpError> {
    let mut output = [0; 3];
    for axis in 0..3 {
        let stride = params.stride[axis];
        output[axis] = if params.same_mode {
            input[axis].div_ceil(stride)
        } else {
            let eff_kernel = effective_kernel(params.kernel[axis], params.dilation[axis])
                .ok_or_else(|| overflow_error(op_name, axis))?;
            let padded = params.padding[axis]
                .checked_mul(2)
                .and_then(|pad| pad.checked_add(input[axis]))
                .ok_or_else(|| overflow_error(op_name, axis))?;
            require!(
                padded >= eff_kernel,
                op_name,
                "{}方向补零后的输入尺寸{padded}小于有效核大小{eff_kernel}",
                AXIS_NAMES[axis]
            );
            (padded - eff_kernel) / stride + 1
        };
    }
    Ok(output)
}

/// SAME模式下求前端补零[pD, pH, pW]
pub fn calc_padding3d(
    op_name: &str,
    output: [usize; 3],
    input: [usize; 3],
    kernel: [usize; 3],
    stride: [usize; 3],
    dilation: [usize; 3],
) -> Result<[usize; 3], OpError> {
    let mut padding = [0; 3];
    for axis in 0..3 {
        if output[axis] == 0 {
            continue;
        }
        let needed = effective_kernel(kernel[axis], dilation[axis])
            .and_then(|eff_kernel| {
                (output[axis] - 1)
                    .checked_mul(stride[axis])?
                    .checked_add(eff_kernel)
            })
            .ok_or_else(|| overflow_error(op_name, axis))?;
        padding[axis] = needed.saturating_sub(input[axis]) / 2;
    }
    Ok(padding)
}

/// 由输入形状解析出池化几何信息。
/// 要求输入为5阶；SAME模式下总是重新求补零，忽略调用方给的值；
/// 并保证每个输出窗口在每个轴上至少有一个落在输入内的采样点。
pub fn resolve_geometry(
    op_name: &str,
    params: &Pool3dParams,
    input_shape: &[usize],
) -> Result<Pool3dGeometry, OpError> {
    require!(
        input_shape.len() == 5,
        op_name,
        "输入的阶数须为5，实际为{}",
        input_shape.len()
    );

    let format = params.data_format;
    let depth_axis = format.depth_axis();
    let batch = input_shape[0];
    let channels = input_shape[format.channel_axis()];
    let input = [
        input_shape[depth_axis],
        input_shape[depth_axis + 1],
        input_shape[depth_axis + 2],
    ];

    let output = calc_out_size_pool3d(op_name, params, input)?;
    let padding = if params.same_mode {
        let padding = calc_padding3d(
            op_name,
            output,
            input,
            params.kernel,
            params.stride,
            params.dilation,
        )?;
        if params.padding != [0, 0, 0] && params.padding != padding {
            log::warn!(
                "{op_name}: SAME模式下忽略给定的补零{:?}，改用{:?}",
                params.padding,
                padding
            );
        }
        log::debug!("{op_name}: SAME模式补零为{padding:?}");
        padding
    } else {
        params.padding
    };

    for axis in 0..3 {
        check_window_coverage(op_name, params, axis, input[axis], output[axis], padding[axis])?;
    }

    Ok(Pool3dGeometry {
        batch,
        channels,
        input,
        output,
        padding,
    })
}

// 每个输出窗口在该轴上须至少有一个采样点落在[0, extent)内
fn check_window_coverage(
    op_name: &str,
    params: &Pool3dParams,
    axis: usize,
    extent: usize,
    out_extent: usize,
    padding: usize,
) -> Result<(), OpError> {
    for out_idx in 0..out_extent {
        let start = window_start(out_idx, params.stride[axis], padding);
        require!(
            in_bounds_taps(start, params.kernel[axis], params.dilation[axis], extent).is_some(),
            op_name,
            "第{out_idx}个输出窗口在{}方向上完全落在输入之外（输入尺寸{extent}，补零{padding}）",
            AXIS_NAMES[axis]
        );
    }
    Ok(())
}

/// 前向形状推断：保留batch与通道，替换空间尺寸；类型与内存顺序照搬输入
pub fn infer_pool3d_output_shape(
    op_name: &str,
    params: &Pool3dParams,
    input: &ShapeDescriptor,
) -> Result<Arc<ShapeDescriptor>, OpError> {
    let geometry = resolve_geometry(op_name, params, input.shape())?;
    let output_shape = geometry.output_shape(params.data_format);
    let desc = ShapeDescriptor::new(&output_shape, input.dtype(), input.order());
    Ok(ConstantShapeHelper::instance().create_shape_info(desc))
}

/// 反向形状推断：输入梯度与原输入形状相同，元素类型取自输出梯度
pub fn infer_pool3d_bp_shape(input: &ShapeDescriptor, grad_dtype: DataType) -> Arc<ShapeDescriptor> {
    ConstantShapeHelper::instance().create_shape_info(input.with_dtype(grad_dtype))
}
