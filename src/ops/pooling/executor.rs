/*
 * @Author       : 老董
 * @Date         : 2026-02-14
 * @Description  : 三维池化的前向与反向计算
 *
 * 设计决策：
 * - 计算核心只处理NCDHW；NDHWC的输入/输出先置换成NCDHW快照（不复制数据），
 *   快照在函数结束时随作用域释放
 * - 补零不提供候选值，只让窗口起点前移；越界的采样点直接跳过
 * - 反向不缓存最大值位置，而是重放一遍前向的归约来找出argmax
 * - 使用 Rayon 在 batch×通道 维度并行：每个任务独占一个(b, c)切片，
 *   反向时重叠窗口的梯度在任务内部累加，无需原子操作或加锁
 */

use super::params::Pool3dParams;
use super::shape::{Pool3dGeometry, in_bounds_taps, resolve_geometry, window_start};
use crate::errors::{ArgumentKind, OpError};
use crate::ops::context::OpContext;
use crate::tensor::Tensor;
use ndarray::{ArrayView3, ArrayView5, ArrayViewMut5, s};
use rayon::prelude::*;

/// 池化的归约方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolingMode {
    Max,
    /// `include_padding`为真时除以整个核的体积，否则只除以落在输入内的采样点个数
    Avg { include_padding: bool },
}

/// 已解析好的窗口参数（补零为实际使用的前端补零）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolWindow {
    pub kernel: [usize; 3],
    pub stride: [usize; 3],
    pub padding: [usize; 3],
    pub dilation: [usize; 3],
}

impl PoolWindow {
    pub fn new(params: &Pool3dParams, geometry: &Pool3dGeometry) -> Self {
        Self {
            kernel: params.kernel,
            stride: params.stride,
            padding: geometry.padding,
            dilation: params.dilation,
        }
    }

    /// 某个轴上，每个输出坐标对应的（落在输入内的）输入坐标列表
    fn axis_taps(&self, axis: usize, out_extent: usize, in_extent: usize) -> Vec<Vec<usize>> {
        let dilation = self.dilation[axis];
        (0..out_extent)
            .map(|out_idx| {
                let start = window_start(out_idx, self.stride[axis], self.padding[axis]);
                match in_bounds_taps(start, self.kernel[axis], dilation, in_extent) {
                    // 范围内的采样点必然落在[0, in_extent)，转换不会截断
                    Some((first, last)) => (first..=last)
                        .map(|k| (start + k as i128 * dilation as i128) as usize)
                        .collect(),
                    None => Vec::new(),
                }
            })
            .collect()
    }

    // 按浮点累乘，超大核不会溢出
    fn kernel_volume(&self) -> f32 {
        self.kernel.iter().map(|&k| k as f32).product()
    }
}

struct Taps {
    depth: Vec<Vec<usize>>,
    height: Vec<Vec<usize>>,
    width: Vec<Vec<usize>>,
}

impl Taps {
    fn new(window: &PoolWindow, input: [usize; 3], output: [usize; 3]) -> Self {
        Self {
            depth: window.axis_taps(0, output[0], input[0]),
            height: window.axis_taps(1, output[1], input[1]),
            width: window.axis_taps(2, output[2], input[2]),
        }
    }

    fn field(&self, od: usize, oh: usize, ow: usize) -> impl Iterator<Item = [usize; 3]> + '_ {
        let (ds, hs, ws) = (&self.depth[od], &self.height[oh], &self.width[ow]);
        ds.iter().flat_map(move |&id| {
            hs.iter()
                .flat_map(move |&ih| ws.iter().map(move |&iw| [id, ih, iw]))
        })
    }
}

// 感受野内的最大值及其位置；相等时保留扫描顺序中的第一个
fn field_argmax(
    volume: &ArrayView3<'_, f32>,
    field: impl Iterator<Item = [usize; 3]>,
) -> Option<(f32, [usize; 3])> {
    let mut best: Option<(f32, [usize; 3])> = None;
    for pos in field {
        let value = volume[pos];
        let replace = match best {
            None => true,
            Some((max_val, _)) => value > max_val,
        };
        if replace {
            best = Some((value, pos));
        }
    }
    best
}

/// 前向池化。`input`为[bS, iC, iD, iH, iW]，`output`为[bS, iC, oD, oH, oW]，
/// 输出被完整覆盖
pub fn pooling3d(
    input: ArrayView5<'_, f32>,
    mut output: ArrayViewMut5<'_, f32>,
    window: &PoolWindow,
    mode: PoolingMode,
) {
    let (batch, channels) = (input.shape()[0], input.shape()[1]);
    let in_dhw = [input.shape()[2], input.shape()[3], input.shape()[4]];
    let out_dhw = [output.shape()[2], output.shape()[3], output.shape()[4]];
    let taps = Taps::new(window, in_dhw, out_dhw);
    let kernel_volume = window.kernel_volume();

    let slice_results: Vec<Vec<f32>> = (0..batch * channels)
        .into_par_iter()
        .map(|bc| {
            let (b, c) = (bc / channels, bc % channels);
            let volume = input.slice(s![b, c, .., .., ..]);
            let mut values = Vec::with_capacity(out_dhw.iter().product());

            for od in 0..out_dhw[0] {
                for oh in 0..out_dhw[1] {
                    for ow in 0..out_dhw[2] {
                        let value = match mode {
                            PoolingMode::Max => field_argmax(&volume, taps.field(od, oh, ow))
                                .map_or(f32::NEG_INFINITY, |(max_val, _)| max_val),
                            PoolingMode::Avg { include_padding } => {
                                let (sum, count) = taps
                                    .field(od, oh, ow)
                                    .fold((0.0f32, 0usize), |(sum, count), pos| {
                                        (sum + volume[pos], count + 1)
                                    });
                                let divisor = if include_padding {
                                    kernel_volume
                                } else {
                                    count as f32
                                };
                                if divisor > 0.0 { sum / divisor } else { 0.0 }
                            }
                        };
                        values.push(value);
                    }
                }
            }
            values
        })
        .collect();

    // 合并结果（按逻辑顺序写回，与输出的实际步长无关）
    for (bc, values) in slice_results.into_iter().enumerate() {
        let (b, c) = (bc / channels, bc % channels);
        let mut out_volume = output.slice_mut(s![b, c, .., .., ..]);
        out_volume
            .iter_mut()
            .zip(values)
            .for_each(|(dst, value)| *dst = value);
    }
}

/// 反向池化。`grad_o`形如前向输出，`grad_i`形如`input`；
/// 非最大值（或不在任何窗口内）的位置梯度为0
pub fn pooling3d_bp(
    input: ArrayView5<'_, f32>,
    grad_o: ArrayView5<'_, f32>,
    mut grad_i: ArrayViewMut5<'_, f32>,
    window: &PoolWindow,
    mode: PoolingMode,
) {
    let (batch, channels) = (input.shape()[0], input.shape()[1]);
    let in_dhw = [input.shape()[2], input.shape()[3], input.shape()[4]];
    let out_dhw = [grad_o.shape()[2], grad_o.shape()[3], grad_o.shape()[4]];
    let taps = Taps::new(window, in_dhw, out_dhw);
    let kernel_volume = window.kernel_volume();
    let flat = |[id, ih, iw]: [usize; 3]| (id * in_dhw[1] + ih) * in_dhw[2] + iw;

    let slice_grads: Vec<Vec<f32>> = (0..batch * channels)
        .into_par_iter()
        .map(|bc| {
            let (b, c) = (bc / channels, bc % channels);
            let volume = input.slice(s![b, c, .., .., ..]);
            let upstream = grad_o.slice(s![b, c, .., .., ..]);
            let mut sample_grad = vec![0.0f32; in_dhw.iter().product()];

            for od in 0..out_dhw[0] {
                for oh in 0..out_dhw[1] {
                    for ow in 0..out_dhw[2] {
                        let grad_val = upstream[[od, oh, ow]];
                        match mode {
                            PoolingMode::Max => {
                                if let Some((_, pos)) =
                                    field_argmax(&volume, taps.field(od, oh, ow))
                                {
                                    sample_grad[flat(pos)] += grad_val;
                                }
                            }
                            PoolingMode::Avg { include_padding } => {
                                let divisor = if include_padding {
                                    kernel_volume
                                } else {
                                    taps.field(od, oh, ow).count() as f32
                                };
                                if divisor > 0.0 {
                                    let share = grad_val / divisor;
                                    for pos in taps.field(od, oh, ow) {
                                        sample_grad[flat(pos)] += share;
                                    }
                                }
                            }
                        }
                    }
                }
            }
            sample_grad
        })
        .collect();

    for (bc, grads) in slice_grads.into_iter().enumerate() {
        let (b, c) = (bc / channels, bc % channels);
        let mut grad_volume = grad_i.slice_mut(s![b, c, .., .., ..]);
        grad_volume
            .iter_mut()
            .zip(grads)
            .for_each(|(dst, grad)| *dst = grad);
    }
}

fn first_output<'t>(op_name: &str, outputs: &'t mut [Tensor]) -> Result<&'t mut Tensor, OpError> {
    let got = outputs.len();
    outputs.first_mut().ok_or_else(|| OpError::ArgumentCount {
        op_name: op_name.to_string(),
        kind: ArgumentKind::Output,
        expected: 1,
        got,
    })
}

/// 前向流程：布局归一 → （SAME补零重算）→ 窗口归约 → 释放快照
pub(crate) fn pool3d_forward(
    op_name: &str,
    ctx: &OpContext<'_>,
    params: &Pool3dParams,
    outputs: &mut [Tensor],
    mode: PoolingMode,
) -> Result<(), OpError> {
    let input = ctx.input(op_name, 0)?;
    let geometry = resolve_geometry(op_name, params, input.shape())?;
    let output = first_output(op_name, outputs)?;

    let expected = geometry.output_shape(params.data_format);
    if output.shape() != expected {
        return Err(OpError::shape_mismatch(op_name, &expected, output.shape()));
    }

    let axes = params.data_format.to_ncdhw_axes();
    let input_view = input.permuted_view5(axes)?;
    let output_view = output.permuted_view5_mut(axes)?;
    pooling3d(input_view, output_view, &PoolWindow::new(params, &geometry), mode);
    Ok(())
}

/// 反向流程：与前向相同的布局处理，作用于输入、输出梯度与输入梯度三者
pub(crate) fn pool3d_backward(
    op_name: &str,
    ctx: &OpContext<'_>,
    params: &Pool3dParams,
    outputs: &mut [Tensor],
    mode: PoolingMode,
) -> Result<(), OpError> {
    let input = ctx.input(op_name, 0)?;
    let grad_o = ctx.input(op_name, 1)?;
    // SAME补零在此重新求出，而不是沿用前向时的值
    let geometry = resolve_geometry(op_name, params, input.shape())?;
    let grad_i = first_output(op_name, outputs)?;

    let expected_grad_o = geometry.output_shape(params.data_format);
    if grad_o.shape() != expected_grad_o {
        return Err(OpError::shape_mismatch(op_name, &expected_grad_o, grad_o.shape()));
    }
    let expected_grad_i = geometry.input_shape(params.data_format);
    if grad_i.shape() != expected_grad_i {
        return Err(OpError::shape_mismatch(op_name, &expected_grad_i, grad_i.shape()));
    }

    let axes = params.data_format.to_ncdhw_axes();
    let input_view = input.permuted_view5(axes)?;
    let grad_o_view = grad_o.permuted_view5(axes)?;
    let grad_i_view = grad_i.permuted_view5_mut(axes)?;
    pooling3d_bp(
        input_view,
        grad_o_view,
        grad_i_view,
        &PoolWindow::new(params, &geometry),
        mode,
    );
    Ok(())
}
