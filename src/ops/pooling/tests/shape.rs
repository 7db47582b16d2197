/*
 * @Author       : 老董
 * @Date         : 2026-02-18
 * @Description  : 三维池化形状推断的单元测试
 */

use super::pool_args;
use crate::assert_err;
use crate::errors::OpError;
use crate::ops::DataType;
use crate::ops::pooling::{
    Pool3dParams, calc_out_size_pool3d, calc_padding3d, effective_kernel,
    infer_pool3d_bp_shape, infer_pool3d_output_shape, resolve_geometry,
};
use crate::ops::pooling::shape::in_bounds_taps;
use crate::shape::{Order, ShapeDescriptor};
use std::sync::Arc;

fn params(args: &[i64]) -> Pool3dParams {
    Pool3dParams::from_i_args("pool", args).unwrap()
}

#[test]
fn test_effective_kernel() {
    assert_eq!(effective_kernel(2, 1), Some(2));
    assert_eq!(effective_kernel(3, 2), Some(5));
    assert_eq!(effective_kernel(1, 4), Some(1));
    assert_eq!(effective_kernel(0, 1), None);
    assert_eq!(effective_kernel(1 << 33, 1 << 33), None);
}

// ==================== VALID ====================

#[test]
fn test_valid_output_size() -> Result<(), OpError> {
    let p = params(&pool_args([2; 3], [2; 3], [0; 3], [1; 3], false, 0, None));
    assert_eq!(calc_out_size_pool3d("pool", &p, [4, 4, 4])?, [2, 2, 2]);

    // D: (5+2-3)/1+1=5, H: (6-2)/2+1=3, W: (7-2)/3+1=2
    let p = params(&pool_args([3, 2, 2], [1, 2, 3], [1, 0, 0], [1; 3], false, 0, None));
    assert_eq!(calc_out_size_pool3d("pool", &p, [5, 6, 7])?, [5, 3, 2]);

    // 膨胀后的有效核：W方向 2+(2-1)*(3-1)=4，(9-4)/1+1=6
    let p = params(&pool_args([1, 1, 2], [1; 3], [0; 3], [1, 1, 3], false, 0, None));
    assert_eq!(calc_out_size_pool3d("pool", &p, [1, 1, 9])?, [1, 1, 6]);
    Ok(())
}

#[test]
fn test_valid_input_smaller_than_kernel() {
    let p = params(&pool_args([3; 3], [1; 3], [0; 3], [1; 3], false, 0, None));
    assert_err!(
        calc_out_size_pool3d("pool", &p, [2, 8, 8]),
        OpError::Configuration("深度方向")
    );
}

// ==================== SAME ====================

#[test]
fn test_same_output_size_ignores_padding() -> Result<(), OpError> {
    let no_pad = params(&pool_args([3; 3], [2, 4, 3], [0; 3], [1; 3], true, 0, None));
    let big_pad = params(&pool_args([3; 3], [2, 4, 3], [9; 3], [1; 3], true, 0, None));
    assert_eq!(calc_out_size_pool3d("pool", &no_pad, [5, 6, 7])?, [3, 2, 3]);
    assert_eq!(calc_out_size_pool3d("pool", &big_pad, [5, 6, 7])?, [3, 2, 3]);
    Ok(())
}

#[test]
fn test_same_padding_is_floor_of_half() -> Result<(), OpError> {
    // 总补零 (3-1)*2+3-5=2 → 1；(3-1)*2+2-6=0 → 0；(4-1)*1+4-4=3 → 1
    assert_eq!(
        calc_padding3d("pool", [3, 3, 4], [5, 6, 4], [3, 2, 4], [2, 2, 1], [1; 3])?,
        [1, 0, 1]
    );
    // 输出为空时不补零
    assert_eq!(
        calc_padding3d("pool", [0; 3], [5; 3], [3; 3], [1; 3], [1; 3])?,
        [0; 3]
    );
    Ok(())
}

#[test]
fn test_same_geometry_recomputes_padding() -> Result<(), OpError> {
    let p = params(&pool_args([3; 3], [2; 3], [4, 0, 2], [1; 3], true, 0, None));
    let geometry = resolve_geometry("pool", &p, &[1, 2, 5, 5, 5])?;
    assert_eq!(geometry.output, [3, 3, 3]);
    assert_eq!(geometry.padding, [1, 1, 1]);
    Ok(())
}

// ==================== 几何信息 ====================

#[test]
fn test_geometry_by_layout() -> Result<(), OpError> {
    let ncdhw = params(&pool_args([2; 3], [2; 3], [0; 3], [1; 3], false, 0, None));
    let geometry = resolve_geometry("pool", &ncdhw, &[2, 3, 4, 6, 8])?;
    assert_eq!((geometry.batch, geometry.channels), (2, 3));
    assert_eq!(geometry.input, [4, 6, 8]);
    assert_eq!(geometry.output, [2, 3, 4]);

    let ndhwc = params(&pool_args([2; 3], [2; 3], [0; 3], [1; 3], false, 0, Some(true)));
    let geometry = resolve_geometry("pool", &ndhwc, &[2, 4, 6, 8, 3])?;
    assert_eq!((geometry.batch, geometry.channels), (2, 3));
    assert_eq!(geometry.input, [4, 6, 8]);
    assert_eq!(geometry.output_shape(ndhwc.data_format), [2, 2, 3, 4, 3]);
    assert_eq!(geometry.input_shape(ndhwc.data_format), [2, 4, 6, 8, 3]);
    Ok(())
}

#[test]
fn test_rank_must_be_five() {
    let p = params(&pool_args([2; 3], [2; 3], [0; 3], [1; 3], false, 0, None));
    assert_err!(
        resolve_geometry("pool", &p, &[1, 4, 4, 4]),
        OpError::Configuration("阶数须为5")
    );
}

#[test]
fn test_window_entirely_in_padding_rejected() {
    // 第0个窗口的采样点为-2、-1，全部落在补零区域
    let p = params(&pool_args([1, 1, 2], [1; 3], [0, 0, 2], [1; 3], false, 0, None));
    assert_err!(
        resolve_geometry("pool", &p, &[1, 1, 1, 1, 4]),
        OpError::Configuration("完全落在输入之外")
    );
}

// ==================== 形状推断 ====================

#[test]
fn test_infer_output_shape_keeps_dtype_and_order() -> Result<(), OpError> {
    let p = params(&pool_args([2; 3], [2; 3], [0; 3], [1; 3], false, 0, None));
    let input = ShapeDescriptor::new(&[1, 1, 4, 4, 4], DataType::Half, Order::F);
    let output = infer_pool3d_output_shape("pool", &p, &input)?;
    assert_eq!(output.shape(), &[1, 1, 2, 2, 2]);
    assert_eq!(output.dtype(), DataType::Half);
    assert_eq!(output.order(), Order::F);

    // 同样的输入总是得到同一个规范句柄
    let again = infer_pool3d_output_shape("pool", &p, &input)?;
    assert!(Arc::ptr_eq(&output, &again));
    Ok(())
}

#[test]
fn test_infer_bp_shape_takes_grad_dtype() {
    let input = ShapeDescriptor::new(&[2, 3, 4, 4, 4], DataType::Int32, Order::C);
    let grad_i = infer_pool3d_bp_shape(&input, DataType::Double);
    assert_eq!(grad_i.shape(), &[2, 3, 4, 4, 4]);
    assert_eq!(grad_i.dtype(), DataType::Double);
    assert_eq!(grad_i.order(), Order::C);
}

// ==================== 超大参数 ====================

#[test]
fn test_huge_padding_is_configuration_error() {
    let p = params(&pool_args([2; 3], [1; 3], [i64::MAX, 0, 0], [1; 3], false, 0, None));
    assert_err!(
        resolve_geometry("pool", &p, &[1, 1, 4, 4, 4]),
        OpError::Configuration("溢出")
    );
}

#[test]
fn test_huge_kernel_and_dilation_is_configuration_error() {
    let huge = 1i64 << 33;
    let valid = params(&pool_args([2, huge, 2], [1; 3], [0; 3], [1, huge, 1], false, 0, None));
    assert_err!(
        resolve_geometry("pool", &valid, &[1, 1, 4, 4, 4]),
        OpError::Configuration("高度方向")
    );

    // SAME模式在求补零时同样需要有效核大小
    let same = params(&pool_args([2, 2, huge], [1; 3], [0; 3], [1, 1, huge], true, 0, None));
    assert_err!(
        resolve_geometry("pool", &same, &[1, 1, 4, 4, 4]),
        OpError::Configuration("溢出")
    );
}

#[test]
fn test_in_bounds_taps() {
    // 起点-2、核4、膨胀1、尺寸3：采样点-2..=1，落在输入内的是序号2、3
    assert_eq!(in_bounds_taps(-2, 4, 1, 3), Some((2, 3)));
    // 起点-3、核3、膨胀2：采样点-3、-1、1，只有序号2落在输入内
    assert_eq!(in_bounds_taps(-3, 3, 2, 5), Some((2, 2)));
    // 采样点-1、2跳过了尺寸为1的输入
    assert_eq!(in_bounds_taps(-1, 2, 3, 1), None);
    assert_eq!(in_bounds_taps(4, 2, 1, 4), None);
    // 超大核只截取到输入末端
    assert_eq!(in_bounds_taps(-1_000_000_000, 2_000_000_001, 1, 4), Some((1_000_000_000, 1_000_000_003)));
}
