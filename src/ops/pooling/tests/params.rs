use super::pool_args;
use crate::assert_err;
use crate::errors::{ArgumentKind, OpError};
use crate::ops::pooling::{DataFormat, Pool3dParams};

#[test]
fn test_parse_i_args() -> Result<(), OpError> {
    let args = pool_args([2, 3, 4], [1, 2, 3], [0, 1, 2], [1, 1, 2], true, 1, None);
    let params = Pool3dParams::from_i_args("pool", &args)?;
    assert_eq!(params.kernel, [2, 3, 4]);
    assert_eq!(params.stride, [1, 2, 3]);
    assert_eq!(params.padding, [0, 1, 2]);
    assert_eq!(params.dilation, [1, 1, 2]);
    assert!(params.same_mode);
    assert_eq!(params.extra_param0, 1);
    // 缺省为NCDHW
    assert_eq!(params.data_format, DataFormat::Ncdhw);
    Ok(())
}

#[test]
fn test_layout_flag() -> Result<(), OpError> {
    let ncdhw = pool_args([2; 3], [2; 3], [0; 3], [1; 3], false, 0, Some(false));
    let ndhwc = pool_args([2; 3], [2; 3], [0; 3], [1; 3], false, 0, Some(true));
    assert_eq!(
        Pool3dParams::from_i_args("pool", &ncdhw)?.data_format,
        DataFormat::Ncdhw
    );
    assert_eq!(
        Pool3dParams::from_i_args("pool", &ndhwc)?.data_format,
        DataFormat::Ndhwc
    );

    // 任何非0值都表示NDHWC
    let mut other = ncdhw.clone();
    other[14] = 7;
    assert_eq!(
        Pool3dParams::from_i_args("pool", &other)?.data_format,
        DataFormat::Ndhwc
    );
    Ok(())
}

#[test]
fn test_to_i_args_is_accepted_again() -> Result<(), OpError> {
    let args = pool_args([3, 3, 3], [2, 2, 2], [1, 1, 1], [1, 2, 1], false, 0, Some(true));
    let params = Pool3dParams::from_i_args("pool", &args)?;
    assert_eq!(params.to_i_args(), args);

    let short = pool_args([3, 3, 3], [2, 2, 2], [1, 1, 1], [1, 2, 1], false, 0, None);
    let reparsed = Pool3dParams::from_i_args("pool", &short)?.to_i_args();
    assert_eq!(reparsed.len(), 15);
    assert_eq!(reparsed[14], 0);
    Ok(())
}

#[test]
fn test_too_few_i_args() {
    let args = vec![2; 13];
    assert_err!(
        Pool3dParams::from_i_args("pool", &args),
        OpError::ArgumentCount { kind: ArgumentKind::IntArg, expected: 14, got: 13, .. }
    );
}

#[test]
fn test_zero_dilation_rejected() {
    let args = pool_args([2; 3], [2; 3], [0; 3], [1, 0, 1], false, 0, None);
    assert_err!(
        Pool3dParams::from_i_args("pool", &args),
        OpError::Configuration("膨胀（dilation）不能为0")
    );
}

#[test]
fn test_non_positive_values_rejected() {
    let args = pool_args([2, 0, 2], [2; 3], [0; 3], [1; 3], false, 0, None);
    assert_err!(
        Pool3dParams::from_i_args("pool", &args),
        OpError::Configuration("核大小")
    );

    let args = pool_args([2; 3], [2, 2, -1], [0; 3], [1; 3], false, 0, None);
    assert_err!(
        Pool3dParams::from_i_args("pool", &args),
        OpError::Configuration("步长")
    );

    let args = pool_args([2; 3], [2; 3], [0, -1, 0], [1; 3], false, 0, None);
    assert_err!(
        Pool3dParams::from_i_args("pool", &args),
        OpError::Configuration("不能为负数")
    );
}

#[test]
fn test_data_format_axes() {
    assert_eq!(DataFormat::Ncdhw.compose_shape(2, 3, [4, 5, 6]), [2, 3, 4, 5, 6]);
    assert_eq!(DataFormat::Ndhwc.compose_shape(2, 3, [4, 5, 6]), [2, 4, 5, 6, 3]);
    assert_eq!(DataFormat::Ndhwc.channel_axis(), 4);
    assert_eq!(DataFormat::Ndhwc.depth_axis(), 1);
    assert_eq!(DataFormat::Ndhwc.to_ncdhw_axes(), [0, 4, 1, 2, 3]);
}
