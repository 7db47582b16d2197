mod params;
mod shape;

use crate::tensor::Tensor;

/// 拼出14（或15）个整数参数：核、步长、补零、膨胀、SAME、附加参数，以及可选的布局
fn pool_args(
    kernel: [i64; 3],
    stride: [i64; 3],
    padding: [i64; 3],
    dilation: [i64; 3],
    same: bool,
    extra: i64,
    ndhwc: Option<bool>,
) -> Vec<i64> {
    let mut args = [kernel, stride, padding, dilation].concat();
    args.push(i64::from(same));
    args.push(extra);
    if let Some(ndhwc) = ndhwc {
        args.push(i64::from(ndhwc));
    }
    args
}

/// 元素值依次为0, 1, 2, ...的张量
fn arange(shape: &[usize]) -> Tensor {
    let len = shape.iter().product::<usize>();
    let data: Vec<f32> = (0..len).map(|i| i as f32).collect();
    Tensor::new(&data, shape)
}
