use crate::assert_panic;
use crate::errors::TensorError;
use crate::ops::DataType;
use crate::shape::{Order, ShapeDescriptor};
use crate::tensor::Tensor;

#[test]
fn test_new_defaults_to_float32_c_order() {
    let tensor = Tensor::new(&[1., 2., 3., 4.], &[2, 2]);
    assert_eq!(tensor.shape(), &[2, 2]);
    assert_eq!(tensor.dimension(), 2);
    assert_eq!(tensor.size(), 4);
    assert_eq!(tensor.dtype(), DataType::Float32);
    assert_eq!(tensor.order(), Order::C);
}

#[test]
fn test_new_with_wrong_data_len() {
    assert_panic!(
        Tensor::new(&[1., 2., 3.], &[2, 2]),
        TensorError::DataLenMismatch {
            data_len: 3,
            shape: vec![2, 2],
            expected: 4,
        }
    );
}

#[test]
fn test_f_order_keeps_logical_values() {
    let data: Vec<f32> = (0..6).map(|x| x as f32).collect();
    let c_tensor = Tensor::new_with(&data, &[2, 3], DataType::Double, Order::C);
    let f_tensor = Tensor::new_with(&data, &[2, 3], DataType::Double, Order::F);

    // 按坐标读取的结果与内存顺序无关
    assert_eq!(c_tensor.to_vec(), f_tensor.to_vec());
    assert_eq!(f_tensor[[1, 2]], 5.);
    assert_eq!(f_tensor.order(), Order::F);
    // 列优先存储时，第二个元素在内存里是[1, 0]
    assert_eq!(f_tensor.view().as_slice_memory_order().unwrap()[1], 3.);
}

#[test]
fn test_shape_descriptor_round_trip() {
    let desc = ShapeDescriptor::new(&[1, 2, 3], DataType::Int32, Order::F);
    let tensor = Tensor::from_descriptor(&desc);
    assert_eq!(tensor.shape_descriptor(), desc);
    assert!(tensor.to_vec().iter().all(|&x| x == 0.));
}

#[test]
fn test_view5() {
    let tensor = Tensor::zeros(&[1, 1, 2, 2, 2], DataType::Float32, Order::C);
    assert_eq!(tensor.view5().unwrap().shape(), &[1, 1, 2, 2, 2]);

    let tensor = Tensor::zeros(&[2, 2], DataType::Float32, Order::C);
    assert_eq!(
        tensor.view5().unwrap_err(),
        TensorError::RankMismatch {
            expected: 5,
            got: 2
        }
    );
}

#[test]
fn test_fill() {
    let mut tensor = Tensor::new(&[1., 2., 3.], &[3]);
    tensor.fill(0.);
    assert_eq!(tensor.to_vec(), vec![0., 0., 0.]);
}
