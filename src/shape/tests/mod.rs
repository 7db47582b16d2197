use crate::ops::DataType;
use crate::shape::{ConstantShapeHelper, Order, ShapeDescriptor};
use std::sync::Arc;

#[test]
fn test_same_descriptor_gets_same_handle() {
    let helper = ConstantShapeHelper::instance();
    let a = helper.create_shape_info(ShapeDescriptor::new(&[7, 1, 3, 3, 3], DataType::Float32, Order::C));
    let b = helper.create_shape_info(ShapeDescriptor::new(&[7, 1, 3, 3, 3], DataType::Float32, Order::C));
    assert!(Arc::ptr_eq(&a, &b));
}

#[test]
fn test_dtype_and_order_are_part_of_identity() {
    let helper = ConstantShapeHelper::instance();
    let base = helper.create_shape_info(ShapeDescriptor::new(&[7, 2, 3], DataType::Float32, Order::C));
    let other_type = helper.create_shape_info(ShapeDescriptor::new(&[7, 2, 3], DataType::Double, Order::C));
    let other_order = helper.create_shape_info(ShapeDescriptor::new(&[7, 2, 3], DataType::Float32, Order::F));
    assert!(!Arc::ptr_eq(&base, &other_type));
    assert!(!Arc::ptr_eq(&base, &other_order));
    assert_eq!(other_type.dtype(), DataType::Double);
    assert_eq!(other_order.order(), Order::F);
}

#[test]
fn test_local_cache_counts_distinct_shapes() {
    // 独立的缓存实例，不受其他测试影响
    let helper = ConstantShapeHelper::default();
    assert_eq!(helper.cached_count(), 0);
    helper.create_shape_info(ShapeDescriptor::new(&[1, 2], DataType::Float32, Order::C));
    helper.create_shape_info(ShapeDescriptor::new(&[1, 2], DataType::Float32, Order::C));
    helper.create_shape_info(ShapeDescriptor::new(&[2, 1], DataType::Float32, Order::C));
    assert_eq!(helper.cached_count(), 2);
}

#[test]
fn test_descriptor_helpers() {
    let desc = ShapeDescriptor::new(&[1, 1, 2, 2, 2], DataType::Half, Order::C);
    assert_eq!(desc.rank(), 5);
    assert_eq!(desc.length(), 8);
    assert!(desc.is_same_shape(&[1, 1, 2, 2, 2]));
    assert_eq!(desc.with_dtype(DataType::Float32).dtype(), DataType::Float32);
    assert_eq!(desc.to_string(), "[1, 1, 2, 2, 2] HALF 'c'");
}
