/*
 * @Author       : 老董
 * @Date         : 2026-02-11
 * @Description  : 类型约束检查：在分派算子之前，核对输入/输出的元素类型是否落在描述符声明的集合中
 */

use super::descriptor::{AllowedTypes, OpDescriptor};
use super::types::DataType;
use crate::errors::{OpError, TensorSlot};

/// 核对所有输入、输出的元素类型。
///
/// 规则：
/// 1. 每个位置的类型须属于描述符为该位置解析出的集合；
/// 2. 同类型模式下（且未开启类型覆盖），第`i`个输出须与第`i`个输入类型相同，
///    输出多于输入时以第0个输入为准；
/// 3. 输出集合含`Inherit`时，该输出类型须为某个输入的类型。
pub fn validate_data_types(
    desc: &OpDescriptor,
    inputs: &[DataType],
    outputs: &[DataType],
) -> Result<(), OpError> {
    for (index, &dtype) in inputs.iter().enumerate() {
        if !desc.check_input_match(index, dtype) {
            return Err(type_mismatch(
                desc,
                TensorSlot::Input,
                index,
                dtype,
                &desc.allowed_input_types_for(index),
            ));
        }
    }

    for (index, &dtype) in outputs.iter().enumerate() {
        if !desc.check_output_match(index, dtype) {
            return Err(type_mismatch(
                desc,
                TensorSlot::Output,
                index,
                dtype,
                &desc.allowed_output_types_for(index),
            ));
        }

        if desc.is_same_mode() && !desc.allows_dtype_override() {
            let source = inputs.get(index).or_else(|| inputs.first()).copied();
            match source {
                Some(expected) if expected != dtype => {
                    return Err(type_mismatch(
                        desc,
                        TensorSlot::Output,
                        index,
                        dtype,
                        &AllowedTypes::Constrained(vec![expected]),
                    ));
                }
                _ => {}
            }
        }

        if desc.is_inherit(index) && !inputs.is_empty() && !inputs.contains(&dtype) {
            return Err(type_mismatch(
                desc,
                TensorSlot::Output,
                index,
                dtype,
                &AllowedTypes::Constrained(inputs.to_vec()),
            ));
        }
    }

    Ok(())
}

fn type_mismatch(
    desc: &OpDescriptor,
    slot: TensorSlot,
    index: usize,
    actual: DataType,
    allowed: &AllowedTypes,
) -> OpError {
    OpError::TypeMismatch {
        op_name: desc.name().to_string(),
        slot,
        index,
        actual,
        allowed: allowed.describe(),
    }
}
