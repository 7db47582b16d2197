use thiserror::Error;
mod ops;
pub use self::ops::*;

use crate::ops::DataType;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TensorError {
    #[error("数据长度{data_len}与形状{shape:?}所需的元素个数{expected}不一致")]
    DataLenMismatch {
        data_len: usize,
        shape: Vec<usize>,
        expected: usize,
    },
    #[error("张量的阶数须为{expected}，实际为{got}")]
    RankMismatch { expected: usize, got: usize },
    #[error("交换张量时，输入的维度数至少需要2个")]
    PermuteNeedAtLeast2Dims,
    #[error("需要交换的维度必须是唯一且在[0, <张量维数>)范围内")]
    PermuteNeedUniqueAndInRange,
    #[error("索引{index:?}超出形状{shape:?}的范围")]
    IndexOutOfBounds { index: Vec<usize>, shape: Vec<usize> },
}

/// 算子（op）层面的错误。
/// 均为同步、局部且不可重试的错误：只中止当前这一次算子调用。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OpError {
    // 描述符配置错误、零膨胀、阶数不对、参数非法等
    #[error("{op_name}算子配置错误：{message}")]
    Configuration { op_name: String, message: String },

    #[error("{op_name}算子需要至少{expected}个{kind}，实际得到{got}个")]
    ArgumentCount {
        op_name: String,
        kind: ArgumentKind,
        expected: usize,
        got: usize,
    },

    #[error("{op_name}算子形状不匹配：期望{expected}，实际得到{actual}")]
    ShapeMismatch {
        op_name: String,
        expected: String,
        actual: String,
    },

    #[error("{op_name}算子第{index}个{slot}的数据类型{actual}不在允许的类型集合{allowed}中")]
    TypeMismatch {
        op_name: String,
        slot: TensorSlot,
        index: usize,
        actual: DataType,
        allowed: String,
    },

    #[error("未找到算子：{0}")]
    OpNotFound(String),
    #[error("算子重复注册：{0}")]
    DuplicateOp(String),

    #[error(transparent)]
    Tensor(#[from] TensorError),
}

impl OpError {
    pub fn configuration(op_name: &str, message: impl Into<String>) -> Self {
        Self::Configuration {
            op_name: op_name.to_string(),
            message: message.into(),
        }
    }

    pub fn shape_mismatch(op_name: &str, expected: &[usize], actual: &[usize]) -> Self {
        Self::ShapeMismatch {
            op_name: op_name.to_string(),
            expected: shape_as_string(expected),
            actual: shape_as_string(actual),
        }
    }
}

/// 将形状渲染为`[1, 1, 2, 2, 2]`这样的字符串，用于错误信息
pub fn shape_as_string(shape: &[usize]) -> String {
    format!("{shape:?}")
}

/// 等价于“要求谓词成立，否则以格式化消息失败”。
/// 失败时从当前函数返回`OpError::Configuration`，只中止本次算子调用。
#[macro_export]
macro_rules! require {
    ($cond:expr, $op_name:expr, $($arg:tt)+) => {
        if !($cond) {
            return Err($crate::errors::OpError::configuration(
                $op_name,
                format!($($arg)+),
            ));
        }
    };
}
