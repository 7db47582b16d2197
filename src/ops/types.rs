/*
 * @Author       : 老董
 * @Date         : 2026-02-10
 * @Description  : 算子层面用到的元素类型（DataType）与输入种类（InputType）
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// 张量元素的（逻辑）数据类型。
/// `Any`与`Inherit`不是具体类型，只在算子描述符的类型集合中作通配用。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DataType {
    Inherit,
    Any,
    Bool,
    Half,
    BFloat16,
    Float32,
    Double,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Utf8,
}

/// 所有浮点类型
pub const ALL_FLOATS: &[DataType] = &[
    DataType::Half,
    DataType::BFloat16,
    DataType::Float32,
    DataType::Double,
];

/// 所有整数类型（含无符号）
pub const ALL_INTS: &[DataType] = &[
    DataType::Int8,
    DataType::Int16,
    DataType::Int32,
    DataType::Int64,
    DataType::UInt8,
    DataType::UInt16,
    DataType::UInt32,
    DataType::UInt64,
];

/// 可作为索引使用的类型
pub const ALL_INDICES: &[DataType] = &[DataType::Int32, DataType::Int64];

impl DataType {
    pub const fn is_float(&self) -> bool {
        matches!(
            self,
            Self::Half | Self::BFloat16 | Self::Float32 | Self::Double
        )
    }

    pub const fn is_int(&self) -> bool {
        matches!(
            self,
            Self::Int8
                | Self::Int16
                | Self::Int32
                | Self::Int64
                | Self::UInt8
                | Self::UInt16
                | Self::UInt32
                | Self::UInt64
        )
    }

    pub const fn is_unsigned(&self) -> bool {
        matches!(
            self,
            Self::UInt8 | Self::UInt16 | Self::UInt32 | Self::UInt64
        )
    }

    /// 通配类型：出现在类型集合中时，任何类型都能匹配
    pub const fn is_wildcard(&self) -> bool {
        matches!(self, Self::Any | Self::Inherit)
    }

    /// 单个元素所占字节数；通配类型与字符串返回0
    pub const fn size_of(&self) -> usize {
        match self {
            Self::Bool | Self::Int8 | Self::UInt8 => 1,
            Self::Half | Self::BFloat16 | Self::Int16 | Self::UInt16 => 2,
            Self::Float32 | Self::Int32 | Self::UInt32 => 4,
            Self::Double | Self::Int64 | Self::UInt64 => 8,
            Self::Inherit | Self::Any | Self::Utf8 => 0,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Inherit => "INHERIT",
            Self::Any => "ANY",
            Self::Bool => "BOOL",
            Self::Half => "HALF",
            Self::BFloat16 => "BFLOAT16",
            Self::Float32 => "FLOAT32",
            Self::Double => "DOUBLE",
            Self::Int8 => "INT8",
            Self::Int16 => "INT16",
            Self::Int32 => "INT32",
            Self::Int64 => "INT64",
            Self::UInt8 => "UINT8",
            Self::UInt16 => "UINT16",
            Self::UInt32 => "UINT32",
            Self::UInt64 => "UINT64",
            Self::Utf8 => "UTF8",
        };
        write!(f, "{name}")
    }
}

/// 算子接受的字面量参数风格，默认为数值型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum InputType {
    Boolean,
    #[default]
    Numeric,
    Stringular,
    NumericSet,
    StringularSet,
}
