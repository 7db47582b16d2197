/*
 * @Author       : 老董
 * @Date         : 2026-02-10
 * @Description  : 算子描述符（OpDescriptor）
 *
 * 纯元数据：参数个数下限、每个输入/输出位置允许的元素类型、发散/就地/逻辑等标志，
 * 以及由名称派生的稳定哈希（注册表主键）。不持有任何张量数据，也不做任何计算。
 *
 * 设计决策：
 * - 通过`OpDescriptorBuilder`一次性配置，`build()`后即不可变，可在多线程间只读共享
 * - 类型集合使用三态`AllowedTypes`：未约束 / 约束为空集 / 约束为非空集
 * - 相等性与哈希只看`hash`字段
 */

use super::types::{DataType, InputType};
use crate::errors::OpError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

/// 变长（不限个数）的哨兵值
pub const VARIADIC: i32 = -1;

/// 某个输入/输出位置上允许的元素类型集合
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AllowedTypes {
    /// 未配置任何约束：任意类型都匹配
    #[default]
    Unconstrained,
    /// 显式配置的集合；空集不匹配任何类型
    Constrained(Vec<DataType>),
}

impl AllowedTypes {
    pub fn matches(&self, dtype: DataType) -> bool {
        match self {
            Self::Unconstrained => true,
            Self::Constrained(types) => types.iter().any(|t| t.is_wildcard() || *t == dtype),
        }
    }

    pub fn contains(&self, dtype: DataType) -> bool {
        matches!(self, Self::Constrained(types) if types.contains(&dtype))
    }

    pub fn is_constrained(&self) -> bool {
        matches!(self, Self::Constrained(_))
    }

    /// 将类型集合渲染为字符串，用于错误信息
    pub fn describe(&self) -> String {
        match self {
            Self::Unconstrained => "<任意类型>".to_string(),
            Self::Constrained(types) => {
                let names: Vec<String> = types.iter().map(|t| t.to_string()).collect();
                format!("[{}]", names.join(", "))
            }
        }
    }

    fn push(&mut self, dtype: DataType) {
        match self {
            Self::Unconstrained => *self = Self::Constrained(vec![dtype]),
            Self::Constrained(types) => {
                if !types.contains(&dtype) {
                    types.push(dtype);
                }
            }
        }
    }
}

/// 算子描述符，构造见`OpDescriptor::custom`等工厂函数。
/// 反序列化同样经过`OpDescriptorBuilder::build`的校验
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "DescriptorRecord")]
pub struct OpDescriptor {
    /// 旧式（legacy）算子的整数编号
    op_num: i32,
    name: String,
    /// 注册表查找算子时使用的哈希
    hash: i64,
    num_inputs: i32,
    num_outputs: i32,
    /// 发散算子会改变所在图的控制流（如IF、CASE），而不只是产出数据
    divergent: bool,
    allows_inplace: bool,
    t_args: i32,
    i_args: i32,
    /// 布尔类算子用
    scalar: bool,
    /// 逻辑类算子用（while、scope等）
    logic: bool,
    input_type: InputType,
    same_mode: bool,
    allowed_ins: AllowedTypes,
    allowed_outs: AllowedTypes,
    input_types: BTreeMap<usize, Vec<DataType>>,
    output_types: BTreeMap<usize, Vec<DataType>>,
    /// 是否允许运行时覆盖输出类型
    dtype_override: bool,
    /// `hash`是否由调用方显式指定（否则由名称派生）
    explicit_hash: bool,
}

/// 从JSON读入的原始字段，交给构建器校验后才成为`OpDescriptor`
#[derive(Deserialize)]
struct DescriptorRecord {
    op_num: i32,
    name: String,
    hash: i64,
    num_inputs: i32,
    num_outputs: i32,
    divergent: bool,
    allows_inplace: bool,
    t_args: i32,
    i_args: i32,
    scalar: bool,
    logic: bool,
    input_type: InputType,
    same_mode: bool,
    allowed_ins: AllowedTypes,
    allowed_outs: AllowedTypes,
    input_types: BTreeMap<usize, Vec<DataType>>,
    output_types: BTreeMap<usize, Vec<DataType>>,
    dtype_override: bool,
    #[serde(default)]
    explicit_hash: bool,
}

impl TryFrom<DescriptorRecord> for OpDescriptor {
    type Error = OpError;

    fn try_from(record: DescriptorRecord) -> Result<Self, OpError> {
        let stored_hash = record.hash;
        let builder = OpDescriptorBuilder {
            desc: OpDescriptor {
                op_num: record.op_num,
                name: record.name,
                hash: -1,
                num_inputs: record.num_inputs,
                num_outputs: record.num_outputs,
                divergent: record.divergent,
                allows_inplace: record.allows_inplace,
                t_args: record.t_args,
                i_args: record.i_args,
                scalar: record.scalar,
                logic: record.logic,
                input_type: record.input_type,
                same_mode: record.same_mode,
                allowed_ins: record.allowed_ins,
                allowed_outs: record.allowed_outs,
                input_types: record.input_types,
                output_types: record.output_types,
                dtype_override: record.dtype_override,
                explicit_hash: false,
            },
            explicit_hash: record.explicit_hash.then_some(stored_hash),
        };
        let desc = builder.build()?;
        if desc.hash != stored_hash {
            return Err(OpError::configuration(
                desc.name(),
                format!("记录的哈希{stored_hash}与由名称派生的哈希{}不一致", desc.hash),
            ));
        }
        Ok(desc)
    }
}

impl OpDescriptor {
    /// 常规（可配置）自定义算子
    pub fn custom(
        name: &str,
        num_inputs: i32,
        num_outputs: i32,
        allows_inplace: bool,
        t_args: i32,
        i_args: i32,
    ) -> OpDescriptorBuilder {
        OpDescriptorBuilder::new(name)
            .num_inputs(num_inputs)
            .num_outputs(num_outputs)
            .allow_inplace(allows_inplace)
            .t_args(t_args)
            .i_args(i_args)
    }

    /// 发散算子（会改变图的控制流）
    pub fn divergent(
        name: &str,
        num_inputs: i32,
        num_outputs: i32,
        allows_inplace: bool,
        t_args: i32,
        i_args: i32,
    ) -> OpDescriptorBuilder {
        let mut builder = Self::custom(name, num_inputs, num_outputs, allows_inplace, t_args, i_args);
        builder.desc.divergent = true;
        builder
    }

    /// 布尔算子：单输出、结果为布尔值
    pub fn boolean(name: &str, num_inputs: i32, scalar: bool) -> OpDescriptorBuilder {
        let mut builder = OpDescriptorBuilder::new(name)
            .num_inputs(num_inputs)
            .num_outputs(1)
            .allow_inplace(false)
            .input_kind(InputType::Boolean);
        builder.desc.scalar = scalar;
        builder
    }

    /// 逻辑算子（while、scope等），参数个数不限
    pub fn logic(name: &str) -> OpDescriptorBuilder {
        let mut builder = OpDescriptorBuilder::new(name)
            .num_inputs(VARIADIC)
            .num_outputs(VARIADIC)
            .allow_inplace(false);
        builder.desc.logic = true;
        builder
    }

    pub fn op_num(&self) -> i32 {
        self.op_num
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hash(&self) -> i64 {
        self.hash
    }

    /// 最少需要的输入个数，`-1`表示不限
    pub fn num_inputs(&self) -> i32 {
        self.num_inputs
    }

    pub fn num_outputs(&self) -> i32 {
        self.num_outputs
    }

    pub fn num_t_args(&self) -> i32 {
        self.t_args
    }

    pub fn num_i_args(&self) -> i32 {
        self.i_args
    }

    pub fn is_divergent(&self) -> bool {
        self.divergent
    }

    pub fn allows_inplace(&self) -> bool {
        self.allows_inplace
    }

    pub fn is_scalar(&self) -> bool {
        self.scalar
    }

    pub fn is_logic(&self) -> bool {
        self.logic
    }

    pub fn input_type(&self) -> InputType {
        self.input_type
    }

    pub fn is_same_mode(&self) -> bool {
        self.same_mode
    }

    pub fn allows_dtype_override(&self) -> bool {
        self.dtype_override
    }

    /// 第`index`个输入允许的类型：
    /// 先查该位置的专属集合，再退回全局集合，都没有则为未约束。
    /// 同类型模式下，全局输入集合统一作用于所有位置。
    pub fn allowed_input_types_for(&self, index: usize) -> AllowedTypes {
        if self.same_mode {
            return self.allowed_ins.clone();
        }
        match self.input_types.get(&index) {
            Some(types) => AllowedTypes::Constrained(types.clone()),
            None => self.allowed_ins.clone(),
        }
    }

    /// 第`index`个输出允许的类型，查找顺序同`allowed_input_types_for`
    pub fn allowed_output_types_for(&self, index: usize) -> AllowedTypes {
        if self.same_mode {
            // 同类型模式下只有一个统一集合；若只配置了输出集合则用它
            return match (&self.allowed_ins, &self.allowed_outs) {
                (AllowedTypes::Unconstrained, outs) => outs.clone(),
                (ins, _) => ins.clone(),
            };
        }
        match self.output_types.get(&index) {
            Some(types) => AllowedTypes::Constrained(types.clone()),
            None => self.allowed_outs.clone(),
        }
    }

    pub fn check_input_match(&self, index: usize, dtype: DataType) -> bool {
        self.allowed_input_types_for(index).matches(dtype)
    }

    pub fn check_output_match(&self, index: usize, dtype: DataType) -> bool {
        self.allowed_output_types_for(index).matches(dtype)
    }

    /// 第`index`个输出是否继承输入的类型
    pub fn is_inherit(&self, index: usize) -> bool {
        self.allowed_output_types_for(index)
            .contains(DataType::Inherit)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// 由`to_json`的输出还原；参数个数、同类型模式与哈希不合法时报错
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl PartialEq for OpDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}
impl Eq for OpDescriptor {}

impl Hash for OpDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash.hash(state);
    }
}

/// `OpDescriptor`的构建器。
/// 每个设置方法都是对目标槽位的一次性覆盖；只有`add_*`方法是向集合中追加。
#[derive(Debug, Clone)]
pub struct OpDescriptorBuilder {
    desc: OpDescriptor,
    explicit_hash: Option<i64>,
}

impl OpDescriptorBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            desc: OpDescriptor {
                op_num: 0,
                name: name.to_string(),
                hash: -1,
                num_inputs: 1,
                num_outputs: 1,
                divergent: false,
                allows_inplace: true,
                t_args: 0,
                i_args: 0,
                scalar: false,
                logic: false,
                input_type: InputType::Numeric,
                same_mode: false,
                allowed_ins: AllowedTypes::Unconstrained,
                allowed_outs: AllowedTypes::Unconstrained,
                input_types: BTreeMap::new(),
                output_types: BTreeMap::new(),
                dtype_override: false,
                explicit_hash: false,
            },
            explicit_hash: None,
        }
    }

    pub fn num_inputs(mut self, num_inputs: i32) -> Self {
        self.desc.num_inputs = num_inputs;
        self
    }

    pub fn num_outputs(mut self, num_outputs: i32) -> Self {
        self.desc.num_outputs = num_outputs;
        self
    }

    pub fn t_args(mut self, t_args: i32) -> Self {
        self.desc.t_args = t_args;
        self
    }

    pub fn i_args(mut self, i_args: i32) -> Self {
        self.desc.i_args = i_args;
        self
    }

    pub fn op_num(mut self, op_num: i32) -> Self {
        self.desc.op_num = op_num;
        self
    }

    /// 显式指定哈希，覆盖由名称派生的哈希
    pub fn hash(mut self, hash: i64) -> Self {
        self.explicit_hash = Some(hash);
        self
    }

    pub fn allow_inplace(mut self, really_allow: bool) -> Self {
        self.desc.allows_inplace = really_allow;
        self
    }

    pub fn allow_override(mut self, really_allow: bool) -> Self {
        self.desc.dtype_override = really_allow;
        self
    }

    pub fn same_mode(mut self, really_same: bool) -> Self {
        self.desc.same_mode = really_same;
        self
    }

    pub fn input_kind(mut self, input_type: InputType) -> Self {
        self.desc.input_type = input_type;
        self
    }

    /// 全局输入类型集合（覆盖）
    pub fn allowed_input_types(mut self, types: &[DataType]) -> Self {
        self.desc.allowed_ins = AllowedTypes::Constrained(types.to_vec());
        self
    }

    /// 全局输出类型集合（覆盖）
    pub fn allowed_output_types(mut self, types: &[DataType]) -> Self {
        self.desc.allowed_outs = AllowedTypes::Constrained(types.to_vec());
        self
    }

    /// 第`index`个输入的类型集合（覆盖）
    pub fn allowed_input_types_for(mut self, index: usize, types: &[DataType]) -> Self {
        self.desc.input_types.insert(index, types.to_vec());
        self
    }

    /// 第`index`个输出的类型集合（覆盖）
    pub fn allowed_output_types_for(mut self, index: usize, types: &[DataType]) -> Self {
        self.desc.output_types.insert(index, types.to_vec());
        self
    }

    /// 向全局输入类型集合追加一个类型
    pub fn add_allowed_input_type(mut self, dtype: DataType) -> Self {
        self.desc.allowed_ins.push(dtype);
        self
    }

    /// 向全局输出类型集合追加一个类型
    pub fn add_allowed_output_type(mut self, dtype: DataType) -> Self {
        self.desc.allowed_outs.push(dtype);
        self
    }

    /// 向第`index`个输入的类型集合追加一个类型
    pub fn add_allowed_input_type_for(mut self, index: usize, dtype: DataType) -> Self {
        let types = self.desc.input_types.entry(index).or_default();
        if !types.contains(&dtype) {
            types.push(dtype);
        }
        self
    }

    /// 向第`index`个输出的类型集合追加一个类型
    pub fn add_allowed_output_type_for(mut self, index: usize, dtype: DataType) -> Self {
        let types = self.desc.output_types.entry(index).or_default();
        if !types.contains(&dtype) {
            types.push(dtype);
        }
        self
    }

    /// 将第`index`个输入固定为单一类型（覆盖）
    pub fn input_type(self, index: usize, dtype: DataType) -> Self {
        self.allowed_input_types_for(index, &[dtype])
    }

    /// 将第`index`个输出固定为单一类型（覆盖）
    pub fn output_type(self, index: usize, dtype: DataType) -> Self {
        self.allowed_output_types_for(index, &[dtype])
    }

    /// 校验配置并产出不可变的描述符
    pub fn build(self) -> Result<OpDescriptor, OpError> {
        let Self {
            mut desc,
            explicit_hash,
        } = self;
        let op_name = if desc.name.is_empty() {
            format!("<legacy op #{}>", desc.op_num)
        } else {
            desc.name.clone()
        };

        for (field, value) in [
            ("输入个数", desc.num_inputs),
            ("输出个数", desc.num_outputs),
            ("标量参数个数", desc.t_args),
            ("整数参数个数", desc.i_args),
        ] {
            if value < 0 && value != VARIADIC {
                return Err(OpError::configuration(
                    &op_name,
                    format!("{field}须≥0或为-1（不限），实际为{value}"),
                ));
            }
        }

        if desc.same_mode {
            let per_index = desc.input_types.iter().chain(desc.output_types.iter());
            for (index, types) in per_index {
                if let Some(bad) = types.iter().find(|t| !desc.allowed_ins.matches(**t)) {
                    return Err(OpError::configuration(
                        &op_name,
                        format!(
                            "同类型模式下，位置{index}的类型{bad}与全局类型集合{}不一致",
                            desc.allowed_ins.describe()
                        ),
                    ));
                }
            }
        }

        desc.explicit_hash = explicit_hash.is_some();
        desc.hash = match explicit_hash {
            Some(hash) => hash,
            None if desc.name.is_empty() => -1,
            None => long_hash(&desc.name),
        };
        Ok(desc)
    }
}

const HSTART: i64 = 0xBB40_E64D_A205_B064_u64 as i64;
const HMULT: i64 = 7_664_345_821_815_920_749;

const fn build_byte_table() -> [i64; 256] {
    let mut table = [0i64; 256];
    let mut i = 0;
    while i < 256 {
        let mut h = i as i64;
        let mut j = 0;
        while j < 31 {
            h ^= h >> 7;
            h ^= h << 11;
            h ^= h >> 10;
            j += 1;
        }
        table[i] = h;
        i += 1;
    }
    table
}

static BYTE_TABLE: [i64; 256] = build_byte_table();

/// 由算子名称派生的64位稳定哈希
pub fn long_hash(name: &str) -> i64 {
    name.bytes().fold(HSTART, |h, byte| {
        h.wrapping_mul(HMULT) ^ BYTE_TABLE[byte as usize]
    })
}
