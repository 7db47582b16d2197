use std::fmt::{self, Display};

/// 算子调用时需要的参数种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentKind {
    Input,
    Output,
    IntArg,
    ScalarArg,
}
impl Display for ArgumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind_name = match self {
            ArgumentKind::Input => "输入张量",
            ArgumentKind::Output => "输出张量",
            ArgumentKind::IntArg => "整数参数",
            ArgumentKind::ScalarArg => "标量参数",
        };
        write!(f, "{}", kind_name)
    }
}

/// 张量在算子中的槽位：输入或输出
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TensorSlot {
    Input,
    Output,
}
impl Display for TensorSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot_name = match self {
            TensorSlot::Input => "输入",
            TensorSlot::Output => "输出",
        };
        write!(f, "{}", slot_name)
    }
}
