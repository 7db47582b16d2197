use super::declarable::DeclarableOp;
use super::descriptor::long_hash;
use crate::errors::OpError;
use std::collections::HashMap;
use std::sync::Arc;

/// 按描述符哈希查找算子的注册表。
/// 只是一个普通的值，由调用方自行创建与持有；注册完成后可在多线程间只读共享。
#[derive(Default, Clone)]
pub struct OpRegistry {
    ops: HashMap<i64, Arc<dyn DeclarableOp>>,
}

impl OpRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预先注册好全部三维池化算子
    pub fn with_pooling_ops() -> Result<Self, OpError> {
        let mut registry = Self::new();
        registry.register(Arc::new(super::pooling::MaxPool3d::new()?))?;
        registry.register(Arc::new(super::pooling::MaxPool3dBp::new()?))?;
        registry.register(Arc::new(super::pooling::AvgPool3d::new()?))?;
        registry.register(Arc::new(super::pooling::AvgPool3dBp::new()?))?;
        Ok(registry)
    }

    pub fn register(&mut self, op: Arc<dyn DeclarableOp>) -> Result<(), OpError> {
        let hash = op.descriptor().hash();
        if self.ops.contains_key(&hash) {
            return Err(OpError::DuplicateOp(op.name().to_string()));
        }
        log::debug!("注册算子{}（hash={hash}）", op.name());
        self.ops.insert(hash, op);
        Ok(())
    }

    pub fn get_by_hash(&self, hash: i64) -> Result<Arc<dyn DeclarableOp>, OpError> {
        self.ops
            .get(&hash)
            .cloned()
            .ok_or_else(|| OpError::OpNotFound(format!("hash={hash}")))
    }

    pub fn get_by_name(&self, name: &str) -> Result<Arc<dyn DeclarableOp>, OpError> {
        self.ops
            .get(&long_hash(name))
            .cloned()
            .ok_or_else(|| OpError::OpNotFound(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// 已注册算子的名称，按字典序排列
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.ops.values().map(|op| op.name().to_string()).collect();
        names.sort();
        names
    }
}
