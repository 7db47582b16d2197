use super::ShapeDescriptor;
use std::collections::HashSet;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

/// 全局形状缓存
static INSTANCE: OnceLock<ConstantShapeHelper> = OnceLock::new();

/// 驻留形状描述符的缓存：每个不同的(形状, 类型, 顺序)只存一份，
/// 返回的`Arc`即规范句柄，可以用`Arc::ptr_eq`判断是否为同一个形状。
#[derive(Debug, Default)]
pub struct ConstantShapeHelper {
    shapes: RwLock<HashSet<Arc<ShapeDescriptor>>>,
}

impl ConstantShapeHelper {
    pub fn instance() -> &'static ConstantShapeHelper {
        INSTANCE.get_or_init(ConstantShapeHelper::default)
    }

    /// 获取`desc`对应的规范句柄，不存在则新建
    pub fn create_shape_info(&self, desc: ShapeDescriptor) -> Arc<ShapeDescriptor> {
        {
            let shapes = self.shapes.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(existing) = shapes.get(&desc) {
                return Arc::clone(existing);
            }
        }

        let mut shapes = self.shapes.write().unwrap_or_else(PoisonError::into_inner);
        // 读锁释放后可能已被其他线程插入
        if let Some(existing) = shapes.get(&desc) {
            return Arc::clone(existing);
        }
        log::trace!("驻留新形状 {desc}");
        let handle = Arc::new(desc);
        shapes.insert(Arc::clone(&handle));
        handle
    }

    /// 已缓存的形状个数
    pub fn cached_count(&self) -> usize {
        self.shapes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
