//! 可实例化过滤器

use crate::catalog::TypeSet;

/// 移除抽象声明与纯契约，只保留可以实例化的具体类型
///
/// 与输入顺序无关，且幂等。
pub fn filter_instantiable(candidates: TypeSet) -> TypeSet {
    candidates
        .into_iter()
        .filter(|descriptor| descriptor.is_instantiable())
        .collect()
}
