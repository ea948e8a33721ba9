//! 元数据定义
//!
//! 提供组件和类型的元数据信息

use std::any::TypeId;
use std::fmt;

/// 类型信息
///
/// 注入容器通过 `id` 定位绑定，`name` 与 `module_path` 仅用于诊断输出
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeInfo {
    /// 类型名称
    pub name: String,
    /// 类型ID
    pub id: TypeId,
    /// 模块路径
    pub module_path: String,
}

impl TypeInfo {
    /// 创建新的类型信息
    pub fn new(type_id: TypeId, name: impl Into<String>, module_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: type_id,
            module_path: module_path.into(),
        }
    }

    /// 从类型获取类型信息
    pub fn of<T: ?Sized + 'static>() -> Self {
        let full_name = std::any::type_name::<T>();
        let (module_path, name) = match full_name.rfind("::") {
            Some(index) if !full_name.contains('<') => {
                (&full_name[..index], &full_name[index + 2..])
            }
            _ => ("", full_name),
        };

        Self {
            name: name.to_string(),
            id: TypeId::of::<T>(),
            module_path: module_path.to_string(),
        }
    }

    /// 获取简短的类型名称（不包含模块路径）
    pub fn short_name(&self) -> &str {
        &self.name
    }

    /// 获取完整限定名称
    pub fn qualified_name(&self) -> String {
        if self.module_path.is_empty() {
            self.name.clone()
        } else {
            format!("{}::{}", self.module_path, self.name)
        }
    }

    /// 是否描述指定类型
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.module_path.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}::{}", self.module_path, self.name)
        }
    }
}
