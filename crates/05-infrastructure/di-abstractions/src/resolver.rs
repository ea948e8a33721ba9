//! 组件解析器抽象接口
//!
//! 自动装配只把注入容器当作一个不透明的 `类型 -> 实例` 能力来使用

use async_trait::async_trait;
use infrastructure_common::{DependencyError, TypeInfo};
use std::any::Any;
use std::sync::Arc;

/// 类型擦除后的组件实例
pub type Instance = Arc<dyn Any + Send + Sync>;

/// 注入容器 trait
///
/// 负责为给定类型构造（或取回）实例。实现可以在构造过程中执行 I/O，
/// 调用方会顺序等待每一次解析。
#[async_trait]
pub trait Injector: Send + Sync {
    /// 获取指定类型的实例
    ///
    /// 绑定缺失或构造失败时返回 [`DependencyError`]
    async fn get_instance(&self, type_info: &TypeInfo) -> Result<Instance, DependencyError>;
}

#[async_trait]
impl<F> Injector for F
where
    F: Fn(&TypeInfo) -> Result<Instance, DependencyError> + Send + Sync,
{
    async fn get_instance(&self, type_info: &TypeInfo) -> Result<Instance, DependencyError> {
        self(type_info)
    }
}
