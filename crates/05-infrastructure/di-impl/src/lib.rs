//! # 依赖注入具体实现
//!
//! 提供基于工厂绑定的注入容器。容器不做自动装配，每个可解析的类型都需要
//! 显式绑定一个实例或工厂。

use async_trait::async_trait;
use di_abstractions::{Injector, Instance};
use infrastructure_common::{DependencyError, TypeInfo};
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// 组件生命周期类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Lifetime {
    /// 单例模式 - 首次解析时创建，之后复用
    #[default]
    Singleton,
    /// 瞬时模式 - 每次解析都创建新实例
    Transient,
}

/// 组件工厂函数类型
type FactoryFn = Arc<dyn Fn() -> Result<Instance, DependencyError> + Send + Sync>;

/// 组件注册信息
struct ComponentRegistration {
    /// 类型信息
    type_info: TypeInfo,
    /// 生命周期
    lifetime: Lifetime,
    /// 组件工厂
    factory: FactoryFn,
    /// 单例实例（仅用于单例模式）
    singleton: OnceCell<Instance>,
}

impl std::fmt::Debug for ComponentRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentRegistration")
            .field("type_info", &self.type_info)
            .field("lifetime", &self.lifetime)
            .field("instance_created", &self.singleton.initialized())
            .field("factory", &"<function>")
            .finish()
    }
}

/// 具体的依赖注入容器实现
#[derive(Debug, Default)]
pub struct DiContainerImpl {
    /// 组件注册信息
    registrations: HashMap<TypeId, ComponentRegistration>,
}

impl DiContainerImpl {
    /// 创建新的容器
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建容器构建器
    pub fn builder() -> DiContainerBuilder {
        DiContainerBuilder::new()
    }

    /// 检查是否已注册组件
    pub fn is_registered<T: 'static>(&self) -> bool {
        self.registrations.contains_key(&TypeId::of::<T>())
    }

    /// 获取所有已注册的类型
    pub fn registered_types(&self) -> Vec<TypeInfo> {
        self.registrations
            .values()
            .map(|registration| registration.type_info.clone())
            .collect()
    }

    /// 已注册的组件数量
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    /// 是否没有注册任何组件
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    fn insert(&mut self, type_info: TypeInfo, lifetime: Lifetime, factory: FactoryFn) {
        info!("注册组件: {} ({:?})", type_info, lifetime);

        let registration = ComponentRegistration {
            type_info,
            lifetime,
            factory,
            singleton: OnceCell::new(),
        };

        self.registrations.insert(registration.type_info.id, registration);
    }
}

#[async_trait]
impl Injector for DiContainerImpl {
    async fn get_instance(&self, type_info: &TypeInfo) -> Result<Instance, DependencyError> {
        let registration = self
            .registrations
            .get(&type_info.id)
            .ok_or_else(|| DependencyError::not_registered(type_info.qualified_name()))?;

        match registration.lifetime {
            Lifetime::Singleton => {
                let instance = registration
                    .singleton
                    .get_or_try_init(|| async { (registration.factory)() })
                    .await?;
                debug!("解析单例组件: {}", type_info);
                Ok(Arc::clone(instance))
            }
            Lifetime::Transient => {
                debug!("创建瞬时组件: {}", type_info);
                (registration.factory)()
            }
        }
    }
}

/// 容器构建器实现
#[derive(Debug, Default)]
pub struct DiContainerBuilder {
    container: DiContainerImpl,
}

impl DiContainerBuilder {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册现成的单例实例
    pub fn register_instance<T>(mut self, instance: T) -> Self
    where
        T: Send + Sync + 'static,
    {
        let instance: Instance = Arc::new(instance);
        self.container.insert(
            TypeInfo::of::<T>(),
            Lifetime::Singleton,
            Arc::new(move || -> Result<Instance, DependencyError> {
                Ok(Arc::clone(&instance))
            }),
        );
        self
    }

    /// 注册组件工厂
    pub fn register_factory<T, F>(mut self, lifetime: Lifetime, factory: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn() -> Result<T, DependencyError> + Send + Sync + 'static,
    {
        self.container.insert(
            TypeInfo::of::<T>(),
            lifetime,
            Arc::new(move || factory().map(|instance| Arc::new(instance) as Instance)),
        );
        self
    }

    /// 构建容器
    pub fn build(self) -> DiContainerImpl {
        info!("构建容器完成，注册了 {} 个组件", self.container.len());
        self.container
    }
}
