//! 宿主框架接口
//!
//! 自动装配只通过这些窄接口把组件交给宿主，宿主负责组件之后的全部行为。

use crate::catalog::{Tag, TypeDescriptor};
use di_abstractions::Instance;
use infrastructure_common::{HealthCheck, Managed, Task};
use std::sync::Arc;

/// 通用提供者标记
pub const PROVIDER: Tag = Tag::new("provider");

/// 请求处理资源标记
pub const PATH: Tag = Tag::new("path");

/// 内容协商提供者契约
///
/// 宿主按请求自行实例化实现类型，自动装配只登记类型。
pub trait InjectableProvider: Send + Sync {}

/// 启动阶段上下文
///
/// 宿主环境创建之前可用
pub trait Bootstrap: Send {
    /// 添加启动插件
    fn add_bundle(&mut self, bundle: Arc<dyn Bundle>);
}

/// 运行阶段宿主环境
pub trait Environment: Send {
    /// 注册健康检查
    fn add_health_check(&mut self, check: Arc<dyn HealthCheck>);

    /// 注册通用提供者实例
    fn add_provider(&mut self, descriptor: &'static TypeDescriptor, instance: Instance);

    /// 注册内容协商提供者类型
    fn add_injectable_provider(&mut self, descriptor: &'static TypeDescriptor);

    /// 注册请求处理资源类型
    fn add_resource(&mut self, descriptor: &'static TypeDescriptor);

    /// 注册管理任务
    fn add_task(&mut self, task: Arc<dyn Task>);

    /// 托管组件生命周期
    fn manage(&mut self, managed: Arc<dyn Managed>);
}

/// 启动插件
///
/// 宿主在 `add_bundle` 中调用 `initialize`，在环境就绪后调用 `run`
pub trait Bundle: Send + Sync {
    /// 插件名称
    fn name(&self) -> &str;

    /// 扩展启动上下文
    fn initialize(&self, bootstrap: &mut dyn Bootstrap);

    /// 环境就绪后的扩展点
    fn run(&self, _environment: &mut dyn Environment) {}
}
