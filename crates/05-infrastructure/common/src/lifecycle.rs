//! 组件生命周期管理

use crate::errors::LifecycleError;
use async_trait::async_trait;

/// 组件生命周期状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecycleState {
    /// 未启动
    #[default]
    Stopped,
    /// 启动中
    Starting,
    /// 运行中
    Running,
    /// 停止中
    Stopping,
    /// 错误状态
    Failed,
}

/// 生命周期托管 trait
///
/// 宿主在应用启动时调用 `start`，在关闭时以相反顺序调用 `stop`
#[async_trait]
pub trait Managed: Send + Sync {
    /// 组件名称
    fn name(&self) -> &str;

    /// 组件启动
    async fn start(&self) -> Result<(), LifecycleError>;

    /// 组件停止
    async fn stop(&self) -> Result<(), LifecycleError>;
}
