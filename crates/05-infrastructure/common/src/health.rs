//! 健康检查相关接口定义

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 健康状态
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", content = "message")]
pub enum HealthStatus {
    /// 健康
    Healthy,
    /// 降级
    Degraded(String),
    /// 不健康
    Unhealthy(String),
}

impl HealthStatus {
    /// 创建健康状态
    pub fn healthy() -> Self {
        Self::Healthy
    }

    /// 创建降级状态
    pub fn degraded(message: impl Into<String>) -> Self {
        Self::Degraded(message.into())
    }

    /// 创建不健康状态
    pub fn unhealthy(message: impl Into<String>) -> Self {
        Self::Unhealthy(message.into())
    }

    /// 检查是否健康
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }
}

/// 健康检查 trait
///
/// 自动装配把实现此 trait 的具体类型注册到宿主的健康检查子系统，
/// 何时执行、如何汇总由宿主决定
#[async_trait]
pub trait HealthCheck: Send + Sync {
    /// 获取检查名称
    fn name(&self) -> &str;

    /// 执行健康检查
    async fn check(&self) -> HealthStatus;

    /// 获取检查超时时间
    fn timeout(&self) -> Duration {
        Duration::from_secs(30)
    }
}
