//! 演示宿主
//!
//! 一个最小的宿主实现：把自动装配交来的组件收进各自的子系统

use auto_config::{Bootstrap, Bundle, Environment, TypeDescriptor};
use di_abstractions::Instance;
use chrono::{DateTime, Utc};
use infrastructure_common::{
    HealthCheck, HealthStatus, LifecycleError, Managed, Task, TaskError, TaskParameters,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::app::resources::route_of;

/// 单次健康检查的结果
#[derive(Debug, Clone)]
pub struct HealthReport {
    /// 检查名称
    pub name: String,
    /// 健康状态
    pub status: HealthStatus,
    /// 检查耗时
    pub duration: Duration,
    /// 检查时间
    pub checked_at: DateTime<Utc>,
}

/// 健康检查子系统
#[derive(Default)]
pub struct HealthRegistry {
    checks: Vec<Arc<dyn HealthCheck>>,
}

impl std::fmt::Debug for HealthRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthRegistry")
            .field("checks", &format!("{} checks", self.checks.len()))
            .finish()
    }
}

impl HealthRegistry {
    /// 添加健康检查
    pub fn add(&mut self, check: Arc<dyn HealthCheck>) {
        self.checks.push(check);
    }

    /// 已注册的检查数量
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// 依次执行所有健康检查，超时的检查记为不健康
    pub async fn check_all(&self) -> Vec<HealthReport> {
        let mut reports = Vec::with_capacity(self.checks.len());

        for check in &self.checks {
            let start = Instant::now();
            debug!("执行健康检查: {}", check.name());

            let status = match tokio::time::timeout(check.timeout(), check.check()).await {
                Ok(status) => status,
                Err(_) => {
                    warn!("健康检查超时: {} ({:?})", check.name(), check.timeout());
                    HealthStatus::unhealthy("健康检查超时")
                }
            };

            reports.push(HealthReport {
                name: check.name().to_string(),
                status,
                duration: start.elapsed(),
                checked_at: Utc::now(),
            });
        }

        reports
    }

    /// 汇总为整体状态：任一不健康即不健康，其次是降级
    pub fn overall(reports: &[HealthReport]) -> HealthStatus {
        let unhealthy: Vec<&str> = reports
            .iter()
            .filter(|report| matches!(report.status, HealthStatus::Unhealthy(_)))
            .map(|report| report.name.as_str())
            .collect();

        if !unhealthy.is_empty() {
            return HealthStatus::unhealthy(format!("不健康的检查: {}", unhealthy.join(", ")));
        }

        match reports
            .iter()
            .find(|report| matches!(report.status, HealthStatus::Degraded(_)))
        {
            Some(degraded) => HealthStatus::degraded(format!("{} 处于降级状态", degraded.name)),
            None => HealthStatus::healthy(),
        }
    }
}

/// 演示宿主的启动上下文
#[derive(Default)]
pub struct DemoBootstrap {
    bundles: Vec<Arc<dyn Bundle>>,
}

impl DemoBootstrap {
    /// 已添加的启动插件
    pub fn bundles(&self) -> &[Arc<dyn Bundle>] {
        &self.bundles
    }
}

impl Bootstrap for DemoBootstrap {
    fn add_bundle(&mut self, bundle: Arc<dyn Bundle>) {
        bundle.initialize(self);
        self.bundles.push(bundle);
    }
}

/// 演示宿主的运行环境
#[derive(Default)]
pub struct DemoEnvironment {
    health: HealthRegistry,
    providers: Vec<(&'static TypeDescriptor, Instance)>,
    injectable_providers: Vec<&'static TypeDescriptor>,
    routes: BTreeMap<&'static str, &'static TypeDescriptor>,
    tasks: BTreeMap<String, Arc<dyn Task>>,
    managed: Vec<Arc<dyn Managed>>,
}

impl DemoEnvironment {
    /// 健康检查子系统
    pub fn health(&self) -> &HealthRegistry {
        &self.health
    }

    /// 已挂载的路由
    pub fn routes(&self) -> impl Iterator<Item = (&'static str, &'static TypeDescriptor)> + '_ {
        self.routes.iter().map(|(route, descriptor)| (*route, *descriptor))
    }

    /// 已注册的提供者实例
    pub fn provider<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.providers
            .iter()
            .find_map(|(_, instance)| Arc::clone(instance).downcast::<T>().ok())
    }

    /// 内容协商提供者数量
    pub fn injectable_provider_count(&self) -> usize {
        self.injectable_providers.len()
    }

    /// 按注册顺序启动托管组件
    pub async fn start(&self) -> Result<(), LifecycleError> {
        for managed in &self.managed {
            info!("启动组件: {}", managed.name());
            managed.start().await?;
        }
        Ok(())
    }

    /// 按注册的相反顺序停止托管组件，停止失败只记录警告
    pub async fn stop(&self) {
        for managed in self.managed.iter().rev() {
            info!("停止组件: {}", managed.name());
            if let Err(e) = managed.stop().await {
                warn!("停止组件失败: {}", e);
            }
        }
    }

    /// 调用管理任务
    pub async fn run_task(&self, name: &str, parameters: &TaskParameters) -> Result<(), TaskError> {
        let task = self
            .tasks
            .get(name)
            .ok_or_else(|| TaskError::ExecutionFailed {
                task: name.to_string(),
                message: "任务未注册".to_string(),
            })?;

        info!("执行管理任务: {}", name);
        task.execute(parameters).await
    }
}

impl Environment for DemoEnvironment {
    fn add_health_check(&mut self, check: Arc<dyn HealthCheck>) {
        self.health.add(check);
    }

    fn add_provider(&mut self, descriptor: &'static TypeDescriptor, instance: Instance) {
        self.providers.push((descriptor, instance));
    }

    fn add_injectable_provider(&mut self, descriptor: &'static TypeDescriptor) {
        self.injectable_providers.push(descriptor);
    }

    fn add_resource(&mut self, descriptor: &'static TypeDescriptor) {
        match route_of(descriptor.name) {
            Some(route) => {
                self.routes.insert(route, descriptor);
            }
            None => warn!("资源 {} 没有挂载路径, 已忽略", descriptor),
        }
    }

    fn add_task(&mut self, task: Arc<dyn Task>) {
        self.tasks.insert(task.name().to_string(), task);
    }

    fn manage(&mut self, managed: Arc<dyn Managed>) {
        self.managed.push(managed);
    }
}
