//! 生命周期托管服务

use async_trait::async_trait;
use auto_config::discoverable;
use infrastructure_common::{LifecycleError, LifecycleState, Managed};
use parking_lot::Mutex;
use tracing::info;

/// 带连接池的托管服务
///
/// 只有部分实现，不会被自动装配实例化
pub trait PooledService: Managed {
    /// 连接池大小
    fn pool_size(&self) -> usize;

    /// 每个连接的预热批次
    fn warmup_batches(&self) -> usize {
        self.pool_size().div_ceil(4)
    }
}

/// 广告活动缓存
#[derive(Debug, Default)]
pub struct CampaignCache {
    state: Mutex<LifecycleState>,
}

#[async_trait]
impl Managed for CampaignCache {
    fn name(&self) -> &str {
        "campaign_cache"
    }

    async fn start(&self) -> Result<(), LifecycleError> {
        *self.state.lock() = LifecycleState::Starting;
        info!("预热广告活动缓存");
        *self.state.lock() = LifecycleState::Running;
        Ok(())
    }

    async fn stop(&self) -> Result<(), LifecycleError> {
        *self.state.lock() = LifecycleState::Stopped;
        Ok(())
    }
}

/// 预算同步服务
#[derive(Debug)]
pub struct BudgetSyncService {
    pool_size: usize,
    state: Mutex<LifecycleState>,
}

impl BudgetSyncService {
    /// 创建预算同步服务
    pub fn new(pool_size: usize) -> Self {
        Self {
            pool_size,
            state: Mutex::new(LifecycleState::Stopped),
        }
    }
}

#[async_trait]
impl Managed for BudgetSyncService {
    fn name(&self) -> &str {
        "budget_sync"
    }

    async fn start(&self) -> Result<(), LifecycleError> {
        if self.pool_size == 0 {
            *self.state.lock() = LifecycleState::Failed;
            return Err(LifecycleError::StartFailed {
                name: self.name().to_string(),
                message: "连接池大小不能为 0".to_string(),
            });
        }

        *self.state.lock() = LifecycleState::Running;
        info!(
            "预算同步服务已启动, 连接数 {}, 预热批次 {}",
            self.pool_size,
            self.warmup_batches()
        );
        Ok(())
    }

    async fn stop(&self) -> Result<(), LifecycleError> {
        *self.state.lock() = LifecycleState::Stopping;
        info!("预算同步服务停止中");
        *self.state.lock() = LifecycleState::Stopped;
        Ok(())
    }
}

impl PooledService for BudgetSyncService {
    fn pool_size(&self) -> usize {
        self.pool_size
    }
}

discoverable!(Abstract dyn PooledService: [dyn Managed]);
discoverable!(Concrete CampaignCache: [dyn Managed]);
discoverable!(Concrete BudgetSyncService: [dyn Managed, dyn PooledService]);
