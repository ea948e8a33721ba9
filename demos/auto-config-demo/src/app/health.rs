//! 健康检查

use async_trait::async_trait;
use auto_config::discoverable;
use infrastructure_common::{HealthCheck, HealthStatus};
use std::time::Duration;

/// 磁盘空间检查
#[derive(Debug)]
pub struct DiskSpaceCheck {
    free_ratio: f64,
    threshold: f64,
}

impl DiskSpaceCheck {
    /// 创建磁盘空间检查
    pub fn new(free_ratio: f64, threshold: f64) -> Self {
        Self {
            free_ratio,
            threshold,
        }
    }
}

#[async_trait]
impl HealthCheck for DiskSpaceCheck {
    fn name(&self) -> &str {
        "disk_space"
    }

    async fn check(&self) -> HealthStatus {
        if self.free_ratio >= self.threshold {
            HealthStatus::healthy()
        } else {
            HealthStatus::degraded(format!(
                "剩余空间 {:.0}% 低于阈值 {:.0}%",
                self.free_ratio * 100.0,
                self.threshold * 100.0
            ))
        }
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(2)
    }
}

/// 竞价上游连通性检查
#[derive(Debug, Default)]
pub struct BidderUpstreamCheck;

#[async_trait]
impl HealthCheck for BidderUpstreamCheck {
    fn name(&self) -> &str {
        "bidder_upstream"
    }

    async fn check(&self) -> HealthStatus {
        tokio::time::sleep(Duration::from_millis(5)).await;
        HealthStatus::healthy()
    }
}

discoverable!(Concrete DiskSpaceCheck: [dyn HealthCheck]);
discoverable!(Concrete BidderUpstreamCheck: [dyn HealthCheck]);
