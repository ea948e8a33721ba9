//! 旧版报表服务
//!
//! 位于扫描前缀之外，自动装配不会发现它

use async_trait::async_trait;
use auto_config::discoverable;
use infrastructure_common::{LifecycleError, Managed};

/// 旧版报表服务
#[derive(Debug, Default)]
pub struct LegacyReportService;

#[async_trait]
impl Managed for LegacyReportService {
    fn name(&self) -> &str {
        "legacy_report"
    }

    async fn start(&self) -> Result<(), LifecycleError> {
        Err(LifecycleError::StartFailed {
            name: self.name().to_string(),
            message: "旧版报表服务不应被启动".to_string(),
        })
    }

    async fn stop(&self) -> Result<(), LifecycleError> {
        Ok(())
    }
}

discoverable!(Concrete LegacyReportService: [dyn Managed]);
