//! 管理任务

use async_trait::async_trait;
use auto_config::discoverable;
use infrastructure_common::{Task, TaskError, TaskParameters};
use tracing::info;

/// 清空指定区域的缓存
#[derive(Debug, Default)]
pub struct FlushCacheTask;

#[async_trait]
impl Task for FlushCacheTask {
    fn name(&self) -> &str {
        "flush_cache"
    }

    async fn execute(&self, parameters: &TaskParameters) -> Result<(), TaskError> {
        let regions = parameters.all("region");
        if regions.is_empty() {
            return Err(TaskError::InvalidParameter {
                task: self.name().to_string(),
                parameter: "region".to_string(),
            });
        }

        for region in regions {
            info!("清空缓存区域: {}", region);
        }
        Ok(())
    }
}

discoverable!(Concrete FlushCacheTask: [dyn Task]);
