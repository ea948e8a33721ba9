//! 启动插件

use auto_config::{discoverable, Bootstrap, Bundle, Environment};
use tracing::info;

/// 管理端插件
#[derive(Debug, Default)]
pub struct AdminBundle;

impl Bundle for AdminBundle {
    fn name(&self) -> &str {
        "admin"
    }

    fn initialize(&self, _bootstrap: &mut dyn Bootstrap) {
        info!("管理端插件初始化");
    }

    fn run(&self, _environment: &mut dyn Environment) {
        info!("管理端插件已挂载到宿主环境");
    }
}

discoverable!(Concrete AdminBundle: [dyn Bundle]);
