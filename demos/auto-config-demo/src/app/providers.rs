//! 提供者

use auto_config::{discoverable, InjectableProvider, PROVIDER};
use std::sync::atomic::{AtomicU64, Ordering};

/// 请求ID生成器，以实例形式注册
#[derive(Debug, Default)]
pub struct RequestIdProvider {
    next: AtomicU64,
}

impl RequestIdProvider {
    /// 生成下一个请求ID
    pub fn next_id(&self) -> String {
        format!("req-{:08}", self.next.fetch_add(1, Ordering::Relaxed))
    }
}

/// JSON 请求体解析器，由宿主按请求实例化
#[derive(Debug, Default)]
pub struct JsonBodyProvider;

impl InjectableProvider for JsonBodyProvider {}

discoverable!(Concrete RequestIdProvider, tags: [PROVIDER]);
discoverable!(Concrete JsonBodyProvider: [dyn InjectableProvider]);
