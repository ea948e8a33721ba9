//! 集成测试共用的宿主替身

#![allow(dead_code)]

use auto_config::{Bootstrap, Bundle, Environment, RegistrationCategory, TypeDescriptor};
use di_abstractions::Instance;
use infrastructure_common::{HealthCheck, Managed, Task};
use std::sync::Arc;

/// 宿主收到的一次注册调用
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    Bundle(String),
    HealthCheck(String),
    Provider(String),
    InjectableProvider(String),
    Resource(String),
    Task(String),
    Managed(String),
}

impl HostCall {
    pub fn category(&self) -> RegistrationCategory {
        match self {
            Self::Bundle(_) => RegistrationCategory::Bundle,
            Self::HealthCheck(_) => RegistrationCategory::HealthCheck,
            Self::Provider(_) => RegistrationCategory::Provider,
            Self::InjectableProvider(_) => RegistrationCategory::InjectableProvider,
            Self::Resource(_) => RegistrationCategory::Resource,
            Self::Task(_) => RegistrationCategory::Task,
            Self::Managed(_) => RegistrationCategory::Managed,
        }
    }
}

/// 记录调用的启动上下文，收到插件后立即调用其 `initialize`
#[derive(Default)]
pub struct RecordingBootstrap {
    pub calls: Vec<HostCall>,
    pub bundles: Vec<Arc<dyn Bundle>>,
    pub initialized: Vec<String>,
}

impl Bootstrap for RecordingBootstrap {
    fn add_bundle(&mut self, bundle: Arc<dyn Bundle>) {
        self.calls.push(HostCall::Bundle(bundle.name().to_string()));
        bundle.initialize(self);
        self.initialized.push(bundle.name().to_string());
        self.bundles.push(bundle);
    }
}

/// 记录调用的宿主环境
#[derive(Default)]
pub struct RecordingEnvironment {
    pub calls: Vec<HostCall>,
    pub providers: Vec<Instance>,
    pub managed: Vec<Arc<dyn Managed>>,
}

impl Environment for RecordingEnvironment {
    fn add_health_check(&mut self, check: Arc<dyn HealthCheck>) {
        self.calls.push(HostCall::HealthCheck(check.name().to_string()));
    }

    fn add_provider(&mut self, descriptor: &'static TypeDescriptor, instance: Instance) {
        self.calls.push(HostCall::Provider(descriptor.name.to_string()));
        self.providers.push(instance);
    }

    fn add_injectable_provider(&mut self, descriptor: &'static TypeDescriptor) {
        self.calls
            .push(HostCall::InjectableProvider(descriptor.name.to_string()));
    }

    fn add_resource(&mut self, descriptor: &'static TypeDescriptor) {
        self.calls.push(HostCall::Resource(descriptor.name.to_string()));
    }

    fn add_task(&mut self, task: Arc<dyn Task>) {
        self.calls.push(HostCall::Task(task.name().to_string()));
    }

    fn manage(&mut self, managed: Arc<dyn Managed>) {
        self.calls.push(HostCall::Managed(managed.name().to_string()));
        self.managed.push(managed);
    }
}

/// 初始化测试日志，重复调用是安全的
pub fn init_test_logger() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
