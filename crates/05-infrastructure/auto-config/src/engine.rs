//! 自动装配引擎
//!
//! 在启动阶段注册启动插件，在运行阶段按固定顺序注册其余六个类别。

use crate::catalog::TypeDescriptor;
use crate::host::{Bootstrap, Environment};
use crate::index::TypeIndex;
use crate::options::AutoConfigOptions;
use crate::registrar::{CategoryRegistrar, Phase, RegistrationReport, RegistrationTarget};
use di_abstractions::Injector;
use infrastructure_common::AutoConfigResult;
use tracing::{info, warn};

/// 引擎状态
///
/// 只会向前推进，失败的阶段不改变状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum EngineState {
    /// 尚未执行任何阶段
    #[default]
    Uninitialized,
    /// 启动阶段已完成
    Bootstrapped,
    /// 运行阶段已完成
    RunComplete,
}

/// 自动装配引擎
#[derive(Debug)]
pub struct AutoConfig {
    index: TypeIndex,
    state: EngineState,
    bootstrap_executed: bool,
    run_executed: bool,
}

impl AutoConfig {
    /// 扫描全局类型目录创建引擎
    pub fn new<I, S>(namespaces: I) -> AutoConfigResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self::with_index(TypeIndex::scan(namespaces)?))
    }

    /// 基于显式目录创建引擎
    pub fn from_catalog<I, S, C>(namespaces: I, catalog: C) -> AutoConfigResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        C: IntoIterator<Item = &'static TypeDescriptor>,
    {
        Ok(Self::with_index(TypeIndex::from_catalog(namespaces, catalog)?))
    }

    /// 根据配置选项创建引擎
    pub fn from_options(options: &AutoConfigOptions) -> AutoConfigResult<Self> {
        options.validate()?;
        Self::new(&options.namespaces)
    }

    /// 使用已构建的索引创建引擎
    pub fn with_index(index: TypeIndex) -> Self {
        Self {
            index,
            state: EngineState::Uninitialized,
            bootstrap_executed: false,
            run_executed: false,
        }
    }

    /// 类型索引
    pub fn index(&self) -> &TypeIndex {
        &self.index
    }

    /// 当前状态
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// 指定阶段是否已经执行过，失败的执行也计算在内
    pub fn has_executed(&self, phase: Phase) -> bool {
        match phase {
            Phase::Bootstrap => self.bootstrap_executed,
            Phase::Run => self.run_executed,
        }
    }

    /// 启动阶段：注册启动插件
    ///
    /// 必须在宿主环境创建之前调用
    pub async fn initialize<I>(
        &mut self,
        bootstrap: &mut dyn Bootstrap,
        injector: &I,
    ) -> AutoConfigResult<RegistrationReport>
    where
        I: Injector + ?Sized,
    {
        if self.bootstrap_executed {
            warn!("启动阶段被重复执行, 启动插件可能被重复注册");
        }
        self.bootstrap_executed = true;

        let report = self
            .execute(
                Phase::Bootstrap,
                RegistrationTarget::Bootstrap(bootstrap),
                injector,
            )
            .await?;

        self.advance(EngineState::Bootstrapped);
        Ok(report)
    }

    /// 运行阶段：依次注册健康检查、通用提供者、内容协商提供者、
    /// 请求处理资源、管理任务和生命周期托管服务
    pub async fn run<I>(
        &mut self,
        environment: &mut dyn Environment,
        injector: &I,
    ) -> AutoConfigResult<RegistrationReport>
    where
        I: Injector + ?Sized,
    {
        if self.run_executed {
            warn!("运行阶段被重复执行, 组件可能被重复注册");
        }
        self.run_executed = true;

        let report = self
            .execute(
                Phase::Run,
                RegistrationTarget::Environment(environment),
                injector,
            )
            .await?;

        self.advance(EngineState::RunComplete);
        Ok(report)
    }

    async fn execute<I>(
        &self,
        phase: Phase,
        mut target: RegistrationTarget<'_>,
        injector: &I,
    ) -> AutoConfigResult<RegistrationReport>
    where
        I: Injector + ?Sized,
    {
        info!("开始{}阶段自动装配", phase);

        let registrar = CategoryRegistrar::new(&self.index, injector);
        let mut report = RegistrationReport::new();

        for category in phase.categories() {
            registrar.register(category, &mut target, &mut report).await?;
        }

        info!("{}阶段自动装配完成, 共注册 {} 个组件", phase, report.len());
        Ok(report)
    }

    fn advance(&mut self, next: EngineState) {
        if next > self.state {
            self.state = next;
        }
    }
}
