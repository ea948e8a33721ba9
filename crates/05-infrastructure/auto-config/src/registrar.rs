//! 分类注册器
//!
//! 七种注册类别共用同一个注册过程，差异只体现在静态类别表中：
//! 用什么标记查询索引、在哪个阶段执行、交给宿主的是实例还是类型。

use crate::catalog::{Tag, TypeDescriptor, TypeSet};
use crate::filter::filter_instantiable;
use crate::host::{Bootstrap, Bundle, Environment, InjectableProvider, PATH, PROVIDER};
use crate::index::TypeIndex;
use di_abstractions::{Injector, Instance};
use infrastructure_common::{
    AutoConfigError, AutoConfigResult, DependencyError, HealthCheck, Managed, Task,
};
use std::any::TypeId;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info};

/// 注册类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RegistrationCategory {
    /// 启动插件
    Bundle,
    /// 健康检查
    HealthCheck,
    /// 通用提供者
    Provider,
    /// 内容协商提供者
    InjectableProvider,
    /// 请求处理资源
    Resource,
    /// 管理任务
    Task,
    /// 生命周期托管服务
    Managed,
}

impl RegistrationCategory {
    /// 全部类别，按类别表顺序
    pub const ALL: [Self; 7] = [
        Self::Bundle,
        Self::HealthCheck,
        Self::Provider,
        Self::InjectableProvider,
        Self::Resource,
        Self::Task,
        Self::Managed,
    ];

    /// 类别在类别表中的定义
    pub fn spec(self) -> &'static CategorySpec {
        &CATEGORY_TABLE[self as usize]
    }

    /// 诊断输出使用的名称
    pub fn label(self) -> &'static str {
        self.spec().label
    }

    /// 类别所属的阶段
    pub fn phase(self) -> Phase {
        self.spec().phase
    }
}

impl fmt::Display for RegistrationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 注册阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// 启动阶段，宿主环境尚未创建
    Bootstrap,
    /// 运行阶段
    Run,
}

impl Phase {
    /// 该阶段依次处理的类别
    pub fn categories(self) -> impl Iterator<Item = RegistrationCategory> {
        CATEGORY_TABLE
            .iter()
            .filter(move |spec| spec.phase == self)
            .map(|spec| spec.category)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bootstrap => f.write_str("启动"),
            Self::Run => f.write_str("运行"),
        }
    }
}

/// 契约引用
#[derive(Clone, Copy)]
pub struct ContractRef {
    id: fn() -> TypeId,
    name: &'static str,
}

impl ContractRef {
    /// 契约的类型ID
    pub fn id(&self) -> TypeId {
        (self.id)()
    }

    /// 契约名称
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for ContractRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// 类别的能力标记
#[derive(Debug, Clone, Copy)]
pub enum Marker {
    /// 可赋值给某个契约
    SubtypeOf(ContractRef),
    /// 携带某个标记
    TaggedWith(Tag),
}

impl Marker {
    /// 用标记查询索引，结果未经过滤
    pub fn query(&self, index: &TypeIndex) -> TypeSet {
        match self {
            Self::SubtypeOf(contract) => index.subtypes_of_id(contract.id()),
            Self::TaggedWith(tag) => index.tagged_with(*tag),
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SubtypeOf(contract) => write!(f, "subtype-of {}", contract.name),
            Self::TaggedWith(tag) => write!(f, "tagged-with {}", tag),
        }
    }
}

/// 交给宿主的内容
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handoff {
    /// 通过注入容器解析出的实例
    Instance,
    /// 类型本身，由宿主按请求实例化
    Type,
}

/// 类别表中的一行
#[derive(Debug)]
pub struct CategorySpec {
    /// 类别
    pub category: RegistrationCategory,
    /// 诊断名称
    pub label: &'static str,
    /// 所属阶段
    pub phase: Phase,
    /// 能力标记
    pub marker: Marker,
    /// 交给宿主的内容
    pub handoff: Handoff,
}

/// 类别表
///
/// 行的顺序就是同一阶段内的注册顺序
pub static CATEGORY_TABLE: [CategorySpec; 7] = [
    CategorySpec {
        category: RegistrationCategory::Bundle,
        label: "bundle",
        phase: Phase::Bootstrap,
        marker: Marker::SubtypeOf(ContractRef {
            id: TypeId::of::<dyn Bundle>,
            name: "dyn Bundle",
        }),
        handoff: Handoff::Instance,
    },
    CategorySpec {
        category: RegistrationCategory::HealthCheck,
        label: "health_check",
        phase: Phase::Run,
        marker: Marker::SubtypeOf(ContractRef {
            id: TypeId::of::<dyn HealthCheck>,
            name: "dyn HealthCheck",
        }),
        handoff: Handoff::Instance,
    },
    CategorySpec {
        category: RegistrationCategory::Provider,
        label: "provider",
        phase: Phase::Run,
        marker: Marker::TaggedWith(PROVIDER),
        handoff: Handoff::Instance,
    },
    CategorySpec {
        category: RegistrationCategory::InjectableProvider,
        label: "injectable_provider",
        phase: Phase::Run,
        marker: Marker::SubtypeOf(ContractRef {
            id: TypeId::of::<dyn InjectableProvider>,
            name: "dyn InjectableProvider",
        }),
        handoff: Handoff::Type,
    },
    CategorySpec {
        category: RegistrationCategory::Resource,
        label: "resource",
        phase: Phase::Run,
        marker: Marker::TaggedWith(PATH),
        handoff: Handoff::Type,
    },
    CategorySpec {
        category: RegistrationCategory::Task,
        label: "task",
        phase: Phase::Run,
        marker: Marker::SubtypeOf(ContractRef {
            id: TypeId::of::<dyn Task>,
            name: "dyn Task",
        }),
        handoff: Handoff::Instance,
    },
    CategorySpec {
        category: RegistrationCategory::Managed,
        label: "managed",
        phase: Phase::Run,
        marker: Marker::SubtypeOf(ContractRef {
            id: TypeId::of::<dyn Managed>,
            name: "dyn Managed",
        }),
        handoff: Handoff::Instance,
    },
];

/// 准备交给宿主的注册内容
enum Registration {
    Bundle(Arc<dyn Bundle>),
    HealthCheck(Arc<dyn HealthCheck>),
    Provider(&'static TypeDescriptor, Instance),
    InjectableProvider(&'static TypeDescriptor),
    Resource(&'static TypeDescriptor),
    Task(Arc<dyn Task>),
    Managed(Arc<dyn Managed>),
}

impl Registration {
    fn category(&self) -> RegistrationCategory {
        match self {
            Self::Bundle(_) => RegistrationCategory::Bundle,
            Self::HealthCheck(_) => RegistrationCategory::HealthCheck,
            Self::Provider(..) => RegistrationCategory::Provider,
            Self::InjectableProvider(_) => RegistrationCategory::InjectableProvider,
            Self::Resource(_) => RegistrationCategory::Resource,
            Self::Task(_) => RegistrationCategory::Task,
            Self::Managed(_) => RegistrationCategory::Managed,
        }
    }
}

/// 注册目标，对应两个阶段的宿主对象
pub enum RegistrationTarget<'a> {
    /// 启动上下文
    Bootstrap(&'a mut dyn Bootstrap),
    /// 宿主环境
    Environment(&'a mut dyn Environment),
}

impl RegistrationTarget<'_> {
    /// 目标所属阶段
    pub fn phase(&self) -> Phase {
        match self {
            Self::Bootstrap(_) => Phase::Bootstrap,
            Self::Environment(_) => Phase::Run,
        }
    }

    fn accept(&mut self, registration: Registration) -> AutoConfigResult<()> {
        match (self, registration) {
            (Self::Bootstrap(bootstrap), Registration::Bundle(bundle)) => {
                bootstrap.add_bundle(bundle);
            }
            (Self::Environment(environment), Registration::HealthCheck(check)) => {
                environment.add_health_check(check);
            }
            (Self::Environment(environment), Registration::Provider(descriptor, instance)) => {
                environment.add_provider(descriptor, instance);
            }
            (Self::Environment(environment), Registration::InjectableProvider(descriptor)) => {
                environment.add_injectable_provider(descriptor);
            }
            (Self::Environment(environment), Registration::Resource(descriptor)) => {
                environment.add_resource(descriptor);
            }
            (Self::Environment(environment), Registration::Task(task)) => {
                environment.add_task(task);
            }
            (Self::Environment(environment), Registration::Managed(managed)) => {
                environment.manage(managed);
            }
            (target, registration) => {
                return Err(phase_mismatch(registration.category(), target.phase()));
            }
        }
        Ok(())
    }
}

fn phase_mismatch(category: RegistrationCategory, phase: Phase) -> AutoConfigError {
    AutoConfigError::configuration(format!(
        "{} 类别属于{}阶段, 不能在{}阶段注册",
        category,
        category.phase(),
        phase
    ))
}

/// 单条注册记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRecord {
    /// 注册类别
    pub category: RegistrationCategory,
    /// 类型完整限定名称
    pub type_name: String,
    /// 交给宿主的内容
    pub handoff: Handoff,
}

/// 一个阶段的注册报告，按注册顺序保存
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationReport {
    records: Vec<RegistrationRecord>,
}

impl RegistrationReport {
    /// 创建空报告
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加记录
    pub fn push(&mut self, record: RegistrationRecord) {
        self.records.push(record);
    }

    /// 全部记录
    pub fn records(&self) -> &[RegistrationRecord] {
        &self.records
    }

    /// 记录数量
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// 是否没有任何记录
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 指定类别的注册数量
    pub fn count(&self, category: RegistrationCategory) -> usize {
        self.records
            .iter()
            .filter(|record| record.category == category)
            .count()
    }

    /// 指定类别已注册的类型名称
    pub fn type_names(&self, category: RegistrationCategory) -> Vec<&str> {
        self.records
            .iter()
            .filter(|record| record.category == category)
            .map(|record| record.type_name.as_str())
            .collect()
    }
}

/// 分类注册器
///
/// 对一个类别执行：查询索引、过滤、解析实例、交给宿主、记录诊断
pub struct CategoryRegistrar<'a, I: Injector + ?Sized> {
    index: &'a TypeIndex,
    injector: &'a I,
}

impl<'a, I: Injector + ?Sized> CategoryRegistrar<'a, I> {
    /// 创建注册器
    pub fn new(index: &'a TypeIndex, injector: &'a I) -> Self {
        Self { index, injector }
    }

    /// 类别的候选类型，已过滤掉不可实例化的声明
    pub fn candidates(&self, category: RegistrationCategory) -> TypeSet {
        filter_instantiable(category.spec().marker.query(self.index))
    }

    /// 注册一个类别，返回注册数量
    ///
    /// 任何一次解析失败都会立即返回，剩余候选不再处理
    pub async fn register(
        &self,
        category: RegistrationCategory,
        target: &mut RegistrationTarget<'_>,
        report: &mut RegistrationReport,
    ) -> AutoConfigResult<usize> {
        let spec = category.spec();
        if spec.phase != target.phase() {
            return Err(phase_mismatch(category, target.phase()));
        }

        let candidates = self.candidates(category);
        debug!(
            "{} 类别按 {} 找到 {} 个候选类型",
            spec.label,
            spec.marker,
            candidates.len()
        );

        for &descriptor in &candidates {
            let registration = self.prepare(spec, descriptor).await?;
            target.accept(registration)?;

            report.push(RegistrationRecord {
                category,
                type_name: descriptor.qualified_name(),
                handoff: spec.handoff,
            });
            info!("已注册 {}: {}", spec.label, descriptor);
        }

        Ok(candidates.len())
    }

    async fn prepare(
        &self,
        spec: &CategorySpec,
        descriptor: &'static TypeDescriptor,
    ) -> AutoConfigResult<Registration> {
        let registration = match spec.category {
            RegistrationCategory::Bundle => {
                Registration::Bundle(self.resolve_as::<dyn Bundle>(spec, descriptor).await?)
            }
            RegistrationCategory::HealthCheck => Registration::HealthCheck(
                self.resolve_as::<dyn HealthCheck>(spec, descriptor).await?,
            ),
            RegistrationCategory::Provider => {
                Registration::Provider(descriptor, self.resolve(spec, descriptor).await?)
            }
            RegistrationCategory::InjectableProvider => {
                Registration::InjectableProvider(descriptor)
            }
            RegistrationCategory::Resource => Registration::Resource(descriptor),
            RegistrationCategory::Task => {
                Registration::Task(self.resolve_as::<dyn Task>(spec, descriptor).await?)
            }
            RegistrationCategory::Managed => {
                Registration::Managed(self.resolve_as::<dyn Managed>(spec, descriptor).await?)
            }
        };
        Ok(registration)
    }

    async fn resolve(
        &self,
        spec: &CategorySpec,
        descriptor: &'static TypeDescriptor,
    ) -> AutoConfigResult<Instance> {
        debug!("解析组件: {}", descriptor);

        match self.injector.get_instance(&descriptor.type_info()).await {
            Ok(instance) => Ok(instance),
            Err(source) => Err(resolution_failed(spec, descriptor, source)),
        }
    }

    async fn resolve_as<C: ?Sized + 'static>(
        &self,
        spec: &CategorySpec,
        descriptor: &'static TypeDescriptor,
    ) -> AutoConfigResult<Arc<C>> {
        let instance = self.resolve(spec, descriptor).await?;

        descriptor.cast::<C>(instance).ok_or_else(|| {
            let source = DependencyError::type_mismatch(
                descriptor.qualified_name(),
                std::any::type_name::<C>(),
            );
            resolution_failed(spec, descriptor, source)
        })
    }
}

fn resolution_failed(
    spec: &CategorySpec,
    descriptor: &TypeDescriptor,
    source: DependencyError,
) -> AutoConfigError {
    error!("注册 {} 失败: {}, 原因: {}", spec.label, descriptor, source);
    AutoConfigError::resolution(spec.label, descriptor.qualified_name(), source)
}
