//! # Auto Config
//!
//! 按命名空间自动发现组件并注册到宿主框架。
//!
//! ## 核心组件
//!
//! - [`TypeIndex`] - 命名空间范围内的类型索引
//! - [`filter_instantiable`] - 可实例化过滤器
//! - [`CategoryRegistrar`] - 由类别表驱动的分类注册器
//! - [`AutoConfig`] - 两阶段自动装配引擎
//!
//! ## 使用示例
//!
//! ```ignore
//! use auto_config::{discoverable, AutoConfig};
//!
//! pub struct OrderService;
//! discoverable!(Concrete OrderService: [dyn Managed]);
//!
//! let mut engine = AutoConfig::new(["app.services"])?;
//! engine.initialize(&mut bootstrap, &container).await?;
//! engine.run(&mut environment, &container).await?;
//! ```

pub mod catalog;
pub mod engine;
pub mod filter;
pub mod host;
pub mod index;
pub mod namespace;
pub mod options;
pub mod registrar;

pub use catalog::{ContractBinding, DeclarationKind, Tag, TypeDescriptor, TypeSet};
pub use engine::{AutoConfig, EngineState};
pub use filter::filter_instantiable;
pub use host::{Bootstrap, Bundle, Environment, InjectableProvider, PATH, PROVIDER};
pub use index::TypeIndex;
pub use namespace::{parse_namespaces, NamespacePrefix};
pub use options::AutoConfigOptions;
pub use registrar::{
    CategoryRegistrar, CategorySpec, Handoff, Marker, Phase, RegistrationCategory,
    RegistrationRecord, RegistrationReport, RegistrationTarget, CATEGORY_TABLE,
};

#[doc(hidden)]
pub mod __private {
    pub use di_abstractions::Instance;
    pub use inventory;
}
