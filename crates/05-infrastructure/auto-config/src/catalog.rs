//! 编译期类型目录
//!
//! 每个可被发现的声明在定义处通过 [`discoverable!`](crate::discoverable) 登记一条
//! [`TypeDescriptor`]，链接时由 `inventory` 汇总成全局目录。也可以用
//! [`type_descriptor!`](crate::type_descriptor) 构造描述符组成显式目录。

use di_abstractions::Instance;
use infrastructure_common::TypeInfo;
use std::any::{Any, TypeId};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// 声明种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    /// 可直接实例化的具体类型
    Concrete,
    /// 带部分实现、不能单独实例化的抽象声明
    Abstract,
    /// 纯契约 (trait)
    Contract,
}

impl DeclarationKind {
    /// 是否可以实例化
    pub fn is_instantiable(self) -> bool {
        matches!(self, Self::Concrete)
    }
}

/// 附加在声明上的标记
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(&'static str);

impl Tag {
    /// 创建标记
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// 标记名称
    pub const fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

/// 把解析出的实例转换为 `Arc<dyn Contract>` 并装箱
pub type InstanceCaster = fn(Instance) -> Option<Box<dyn Any>>;

/// 声明与某个契约之间的可赋值关系
#[derive(Clone, Copy)]
pub struct ContractBinding {
    contract: fn() -> TypeId,
    contract_name: &'static str,
    cast: Option<InstanceCaster>,
}

impl ContractBinding {
    /// 具体类型的契约绑定，携带实例转换函数
    pub const fn castable(
        contract: fn() -> TypeId,
        contract_name: &'static str,
        cast: InstanceCaster,
    ) -> Self {
        Self {
            contract,
            contract_name,
            cast: Some(cast),
        }
    }

    /// 抽象声明或契约的绑定，只参与查询
    pub const fn uncastable(contract: fn() -> TypeId, contract_name: &'static str) -> Self {
        Self {
            contract,
            contract_name,
            cast: None,
        }
    }

    /// 契约的类型ID
    pub fn contract_id(&self) -> TypeId {
        (self.contract)()
    }

    /// 契约名称
    pub fn contract_name(&self) -> &'static str {
        self.contract_name
    }

    /// 是否可以把实例转换为该契约
    pub fn is_castable(&self) -> bool {
        self.cast.is_some()
    }
}

impl fmt::Debug for ContractBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractBinding")
            .field("contract", &self.contract_name)
            .field("castable", &self.cast.is_some())
            .finish()
    }
}

/// 类型描述符
///
/// 目录中的一条记录。`module_path` 与 `name` 共同构成类型标识，
/// 比较、排序和哈希都只看标识。
pub struct TypeDescriptor {
    /// 声明名称
    pub name: &'static str,
    /// 声明所在模块
    pub module_path: &'static str,
    /// 声明对应的 Rust 类型
    pub type_id: fn() -> TypeId,
    /// 声明种类
    pub kind: DeclarationKind,
    /// 可赋值的契约
    pub contracts: &'static [ContractBinding],
    /// 附加标记
    pub tags: &'static [Tag],
}

inventory::collect!(TypeDescriptor);

impl TypeDescriptor {
    /// 完整限定名称
    pub fn qualified_name(&self) -> String {
        format!("{}::{}", self.module_path, self.name)
    }

    /// 转换为注入容器使用的类型信息
    pub fn type_info(&self) -> TypeInfo {
        TypeInfo::new((self.type_id)(), self.name, self.module_path)
    }

    /// 是否可以实例化
    pub fn is_instantiable(&self) -> bool {
        self.kind.is_instantiable()
    }

    /// 是否声明了对指定契约的可赋值关系
    pub fn implements(&self, contract: TypeId) -> bool {
        self.contracts
            .iter()
            .any(|binding| binding.contract_id() == contract)
    }

    /// 是否携带指定标记
    pub fn has_tag(&self, tag: Tag) -> bool {
        self.tags.contains(&tag)
    }

    /// 把解析出的实例视为契约 `C`
    ///
    /// 实例类型不符或声明没有对应的转换函数时返回 `None`
    pub fn cast<C: ?Sized + 'static>(&self, instance: Instance) -> Option<Arc<C>> {
        let binding = self
            .contracts
            .iter()
            .find(|binding| binding.contract_id() == TypeId::of::<C>())?;
        let cast = binding.cast?;

        cast(instance)?
            .downcast::<Arc<C>>()
            .ok()
            .map(|contract| *contract)
    }

    fn identity(&self) -> (&'static str, &'static str) {
        (self.module_path, self.name)
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("module_path", &self.module_path)
            .field("kind", &self.kind)
            .field("contracts", &self.contracts)
            .field("tags", &self.tags)
            .finish()
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.module_path, self.name)
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for TypeDescriptor {}

impl Hash for TypeDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl PartialOrd for TypeDescriptor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TypeDescriptor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.identity().cmp(&other.identity())
    }
}

/// 按类型标识排序的描述符集合
pub type TypeSet = BTreeSet<&'static TypeDescriptor>;

/// 遍历链接进当前程序的全部描述符
pub fn registered() -> impl Iterator<Item = &'static TypeDescriptor> {
    inventory::iter::<TypeDescriptor>.into_iter()
}

/// 构造类型描述符
///
/// ```ignore
/// static ORDERS: TypeDescriptor =
///     type_descriptor!(Concrete OrderService: [dyn Managed, dyn HealthCheck]);
/// static ROUTES: TypeDescriptor = type_descriptor!(Concrete OrderRoutes, tags: [PATH]);
/// static POOL: TypeDescriptor = type_descriptor!(Abstract dyn PooledService: [dyn Managed]);
/// ```
#[macro_export]
macro_rules! type_descriptor {
    (Concrete $ty:ty $(: [$($contract:ty),* $(,)?])? $(, tags: [$($tag:expr),* $(,)?])?) => {
        $crate::catalog::TypeDescriptor {
            name: stringify!($ty),
            module_path: module_path!(),
            type_id: ::std::any::TypeId::of::<$ty>,
            kind: $crate::catalog::DeclarationKind::Concrete,
            contracts: &[$($(
                $crate::catalog::ContractBinding::castable(
                    ::std::any::TypeId::of::<$contract>,
                    stringify!($contract),
                    |instance: $crate::__private::Instance| -> ::std::option::Option<
                        ::std::boxed::Box<dyn ::std::any::Any>,
                    > {
                        instance.downcast::<$ty>().ok().map(|concrete| {
                            ::std::boxed::Box::new(concrete as ::std::sync::Arc<$contract>)
                                as ::std::boxed::Box<dyn ::std::any::Any>
                        })
                    },
                ),
            )*)?],
            tags: &[$($($tag),*)?],
        }
    };
    (Abstract $ty:ty $(: [$($contract:ty),* $(,)?])? $(, tags: [$($tag:expr),* $(,)?])?) => {
        $crate::type_descriptor!(@uncastable Abstract $ty $(: [$($contract),*])? $(, tags: [$($tag),*])?)
    };
    (Contract $ty:ty $(: [$($contract:ty),* $(,)?])? $(, tags: [$($tag:expr),* $(,)?])?) => {
        $crate::type_descriptor!(@uncastable Contract $ty $(: [$($contract),*])? $(, tags: [$($tag),*])?)
    };
    (@uncastable $kind:ident $ty:ty $(: [$($contract:ty),*])? $(, tags: [$($tag:expr),*])?) => {
        $crate::catalog::TypeDescriptor {
            name: stringify!($ty),
            module_path: module_path!(),
            type_id: ::std::any::TypeId::of::<$ty>,
            kind: $crate::catalog::DeclarationKind::$kind,
            contracts: &[$($(
                $crate::catalog::ContractBinding::uncastable(
                    ::std::any::TypeId::of::<$contract>,
                    stringify!($contract),
                ),
            )*)?],
            tags: &[$($($tag),*)?],
        }
    };
}

/// 把声明登记到全局类型目录
///
/// 语法与 [`type_descriptor!`](crate::type_descriptor) 相同，通常紧跟在声明之后：
///
/// ```ignore
/// pub struct OrderService;
/// discoverable!(Concrete OrderService: [dyn Managed]);
/// ```
#[macro_export]
macro_rules! discoverable {
    ($($descriptor:tt)+) => {
        $crate::__private::inventory::submit! {
            $crate::type_descriptor!($($descriptor)+)
        }
    };
}
