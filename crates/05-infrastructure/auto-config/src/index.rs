//! 类型索引
//!
//! 在构造时对类型目录做一次快照，只保留位于配置前缀之下的声明，
//! 之后只提供两个纯查询：按契约查子类型、按标记查类型。

use crate::catalog::{self, ContractBinding, Tag, TypeDescriptor, TypeSet};
use crate::namespace::{parse_namespaces, NamespacePrefix};
use infrastructure_common::{AutoConfigError, AutoConfigResult};
use std::any::TypeId;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

/// 命名空间范围内的类型索引
#[derive(Debug, Clone)]
pub struct TypeIndex {
    namespaces: Vec<NamespacePrefix>,
    declarations: TypeSet,
    subtypes: HashMap<TypeId, TypeSet>,
    tagged: HashMap<Tag, TypeSet>,
}

impl TypeIndex {
    /// 扫描链接进程序的全局类型目录
    pub fn scan<I, S>(namespaces: I) -> AutoConfigResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_catalog(namespaces, catalog::registered())
    }

    /// 基于显式目录构建索引
    pub fn from_catalog<I, S, C>(namespaces: I, catalog: C) -> AutoConfigResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        C: IntoIterator<Item = &'static TypeDescriptor>,
    {
        let namespaces = parse_namespaces(namespaces)?;
        Self::build(namespaces, catalog)
    }

    fn build<C>(namespaces: Vec<NamespacePrefix>, catalog: C) -> AutoConfigResult<Self>
    where
        C: IntoIterator<Item = &'static TypeDescriptor>,
    {
        info!(
            "开始扫描类型目录, 命名空间: [{}]",
            namespaces
                .iter()
                .map(NamespacePrefix::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        );

        let mut by_identity: BTreeMap<String, (&'static TypeDescriptor, usize)> = BTreeMap::new();

        for descriptor in catalog {
            let Some(scope) = namespaces
                .iter()
                .position(|prefix| prefix.covers(descriptor.module_path))
            else {
                continue;
            };

            let qualified = descriptor.qualified_name();
            if by_identity.contains_key(&qualified) {
                return Err(AutoConfigError::scan_error(
                    namespaces[scope].as_str(),
                    format!("类型 {} 在目录中登记了多次", qualified),
                ));
            }

            debug!("发现类型: {} ({:?})", qualified, descriptor.kind);
            by_identity.insert(qualified, (descriptor, scope));
        }

        let bases: HashMap<TypeId, &'static TypeDescriptor> = by_identity
            .values()
            .filter(|(descriptor, _)| !descriptor.is_instantiable())
            .map(|&(descriptor, _)| ((descriptor.type_id)(), descriptor))
            .collect();

        let mut declarations = TypeSet::new();
        let mut subtypes: HashMap<TypeId, TypeSet> = HashMap::new();
        let mut tagged: HashMap<Tag, TypeSet> = HashMap::new();

        for &(descriptor, scope) in by_identity.values() {
            for (contract, via) in assignable_contracts(descriptor, &bases) {
                if let Some((base, binding)) = via {
                    if descriptor.is_instantiable() {
                        return Err(AutoConfigError::scan_error(
                            namespaces[scope].as_str(),
                            format!(
                                "类型 {} 经由 {} 可赋值给 {}, 但没有直接声明该契约",
                                descriptor,
                                base.name,
                                binding.contract_name()
                            ),
                        ));
                    }
                }
                subtypes.entry(contract).or_default().insert(descriptor);
            }
            for &tag in descriptor.tags {
                tagged.entry(tag).or_default().insert(descriptor);
            }
            declarations.insert(descriptor);
        }

        info!("类型目录扫描完成, 共 {} 个声明", declarations.len());

        Ok(Self {
            namespaces,
            declarations,
            subtypes,
            tagged,
        })
    }

    /// 可赋值给契约 `C` 的全部声明（不含 `C` 自身）
    pub fn subtypes_of<C: ?Sized + 'static>(&self) -> TypeSet {
        self.subtypes_of_id(TypeId::of::<C>())
    }

    /// 按类型ID查询子类型
    pub fn subtypes_of_id(&self, contract: TypeId) -> TypeSet {
        self.subtypes.get(&contract).cloned().unwrap_or_default()
    }

    /// 携带指定标记的全部声明
    pub fn tagged_with(&self, tag: Tag) -> TypeSet {
        self.tagged.get(&tag).cloned().unwrap_or_default()
    }

    /// 索引中的全部声明
    pub fn declarations(&self) -> &TypeSet {
        &self.declarations
    }

    /// 构造时使用的命名空间前缀
    pub fn namespaces(&self) -> &[NamespacePrefix] {
        &self.namespaces
    }

    /// 声明数量
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// 是否没有任何声明
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

/// 经由索引内的抽象声明和契约声明间接到达的契约
type Via = Option<(&'static TypeDescriptor, &'static ContractBinding)>;

/// 声明可赋值的全部契约（不含自身）
///
/// 直接声明的契约对应 `None`，间接到达的契约记录途经的声明和绑定
fn assignable_contracts(
    descriptor: &'static TypeDescriptor,
    bases: &HashMap<TypeId, &'static TypeDescriptor>,
) -> HashMap<TypeId, Via> {
    let own_id = (descriptor.type_id)();
    let mut reached: HashMap<TypeId, Via> = descriptor
        .contracts
        .iter()
        .map(ContractBinding::contract_id)
        .filter(|&contract| contract != own_id)
        .map(|contract| (contract, None))
        .collect();
    let mut frontier: Vec<TypeId> = reached.keys().copied().collect();

    while let Some(contract) = frontier.pop() {
        let Some(&base) = bases.get(&contract) else {
            continue;
        };
        for binding in base.contracts {
            let next = binding.contract_id();
            if next != own_id && !reached.contains_key(&next) {
                reached.insert(next, Some((base, binding)));
                frontier.push(next);
            }
        }
    }

    reached
}
