//! 命名空间前缀

use infrastructure_common::{AutoConfigError, AutoConfigResult};
use std::fmt;

const SEPARATOR: &str = "::";

/// 命名空间前缀
///
/// 标识代码库中的一棵模块子树。`.` 与 `::` 都可以作为分隔符，
/// 内部统一保存为 `::` 形式。匹配按路径段进行，`app::svc`
/// 覆盖 `app::svc` 与 `app::svc::x`，但不覆盖 `app::svc_other`。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NamespacePrefix(String);

impl NamespacePrefix {
    /// 解析命名空间前缀
    pub fn parse(raw: &str) -> AutoConfigResult<Self> {
        let normalized = raw.trim().replace('.', SEPARATOR);
        let trimmed = normalized
            .trim_start_matches(SEPARATOR)
            .trim_end_matches(SEPARATOR);

        if trimmed.is_empty() {
            return Err(AutoConfigError::configuration(format!(
                "命名空间前缀不能为空: {:?}",
                raw
            )));
        }

        for segment in trimmed.split(SEPARATOR) {
            if segment.is_empty() {
                return Err(AutoConfigError::configuration(format!(
                    "命名空间前缀包含空路径段: {:?}",
                    raw
                )));
            }
            if !is_identifier(segment) {
                return Err(AutoConfigError::configuration(format!(
                    "命名空间前缀的路径段 {:?} 不是合法标识符: {:?}",
                    segment, raw
                )));
            }
        }

        Ok(Self(trimmed.to_string()))
    }

    /// 前缀字符串（`::` 分隔）
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 模块路径是否位于该前缀之下
    pub fn covers(&self, module_path: &str) -> bool {
        module_path == self.0
            || module_path
                .strip_prefix(self.0.as_str())
                .is_some_and(|rest| rest.starts_with(SEPARATOR))
    }
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    chars
        .next()
        .is_some_and(|first| first == '_' || first.is_alphabetic())
        && chars.all(|c| c == '_' || c.is_alphanumeric())
}

impl fmt::Display for NamespacePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 解析一组命名空间前缀
///
/// 保持首次出现的顺序并去重。空集合是配置错误。
pub fn parse_namespaces<I, S>(raw: I) -> AutoConfigResult<Vec<NamespacePrefix>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut prefixes: Vec<NamespacePrefix> = Vec::new();

    for item in raw {
        let prefix = NamespacePrefix::parse(item.as_ref())?;
        if !prefixes.contains(&prefix) {
            prefixes.push(prefix);
        }
    }

    if prefixes.is_empty() {
        return Err(AutoConfigError::configuration(
            "至少需要提供一个命名空间前缀",
        ));
    }

    Ok(prefixes)
}
