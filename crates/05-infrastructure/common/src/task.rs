//! 管理任务接口定义

use crate::errors::TaskError;
use async_trait::async_trait;
use std::collections::HashMap;

/// 任务参数，同一个参数名可以出现多次
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskParameters {
    values: HashMap<String, Vec<String>>,
}

impl TaskParameters {
    /// 创建空参数集
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加参数值
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.entry(name.into()).or_default().push(value.into());
        self
    }

    /// 获取参数的第一个值
    pub fn first(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// 获取参数的全部值
    pub fn all(&self, name: &str) -> &[String] {
        self.values.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// 是否没有任何参数
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// 管理任务 trait
///
/// 宿主通过管理端口按名称调用已注册的任务
#[async_trait]
pub trait Task: Send + Sync {
    /// 任务名称，在宿主内唯一
    fn name(&self) -> &str;

    /// 执行任务
    async fn execute(&self, parameters: &TaskParameters) -> Result<(), TaskError>;
}
