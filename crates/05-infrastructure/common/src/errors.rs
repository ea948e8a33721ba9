//! 错误类型定义

use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置解析失败: {source}")]
    ParseError {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("配置键不存在: {key}")]
    KeyNotFound { key: String },

    #[error("配置验证失败: {message}")]
    ValidationError { message: String },
}

impl ConfigError {
    /// 创建解析错误
    pub fn parse_error(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::ParseError {
            source: Box::new(source),
        }
    }
}

/// 依赖注入错误类型
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("组件未注册: {type_name}")]
    ComponentNotRegistered { type_name: String },

    #[error("组件创建失败: {type_name}, 原因: {source}")]
    ComponentCreationFailed {
        type_name: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("依赖解析失败: {type_name}, 原因: {message}")]
    DependencyResolutionFailed { type_name: String, message: String },

    #[error("组件类型不匹配: {type_name} 无法作为 {expected} 使用")]
    TypeMismatch { type_name: String, expected: String },
}

impl DependencyError {
    /// 创建组件未注册错误
    pub fn not_registered(type_name: impl Into<String>) -> Self {
        Self::ComponentNotRegistered {
            type_name: type_name.into(),
        }
    }

    /// 创建组件创建失败错误
    pub fn creation_failed(
        type_name: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::ComponentCreationFailed {
            type_name: type_name.into(),
            source: source.into(),
        }
    }

    /// 创建类型不匹配错误
    pub fn type_mismatch(type_name: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::TypeMismatch {
            type_name: type_name.into(),
            expected: expected.into(),
        }
    }
}

/// 生命周期管理错误类型
#[derive(Error, Debug)]
pub enum LifecycleError {
    #[error("组件启动失败: {name}, 原因: {message}")]
    StartFailed { name: String, message: String },

    #[error("组件停止失败: {name}, 原因: {message}")]
    StopFailed { name: String, message: String },
}

/// 管理任务错误类型
#[derive(Error, Debug)]
pub enum TaskError {
    #[error("任务执行失败: {task}, 原因: {message}")]
    ExecutionFailed { task: String, message: String },

    #[error("任务参数无效: {task}, 参数: {parameter}")]
    InvalidParameter { task: String, parameter: String },
}

/// 自动装配错误类型
///
/// 所有变体都发生在宿主应用开始服务之前，均视为致命错误
#[derive(Error, Debug)]
pub enum AutoConfigError {
    #[error("自动装配配置无效: {message}")]
    ConfigurationError {
        message: String,
        #[source]
        source: Option<ConfigError>,
    },

    #[error("组件解析失败: [{category}] {type_name}, 原因: {source}")]
    ResolutionError {
        category: &'static str,
        type_name: String,
        source: DependencyError,
    },

    #[error("类型扫描失败: {namespace}, 原因: {message}")]
    ScanError { namespace: String, message: String },
}

impl AutoConfigError {
    /// 创建配置错误
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
            source: None,
        }
    }

    /// 创建解析错误
    pub fn resolution(
        category: &'static str,
        type_name: impl Into<String>,
        source: DependencyError,
    ) -> Self {
        Self::ResolutionError {
            category,
            type_name: type_name.into(),
            source,
        }
    }

    /// 创建扫描错误
    pub fn scan_error(namespace: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ScanError {
            namespace: namespace.into(),
            message: message.into(),
        }
    }

    /// 是否为配置错误
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::ConfigurationError { .. })
    }

    /// 是否为解析错误
    pub fn is_resolution_error(&self) -> bool {
        matches!(self, Self::ResolutionError { .. })
    }

    /// 是否为扫描错误
    pub fn is_scan_error(&self) -> bool {
        matches!(self, Self::ScanError { .. })
    }
}

impl From<ConfigError> for AutoConfigError {
    fn from(source: ConfigError) -> Self {
        Self::ConfigurationError {
            message: "自动装配选项加载失败".to_string(),
            source: Some(source),
        }
    }
}

/// 结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type DependencyResult<T> = Result<T, DependencyError>;
pub type LifecycleResult<T> = Result<T, LifecycleError>;
pub type TaskResult<T> = Result<T, TaskError>;
pub type AutoConfigResult<T> = Result<T, AutoConfigError>;
