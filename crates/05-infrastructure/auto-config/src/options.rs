//! 自动装配配置选项

use infrastructure_common::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, error};

/// 配置中自动装配选项所在的节
pub const OPTIONS_SECTION: &str = "auto_config";

/// 环境变量前缀
pub const ENV_PREFIX: &str = "ADSP";

/// 自动装配选项
///
/// ```toml
/// [auto_config]
/// namespaces = ["app.services", "app::resources"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoConfigOptions {
    /// 需要扫描的命名空间前缀，按顺序
    #[serde(default)]
    pub namespaces: Vec<String>,
}

impl AutoConfigOptions {
    /// 用命名空间前缀创建选项
    pub fn new<I, S>(namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            namespaces: namespaces.into_iter().map(Into::into).collect(),
        }
    }

    /// 从已构建的配置中绑定 `auto_config` 节
    pub fn from_config(settings: &config::Config) -> ConfigResult<Self> {
        let options: Self = settings.get(OPTIONS_SECTION).map_err(|e| match e {
            config::ConfigError::NotFound(key) => ConfigError::KeyNotFound { key },
            other => {
                error!("自动装配选项绑定失败: {}", other);
                ConfigError::parse_error(other)
            }
        })?;

        debug!("自动装配选项绑定成功: {:?}", options.namespaces);
        Ok(options)
    }

    /// 从 TOML 文本加载
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(content, config::FileFormat::Toml))
            .build()
            .map_err(ConfigError::parse_error)?;

        Self::from_config(&settings)
    }

    /// 从配置文件加载，环境变量 `ADSP_AUTO_CONFIG__NAMESPACES` 可覆盖文件内容
    ///
    /// 环境变量中的多个前缀用逗号分隔
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        debug!("加载自动装配选项: {}", path.display());

        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("auto_config.namespaces")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| {
                error!("配置构建失败: {}", e);
                ConfigError::parse_error(e)
            })?;

        Self::from_config(&settings)
    }

    /// 校验选项
    pub fn validate(&self) -> ConfigResult<()> {
        if self.namespaces.is_empty() {
            return Err(ConfigError::ValidationError {
                message: format!("{}.namespaces 至少需要一个命名空间前缀", OPTIONS_SECTION),
            });
        }

        if let Some(position) = self
            .namespaces
            .iter()
            .position(|namespace| namespace.trim().is_empty())
        {
            return Err(ConfigError::ValidationError {
                message: format!("{}.namespaces[{}] 为空", OPTIONS_SECTION, position),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_toml_str() {
        let options = AutoConfigOptions::from_toml_str(
            r#"
            [auto_config]
            namespaces = ["app.services", "app::resources"]
            "#,
        )
        .unwrap();

        assert_eq!(
            options,
            AutoConfigOptions::new(["app.services", "app::resources"])
        );
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_missing_section_is_key_not_found() {
        let error = AutoConfigOptions::from_toml_str("[server]\nport = 8080\n").unwrap_err();

        assert!(matches!(error, ConfigError::KeyNotFound { .. }));
    }

    #[test]
    fn test_wrong_shape_is_parse_error() {
        let error =
            AutoConfigOptions::from_toml_str("[auto_config]\nnamespaces = 42\n").unwrap_err();

        assert!(matches!(error, ConfigError::ParseError { .. }));
    }

    #[test]
    fn test_validate_rejects_empty_namespaces() {
        let empty = AutoConfigOptions::default();
        assert!(matches!(
            empty.validate(),
            Err(ConfigError::ValidationError { .. })
        ));

        let blank = AutoConfigOptions::new(["app", "  "]);
        assert!(blank.validate().is_err());
    }

    #[test]
    fn test_load_missing_file_without_env_is_not_found() {
        let error = AutoConfigOptions::load("does/not/exist.toml").unwrap_err();

        assert!(matches!(error, ConfigError::KeyNotFound { .. }));
    }
}
