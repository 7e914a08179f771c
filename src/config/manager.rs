use crate::config::loader::{ConfigLoader, Environment};
use crate::config::types::ApplicationConfig;
use crate::config::validation::{ValidationError, Validator};
use config::ConfigError;
use once_cell::sync::OnceCell;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

// 全局配置實例
static CONFIG: OnceCell<ApplicationConfig> = OnceCell::new();

/// 配置載入錯誤
#[derive(Error, Debug)]
pub enum ConfigLoadError {
    #[error("無法讀取配置: {0}")]
    Load(#[from] ConfigError),

    #[error("配置驗證失敗: {0}")]
    Invalid(#[from] ValidationError),
}

/// 取得已初始化的全局配置
pub fn get_config() -> Option<&'static ApplicationConfig> {
    CONFIG.get()
}

/// 初始化全局配置（在應用程序啟動時調用）
///
/// 重複初始化時保留第一次的配置。
pub fn init_config(config: ApplicationConfig) -> &'static ApplicationConfig {
    if CONFIG.set(config).is_err() {
        warn!("配置已經被初始化，跳過重複初始化");
    } else {
        debug!("配置初始化成功");
    }
    CONFIG.get_or_init(ApplicationConfig::default)
}

/// ApplicationConfig 加載方法實現
impl ApplicationConfig {
    /// 從環境變數指定的環境加載配置
    pub fn load_from_env(explicit: Option<&Path>) -> Result<Self, ConfigLoadError> {
        let env = Environment::from_env();
        debug!("從環境加載配置: {:?}", env);
        Self::load(env, explicit)
    }

    /// 從指定環境加載並驗證配置
    pub fn load(env: Environment, explicit: Option<&Path>) -> Result<Self, ConfigLoadError> {
        let config_source = ConfigLoader::load(env, explicit)?;

        // 使用 serde 反序列化配置
        let app_config: ApplicationConfig = config_source.try_deserialize()?;

        app_config.validate()?;
        debug!("配置驗證通過");

        Ok(app_config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_types::Granularity;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    fn toml_file() -> NamedTempFile {
        Builder::new().suffix(".toml").tempfile().unwrap()
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = toml_file();
        writeln!(
            file,
            "[data]\ndirectory = \"fixtures\"\n\n[dashboard]\ndefault_granularity = \"month\"\nchart_width = 60"
        )
        .unwrap();

        let config = ApplicationConfig::load(Environment::Development, Some(file.path())).unwrap();
        assert_eq!(config.data.directory, "fixtures");
        assert_eq!(config.data.business_file, "business.csv");
        assert_eq!(config.dashboard.default_granularity, Granularity::Month);
        assert_eq!(config.dashboard.chart_width, 60);
    }

    #[test]
    fn test_invalid_file_values_rejected() {
        let mut file = toml_file();
        writeln!(file, "[log]\nlevel = \"loud\"").unwrap();

        let result = ApplicationConfig::load(Environment::Development, Some(file.path()));
        assert!(matches!(result, Err(ConfigLoadError::Invalid(_))));
    }

    #[test]
    fn test_init_config_keeps_first() {
        let first = init_config(ApplicationConfig::default());
        let mut other = ApplicationConfig::default();
        other.dashboard.chart_width = 99;
        let second = init_config(other);
        assert_eq!(first, second);
        assert!(get_config().is_some());
    }
}
