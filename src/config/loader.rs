use config::{Config, ConfigError, Environment as ConfigEnvironment, File};
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 選擇配置檔的環境變數
pub const ENV_VAR: &str = "BIZDASH_ENV";
/// 配置目錄的環境變數
pub const CONFIG_DIR_VAR: &str = "BIZDASH_CONFIG_DIR";
/// 覆寫配置值的環境變數前綴
pub const ENV_PREFIX: &str = "BIZDASH";

/// 環境類型枚舉
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// 從環境變數取得當前環境設定
    pub fn from_env() -> Self {
        Self::parse(&env::var(ENV_VAR).unwrap_or_else(|_| "development".into()))
    }

    fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }

    /// 轉換為配置文件名
    pub fn as_filename(&self) -> &'static str {
        match self {
            Environment::Development => "development.toml",
            Environment::Production => "production.toml",
        }
    }
}

/// 配置加載器，負責根據環境加載適當的配置
pub struct ConfigLoader;

impl ConfigLoader {
    /// 載入配置
    ///
    /// 指定 `explicit` 時該檔案必須存在；否則讀取 `config/<env>.toml`，檔案不存在則只用預設值。
    pub fn load(env: Environment, explicit: Option<&Path>) -> Result<Config, ConfigError> {
        let mut config_builder = Config::builder();

        config_builder = match explicit {
            Some(path) => {
                debug!("使用指定的配置檔: {}", path.display());
                config_builder.add_source(File::from(path.to_path_buf()).required(true))
            }
            None => {
                let path = Self::default_path(env);
                debug!("使用環境配置檔: {}", path.display());
                config_builder.add_source(File::from(path).required(false))
            }
        };

        // 從環境變數加載配置（優先級高於文件配置）
        config_builder = config_builder.add_source(
            ConfigEnvironment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        config_builder.build()
    }

    /// 當前環境對應的配置檔路徑
    pub fn default_path(env: Environment) -> PathBuf {
        let config_dir = env::var(CONFIG_DIR_VAR).unwrap_or_else(|_| "config".into());
        Path::new(&config_dir).join(env.as_filename())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_parse() {
        assert_eq!(Environment::parse("production"), Environment::Production);
        assert_eq!(Environment::parse(" PROD "), Environment::Production);
        assert_eq!(Environment::parse("development"), Environment::Development);
        assert_eq!(Environment::parse("anything-else"), Environment::Development);
    }

    #[test]
    fn test_environment_as_filename() {
        assert_eq!(Environment::Development.as_filename(), "development.toml");
        assert_eq!(Environment::Production.as_filename(), "production.toml");
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let result = ConfigLoader::load(Environment::Development, Some(Path::new("/nonexistent/bizdash.toml")));
        assert!(result.is_err());
    }
}
