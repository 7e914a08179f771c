/// 配置管理模組
///
/// 本模組負責加載、驗證和管理系統配置。
/// 優先順序由低到高：內建預設值、TOML 配置檔、`BIZDASH_` 開頭的環境變數。
// 宣告子模組
pub mod loader;
pub mod manager;
pub mod types;
pub mod validation;

// 重新導出常用組件
pub use loader::{ConfigLoader, Environment};
pub use manager::{get_config, init_config, ConfigLoadError};
pub use types::*;
pub use validation::{ValidationError, Validator};
