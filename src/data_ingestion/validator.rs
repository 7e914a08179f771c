//! 資料驗證器模組
//!
//! 在 CSV 解析之後，對每一筆記錄套用業務規則：
//!
//! - **數值範圍驗證**：金額必須為有限且非負的數值
//! - **業務邏輯驗證**：新訂單數不超過總訂單數、毛利不超過營收
//!
//! 不通過驗證的記錄與解析失敗的記錄採用同一套處理策略（丟棄或中止）。

pub mod business_validator;
pub mod error;
pub mod marketing_validator;
pub mod report;
pub mod traits;

// 重新導出常用類型
pub use business_validator::BusinessValidator;
pub use error::{ValidationError, ValidationResult};
pub use marketing_validator::MarketingValidator;
pub use report::{IngestionReport, ReportFormatter};
pub use traits::Validator;
