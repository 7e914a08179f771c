//! 資料匯入模組
//!
//! 讀取 CSV、轉換為強型別記錄、套用業務規則驗證，並產生匯入報告。

pub mod processor;
pub mod validator;

pub use processor::{
    CleanSummary, CsvError, CsvExporter, CsvReader, CsvResult, DataLoader, Loaded, MarketingLoad,
    PlatformCleaner, RowErrorPolicy,
};
pub use validator::{IngestionReport, ReportFormatter};
