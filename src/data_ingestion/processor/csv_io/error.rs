//! CSV 處理錯誤定義

use crate::data_ingestion::validator::ValidationError;
use std::path::PathBuf;
use thiserror::Error;

/// CSV 處理錯誤類型
#[derive(Error, Debug)]
pub enum CsvError {
    #[error("找不到檔案: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("檔案讀取錯誤: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV 讀取錯誤: {0}")]
    ReaderError(#[from] csv::Error),

    #[error("{file} 缺少必要欄位: {column}")]
    MissingColumn { file: String, column: String },

    #[error("{file} 第 {line} 行解析錯誤: 欄位 {column}, 值 '{value}', 原因: {reason}")]
    ParseError {
        file: String,
        line: usize,
        column: String,
        value: String,
        reason: String,
    },

    #[error("{file} 第 {line} 行驗證失敗: {error}")]
    InvalidRow {
        file: String,
        line: usize,
        error: ValidationError,
    },
}

impl CsvError {
    /// 錯誤類型名稱，用於報告統計
    pub fn kind(&self) -> &'static str {
        match self {
            CsvError::FileNotFound(_) => "FileNotFound",
            CsvError::IoError(_) => "Io",
            CsvError::ReaderError(_) => "Reader",
            CsvError::MissingColumn { .. } => "SchemaError",
            CsvError::ParseError { .. } => "ParseError",
            CsvError::InvalidRow { error, .. } => error.kind(),
        }
    }

    /// 是否為單行層級的錯誤（可依策略丟棄該行）
    pub fn is_row_level(&self) -> bool {
        matches!(self, CsvError::ParseError { .. } | CsvError::InvalidRow { .. })
    }
}

/// CSV 處理結果類型
pub type CsvResult<T> = Result<T, CsvError>;
