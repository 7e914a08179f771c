use thiserror::Error;

/// 單筆記錄的驗證錯誤
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("數值超出範圍: {field} = {value}，最小值 {min}")]
    OutOfRange {
        field: String,
        value: String,
        min: String,
    },

    #[error("數據不一致: {description}")]
    InconsistentValue { description: String },

    #[error("無效的數值: {field} = {value}，{reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

impl ValidationError {
    /// 錯誤類型名稱，用於報告統計
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::OutOfRange { .. } => "OutOfRange",
            ValidationError::InconsistentValue { .. } => "InconsistentValue",
            ValidationError::InvalidValue { .. } => "InvalidValue",
        }
    }
}

pub type ValidationResult<T> = Result<T, ValidationError>;
