use super::error::{ValidationError, ValidationResult};

/// 數據驗證器特徵
pub trait Validator {
    type Data;

    /// 驗證單個數據項
    fn validate_record(&self, record: &Self::Data) -> ValidationResult<()>;
}

/// 檢查金額欄位為有限且非負
pub(crate) fn check_amount(field: &str, value: f64) -> ValidationResult<()> {
    if value.is_nan() || value.is_infinite() {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: "無效的數值（NaN 或無限大）".to_string(),
        });
    }

    if value < 0.0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            value: value.to_string(),
            min: "0".to_string(),
        });
    }

    Ok(())
}
