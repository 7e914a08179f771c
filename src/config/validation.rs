//! 配置值檢查

use thiserror::Error;

/// 配置驗證錯誤
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{0} 不可為空")]
    Empty(&'static str),

    #[error("{field} = {value} 不在 {min}..={max} 內")]
    OutOfRange {
        field: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },

    #[error("{field} = {value} 不是有效選項（{expected}）")]
    UnknownOption {
        field: &'static str,
        value: String,
        expected: String,
    },

    #[error("ingestion.delimiter 必須是可見的 ASCII 字元: {0:?}")]
    Delimiter(char),

    #[error("設定 log.directory 時 log.file_prefix 不可為空")]
    MissingLogPrefix,
}

/// 可自我驗證的配置區段
pub trait Validator {
    fn validate(&self) -> Result<(), ValidationError>;
}

pub(crate) fn require_text(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty(field));
    }
    Ok(())
}

pub(crate) fn require_range(value: u64, min: u64, max: u64, field: &'static str) -> Result<(), ValidationError> {
    if !(min..=max).contains(&value) {
        return Err(ValidationError::OutOfRange { field, value, min, max });
    }
    Ok(())
}

/// 不分大小寫比對
pub(crate) fn require_option(value: &str, options: &[&str], field: &'static str) -> Result<(), ValidationError> {
    if !options.iter().any(|o| o.eq_ignore_ascii_case(value.trim())) {
        return Err(ValidationError::UnknownOption {
            field,
            value: value.to_string(),
            expected: options.join("|"),
        });
    }
    Ok(())
}

/// CSV 分隔符只接受單一位元組，Tab 例外允許
pub(crate) fn require_delimiter(value: char) -> Result<(), ValidationError> {
    if !value.is_ascii() || (value.is_ascii_control() && value != '\t') {
        return Err(ValidationError::Delimiter(value));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_require_range() {
        assert!(require_range(40, 10, 200, "dashboard.chart_width").is_ok());
        assert!(require_range(200, 10, 200, "dashboard.chart_width").is_ok());
        assert_eq!(
            require_range(500, 10, 200, "dashboard.chart_width"),
            Err(ValidationError::OutOfRange {
                field: "dashboard.chart_width",
                value: 500,
                min: 10,
                max: 200,
            })
        );
    }

    #[test]
    fn test_require_option_ignores_case() {
        assert!(require_option("JSON", &["pretty", "json"], "log.format").is_ok());
        let err = require_option("xml", &["pretty", "json"], "log.format").unwrap_err();
        assert_eq!(err.to_string(), "log.format = xml 不是有效選項（pretty|json）");
    }

    #[test]
    fn test_require_text() {
        assert!(require_text("data", "data.directory").is_ok());
        assert_eq!(require_text("   ", "data.directory"), Err(ValidationError::Empty("data.directory")));
    }

    #[rstest]
    #[case(',', true)]
    #[case(';', true)]
    #[case('\t', true)]
    #[case('\n', false)]
    #[case('，', false)]
    fn test_require_delimiter(#[case] value: char, #[case] ok: bool) {
        assert_eq!(require_delimiter(value).is_ok(), ok);
    }
}
