use crate::config::validation::{
    require_delimiter, require_option, require_range, require_text, ValidationError, Validator,
};
use crate::data_ingestion::RowErrorPolicy;
use crate::domain_types::{Baseline, Granularity};
use crate::presentation::OutputFormat;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 應用程序配置結構
///
/// 所有區段都有預設值，配置檔只需寫出要覆寫的項目。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    pub data: DataConfig,
    pub ingestion: IngestionConfig,
    pub dashboard: DashboardConfig,
    pub log: LogConfig,
}

impl Validator for ApplicationConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        self.data.validate()?;
        self.ingestion.validate()?;
        self.dashboard.validate()?;
        self.log.validate()?;

        Ok(())
    }
}

/// 資料來源配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// 存放 CSV 的目錄
    pub directory: String,
    /// 營運數據檔名
    pub business_file: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            directory: "data".to_string(),
            business_file: "business.csv".to_string(),
        }
    }
}

impl Validator for DataConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text(&self.directory, "data.directory")?;
        require_text(&self.business_file, "data.business_file")?;

        Ok(())
    }
}

impl DataConfig {
    pub fn directory_path(&self) -> PathBuf {
        PathBuf::from(&self.directory)
    }

    pub fn business_path(&self) -> PathBuf {
        self.directory_path().join(&self.business_file)
    }
}

/// 資料匯入配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestionConfig {
    /// 單行錯誤處理策略（skip / fail）
    pub on_row_error: RowErrorPolicy,
    /// 依序嘗試的日期格式
    pub date_formats: Vec<String>,
    /// 欄位分隔符
    pub delimiter: char,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            on_row_error: RowErrorPolicy::Skip,
            date_formats: crate::data_ingestion::processor::csv_io::parser::DEFAULT_DATE_FORMATS
                .iter()
                .map(|f| f.to_string())
                .collect(),
            delimiter: ',',
        }
    }
}

impl Validator for IngestionConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.date_formats.is_empty() {
            return Err(ValidationError::Empty("ingestion.date_formats"));
        }
        for format in &self.date_formats {
            require_text(format, "ingestion.date_formats")?;
        }
        require_delimiter(self.delimiter)?;

        Ok(())
    }
}

/// 儀表板預設值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub default_granularity: Granularity,
    pub default_baseline: Baseline,
    /// 預設顯示最近 N 天，未設定時顯示全部資料
    pub default_window_days: Option<u32>,
    /// 長條圖寬度（字元）
    pub chart_width: usize,
    pub output_format: OutputFormat,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_granularity: Granularity::Day,
            default_baseline: Baseline::PreviousPeriod,
            default_window_days: None,
            chart_width: 40,
            output_format: OutputFormat::Text,
        }
    }
}

impl Validator for DashboardConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        require_range(self.chart_width as u64, 10, 200, "dashboard.chart_width")?;
        if let Some(days) = self.default_window_days {
            require_range(u64::from(days), 1, 3660, "dashboard.default_window_days")?;
        }

        Ok(())
    }
}

/// 日誌配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub format: String,
    /// 設定時另外寫入每日輪替的日誌檔
    pub directory: Option<String>,
    pub file_prefix: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            directory: None,
            file_prefix: "bizdash.log".to_string(),
        }
    }
}

impl Validator for LogConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        require_option(&self.level, &["trace", "debug", "info", "warn", "error"], "log.level")?;
        require_option(&self.format, &["pretty", "json"], "log.format")?;

        if self.directory.is_some() && self.file_prefix.trim().is_empty() {
            return Err(ValidationError::MissingLogPrefix);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ApplicationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.data.business_path(), PathBuf::from("data").join("business.csv"));
        assert_eq!(config.ingestion.on_row_error, RowErrorPolicy::Skip);
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = ApplicationConfig::default();
        config.log.level = "verbose".to_string();
        assert!(matches!(config.validate(), Err(ValidationError::UnknownOption { field: "log.level", .. })));
    }

    #[test]
    fn test_chart_width_range() {
        let mut config = ApplicationConfig::default();
        config.dashboard.chart_width = 5;
        assert!(matches!(config.validate(), Err(ValidationError::OutOfRange { value: 5, .. })));
    }

    #[test]
    fn test_log_file_requires_prefix() {
        let mut config = ApplicationConfig::default();
        config.log.directory = Some("logs".to_string());
        config.log.file_prefix = " ".to_string();
        assert_eq!(config.validate(), Err(ValidationError::MissingLogPrefix));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ApplicationConfig =
            serde_json::from_str(r#"{"dashboard": {"default_granularity": "week"}}"#).unwrap();
        assert_eq!(config.dashboard.default_granularity, Granularity::Week);
        assert_eq!(config.dashboard.chart_width, 40);
        assert_eq!(config.data.directory, "data");
    }
}
