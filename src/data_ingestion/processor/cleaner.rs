//! 行銷平台原始匯出的清理
//!
//! 讀取 `<Platform>.csv`，將日期正規化為 ISO 格式並標上 `platform` 欄位，
//! 輸出 `<Platform>_clean.csv` 供儀表板載入。

use super::csv_io::schema::{normalize_header, ColumnName};
use super::csv_io::{CsvError, CsvParser, CsvResult};
use crate::domain_types::Platform;
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use std::path::{Path, PathBuf};
use tracing::info;

/// 單一平台的清理結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanSummary {
    pub platform: Platform,
    pub rows: usize,
    pub output: PathBuf,
}

/// 平台檔案清理器
#[derive(Debug, Clone, Default)]
pub struct PlatformCleaner {
    parser: CsvParser,
}

impl PlatformCleaner {
    pub fn new(parser: CsvParser) -> Self {
        Self { parser }
    }

    /// 清理目錄中所有平台的原始檔案，各平台結果獨立回報
    pub fn clean_dir(&self, dir: impl AsRef<Path>) -> Vec<(Platform, CsvResult<CleanSummary>)> {
        let dir = dir.as_ref();
        Platform::all()
            .into_iter()
            .map(|platform| {
                let input = dir.join(platform.raw_file_name());
                let output = dir.join(platform.clean_file_name());
                (platform, self.clean_file(&input, &output, platform))
            })
            .collect()
    }

    /// 清理單一檔案
    pub fn clean_file(&self, input: &Path, output: &Path, platform: Platform) -> CsvResult<CleanSummary> {
        if !input.exists() {
            return Err(CsvError::FileNotFound(input.to_path_buf()));
        }

        let source = input.display().to_string();
        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_path(input)?;

        let headers = reader.headers()?.clone();
        let normalized: Vec<String> = headers.iter().map(normalize_header).collect();
        let date_idx = normalized
            .iter()
            .position(|h| h == ColumnName::DATE)
            .ok_or_else(|| CsvError::MissingColumn {
                file: source.clone(),
                column: ColumnName::DATE.to_string(),
            })?;
        let platform_idx = normalized.iter().position(|h| h == ColumnName::PLATFORM);

        let mut out_headers = headers.clone();
        if platform_idx.is_none() {
            out_headers.push_field(ColumnName::PLATFORM);
        }

        let mut writer = WriterBuilder::new().from_path(output)?;
        writer.write_record(&out_headers)?;

        let mut rows = 0;
        for result in reader.records() {
            let record = result?;
            let line = record.position().map(|p| p.line() as usize).unwrap_or(rows + 2);

            let raw_date = record.get(date_idx).unwrap_or("");
            let date = self.parser.parse_date_str(raw_date).ok_or_else(|| CsvError::ParseError {
                file: source.clone(),
                line,
                column: ColumnName::DATE.to_string(),
                value: raw_date.to_string(),
                reason: "無法解析的日期格式".to_string(),
            })?;

            let mut cleaned = StringRecord::new();
            for (idx, field) in record.iter().enumerate() {
                if idx == date_idx {
                    cleaned.push_field(&date.format("%Y-%m-%d").to_string());
                } else if Some(idx) == platform_idx {
                    cleaned.push_field(platform.name());
                } else {
                    cleaned.push_field(field);
                }
            }
            if platform_idx.is_none() {
                cleaned.push_field(platform.name());
            }

            writer.write_record(&cleaned)?;
            rows += 1;
        }
        writer.flush()?;

        info!("已清理 {} 筆 {} 記錄 → {}", rows, platform, output.display());

        Ok(CleanSummary {
            platform,
            rows,
            output: output.to_path_buf(),
        })
    }
}
