//! 資料載入器
//!
//! 串接讀取、解析與驗證三個步驟，並依 `RowErrorPolicy` 處理單行錯誤：
//! `Skip` 丟棄該行並記錄在報告中，`Fail` 以第一個錯誤中止整個檔案。
//! 欄位缺漏與檔案不存在永遠是整個檔案層級的錯誤。

use super::csv_io::{CsvError, CsvParser, CsvReader, CsvResult, RawRow, RawTable, Schema};
use crate::data_ingestion::validator::{
    BusinessValidator, IngestionReport, MarketingValidator, Validator,
};
use crate::domain_types::{BusinessRecord, MarketingRecord, Platform};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// 單行錯誤的處理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowErrorPolicy {
    /// 丟棄錯誤行並計數
    #[default]
    Skip,
    /// 任一行錯誤即中止整個檔案
    Fail,
}

/// 單一檔案的載入結果
#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub records: Vec<T>,
    pub report: IngestionReport,
}

/// 三個行銷平台的載入結果
#[derive(Debug, Default)]
pub struct MarketingLoad {
    pub records: Vec<MarketingRecord>,
    pub reports: Vec<IngestionReport>,
    /// 無法載入的平台與原因
    pub failures: Vec<(Platform, CsvError)>,
}

/// 資料載入器
#[derive(Debug, Clone, Default)]
pub struct DataLoader {
    reader: CsvReader,
    parser: CsvParser,
    policy: RowErrorPolicy,
}

impl DataLoader {
    pub fn new(reader: CsvReader, parser: CsvParser, policy: RowErrorPolicy) -> Self {
        Self { reader, parser, policy }
    }

    pub fn with_policy(mut self, policy: RowErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> RowErrorPolicy {
        self.policy
    }

    /// 載入 `business.csv`
    pub fn load_business(&self, path: impl AsRef<Path>) -> CsvResult<Loaded<BusinessRecord>> {
        let table = self.reader.read_file(path, &Schema::BUSINESS)?;
        self.load_business_table(&table)
    }

    /// 從已讀取的表格載入營運數據
    pub fn load_business_table(&self, table: &RawTable) -> CsvResult<Loaded<BusinessRecord>> {
        let validator = BusinessValidator::new();
        let mut loaded = self.collect(table, &validator, |row| self.parser.parse_business_row(table, row))?;
        loaded.records.sort_by_key(|r| r.date);
        Ok(loaded)
    }

    /// 載入單一平台檔案
    pub fn load_marketing_file(
        &self,
        path: impl AsRef<Path>,
        platform: Platform,
    ) -> CsvResult<Loaded<MarketingRecord>> {
        let table = self.reader.read_file(path, &Schema::MARKETING)?;
        self.load_marketing_table(&table, platform)
    }

    /// 從已讀取的表格載入行銷數據
    pub fn load_marketing_table(
        &self,
        table: &RawTable,
        platform: Platform,
    ) -> CsvResult<Loaded<MarketingRecord>> {
        let validator = MarketingValidator::new();
        self.collect(table, &validator, |row| {
            self.parser.parse_marketing_row(table, row, Some(platform))
        })
    }

    /// 載入目錄中三個平台的 `<Platform>_clean.csv`
    ///
    /// 單一平台失敗不影響其他平台，失敗原因保留在 `failures` 中。
    pub fn load_marketing_dir(&self, dir: impl AsRef<Path>) -> MarketingLoad {
        let dir = dir.as_ref();
        let mut load = MarketingLoad::default();

        for platform in Platform::all() {
            let path = dir.join(platform.clean_file_name());
            match self.load_marketing_file(&path, platform) {
                Ok(loaded) => {
                    load.records.extend(loaded.records);
                    load.reports.push(loaded.report);
                }
                Err(e) => {
                    warn!("無法載入 {} 數據: {}", platform, e);
                    load.failures.push((platform, e));
                }
            }
        }

        load.records.sort_by(|a, b| a.date.cmp(&b.date).then(a.platform.cmp(&b.platform)));
        load
    }

    fn collect<T, V, F>(&self, table: &RawTable, validator: &V, parse: F) -> CsvResult<Loaded<T>>
    where
        V: Validator<Data = T>,
        F: Fn(&RawRow) -> CsvResult<T>,
    {
        let mut report = IngestionReport::new(&table.source);
        let mut records = Vec::with_capacity(table.len());

        for row in &table.rows {
            let outcome = parse(row).and_then(|record| {
                validator
                    .validate_record(&record)
                    .map(|_| record)
                    .map_err(|error| CsvError::InvalidRow {
                        file: table.source.clone(),
                        line: row.line,
                        error,
                    })
            });

            match outcome {
                Ok(record) => {
                    report.add_success();
                    records.push(record);
                }
                Err(e) if e.is_row_level() && self.policy == RowErrorPolicy::Skip => {
                    report.add_error(row.line, e.kind(), e.to_string());
                }
                Err(e) => return Err(e),
            }
        }

        let report = report.finish();
        if report.has_errors() {
            warn!(
                "{}: 丟棄 {} 筆無效記錄（共 {} 筆）",
                report.source, report.dropped_records, report.total_records
            );
        }
        info!("{}: 載入 {} 筆記錄", report.source, report.valid_records);

        Ok(Loaded { records, report })
    }
}
