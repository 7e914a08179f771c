//! CSV 檔案讀取器

use super::error::{CsvError, CsvResult};
use super::schema::{ColumnIndex, Schema};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// CSV 讀取器配置
#[derive(Debug, Clone)]
pub struct CsvReaderConfig {
    /// 分隔符
    pub separator: u8,
    /// 是否去除欄位前後空白
    pub trim: bool,
    /// 要讀取的行數（None 表示全部）
    pub n_rows: Option<usize>,
}

impl Default for CsvReaderConfig {
    fn default() -> Self {
        Self {
            separator: b',',
            trim: true,
            n_rows: None,
        }
    }
}

/// 尚未轉型的資料列
#[derive(Debug, Clone)]
pub struct RawRow {
    /// 原始檔案中的行號（標題為第 1 行）
    pub line: usize,
    pub record: StringRecord,
}

/// 已通過欄位檢查、尚未轉型的表格
#[derive(Debug, Clone)]
pub struct RawTable {
    pub source: String,
    pub columns: ColumnIndex,
    pub rows: Vec<RawRow>,
}

impl RawTable {
    /// 取得指定標準欄位的值，欄位不存在或該行較短時回傳空字串
    pub fn field<'r>(&self, row: &'r RawRow, column: &str) -> &'r str {
        self.columns
            .get(column)
            .and_then(|idx| row.record.get(idx))
            .unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// CSV 檔案讀取器
#[derive(Debug, Clone, Default)]
pub struct CsvReader {
    config: CsvReaderConfig,
}

impl CsvReader {
    /// 創建新的 CSV 讀取器
    pub fn new(config: CsvReaderConfig) -> Self {
        Self { config }
    }

    /// 設定分隔符
    pub fn with_separator(mut self, separator: u8) -> Self {
        self.config.separator = separator;
        self
    }

    /// 設定要讀取的行數
    pub fn with_n_rows(mut self, n_rows: Option<usize>) -> Self {
        self.config.n_rows = n_rows;
        self
    }

    /// 從檔案路徑讀取 CSV
    pub fn read_file<P: AsRef<Path>>(&self, path: P, schema: &Schema) -> CsvResult<RawTable> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(CsvError::FileNotFound(path.to_path_buf()));
        }

        let source = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let file = File::open(path)?;
        self.read_from(&source, file, schema)
    }

    /// 從字串讀取 CSV
    pub fn read_string(&self, source: &str, data: &str, schema: &Schema) -> CsvResult<RawTable> {
        self.read_from(source, data.as_bytes(), schema)
    }

    fn read_from<R: Read>(&self, source: &str, input: R, schema: &Schema) -> CsvResult<RawTable> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(self.config.separator)
            .trim(if self.config.trim { Trim::All } else { Trim::None })
            .flexible(true)
            .from_reader(input);

        let headers = reader.headers()?.clone();
        let columns = schema.resolve(source, headers.iter())?;

        let mut rows = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            if self.config.n_rows.is_some_and(|limit| rows.len() >= limit) {
                break;
            }

            let record = result?;
            if record.iter().all(|field| field.is_empty()) {
                continue;
            }

            let line = record
                .position()
                .map(|pos| pos.line() as usize)
                .unwrap_or(idx + 2);
            rows.push(RawRow { line, record });
        }

        debug!("讀取 {} 完成，共 {} 行", source, rows.len());

        Ok(RawTable {
            source: source.to_string(),
            columns,
            rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_ingestion::processor::csv_io::schema::ColumnName;
    use assert_matches::assert_matches;

    const BUSINESS_CSV: &str = "date,orders,new_orders,new_customers,total_revenue,gross_profit,cogs
2024-01-01,100,30,25,10000,4000,6000
2024-01-02,80,20,18,8000,3000,5000
";

    #[test]
    fn test_csv_reader_config_default() {
        let config = CsvReaderConfig::default();
        assert_eq!(config.separator, b',');
        assert!(config.trim);
        assert_eq!(config.n_rows, None);
    }

    #[test]
    fn test_read_csv_string() {
        let table = CsvReader::default()
            .read_string("business.csv", BUSINESS_CSV, &Schema::BUSINESS)
            .unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].line, 2);
        assert_eq!(table.field(&table.rows[1], ColumnName::TOTAL_REVENUE), "8000");
    }

    #[test]
    fn test_read_csv_with_custom_separator() {
        let data = "date;orders;new_orders;new_customers;total_revenue;gross_profit;cogs
2024-01-01;1;0;0;10;5;5
";
        let table = CsvReader::default()
            .with_separator(b';')
            .read_string("business.csv", data, &Schema::BUSINESS)
            .unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_blank_lines_skipped_and_n_rows() {
        let data = format!("{}\n,,,,,,\n2024-01-03,1,1,1,1,1,0\n", BUSINESS_CSV);
        let table = CsvReader::default()
            .read_string("business.csv", &data, &Schema::BUSINESS)
            .unwrap();
        assert_eq!(table.len(), 3);

        let limited = CsvReader::default()
            .with_n_rows(Some(1))
            .read_string("business.csv", BUSINESS_CSV, &Schema::BUSINESS)
            .unwrap();
        assert_eq!(limited.len(), 1);
    }

    #[test]
    fn test_read_missing_file() {
        let result = CsvReader::default().read_file("/nonexistent/business.csv", &Schema::BUSINESS);
        assert_matches!(result, Err(CsvError::FileNotFound(_)));
    }
}
