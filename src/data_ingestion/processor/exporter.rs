//! CSV 匯出

use super::csv_io::CsvResult;
use csv::WriterBuilder;
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// 將可序列化的記錄寫成 CSV
pub struct CsvExporter;

impl CsvExporter {
    /// 寫入檔案，回傳寫入筆數
    pub fn write_file<T: Serialize>(path: impl AsRef<Path>, records: &[T]) -> CsvResult<usize> {
        let path = path.as_ref();
        let mut writer = WriterBuilder::new().from_path(path)?;
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;

        info!("已匯出 {} 筆記錄 → {}", records.len(), path.display());
        Ok(records.len())
    }
}
