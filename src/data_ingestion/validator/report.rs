use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 單一資料來源的載入報告
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionReport {
    /// 資料來源名稱（通常為檔名）
    pub source: String,
    /// 開始時間
    pub start_time: DateTime<Utc>,
    /// 結束時間
    pub end_time: DateTime<Utc>,
    /// 總記錄數
    pub total_records: usize,
    /// 有效記錄數
    pub valid_records: usize,
    /// 被丟棄的記錄數
    pub dropped_records: usize,
    /// 錯誤摘要
    pub error_summary: ErrorSummary,
    /// 詳細錯誤
    pub detailed_errors: Vec<DetailedError>,
}

impl IngestionReport {
    /// 創建新的載入報告
    pub fn new(source: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            source: source.into(),
            start_time: now,
            end_time: now,
            total_records: 0,
            valid_records: 0,
            dropped_records: 0,
            error_summary: ErrorSummary::default(),
            detailed_errors: Vec::new(),
        }
    }

    /// 完成報告
    pub fn finish(mut self) -> Self {
        self.end_time = Utc::now();
        self
    }

    /// 添加成功記錄
    pub fn add_success(&mut self) {
        self.total_records += 1;
        self.valid_records += 1;
    }

    /// 添加被丟棄的記錄
    pub fn add_error(&mut self, line: usize, error_type: &str, message: impl Into<String>) {
        self.total_records += 1;
        self.dropped_records += 1;
        self.error_summary.add_error(error_type);
        self.detailed_errors.push(DetailedError {
            line,
            error_type: error_type.to_string(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.dropped_records > 0
    }

    /// 獲取成功率
    pub fn success_rate(&self) -> f64 {
        if self.total_records == 0 {
            0.0
        } else {
            self.valid_records as f64 / self.total_records as f64
        }
    }

    /// 獲取處理時間（秒）
    pub fn processing_time(&self) -> f64 {
        (self.end_time - self.start_time).num_milliseconds() as f64 / 1000.0
    }
}

/// 錯誤摘要
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorSummary {
    /// 各類型錯誤計數
    pub error_counts: BTreeMap<String, usize>,
}

impl ErrorSummary {
    pub fn add_error(&mut self, error_type: &str) {
        *self.error_counts.entry(error_type.to_string()).or_insert(0) += 1;
    }

    /// 依次數排序的錯誤類型（最多 5 項）
    pub fn top_errors(&self) -> Vec<(String, usize)> {
        let mut counts: Vec<(String, usize)> = self
            .error_counts
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts.into_iter().take(5).collect()
    }
}

/// 詳細錯誤資訊
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedError {
    /// 行號
    pub line: usize,
    /// 錯誤類型
    pub error_type: String,
    /// 錯誤訊息
    pub message: String,
}

/// 報告格式化器
pub struct ReportFormatter;

impl ReportFormatter {
    /// 格式化為人類可讀的文字
    pub fn format_text(report: &IngestionReport) -> String {
        let mut output = String::new();

        output.push_str(&format!("=== 載入報告: {} ===\n", report.source));
        output.push_str(&format!("處理時間: {:.2} 秒\n", report.processing_time()));
        output.push_str(&format!("  總記錄數: {}\n", report.total_records));
        output.push_str(&format!(
            "  有效記錄: {} ({:.2}%)\n",
            report.valid_records,
            report.success_rate() * 100.0
        ));
        output.push_str(&format!("  丟棄記錄: {}\n", report.dropped_records));

        let top = report.error_summary.top_errors();
        if !top.is_empty() {
            output.push_str("最常見的錯誤:\n");
            for (error_type, count) in &top {
                output.push_str(&format!("  {}: {} 次\n", error_type, count));
            }
        }

        for error in report.detailed_errors.iter().take(10) {
            output.push_str(&format!("  第 {} 行 [{}] {}\n", error.line, error.error_type, error.message));
        }
        if report.detailed_errors.len() > 10 {
            output.push_str(&format!("  ...另有 {} 筆錯誤\n", report.detailed_errors.len() - 10));
        }

        output
    }

    /// 格式化為JSON
    pub fn format_json(report: &IngestionReport) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_counts() {
        let mut report = IngestionReport::new("business.csv");
        report.add_success();
        report.add_success();
        report.add_error(4, "Parse", "bad date");
        let report = report.finish();

        assert_eq!(report.total_records, 3);
        assert_eq!(report.valid_records, 2);
        assert_eq!(report.dropped_records, 1);
        assert!(report.has_errors());
        assert_eq!(report.error_summary.top_errors(), vec![("Parse".to_string(), 1)]);
    }

    #[test]
    fn test_success_rate_empty() {
        assert_eq!(IngestionReport::new("x").success_rate(), 0.0);
    }

    #[test]
    fn test_format_text_mentions_line() {
        let mut report = IngestionReport::new("Google_clean.csv");
        report.add_error(7, "OutOfRange", "spend = -3");
        let text = ReportFormatter::format_text(&report);
        assert!(text.contains("Google_clean.csv"));
        assert!(text.contains("第 7 行"));
    }

    #[test]
    fn test_format_json() {
        let report = IngestionReport::new("business.csv");
        let json = ReportFormatter::format_json(&report).unwrap();
        assert!(json.contains("\"source\": \"business.csv\""));
    }
}
