//! 描述性統計與成本結構
//!
//! 統計量以 Polars 表達式一次計算：樣本標準差（ddof = 1）、線性內插分位數，
//! 與 pandas `describe` 的輸出一致。

use crate::domain_types::{BusinessRecord, MetricValue};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// 統計量名稱，依輸出順序排列
const STATISTICS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

/// 單一數值欄位的描述性統計
///
/// 標準差為樣本標準差（n − 1），分位數以線性內插計算。
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DescriptiveStats {
    pub count: usize,
    pub mean: MetricValue,
    pub std: MetricValue,
    pub min: MetricValue,
    pub q25: MetricValue,
    pub median: MetricValue,
    pub q75: MetricValue,
    pub max: MetricValue,
}

fn stat_alias(column: &str, statistic: &str) -> String {
    format!("{}:{}", column, statistic)
}

/// 單一欄位的所有統計量表達式，依 [`STATISTICS`] 順序
fn stat_exprs(column: &str) -> Vec<Expr> {
    let exprs = [
        col(column).count(),
        col(column).mean(),
        col(column).std(1),
        col(column).min(),
        col(column).quantile(lit(0.25), QuantileMethod::Linear),
        col(column).median(),
        col(column).quantile(lit(0.75), QuantileMethod::Linear),
        col(column).max(),
    ];
    exprs
        .into_iter()
        .zip(STATISTICS)
        .map(|(expr, statistic)| expr.alias(stat_alias(column, statistic)))
        .collect()
}

// 單列結果中的一個值，null 與非有限值視為 N/A
fn scalar(df: &DataFrame, name: &str) -> PolarsResult<MetricValue> {
    let series = df.column(name)?.as_materialized_series().cast(&DataType::Float64)?;
    Ok(MetricValue::from(series.f64()?.get(0).filter(|v| v.is_finite())))
}

impl DescriptiveStats {
    pub fn from_values(values: &[f64]) -> PolarsResult<Self> {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() {
            return Ok(Self::default());
        }

        let df = DataFrame::new(vec![Column::from(Series::new("value".into(), finite))])?;
        let stats = df.lazy().select(stat_exprs("value")).collect()?;
        Self::read(&stats, "value")
    }

    /// 從 [`stat_exprs`] 的計算結果讀回
    fn read(stats: &DataFrame, column: &str) -> PolarsResult<Self> {
        let value = |statistic: &str| scalar(stats, &stat_alias(column, statistic));
        Ok(Self {
            count: value("count")?.value().map(|c| c as usize).unwrap_or_default(),
            mean: value("mean")?,
            std: value("std")?,
            min: value("min")?,
            q25: value("25%")?,
            median: value("50%")?,
            q75: value("75%")?,
            max: value("max")?,
        })
    }

    /// 依固定順序列出 (統計量名稱, 值)
    pub fn entries(&self) -> [(&'static str, MetricValue); 8] {
        [
            (STATISTICS[0], MetricValue::new(self.count as f64)),
            (STATISTICS[1], self.mean),
            (STATISTICS[2], self.std),
            (STATISTICS[3], self.min),
            (STATISTICS[4], self.q25),
            (STATISTICS[5], self.median),
            (STATISTICS[6], self.q75),
            (STATISTICS[7], self.max),
        ]
    }
}

/// 欄位名稱與其統計
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    pub column: String,
    pub stats: DescriptiveStats,
}

/// 營運數據各數值欄位的統計摘要
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BusinessSummary {
    pub columns: Vec<ColumnStats>,
}

/// 匯出用的一列統計值
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub statistic: &'static str,
    pub orders: MetricValue,
    pub new_orders: MetricValue,
    pub new_customers: MetricValue,
    pub total_revenue: MetricValue,
    pub gross_profit: MetricValue,
    pub cogs: MetricValue,
}

const SUMMARY_COLUMNS: [&str; 6] = [
    "orders",
    "new_orders",
    "new_customers",
    "total_revenue",
    "gross_profit",
    "cogs",
];

/// 營運記錄的數值欄位
fn summary_frame(records: &[BusinessRecord]) -> PolarsResult<DataFrame> {
    let extractors: [fn(&BusinessRecord) -> f64; 6] = [
        |r| r.order_count as f64,
        |r| r.new_order_count as f64,
        |r| r.new_customers as f64,
        |r| r.total_revenue,
        |r| r.gross_profit,
        |r| r.cogs,
    ];

    let columns = SUMMARY_COLUMNS
        .iter()
        .zip(extractors)
        .map(|(name, extract)| {
            let values: Vec<f64> = records.iter().map(extract).collect();
            Column::from(Series::new((*name).into(), values))
        })
        .collect();
    DataFrame::new(columns)
}

impl BusinessSummary {
    pub fn describe(records: &[BusinessRecord]) -> PolarsResult<Self> {
        if records.is_empty() {
            let columns = SUMMARY_COLUMNS
                .iter()
                .map(|name| ColumnStats {
                    column: name.to_string(),
                    stats: DescriptiveStats::default(),
                })
                .collect();
            return Ok(Self { columns });
        }

        let exprs: Vec<Expr> = SUMMARY_COLUMNS.iter().flat_map(|name| stat_exprs(name)).collect();
        let stats = summary_frame(records)?.lazy().select(exprs).collect()?;

        let columns = SUMMARY_COLUMNS
            .iter()
            .map(|name| -> PolarsResult<ColumnStats> {
                Ok(ColumnStats {
                    column: name.to_string(),
                    stats: DescriptiveStats::read(&stats, name)?,
                })
            })
            .collect::<PolarsResult<Vec<_>>>()?;

        Ok(Self { columns })
    }

    pub fn column(&self, name: &str) -> Option<&DescriptiveStats> {
        self.columns.iter().find(|c| c.column == name).map(|c| &c.stats)
    }

    /// 轉為「每個統計量一列」的匯出格式
    pub fn rows(&self) -> Vec<SummaryRow> {
        let per_column: Vec<[(&'static str, MetricValue); 8]> =
            self.columns.iter().map(|c| c.stats.entries()).collect();
        let value = |col: usize, idx: usize| {
            per_column
                .get(col)
                .map(|entries| entries[idx].1)
                .unwrap_or(MetricValue::NA)
        };

        DescriptiveStats::default()
            .entries()
            .into_iter()
            .enumerate()
            .map(|(idx, (statistic, _))| SummaryRow {
                statistic,
                orders: value(0, idx),
                new_orders: value(1, idx),
                new_customers: value(2, idx),
                total_revenue: value(3, idx),
                gross_profit: value(4, idx),
                cogs: value(5, idx),
            })
            .collect()
    }
}

/// 平均每日 COGS 與平均每日毛利的組成
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub average_cogs: MetricValue,
    pub average_gross_profit: MetricValue,
    pub cogs_share: MetricValue,
    pub gross_profit_share: MetricValue,
}

impl CostBreakdown {
    /// 以統計摘要中 COGS 與毛利的平均值計算
    pub fn from_summary(summary: &BusinessSummary) -> Self {
        let mean = |column: &str| summary.column(column).map(|s| s.mean).unwrap_or(MetricValue::NA);
        let average_cogs = mean("cogs");
        let average_gross_profit = mean("gross_profit");

        let (cogs_share, gross_profit_share) = match (average_cogs.value(), average_gross_profit.value()) {
            (Some(c), Some(p)) => (MetricValue::percentage(c, c + p), MetricValue::percentage(p, c + p)),
            _ => (MetricValue::NA, MetricValue::NA),
        };

        Self {
            average_cogs,
            average_gross_profit,
            cogs_share,
            gross_profit_share,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn close(value: MetricValue, expected: f64) -> bool {
        value.value().is_some_and(|v| (v - expected).abs() < 1e-9)
    }

    fn record(day: u32, revenue: f64) -> BusinessRecord {
        BusinessRecord {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            order_count: day as u64,
            new_order_count: 0,
            new_customers: 1,
            total_revenue: revenue,
            gross_profit: revenue * 0.25,
            cogs: revenue * 0.75,
        }
    }

    #[test]
    fn test_describe_values() {
        let stats = DescriptiveStats::from_values(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(stats.count, 4);
        assert!(close(stats.mean, 2.5));
        assert!(close(stats.std, 1.2909944487358056));
        assert!(close(stats.q25, 1.75));
        assert!(close(stats.median, 2.5));
        assert!(close(stats.q75, 3.25));
        assert!(close(stats.max, 4.0));
    }

    #[test]
    fn test_single_value_std_is_na() {
        let stats = DescriptiveStats::from_values(&[5.0]).unwrap();
        assert_eq!(stats.std, MetricValue::NA);
        assert!(close(stats.median, 5.0));
    }

    #[test]
    fn test_empty_is_na() {
        let stats = DescriptiveStats::from_values(&[]).unwrap();
        assert_eq!(stats.count, 0);
        assert_eq!(stats.mean.to_string(), "N/A");
    }

    #[test]
    fn test_non_finite_values_ignored() {
        let stats = DescriptiveStats::from_values(&[f64::NAN, 2.0, f64::INFINITY, 4.0]).unwrap();
        assert_eq!(stats.count, 2);
        assert!(close(stats.mean, 3.0));
        assert!(close(stats.min, 2.0));
    }

    #[test]
    fn test_entries_order() {
        let stats = DescriptiveStats::from_values(&[1.0, 3.0]).unwrap();
        let names: Vec<&str> = stats.entries().iter().map(|(name, _)| *name).collect();
        assert_eq!(names, STATISTICS.to_vec());
        assert!(close(stats.entries()[0].1, 2.0));
    }

    #[test]
    fn test_business_summary_rows() {
        let summary = BusinessSummary::describe(&[record(1, 100.0), record(2, 300.0)]).unwrap();
        assert!(close(summary.column("total_revenue").unwrap().mean, 200.0));

        let rows = summary.rows();
        assert_eq!(rows.len(), 8);
        assert_eq!(rows[0].statistic, "count");
        assert!(close(rows[0].cogs, 2.0));
        assert_eq!(rows[7].statistic, "max");
        assert!(close(rows[7].orders, 2.0));
    }

    #[test]
    fn test_cost_breakdown() {
        let summary = BusinessSummary::describe(&[record(1, 100.0), record(2, 300.0)]).unwrap();
        let breakdown = CostBreakdown::from_summary(&summary);
        assert!(close(breakdown.average_cogs, 150.0));
        assert!(close(breakdown.average_gross_profit, 50.0));
        assert!(close(breakdown.cogs_share, 75.0));
        assert!(close(breakdown.gross_profit_share, 25.0));

        let empty = BusinessSummary::describe(&[]).unwrap();
        assert_eq!(empty.columns.len(), 6);
        assert_eq!(CostBreakdown::from_summary(&empty).cogs_share, MetricValue::NA);
    }
}
