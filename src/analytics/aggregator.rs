//! 依粒度將記錄分桶加總
//!
//! 記錄先轉成 DataFrame，篩出區間內的列後以 `group_by_dynamic` 分桶加總。
//! 輸出依 `period_start` 遞增排序，區間內沒有資料的分桶不會輸出。

use super::frame::{self, DATE};
use crate::domain_types::{AggregatedPeriod, DateRange, Granularity, Measured, Totals};
use polars::prelude::*;
use std::collections::BTreeMap;

/// 聚合設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregationConfig {
    pub range: DateRange,
    pub granularity: Granularity,
}

impl AggregationConfig {
    pub fn new(range: DateRange, granularity: Granularity) -> Self {
        Self { range, granularity }
    }
}

/// 提供聚合核心功能的結構
pub struct Aggregator;

impl Aggregator {
    /// 依粒度分桶並加總所有可加總欄位，日期欄須為 `Date` 型別
    pub fn resample_lazy<T: Totals>(lf: LazyFrame, granularity: Granularity) -> LazyFrame {
        lf.sort_by_exprs([col(DATE)], SortMultipleOptions::default())
            .group_by_dynamic(
                col(DATE),
                Vec::<Expr>::new(),
                DynamicGroupOptions {
                    label: Label::Left,
                    start_by: granularity.start_by(),
                    index_column: DATE.into(),
                    every: granularity.to_duration(),
                    period: granularity.to_duration(),
                    offset: Duration::parse("0d"),
                    include_boundaries: false,
                    closed_window: ClosedWindow::Left,
                },
            )
            .agg(frame::sum_exprs::<T>())
    }

    /// 將區間內的記錄依粒度分桶
    pub fn aggregate<R: Measured>(
        records: &[R],
        config: &AggregationConfig,
    ) -> PolarsResult<Vec<AggregatedPeriod<R::Totals>>> {
        if !records.iter().any(|r| config.range.contains(r.date())) {
            return Ok(Vec::new());
        }

        let lf = frame::lazy_in_range(records, &config.range)?;
        let df = Self::resample_lazy::<R::Totals>(lf, config.granularity).collect()?;

        let starts = frame::read_dates(&df)?;
        let totals = frame::read_totals::<R::Totals>(&df)?;
        Ok(starts
            .into_iter()
            .zip(totals)
            .map(|(period_start, totals)| AggregatedPeriod {
                period_start,
                granularity: config.granularity,
                totals,
            })
            .collect())
    }

    /// 先依鍵分組，再對每組分桶
    pub fn aggregate_by<R, K, F>(
        records: &[R],
        config: &AggregationConfig,
        key: F,
    ) -> PolarsResult<BTreeMap<K, Vec<AggregatedPeriod<R::Totals>>>>
    where
        R: Measured + Clone,
        K: Ord,
        F: Fn(&R) -> K,
    {
        Self::partition(records, &config.range, key)
            .into_iter()
            .map(|(k, group)| -> PolarsResult<_> { Ok((k, Self::aggregate(&group, config)?)) })
            .collect()
    }

    /// 區間內所有記錄的總計
    pub fn total<R: Measured>(records: &[R], range: &DateRange) -> PolarsResult<R::Totals> {
        if !records.iter().any(|r| range.contains(r.date())) {
            return Ok(<R::Totals as Default>::default());
        }

        let df = frame::lazy_in_range(records, range)?
            .select(frame::sum_exprs::<R::Totals>())
            .collect()?;
        Ok(frame::read_totals::<R::Totals>(&df)?.into_iter().next().unwrap_or_default())
    }

    /// 依鍵分組的區間總計
    pub fn total_by<R, K, F>(records: &[R], range: &DateRange, key: F) -> PolarsResult<BTreeMap<K, R::Totals>>
    where
        R: Measured + Clone,
        K: Ord,
        F: Fn(&R) -> K,
    {
        Self::partition(records, range, key)
            .into_iter()
            .map(|(k, group)| -> PolarsResult<_> { Ok((k, Self::total(&group, range)?)) })
            .collect()
    }

    fn partition<R, K, F>(records: &[R], range: &DateRange, key: F) -> BTreeMap<K, Vec<R>>
    where
        R: Measured + Clone,
        K: Ord,
        F: Fn(&R) -> K,
    {
        let mut groups: BTreeMap<K, Vec<R>> = BTreeMap::new();
        for record in records.iter().filter(|r| range.contains(r.date())) {
            groups.entry(key(record)).or_default().push(record.clone());
        }
        groups
    }
}
