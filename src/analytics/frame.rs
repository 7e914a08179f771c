//! 記錄與 Polars DataFrame 之間的轉換
//!
//! 日期欄以 Unix epoch 起算的天數（Int32）建立，再轉成 `Date` 型別。
//! 整數欄位使用 UInt64，金額欄位使用 Float64，欄位順序由 [`Totals`] 決定。

use crate::domain_types::{DateRange, Measured, Totals};
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;

/// 日期欄位名稱
pub const DATE: &str = "date";

// 1970-01-01 距公元元年的天數
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

pub fn epoch_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

pub fn date_from_epoch_days(days: i32) -> PolarsResult<NaiveDate> {
    days.checked_add(UNIX_EPOCH_DAYS_FROM_CE)
        .and_then(NaiveDate::from_num_days_from_ce_opt)
        .ok_or_else(|| PolarsError::ComputeError(format!("日期超出範圍: {}", days).into()))
}

/// 將記錄轉成 DataFrame，每筆記錄一列
pub fn to_frame<R: Measured>(records: &[R]) -> PolarsResult<DataFrame> {
    let count_names = <R::Totals as Totals>::COUNT_COLUMNS;
    let amount_names = <R::Totals as Totals>::AMOUNT_COLUMNS;

    let mut dates = Vec::with_capacity(records.len());
    let mut counts: Vec<Vec<u64>> = vec![Vec::with_capacity(records.len()); count_names.len()];
    let mut amounts: Vec<Vec<f64>> = vec![Vec::with_capacity(records.len()); amount_names.len()];

    for record in records {
        dates.push(epoch_days(record.date()));
        let totals = record.measure();
        for (column, value) in counts.iter_mut().zip(totals.counts()) {
            column.push(value);
        }
        for (column, value) in amounts.iter_mut().zip(totals.amounts()) {
            column.push(value);
        }
    }

    let mut columns = Vec::with_capacity(1 + count_names.len() + amount_names.len());
    columns.push(Column::from(Series::new(DATE.into(), dates)));
    columns.extend(
        count_names
            .iter()
            .zip(counts)
            .map(|(name, values)| Column::from(Series::new((*name).into(), values))),
    );
    columns.extend(
        amount_names
            .iter()
            .zip(amounts)
            .map(|(name, values)| Column::from(Series::new((*name).into(), values))),
    );

    DataFrame::new(columns)
}

/// 日期落在區間內（含頭尾）的篩選條件，作用在轉型前的天數欄
pub fn in_range(range: &DateRange) -> Expr {
    col(DATE)
        .gt_eq(lit(epoch_days(range.start())))
        .and(col(DATE).lt_eq(lit(epoch_days(range.end()))))
}

/// 區間內的記錄，日期欄轉為 `Date`
pub fn lazy_in_range<R: Measured>(records: &[R], range: &DateRange) -> PolarsResult<LazyFrame> {
    Ok(to_frame(records)?
        .lazy()
        .filter(in_range(range))
        .with_column(col(DATE).cast(DataType::Date)))
}

/// 每個可加總欄位的 sum 表達式，沿用原欄位名稱
pub fn sum_exprs<T: Totals>() -> Vec<Expr> {
    T::COUNT_COLUMNS
        .iter()
        .chain(T::AMOUNT_COLUMNS.iter())
        .map(|name| col(*name).sum().alias(*name))
        .collect()
}

fn u64_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<u64>> {
    let series = df.column(name)?.as_materialized_series().cast(&DataType::UInt64)?;
    Ok(series.u64()?.into_iter().map(|v| v.unwrap_or_default()).collect())
}

fn f64_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<f64>> {
    let series = df.column(name)?.as_materialized_series().cast(&DataType::Float64)?;
    Ok(series.f64()?.into_iter().map(|v| v.unwrap_or_default()).collect())
}

/// 讀回日期欄
pub fn read_dates(df: &DataFrame) -> PolarsResult<Vec<NaiveDate>> {
    let series = df.column(DATE)?.as_materialized_series().cast(&DataType::Int32)?;
    series
        .i32()?
        .into_iter()
        .map(|days| date_from_epoch_days(days.unwrap_or_default()))
        .collect()
}

/// 逐列讀回總計
pub fn read_totals<T: Totals>(df: &DataFrame) -> PolarsResult<Vec<T>> {
    let counts = T::COUNT_COLUMNS
        .iter()
        .map(|name| u64_values(df, name))
        .collect::<PolarsResult<Vec<_>>>()?;
    let amounts = T::AMOUNT_COLUMNS
        .iter()
        .map(|name| f64_values(df, name))
        .collect::<PolarsResult<Vec<_>>>()?;

    Ok((0..df.height())
        .map(|row| {
            let row_counts: Vec<u64> = counts
                .iter()
                .map(|column| column.get(row).copied().unwrap_or_default())
                .collect();
            let row_amounts: Vec<f64> = amounts
                .iter()
                .map(|column| column.get(row).copied().unwrap_or_default())
                .collect();
            T::from_columns(&row_counts, &row_amounts)
        })
        .collect())
}
