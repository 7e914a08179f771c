//! 日期區間、比較基準與聚合分桶

use super::error::{DomainError, DomainResult};
use super::granularity::Granularity;
use super::records::{BusinessRecord, MarketingRecord};
use chrono::{Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 閉區間日期範圍 `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> DomainResult<Self> {
        if start > end {
            return Err(DomainError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// 以 `anchor` 為最後一天、往前共 `days` 天的視窗
    pub fn last_n_days(anchor: NaiveDate, days: u32) -> DomainResult<Self> {
        if days == 0 {
            return Err(DomainError::EmptyWindow);
        }
        let start = anchor
            .checked_sub_signed(Duration::days(i64::from(days) - 1))
            .unwrap_or(NaiveDate::MIN);
        Self::new(start, anchor)
    }

    /// 涵蓋所有日期的最小區間，沒有日期時回傳 None
    pub fn spanning<I: IntoIterator<Item = NaiveDate>>(dates: I) -> Option<Self> {
        let mut iter = dates.into_iter();
        let first = iter.next()?;
        let (start, end) = iter.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
        Some(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// 區間天數（含頭尾）
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// 緊接在前、長度相同的區間
    pub fn previous_period(&self) -> Option<Self> {
        let end = self.start.pred_opt()?;
        let start = end.checked_sub_signed(Duration::days(self.num_days() - 1))?;
        Some(Self { start, end })
    }

    /// 一年前的同一區間，2 月 29 日會對齊到 2 月 28 日
    pub fn same_period_last_year(&self) -> Option<Self> {
        let start = self.start.checked_sub_months(Months::new(12))?;
        let end = self.end.checked_sub_months(Months::new(12))?;
        Some(Self { start, end })
    }

    /// 依比較基準取得對應的基準區間
    pub fn baseline(&self, baseline: Baseline) -> Option<Self> {
        match baseline {
            Baseline::PreviousPeriod => self.previous_period(),
            Baseline::SamePeriodLastYear => self.same_period_last_year(),
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.start, self.end)
    }
}

/// 比較基準
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Baseline {
    /// 緊接在前的同長度區間
    PreviousPeriod,
    /// 去年同期
    SamePeriodLastYear,
}

impl Baseline {
    pub fn display_name(&self) -> &'static str {
        match self {
            Baseline::PreviousPeriod => "Previous period",
            Baseline::SamePeriodLastYear => "Same period last year",
        }
    }
}

impl Default for Baseline {
    fn default() -> Self {
        Baseline::PreviousPeriod
    }
}

impl fmt::Display for Baseline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Baseline::PreviousPeriod => write!(f, "previous"),
            Baseline::SamePeriodLastYear => write!(f, "yoy"),
        }
    }
}

impl FromStr for Baseline {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['_', ' '], "-").as_str() {
            "previous" | "prev" | "previous-period" => Ok(Baseline::PreviousPeriod),
            "yoy" | "last-year" | "same-period-last-year" => Ok(Baseline::SamePeriodLastYear),
            other => Err(DomainError::UnknownBaseline(other.to_string())),
        }
    }
}

/// 帶有日期的資料
pub trait Dated {
    fn date(&self) -> NaiveDate;
}

/// 可加總欄位的總計，欄位順序即 DataFrame 中的欄位順序
pub trait Totals: Default + Clone {
    /// 整數欄位
    const COUNT_COLUMNS: &'static [&'static str];
    /// 金額欄位
    const AMOUNT_COLUMNS: &'static [&'static str];

    fn counts(&self) -> Vec<u64>;
    fn amounts(&self) -> Vec<f64>;

    /// 由欄位值重建，缺少的欄位視為 0
    fn from_columns(counts: &[u64], amounts: &[f64]) -> Self;
}

/// 可計入分桶總計的記錄
pub trait Measured: Dated {
    type Totals: Totals;

    /// 只含這筆記錄的總計
    fn measure(&self) -> Self::Totals;
}

fn column_at<T: Copy + Default>(values: &[T], index: usize) -> T {
    values.get(index).copied().unwrap_or_default()
}

fn count_to_usize(value: u64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

impl Dated for BusinessRecord {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Dated for MarketingRecord {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

/// 聚合後的分桶，以 (period_start, granularity) 為鍵
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedPeriod<T> {
    pub period_start: NaiveDate,
    pub granularity: Granularity,
    pub totals: T,
}

impl<T> AggregatedPeriod<T> {
    pub fn label(&self) -> String {
        self.granularity.label(self.period_start)
    }
}

impl<T> Dated for AggregatedPeriod<T> {
    fn date(&self) -> NaiveDate {
        self.period_start
    }
}

// 已聚合的分桶可以再次聚合
impl<T: Totals> Measured for AggregatedPeriod<T> {
    type Totals = T;

    fn measure(&self) -> T {
        self.totals.clone()
    }
}

/// 營運數據的可加總欄位
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BusinessTotals {
    pub orders: u64,
    pub new_orders: u64,
    pub new_customers: u64,
    pub revenue: f64,
    pub gross_profit: f64,
    pub cogs: f64,
    /// 納入的記錄天數
    pub days: usize,
}

impl Totals for BusinessTotals {
    const COUNT_COLUMNS: &'static [&'static str] = &["orders", "new_orders", "new_customers", "days"];
    const AMOUNT_COLUMNS: &'static [&'static str] = &["revenue", "gross_profit", "cogs"];

    fn counts(&self) -> Vec<u64> {
        vec![self.orders, self.new_orders, self.new_customers, self.days as u64]
    }

    fn amounts(&self) -> Vec<f64> {
        vec![self.revenue, self.gross_profit, self.cogs]
    }

    fn from_columns(counts: &[u64], amounts: &[f64]) -> Self {
        Self {
            orders: column_at(counts, 0),
            new_orders: column_at(counts, 1),
            new_customers: column_at(counts, 2),
            days: count_to_usize(column_at(counts, 3)),
            revenue: column_at(amounts, 0),
            gross_profit: column_at(amounts, 1),
            cogs: column_at(amounts, 2),
        }
    }
}

impl Measured for BusinessRecord {
    type Totals = BusinessTotals;

    fn measure(&self) -> BusinessTotals {
        BusinessTotals {
            orders: self.order_count,
            new_orders: self.new_order_count,
            new_customers: self.new_customers,
            revenue: self.total_revenue,
            gross_profit: self.gross_profit,
            cogs: self.cogs,
            days: 1,
        }
    }
}

/// 行銷數據的可加總欄位
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketingTotals {
    pub impressions: u64,
    pub clicks: u64,
    pub spend: f64,
    pub attributed_revenue: f64,
    /// 納入的記錄筆數
    pub rows: usize,
}

impl Totals for MarketingTotals {
    const COUNT_COLUMNS: &'static [&'static str] = &["impressions", "clicks", "rows"];
    const AMOUNT_COLUMNS: &'static [&'static str] = &["spend", "attributed_revenue"];

    fn counts(&self) -> Vec<u64> {
        vec![self.impressions, self.clicks, self.rows as u64]
    }

    fn amounts(&self) -> Vec<f64> {
        vec![self.spend, self.attributed_revenue]
    }

    fn from_columns(counts: &[u64], amounts: &[f64]) -> Self {
        Self {
            impressions: column_at(counts, 0),
            clicks: column_at(counts, 1),
            rows: count_to_usize(column_at(counts, 2)),
            spend: column_at(amounts, 0),
            attributed_revenue: column_at(amounts, 1),
        }
    }
}

impl Measured for MarketingRecord {
    type Totals = MarketingTotals;

    fn measure(&self) -> MarketingTotals {
        MarketingTotals {
            impressions: self.impressions,
            clicks: self.clicks,
            spend: self.spend,
            attributed_revenue: self.attributed_revenue,
            rows: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_invalid_range() {
        assert_matches!(
            DateRange::new(date(2024, 2, 1), date(2024, 1, 1)),
            Err(DomainError::InvalidRange { .. })
        );
    }

    #[test]
    fn test_last_n_days() {
        let range = DateRange::last_n_days(date(2024, 3, 31), 30).unwrap();
        assert_eq!(range.start(), date(2024, 3, 2));
        assert_eq!(range.num_days(), 30);
        assert_matches!(DateRange::last_n_days(date(2024, 3, 31), 0), Err(DomainError::EmptyWindow));
    }

    #[test]
    fn test_previous_period_has_same_length() {
        let range = DateRange::new(date(2024, 3, 1), date(2024, 3, 31)).unwrap();
        let prev = range.previous_period().unwrap();
        assert_eq!(prev.end(), date(2024, 2, 29));
        assert_eq!(prev.start(), date(2024, 1, 30));
        assert_eq!(prev.num_days(), range.num_days());
    }

    #[test]
    fn test_same_period_last_year_clamps_leap_day() {
        let range = DateRange::new(date(2024, 2, 1), date(2024, 2, 29)).unwrap();
        let last_year = range.baseline(Baseline::SamePeriodLastYear).unwrap();
        assert_eq!(last_year.start(), date(2023, 2, 1));
        assert_eq!(last_year.end(), date(2023, 2, 28));
    }

    #[test]
    fn test_spanning() {
        let range = DateRange::spanning(vec![date(2024, 1, 5), date(2024, 1, 1), date(2024, 1, 3)]).unwrap();
        assert_eq!(range.start(), date(2024, 1, 1));
        assert_eq!(range.end(), date(2024, 1, 5));
        assert!(DateRange::spanning(Vec::<NaiveDate>::new()).is_none());
    }

    #[test]
    fn test_baseline_from_str() {
        assert_eq!("yoy".parse::<Baseline>().unwrap(), Baseline::SamePeriodLastYear);
        assert_eq!("Previous Period".parse::<Baseline>().unwrap(), Baseline::PreviousPeriod);
        assert!("quarter".parse::<Baseline>().is_err());
    }

    #[test]
    fn test_totals_columns_round_trip() {
        let totals = BusinessTotals {
            orders: 10,
            new_orders: 4,
            new_customers: 3,
            revenue: 1000.0,
            gross_profit: 400.0,
            cogs: 600.0,
            days: 2,
        };
        assert_eq!(totals.counts().len(), BusinessTotals::COUNT_COLUMNS.len());
        assert_eq!(totals.amounts().len(), BusinessTotals::AMOUNT_COLUMNS.len());
        assert_eq!(BusinessTotals::from_columns(&totals.counts(), &totals.amounts()), totals);

        // 缺少的欄位補 0
        let partial = MarketingTotals::from_columns(&[5], &[]);
        assert_eq!(partial.impressions, 5);
        assert_eq!(partial.rows, 0);
        assert_eq!(partial.spend, 0.0);
    }
}
