//! 本期與基準期的比較

use super::metrics::{self, BusinessMetrics, MarketingMetrics};
use crate::domain_types::{AggregatedPeriod, BusinessTotals, MarketingTotals, MetricValue};
use serde::{Deserialize, Serialize};

/// 指標的數值型態，決定呈現格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Currency,
    Count,
    Percent,
    Ratio,
}

/// 變化方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Flat,
}

impl Direction {
    /// 變化未定義時視為持平
    pub fn from_change(change: MetricValue) -> Self {
        match change.value() {
            Some(v) if v > 0.0 => Direction::Up,
            Some(v) if v < 0.0 => Direction::Down,
            _ => Direction::Flat,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Direction::Up => "▲",
            Direction::Down => "▼",
            Direction::Flat => "■",
        }
    }
}

/// 單一指標的本期、基準期與變化百分比
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricDelta {
    pub label: String,
    pub kind: MetricKind,
    pub current: MetricValue,
    pub previous: MetricValue,
    pub change_pct: MetricValue,
    pub direction: Direction,
}

impl MetricDelta {
    pub fn new(
        label: impl Into<String>,
        kind: MetricKind,
        current: impl Into<MetricValue>,
        previous: impl Into<MetricValue>,
    ) -> Self {
        let current = current.into();
        let previous = previous.into();
        let change_pct = metrics::percent_change_of(current, previous);
        Self {
            label: label.into(),
            kind,
            current,
            previous,
            change_pct,
            direction: Direction::from_change(change_pct),
        }
    }
}

fn previous_of<T, F>(previous: Option<&T>, f: F) -> MetricValue
where
    F: Fn(&T) -> MetricValue,
{
    previous.map(f).unwrap_or(MetricValue::NA)
}

/// 營運指標比較表
///
/// 沒有基準期資料時，基準值與變化皆為 N/A。
pub fn compare_business(current: &BusinessTotals, previous: Option<&BusinessTotals>) -> Vec<MetricDelta> {
    let now = BusinessMetrics::from_totals(current);
    let before = previous.map(BusinessMetrics::from_totals);
    let before = before.as_ref();

    vec![
        MetricDelta::new(
            "Total Revenue",
            MetricKind::Currency,
            current.revenue,
            previous_of(previous, |t| t.revenue.into()),
        ),
        MetricDelta::new(
            "Gross Profit",
            MetricKind::Currency,
            current.gross_profit,
            previous_of(previous, |t| t.gross_profit.into()),
        ),
        MetricDelta::new(
            "Profit Margin",
            MetricKind::Percent,
            now.profit_margin,
            previous_of(before, |m| m.profit_margin),
        ),
        MetricDelta::new(
            "Total Orders",
            MetricKind::Count,
            current.orders as f64,
            previous_of(previous, |t| (t.orders as f64).into()),
        ),
        MetricDelta::new(
            "New Orders",
            MetricKind::Count,
            current.new_orders as f64,
            previous_of(previous, |t| (t.new_orders as f64).into()),
        ),
        MetricDelta::new(
            "Repeat Order Rate",
            MetricKind::Percent,
            now.repeat_order_rate,
            previous_of(before, |m| m.repeat_order_rate),
        ),
        MetricDelta::new(
            "New Customers",
            MetricKind::Count,
            current.new_customers as f64,
            previous_of(previous, |t| (t.new_customers as f64).into()),
        ),
        MetricDelta::new(
            "Average Order Value",
            MetricKind::Currency,
            now.average_order_value,
            previous_of(before, |m| m.average_order_value),
        ),
        MetricDelta::new(
            "COGS",
            MetricKind::Currency,
            current.cogs,
            previous_of(previous, |t| t.cogs.into()),
        ),
    ]
}

/// 行銷指標比較表
pub fn compare_marketing(current: &MarketingTotals, previous: Option<&MarketingTotals>) -> Vec<MetricDelta> {
    let now = MarketingMetrics::from_totals(current);
    let before = previous.map(MarketingMetrics::from_totals);
    let before = before.as_ref();

    vec![
        MetricDelta::new(
            "Total Impressions",
            MetricKind::Count,
            current.impressions as f64,
            previous_of(previous, |t| (t.impressions as f64).into()),
        ),
        MetricDelta::new(
            "Total Clicks",
            MetricKind::Count,
            current.clicks as f64,
            previous_of(previous, |t| (t.clicks as f64).into()),
        ),
        MetricDelta::new(
            "Total Ad Spend",
            MetricKind::Currency,
            current.spend,
            previous_of(previous, |t| t.spend.into()),
        ),
        MetricDelta::new(
            "Attributed Revenue",
            MetricKind::Currency,
            current.attributed_revenue,
            previous_of(previous, |t| t.attributed_revenue.into()),
        ),
        MetricDelta::new(
            "Click-Through Rate",
            MetricKind::Percent,
            now.ctr,
            previous_of(before, |m| m.ctr),
        ),
        MetricDelta::new(
            "Return on Ad Spend",
            MetricKind::Ratio,
            now.roas,
            previous_of(before, |m| m.roas),
        ),
        MetricDelta::new(
            "Cost Per Click",
            MetricKind::Currency,
            now.cpc,
            previous_of(before, |m| m.cpc),
        ),
    ]
}

/// 依位置對齊本期與基準期的分桶
///
/// 第 i 個本期分桶對應第 i 個基準期分桶，基準期較短時以 None 補齊。
pub fn align_series<'a, T>(
    current: &'a [AggregatedPeriod<T>],
    baseline: &'a [AggregatedPeriod<T>],
) -> Vec<(&'a AggregatedPeriod<T>, Option<&'a AggregatedPeriod<T>>)> {
    current
        .iter()
        .enumerate()
        .map(|(i, period)| (period, baseline.get(i)))
        .collect()
}
