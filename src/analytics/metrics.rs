//! 衍生指標計算
//!
//! 全部為純函數。分母為零時回傳未定義的 `MetricValue`，呈現時顯示為 `N/A`。

use crate::domain_types::{BusinessTotals, MarketingTotals, MetricValue};
use serde::{Deserialize, Serialize};
use std::fmt;

/// ROAS = 歸因營收 / 廣告花費
pub fn roas(attributed_revenue: f64, spend: f64) -> MetricValue {
    MetricValue::ratio(attributed_revenue, spend)
}

/// 毛利率 (%) = 毛利 / 營收 × 100
pub fn profit_margin(gross_profit: f64, total_revenue: f64) -> MetricValue {
    MetricValue::percentage(gross_profit, total_revenue)
}

/// 回購訂單比例 (%) = (訂單數 − 新訂單數) / 訂單數 × 100
pub fn repeat_order_rate(order_count: u64, new_order_count: u64) -> MetricValue {
    let repeat = order_count as f64 - new_order_count as f64;
    MetricValue::percentage(repeat, order_count as f64)
}

/// 期間變化 (%) = (本期 − 基準期) / 基準期 × 100
pub fn percent_change(current: f64, previous: f64) -> MetricValue {
    MetricValue::percentage(current - previous, previous)
}

/// 對可能未定義的兩個值計算期間變化
pub fn percent_change_of(current: MetricValue, previous: MetricValue) -> MetricValue {
    match (current.value(), previous.value()) {
        (Some(c), Some(p)) => percent_change(c, p),
        _ => MetricValue::NA,
    }
}

/// 點擊率 (%) = 點擊 / 曝光 × 100
pub fn click_through_rate(clicks: u64, impressions: u64) -> MetricValue {
    MetricValue::percentage(clicks as f64, impressions as f64)
}

/// 單次點擊成本 = 花費 / 點擊
pub fn cost_per_click(spend: f64, clicks: u64) -> MetricValue {
    MetricValue::ratio(spend, clicks as f64)
}

/// 平均訂單金額 = 營收 / 訂單數
pub fn average_order_value(total_revenue: f64, order_count: u64) -> MetricValue {
    MetricValue::ratio(total_revenue, order_count as f64)
}

/// ROAS 評級
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoasRating {
    Outstanding,
    Excellent,
    Good,
    BreakEven,
    Poor,
    NotAvailable,
}

impl RoasRating {
    /// ≥ 4 Outstanding、≥ 3 Excellent、≥ 2 Good、≥ 1 Break-even，其餘 Poor
    pub fn from_roas(roas: MetricValue) -> Self {
        match roas.value() {
            None => RoasRating::NotAvailable,
            Some(v) if v >= 4.0 => RoasRating::Outstanding,
            Some(v) if v >= 3.0 => RoasRating::Excellent,
            Some(v) if v >= 2.0 => RoasRating::Good,
            Some(v) if v >= 1.0 => RoasRating::BreakEven,
            Some(_) => RoasRating::Poor,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RoasRating::Outstanding => "Outstanding",
            RoasRating::Excellent => "Excellent",
            RoasRating::Good => "Good",
            RoasRating::BreakEven => "Break-even",
            RoasRating::Poor => "Poor",
            RoasRating::NotAvailable => "N/A",
        }
    }
}

impl fmt::Display for RoasRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// 營運總計的衍生指標
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BusinessMetrics {
    pub profit_margin: MetricValue,
    pub repeat_order_rate: MetricValue,
    pub average_order_value: MetricValue,
}

impl BusinessMetrics {
    pub fn from_totals(totals: &BusinessTotals) -> Self {
        Self {
            profit_margin: profit_margin(totals.gross_profit, totals.revenue),
            repeat_order_rate: repeat_order_rate(totals.orders, totals.new_orders),
            average_order_value: average_order_value(totals.revenue, totals.orders),
        }
    }
}

/// 行銷總計的衍生指標
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketingMetrics {
    pub roas: MetricValue,
    pub roas_rating: RoasRating,
    pub ctr: MetricValue,
    pub cpc: MetricValue,
}

impl MarketingMetrics {
    pub fn from_totals(totals: &MarketingTotals) -> Self {
        let roas = roas(totals.attributed_revenue, totals.spend);
        Self {
            roas,
            roas_rating: RoasRating::from_roas(roas),
            ctr: click_through_rate(totals.clicks, totals.impressions),
            cpc: cost_per_click(totals.spend, totals.clicks),
        }
    }
}
